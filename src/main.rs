use env_logger::Env;
use small_game::engine_builder::EngineAttributes;
use std::error::Error;
use std::process::ExitCode;

fn run() -> Result<(), Box<dyn Error>> {
    let mut engine = EngineAttributes::new().build_engine()?;
    engine.run()
}

fn main() -> ExitCode {
    let env = Env::default()
        .filter_or("LOG_LVL", "info")
        .write_style_or("LOG_STYLE", "always");
    env_logger::init_from_env(env);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: \"{e}\"");
            ExitCode::FAILURE
        }
    }
}

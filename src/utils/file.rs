use std::env::current_dir;
use std::path::PathBuf;

/// yields the full path of any asset file located in ./assets/dir_path
pub fn get_asset_path(dir_path: &str) -> PathBuf {
    current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("assets")
        .join(dir_path)
}

/// yields shader file path
pub fn get_shader_path(file_name: &str) -> PathBuf {
    get_asset_path("shaders").join(file_name)
}

/// yields texture file path
pub fn get_texture_path(file_name: &str) -> PathBuf {
    get_asset_path("textures").join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_below_assets() {
        let shader = get_shader_path("sprite.vert");
        assert!(shader.ends_with("assets/shaders/sprite.vert"));
        let texture = get_texture_path("spaceship.dfield");
        assert!(texture.ends_with("assets/textures/spaceship.dfield"));
    }
}

use small_game::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn shader_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("assets/shaders")
        .join(name)
}

fn batcher_on<B: GraphicsBackend>(backend: B, capacity: usize) -> SpriteBatcher<B> {
    SpriteBatcher::new(
        backend,
        shader_path("sprite.frag"),
        shader_path("sprite.vert"),
        capacity,
    )
    .unwrap()
}

fn batcher(capacity: usize) -> SpriteBatcher<HeadlessBackend> {
    batcher_on(HeadlessBackend::new(), capacity)
}

fn dfield_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file
}

fn shader_file(source: &str) -> NamedTempFile {
    dfield_file(source.as_bytes())
}

#[test]
fn capacity_invariant() {
    let mut batcher = batcher(5);
    let texture = batcher.upload_texture(&DistanceField::from_samples(1, 1, vec![255]).unwrap());
    for expected in 0..5 {
        let id = batcher.spawn(texture, Color32::WHITE).unwrap();
        assert_eq!(id.index(), expected);
    }
    assert!(matches!(
        batcher.spawn(texture, Color32::WHITE),
        Err(RenderError::PoolExhausted { capacity: 5 })
    ));
    assert_eq!(batcher.sprites().len(), 5);
}

#[test]
fn identity_spawn() {
    let mut batcher = batcher(2);
    let texture = batcher.upload_texture(&DistanceField::from_samples(1, 1, vec![0]).unwrap());
    let id = batcher
        .spawn(texture, Color32::from_rgba(10, 20, 30, 40))
        .unwrap();
    let trafo = batcher.sprites().transform(id).unwrap();
    assert_eq!(trafo.position, [0.0, 0.0]);
    assert_eq!(trafo.scale, [1.0, 1.0]);
    assert_eq!(trafo.rotation, 0.0);
    assert_eq!(
        batcher.sprites().color(id).unwrap(),
        Color32::from_rgba(10, 20, 30, 40)
    );
}

#[test]
fn lazy_upload_matches_host_records() {
    let mut batcher = batcher(8);
    let surface = HeadlessSurface::new(800, 600);
    let texture = batcher.upload_texture(&DistanceField::from_samples(1, 1, vec![9]).unwrap());
    let a = batcher.spawn(texture, Color32::from_rgb(1, 2, 3)).unwrap();
    let b = batcher.spawn(texture, Color32::from_rgba(4, 5, 6, 7)).unwrap();
    batcher.render(&surface).unwrap();

    batcher.set_position(a, -0.25, 0.75).unwrap();
    batcher.set_scale(b, 2.0, 3.0).unwrap();
    batcher.set_rotation(b, 1.5).unwrap();
    batcher.set_rotation(a, -1.0).unwrap();
    assert!(batcher.sprites().is_dirty());
    batcher.render(&surface).unwrap();
    assert!(!batcher.sprites().is_dirty());

    let expected: Vec<GLfloat> = batcher
        .sprites()
        .transforms()
        .iter()
        .flat_map(|trafo| trafo.to_floats())
        .collect();
    assert_eq!(
        expected,
        vec![-0.25, 0.75, 1.0, 1.0, -1.0, 0.0, 0.0, 2.0, 3.0, 1.5]
    );
    let backend = batcher.backend();
    assert_eq!(
        backend.buffer_floats(batcher.transform_buffer(), 10),
        expected
    );
    assert_eq!(
        &backend.buffer(batcher.color_buffer()).unwrap()[..8],
        &[1, 2, 3, 255, 4, 5, 6, 7]
    );
}

#[test]
fn idempotent_render() {
    let mut batcher = batcher(4);
    let surface = HeadlessSurface::new(640, 480);
    let texture = batcher.upload_texture(&DistanceField::from_samples(1, 1, vec![1]).unwrap());
    batcher.spawn(texture, Color32::BLACK).unwrap();

    batcher.render(&surface).unwrap();
    let uploads = batcher.backend().upload_count();
    assert!(uploads > 0);

    batcher.render(&surface).unwrap();
    let backend = batcher.backend();
    assert_eq!(backend.upload_count(), uploads);
    let draws = backend.draw_calls();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0], draws[1]);
    assert_eq!(surface.presented(), 2);
}

#[test]
fn format_round_trip() {
    let samples = [10, 20, 30, 40, 50, 60];
    let mut bytes = vec![3, 2];
    bytes.extend_from_slice(&samples);

    let mut batcher = batcher(1);
    let file = dfield_file(&bytes);
    let texture = batcher.load_texture(file.path()).unwrap();
    let uploaded = batcher.backend().texture(texture).unwrap();
    assert_eq!((uploaded.width, uploaded.height), (3, 2));
    assert_eq!(uploaded.samples, samples);
    assert_eq!(batcher.active_texture(), Some(texture));

    let truncated = dfield_file(&bytes[..bytes.len() - 1]);
    assert!(matches!(
        batcher.load_texture(truncated.path()),
        Err(RenderError::CorruptFile { .. })
    ));

    let mut longer = bytes.clone();
    longer.push(70);
    let longer = dfield_file(&longer);
    assert!(matches!(
        batcher.load_texture(longer.path()),
        Err(RenderError::CorruptFile { .. })
    ));
    assert_eq!(batcher.active_texture(), Some(texture));
}

#[test]
fn missing_texture_is_an_io_error() {
    let mut batcher = batcher(1);
    let res = batcher.load_texture("does/not/exist.dfield");
    assert!(matches!(res, Err(RenderError::Io { .. })));
}

#[test]
fn loading_replaces_the_active_texture() {
    let mut batcher = batcher(2);
    let surface = HeadlessSurface::new(10, 10);
    let first = batcher.load_texture(dfield_file(&[1, 1, 0]).path()).unwrap();
    let second = batcher.load_texture(dfield_file(&[1, 1, 255]).path()).unwrap();
    assert_ne!(first, second);
    batcher.spawn(first, Color32::WHITE).unwrap();
    batcher.render(&surface).unwrap();

    let backend = batcher.backend();
    assert_eq!(backend.last_draw().unwrap().texture, second.id());
    // the replaced texture stays alive for sprites still referring to it
    assert!(backend.texture(first).is_some());
}

#[test]
fn invalid_handles_are_rejected() {
    let mut batcher = batcher(4);
    let texture = batcher.upload_texture(&DistanceField::from_samples(1, 1, vec![1]).unwrap());
    let id = batcher.spawn(texture, Color32::WHITE).unwrap();
    let mut other = batcher_on(HeadlessBackend::new(), 4);
    let other_texture =
        other.upload_texture(&DistanceField::from_samples(1, 1, vec![1]).unwrap());
    other.spawn(other_texture, Color32::WHITE).unwrap();
    let foreign = other.spawn(other_texture, Color32::WHITE).unwrap();

    assert!(batcher.set_position(id, 0.0, 0.0).is_ok());
    assert!(matches!(
        batcher.set_position(foreign, 1.0, 1.0),
        Err(RenderError::InvalidHandle(_))
    ));
    assert!(matches!(
        batcher.set_scale(foreign, 1.0, 1.0),
        Err(RenderError::InvalidHandle(_))
    ));
    assert!(matches!(
        batcher.set_rotation(foreign, 1.0),
        Err(RenderError::InvalidHandle(_))
    ));
}

#[test]
fn shader_failures_are_reported() {
    let missing = SpriteBatcher::new(
        HeadlessBackend::new(),
        shader_path("missing.frag"),
        shader_path("sprite.vert"),
        1,
    );
    assert!(matches!(missing, Err(RenderError::Io { .. })));

    let broken = shader_file("#version 330 core\n");
    let res = SpriteBatcher::new(
        HeadlessBackend::new(),
        shader_path("sprite.frag"),
        broken.path(),
        1,
    );
    match res {
        Err(RenderError::ShaderCompile { stage, log }) => {
            assert_eq!(stage.to_string(), "vertex");
            assert!(!log.is_empty());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("broken shader compiled"),
    }

    let mut backend = HeadlessBackend::new();
    backend.fail_next_link("error: varying tint not written");
    let res = SpriteBatcher::new(
        &mut backend,
        shader_path("sprite.frag"),
        shader_path("sprite.vert"),
        1,
    );
    assert!(matches!(&res, Err(RenderError::ShaderLink(log)) if log.contains("tint")));
}

#[test]
fn end_to_end_scenario() {
    let mut batcher = batcher(1024);
    let surface = HeadlessSurface::new(800, 600);
    let field = dfield_file(&[2, 2, 255, 255, 255, 255]);
    let texture = batcher.load_texture(field.path()).unwrap();

    let ship = batcher
        .spawn(texture, Color32::from_rgba(0, 0, 0, 255))
        .unwrap();
    batcher.set_scale(ship, 0.1, 0.1).unwrap();
    batcher.set_position(ship, 0.5, 0.1).unwrap();
    batcher.render(&surface).unwrap();

    let backend = batcher.backend();
    let draw = backend.last_draw().unwrap();
    assert_eq!(draw.instance_count, 1);
    assert_eq!(draw.vertex_count, 4);
    assert_eq!(draw.texture, texture.id());
    assert_eq!(draw.program, batcher.program().id());
    assert_eq!(
        backend.buffer_floats(batcher.transform_buffer(), 5),
        vec![0.5, 0.1, 0.1, 0.1, 0.0]
    );
    assert_eq!(
        &backend.buffer(batcher.color_buffer()).unwrap()[..4],
        &[0, 0, 0, 255]
    );
    assert_eq!(backend.viewport(), (800, 600));
    assert_eq!(backend.clear_color(), CLEAR_COLOR);
    assert!(backend.blending_enabled());
    assert_eq!(surface.presented(), 1);
}

#[test]
fn shipped_shaders_target_desktop_gl() {
    for name in ["sprite.vert", "sprite.frag"] {
        let source = std::fs::read_to_string(shader_path(name)).unwrap();
        assert!(source.starts_with("#version 330 core"), "{name}");
    }
}

#[test]
fn shipped_texture_is_valid() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/textures/spaceship.dfield");
    let field = DistanceField::load(path).unwrap();
    assert_eq!((field.width(), field.height()), (64, 64));
    assert_eq!(field.samples().len(), 64 * 64);
}

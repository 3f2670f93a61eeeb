//! Path resolution tests.

use std::path::{Path, PathBuf};

use fixture_env::{EnvOptions, Error, TestEnv};

use crate::common::{project, project_with, temp_dir, write_file};

#[test]
fn test_roots_follow_layout() {
    let p = project();
    let root = p.root();

    assert_eq!(p.env.base_dir(), root);
    assert_eq!(p.env.test_root(), root.join("test"));
    assert_eq!(p.env.fixture_root(), root.join("test").join("fixture"));
    assert_eq!(p.env.output_root(), root.join("test").join("output"));
}

#[test]
fn test_joins_below_each_root() {
    let p = project();
    let root = p.root();

    assert_eq!(p.env.base_path("bp"), root.join("bp"));
    assert_eq!(p.env.test_path("bp"), root.join("test").join("bp"));
    assert_eq!(p.env.fixture_path("fp"), root.join("test/fixture/fp"));
    assert_eq!(p.env.output_path("op/sub"), root.join("test/output/op/sub"));
    assert_eq!(p.env.output_path("op/./x/../sub"), root.join("test/output/op/sub"));
}

#[test]
fn test_accessors_accept_segment_lists() {
    let p = project();
    let root = p.root();

    assert_eq!(p.env.output_path(["op", "sub"]), p.env.output_path("op/sub"));
    assert_eq!(
        p.env.fixture_path(vec!["files", "firstfile"]),
        root.join("test/fixture/files/firstfile")
    );
    assert_eq!(p.env.test_path(()), root.join("test"));
    assert_eq!(p.env.base_path(None::<&str>), root);
    assert_eq!(p.env.output(["a", "b"]).root(), p.env.output_path("a/b"));
    assert_eq!(p.env.output("a").path(["b", "c"]), p.env.output_path("a/b/c"));
}

#[test]
fn test_join_is_idempotent() {
    let p = project();
    let once = p.env.output_path("op");

    // Passing an already resolved path back in does not double the root
    assert_eq!(p.env.output_path(&once), once);
    assert_eq!(p.env.fixture_path(p.env.fixture_path("a/b")), p.env.fixture_path("a/b"));
}

#[test]
fn test_base_may_point_at_test_dir() {
    let tmp = temp_dir();

    let from_root = TestEnv::setup(tmp.path()).unwrap();
    let from_test = TestEnv::setup(tmp.path().join("test")).unwrap();

    assert_eq!(from_root.base_dir(), from_test.base_dir());
    assert_eq!(from_root.fixture_path("x"), from_test.fixture_path("x"));
}

#[test]
fn test_relative_base_resolves_against_current_dir() {
    let env = TestEnv::setup("some/project").unwrap();
    let expected = std::env::current_dir().unwrap().join("some/project");

    assert!(env.base_dir().is_absolute());
    assert_eq!(env.base_dir(), expected.as_path());
}

#[test]
fn test_guess_uses_manifest_dir() {
    // Cargo sets CARGO_MANIFEST_DIR for test binaries
    let env = TestEnv::guess().unwrap();
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    assert_eq!(env.base_dir(), manifest.as_path());
    assert_eq!(env.fixture_path("somesubdir"), manifest.join("test/fixture/somesubdir"));
}

#[test]
fn test_custom_directory_names() {
    let options = EnvOptions::new()
        .with_test_dir_name("examples")
        .with_fixture_dir("fx")
        .with_output_dir("out")
        .with_tmp_prefix("scratch-")
        .with_debug_clean(false);
    let p = project_with(options);
    let root = p.root();

    assert_eq!(p.env.fixture_root(), root.join("examples/fx"));
    assert_eq!(p.env.output_root(), root.join("examples/out"));
    assert_eq!(p.env.output_tmp_path(Some("ab")), root.join("examples/out/scratch-ab"));
}

#[test]
fn test_empty_tmp_prefix_is_rejected() {
    let tmp = temp_dir();
    let result = TestEnv::new(EnvOptions::new().with_base_path(tmp.path()).with_tmp_prefix(""));

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_options_load_from_json() {
    let tmp = temp_dir();
    let config = tmp.path().join("fixture-env.json");
    write_file(
        &config,
        r#"{
            "base_path": "/srv/project",
            "test_dir": "integration",
            "tmp_prefix": "t-",
            "debug_clean": true
        }"#,
    );

    let options = EnvOptions::from_json_file(&config).unwrap();
    assert_eq!(options.base_path.as_deref(), Some(Path::new("/srv/project")));
    assert_eq!(options.test_dir_name, "integration");
    assert_eq!(options.fixture_dir, "fixture");
    assert_eq!(options.output_dir, "output");
    assert_eq!(options.tmp_prefix, "t-");
    assert_eq!(options.debug_clean, Some(true));
}

#[test]
fn test_invalid_json_options_fail() {
    let tmp = temp_dir();
    let config = tmp.path().join("broken.json");
    write_file(&config, "{ not json");

    let result = EnvOptions::from_json_file(&config);
    assert!(matches!(result, Err(Error::Config(_))));
}

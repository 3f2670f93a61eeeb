//! Guarded clean/remove behaviour.

use std::path::Path;

use fixture_env::{CleanOptions, Error};

use crate::common::{
    assert_empty_dir, assert_path_exists, assert_path_not_exists, debug_project, project, temp_dir,
    write_file,
};

#[tokio::test]
async fn test_clean_outside_project_is_rejected_without_changes() {
    // Setup: a populated directory outside the project
    let p = project();
    let outside = temp_dir();
    let file = outside.path().join("keep.txt");
    write_file(&file, "keep");

    // Execute
    let clean = p.env.clean(outside.path(), CleanOptions::default()).await;
    let remove = p.env.remove(outside.path(), CleanOptions::default()).await;

    // Verify: both rejected, nothing touched
    assert!(matches!(clean, Err(Error::OutsideProject(_))));
    assert!(matches!(remove, Err(Error::OutsideProject(_))));
    assert!(clean.unwrap_err().to_string().contains("clean outside of project without force"));
    assert_path_exists(&file);
}

#[tokio::test]
async fn test_clean_outside_project_with_force() {
    let p = project();
    let outside = temp_dir();
    write_file(&outside.path().join("gone.txt"), "x");

    let cleaned = p.env.clean(outside.path(), CleanOptions::force()).await.unwrap();

    assert_eq!(cleaned, outside.path());
    assert_empty_dir(outside.path());
}

#[tokio::test]
async fn test_parent_dir_escape_is_outside_project() {
    let p = project();
    let escape = p.env.output_root().join("../../..");

    let result = p.env.remove(&escape, CleanOptions::default()).await;

    assert!(matches!(result, Err(Error::OutsideProject(_))));
    assert_path_exists(p.root());
}

#[tokio::test]
async fn test_sibling_with_common_prefix_is_outside_project() {
    let p = project();
    let mut sibling = p.root().as_os_str().to_owned();
    sibling.push("-sibling");

    let result = p.env.clean(Path::new(&sibling), CleanOptions::default()).await;

    assert!(matches!(result, Err(Error::OutsideProject(_))));
}

#[tokio::test]
async fn test_whole_project_is_rejected() {
    let p = project();
    let base = p.env.base_dir().to_path_buf();
    let with_separator = base.join("");
    let roundabout = base.join("test/..");

    for dir in [&base, &with_separator, &roundabout] {
        let result = p.env.clean(dir, CleanOptions::default()).await;
        assert!(matches!(result, Err(Error::WholeProject(_))), "{:?} should be rejected", dir);
        let err = p.env.remove(dir, CleanOptions::default()).await.unwrap_err();
        assert!(err.is_safety_violation());
    }

    assert_path_exists(&p.env.fixture_path("files/firstfile"));
}

#[tokio::test]
async fn test_whole_project_with_force() {
    let p = project();

    let cleaned = p.env.clean(p.env.base_dir(), CleanOptions::force()).await.unwrap();

    assert_eq!(cleaned, p.env.base_dir());
    assert_empty_dir(p.root());
}

#[tokio::test]
async fn test_missing_dir_is_rejected() {
    let p = project();
    let result = p.env.clean("", CleanOptions::default()).await;

    assert!(matches!(result, Err(Error::NoDir)));
    assert_eq!(result.unwrap_err().to_string(), "No dir to clean");
}

#[tokio::test]
async fn test_relative_dir_is_rejected() {
    let p = project();
    let result = p.env.remove("test/output", CleanOptions::force()).await;

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_path_exists(&p.env.output_root());
}

#[tokio::test]
async fn test_debug_clean_leaves_directory_in_place() {
    let p = debug_project();
    let dir = p.env.mkdir_output("test2").await.unwrap();
    let file = dir.join("artifact.txt");
    write_file(&file, "inspect me");

    let cleaned = p.env.clean(&dir, CleanOptions::default()).await.unwrap();
    let removed = p.env.remove_output("test2").await.unwrap();

    assert_eq!(cleaned, dir);
    assert_eq!(removed, dir);
    assert_path_exists(&file);
}

#[tokio::test]
async fn test_debug_clean_still_applies_guards() {
    let p = debug_project();
    let outside = temp_dir();

    let result = p.env.clean(outside.path(), CleanOptions::default()).await;

    assert!(matches!(result, Err(Error::OutsideProject(_))));
}

#[tokio::test]
async fn test_debug_clean_resolves_missing_output() {
    let p = debug_project();
    let expected = p.env.output_path("test2");
    assert_path_not_exists(&expected);

    let cleaned = p.env.clean_output("test2").await.unwrap();

    assert_eq!(cleaned, expected);
    assert_path_not_exists(&expected);
}

#[tokio::test]
async fn test_mkdir_then_clean_output_leaves_empty_dir() {
    let p = project();
    let dir = p.env.mkdir_output("x").await.unwrap();
    write_file(&dir.join("a/b/c.txt"), "x");
    write_file(&dir.join("top.txt"), "x");

    let cleaned = p.env.clean_output("x").await.unwrap();

    assert_eq!(cleaned, dir);
    assert_empty_dir(&dir);
}

#[tokio::test]
async fn test_mkdir_then_remove_output_leaves_nothing() {
    let p = project();
    let dir = p.env.mkdir_output("x").await.unwrap();
    write_file(&dir.join("a/b/c.txt"), "x");

    p.env.remove_output("x").await.unwrap();

    assert_path_not_exists(&dir);
    assert_path_exists(&p.env.output_root());
}

#[tokio::test]
async fn test_mkdir_output_creates_empty_dir() {
    let p = project();
    let expected = p.env.output_path("test1");

    let created = p.env.mkdir_output("test1").await.unwrap();

    assert_eq!(created, expected);
    assert_empty_dir(&expected);
    // Creating it again is fine
    p.env.mkdir_output("test1").await.unwrap();
}

#[tokio::test]
async fn test_remove_missing_dir_is_ok() {
    let p = project();
    let removed = p.env.remove_output("never-created").await.unwrap();
    assert_eq!(removed, p.env.output_path("never-created"));
}

#[tokio::test]
async fn test_clean_missing_dir_creates_it() {
    let p = project();
    let cleaned = p.env.clean_output("later").await.unwrap();
    assert_empty_dir(&cleaned);
}

#[tokio::test]
async fn test_clean_output_requires_subdir() {
    let p = project();
    let result = p.env.clean_output("").await;

    assert!(matches!(
        result,
        Err(Error::InvalidArgument(ref msg)) if msg.contains("No subdir to clean")
    ));
}

#[tokio::test]
async fn test_clean_all_output() {
    let p = project();
    write_file(&p.env.output_path("one/file"), "x");
    write_file(&p.env.output_path("two"), "x");

    let cleaned = p.env.clean_all_output().await.unwrap();

    assert_eq!(cleaned, p.root().join("test/output"));
    assert_empty_dir(&cleaned);
    assert_path_exists(&p.env.fixture_path("files/firstfile"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_clean_refuses_symlink_to_outside_dir() {
    // Setup: output/link points at a populated directory outside the project
    let p = project();
    let outside = temp_dir();
    let file = outside.path().join("keep.txt");
    write_file(&file, "keep");
    let link = p.env.output_path("link");
    std::os::unix::fs::symlink(outside.path(), &link).unwrap();

    // Execute
    let result = p.env.clean(&link, CleanOptions::default()).await;

    // Verify: refused, target untouched
    let err = result.unwrap_err();
    assert!(err.fs_error().is_some());
    assert!(err.to_string().contains("symlinked directory"));
    assert_path_exists(&file);
}

#[cfg(unix)]
#[tokio::test]
async fn test_remove_symlink_removes_only_the_link() {
    let p = project();
    let outside = temp_dir();
    let file = outside.path().join("keep.txt");
    write_file(&file, "keep");
    let link = p.env.output_path("link");
    std::os::unix::fs::symlink(outside.path(), &link).unwrap();

    p.env.remove(&link, CleanOptions::default()).await.unwrap();

    assert!(std::fs::symlink_metadata(&link).is_err());
    assert_path_exists(&file);
}

//! Existence, metadata and create/delete scenarios

use crate::modules::files::helpers::APP_JS;
use crate::modules::files::{assert_file_not_exists, assert_is_directory, TestEnvironment};
use std::path::Path;

#[tokio::test]
async fn test_name() {
    let env = TestEnvironment::new().await;
    let file = env.fs().get_file(["app.js"]);

    assert_eq!(file.name(), "app.js");
}

#[tokio::test]
async fn test_native_path_and_resolve() {
    let env = TestEnvironment::new().await;
    let file = env.fs().get_file(["app.js"]);

    assert_eq!(Path::new(&file.native_path()), env.resources_path("app.js"));
    let resolved = file.resolve();
    assert!(Path::new(&resolved).is_absolute());
    assert_eq!(Path::new(&resolved), env.resources_path("app.js"));
}

#[tokio::test]
async fn test_boolean_metadata_on_bundled_file() {
    let env = TestEnvironment::new().await;
    let file = env.fs().get_file(["app.js"]);

    assert!(!file.executable().await);
    assert!(!file.hidden().await);
    assert!(!file.readonly().await);
    assert!(file.writable().await);
    assert!(!file.symbolic_link().await);
}

#[tokio::test]
async fn test_parent() {
    let env = TestEnvironment::new().await;
    let file = env.fs().get_file(["app.js"]);

    let parent = file.parent().expect("app.js should have a parent");
    assert_eq!(parent.path(), env.resources_path(""));
    assert!(parent.is_directory().await);
}

#[tokio::test]
async fn test_size() {
    let env = TestEnvironment::new().await;
    let file = env.fs().get_file(["app.js"]);

    assert_eq!(file.size().await, APP_JS.len() as u64);
    assert!(file.size().await > 0);
}

#[tokio::test]
async fn test_exists() {
    let env = TestEnvironment::new().await;

    assert!(env.fs().get_file(["app.js"]).exists().await);
    assert!(!env.fs().get_file(["appp.js"]).exists().await);
}

#[tokio::test]
async fn test_is_file() {
    let env = TestEnvironment::new().await;

    let file = env.fs().get_file(["app.js"]);
    assert!(file.exists().await);
    assert!(file.is_file().await);

    let missing = env.fs().get_file(["appp.js"]);
    assert!(!missing.exists().await);
    assert!(!missing.is_file().await);

    let dir = env.fs().get_file([env.fs().resources_directory()]);
    assert!(!dir.is_file().await);
}

#[tokio::test]
async fn test_is_directory() {
    let env = TestEnvironment::new().await;

    let dir = env.fs().get_file([env.fs().resources_directory()]);
    assert!(dir.is_directory().await);

    assert!(!env.fs().get_file(["app.js"]).is_directory().await);
    assert!(!env.fs().get_file(["appp"]).is_directory().await);
}

#[tokio::test]
async fn test_timestamps() {
    let env = TestEnvironment::new().await;
    let file = env.fs().get_file(["app.js"]);

    // Creation time is optional per platform and filesystem
    assert!(file.create_timestamp().await >= 0);
    assert!(file.modification_timestamp().await > 0);
}

#[tokio::test]
async fn test_modification_timestamp_is_epoch_millis() {
    let env = TestEnvironment::new().await;
    let path = env.create_data_file("dated.txt", "x");
    let mtime = filetime::FileTime::from_unix_time(1_600_000_000, 500_000_000);
    filetime::set_file_mtime(&path, mtime).unwrap();

    let file = env.fs().get_file([path.to_string_lossy()]);
    assert_eq!(file.modification_timestamp().await, 1_600_000_000_500);
}

#[tokio::test]
async fn test_create_and_delete_directory() {
    let env = TestEnvironment::new().await;
    let new_dir = env
        .fs()
        .get_file([env.fs().application_data_directory().as_str(), "mydir"]);

    assert!(!new_dir.exists().await);
    assert!(new_dir.create_directory().await);
    assert!(new_dir.exists().await);
    assert!(new_dir.delete_directory(false).await);
    assert!(!new_dir.exists().await);
}

#[tokio::test]
async fn test_delete_directory_recursive() {
    let env = TestEnvironment::new().await;
    let fs = env.fs();

    let dir = fs.get_file([fs.application_data_directory().as_str(), "testDir"]);
    assert!(!dir.exists().await);
    assert!(dir.create_directory().await);
    assert!(dir.exists().await);

    let file = fs.get_file([dir.resolve().as_str(), "test.txt"]);
    assert!(!file.exists().await);
    assert!(file.write("Appcelerator", false).await);
    assert!(file.exists().await);

    let sub_dir = fs.get_file([dir.resolve().as_str(), "subDir"]);
    assert!(!sub_dir.exists().await);
    assert!(sub_dir.create_directory().await);
    assert!(sub_dir.exists().await);

    let sub_file = fs.get_file([sub_dir.resolve().as_str(), "subTest.txt"]);
    assert!(!sub_file.exists().await);
    assert!(sub_file.write("Appcelerator", false).await);
    assert!(sub_file.exists().await);

    assert!(!dir.delete_directory(false).await);
    assert!(dir.exists().await);

    assert!(dir.delete_directory(true).await);
    assert!(!dir.exists().await);
    assert_file_not_exists(env.data_path("testDir"));
}

#[tokio::test]
async fn test_create_file_and_delete_file() {
    let env = TestEnvironment::new().await;
    let new_file = env
        .fs()
        .get_file([env.fs().resources_directory().as_str(), "myfile"]);

    assert!(!new_file.exists().await);
    assert!(new_file.create_file().await);
    assert!(new_file.exists().await);
    assert_eq!(new_file.size().await, 0);
    assert!(new_file.delete_file().await);
    assert!(!new_file.exists().await);
}

#[tokio::test]
async fn test_read() {
    let env = TestEnvironment::new().await;
    let file = env
        .fs()
        .get_file([env.fs().resources_directory().as_str(), "app.js"]);

    assert!(file.exists().await);
    let blob = file.read().await.unwrap();
    assert!(blob.size() > 0);
    assert!(!blob.text().is_empty());
    assert_eq!(blob.text(), APP_JS);
}

#[tokio::test]
async fn test_create_directory_is_recursive() {
    let env = TestEnvironment::new().await;
    let dir = env.fs().get_file([
        env.fs().application_data_directory().as_str(),
        "sub",
        "dir2",
    ]);

    assert!(!dir.exists().await);
    assert!(dir.create_directory().await);
    assert!(dir.exists().await);
    assert_is_directory(env.data_path("sub"));

    assert!(dir.delete_directory(false).await);
    assert!(!dir.exists().await);
    assert_is_directory(env.data_path("sub"));
}

#[tokio::test]
async fn test_create_directory_on_existing_path_fails() {
    let env = TestEnvironment::new().await;
    let dir = env.fs().get_file([env.fs().application_data_directory()]);

    assert!(dir.exists().await);
    assert!(!dir.create_directory().await);
}

#[cfg(unix)]
#[tokio::test]
async fn test_symbolic_link_and_hidden() {
    let env = TestEnvironment::new().await;
    let link_path = env.data_path(".app-link.js");
    std::os::unix::fs::symlink(env.resources_path("app.js"), &link_path).unwrap();

    let link = env.fs().get_file([link_path.to_string_lossy()]);
    assert!(link.symbolic_link().await);
    assert!(link.hidden().await);
    assert!(link.is_file().await);

    assert!(link.delete_file().await);
    assert!(env.resources_path("app.js").exists());
}

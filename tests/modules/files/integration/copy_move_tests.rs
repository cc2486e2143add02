//! Copy, move, streams, free space and listings

use crate::modules::files::helpers::APP_JS;
use crate::modules::files::{
    assert_file_exists, assert_file_not_exists, assert_files_equal, TestEnvironment,
};
use appfs::{FileError, FileMode, Filesystem};

fn data_path_string(fs: &Filesystem, name: &str) -> String {
    format!(
        "{}{}{}",
        fs.application_data_directory(),
        Filesystem::SEPARATOR,
        name
    )
}

#[tokio::test]
async fn test_open_read_stream() {
    let env = TestEnvironment::new().await;
    let file = env
        .fs()
        .get_file([env.fs().resources_directory().as_str(), "app.js"]);
    assert!(file.exists().await);

    let mut stream = file.open(Filesystem::MODE_READ).await.unwrap();
    assert!(stream.is_open());
    assert!(stream.is_readable());
    assert_eq!(stream.read_to_end().await.unwrap().text(), APP_JS);
    stream.close().await.unwrap();

    assert!(!stream.is_open());
    assert!(matches!(
        stream.read_to_end().await,
        Err(FileError::StreamClosed { .. })
    ));
}

#[tokio::test]
async fn test_open_read_stream_on_missing_file_fails() {
    let env = TestEnvironment::new().await;
    let file = env.fs().get_file(["appp.js"]);

    let err = file.open(FileMode::Read).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_append_stream() {
    let env = TestEnvironment::new().await;
    let file = env.fs().get_file(["appdata://stream.txt"]);
    assert!(file.write("Appcelerator", false).await);

    let mut stream = file.open(Filesystem::MODE_APPEND).await.unwrap();
    stream.write(b"Titanium").await.unwrap();
    stream.close().await.unwrap();

    assert_eq!(file.read().await.unwrap().text(), "AppceleratorTitanium");
}

#[tokio::test]
async fn test_space_available() {
    let env = TestEnvironment::new().await;
    let file = env
        .fs()
        .get_file([env.fs().resources_directory().as_str(), "app.js"]);

    assert!(file.exists().await);
    assert!(file.space_available().await > 0);
}

#[tokio::test]
async fn test_copy() {
    let env = TestEnvironment::new().await;
    let file = env
        .fs()
        .get_file([env.fs().resources_directory().as_str(), "app.js"]);
    assert!(file.exists().await);

    let new_path = data_path_string(env.fs(), "app.js");
    assert!(file.copy(&new_path).await);
    assert!(file.exists().await);

    let dest = env.fs().get_file([new_path.as_str()]);
    assert!(dest.exists().await);
    assert_files_equal(env.resources_path("app.js"), env.data_path("app.js")).unwrap();

    assert!(dest.delete_file().await);
    assert!(!dest.exists().await);
}

#[tokio::test]
async fn test_copy_move() {
    let env = TestEnvironment::new().await;
    let file = env
        .fs()
        .get_file([env.fs().resources_directory().as_str(), "app.js"]);
    assert!(file.exists().await);

    let dest1 = data_path_string(env.fs(), "app.js");
    let dest2 = data_path_string(env.fs(), "appp.js");

    assert!(file.copy(&dest1).await);

    let copy = env.fs().get_file([dest1.as_str()]);
    assert!(copy.exists().await);
    assert!(copy.move_to(&dest2).await);
    assert!(!copy.exists().await);

    let moved = env.fs().get_file([dest2.as_str()]);
    assert!(moved.exists().await);
    assert_eq!(moved.read().await.unwrap().text(), APP_JS);
    assert!(moved.delete_file().await);
    assert!(!moved.exists().await);
}

#[tokio::test]
async fn test_copy_missing_source_fails() {
    let env = TestEnvironment::new().await;
    let missing = env.fs().get_file(["appp.js"]);

    assert!(!missing.copy(data_path_string(env.fs(), "appp.js")).await);
    assert_file_not_exists(env.data_path("appp.js"));
}

#[tokio::test]
async fn test_copy_overwrites_existing_destination() {
    let env = TestEnvironment::new().await;
    let stale = env.create_data_file("app.js", "stale");
    let file = env.fs().get_file(["app.js"]);

    assert!(file.copy(&stale).await);
    assert_files_equal(env.resources_path("app.js"), &stale).unwrap();
}

#[tokio::test]
async fn test_rename_in_place() {
    let env = TestEnvironment::new().await;
    env.create_data_file("draft.txt", "text");
    let draft = env.fs().get_file(["appdata://draft.txt"]);

    assert!(draft.rename("final.txt").await);
    assert!(!draft.exists().await);
    assert_file_exists(env.data_path("final.txt"));
}

#[tokio::test]
async fn test_directory_listing() {
    let env = TestEnvironment::new().await;
    let dir = env.fs().get_file([env.fs().resources_directory()]);
    assert!(dir.exists().await);

    let files = dir.directory_listing().await;
    assert_eq!(files, vec!["app.js".to_string()]);
}

#[tokio::test]
async fn test_directory_listing_is_not_recursive() {
    let env = TestEnvironment::new().await;
    env.create_data_file("top.txt", "1");
    env.create_data_file("nested/deep.txt", "2");

    let mut names = env
        .fs()
        .get_file([env.fs().application_data_directory()])
        .directory_listing()
        .await;
    names.sort();
    assert_eq!(names, vec!["nested".to_string(), "top.txt".to_string()]);
}

#[tokio::test]
async fn test_directory_listing_of_missing_directory_is_empty() {
    let env = TestEnvironment::new().await;
    let missing = env.fs().get_file(["appdata://nowhere"]);

    assert!(missing.directory_listing().await.is_empty());
}

#[tokio::test]
async fn test_temp_file_lives_under_temp_directory() {
    let env = TestEnvironment::new().await;
    let temp = env.fs().create_temp_file().await.unwrap();

    assert!(temp.path().starts_with(env.root().join("tmp")));
    assert!(temp.write("scratch", false).await);
    assert!(temp.delete_file().await);
}

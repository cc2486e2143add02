//! Property-based tests for write and append

use appfs::{FileHandle, Filesystem, FilesystemConfig};
use proptest::prelude::*;
use tempfile::TempDir;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn sandbox() -> (TempDir, Filesystem) {
    let temp_dir = TempDir::new().unwrap();
    let fs = Filesystem::new(FilesystemConfig::rooted_at(temp_dir.path()));
    (temp_dir, fs)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_write_then_read_is_identity(content in ".{0,256}") {
        let (_temp_dir, fs) = sandbox();
        let read_back = runtime().block_on(async {
            fs.ensure_directories().await.unwrap();
            let file = fs.get_file(["appdata://prop.txt"]);
            assert!(file.write(content.as_str(), false).await);
            file.read().await.unwrap().text().into_owned()
        });
        prop_assert_eq!(read_back, content);
    }

    #[test]
    fn prop_append_concatenates(first in ".{0,128}", second in ".{0,128}") {
        let (_temp_dir, fs) = sandbox();
        let read_back = runtime().block_on(async {
            fs.ensure_directories().await.unwrap();
            let file = fs.get_file(["appdata://prop.txt"]);
            assert!(file.write(first.as_str(), false).await);
            assert!(file.append(second.as_str()).await);
            file.read().await.unwrap().text().into_owned()
        });
        prop_assert_eq!(read_back, format!("{first}{second}"));
    }

    #[test]
    fn prop_bytes_survive_blob_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let (_temp_dir, fs) = sandbox();
        let read_back = runtime().block_on(async {
            fs.ensure_directories().await.unwrap();
            let file = fs.get_file(["temp://blob.bin"]);
            assert!(file.write(appfs::Blob::new(bytes.clone()), false).await);
            file.read().await.unwrap().into_bytes()
        });
        prop_assert_eq!(read_back, bytes);
    }

    #[test]
    fn prop_copy_preserves_content(content in ".{0,256}") {
        let (_temp_dir, fs) = sandbox();
        let copied = runtime().block_on(async {
            fs.ensure_directories().await.unwrap();
            let source = fs.get_file(["appdata://source.txt"]);
            assert!(source.write(content.as_str(), false).await);
            let destination: FileHandle = fs.get_file(["temp://copy.txt"]);
            assert!(source.copy(destination.path()).await);
            destination.read().await.unwrap().text().into_owned()
        });
        prop_assert_eq!(copied, content);
    }
}

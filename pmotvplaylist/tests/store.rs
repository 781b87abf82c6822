//! Tests du lecteur de fichier de playlist.

use pmotvplaylist::{Error, PlaylistStore};

#[tokio::test]
async fn test_read_missing_file_reports_playlist_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = PlaylistStore::new(dir.path().join("playlist.m3u"));

    assert!(!store.exists().await);
    match store.read().await {
        Err(Error::PlaylistMissing(path)) => {
            assert!(path.contains("playlist.m3u"), "unexpected path: {path}")
        }
        other => panic!("expected PlaylistMissing, got {other:?}"),
    }
}

#[tokio::test]
async fn test_read_returns_file_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playlist.m3u");
    let content = "#EXTM3U\n#EXTINF:-1,Chaîne Une\nhttp://example.com/one\n";
    std::fs::write(&path, content).unwrap();

    let store = PlaylistStore::new(&path);
    assert!(store.exists().await);
    assert_eq!(store.read().await.unwrap(), content);
}

#[tokio::test]
async fn test_open_missing_file_reports_playlist_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = PlaylistStore::new(dir.path().join("absent.m3u"));

    assert!(matches!(
        store.open().await,
        Err(Error::PlaylistMissing(_))
    ));
}

#[test]
fn test_file_name_uses_last_path_component() {
    let store = PlaylistStore::new("/var/lib/pmotv/channels/fr.m3u");
    assert_eq!(store.file_name(), "fr.m3u");
}

#[test]
fn test_file_name_falls_back_for_bare_directory() {
    let store = PlaylistStore::new("..");
    assert_eq!(store.file_name(), "playlist.m3u");
}

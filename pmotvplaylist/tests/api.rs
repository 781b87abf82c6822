//! Tests HTTP de la façade playlist, sur un vrai serveur lié à un port éphémère.

#![cfg(feature = "server")]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use pmotvplaylist::{create_router, PlaylistFacadeState, PlaylistStore, UpdateRunner};

const PLAYLIST_NOT_FOUND: &str = "Playlist not found. Please run /update first";

/// Écrit un script shell dans `dir` et retourne la ligne de commande `sh <script> <args>`.
fn shell_command(dir: &Path, name: &str, body: &str, args: &[&str]) -> String {
    let script = dir.join(name);
    std::fs::write(&script, body).unwrap();
    let mut command = format!("sh {}", script.display());
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}

fn facade(playlist: &Path, command: &str, timeout: Option<Duration>) -> PlaylistFacadeState {
    let store = Arc::new(PlaylistStore::new(playlist));
    let updater = Arc::new(UpdateRunner::new(command, timeout).unwrap());
    PlaylistFacadeState::new(store, updater)
}

/// Démarre la façade sur un port éphémère et retourne son URL de base.
async fn serve(state: PlaylistFacadeState) -> String {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn get_json(url: &str) -> (reqwest::StatusCode, serde_json::Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status();
    let body = resp.text().await.unwrap();
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint_reports_running() {
    let dir = tempfile::tempdir().unwrap();
    let state = facade(&dir.path().join("playlist.m3u"), "true", None);
    let base = serve(state).await;

    let resp = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(resp.text().await.unwrap(), "Server is running");
}

#[tokio::test]
async fn test_missing_playlist_returns_404_on_read_and_download() {
    let dir = tempfile::tempdir().unwrap();
    let state = facade(&dir.path().join("playlist.m3u"), "true", None);
    let base = serve(state).await;

    for route in ["/playlist", "/download"] {
        let resp = reqwest::get(format!("{base}{route}")).await.unwrap();
        assert_eq!(resp.status(), 404, "route {route}");
        assert_eq!(resp.text().await.unwrap(), PLAYLIST_NOT_FOUND, "route {route}");
    }
}

#[tokio::test]
async fn test_update_then_read_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let playlist = dir.path().join("playlist.m3u");
    let command = shell_command(
        dir.path(),
        "update.sh",
        "#!/bin/sh\nprintf '#EXTM3U\\n#EXTINF:-1,Chaine Une\\nhttp://example.com/one\\n' > \"$1\"\necho updated\n",
        &[&playlist.display().to_string()],
    );
    let state = facade(&playlist, &command, None);
    let base = serve(state).await;

    let (status, body) = get_json(&format!("{base}/update")).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["output"], "updated\n");

    let resp = reqwest::get(format!("{base}/playlist")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.text().await.unwrap(),
        "#EXTM3U\n#EXTINF:-1,Chaine Une\nhttp://example.com/one\n"
    );
}

#[tokio::test]
async fn test_download_serves_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let playlist = dir.path().join("playlist.m3u");
    let content = "#EXTM3U\n#EXTINF:-1,Chaine Une\nhttp://example.com/one\n";
    std::fs::write(&playlist, content).unwrap();

    let state = facade(&playlist, "true", None);
    let base = serve(state).await;

    let resp = reqwest::get(format!("{base}/download")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "audio/x-mpegurl"
    );
    assert_eq!(
        resp.headers()["content-disposition"].to_str().unwrap(),
        "attachment; filename=\"playlist.m3u\""
    );
    assert_eq!(resp.bytes().await.unwrap(), content.as_bytes());
}

#[tokio::test]
async fn test_failed_update_returns_500_and_preserves_playlist() {
    let dir = tempfile::tempdir().unwrap();
    let playlist = dir.path().join("playlist.m3u");
    let content = "#EXTM3U\nhttp://example.com/old\n";
    std::fs::write(&playlist, content).unwrap();

    let state = facade(&playlist, "false", None);
    let base = serve(state).await;

    let (status, body) = get_json(&format!("{base}/update")).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Update failed");

    // L'échec de la commande laisse le fichier servi intact
    assert_eq!(std::fs::read_to_string(&playlist).unwrap(), content);
}

#[tokio::test]
async fn test_unspawnable_update_returns_500() {
    let dir = tempfile::tempdir().unwrap();
    let state = facade(
        &dir.path().join("playlist.m3u"),
        "/nonexistent/pmotv-update-xyz",
        None,
    );
    let base = serve(state).await;

    let (status, body) = get_json(&format!("{base}/update")).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Update failed");
}

#[tokio::test]
async fn test_slow_update_returns_timeout_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = facade(
        &dir.path().join("playlist.m3u"),
        "sleep 5",
        Some(Duration::from_millis(200)),
    );
    let base = serve(state).await;

    let (status, body) = get_json(&format!("{base}/update")).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Update timed out");
}

#[tokio::test]
async fn test_concurrent_updates_share_one_execution() {
    let dir = tempfile::tempdir().unwrap();
    let playlist = dir.path().join("playlist.m3u");
    let counter = dir.path().join("count.txt");
    let command = shell_command(
        dir.path(),
        "update.sh",
        "#!/bin/sh\necho run >> \"$1\"\nsleep 1\nprintf '#EXTM3U\\n' > \"$2\"\necho done\n",
        &[&counter.display().to_string(), &playlist.display().to_string()],
    );
    let state = facade(&playlist, &command, None);
    let base = serve(state).await;

    let url = format!("{base}/update");
    let (a, b) = tokio::join!(get_json(&url), get_json(&url));

    for (status, body) in [a, b] {
        assert_eq!(status, 200);
        assert_eq!(body["status"], "success");
        assert_eq!(body["output"], "done\n");
    }

    // Les deux requêtes ont partagé la même exécution de la commande
    let runs = std::fs::read_to_string(&counter).unwrap();
    assert_eq!(runs.lines().count(), 1);
}

//! Routes HTTP de la façade playlist.
//!
//! Quatre routes, toutes en `GET` : la racine répond un message de vie,
//! `/update` relance la commande externe, `/playlist` renvoie le contenu
//! du fichier et `/download` le propose en pièce jointe.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio_util::io::ReaderStream;
use tracing::{error, warn};

use crate::models::{ErrorResponse, UpdateResponse};
use crate::pmotvserver_ext::PlaylistFacadeState;
use crate::updater::UpdateOutcome;

const HEALTH_MESSAGE: &str = "Server is running";
const PLAYLIST_NOT_FOUND: &str = "Playlist not found. Please run /update first";
const UPDATE_FAILED: &str = "Update failed";
const UPDATE_TIMED_OUT: &str = "Update timed out";
const DOWNLOAD_ERROR: &str = "Error downloading file";

/// Type MIME des playlists M3U.
const M3U_CONTENT_TYPE: &str = "audio/x-mpegurl";

/// Crée le routeur de la façade playlist.
pub fn create_router(state: PlaylistFacadeState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/update", get(run_update))
        .route("/playlist", get(read_playlist))
        .route("/download", get(download_playlist))
        .with_state(state)
}

/// Message de vie du serveur.
#[utoipa::path(
    get,
    path = "/",
    tag = "playlist",
    responses(
        (status = 200, description = "Le serveur est opérationnel", body = String)
    )
)]
pub(crate) async fn health() -> &'static str {
    HEALTH_MESSAGE
}

/// Lance la commande de mise à jour de la playlist.
///
/// Si une mise à jour est déjà en cours, la requête attend son résultat
/// au lieu d'en lancer une deuxième.
#[utoipa::path(
    get,
    path = "/update",
    tag = "playlist",
    responses(
        (status = 200, description = "Mise à jour effectuée", body = UpdateResponse),
        (status = 500, description = "Échec ou dépassement du délai de la commande", body = ErrorResponse)
    )
)]
pub(crate) async fn run_update(State(state): State<PlaylistFacadeState>) -> Response {
    match state.updater.run().await {
        UpdateOutcome::Success { stdout } => (
            StatusCode::OK,
            Json(UpdateResponse {
                status: "success".to_string(),
                output: stdout,
            }),
        )
            .into_response(),
        UpdateOutcome::TimedOut { limit } => {
            warn!(?limit, "Mise à jour abandonnée, délai dépassé");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: UPDATE_TIMED_OUT.to_string(),
                }),
            )
                .into_response()
        }
        UpdateOutcome::Failed { .. } | UpdateOutcome::SpawnError { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: UPDATE_FAILED.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Renvoie le contenu de la playlist.
#[utoipa::path(
    get,
    path = "/playlist",
    tag = "playlist",
    responses(
        (status = 200, description = "Contenu du fichier de playlist", body = String),
        (status = 404, description = "La playlist n'a pas encore été générée", body = String)
    )
)]
pub(crate) async fn read_playlist(State(state): State<PlaylistFacadeState>) -> Response {
    match state.store.read().await {
        Ok(content) => content.into_response(),
        Err(e) => {
            warn!(path = %state.store.path().display(), error = %e, "Playlist indisponible");
            (StatusCode::NOT_FOUND, PLAYLIST_NOT_FOUND).into_response()
        }
    }
}

/// Télécharge la playlist en pièce jointe.
#[utoipa::path(
    get,
    path = "/download",
    tag = "playlist",
    responses(
        (status = 200, description = "Fichier de playlist en pièce jointe", body = String),
        (status = 404, description = "La playlist n'a pas encore été générée", body = String),
        (status = 500, description = "Le fichier n'a pas pu être lu", body = String)
    )
)]
pub(crate) async fn download_playlist(State(state): State<PlaylistFacadeState>) -> Response {
    if !state.store.exists().await {
        return (StatusCode::NOT_FOUND, PLAYLIST_NOT_FOUND).into_response();
    }

    match state.store.open().await {
        Ok(file) => {
            let body = Body::from_stream(ReaderStream::new(file));
            let headers = [
                (header::CONTENT_TYPE, M3U_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", state.store.file_name()),
                ),
            ];
            (headers, body).into_response()
        }
        Err(e) => {
            error!(path = %state.store.path().display(), error = %e, "Échec de l'envoi de la playlist");
            (StatusCode::INTERNAL_SERVER_ERROR, DOWNLOAD_ERROR).into_response()
        }
    }
}

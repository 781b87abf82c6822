//! Documentation OpenAPI de l'API playlist.

use utoipa::OpenApi;

/// Documentation OpenAPI de la façade playlist.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PMOTV Playlist API",
        version = env!("CARGO_PKG_VERSION"),
        description = "API de consultation et de mise à jour de la playlist IPTV"
    ),
    paths(
        crate::api_rest::health,
        crate::api_rest::run_update,
        crate::api_rest::read_playlist,
        crate::api_rest::download_playlist,
    ),
    components(schemas(crate::models::UpdateResponse, crate::models::ErrorResponse)),
    tags(
        (name = "playlist", description = "Consultation et mise à jour de la playlist")
    )
)]
pub struct ApiDoc;

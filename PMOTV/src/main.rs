use pmotvplaylist::PlaylistFacadeExt;
use pmotvserver::ServerBuilder;
use pmotvserver::logs::{LoggingOptions, LogsApiDoc};
use tracing::info;
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ========== PHASE 1 : Configuration et journalisation ==========

    let mut server = ServerBuilder::new_configured().build();
    server.init_logging(LoggingOptions::from_config()).await;

    // ========== PHASE 2 : Façade playlist et APIs ==========

    info!("⚙️ Registering configuration API...");
    let config = pmotvconfig::get_config();
    server
        .add_router("/", pmotvconfig::api::create_router(config))
        .await;

    info!("📺 Initializing playlist facade...");
    let facade = server.init_playlist_facade().await?;
    info!(
        "✅ Playlist facade ready, serving {}",
        facade.store.path().display()
    );

    // Route d'information sur la version
    server
        .add_route("/info", || async {
            serde_json::json!({"version": env!("CARGO_PKG_VERSION")})
        })
        .await;

    // Documentation Swagger de chaque API
    info!("📚 Registering API documentation...");
    server
        .add_openapi(pmotvplaylist::ApiDoc::openapi(), "playlist")
        .await;
    server
        .add_openapi(pmotvconfig::ApiDoc::openapi(), "config")
        .await;
    server.add_openapi(LogsApiDoc::openapi(), "logs").await;

    // ========== PHASE 3 : Démarrage du serveur ==========

    info!("🌐 Starting HTTP server...");
    server.start().await?;

    let server_info = server.info();
    info!(
        "✅ PMOTV is ready at http://{}:{}",
        server_info.base_url, server_info.http_port
    );
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}

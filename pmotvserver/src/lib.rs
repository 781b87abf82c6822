//! # pmotvserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple et ergonomique pour créer des serveurs HTTP
//! avec Axum, spécialement conçue pour les services PMOTV.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **API de haut niveau** : Interface simple pour créer des serveurs HTTP avec Axum
//! - 📡 **Server-Sent Events (SSE)** : Support intégré pour les logs en temps réel via SSE
//! - 📚 **Documentation OpenAPI** : Génération automatique de Swagger UI
//! - ⚙️ **Configuration intégrée** : Port et base URL lus depuis `pmotvconfig`
//! - ⚡ **Arrêt gracieux** : Gestion propre de l'arrêt sur Ctrl+C
//!
//! ## Architecture
//!
//! La crate est organisée en plusieurs modules :
//!
//! - [`server`] : Implémentation du serveur principal et du builder
//! - [`logs`] : Système de logs SSE pour monitoring en temps réel
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use pmotvserver::ServerBuilder;
//! use pmotvserver::logs::LoggingOptions;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Création du serveur depuis la configuration
//!     let mut server = ServerBuilder::new_configured().build();
//!
//!     // Logs SSE + console
//!     server.init_logging(LoggingOptions::from_config()).await;
//!
//!     // Ajout d'une route JSON
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     // Démarrage
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LogState, SseLayer, log_dump, log_sse};
pub use server::{Server, ServerBuilder, ServerInfo};

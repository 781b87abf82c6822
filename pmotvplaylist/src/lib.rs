//! # pmotvplaylist - Façade HTTP pour une playlist IPTV maintenue en externe
//!
//! Cette crate fournit la façade playlist de PMOTV avec :
//! - Lecture du fichier M3U produit par la commande de mise à jour
//! - Lancement de la commande externe, sans shell, avec délai maximal
//! - Partage des exécutions : une seule mise à jour à la fois
//! - Routes HTTP `/`, `/update`, `/playlist` et `/download`
//!
//! # Architecture
//!
//! - **PlaylistStore** : Lecture du fichier de playlist sur disque
//! - **UpdateRunner** : Exécution partagée de la commande de mise à jour
//! - **PlaylistFacadeExt** : Extension de `pmotvserver::Server` enregistrant les routes
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use pmotvplaylist::{PlaylistStore, UpdateRunner, UpdateOutcome};
//!
//! # #[tokio::main]
//! # async fn main() -> pmotvplaylist::Result<()> {
//! let store = PlaylistStore::new("playlist.m3u");
//! let updater = UpdateRunner::new("python3 update_playlist.py", None)?;
//!
//! // Lancer (ou rejoindre) une mise à jour
//! if let UpdateOutcome::Success { stdout } = updater.run().await {
//!     println!("Mise à jour : {stdout}");
//! }
//!
//! // Lire la playlist produite
//! let content = store.read().await?;
//! println!("{content}");
//! # Ok(())
//! # }
//! ```

mod error;
mod store;
mod updater;

#[cfg(feature = "pmotvconfig")]
mod config_ext;

#[cfg(feature = "server")]
mod api_rest;
#[cfg(feature = "server")]
mod models;
#[cfg(feature = "server")]
mod openapi;
#[cfg(feature = "server")]
mod pmotvserver_ext;
#[cfg(feature = "server")]
mod pmotvserver_impl;

// Réexports publics
pub use error::{Error, Result};
pub use store::PlaylistStore;
pub use updater::{UpdateOutcome, UpdateRunner};

#[cfg(feature = "pmotvconfig")]
pub use config_ext::{
    PlaylistConfigExt, DEFAULT_PLAYLIST_FILE, DEFAULT_UPDATE_COMMAND, DEFAULT_UPDATE_TIMEOUT_SECS,
};

#[cfg(feature = "server")]
pub use api_rest::create_router;
#[cfg(feature = "server")]
pub use models::{ErrorResponse, UpdateResponse};
#[cfg(feature = "server")]
pub use openapi::ApiDoc;
#[cfg(feature = "server")]
pub use pmotvserver_ext::{PlaylistFacadeExt, PlaylistFacadeState};

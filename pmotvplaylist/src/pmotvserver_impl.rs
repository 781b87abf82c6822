//! Implémentation du trait PlaylistFacadeExt pour pmotvserver::Server
//!
//! Ce module enrichit `pmotvserver::Server` avec la façade playlist en
//! implémentant le trait [`PlaylistFacadeExt`](crate::PlaylistFacadeExt).
//!
//! ## Architecture
//!
//! `pmotvplaylist` étend `pmotvserver::Server` sans que `pmotvserver`
//! connaisse `pmotvplaylist`. C'est le pattern d'extension : on ajoute des
//! fonctionnalités à un type externe via un trait.
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use pmotvplaylist::PlaylistFacadeExt;
//! use pmotvserver::ServerBuilder;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut server = ServerBuilder::new_configured().build();
//!
//! // Le trait PlaylistFacadeExt est automatiquement disponible
//! let state = server.init_playlist_facade().await?;
//!
//! server.start().await?;
//! # Ok(())
//! # }
//! ```

use crate::api_rest::create_router;
use crate::config_ext::PlaylistConfigExt;
use crate::pmotvserver_ext::{PlaylistFacadeExt, PlaylistFacadeState};
use crate::store::PlaylistStore;
use crate::updater::UpdateRunner;
use anyhow::Result;
use pmotvserver::Server;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

impl PlaylistFacadeExt for Server {
    async fn init_playlist_facade(&mut self) -> Result<PlaylistFacadeState> {
        info!("Initializing playlist facade...");

        // Lire les réglages de la façade dans la configuration
        let config = pmotvconfig::get_config();
        let playlist_file = config.get_playlist_file()?;
        let command = config.get_update_command()?;
        let timeout = match config.get_update_timeout_secs()? {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        // Créer l'état partagé
        let store = Arc::new(PlaylistStore::new(&playlist_file));
        let updater = Arc::new(UpdateRunner::new(&command, timeout)?);
        let state = PlaylistFacadeState::new(store, updater);

        // Créer et enregistrer le router à la racine
        let router = create_router(state.clone());
        self.add_router("/", router).await;

        info!(playlist_file = %playlist_file, command = %command, "Playlist facade initialized");
        info!("Facade endpoints available at /, /update, /playlist and /download");

        Ok(state)
    }
}

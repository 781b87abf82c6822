//! Extension pmotvserver pour la façade playlist
//!
//! Ce module fournit un trait d'extension pour ajouter les routes de la
//! façade playlist à un serveur pmotvserver.

use anyhow::Result;
use std::sync::Arc;

use crate::store::PlaylistStore;
use crate::updater::UpdateRunner;

/// État partagé pour les handlers de la façade playlist
#[derive(Clone)]
pub struct PlaylistFacadeState {
    pub store: Arc<PlaylistStore>,
    pub updater: Arc<UpdateRunner>,
}

impl PlaylistFacadeState {
    pub fn new(store: Arc<PlaylistStore>, updater: Arc<UpdateRunner>) -> Self {
        Self { store, updater }
    }
}

/// Trait pour étendre pmotvserver avec la façade playlist
///
/// Ce trait permet à `pmotvplaylist` d'ajouter des méthodes d'extension sur
/// `pmotvserver::Server` sans que pmotvserver dépende de pmotvplaylist.
///
/// # Architecture
///
/// - `pmotvserver` définit un serveur HTTP générique
/// - `pmotvplaylist` étend ce serveur avec la façade playlist via ce trait
/// - Le serveur n'a pas besoin de connaître `pmotvplaylist`
///
/// # Exemple
///
/// ```rust,no_run
/// use pmotvplaylist::PlaylistFacadeExt;
/// use pmotvserver::ServerBuilder;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut server = ServerBuilder::new_configured().build();
///
///     // Initialise la façade playlist
///     server.init_playlist_facade().await?;
///
///     server.start().await?;
///     server.wait().await;
///     Ok(())
/// }
/// ```
pub trait PlaylistFacadeExt {
    /// Initialise la façade playlist et enregistre les routes HTTP
    ///
    /// Cette méthode :
    /// - Lit le fichier servi, la commande et le délai dans la configuration
    /// - Crée le lecteur de playlist et le lanceur de mise à jour
    /// - Enregistre les routes à la racine du serveur
    ///
    /// # Returns
    /// État partagé de la façade playlist
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /` - Message de vie du serveur
    /// - `GET /update` - Lance la commande de mise à jour
    /// - `GET /playlist` - Contenu du fichier de playlist
    /// - `GET /download` - Fichier de playlist en pièce jointe
    async fn init_playlist_facade(&mut self) -> Result<PlaylistFacadeState>;
}

// L'implémentation du trait est dans un module séparé (pmotvserver_impl.rs)
// pour éviter les dépendances circulaires

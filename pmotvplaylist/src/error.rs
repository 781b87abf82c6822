//! Erreurs du crate pmotvplaylist.

/// Erreurs pouvant survenir lors de la gestion de la playlist.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Le fichier de playlist n'existe pas encore.
    #[error("Playlist file not found: {0}")]
    PlaylistMissing(String),

    /// La commande de mise à jour configurée est vide.
    #[error("Update command is empty")]
    EmptyCommand,

    /// Erreur d'entrée/sortie.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Toute autre erreur.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias de `Result` utilisant [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

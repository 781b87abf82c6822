//! Accès au fichier de playlist sur disque.
//!
//! Le fichier est écrit par la commande de mise à jour externe, qui le
//! remplace de façon atomique (écriture dans un fichier temporaire puis
//! renommage). Ce module se contente donc de le lire : toute lecture voit
//! soit l'ancienne version complète, soit la nouvelle.

use std::path::{Path, PathBuf};

use tokio::fs::File;

use crate::error::{Error, Result};

/// Nom de fichier utilisé si le chemin configuré n'a pas de composante finale.
const FALLBACK_FILE_NAME: &str = "playlist.m3u";

/// Lecteur du fichier de playlist.
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    path: PathBuf,
}

impl PlaylistStore {
    /// Crée un lecteur pour le fichier donné.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Chemin complet du fichier de playlist.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Nom de base du fichier, utilisé pour l'en-tête `Content-Disposition`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
    }

    /// Indique si le fichier existe actuellement sur le disque.
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Lit le contenu complet du fichier.
    ///
    /// Retourne [`Error::PlaylistMissing`] si le fichier n'existe pas.
    pub async fn read(&self) -> Result<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::PlaylistMissing(self.path.display().to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Ouvre le fichier en lecture pour un transfert en streaming.
    pub async fn open(&self) -> Result<File> {
        match File::open(&self.path).await {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::PlaylistMissing(self.path.display().to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

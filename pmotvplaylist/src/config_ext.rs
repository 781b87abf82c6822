//! Extension pour intégrer la façade playlist dans pmotvconfig
//!
//! Ce module fournit le trait `PlaylistConfigExt` qui permet d'ajouter
//! des méthodes de gestion de la configuration playlist à pmotvconfig::Config.
//!
//! # Fonctionnalités
//!
//! - Chemin du fichier de playlist servi
//! - Ligne de commande de mise à jour externe
//! - Délai maximal d'exécution de la mise à jour
//!
//! # Exemple
//!
//! ```no_run
//! use pmotvconfig::get_config;
//! use pmotvplaylist::PlaylistConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//!
//! let file = config.get_playlist_file()?;
//! let command = config.get_update_command()?;
//! println!("Playlist {file}, mise à jour par `{command}`");
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use pmotvconfig::Config;
use serde_yaml::Value;

/// Default playlist file served by the facade
pub const DEFAULT_PLAYLIST_FILE: &str = "playlist.m3u";

/// Default external command refreshing the playlist
pub const DEFAULT_UPDATE_COMMAND: &str = "python3 update_playlist.py";

/// Default timeout for the update command (seconds, 0 = unlimited)
pub const DEFAULT_UPDATE_TIMEOUT_SECS: u64 = 300;

/// Trait d'extension pour gérer la configuration playlist dans pmotvconfig
///
/// Ce trait étend `pmotvconfig::Config` avec les réglages de la façade
/// playlist :
///
/// - Fichier servi
/// - Commande de mise à jour
/// - Délai maximal
///
/// # Auto-persist des valeurs par défaut
///
/// Les getters persistent automatiquement les valeurs par défaut dans la
/// configuration si elles n'existent pas encore.
pub trait PlaylistConfigExt {
    // ========================================================================
    // Playlist file
    // ========================================================================

    /// Récupère le chemin du fichier de playlist servi
    ///
    /// # Returns
    ///
    /// Le chemin configuré, ou `playlist.m3u` par défaut.
    fn get_playlist_file(&self) -> Result<String>;

    /// Définit le chemin du fichier de playlist servi
    fn set_playlist_file(&self, file: &str) -> Result<()>;

    // ========================================================================
    // Update command
    // ========================================================================

    /// Récupère la ligne de commande de mise à jour
    ///
    /// # Returns
    ///
    /// La commande configurée, ou `python3 update_playlist.py` par défaut.
    fn get_update_command(&self) -> Result<String>;

    /// Définit la ligne de commande de mise à jour
    fn set_update_command(&self, command: &str) -> Result<()>;

    // ========================================================================
    // Update timeout
    // ========================================================================

    /// Récupère le délai maximal de la commande de mise à jour (en secondes)
    ///
    /// # Returns
    ///
    /// Le délai en secondes (default: 300). `0` signifie aucun délai.
    fn get_update_timeout_secs(&self) -> Result<u64>;

    /// Définit le délai maximal de la commande de mise à jour (en secondes)
    fn set_update_timeout_secs(&self, timeout_secs: u64) -> Result<()>;
}

impl PlaylistConfigExt for Config {
    fn get_playlist_file(&self) -> Result<String> {
        match self.get_value(&["playlist", "file"]) {
            Ok(Value::String(file)) if !file.is_empty() => Ok(file),
            _ => {
                // Not set, use default and persist
                self.set_playlist_file(DEFAULT_PLAYLIST_FILE)?;
                Ok(DEFAULT_PLAYLIST_FILE.to_string())
            }
        }
    }

    fn set_playlist_file(&self, file: &str) -> Result<()> {
        self.set_value(&["playlist", "file"], Value::String(file.to_string()))
    }

    fn get_update_command(&self) -> Result<String> {
        match self.get_value(&["playlist", "update", "command"]) {
            Ok(Value::String(command)) if !command.is_empty() => Ok(command),
            _ => {
                self.set_update_command(DEFAULT_UPDATE_COMMAND)?;
                Ok(DEFAULT_UPDATE_COMMAND.to_string())
            }
        }
    }

    fn set_update_command(&self, command: &str) -> Result<()> {
        self.set_value(
            &["playlist", "update", "command"],
            Value::String(command.to_string()),
        )
    }

    fn get_update_timeout_secs(&self) -> Result<u64> {
        match self.get_value(&["playlist", "update", "timeout_secs"]) {
            Ok(Value::Number(n)) => {
                if let Some(timeout) = n.as_u64() {
                    Ok(timeout)
                } else {
                    // Invalid number, use default
                    self.set_update_timeout_secs(DEFAULT_UPDATE_TIMEOUT_SECS)?;
                    Ok(DEFAULT_UPDATE_TIMEOUT_SECS)
                }
            }
            _ => {
                self.set_update_timeout_secs(DEFAULT_UPDATE_TIMEOUT_SECS)?;
                Ok(DEFAULT_UPDATE_TIMEOUT_SECS)
            }
        }
    }

    fn set_update_timeout_secs(&self, timeout_secs: u64) -> Result<()> {
        self.set_value(
            &["playlist", "update", "timeout_secs"],
            Value::Number(serde_yaml::Number::from(timeout_secs)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        (dir, config)
    }

    #[test]
    fn test_defaults_come_from_embedded_config() {
        let (_dir, config) = test_config();

        assert_eq!(config.get_playlist_file().unwrap(), DEFAULT_PLAYLIST_FILE);
        assert_eq!(config.get_update_command().unwrap(), DEFAULT_UPDATE_COMMAND);
        assert_eq!(
            config.get_update_timeout_secs().unwrap(),
            DEFAULT_UPDATE_TIMEOUT_SECS
        );
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let (_dir, config) = test_config();

        config.set_playlist_file("channels/fr.m3u").unwrap();
        config.set_update_command("python3 refresh.py --fast").unwrap();
        config.set_update_timeout_secs(0).unwrap();

        assert_eq!(config.get_playlist_file().unwrap(), "channels/fr.m3u");
        assert_eq!(
            config.get_update_command().unwrap(),
            "python3 refresh.py --fast"
        );
        assert_eq!(config.get_update_timeout_secs().unwrap(), 0);
    }

    #[test]
    fn test_bad_type_falls_back_to_default() {
        let (_dir, config) = test_config();

        config
            .set_value(&["playlist", "file"], Value::Bool(true))
            .unwrap();
        assert_eq!(config.get_playlist_file().unwrap(), DEFAULT_PLAYLIST_FILE);

        // Le getter a re-persisté la valeur par défaut
        assert_eq!(
            config.get_value(&["playlist", "file"]).unwrap(),
            Value::String(DEFAULT_PLAYLIST_FILE.to_string())
        );
    }

    #[test]
    fn test_empty_command_falls_back_to_default() {
        let (_dir, config) = test_config();

        config.set_update_command("").unwrap();
        assert_eq!(config.get_update_command().unwrap(), DEFAULT_UPDATE_COMMAND);
    }
}

//! Structures de données de l'API playlist.

use serde::Serialize;
use utoipa::ToSchema;

/// Réponse renvoyée après une mise à jour réussie.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateResponse {
    /// Statut de la mise à jour, toujours `"success"`.
    pub status: String,
    /// Sortie standard de la commande de mise à jour.
    pub output: String,
}

/// Réponse d'erreur générique de l'API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Description de l'erreur.
    pub error: String,
}

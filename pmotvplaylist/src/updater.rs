//! Exécution de la commande externe de mise à jour de la playlist.
//!
//! La commande configurée (par défaut `python3 update_playlist.py`) est
//! lancée directement, sans shell intermédiaire. Une seule exécution à la
//! fois : si une mise à jour est déjà en cours, les appels suivants
//! attendent son résultat au lieu d'en lancer une deuxième.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info};

use crate::error::{Error, Result};

/// Résultat d'une exécution de la commande de mise à jour.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// La commande s'est terminée avec un code de sortie nul.
    Success {
        /// Sortie standard de la commande.
        stdout: String,
    },
    /// La commande s'est terminée avec un code de sortie non nul.
    Failed {
        /// Code de sortie, absent si le processus a été tué par un signal.
        exit_code: Option<i32>,
    },
    /// La commande a dépassé le délai autorisé et a été tuée.
    TimedOut {
        /// Délai qui a été dépassé.
        limit: Duration,
    },
    /// Le processus n'a pas pu être lancé.
    SpawnError {
        /// Description de l'erreur de lancement.
        message: String,
    },
}

/// Lanceur de la commande de mise à jour, avec partage des exécutions.
///
/// Cloner le runner est bon marché : tous les clones partagent le même
/// emplacement d'exécution en cours.
#[derive(Debug, Clone)]
pub struct UpdateRunner {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    in_flight: Arc<Mutex<Option<broadcast::Sender<UpdateOutcome>>>>,
}

impl UpdateRunner {
    /// Construit un runner à partir d'une ligne de commande.
    ///
    /// La ligne est découpée sur les espaces : le premier mot est le
    /// programme, les suivants ses arguments. Aucun shell n'est invoqué.
    pub fn new(command: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or(Error::EmptyCommand)?.to_string();
        let args = parts.map(|s| s.to_string()).collect();

        Ok(Self {
            program,
            args,
            timeout,
            in_flight: Arc::new(Mutex::new(None)),
        })
    }

    /// Programme qui sera exécuté.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Délai maximal d'exécution, `None` pour illimité.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Exécute la commande, ou rejoint l'exécution déjà en cours.
    ///
    /// Le premier appelant lance le processus ; tant qu'il n'est pas
    /// terminé, les appelants suivants s'abonnent au même résultat.
    pub async fn run(&self) -> UpdateOutcome {
        let mut rx = {
            let mut slot = self.in_flight.lock().await;
            match slot.as_ref() {
                Some(tx) => {
                    info!(program = %self.program, "Mise à jour déjà en cours, attente du résultat");
                    tx.subscribe()
                }
                None => {
                    let (tx, rx) = broadcast::channel(1);
                    *slot = Some(tx.clone());

                    let program = self.program.clone();
                    let args = self.args.clone();
                    let timeout = self.timeout;
                    let in_flight = Arc::clone(&self.in_flight);

                    tokio::spawn(async move {
                        let outcome = run_command(&program, &args, timeout).await;
                        // Libère l'emplacement avant d'envoyer le résultat,
                        // sinon un appelant arrivant entre les deux
                        // s'abonnerait à un canal déjà terminé.
                        *in_flight.lock().await = None;
                        let _ = tx.send(outcome);
                    });

                    rx
                }
            }
        };

        match rx.recv().await {
            Ok(outcome) => outcome,
            Err(_) => UpdateOutcome::SpawnError {
                message: "update task aborted".to_string(),
            },
        }
    }
}

/// Lance le processus et attend sa fin, dans la limite du délai donné.
async fn run_command(program: &str, args: &[String], timeout: Option<Duration>) -> UpdateOutcome {
    info!(program = %program, ?args, "Lancement de la commande de mise à jour");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, command.output()).await {
            Ok(result) => result,
            Err(_) => {
                error!(program = %program, ?limit, "Commande de mise à jour interrompue après dépassement du délai");
                return UpdateOutcome::TimedOut { limit };
            }
        },
        None => command.output().await,
    };

    match output {
        Ok(output) if output.status.success() => {
            info!(program = %program, "Mise à jour terminée avec succès");
            UpdateOutcome::Success {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            }
        }
        Ok(output) => {
            let exit_code = output.status.code();
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(
                program = %program,
                ?exit_code,
                stderr = %stderr.trim(),
                "Échec de la commande de mise à jour"
            );
            UpdateOutcome::Failed { exit_code }
        }
        Err(e) => {
            error!(program = %program, error = %e, "Impossible de lancer la commande de mise à jour");
            UpdateOutcome::SpawnError {
                message: e.to_string(),
            }
        }
    }
}

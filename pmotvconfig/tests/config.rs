//! Tests d'intégration du chargement de configuration

use anyhow::Result;
use pmotvconfig::Config;
use serde_yaml::Value;

fn dir_str(dir: &tempfile::TempDir) -> &str {
    dir.path().to_str().expect("tempdir path is not utf-8")
}

#[test]
fn test_load_creates_config_file_with_defaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = Config::load_config(dir_str(&dir))?;

    // La configuration fusionnée est réécrite sur disque
    assert!(dir.path().join("config.yaml").exists());

    match config.get_value(&["host", "http_port"])? {
        Value::Number(n) => assert_eq!(n.as_i64(), Some(3000)),
        other => panic!("unexpected http_port value: {:?}", other),
    }
    match config.get_value(&["playlist", "file"])? {
        Value::String(s) => assert_eq!(s, "playlist.m3u"),
        other => panic!("unexpected playlist.file value: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_set_value_survives_reload() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let config = Config::load_config(dir_str(&dir))?;
    config.set_http_port(8123)?;
    drop(config);

    let reloaded = Config::load_config(dir_str(&dir))?;
    match reloaded.get_value(&["host", "http_port"])? {
        Value::Number(n) => assert_eq!(n.as_i64(), Some(8123)),
        other => panic!("unexpected http_port value: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_external_file_merges_over_defaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("config.yaml"),
        "host:\n  http_port: 9999\n",
    )?;

    let config = Config::load_config(dir_str(&dir))?;

    // La valeur externe gagne
    match config.get_value(&["host", "http_port"])? {
        Value::Number(n) => assert_eq!(n.as_i64(), Some(9999)),
        other => panic!("unexpected http_port value: {:?}", other),
    }
    // Les défauts absents du fichier externe sont conservés
    assert!(config.get_value(&["playlist", "update", "command"]).is_ok());
    Ok(())
}

#[test]
fn test_env_override_is_applied() -> Result<()> {
    std::env::set_var("PMOTV_CONFIG__CUSTOM__PROBE", "42");

    let dir = tempfile::tempdir()?;
    let config = Config::load_config(dir_str(&dir))?;
    std::env::remove_var("PMOTV_CONFIG__CUSTOM__PROBE");

    match config.get_value(&["custom", "probe"])? {
        Value::Number(n) => assert_eq!(n.as_i64(), Some(42)),
        other => panic!("unexpected probe value: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_logger_getters_read_embedded_defaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = Config::load_config(dir_str(&dir))?;

    assert_eq!(config.get_log_cache_size()?, 1000);
    assert_eq!(config.get_log_min_level()?, "INFO");
    assert!(config.get_log_enable_console()?);
    Ok(())
}

#[test]
fn test_get_base_url_falls_back_to_local_ip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = Config::load_config(dir_str(&dir))?;

    // base_url est vide par défaut, on retombe sur une IP valide
    let url = config.get_base_url();
    assert!(url.parse::<std::net::IpAddr>().is_ok());
    Ok(())
}

//! Configuration loading from disk

use std::fs;

use devaarg::{Config, ConfigError};
use tracing::Level;

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(devaarg::config::CONFIG_FILE);
    fs::write(
        &path,
        "[logging]\nlevel = \"warn\"\n\n[library]\npath = \"libinnodb.so\"\nsetter = \"ib_cfg_set\"\nsuccess_code = 10\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.logging.level(), Level::WARN);
    assert_eq!(config.library.unwrap().setter, "ib_cfg_set");
}

#[test]
fn discover_walks_up() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join(devaarg::config::CONFIG_FILE), "").unwrap();

    let found = Config::discover_from(&nested).unwrap();
    assert_eq!(found, dir.path().join(devaarg::config::CONFIG_FILE));
}

#[test]
fn missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[logging\nlevel = ").unwrap();
    assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
}

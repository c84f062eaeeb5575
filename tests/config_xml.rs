use dirsync::config::{self, CONFIG_ENV, load_config_from_xml_path};
use dirsync::LogLevel;
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn malformed_xml_errors() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    // Missing closing tag for backup_dir
    let xml = r#"<config>
  <backup_dir>/tmp/backups
</config>"#;
    fs::write(&cfg_path, xml).unwrap();
    let err = load_config_from_xml_path(&cfg_path).unwrap_err();
    assert!(format!("{err}").contains("parse config xml"));
}

#[test]
fn whitespace_and_empty_values_are_unset() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(
        &cfg_path,
        "<config>\n  <backup_dir>   </backup_dir>\n  <tmp_dir>\n    /scratch\n  </tmp_dir>\n</config>",
    )
    .unwrap();
    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    assert_eq!(cfg.backup_dir, None);
    assert_eq!(cfg.tmp_dir, Some(PathBuf::from("/scratch")));
    assert_eq!(cfg.option_or("backup_dir", "(default)"), "(default)");
}

#[test]
#[serial]
fn env_override_is_loaded() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("custom.xml");
    fs::write(
        &cfg_path,
        "<config><log_level>quiet</log_level><log_file>/var/log/dirsync.log</log_file></config>",
    )
    .unwrap();

    unsafe { std::env::set_var(CONFIG_ENV, &cfg_path) };
    let loaded = config::load();
    unsafe { std::env::remove_var(CONFIG_ENV) };

    let cfg = loaded.unwrap();
    assert_eq!(cfg.log_level, LogLevel::Quiet);
    assert_eq!(cfg.option("log_file").as_deref(), Some("/var/log/dirsync.log"));
}

#[test]
#[serial]
fn malformed_env_config_fails_load() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("broken.xml");
    fs::write(&cfg_path, "<config><unknown>1</unknown></config>").unwrap();

    unsafe { std::env::set_var(CONFIG_ENV, &cfg_path) };
    let loaded = config::load();
    unsafe { std::env::remove_var(CONFIG_ENV) };

    assert!(loaded.is_err());
}

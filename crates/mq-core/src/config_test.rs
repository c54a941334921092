use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("upload_folder: uploads").unwrap();
    assert_eq!(config.upload_folder, PathBuf::from("uploads"));
    assert_eq!(config.allowed_extensions, vec!["zip"]);
    assert!(config
        .allowed_mimetypes
        .contains(&"application/zip".to_string()));
    assert_eq!(config.retention_days, 7);
    assert!(config.sample_session.is_none());
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
upload_folder: /srv/mq2/uploads
allowed_extensions: [zip, ZIP]
allowed_mimetypes: [application/zip]
sample_session: 20120305141516123456DEMOSESSION00
retention_days: 14
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.allowed_extensions, vec!["zip", "ZIP"]);
    assert_eq!(config.retention_days, 14);
    assert_eq!(
        config.sample_session.as_ref().map(|s| s.as_str()),
        Some("20120305141516123456DEMOSESSION00")
    );
    config.validate().unwrap();
}

#[test]
fn test_unknown_fields_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("upload_folder: x\nsecret_key: abc");
    assert!(result.is_err());
}

#[test]
fn test_invalid_sample_session_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("upload_folder: x\nsample_session: ../etc");
    assert!(result.is_err());
}

#[test]
fn test_validate_rejects_dotted_extension() {
    let mut config = Config::with_upload_folder("uploads");
    config.allowed_extensions = vec![".zip".to_string()];
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_validate_rejects_zero_retention() {
    let mut config = Config::with_upload_folder("uploads");
    config.retention_days = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_resolves_relative_upload_folder() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("mq2.yml"), "upload_folder: uploads\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.upload_folder, dir.path().join("uploads"));
}

#[test]
fn test_load_from_dir_accepts_yaml_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("mq2.yaml"), "upload_folder: /tmp/up\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.upload_folder, PathBuf::from("/tmp/up"));
}

#[test]
fn test_load_missing_config() {
    let dir = tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_is_allowed_upload() {
    let config = Config::with_upload_folder("uploads");
    assert!(config.is_allowed_upload("Demoset.zip", "application/zip"));
    assert!(!config.is_allowed_upload("Demoset.tar", "application/zip"));
    assert!(!config.is_allowed_upload("Demoset.zip", "text/plain"));
    assert!(!config.is_allowed_upload("zip", "application/zip"));
}

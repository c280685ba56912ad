// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::*;

fn args() -> SyncArgs {
    SyncArgs {
        config: None,
        controller_url: Some("https://controller.example".to_owned()),
        controller_token: Some("cli-token".to_owned()),
        update_frequency_seconds: None,
        service_types: vec!["whoami".to_owned()],
        host: "127.0.0.1".to_owned(),
        port: 0,
    }
}

fn write_config(dir: &tempfile::TempDir, body: &str) -> anyhow::Result<std::path::PathBuf> {
    let path = dir.path().join("agentsync.json");
    std::fs::write(&path, body)?;
    Ok(path)
}

#[test]
fn provided_url_and_token_are_kept() -> anyhow::Result<()> {
    let mut config =
        ControllerConfig { url: "abc".to_owned(), token: "abc".to_owned(), ..Default::default() };
    config.apply_defaults_with(Some("from-env".to_owned()))?;
    assert_eq!(
        config,
        ControllerConfig {
            url: "abc".to_owned(),
            token: "abc".to_owned(),
            update_frequency_seconds: DEFAULT_UPDATE_FREQUENCY_SECONDS,
        }
    );
    Ok(())
}

#[test]
fn provided_interval_is_kept() -> anyhow::Result<()> {
    let mut config = ControllerConfig {
        token: "abc".to_owned(),
        update_frequency_seconds: 1234,
        ..Default::default()
    };
    config.apply_defaults_with(None)?;
    assert_eq!(config.update_frequency_seconds, 1234);
    assert_eq!(config.update_interval(), Duration::from_secs(1234));
    Ok(())
}

#[test]
fn token_falls_back_to_environment() -> anyhow::Result<()> {
    let mut config = ControllerConfig::default();
    config.apply_defaults_with(Some("from-env".to_owned()))?;
    assert_eq!(config.token, "from-env");
    assert_eq!(config.update_interval(), Duration::from_secs(30));
    Ok(())
}

#[test]
fn missing_token_is_configuration_error() {
    let mut config = ControllerConfig::default();
    let err = config.apply_defaults_with(None).err();
    assert!(matches!(err, Some(SyncError::Configuration(_))), "got {err:?}");

    let mut config = ControllerConfig::default();
    let err = config.apply_defaults_with(Some(String::new())).err();
    assert!(matches!(err, Some(SyncError::Configuration(_))), "got {err:?}");
}

#[test]
fn file_config_uses_camel_case_keys() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = write_config(
        &tmp,
        r#"{"url":"https://c.example","token":"file-token","updateFrequencySeconds":5}"#,
    )?;
    let config = ControllerConfig::from_file(&path)?;

    assert_eq!(config.url, "https://c.example");
    assert_eq!(config.token, "file-token");
    assert_eq!(config.update_frequency_seconds, 5);
    Ok(())
}

#[test]
fn cli_values_override_file() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = write_config(
        &tmp,
        r#"{"url":"https://file.example","token":"file-token","updateFrequencySeconds":5}"#,
    )?;
    let mut a = args();
    a.config = Some(path);
    a.update_frequency_seconds = Some(0);
    let config = a.controller_config()?;

    assert_eq!(config.url, "https://controller.example");
    assert_eq!(config.token, "cli-token");
    assert_eq!(config.update_frequency_seconds, DEFAULT_UPDATE_FREQUENCY_SECONDS);
    Ok(())
}

#[test]
fn file_values_used_without_overrides() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = write_config(&tmp, r#"{"url":"https://file.example","token":"file-token"}"#)?;
    let mut a = args();
    a.config = Some(path);
    a.controller_url = None;
    a.controller_token = None;
    let config = a.controller_config()?;

    assert_eq!(config.url, "https://file.example");
    assert_eq!(config.token, "file-token");
    Ok(())
}

#[test]
fn malformed_file_is_configuration_error() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = write_config(&tmp, "{not json")?;
    let err = ControllerConfig::from_file(&path).err();
    assert!(
        matches!(err, Some(SyncError::Configuration(ref m)) if m.contains("parsing")),
        "got {err:?}"
    );
    Ok(())
}

#[test]
fn missing_url_is_configuration_error() {
    let mut a = args();
    a.controller_url = None;
    let err = a.controller_config().err();
    assert!(matches!(err, Some(SyncError::Configuration(_))), "got {err:?}");
}

#[test]
fn unreadable_file_is_configuration_error() {
    let mut a = args();
    a.config = Some(std::path::PathBuf::from("/nonexistent/agentsync.json"));
    let err = a.controller_config().err();
    assert!(matches!(err, Some(SyncError::Configuration(_))), "got {err:?}");
}

#[test]
fn service_types_are_trimmed() {
    let mut a = args();
    a.service_types = vec![" whoami".to_owned(), String::new(), "argocd ".to_owned()];
    assert_eq!(a.service_types(), vec!["whoami".to_owned(), "argocd".to_owned()]);
}

use std::collections::HashMap;
use std::time::Duration;

use placemap_core::config::{AppConfig, SheetConfig, DEFAULT_BIND_ADDR, DEFAULT_GEOCODING_ENDPOINT};
use placemap_core::error::ImportError;

fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn empty_environment_uses_defaults() {
    let config = config_from(&[]).expect("config");

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    assert_eq!(config.throttle, Duration::from_millis(100));
    assert_eq!(config.geocoding.endpoint, DEFAULT_GEOCODING_ENDPOINT);
    assert!(config.geocoding.api_key.is_none());
}

#[test]
fn blank_values_count_as_unset() {
    let config = config_from(&[("GOOGLE_SHEET_PUBLISHED_URL", "   "), ("GOOGLE_MAPS_API_KEY", "")])
        .expect("config");

    assert!(config.sheet.published_url.is_none());
    assert!(config.geocoding.api_key.is_none());
}

#[test]
fn reads_every_recognised_variable() {
    let config = config_from(&[
        ("DATABASE_URL", "postgres://localhost/placemap"),
        ("PLACEMAP_BIND", "127.0.0.1:8080"),
        ("GOOGLE_SHEET_ID", "abc"),
        ("GOOGLE_SHEET_GID", "7"),
        ("GOOGLE_MAPS_API_KEY", "key"),
        ("IMPORT_THROTTLE_MS", "250"),
        ("N8N_WEBHOOK_URL", "https://n8n.test/webhook"),
        ("N8N_API_KEY", "n8n-key"),
        ("N8N_CHAT_URL", "https://n8n.test/chat"),
    ])
    .expect("config");

    assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/placemap"));
    assert_eq!(config.bind_addr, "127.0.0.1:8080");
    assert_eq!(config.throttle, Duration::from_millis(250));
    assert_eq!(config.geocoding.api_key.as_deref(), Some("key"));
    assert_eq!(config.chat.webhook_url.as_deref(), Some("https://n8n.test/webhook"));
    assert_eq!(config.chat.api_key.as_deref(), Some("n8n-key"));
    assert_eq!(config.chat.chat_url.as_deref(), Some("https://n8n.test/chat"));
    assert_eq!(
        config.sheet.export_url().expect("url"),
        "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=7"
    );
}

#[test]
fn invalid_throttle_is_rejected() {
    let err = config_from(&[("IMPORT_THROTTLE_MS", "fast")]).expect_err("not a number");
    assert!(err.to_string().contains("IMPORT_THROTTLE_MS"));
}

#[test]
fn published_url_wins_over_sheet_id() {
    let sheet = SheetConfig {
        published_url: Some("https://docs.google.com/spreadsheets/d/e/pub?output=csv".into()),
        sheet_id: Some("abc".into()),
        gid: Some("3".into()),
    };

    assert_eq!(
        sheet.export_url().expect("url"),
        "https://docs.google.com/spreadsheets/d/e/pub?output=csv"
    );
}

#[test]
fn no_source_is_a_configuration_error() {
    assert!(matches!(
        SheetConfig::default().export_url(),
        Err(ImportError::NotConfigured)
    ));
}

use triage_core::config::TriageConfig;
use triage_core::TriageError;

#[test]
fn defaults_match_documented_values() {
    let config = TriageConfig::default();
    assert_eq!(config.storage.busy_timeout_ms, 5_000);
    assert_eq!(config.storage.read_pool_size, 4);
    assert_eq!(config.ingest.max_tag_length, 30);
    assert_eq!(config.ingest.max_upsert_attempts, 3);
    assert!(config.ingest.record_occurrences);
    assert_eq!(config.ingest.occurrence_retention, 100);
    assert_eq!(config.observability.log_filter, "info");
}

#[test]
fn partial_toml_falls_back_to_defaults() {
    let config = TriageConfig::from_toml(
        r#"
        [ingest]
        occurrence_retention = 5

        [storage]
        db_path = "/var/lib/triage/errors.db"
        "#,
    )
    .unwrap();
    assert_eq!(config.ingest.occurrence_retention, 5);
    assert_eq!(config.ingest.max_tag_length, 30);
    assert_eq!(config.storage.db_path, "/var/lib/triage/errors.db");
    assert_eq!(config.storage.read_pool_size, 4);
}

#[test]
fn empty_toml_is_default() {
    let config = TriageConfig::from_toml("").unwrap();
    assert_eq!(config.storage.db_path, "triage.db");
}

#[test]
fn zero_upsert_attempts_is_rejected() {
    let err = TriageConfig::from_toml("[ingest]\nmax_upsert_attempts = 0\n").unwrap_err();
    assert!(matches!(err, TriageError::ConfigError(_)));
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = TriageConfig::from_toml("[ingest\n").unwrap_err();
    assert!(matches!(err, TriageError::ConfigError(_)));
}

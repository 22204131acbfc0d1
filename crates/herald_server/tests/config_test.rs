//! Tests for configuration loading.

use herald_server::HeraldConfig;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_bundled_defaults_are_valid() {
    let config = HeraldConfig::from_toml_str("").unwrap();

    assert_eq!(config.channel().page_size(), &10);
    assert_eq!(config.channel().max_offset(), &50);
    assert_eq!(config.channel().page_delay(), Duration::from_secs(2));
    assert_eq!(config.cache().policy().ttl(), Duration::from_secs(300));
    assert_eq!(
        config.cache().policy().min_refresh_interval(),
        Duration::from_secs(600)
    );
    assert!(config.server().bind_addr().is_ok());
    assert!(config.api().token().is_none());
    assert_eq!(config.server().max_visitors(), &herald_server::DEFAULT_VISITOR_LIMIT);
}

#[test]
fn test_overrides_replace_only_given_keys() {
    let config = HeraldConfig::from_toml_str(
        r#"
        [channel]
        username = "newsroom"
        page_size = 100

        [api]
        token = "secret"
        "#,
    )
    .unwrap();

    assert_eq!(config.channel().username(), "newsroom");
    assert_eq!(config.channel().page_size(), &100);
    assert_eq!(config.channel().max_offset(), &50);
    assert_eq!(config.api().token().as_deref(), Some("secret"));
    assert_eq!(config.api().timeout_secs(), &30);
}

#[test]
fn test_zero_page_size_is_rejected() {
    let err = HeraldConfig::from_toml_str("[channel]\npage_size = 0\n").unwrap_err();
    assert!(err.to_string().contains("page_size"));
}

#[test]
fn test_invalid_bind_address_is_rejected() {
    let err = HeraldConfig::from_toml_str("[server]\nbind = \"not an address\"\n").unwrap_err();
    assert!(err.to_string().contains("bind address"));
}

#[test]
fn test_from_file_reads_overrides() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[cache]\nttl_secs = 60\nwarm_on_start = false").unwrap();

    let config = HeraldConfig::from_file(file.path()).unwrap();

    assert_eq!(config.cache().policy().ttl(), Duration::from_secs(60));
    assert!(!config.cache().warm_on_start());
}

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;

use vigil_server::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
service:
  port: 9000
  prot: 9001 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.service.port, 8080);
    assert_eq!(cfg.service.app_version, "1.0.0");
    assert_eq!(cfg.service.environment, "development");
    assert_eq!(cfg.readiness.checks, vec!["database".to_string()]);
    assert_eq!(cfg.metrics.duration_buckets.len(), 14);
    assert!(cfg.handlers.simulate_latency);
}

#[test]
fn rejects_unsupported_version_and_empty_buckets() {
    assert!(config::load_from_str("version: 2\n").is_err());
    assert!(config::load_from_str("version: 1\nmetrics:\n  duration_buckets: []\n").is_err());
    assert!(config::load_from_str("version: 1\nservice:\n  host: \"not a host\"\n").is_err());
}

#[test]
fn environment_overrides_defaults() {
    let env: HashMap<&str, &str> = [
        ("APP_VERSION", "2.3.4"),
        ("ENVIRONMENT", "staging"),
        ("PORT", "9090"),
    ]
    .into_iter()
    .collect();

    let cfg = config::load(None, |k| env.get(k).map(|v| v.to_string())).expect("must load");
    assert_eq!(cfg.service.app_version, "2.3.4");
    assert_eq!(cfg.service.environment, "staging");
    assert_eq!(cfg.service.listen_addr().unwrap().port(), 9090);
}

#[test]
fn bad_port_is_rejected() {
    let err = config::load(None, |k| (k == "PORT").then(|| "http".to_string()))
        .expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = RelayConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, RelayConfig::default());
    assert_eq!(cfg.socket_addr().to_string(), "0.0.0.0:3000");
}

#[test]
fn reads_every_variable() {
    let cfg = RelayConfig::from_lookup(lookup(&[
        ("PORT", "8081"),
        ("RELAY_BIND_ADDR", "127.0.0.1"),
        ("RELAY_CLIENT_BUFFER", "32"),
    ]))
    .unwrap();
    assert_eq!(cfg.socket_addr().to_string(), "127.0.0.1:8081");
    assert_eq!(cfg.client_buffer, 32);
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = RelayConfig::from_lookup(lookup(&[("PORT", "  ")])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
}

#[test]
fn unparsable_port_is_an_error() {
    let err = RelayConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
    let ConfigError::Invalid { var, value, .. } = err;
    assert_eq!(var, "PORT");
    assert_eq!(value, "eighty");
}

#[test]
fn bad_bind_addr_is_an_error() {
    let err = RelayConfig::from_lookup(lookup(&[("RELAY_BIND_ADDR", "localhost:1")])).unwrap_err();
    assert!(err.to_string().starts_with("invalid RELAY_BIND_ADDR="));
}

#[test]
fn zero_client_buffer_is_rejected() {
    let err = RelayConfig::from_lookup(lookup(&[("RELAY_CLIENT_BUFFER", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "RELAY_CLIENT_BUFFER", .. }));
}

//! Environment overrides for [`GatewayConfig`].
//!
//! | Variable                | Field                                |
//! |-------------------------|--------------------------------------|
//! | `SKILL_APPLICATION_ID`  | `verification.application_id`        |
//! | `SKILL_VERIFY_REQUESTS` | `verification.enabled` (`false`/`0`) |
//! | `SKILL_HTTP_HOST`       | `http.host`                          |
//! | `SKILL_HTTP_PORT`       | `http.port`                          |
//! | `SKILL_HTTP_PATH`       | `http.path`                          |
//! | `SKILL_CERT_CACHE_TTL`  | `verification.cert_cache_ttl`        |

use skill_gateway::GatewayConfig;

pub const APPLICATION_ID: &str = "SKILL_APPLICATION_ID";
pub const VERIFY_REQUESTS: &str = "SKILL_VERIFY_REQUESTS";
pub const HTTP_HOST: &str = "SKILL_HTTP_HOST";
pub const HTTP_PORT: &str = "SKILL_HTTP_PORT";
pub const HTTP_PATH: &str = "SKILL_HTTP_PATH";
pub const CERT_CACHE_TTL: &str = "SKILL_CERT_CACHE_TTL";

/// A variable was set to something unusable.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{var}={value:?}: {reason}")]
pub struct EnvError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

impl EnvError {
    fn new(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Defaults overridden by the process environment.
pub fn config_from_env() -> Result<GatewayConfig, EnvError> {
    let mut config = GatewayConfig::default();
    apply_env(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply overrides from `lookup`. Unset variables leave the field alone.
pub fn apply_env<L>(config: &mut GatewayConfig, lookup: L) -> Result<(), EnvError>
where
    L: Fn(&str) -> Option<String>,
{
    if let Some(id) = lookup(APPLICATION_ID) {
        config.verification.application_id = id;
    }

    if let Some(value) = lookup(VERIFY_REQUESTS) {
        config.verification.enabled = parse_flag(&value)
            .ok_or_else(|| EnvError::new(VERIFY_REQUESTS, &value, "expected true/false/1/0"))?;
    }

    if let Some(value) = lookup(HTTP_HOST) {
        config.http.host = value
            .parse()
            .map_err(|e| EnvError::new(HTTP_HOST, &value, e))?;
    }

    if let Some(value) = lookup(HTTP_PORT) {
        config.http.port = value
            .parse()
            .map_err(|e| EnvError::new(HTTP_PORT, &value, e))?;
    }

    if let Some(path) = lookup(HTTP_PATH) {
        config.http.path = path;
    }

    if let Some(value) = lookup(CERT_CACHE_TTL) {
        let ttl = humantime::parse_duration(&value)
            .map_err(|e| EnvError::new(CERT_CACHE_TTL, &value, e))?;
        config.verification.cert_cache_ttl = (!ttl.is_zero()).then_some(ttl);
    }

    Ok(())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_unset_keeps_defaults() {
        let mut config = GatewayConfig::default();
        apply_env(&mut config, lookup(&[])).unwrap();

        assert_eq!(config.http.port, 8080);
        assert!(config.verification.enabled);
        assert_eq!(config.verification.cert_cache_ttl, None);
    }

    #[test]
    fn test_overrides() {
        let mut config = GatewayConfig::default();
        apply_env(
            &mut config,
            lookup(&[
                (APPLICATION_ID, "amzn1.ask.skill.demo"),
                (HTTP_HOST, "127.0.0.1"),
                (HTTP_PORT, "3000"),
                (HTTP_PATH, "/alexa"),
                (CERT_CACHE_TTL, "30m"),
            ]),
        )
        .unwrap();

        assert_eq!(config.verification.application_id, "amzn1.ask.skill.demo");
        assert_eq!(config.http_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.http.path, "/alexa");
        assert_eq!(
            config.verification.cert_cache_ttl,
            Some(Duration::from_secs(1800))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_verification_flag() {
        for (value, expected) in [("false", false), ("0", false), ("TRUE", true), ("1", true)] {
            let mut config = GatewayConfig::default();
            apply_env(&mut config, lookup(&[(VERIFY_REQUESTS, value)])).unwrap();
            assert_eq!(config.verification.enabled, expected, "{value}");
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = GatewayConfig::default();

        let err = apply_env(&mut config, lookup(&[(HTTP_PORT, "eighty")])).unwrap_err();
        assert_eq!(err.var, HTTP_PORT);

        let err = apply_env(&mut config, lookup(&[(VERIFY_REQUESTS, "maybe")])).unwrap_err();
        assert_eq!(err.var, VERIFY_REQUESTS);

        let err = apply_env(&mut config, lookup(&[(CERT_CACHE_TTL, "soon")])).unwrap_err();
        assert_eq!(err.var, CERT_CACHE_TTL);
    }
}

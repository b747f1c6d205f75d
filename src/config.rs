// src/config.rs

use crate::routines::{LapackVersion, Precision};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Environment variable gating the native candidate (`0`/`false`/`no`/`off` disables it).
pub const ENV_ALLOW_NATIVE: &str = "LAPACK_DISPATCH_ALLOW_NATIVE";
/// Environment variable naming the only candidate to probe, e.g. `reference`.
pub const ENV_BACKEND: &str = "LAPACK_DISPATCH_BACKEND";
/// Environment variable holding the minimum acceptable LAPACK version, e.g. `3.6`.
pub const ENV_MIN_VERSION: &str = "LAPACK_DISPATCH_MIN_VERSION";

/// Settings consulted by backend candidates while probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Whether a native (system) LAPACK may be bound at all.
    pub allow_native: bool,
    /// Restricts probing to the candidate with this name. Other candidates
    /// are skipped; a fallback-equipped dispatcher still falls back.
    pub backend: Option<String>,
    /// Candidates whose `ilaver` reports an older version are rejected.
    pub min_version: LapackVersion,
    /// Precisions a candidate must provide to be bound.
    pub required_precisions: Vec<Precision>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            allow_native: true,
            backend: None,
            min_version: LapackVersion::new(3, 2, 0),
            required_precisions: vec![Precision::Single, Precision::Double],
        }
    }
}

impl DispatchConfig {
    /// Defaults overridden by the `LAPACK_DISPATCH_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`DispatchConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ALLOW_NATIVE) {
            match parse_flag(&raw) {
                Some(flag) => config.allow_native = flag,
                None => warn!("Ignoring {}={:?}: expected a boolean flag", ENV_ALLOW_NATIVE, raw),
            }
        }

        if let Some(raw) = lookup(ENV_BACKEND) {
            let name = raw.trim().to_ascii_lowercase();
            if !name.is_empty() {
                config.backend = Some(name);
            }
        }

        if let Some(raw) = lookup(ENV_MIN_VERSION) {
            match LapackVersion::parse(&raw) {
                Some(version) => config.min_version = version,
                None => warn!("Ignoring {}={:?}: expected a version like 3.12.0", ENV_MIN_VERSION, raw),
            }
        }

        debug!("Dispatch configuration: {:?}", config);
        config
    }

    /// `true` when `name` may be probed under the `backend` restriction.
    pub fn selects(&self, name: &str) -> bool {
        match &self.backend {
            Some(requested) => requested.eq_ignore_ascii_case(name),
            None => true,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_allow_everything() {
        let config = DispatchConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, DispatchConfig::default());
        assert!(config.allow_native);
        assert!(config.selects("native"));
        assert!(config.selects("reference"));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = DispatchConfig::from_lookup(lookup_from(&[
            (ENV_ALLOW_NATIVE, "off"),
            (ENV_BACKEND, " Reference "),
            (ENV_MIN_VERSION, "3.10"),
        ]));
        assert!(!config.allow_native);
        assert_eq!(config.backend.as_deref(), Some("reference"));
        assert_eq!(config.min_version, LapackVersion::new(3, 10, 0));
        assert!(config.selects("REFERENCE"));
        assert!(!config.selects("native"));
    }

    #[test]
    fn unparseable_values_are_ignored() {
        let config = DispatchConfig::from_lookup(lookup_from(&[
            (ENV_ALLOW_NATIVE, "perhaps"),
            (ENV_BACKEND, "   "),
            (ENV_MIN_VERSION, "three"),
        ]));
        assert_eq!(config, DispatchConfig::default());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: DispatchConfig = serde_json::from_str(r#"{"allow_native": false}"#).unwrap();
        assert!(!config.allow_native);
        assert_eq!(config.min_version, LapackVersion::new(3, 2, 0));
        assert_eq!(config.required_precisions, vec![Precision::Single, Precision::Double]);

        let text = serde_json::to_string(&config).unwrap();
        let back: DispatchConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}

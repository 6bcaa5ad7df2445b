//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ToxwsSettings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply `TOXWS_*` environment variable overrides (highest priority)
//!
//! See [`deep_merge`] for how the file is laid over the defaults.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::ToxwsSettings;

/// Daemon URL override.
pub const ENV_URL: &str = "TOXWS_URL";
/// Log filter override.
pub const ENV_LOG_LEVEL: &str = "TOXWS_LOG_LEVEL";
/// Connect timeout override, in milliseconds.
pub const ENV_CONNECT_TIMEOUT_MS: &str = "TOXWS_CONNECT_TIMEOUT_MS";
/// Outgoing echo override (boolean).
pub const ENV_ECHO_OUTGOING: &str = "TOXWS_ECHO_OUTGOING";

/// Resolve the path to the settings file (`~/.toxws/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".toxws").join("settings.json")
}

/// Load settings from `path`, then apply `TOXWS_*` overrides.
///
/// A missing file means defaults. An unreadable or malformed one is an error
/// naming the file.
pub fn load_settings_from_path(path: &Path) -> Result<ToxwsSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Defaults with the settings file laid over them, without env overrides.
pub fn load_file_layer(path: &Path) -> Result<ToxwsSettings> {
    if !path.exists() {
        debug!(?path, "no settings file, using defaults");
        return Ok(ToxwsSettings::default());
    }

    let parse_error = |source: serde_json::Error| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let overlay: Value = serde_json::from_str(&content).map_err(parse_error)?;

    let mut merged = serde_json::to_value(ToxwsSettings::default()).map_err(parse_error)?;
    deep_merge(&mut merged, overlay);
    debug!(?path, "loaded settings file");
    serde_json::from_value(merged).map_err(parse_error)
}

/// Lay `overlay` over `base` in place.
///
/// Objects merge key by key. Any other overlay value replaces the base value
/// outright. `null` members of an overlay object are ignored, so a file can
/// blank out a key and still get its default.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(fields), Value::Object(overlay)) => {
            for (key, value) in overlay {
                if value.is_null() {
                    continue;
                }
                match fields.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        let _ = fields.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Apply environment variable overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut ToxwsSettings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable lookup.
///
/// Invalid values are logged and ignored (falling back to file/default).
pub fn apply_overrides_from(settings: &mut ToxwsSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read_string = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read_string(ENV_URL) {
        settings.server.url = v;
    }
    if let Some(v) = read_string(ENV_LOG_LEVEL) {
        settings.logging.level = v;
    }
    if let Some(raw) = lookup(ENV_CONNECT_TIMEOUT_MS) {
        match parse_u64_range(&raw, 100, 600_000) {
            Some(v) => settings.server.connect_timeout_ms = v,
            None => warn!(key = ENV_CONNECT_TIMEOUT_MS, value = %raw, "invalid u64 env var, ignoring"),
        }
    }
    if let Some(raw) = lookup(ENV_ECHO_OUTGOING) {
        match parse_bool(&raw) {
            Some(v) => settings.session.echo_outgoing = v,
            None => warn!(key = ENV_ECHO_OUTGOING, value = %raw, "invalid boolean env var, ignoring"),
        }
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_keeps_sibling_defaults() {
        let mut base = json!({"server": {"url": "ws://127.0.0.1:2794", "connectTimeoutMs": 5000}});
        deep_merge(&mut base, json!({"server": {"url": "wss://tox.example.org"}}));
        assert_eq!(
            base,
            json!({"server": {"url": "wss://tox.example.org", "connectTimeoutMs": 5000}})
        );
    }

    #[test]
    fn merge_ignores_null_members() {
        let mut base = json!({"logging": {"level": "warn"}});
        deep_merge(&mut base, json!({"logging": {"level": null}, "extra": null}));
        assert_eq!(base, json!({"logging": {"level": "warn"}}));
    }

    #[test]
    fn merge_replaces_mismatched_shapes() {
        let mut base = json!({"session": {"echoOutgoing": true}});
        deep_merge(&mut base, json!({"session": false}));
        assert_eq!(base, json!({"session": false}));
    }

    #[test]
    fn merge_adds_unknown_keys() {
        let mut base = json!({"server": {}});
        deep_merge(&mut base, json!({"server": {"url": "ws://x"}}));
        assert_eq!(base["server"]["url"], "ws://x");
    }

    // ── load_file_layer ─────────────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let path = Path::new("/nonexistent/toxws/settings.json");
        let settings = load_file_layer(path).unwrap();
        assert_eq!(settings, ToxwsSettings::default());
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"server": {"url": "ws://10.0.0.2:2794"}, "session": {"echoOutgoing": false}}"#,
        )
        .unwrap();

        let settings = load_file_layer(&path).unwrap();
        assert_eq!(settings.server.url, "ws://10.0.0.2:2794");
        assert_eq!(settings.server.connect_timeout_ms, 5_000);
        assert!(!settings.session.echo_outgoing);
        assert_eq!(settings.session.command_prefix, '/');
    }

    #[test]
    fn load_invalid_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        assert_matches!(
            load_file_layer(&path),
            Err(SettingsError::Parse { path: reported, .. }) if reported == path
        );
    }

    #[test]
    fn load_wrong_type_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"server": {"connectTimeoutMs": "soon"}}"#).unwrap();

        assert_matches!(load_file_layer(&path), Err(SettingsError::Parse { .. }));
    }

    #[test]
    fn load_directory_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(load_file_layer(dir.path()), Err(SettingsError::Read { .. }));
    }

    // ── overrides ───────────────────────────────────────────────────

    #[test]
    fn overrides_apply_over_file_values() {
        let mut settings = ToxwsSettings::default();
        apply_overrides_from(
            &mut settings,
            env(&[
                (ENV_URL, "ws://remote:9000"),
                (ENV_LOG_LEVEL, "debug"),
                (ENV_CONNECT_TIMEOUT_MS, "250"),
                (ENV_ECHO_OUTGOING, "off"),
            ]),
        );
        assert_eq!(settings.server.url, "ws://remote:9000");
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.server.connect_timeout_ms, 250);
        assert!(!settings.session.echo_outgoing);
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let mut settings = ToxwsSettings::default();
        apply_overrides_from(
            &mut settings,
            env(&[
                (ENV_URL, ""),
                (ENV_CONNECT_TIMEOUT_MS, "5"),
                (ENV_ECHO_OUTGOING, "maybe"),
            ]),
        );
        assert_eq!(settings, ToxwsSettings::default());
    }

    #[test]
    fn no_overrides_leaves_settings_untouched() {
        let mut settings = ToxwsSettings::default();
        apply_overrides_from(&mut settings, |_| None);
        assert_eq!(settings, ToxwsSettings::default());
    }

    // ── parsing ─────────────────────────────────────────────────────

    #[test]
    fn parse_bool_variants() {
        for v in ["true", "1", "YES", "On"] {
            assert_eq!(parse_bool(v), Some(true), "{v}");
        }
        for v in ["false", "0", "no", "OFF"] {
            assert_eq!(parse_bool(v), Some(false), "{v}");
        }
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn parse_u64_range_bounds() {
        assert_eq!(parse_u64_range("100", 100, 200), Some(100));
        assert_eq!(parse_u64_range("200", 100, 200), Some(200));
        assert_eq!(parse_u64_range("99", 100, 200), None);
        assert_eq!(parse_u64_range("x", 100, 200), None);
    }
}

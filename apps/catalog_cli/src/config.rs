use std::{collections::HashMap, fs, path::Path, time::Duration};

use catalog_core::{ClientSettings, ShapeMode};
use catalog_types::domain::PageSize;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "catalog.toml";

/// Defaults, then `catalog.toml`, then the process environment.
pub fn load_settings(config_path: &Path) -> ClientSettings {
    load_settings_from(config_path, |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    config_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<toml::Table>(&raw) {
            Ok(table) => apply_file(&mut settings, &flatten(&table)),
            Err(error) => warn!(
                path = %config_path.display(),
                %error,
                "ignoring unreadable config file"
            ),
        }
    }

    if let Some(v) = env("CATALOG_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__PAGE_SIZE") {
        apply_page_size(&mut settings, "APP__PAGE_SIZE", &v);
    }
    if let Some(v) = env("APP__DEBOUNCE_MS") {
        apply_debounce(&mut settings, "APP__DEBOUNCE_MS", &v);
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        apply_timeout(&mut settings, "APP__REQUEST_TIMEOUT_SECS", &v);
    }
    if let Some(v) = env("APP__STRICT_PAYLOADS") {
        apply_strict(&mut settings, "APP__STRICT_PAYLOADS", &v);
    }

    settings
}

/// Keys may be written as strings or as native TOML scalars
/// (`page_size = 20`, `strict_payloads = true`).
fn flatten(table: &toml::Table) -> HashMap<String, String> {
    table
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                toml::Value::String(text) => text.clone(),
                toml::Value::Integer(number) => number.to_string(),
                toml::Value::Boolean(flag) => flag.to_string(),
                other => {
                    warn!(key = key.as_str(), value = %other, "ignoring non-scalar config value");
                    return None;
                }
            };
            Some((key.clone(), text))
        })
        .collect()
}

fn apply_file(settings: &mut ClientSettings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("server_url") {
        settings.server_url = v.clone();
    }
    if let Some(v) = file_cfg.get("page_size") {
        apply_page_size(settings, "page_size", v);
    }
    if let Some(v) = file_cfg.get("debounce_ms") {
        apply_debounce(settings, "debounce_ms", v);
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        apply_timeout(settings, "request_timeout_secs", v);
    }
    if let Some(v) = file_cfg.get("strict_payloads") {
        apply_strict(settings, "strict_payloads", v);
    }
}

fn apply_page_size(settings: &mut ClientSettings, key: &str, value: &str) {
    match value.parse::<PageSize>() {
        Ok(size) => settings.default_page_size = size,
        Err(error) => warn!(key, value, %error, "ignoring page size"),
    }
}

fn apply_debounce(settings: &mut ClientSettings, key: &str, value: &str) {
    match value.trim().parse::<u64>() {
        Ok(ms) => settings.debounce_window = Duration::from_millis(ms),
        Err(error) => warn!(key, value, %error, "ignoring debounce window"),
    }
}

fn apply_timeout(settings: &mut ClientSettings, key: &str, value: &str) {
    match value.trim().parse::<u64>() {
        Ok(0) => settings.request_timeout = None,
        Ok(secs) => settings.request_timeout = Some(Duration::from_secs(secs)),
        Err(error) => warn!(key, value, %error, "ignoring request timeout"),
    }
}

fn apply_strict(settings: &mut ClientSettings, key: &str, value: &str) {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => settings.payload_mode = ShapeMode::Strict,
        "0" | "false" | "no" => settings.payload_mode = ShapeMode::Lenient,
        _ => warn!(key, value, "ignoring payload strictness flag"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

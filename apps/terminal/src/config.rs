use std::{collections::HashMap, fs};

#[derive(Debug, Clone)]
pub struct Settings {
    pub backend_url: String,
    pub sample_fallback: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080".into(),
            sample_fallback: true,
        }
    }
}

/// Defaults, overridden by `client.toml`, overridden by environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("client.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("backend_url") {
                settings.backend_url = v.clone();
            }
            if let Some(v) = file_cfg.get("sample_fallback") {
                if let Some(parsed) = parse_bool(v) {
                    settings.sample_fallback = parsed;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("DISKADMIN_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Ok(v) = std::env::var("DISKADMIN_SAMPLE_FALLBACK") {
        if let Some(parsed) = parse_bool(&v) {
            settings.sample_fallback = parsed;
        }
    }

    settings
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let settings = Settings::default();
        assert_eq!(settings.backend_url, "http://localhost:8080");
        assert!(settings.sample_fallback);
    }

    #[test]
    fn parses_boolean_spellings() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("nope"), None);
    }
}

use std::time::Duration;

pub const APP_NAME: &str = "imagetoprompt-2api";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_UPSTREAM_URL: &str = "https://www.imagetoprompt.app/api/generate-prompt";
const DEFAULT_MODEL: &str = "image-to-prompt-v1";

/// Display name -> language code accepted by the upstream API
const DEFAULT_LANGUAGES: [(&str, &str); 11] = [
    ("English", "en"),
    ("Español", "es"),
    ("Deutsch", "de"),
    ("Français", "fr"),
    ("Português", "pt"),
    ("简体中文", "zh-CN"),
    ("繁體中文", "zh-TW"),
    ("العربية", "ar"),
    ("Русский", "ru"),
    ("日本語", "ja"),
    ("한국어", "ko"),
];

/// Configuration from environment
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// `None`, empty and `"1"` all mean authentication is disabled
    pub api_master_key: Option<String>,
    pub request_timeout_secs: u64,
    pub default_model: String,
    pub known_models: Vec<String>,
    pub model_owner: String,
    pub supported_languages: Vec<(String, String)>,
    pub upstream_url: String,
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8088,
            api_master_key: None,
            request_timeout_secs: 180,
            default_model: DEFAULT_MODEL.to_string(),
            known_models: vec![DEFAULT_MODEL.to_string()],
            model_owner: "lzA6".to_string(),
            supported_languages: DEFAULT_LANGUAGES
                .iter()
                .map(|(name, code)| (name.to_string(), code.to_string()))
                .collect(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            static_dir: "static".to_string(),
        }
    }
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::info!("Loaded environment from {:?}", path),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Failed to read .env file: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unparsable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .or_else(|| lookup("NGINX_PORT"))
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(defaults.port);

        let request_timeout_secs = lookup("API_REQUEST_TIMEOUT")
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(defaults.request_timeout_secs);

        let known_models = lookup("KNOWN_MODELS")
            .map(|raw| parse_list(&raw))
            .filter(|models| !models.is_empty())
            .unwrap_or(defaults.known_models);

        let supported_languages = match lookup("SUPPORTED_LANGUAGES") {
            Some(raw) => parse_languages(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring malformed SUPPORTED_LANGUAGES, expected a JSON object");
                defaults.supported_languages.clone()
            }),
            None => defaults.supported_languages,
        };

        Self {
            port,
            api_master_key: lookup("API_MASTER_KEY"),
            request_timeout_secs,
            default_model: lookup("DEFAULT_MODEL").unwrap_or(defaults.default_model),
            known_models,
            model_owner: lookup("MODEL_OWNER").unwrap_or(defaults.model_owner),
            supported_languages,
            upstream_url: lookup("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            static_dir: lookup("STATIC_DIR").unwrap_or(defaults.static_dir),
        }
    }

    /// The effective master key, or `None` when authentication is disabled.
    pub fn auth_key(&self) -> Option<&str> {
        self.api_master_key
            .as_deref()
            .filter(|key| !key.is_empty() && *key != "1")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Accepts either a JSON array (`["a","b"]`) or a comma separated list.
fn parse_list(raw: &str) -> Vec<String> {
    if let Ok(items) = serde_json::from_str::<Vec<String>>(raw) {
        return items;
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_languages(raw: &str) -> Option<Vec<(String, String)>> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw).ok()?;
    map.into_iter()
        .map(|(name, code)| code.as_str().map(|c| (name, c.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_with(&[]);
        assert_eq!(config.port, 8088);
        assert_eq!(config.request_timeout(), Duration::from_secs(180));
        assert_eq!(config.default_model, "image-to-prompt-v1");
        assert_eq!(config.known_models, vec!["image-to-prompt-v1"]);
        assert_eq!(config.supported_languages.len(), 11);
        assert_eq!(config.supported_languages[5], ("简体中文".to_string(), "zh-CN".to_string()));
        assert!(config.auth_key().is_none());
    }

    #[test]
    fn master_key_of_one_disables_auth() {
        assert!(config_with(&[("API_MASTER_KEY", "1")]).auth_key().is_none());
        assert!(config_with(&[("API_MASTER_KEY", "")]).auth_key().is_none());
        assert_eq!(
            config_with(&[("API_MASTER_KEY", "secret")]).auth_key(),
            Some("secret")
        );
    }

    #[test]
    fn known_models_accepts_json_or_commas() {
        let config = config_with(&[("KNOWN_MODELS", r#"["a", "b"]"#)]);
        assert_eq!(config.known_models, vec!["a", "b"]);

        let config = config_with(&[("KNOWN_MODELS", "a, b,,c")]);
        assert_eq!(config.known_models, vec!["a", "b", "c"]);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = config_with(&[("PORT", "not-a-port"), ("API_REQUEST_TIMEOUT", "-3")]);
        assert_eq!(config.port, 8088);
        assert_eq!(config.request_timeout_secs, 180);

        let config = config_with(&[("NGINX_PORT", "9000")]);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn supported_languages_from_json_object() {
        let config = config_with(&[("SUPPORTED_LANGUAGES", r#"{"English": "en", "Italiano": "it"}"#)]);
        assert_eq!(config.supported_languages.len(), 2);
        assert!(config
            .supported_languages
            .contains(&("Italiano".to_string(), "it".to_string())));

        let config = config_with(&[("SUPPORTED_LANGUAGES", "[1, 2]")]);
        assert_eq!(config.supported_languages.len(), 11);
    }
}

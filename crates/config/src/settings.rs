// Application settings
// Loaded from ~/.config/letsgo/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::theme::ThemeSource;
use crate::ConfigError;

/// Hosted execution endpoint of the course site.
pub const DEFAULT_ENDPOINT: &str =
    "https://il5jdhvn5li6mbvknix7sq7u7e0mqtwv.lambda-url.us-east-1.on.aws/";

/// How long the "copied" label stays up.
pub const DEFAULT_COPY_FEEDBACK_MILLIS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Execution
    #[serde(rename = "execution.endpoint")]
    pub endpoint: String,

    // Copy
    #[serde(rename = "copy.feedbackMillis")]
    pub copy_feedback_millis: u64,

    // Content
    #[serde(rename = "content.staticDir")]
    pub static_dir: PathBuf,

    // Theme
    #[serde(rename = "theme.source")]
    pub theme_source: ThemeSource,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            copy_feedback_millis: DEFAULT_COPY_FEEDBACK_MILLIS,
            static_dir: PathBuf::from("static"),
            theme_source: ThemeSource::Dark,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("letsgo");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit file. Lines starting with `//` are ignored.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents).map_err(|message| ConfigError::Json {
            path: path.display().to_string(),
            message,
        })
    }

    fn parse(contents: &str) -> Result<Self, String> {
        // Strip comments (lines starting with //)
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Copy feedback window as a Duration
    pub fn copy_feedback(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.copy_feedback_millis)
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = format!(r#"{{
    // Remote execution endpoint (POST {{"code": "..."}})
    "execution.endpoint": "{}",

    // How long the copy button shows its confirmation (milliseconds)
    "copy.feedbackMillis": {},

    // Directory that snippet file references resolve against
    "content.staticDir": "static",

    // Highlight theme: {{"type": "Dark"}}, {{"type": "Light"}},
    // or {{"type": "Custom", "value": "~/path/theme.json"}}
    "theme.source": {{ "type": "Dark" }}
}}
"#, DEFAULT_ENDPOINT, DEFAULT_COPY_FEEDBACK_MILLIS);

        if let Err(e) = fs::write(path, default_config) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.copy_feedback().as_millis(), 2000);
        assert_eq!(settings.theme_source, ThemeSource::Dark);
    }

    #[test]
    fn test_parse_with_comments_and_partial_keys() {
        let json = r#"{
            // local playground
            "execution.endpoint": "http://localhost:8080/run",
            "theme.source": { "type": "Light" }
        }"#;
        let settings = Settings::parse(json).unwrap();
        assert_eq!(settings.endpoint, "http://localhost:8080/run");
        assert_eq!(settings.copy_feedback_millis, 2000);
        assert_eq!(settings.theme_source, ThemeSource::Light);
    }

    #[test]
    fn test_default_file_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letsgo/settings.json");
        Settings::default().create_default_file(&path);

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("settings.json"));
    }
}

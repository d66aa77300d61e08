use crate::core::grid::PagerVariant;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid YAML options: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported options file extension: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedExtension(String),
}

/// Construction-time picker configuration.
///
/// ```yaml
/// backdrop: true
/// pager: triple
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerOptions {
    /// Show an overlay behind the picker; activating it hides the picker.
    pub backdrop: bool,
    pub pager: PagerVariant,
}

impl PickerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backdrop(mut self, backdrop: bool) -> Self {
        self.backdrop = backdrop;
        self
    }

    pub fn with_pager(mut self, pager: PagerVariant) -> Self {
        self.pager = pager;
        self
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads options from a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let options = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedExtension(ext)),
        };
        tracing::debug!(path = %path.display(), ?options, "loaded picker options");
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_single_pager_without_backdrop() {
        let options = PickerOptions::default();
        assert!(!options.backdrop);
        assert_eq!(options.pager, PagerVariant::Single);
        assert_eq!(PickerOptions::from_yaml_str("").expect("empty"), options);
    }

    #[test]
    fn parses_yaml() {
        let options = PickerOptions::from_yaml_str("backdrop: true\npager: triple\n").expect("yaml");
        assert_eq!(
            options,
            PickerOptions::new()
                .with_backdrop(true)
                .with_pager(PagerVariant::Triple)
        );
    }

    #[test]
    fn parses_partial_json() {
        let options = PickerOptions::from_json_str(r#"{"backdrop": true}"#).expect("json");
        assert!(options.backdrop);
        assert_eq!(options.pager, PagerVariant::Single);
    }

    #[test]
    fn rejects_unknown_keys_and_variants() {
        assert!(matches!(
            PickerOptions::from_yaml_str("overlay: true"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            PickerOptions::from_json_str(r#"{"pager": "double"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = std::env::temp_dir().join(format!("datepicker-options-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");

        let yaml = dir.join("picker.yml");
        std::fs::write(&yaml, "pager: triple\n").expect("write yaml");
        assert_eq!(
            PickerOptions::load(&yaml).expect("load yaml").pager,
            PagerVariant::Triple
        );

        let toml = dir.join("picker.toml");
        std::fs::write(&toml, "backdrop = true\n").expect("write toml");
        assert!(matches!(
            PickerOptions::load(&toml),
            Err(ConfigError::UnsupportedExtension(ext)) if ext == "toml"
        ));

        assert!(matches!(
            PickerOptions::load(dir.join("missing.yaml")),
            Err(ConfigError::Io { .. })
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

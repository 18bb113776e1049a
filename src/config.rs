use std::fs;
use std::path::PathBuf;

use cross_xdg::BaseDirs;
use serde::Deserialize;

use crate::engine::EofPolicy;

/// Environment variable consulted when `--eof` is not given.
pub const EOF_ENV: &str = "BF_EOF";

/// Contents of the optional `bf.toml` in the user's config directory.
///
/// ```toml
/// [interpreter]
/// eof = "unchanged"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub interpreter: InterpreterSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterpreterSettings {
    pub eof: Option<String>,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `bf.toml` from the XDG config home. A missing or unreadable file
    /// yields the defaults; a malformed one is reported and ignored.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };

        match Self::from_toml_str(&content) {
            Ok(settings) => {
                tracing::debug!(path = %path.display(), "loaded config");
                settings
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring malformed config: {e}");
                Self::default()
            }
        }
    }

    /// EOF policy from the config file, if set and valid.
    pub fn eof(&self) -> Option<EofPolicy> {
        parse_logged(self.interpreter.eof.as_deref()?, "config file")
    }
}

fn config_path() -> Option<PathBuf> {
    // On Linux: /home/<user>/.config/bf.toml
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn parse_logged(value: &str, origin: &str) -> Option<EofPolicy> {
    match value.parse() {
        Ok(policy) => Some(policy),
        Err(e) => {
            tracing::warn!("ignoring {origin} value: {e}");
            None
        }
    }
}

/// Resolve the EOF policy: flag, then `BF_EOF`, then `bf.toml`, then the default.
///
/// `settings` is only called when neither the flag nor the environment decides.
pub fn resolve_eof<F>(flag: Option<EofPolicy>, env: Option<&str>, settings: F) -> EofPolicy
where
    F: FnOnce() -> Settings,
{
    flag.or_else(|| env.and_then(|v| parse_logged(v, EOF_ENV)))
        .or_else(|| settings().eof())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_interpreter_section() {
        let settings = Settings::from_toml_str("[interpreter]\neof = \"unchanged\"\n").unwrap();
        assert_eq!(settings.eof(), Some(EofPolicy::Unchanged));
    }

    #[test]
    fn missing_sections_are_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.eof(), None);

        let settings = Settings::from_toml_str("[colors]\ntape = \"red\"\n").unwrap();
        assert_eq!(settings.eof(), None);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(Settings::from_toml_str("[interpreter\neof = ").is_err());
    }

    #[test]
    fn invalid_policy_in_file_is_ignored() {
        let settings = Settings::from_toml_str("[interpreter]\neof = \"maybe\"\n").unwrap();
        assert_eq!(settings.eof(), None);
    }

    #[test]
    fn config_file_is_not_loaded_when_flag_or_env_decides() {
        let loaded = std::cell::Cell::new(0);
        let load = || {
            loaded.set(loaded.get() + 1);
            Settings::default()
        };

        assert_eq!(resolve_eof(Some(EofPolicy::AllOnes), None, load), EofPolicy::AllOnes);
        assert_eq!(resolve_eof(None, Some("unchanged"), load), EofPolicy::Unchanged);
        assert_eq!(loaded.get(), 0);

        assert_eq!(resolve_eof(None, Some("bogus"), load), EofPolicy::Zero);
        assert_eq!(loaded.get(), 1);
    }

    #[test]
    fn resolution_order_is_flag_env_file_default() {
        let file = Settings::from_toml_str("[interpreter]\neof = \"all-ones\"\n").unwrap();

        assert_eq!(
            resolve_eof(Some(EofPolicy::Zero), Some("unchanged"), || file.clone()),
            EofPolicy::Zero
        );
        assert_eq!(resolve_eof(None, Some("unchanged"), || file.clone()), EofPolicy::Unchanged);
        assert_eq!(resolve_eof(None, Some("bogus"), || file.clone()), EofPolicy::AllOnes);
        assert_eq!(resolve_eof(None, None, || file.clone()), EofPolicy::AllOnes);
        assert_eq!(resolve_eof(None, None, Settings::default), EofPolicy::Zero);
    }
}

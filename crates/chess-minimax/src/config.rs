//! Settings file loading.
//!
//! Settings come from an optional TOML file; command-line flags override
//! whatever the file sets.

use chess_search::{EvaluationConfig, SearchError, SearchOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Engine settings as written in `chess-minimax.toml`.
///
/// ```toml
/// depth = 3
/// max_plies = 150
///
/// [evaluation]
/// threat = true
/// defense = false
/// fraction_divisor = 10
///
/// [search]
/// pruning = true
/// use_cache = true
/// cache_capacity = 65536
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Search depth in plies; must be given here or on the command line.
    pub depth: Option<u32>,
    /// Self-play stops after this many plies.
    pub max_plies: u32,
    pub evaluation: EvaluationConfig,
    pub search: SearchOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            depth: None,
            max_plies: 150,
            evaluation: EvaluationConfig::default(),
            search: SearchOptions::default(),
        }
    }
}

impl Settings {
    pub const DEFAULT_PATH: &'static str = "chess-minimax.toml";

    /// Loads settings from `path`, or from [`Self::DEFAULT_PATH`] when no
    /// path is given.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(Self::DEFAULT_PATH), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::ReadError { path, source })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The configured search depth, which must be at least one ply.
    pub fn search_depth(&self) -> Result<u32, SearchError> {
        match self.depth {
            None => Err(SearchError::InvalidConfiguration(
                "no search depth: pass --depth or set `depth` in the settings file".to_string(),
            )),
            Some(0) => Err(SearchError::InvalidConfiguration(
                "search depth must be at least 1".to_string(),
            )),
            Some(depth) => Ok(depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml("depth = 4\n[evaluation]\nthreat = true\n").unwrap();
        assert_eq!(settings.depth, Some(4));
        assert!(settings.evaluation.threat);
        assert!(!settings.evaluation.defense);
        assert_eq!(settings.evaluation.fraction_divisor, 10);
        assert_eq!(settings.max_plies, 150);
        assert_eq!(settings.search, SearchOptions::default());
    }

    #[test]
    fn search_table_switches_pruning_and_cache() {
        let settings =
            Settings::from_toml("[search]\npruning = false\ncache_capacity = 1024\n").unwrap();
        assert!(!settings.search.pruning);
        assert!(settings.search.use_cache);
        assert_eq!(settings.search.cache_capacity, 1024);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        for text in ["dept = 3", "[evaluation]\nthreats = true", "[search]\nprune = false"] {
            assert!(
                matches!(Settings::from_toml(text), Err(ConfigError::ParseError(_))),
                "{}",
                text
            );
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Settings::load(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.to_string().contains("exist.toml"));
    }

    #[test]
    fn search_depth_must_be_positive() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.search_depth(),
            Err(SearchError::InvalidConfiguration(_))
        ));
        settings.depth = Some(0);
        assert!(matches!(
            settings.search_depth(),
            Err(SearchError::InvalidConfiguration(_))
        ));
        settings.depth = Some(3);
        assert_eq!(settings.search_depth().unwrap(), 3);
    }

    proptest! {
        #[test]
        fn written_settings_load_back(
            depth in proptest::option::of(1u32..12),
            threat in any::<bool>(),
            defense in any::<bool>(),
            fraction_divisor in 1i32..1000,
            pruning in any::<bool>(),
            use_cache in any::<bool>(),
            cache_capacity in 0usize..(1 << 24),
            max_plies in 0u32..1000,
        ) {
            let settings = Settings {
                depth,
                max_plies,
                evaluation: EvaluationConfig { threat, defense, fraction_divisor },
                search: SearchOptions { pruning, use_cache, cache_capacity },
            };
            let text = toml::to_string(&settings).unwrap();
            prop_assert_eq!(Settings::from_toml(&text).unwrap(), settings);
        }
    }
}

//! March Madness matchup prediction
//!
//! Joins team-season statistic tables into per-team feature rows, pairs
//! bracket entries into labeled matchups, and trains a boosted-tree
//! classifier on the result.

pub mod data;
pub mod features;
pub mod training;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raw input tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    /// Team-season efficiency and shooting metrics (KenPom / Barttorvik)
    KenpomBarttorvik,
    /// Team resumes (quality wins, ELO, NET)
    Resumes,
    /// TeamRankings ratings and ranks
    TeamRankings,
    /// Bracket entries, one row per team per round
    TournamentMatchups,
}

impl DataSource {
    pub const ALL: [DataSource; 4] = [
        DataSource::KenpomBarttorvik,
        DataSource::Resumes,
        DataSource::TeamRankings,
        DataSource::TournamentMatchups,
    ];

    /// Short machine name, also the stem of the default file name
    pub fn key(&self) -> &'static str {
        match self {
            DataSource::KenpomBarttorvik => "kenpom_barttorvik",
            DataSource::Resumes => "resumes",
            DataSource::TeamRankings => "team_rankings",
            DataSource::TournamentMatchups => "tournament_matchups",
        }
    }

    pub fn default_file_name(&self) -> String {
        format!("{}.csv", self.key())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::KenpomBarttorvik => write!(f, "KenPom/Barttorvik"),
            DataSource::Resumes => write!(f, "Resumes"),
            DataSource::TeamRankings => write!(f, "TeamRankings"),
            DataSource::TournamentMatchups => write!(f, "Tournament matchups"),
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum MadnessError {
    #[error("Failed to load {data_source} from {path}: {message}")]
    Source {
        data_source: DataSource,
        path: String,
        message: String,
    },

    #[error("Column '{column}' not found in table '{table}'")]
    MissingColumn { table: String, column: String },

    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("Row {row} of table '{table}' has {found} values, expected {expected}")]
    RowWidth {
        table: String,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Unsupported model type: {0}")]
    UnsupportedModel(String),

    #[error("Model not trained - call train first")]
    NoModel,

    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Metric undefined: {0}")]
    Metric(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, MadnessError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the raw CSV files
    pub raw_data_path: String,
    pub kenpom_barttorvik_file: String,
    pub resumes_file: String,
    pub team_rankings_file: String,
    pub tournament_matchups_file: String,
}

impl DataConfig {
    /// File name configured for a source
    pub fn file_name(&self, source: DataSource) -> &str {
        match source {
            DataSource::KenpomBarttorvik => &self.kenpom_barttorvik_file,
            DataSource::Resumes => &self.resumes_file,
            DataSource::TeamRankings => &self.team_rankings_file,
            DataSource::TournamentMatchups => &self.tournament_matchups_file,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            raw_data_path: "data/raw".to_string(),
            kenpom_barttorvik_file: DataSource::KenpomBarttorvik.default_file_name(),
            resumes_file: DataSource::Resumes.default_file_name(),
            team_rankings_file: DataSource::TeamRankings.default_file_name(),
            tournament_matchups_file: DataSource::TournamentMatchups.default_file_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Classifier family tag
    pub model_type: String,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Split by row position instead of at random
    pub temporal: bool,
    /// Seed for the random split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            model_type: training::ClassifierKind::GradientBoosting.tag().to_string(),
            test_size: 0.2,
            temporal: true,
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MadnessError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| MadnessError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MadnessError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_keys() {
        for source in DataSource::ALL {
            assert_eq!(DataSource::from_key(source.key()), Some(source));
        }
        assert_eq!(
            DataSource::TournamentMatchups.default_file_name(),
            "tournament_matchups.csv"
        );
        assert_eq!(DataSource::from_key("team_matchups"), None);
    }

    #[test]
    fn test_config_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.training.test_size = 0.25;
        config.training.seed = Some(7);
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded.training.test_size, 0.25);
        assert_eq!(loaded.training.seed, Some(7));
        assert_eq!(loaded.training.model_type, "xgboost");
        assert_eq!(loaded.data.raw_data_path, "data/raw");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [training]
            model_type = "xgboost"
            test_size = 0.1
            temporal = false
            "#,
        )
        .unwrap();

        assert!(!config.training.temporal);
        assert_eq!(config.training.seed, None);
        assert_eq!(config.data.resumes_file, "resumes.csv");
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::load("/nonexistent/madness/config.toml").unwrap_err();
        assert!(matches!(err, MadnessError::Config(_)));
    }
}

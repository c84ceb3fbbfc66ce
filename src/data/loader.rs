//! Raw dataset loading
//!
//! Each source is read verbatim into a [`Table`]. No schema checks happen
//! here; a missing column surfaces later, at first access.

use crate::data::table::Table;
use crate::{DataConfig, DataSource, MadnessError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// The four raw tables the feature pipeline consumes
#[derive(Debug, Clone)]
pub struct RawDatasets {
    pub kenpom_barttorvik: Table,
    pub resumes: Table,
    pub team_rankings: Table,
    pub tournament_matchups: Table,
}

impl RawDatasets {
    pub fn get(&self, source: DataSource) -> &Table {
        match source {
            DataSource::KenpomBarttorvik => &self.kenpom_barttorvik,
            DataSource::Resumes => &self.resumes,
            DataSource::TeamRankings => &self.team_rankings,
            DataSource::TournamentMatchups => &self.tournament_matchups,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (DataSource, &Table)> {
        DataSource::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

/// Anything that can produce the raw tables
pub trait DatasetLoader {
    fn load(&self, source: DataSource) -> Result<Table>;

    fn load_all(&self) -> Result<RawDatasets> {
        Ok(RawDatasets {
            kenpom_barttorvik: self.load(DataSource::KenpomBarttorvik)?,
            resumes: self.load(DataSource::Resumes)?,
            team_rankings: self.load(DataSource::TeamRankings)?,
            tournament_matchups: self.load(DataSource::TournamentMatchups)?,
        })
    }
}

/// Loads CSV files from a base directory
#[derive(Debug, Clone)]
pub struct CsvLoader {
    base_dir: PathBuf,
    file_names: HashMap<DataSource, String>,
}

impl CsvLoader {
    /// Loader using the default file name for every source
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        CsvLoader {
            base_dir: base_dir.into(),
            file_names: DataSource::ALL
                .into_iter()
                .map(|s| (s, s.default_file_name()))
                .collect(),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        DataSource::ALL.into_iter().fold(
            CsvLoader::new(&config.raw_data_path),
            |loader, source| loader.with_file_name(source, config.file_name(source)),
        )
    }

    pub fn with_file_name(mut self, source: DataSource, file_name: impl Into<String>) -> Self {
        self.file_names.insert(source, file_name.into());
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path_for(&self, source: DataSource) -> PathBuf {
        match self.file_names.get(&source) {
            Some(name) => self.base_dir.join(name),
            None => self.base_dir.join(source.default_file_name()),
        }
    }
}

impl DatasetLoader for CsvLoader {
    fn load(&self, source: DataSource) -> Result<Table> {
        let path = self.path_for(source);
        let source_error = |message: String| MadnessError::Source {
            data_source: source,
            path: path.display().to_string(),
            message,
        };

        let file = File::open(&path).map_err(|e| source_error(e.to_string()))?;
        let table = Table::from_reader(source.key(), BufReader::new(file))
            .map_err(|e| source_error(e.to_string()))?;

        log::info!(
            "Loaded {}: {} rows, {} columns from {}",
            source,
            table.len(),
            table.columns().len(),
            path.display()
        );
        Ok(table)
    }
}

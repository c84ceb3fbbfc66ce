//! Feature assembly
//!
//! Joins the team-season tables into one row per team and attaches both
//! teams' rows to every bracket matchup.

use crate::data::{DatasetLoader, RawDatasets, Table};
use crate::features::columns::{
    Side, KENPOM_BARTTORVIK_COLUMNS, RESUME_COLUMNS, TEAM, TEAM_1_NAME, TEAM_2_NAME,
    TEAM_RANKING_COLUMNS, TEAM_SEASON_KEY, YEAR,
};
use crate::features::matchup::{pair_entries, pairs_to_table, BracketEntry, MatchupPair};
use crate::Result;

/// Builds model-ready tables from the raw datasets
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    datasets: RawDatasets,
}

impl FeatureAssembler {
    pub fn new(datasets: RawDatasets) -> Self {
        FeatureAssembler { datasets }
    }

    /// Load every source through `loader`
    pub fn from_loader<L: DatasetLoader + ?Sized>(loader: &L) -> Result<Self> {
        Ok(Self::new(loader.load_all()?))
    }

    pub fn datasets(&self) -> &RawDatasets {
        &self.datasets
    }

    /// One row per team-season with the selected columns of all three
    /// team tables.
    ///
    /// Example output:
    /// `YEAR | TEAM NO | TEAM | SEED | ... | Q1 W | ... | TR RATING | SOS RANK | ...`
    ///
    /// Rows come from the KenPom/Barttorvik table; resumes and rankings are
    /// left-joined on (YEAR, TEAM NO). Duplicate keys in a right table
    /// multiply rows rather than being rejected.
    pub fn combine_into_one_dataset(&self) -> Result<Table> {
        let kenpom_bart = self
            .datasets
            .kenpom_barttorvik
            .select(&KENPOM_BARTTORVIK_COLUMNS)?;
        let resumes = self.datasets.resumes.select(&RESUME_COLUMNS)?;
        let rankings = self.datasets.team_rankings.select(&TEAM_RANKING_COLUMNS)?;

        let combined = kenpom_bart
            .left_join(&resumes, &TEAM_SEASON_KEY)?
            .left_join(&rankings, &TEAM_SEASON_KEY)?
            .with_name("team_features");

        log::info!(
            "Combined team features: {} rows, {} columns",
            combined.len(),
            combined.columns().len()
        );
        Ok(combined)
    }

    /// Typed matchup pairs in (year, round) order
    pub fn matchup_pairs(&self) -> Result<Vec<MatchupPair>> {
        let entries = BracketEntry::from_table(&self.datasets.tournament_matchups)?;
        let pairs = pair_entries(&entries);
        log::info!(
            "Paired {} bracket entries into {} matchups",
            entries.len(),
            pairs.len()
        );
        Ok(pairs)
    }

    /// Matchup pairs as a table (YEAR, ROUND, TEAM_1_NAME, TEAM_2_NAME,
    /// TEAM_1_SCORE, TEAM_2_SCORE, WINNER)
    pub fn create_matchup_pairs(&self) -> Result<Table> {
        pairs_to_table(&self.matchup_pairs()?)
    }

    /// Every matchup pair with both teams' combined features.
    ///
    /// Team 1 columns carry a `_T1` suffix and team 2 columns `_T2`. Teams
    /// are matched by exact name within the year; a team with no feature
    /// row leaves its side missing and the matchup is kept.
    pub fn create_matchup_features(&self) -> Result<Table> {
        let team_features = self.combine_into_one_dataset()?;
        let matchups = self.create_matchup_pairs()?.rename_with(|c| match c {
            TEAM_1_NAME => Side::One.team_column().to_string(),
            TEAM_2_NAME => Side::Two.team_column().to_string(),
            other => other.to_string(),
        });

        let mut features = matchups;
        for side in Side::BOTH {
            let side_features = side_features(&team_features, side)?;
            features = features.left_join(&side_features, &[YEAR, side.team_column()])?;
        }

        let features = features.with_name("matchup_features");
        log::info!(
            "Matchup features: {} rows, {} columns",
            features.len(),
            features.columns().len()
        );
        Ok(features)
    }
}

/// Team feature table prepared for joining onto one side of a matchup:
/// TEAM renamed to the side's team column, everything else but YEAR
/// suffixed.
fn side_features(team_features: &Table, side: Side) -> Result<Table> {
    let renamed = team_features.rename_with(|c| match c {
        YEAR => c.to_string(),
        TEAM => side.team_column().to_string(),
        other => side.feature_column(other),
    });

    let columns: Vec<&str> = [YEAR, side.team_column()]
        .into_iter()
        .chain(
            renamed
                .columns()
                .iter()
                .map(String::as_str)
                .filter(|c| c.ends_with(side.suffix())),
        )
        .collect();
    renamed.select(&columns)
}

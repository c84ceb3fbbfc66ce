//! Matchup pairing
//!
//! Turns bracket entries (one row per team per round) into head-to-head
//! pairs with a winner label.

use crate::data::{Table, Value};
use crate::features::columns::{PAIR_COLUMNS, ROUND, SCORE, TEAM, YEAR};
use crate::Result;
use std::collections::BTreeMap;

/// One row of the bracket table
#[derive(Debug, Clone, PartialEq)]
pub struct BracketEntry {
    pub year: i64,
    pub round: i64,
    pub team: Value,
    pub score: Value,
}

impl BracketEntry {
    /// Read entries in table order.
    ///
    /// Rows without an integral YEAR and ROUND cannot be grouped and are
    /// skipped.
    pub fn from_table(table: &Table) -> Result<Vec<BracketEntry>> {
        let year_idx = table.column_index(YEAR)?;
        let round_idx = table.column_index(ROUND)?;
        let team_idx = table.column_index(TEAM)?;
        let score_idx = table.column_index(SCORE)?;

        let mut entries = Vec::with_capacity(table.len());
        for (i, row) in table.rows().iter().enumerate() {
            match (row[year_idx].as_i64(), row[round_idx].as_i64()) {
                (Some(year), Some(round)) => entries.push(BracketEntry {
                    year,
                    round,
                    team: row[team_idx].clone(),
                    score: row[score_idx].clone(),
                }),
                _ => log::warn!(
                    "Skipping bracket row {}: YEAR={:?} ROUND={:?}",
                    i,
                    row[year_idx],
                    row[round_idx]
                ),
            }
        }
        Ok(entries)
    }
}

/// Two bracket entries facing each other
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupPair {
    pub year: i64,
    pub round: i64,
    pub team_1: Value,
    pub team_2: Value,
    pub team_1_score: Value,
    pub team_2_score: Value,
    /// 1 = team 1 won, 0 = team 2 won, None = not played yet
    pub winner: Option<u8>,
}

impl MatchupPair {
    pub fn new(year: i64, round: i64, first: &BracketEntry, second: &BracketEntry) -> Self {
        MatchupPair {
            year,
            round,
            team_1: first.team.clone(),
            team_2: second.team.clone(),
            team_1_score: first.score.clone(),
            team_2_score: second.score.clone(),
            winner: decide_winner(first.score.as_f64(), second.score.as_f64()),
        }
    }

    /// Row laid out as [`PAIR_COLUMNS`]
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::Number(self.year as f64),
            Value::Number(self.round as f64),
            self.team_1.clone(),
            self.team_2.clone(),
            self.team_1_score.clone(),
            self.team_2_score.clone(),
            self.winner.map(f64::from).into(),
        ]
    }
}

/// Winner label from two scores.
///
/// Team 1 wins only on a strictly greater score, so a tie is labeled as a
/// team 2 win. Either score missing means the game has no label.
pub fn decide_winner(team_1_score: Option<f64>, team_2_score: Option<f64>) -> Option<u8> {
    match (team_1_score, team_2_score) {
        (Some(s1), Some(s2)) => Some(if s1 > s2 { 1 } else { 0 }),
        _ => None,
    }
}

/// Pair entries within each (year, round), years and rounds ascending.
///
/// Entries keep their table order inside a group and are paired as
/// (0,1), (2,3), ... An odd entry at the end of a group is dropped.
// NOTE: pairing follows row order, not bracket slot or seed
pub fn pair_entries(entries: &[BracketEntry]) -> Vec<MatchupPair> {
    let mut groups: BTreeMap<(i64, i64), Vec<&BracketEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry((entry.year, entry.round)).or_default().push(entry);
    }

    let mut pairs = Vec::with_capacity(entries.len() / 2);
    for ((year, round), group) in &groups {
        if group.len() % 2 == 1 {
            log::debug!(
                "Year {} round {}: odd entry count {}, dropping {:?}",
                year,
                round,
                group.len(),
                group[group.len() - 1].team
            );
        }
        for chunk in group.chunks_exact(2) {
            pairs.push(MatchupPair::new(*year, *round, chunk[0], chunk[1]));
        }
    }
    pairs
}

/// Pairs as a table with [`PAIR_COLUMNS`]
pub fn pairs_to_table(pairs: &[MatchupPair]) -> Result<Table> {
    Table::from_rows(
        "matchup_pairs",
        PAIR_COLUMNS.iter().map(|c| c.to_string()).collect(),
        pairs.iter().map(MatchupPair::to_row).collect(),
    )
}

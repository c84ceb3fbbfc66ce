//! Column names used by the feature pipeline

pub const YEAR: &str = "YEAR";
pub const TEAM_NO: &str = "TEAM NO";
pub const TEAM: &str = "TEAM";
pub const ROUND: &str = "ROUND";
pub const SCORE: &str = "SCORE";

pub const TEAM_1_NAME: &str = "TEAM_1_NAME";
pub const TEAM_2_NAME: &str = "TEAM_2_NAME";
pub const TEAM_1_SCORE: &str = "TEAM_1_SCORE";
pub const TEAM_2_SCORE: &str = "TEAM_2_SCORE";
pub const WINNER: &str = "WINNER";

/// Team-season join key
pub const TEAM_SEASON_KEY: [&str; 2] = [YEAR, TEAM_NO];

/// Subset taken from the KenPom/Barttorvik table
pub const KENPOM_BARTTORVIK_COLUMNS: [&str; 18] = [
    YEAR, TEAM_NO, TEAM, "SEED",
    // adjusted efficiency
    "BADJ EM", "BADJ O", "BADJ D",
    // effective field goal
    "EFG%", "EFG%D",
    // three point shooting
    "3PT%", "3PT%D",
    // free throw rate
    "FTR", "FTRD",
    // turnovers
    "TOV%", "TOV%D",
    // rebounding
    "OREB%", "DREB%",
    "AST%",
];

/// Subset taken from the resumes table
pub const RESUME_COLUMNS: [&str; 7] = [
    YEAR, TEAM_NO,
    // Q1 = win against a top 25 team, Q2 = win against a team ranked 26-50
    "Q1 W", "Q2 W", "Q1 PLUS Q2 W",
    "ELO", "NET RPI",
];

/// Subset taken from the TeamRankings table
pub const TEAM_RANKING_COLUMNS: [&str; 8] = [
    YEAR, TEAM_NO,
    "TR RATING", "SOS RANK", "LUCK RANK", "CONSISTENCY RANK",
    // record vs ranked teams
    "V 1-25 WINS", "V 1-25 LOSS",
];

/// Columns of the matchup pairs table
pub const PAIR_COLUMNS: [&str; 7] = [
    YEAR, ROUND, TEAM_1_NAME, TEAM_2_NAME, TEAM_1_SCORE, TEAM_2_SCORE, WINNER,
];

/// Side of a matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::One, Side::Two];

    /// Suffix appended to every per-team feature column
    pub fn suffix(&self) -> &'static str {
        match self {
            Side::One => "_T1",
            Side::Two => "_T2",
        }
    }

    /// Team-name column of the matchup table for this side
    pub fn team_column(&self) -> &'static str {
        match self {
            Side::One => "TEAM1",
            Side::Two => "TEAM2",
        }
    }

    /// Name of a team-season column once attached to this side
    pub fn feature_column(&self, column: &str) -> String {
        format!("{}{}", column, self.suffix())
    }
}

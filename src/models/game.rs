//! Game model and the closed status enumeration.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a scheduled game.
///
/// The set is closed: a stored status outside it fails deserialization,
/// which the store accessor turns into the default-fallback path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Scheduled,
    Tonight,
    Live,
    Completed,
    Rescheduled,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::Tonight => "tonight",
            GameStatus::Live => "live",
            GameStatus::Completed => "completed",
            GameStatus::Rescheduled => "rescheduled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(GameStatus::Scheduled),
            "tonight" => Some(GameStatus::Tonight),
            "live" => Some(GameStatus::Live),
            "completed" => Some(GameStatus::Completed),
            "rescheduled" => Some(GameStatus::Rescheduled),
            _ => None,
        }
    }

    /// Display label used by the site ("Final" for completed games).
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "Scheduled",
            GameStatus::Tonight => "Tonight",
            GameStatus::Live => "LIVE",
            GameStatus::Completed => "Final",
            GameStatus::Rescheduled => "Rescheduled",
        }
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        GameStatus::Scheduled
    }
}

/// A single game on the weekly schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub is_game_of_week: bool,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub home_score: i64,
    #[serde(default)]
    pub away_score: i64,
    #[serde(default)]
    pub notes: String,
}

impl Game {
    /// A freshly added game: default matchup, scheduled, zero scores.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            home_team: "eagles".to_string(),
            away_team: "steelers".to_string(),
            status: GameStatus::Scheduled,
            is_game_of_week: false,
            time: String::new(),
            date: String::new(),
            home_score: 0,
            away_score: 0,
            notes: String::new(),
        }
    }

    // Presentational flags are derived purely from status, never stored.

    pub fn is_live(&self) -> bool {
        self.status == GameStatus::Live
    }

    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }

    pub fn is_tonight(&self) -> bool {
        self.status == GameStatus::Tonight
    }

    /// Scores are meaningful only while live or after completion.
    pub fn has_score(&self) -> bool {
        matches!(self.status, GameStatus::Live | GameStatus::Completed)
    }
}

/// Per-field patch applied to a game by the editor; unset fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePatch {
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub status: Option<GameStatus>,
    #[serde(default)]
    pub is_game_of_week: Option<bool>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub home_score: Option<i64>,
    #[serde(default)]
    pub away_score: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Game {
    /// Apply a patch in place.
    pub fn apply(&mut self, patch: GamePatch) {
        if let Some(v) = patch.home_team {
            self.home_team = v;
        }
        if let Some(v) = patch.away_team {
            self.away_team = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.is_game_of_week {
            self.is_game_of_week = v;
        }
        if let Some(v) = patch.time {
            self.time = v;
        }
        if let Some(v) = patch.date {
            self.date = v;
        }
        if let Some(v) = patch.home_score {
            self.home_score = v;
        }
        if let Some(v) = patch.away_score {
            self.away_score = v;
        }
        if let Some(v) = patch.notes {
            self.notes = v;
        }
    }
}

/// The seeded week-11 slate, written only when the store has no schedule yet.
pub fn default_schedule() -> Vec<Game> {
    let mk = |id: i64, home: &str, away: &str, status: GameStatus, gotw: bool, hs: i64, as_: i64| {
        Game {
            id,
            home_team: home.to_string(),
            away_team: away.to_string(),
            status,
            is_game_of_week: gotw,
            time: String::new(),
            date: String::new(),
            home_score: hs,
            away_score: as_,
            notes: String::new(),
        }
    };

    vec![
        mk(1, "eagles", "steelers", GameStatus::Scheduled, true, 0, 0),
        mk(2, "saints", "raiders", GameStatus::Completed, false, 56, 0),
        mk(3, "texans", "titans", GameStatus::Scheduled, false, 0, 0),
        mk(4, "ravens", "rams", GameStatus::Scheduled, false, 0, 0),
        mk(5, "broncos", "dolphins", GameStatus::Scheduled, false, 0, 0),
        mk(6, "falcons", "jets", GameStatus::Scheduled, false, 0, 0),
        mk(7, "bills", "chiefs", GameStatus::Rescheduled, false, 0, 0),
        mk(8, "lions", "bears", GameStatus::Scheduled, false, 0, 0),
        mk(9, "jaguars", "niners", GameStatus::Scheduled, false, 0, 0),
        mk(10, "colts", "commanders", GameStatus::Scheduled, false, 0, 0),
    ]
}

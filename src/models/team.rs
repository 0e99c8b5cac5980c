//! The fixed 32-team roster and win-loss record defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Conference a team belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Conference {
    #[serde(rename = "AFC")]
    Afc,
    #[serde(rename = "NFC")]
    Nfc,
}

/// A league team. The roster is a closed set; team ids referenced by games
/// and records must come from [`ALL_TEAMS`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Team {
    pub id: &'static str,
    pub name: &'static str,
    pub abbr: &'static str,
    pub conference: Conference,
}

/// All 32 teams, ordered by city name as the site lists them.
pub const ALL_TEAMS: [Team; 32] = [
    Team { id: "cardinals", name: "Arizona Cardinals", abbr: "ARI", conference: Conference::Nfc },
    Team { id: "falcons", name: "Atlanta Falcons", abbr: "ATL", conference: Conference::Nfc },
    Team { id: "ravens", name: "Baltimore Ravens", abbr: "BAL", conference: Conference::Afc },
    Team { id: "bills", name: "Buffalo Bills", abbr: "BUF", conference: Conference::Afc },
    Team { id: "panthers", name: "Carolina Panthers", abbr: "CAR", conference: Conference::Nfc },
    Team { id: "bears", name: "Chicago Bears", abbr: "CHI", conference: Conference::Nfc },
    Team { id: "bengals", name: "Cincinnati Bengals", abbr: "CIN", conference: Conference::Afc },
    Team { id: "browns", name: "Cleveland Browns", abbr: "CLE", conference: Conference::Afc },
    Team { id: "cowboys", name: "Dallas Cowboys", abbr: "DAL", conference: Conference::Nfc },
    Team { id: "broncos", name: "Denver Broncos", abbr: "DEN", conference: Conference::Afc },
    Team { id: "lions", name: "Detroit Lions", abbr: "DET", conference: Conference::Nfc },
    Team { id: "packers", name: "Green Bay Packers", abbr: "GB", conference: Conference::Nfc },
    Team { id: "texans", name: "Houston Texans", abbr: "HOU", conference: Conference::Afc },
    Team { id: "colts", name: "Indianapolis Colts", abbr: "IND", conference: Conference::Afc },
    Team { id: "jaguars", name: "Jacksonville Jaguars", abbr: "JAX", conference: Conference::Afc },
    Team { id: "chiefs", name: "Kansas City Chiefs", abbr: "KC", conference: Conference::Afc },
    Team { id: "raiders", name: "Las Vegas Raiders", abbr: "LV", conference: Conference::Afc },
    Team { id: "chargers", name: "Los Angeles Chargers", abbr: "LAC", conference: Conference::Afc },
    Team { id: "rams", name: "Los Angeles Rams", abbr: "LAR", conference: Conference::Nfc },
    Team { id: "dolphins", name: "Miami Dolphins", abbr: "MIA", conference: Conference::Afc },
    Team { id: "vikings", name: "Minnesota Vikings", abbr: "MIN", conference: Conference::Nfc },
    Team { id: "patriots", name: "New England Patriots", abbr: "NE", conference: Conference::Afc },
    Team { id: "saints", name: "New Orleans Saints", abbr: "NO", conference: Conference::Nfc },
    Team { id: "giants", name: "New York Giants", abbr: "NYG", conference: Conference::Nfc },
    Team { id: "jets", name: "New York Jets", abbr: "NYJ", conference: Conference::Afc },
    Team { id: "eagles", name: "Philadelphia Eagles", abbr: "PHI", conference: Conference::Nfc },
    Team { id: "steelers", name: "Pittsburgh Steelers", abbr: "PIT", conference: Conference::Afc },
    Team { id: "niners", name: "San Francisco 49ers", abbr: "SF", conference: Conference::Nfc },
    Team { id: "seahawks", name: "Seattle Seahawks", abbr: "SEA", conference: Conference::Nfc },
    Team { id: "buccaneers", name: "Tampa Bay Buccaneers", abbr: "TB", conference: Conference::Nfc },
    Team { id: "titans", name: "Tennessee Titans", abbr: "TEN", conference: Conference::Afc },
    Team { id: "commanders", name: "Washington Commanders", abbr: "WAS", conference: Conference::Nfc },
];

/// Look up a team by its id.
pub fn team_by_id(id: &str) -> Option<&'static Team> {
    ALL_TEAMS.iter().find(|t| t.id == id)
}

/// Display name for a team id; falls back to the raw id for unknown teams.
pub fn team_name(id: &str) -> &str {
    team_by_id(id).map(|t| t.name).unwrap_or(id)
}

/// Mapping team id -> win-loss(-tie) string. Values are free text; the site
/// shows whatever the editor typed.
pub type TeamRecords = BTreeMap<String, String>;

/// Seeded records for all 32 teams, written only when the store is empty.
pub fn default_team_records() -> TeamRecords {
    let seed = [
        ("eagles", "6-4"),
        ("steelers", "8-1"),
        ("texans", "7-3"),
        ("titans", "7-3"),
        ("ravens", "7-3"),
        ("rams", "6-4"),
        ("broncos", "6-4"),
        ("dolphins", "4-6"),
        ("falcons", "5-3-2"),
        ("jets", "6-3-1"),
        ("bills", "5-5"),
        ("chiefs", "5-5"),
        ("lions", "6-2-2"),
        ("bears", "5-5"),
        ("jaguars", "5-4-1"),
        ("niners", "5-4-1"),
        ("colts", "6-3-1"),
        ("commanders", "7-3"),
        ("saints", "5-5-1"),
        ("raiders", "4-7"),
        ("cardinals", "0-0"),
        ("panthers", "0-0"),
        ("bengals", "0-0"),
        ("browns", "0-0"),
        ("cowboys", "0-0"),
        ("packers", "0-0"),
        ("chargers", "0-0"),
        ("vikings", "0-0"),
        ("patriots", "0-0"),
        ("giants", "0-0"),
        ("seahawks", "0-0"),
        ("buccaneers", "0-0"),
    ];
    seed.iter()
        .map(|(id, record)| (id.to_string(), record.to_string()))
        .collect()
}

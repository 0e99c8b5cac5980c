//! Rule section model.

use serde::{Deserialize, Serialize};

/// A titled section of the rulebook. Items are plain strings addressed by
/// index within their section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleSection {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl RuleSection {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            title: "New Section".to_string(),
            items: Vec::new(),
        }
    }
}

/// The seeded rulebook, written only when the store has no rules yet.
pub fn default_rules() -> Vec<RuleSection> {
    vec![
        RuleSection {
            id: 1,
            title: "Prohibited Behavior".to_string(),
            items: vec![
                "No NSFW content".to_string(),
                "No racial slurs".to_string(),
                "No doxxing".to_string(),
            ],
        },
        RuleSection {
            id: 2,
            title: "Game Rules".to_string(),
            items: vec![
                "7v7+ only".to_string(),
                "9v9 standard".to_string(),
                "Must have referee".to_string(),
            ],
        },
    ]
}

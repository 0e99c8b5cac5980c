//! Link models: the four fixed site link categories.

use serde::{Deserialize, Serialize};

/// The four fixed link categories managed by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCategory {
    RuleLinks,
    StatLinks,
    DiscordLinks,
    SocialLinks,
}

impl LinkCategory {
    pub const ALL: [LinkCategory; 4] = [
        LinkCategory::RuleLinks,
        LinkCategory::StatLinks,
        LinkCategory::DiscordLinks,
        LinkCategory::SocialLinks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkCategory::RuleLinks => "ruleLinks",
            LinkCategory::StatLinks => "statLinks",
            LinkCategory::DiscordLinks => "discordLinks",
            LinkCategory::SocialLinks => "socialLinks",
        }
    }
}

/// A single link. The optional fields are category-specific: `desc` for
/// rule links, `current` for stat links, `primary` for discord links,
/// `platform` for social links. Absent fields stay off the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: i64,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
    #[serde(rename = "primary", skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl Link {
    /// A freshly added link with the category's defaults.
    pub fn new(id: i64, category: LinkCategory) -> Self {
        let mut link = Self {
            id,
            name: "New Link".to_string(),
            url: String::new(),
            desc: None,
            current: None,
            is_primary: None,
            platform: None,
        };
        match category {
            LinkCategory::RuleLinks => link.desc = Some(String::new()),
            LinkCategory::StatLinks => {
                link.desc = Some(String::new());
                link.current = Some(false);
            }
            LinkCategory::DiscordLinks => {
                link.desc = Some(String::new());
                link.is_primary = Some(false);
            }
            LinkCategory::SocialLinks => link.platform = Some("twitch".to_string()),
        }
        link
    }
}

/// Per-field patch applied to a link by the editor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub current: Option<bool>,
    #[serde(default, rename = "primary")]
    pub is_primary: Option<bool>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl Link {
    pub fn apply(&mut self, patch: LinkPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.url {
            self.url = v;
        }
        if let Some(v) = patch.desc {
            self.desc = Some(v);
        }
        if let Some(v) = patch.current {
            self.current = Some(v);
        }
        if let Some(v) = patch.is_primary {
            self.is_primary = Some(v);
        }
        if let Some(v) = patch.platform {
            self.platform = Some(v);
        }
    }
}

/// All site links, one ordered list per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkCollections {
    #[serde(default)]
    pub rule_links: Vec<Link>,
    #[serde(default)]
    pub stat_links: Vec<Link>,
    #[serde(default)]
    pub discord_links: Vec<Link>,
    #[serde(default)]
    pub social_links: Vec<Link>,
}

impl LinkCollections {
    pub fn category(&self, category: LinkCategory) -> &Vec<Link> {
        match category {
            LinkCategory::RuleLinks => &self.rule_links,
            LinkCategory::StatLinks => &self.stat_links,
            LinkCategory::DiscordLinks => &self.discord_links,
            LinkCategory::SocialLinks => &self.social_links,
        }
    }

    pub fn category_mut(&mut self, category: LinkCategory) -> &mut Vec<Link> {
        match category {
            LinkCategory::RuleLinks => &mut self.rule_links,
            LinkCategory::StatLinks => &mut self.stat_links,
            LinkCategory::DiscordLinks => &mut self.discord_links,
            LinkCategory::SocialLinks => &mut self.social_links,
        }
    }

    /// Total number of links across all categories.
    pub fn total(&self) -> usize {
        LinkCategory::ALL
            .iter()
            .map(|c| self.category(*c).len())
            .sum()
    }
}

/// The seeded link set, written only when the store has no links yet.
pub fn default_links() -> LinkCollections {
    LinkCollections {
        rule_links: vec![
            Link {
                id: 1,
                name: "Game Rules".to_string(),
                url: "https://docs.google.com/document/d/1pWO6OCmT8vJLj2Ifnsj3QG4Mv7uMrs0kC4_t4cqWW_I/edit?usp=sharing".to_string(),
                desc: Some("Official referee rulebook".to_string()),
                current: None,
                is_primary: None,
                platform: None,
            },
            Link {
                id: 2,
                name: "Server Rules".to_string(),
                url: "https://docs.google.com/document/d/1HsB4S4UnoOpqF9A2GvsxN_C61NQs2R6jERLxAPMOszw/edit?tab=t.0".to_string(),
                desc: Some("Discord server guidelines".to_string()),
                current: None,
                is_primary: None,
                platform: None,
            },
        ],
        stat_links: vec![
            Link {
                id: 1,
                name: "Season 4 Stats".to_string(),
                url: "https://docs.google.com/spreadsheets/d/1RtFklm_vGwmPfvngxd9nPXdSFUjzf4JW2oCNntsHmw0/edit".to_string(),
                desc: None,
                current: Some(true),
                is_primary: None,
                platform: None,
            },
            Link {
                id: 2,
                name: "Season 3 Stats".to_string(),
                url: "https://docs.google.com/spreadsheets/d/1CBpdNxBFBwVhKgyG5Tdmw22brynvKn27vY46_PekZAY/edit".to_string(),
                desc: None,
                current: Some(false),
                is_primary: None,
                platform: None,
            },
            Link {
                id: 3,
                name: "All Time Stats".to_string(),
                url: "https://docs.google.com/spreadsheets/d/13yh7xz6XhVVvvV0HBD_P2ddeno9LbjIUZ5Ym18dFkwI/edit".to_string(),
                desc: None,
                current: Some(false),
                is_primary: None,
                platform: None,
            },
        ],
        discord_links: vec![Link {
            id: 1,
            name: "RCL Main Server".to_string(),
            url: "https://discord.gg/AbYZ2CBzmq".to_string(),
            desc: None,
            current: None,
            is_primary: Some(true),
            platform: None,
        }],
        social_links: vec![
            Link {
                id: 1,
                name: "Twitch".to_string(),
                url: "https://twitch.tv/lastqall".to_string(),
                desc: None,
                current: None,
                is_primary: None,
                platform: Some("twitch".to_string()),
            },
            Link {
                id: 2,
                name: "YouTube".to_string(),
                url: "https://youtube.com/@Lastqall".to_string(),
                desc: None,
                current: None,
                is_primary: None,
                platform: Some("youtube".to_string()),
            },
        ],
    }
}

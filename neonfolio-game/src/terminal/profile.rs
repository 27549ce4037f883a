//! Owner-specific text the terminal prints (about, links, neofetch, banner).
use serde::{Deserialize, Serialize};

const DEFAULT_PROFILE_DATA: &str = include_str!("../../assets/profile.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeofetchInfo {
    pub title: String,
    #[serde(default)]
    pub facts: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalProfile {
    pub owner: String,
    pub prompt: String,
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub social: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub neofetch: NeofetchInfo,
    #[serde(default)]
    pub banner: Vec<String>,
}

impl Default for TerminalProfile {
    fn default() -> Self {
        serde_json::from_str(DEFAULT_PROFILE_DATA).unwrap_or_else(|err| {
            log::warn!("embedded terminal profile unreadable ({err}), using minimal profile");
            Self::minimal()
        })
    }
}

impl TerminalProfile {
    /// Parse a profile supplied by the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a profile.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn minimal() -> Self {
        Self {
            owner: String::from("Developer"),
            prompt: String::from("visitor@portfolio:~$"),
            about: Vec::new(),
            social: Vec::new(),
            projects: Vec::new(),
            skills: Vec::new(),
            neofetch: NeofetchInfo {
                title: String::from("dev@portfolio"),
                facts: Vec::new(),
            },
            banner: Vec::new(),
        }
    }
}

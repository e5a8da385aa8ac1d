//! Top-level chat commands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The search variant chosen when a booking starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCommand {
    LowPrice,
    HighPrice,
    BestDeal,
}

impl SearchCommand {
    /// The slash command that starts this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchCommand::LowPrice => "/lowprice",
            SearchCommand::HighPrice => "/highprice",
            SearchCommand::BestDeal => "/bestdeal",
        }
    }

    /// Only best-deal asks for a price range and a maximum distance.
    pub fn needs_price_and_distance(&self) -> bool {
        matches!(self, SearchCommand::BestDeal)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "/lowprice" => Some(SearchCommand::LowPrice),
            "/highprice" => Some(SearchCommand::HighPrice),
            "/bestdeal" => Some(SearchCommand::BestDeal),
            _ => None,
        }
    }
}

impl fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commands recognised in any stage, regardless of what prompt is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevelCommand {
    Start,
    Help,
    History,
    Search(SearchCommand),
}

impl TopLevelCommand {
    /// Parses a message text. Group chats append `@botname`; that suffix is
    /// ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let word = word.split('@').next().unwrap_or(word);
        match word {
            "/start" => Some(TopLevelCommand::Start),
            "/help" => Some(TopLevelCommand::Help),
            "/history" => Some(TopLevelCommand::History),
            other => SearchCommand::parse(other).map(TopLevelCommand::Search),
        }
    }
}

/// Greetings are answered like `/start`.
pub fn is_greeting(text: &str) -> bool {
    let first = text
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())
        .map(str::to_lowercase);
    match first {
        Some(word) => word.starts_with("привет") || ["hi", "hello", "hey"].contains(&word.as_str()),
        None => false,
    }
}

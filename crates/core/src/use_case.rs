//! Use-cases that select a context token budget.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// What the assembled context is for. Each use-case has its own hard
/// token ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UseCase {
    /// Morning briefing: threads with momentum plus recent notes
    Briefing,
    /// Cross-thread prioritisation
    Synthesis,
    /// Single-thread exploration
    DeepDive,
    /// Free-form chat turn
    Chat,
}

impl UseCase {
    pub const ALL: [UseCase; 4] = [Self::Briefing, Self::Synthesis, Self::DeepDive, Self::Chat];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Briefing => "briefing",
            Self::Synthesis => "synthesis",
            Self::DeepDive => "deep-dive",
            Self::Chat => "chat",
        }
    }

    /// Human-readable name for logs.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Briefing => "Morning Briefing",
            Self::Synthesis => "Cross-Thread Synthesis",
            Self::DeepDive => "Thread Deep-Dive",
            Self::Chat => "Chat",
        }
    }
}

impl std::fmt::Display for UseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UseCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "briefing" => Ok(Self::Briefing),
            "synthesis" => Ok(Self::Synthesis),
            "deep-dive" | "deepdive" => Ok(Self::DeepDive),
            "chat" => Ok(Self::Chat),
            other => Err(Error::InvalidInput(format!("unknown use-case: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        assert_eq!("deep-dive".parse::<UseCase>().unwrap(), UseCase::DeepDive);
        assert_eq!("deep_dive".parse::<UseCase>().unwrap(), UseCase::DeepDive);
        assert_eq!("Briefing".parse::<UseCase>().unwrap(), UseCase::Briefing);
        assert!("meal-plan".parse::<UseCase>().is_err());
    }

    #[test]
    fn descriptions_are_distinct() {
        assert_eq!(UseCase::DeepDive.description(), "Thread Deep-Dive");
        let mut seen: Vec<&str> = UseCase::ALL.iter().map(|u| u.description()).collect();
        seen.dedup();
        assert_eq!(seen.len(), UseCase::ALL.len());
    }

    #[test]
    fn display_matches_serde() {
        for use_case in UseCase::ALL {
            let json = serde_json::to_string(&use_case).unwrap();
            assert_eq!(json, format!("\"{use_case}\""));
        }
    }
}

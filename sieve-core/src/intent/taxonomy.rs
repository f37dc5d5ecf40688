use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ClassificationError;

/// The four query intents. Closed set: every weight lookup is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// A specific fact is asked for.
    Factual,
    /// Exact terms, identifiers or quoted strings matter most.
    Keyword,
    /// Open-ended browsing of related material.
    Exploratory,
    /// A broad overview across themes.
    Summary,
}

impl Intent {
    /// Total number of intent types.
    pub const COUNT: usize = 4;

    /// All variants for iteration.
    pub const ALL: [Intent; 4] = [
        Self::Factual,
        Self::Keyword,
        Self::Exploratory,
        Self::Summary,
    ];

    /// Stable lowercase label, as written in config and model output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Factual => "factual",
            Self::Keyword => "keyword",
            Self::Exploratory => "exploratory",
            Self::Summary => "summary",
        }
    }

    /// Lenient parse of free-form model output.
    ///
    /// Case, surrounding whitespace and punctuation are ignored; the first
    /// word that names an intent wins. Returns `None` when no word does.
    pub fn parse_label(raw: &str) -> Option<Intent> {
        raw.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .find_map(|word| {
                let word = word.to_lowercase();
                Self::ALL.into_iter().find(|i| i.as_str() == word)
            })
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = ClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s).ok_or_else(|| ClassificationError::UnknownLabel {
            label: s.to_string(),
        })
    }
}

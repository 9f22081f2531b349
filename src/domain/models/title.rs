use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of catalog title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TitleKind {
    Movie,
    Series,
}

impl TitleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleKind::Movie => "MOVIE",
            TitleKind::Series => "SERIES",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "MOVIE" => Some(TitleKind::Movie),
            "SERIES" => Some(TitleKind::Series),
            _ => None,
        }
    }
}

impl std::fmt::Display for TitleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalog title with its genre references
#[derive(Debug, Clone)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    pub kind: TitleKind,
    pub release_year: i32,
    pub synopsis: Option<String>,
    pub average_rating: Option<f64>,
    /// Set once at creation, never updated
    pub created_at: DateTime<Utc>,
    pub genres: HashSet<Uuid>,
}

/// Input for creating or updating a title
#[derive(Debug, Clone)]
pub struct TitleDraft {
    pub name: String,
    pub kind: TitleKind,
    pub release_year: i32,
    pub synopsis: Option<String>,
    pub average_rating: Option<f64>,
    pub genres: HashSet<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_kind_round_trip() {
        assert_eq!(TitleKind::parse("MOVIE"), Some(TitleKind::Movie));
        assert_eq!(TitleKind::parse("SERIES"), Some(TitleKind::Series));
        assert_eq!(TitleKind::parse("movie"), None);
        assert_eq!(TitleKind::Movie.as_str(), "MOVIE");
        assert_eq!(TitleKind::Series.as_str(), "SERIES");
    }
}

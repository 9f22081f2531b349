use uuid::Uuid;

use crate::domain::models::TitleKind;

/// Search filters over the catalog; filters combine with AND and a `None`
/// field is not applied at all
#[derive(Debug, Clone, Default)]
pub struct TitleQuery {
    /// Case-insensitive substring match on the title name
    pub name_pattern: Option<String>,
    pub kind: Option<TitleKind>,
    pub year: Option<i32>,
    /// Matches titles whose genre set contains this genre
    pub genre_id: Option<Uuid>,
}

impl TitleQuery {
    pub fn is_empty(&self) -> bool {
        self.name_pattern.is_none()
            && self.kind.is_none()
            && self.year.is_none()
            && self.genre_id.is_none()
    }
}

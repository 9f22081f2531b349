use uuid::Uuid;

/// A genre that titles reference; names are unique across the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

/// Input for creating or renaming a genre
#[derive(Debug, Clone)]
pub struct GenreDraft {
    pub name: String,
}

/// Normalized, URL-safe form of a title name used in storage keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TitleSlug(String);

impl TitleSlug {
    /// Lowercase the name, collapse every run of non `[a-z0-9]` characters
    /// to a single `_`, and trim leading/trailing `_`. An empty result
    /// falls back to `untitled`.
    pub fn from_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        let mut pending_separator = false;

        for c in name.trim().to_lowercase().chars() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                if pending_separator && !slug.is_empty() {
                    slug.push('_');
                }
                pending_separator = false;
                slug.push(c);
            } else {
                pending_separator = true;
            }
        }

        if slug.is_empty() {
            slug.push_str("untitled");
        }

        Self(slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TitleSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slug() {
        assert_eq!(TitleSlug::from_name("Dune").as_str(), "dune");
        assert_eq!(
            TitleSlug::from_name("Inception 2010!").as_str(),
            "inception_2010"
        );
        assert_eq!(
            TitleSlug::from_name("The  Matrix -- Reloaded").as_str(),
            "the_matrix_reloaded"
        );
    }

    #[test]
    fn test_trimmed_separators() {
        assert_eq!(TitleSlug::from_name("  ¡Amélie!  ").as_str(), "am_lie");
        assert_eq!(TitleSlug::from_name("***").as_str(), "untitled");
        assert_eq!(TitleSlug::from_name("").as_str(), "untitled");
    }
}

use crate::domain::{errors::ValidationError, models::AssetKind};

/// Upload policy for one asset kind: allowed content types (exact match,
/// case-insensitive) and a size ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPolicy {
    pub allowed_content_types: &'static [&'static str],
    pub max_size_bytes: u64,
}

static POSTER_POLICY: AssetPolicy = AssetPolicy {
    allowed_content_types: &["image/jpeg", "image/png"],
    max_size_bytes: 2 * 1024 * 1024,
};

static TECHNICAL_SHEET_POLICY: AssetPolicy = AssetPolicy {
    allowed_content_types: &["application/pdf"],
    max_size_bytes: 5 * 1024 * 1024,
};

impl AssetPolicy {
    /// Policy table consulted before any storage I/O
    pub fn for_kind(kind: AssetKind) -> &'static AssetPolicy {
        match kind {
            AssetKind::Poster => &POSTER_POLICY,
            AssetKind::TechnicalSheet => &TECHNICAL_SHEET_POLICY,
        }
    }

    /// Reject uploads whose content type or size falls outside the kind's
    /// policy. No side effects.
    pub fn validate(
        kind: AssetKind,
        content_type: &str,
        size_bytes: u64,
    ) -> Result<(), ValidationError> {
        let policy = Self::for_kind(kind);

        let allowed = policy
            .allowed_content_types
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(content_type));
        if !allowed {
            return Err(ValidationError::UnsupportedContentType {
                kind,
                content_type: content_type.to_string(),
            });
        }

        if size_bytes == 0 || size_bytes > policy.max_size_bytes {
            return Err(ValidationError::FileTooLarge {
                size_bytes,
                max_bytes: policy.max_size_bytes,
            });
        }

        Ok(())
    }
}

/// Whether a fresh upload of a kind supersedes the prior active asset or
/// is simply appended alongside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersioningPolicy {
    pub poster_single_active: bool,
    pub technical_sheet_single_active: bool,
}

impl Default for VersioningPolicy {
    fn default() -> Self {
        // Observed behavior: posters are exclusive, sheets accumulate
        Self {
            poster_single_active: true,
            technical_sheet_single_active: false,
        }
    }
}

impl VersioningPolicy {
    pub fn single_active(&self, kind: AssetKind) -> bool {
        match kind {
            AssetKind::Poster => self.poster_single_active,
            AssetKind::TechnicalSheet => self.technical_sheet_single_active,
        }
    }
}

//! Storage-key construction for uploaded assets.
//!
//! Layout: `posters/{slug}/{timestamp}.{ext}` for posters and
//! `fichas/{slug}/{timestamp}.{ext}` for technical sheets, all under a
//! single container.

use chrono::Utc;

use crate::domain::{
    models::AssetKind,
    value_objects::{StorageKey, TitleSlug},
};

/// Build the storage key for a fresh upload using the current wall clock.
///
/// Two uploads for the same title landing on the same millisecond would
/// produce the same key; the store's put then resolves the collision by
/// last write wins rather than failing.
pub fn build_key(
    kind: AssetKind,
    title_name: &str,
    original_filename: Option<&str>,
    content_type: Option<&str>,
) -> StorageKey {
    build_key_at(
        kind,
        title_name,
        original_filename,
        content_type,
        Utc::now().timestamp_millis(),
    )
}

/// Timestamp-injectable variant of [`build_key`] for deterministic tests
pub fn build_key_at(
    kind: AssetKind,
    title_name: &str,
    original_filename: Option<&str>,
    content_type: Option<&str>,
    timestamp_ms: i64,
) -> StorageKey {
    let slug = TitleSlug::from_name(title_name);
    let ext = resolve_extension(original_filename, content_type, kind);
    let key = format!("{}/{}/{}.{}", kind.folder(), slug, timestamp_ms, ext);
    StorageKey::new(key).expect("generated storage key is structurally valid")
}

/// Pick the file extension: the original filename's suffix after the last
/// `.` wins, then the content type, then the kind's default.
pub fn resolve_extension(
    original_filename: Option<&str>,
    content_type: Option<&str>,
    kind: AssetKind,
) -> String {
    if let Some(name) = original_filename {
        if let Some(idx) = name.rfind('.') {
            let ext = &name[idx + 1..];
            if !ext.is_empty() {
                return ext.to_ascii_lowercase();
            }
        }
    }

    if let Some(ct) = content_type {
        if ct.eq_ignore_ascii_case("application/pdf") {
            return "pdf".to_string();
        }
        if ct.eq_ignore_ascii_case("image/png") {
            return "png".to_string();
        }
        if ct.eq_ignore_ascii_case("image/jpeg") {
            return "jpg".to_string();
        }
    }

    match kind {
        AssetKind::TechnicalSheet => "pdf".to_string(),
        AssetKind::Poster => "jpg".to_string(),
    }
}

/// Re-derive a usable content type when the caller supplied none or only
/// the generic octet-stream default
pub fn effective_content_type(content_type: Option<&str>, ext: &str) -> String {
    match content_type {
        Some(ct)
            if !ct.trim().is_empty() && !ct.eq_ignore_ascii_case("application/octet-stream") =>
        {
            ct.to_string()
        }
        _ => match ext.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "pdf" => "application/pdf",
            _ => "application/octet-stream",
        }
        .to_string(),
    }
}

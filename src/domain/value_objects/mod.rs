mod storage_key;
mod title_slug;

pub use storage_key::StorageKey;
pub use title_slug::TitleSlug;

pub mod asset_handlers;
pub mod genre_handlers;
pub mod title_handlers;

pub use asset_handlers::*;
pub use genre_handlers::*;
pub use title_handlers::*;

pub mod asset;
pub mod genre;
pub mod query;
pub mod title;

pub use asset::*;
pub use genre::*;
pub use query::*;
pub use title::*;

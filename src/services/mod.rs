mod asset_service_impl;
mod catalog_service_impl;

pub use asset_service_impl::AssetServiceImpl;
pub use catalog_service_impl::CatalogServiceImpl;

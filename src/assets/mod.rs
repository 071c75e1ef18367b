//! Asset pipeline: local media resolution, canonical naming, catalog sync.

pub mod catalog;
pub mod context;
pub mod naming;

pub use catalog::AssetCatalog;
pub use context::{AssetContext, LocalAsset};

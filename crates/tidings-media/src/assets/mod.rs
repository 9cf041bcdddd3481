//! Asset lookup and staging.

pub mod local;
pub mod staging;

pub use local::LocalAssetSource;
pub use staging::AssetStager;

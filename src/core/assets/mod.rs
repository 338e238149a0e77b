pub mod asset_index;

pub use asset_index::{download_assets, object_url, AssetIndex, AssetObject};

//! Asset acquisition.
//!
//! Required data files (Tesseract language models by default) are checked
//! one by one; missing ones are fetched through a single [`Fetcher`]
//! chosen at startup. Once the data directory exists, the data-directory
//! variable is pointed at it.

pub mod checksum;
pub mod ensure;
pub mod fetcher;
pub mod http;
pub mod requirement;
pub mod script;

pub use checksum::{sha256_file, verify};
pub use ensure::{ensure_assets, point_data_dir, AssetOutcome, DataDirUpdate};
pub use fetcher::{default_script_path, resolve_fetcher, Fetcher};
pub use http::HttpFetcher;
pub use requirement::{missing, AssetRequirement};
pub use script::ScriptFetcher;

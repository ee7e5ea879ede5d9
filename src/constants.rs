//! Table Constants
//!
//! Centralized defaults for the paper table and its data source.

/// Default paper server base URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Environment variable overriding the configured server URL
pub const SERVER_URL_ENV: &str = "TKB_SERVER_URL";

/// Rows scanned beyond each edge of the visible window
pub const DEFAULT_THRESHOLD: usize = 100;

/// Smallest range the viewport loader asks for
pub const DEFAULT_MINIMUM_BATCH_SIZE: usize = 25;

/// Id carried by the placeholder row rendered for data not yet loaded
pub const PLACEHOLDER_ID: &str = "loading..";

/// Search clause field for the title search
pub const TITLE_FIELD: &str = "Paper.title";

/// Search clause field for layer tag filters
pub const TAG_FIELD: &str = "Paper.layers.tag";

/// Configuration file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default demo window size (rows)
pub const DEMO_WINDOW_ROWS: usize = 20;

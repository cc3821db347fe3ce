//! Default values for configuration

use std::path::PathBuf;

/// Default path of the delimited sales file
pub fn default_source_path() -> PathBuf {
    PathBuf::from("sales_data.csv")
}

/// Default API endpoint (FakeStore product feed)
pub fn default_source_url() -> String {
    "https://fakestoreapi.com/products".to_string()
}

/// Default HTTP request timeout in seconds
pub fn default_source_timeout() -> u64 {
    30
}

/// Default SQLite database file
pub fn default_db_file() -> PathBuf {
    PathBuf::from("sales_data.db")
}

/// Default pipeline cadence in minutes
pub fn default_interval_minutes() -> u64 {
    5
}

/// Default tick polling period in seconds
pub fn default_poll_secs() -> u64 {
    1
}

/// Run the pipeline once at startup before entering the tick loop
pub fn default_warm_start() -> bool {
    true
}

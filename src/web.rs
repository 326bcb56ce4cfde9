#![cfg(not(tarpaulin_include))]

use std::env;
use std::path::PathBuf;

use gradeboard::app;

/// Main entry point for the web application
///
/// Starts the dashboard server. The first argument, when present, is the
/// path to a cached portal snapshot (JSON with a `semesterList`); without
/// it the example dataset is served. The second argument overrides the
/// bind address.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let snapshot_path = args.get(1).map(PathBuf::from);
    let addr = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| "127.0.0.1:3000".to_string());

    app::run(snapshot_path, &addr).await
}

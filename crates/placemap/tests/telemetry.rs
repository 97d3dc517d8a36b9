use std::fs;

use placemap::telemetry::env_filter;

#[test]
fn log_filter_reads_rust_log_loaded_from_dotenv() {
    let path = std::env::temp_dir().join(format!("placemap-{}.env", std::process::id()));
    fs::write(&path, "RUST_LOG=placemap_core=trace\n").expect("write env file");

    dotenvy::from_path_override(&path).expect("load env file");
    let filter = env_filter().to_string();
    fs::remove_file(&path).ok();

    assert!(filter.contains("placemap_core=trace"), "filter was {filter}");
}

//! Print a snapshot of tracked debris.
//!
//! ```text
//! SPACETRACK_USER=... SPACETRACK_PASS=... cargo run --example debris_snapshot [config.toml]
//! ```
use std::env;
use std::error::Error;

use debris_tracker::config::TrackerConfig;
use debris_tracker::filter::DebrisRecord;
use debris_tracker::logger::init_logging;
use debris_tracker::tracker::DebrisTracker;

const SHOWN: usize = 10;
const MINUTES_AHEAD: f64 = 30.0;

fn print_records(title: &str, records: &[DebrisRecord]) {
    println!("{title}");
    println!("{:<24} {:>9} {:>10} {:>10}", "name", "lat", "lon", "alt (km)");
    for record in records {
        println!(
            "{:<24} {:>9.3} {:>10.3} {:>10.1}",
            record.name, record.lat, record.lon, record.alt_km
        );
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    init_logging()?;

    let config = match env::args().nth(1) {
        Some(path) => TrackerConfig::from_toml_file(path)?.with_env_overrides()?,
        None => TrackerConfig::from_env()?,
    };

    // may download the UT1 table
    let tracker =
        tokio::task::spawn_blocking(move || DebrisTracker::from_config(&config)).await??;

    let now = tracker.get_positions(SHOWN).await?;
    print_records("Current positions", &now);

    let ahead = tracker
        .get_predicted_positions(MINUTES_AHEAD, SHOWN)
        .await?;
    print_records(&format!("Positions in {MINUTES_AHEAD} minutes"), &ahead);

    let stats = tracker.get_stats(1000).await?;
    println!(
        "{} objects, altitude min {:.2} km, max {:.2} km, mean {:.2} km",
        stats.count, stats.min_alt, stats.max_alt, stats.avg_alt
    );

    Ok(())
}

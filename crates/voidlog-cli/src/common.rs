//! Helpers shared by the subcommands.

use tracing_subscriber::EnvFilter;
use voidlog_core::{Config, Database, Elapsed, StreakStore, SystemClock};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Install the stderr log subscriber. RUST_LOG wins over `log.level`.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Open the streak store at the configured database path.
pub fn open_store(config: &Config) -> Result<StreakStore<Database, SystemClock>, Box<dyn std::error::Error>> {
    let path = config.database_path()?;
    tracing::debug!(path = %path.display(), "opening streak database");
    let db = Database::open_at(&path)?;
    Ok(StreakStore::open(db, SystemClock))
}

/// `3d 04:05:06`
pub fn format_elapsed(elapsed: &Elapsed) -> String {
    format!(
        "{}d {:02}:{:02}:{:02}",
        elapsed.days, elapsed.hours, elapsed.minutes, elapsed.seconds
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_pads_clock_fields() {
        let elapsed = Elapsed {
            days: 12,
            hours: 3,
            minutes: 0,
            seconds: 9,
        };
        assert_eq!(format_elapsed(&elapsed), "12d 03:00:09");
    }

    #[test]
    fn format_zero() {
        assert_eq!(format_elapsed(&Elapsed::default()), "0d 00:00:00");
    }
}

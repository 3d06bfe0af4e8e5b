use std::time::Duration;

use voidlog_core::Config;

use crate::common::{format_elapsed, open_store, CliResult};

/// Poll the store every `watch.tick_ms` and print the running streak.
pub fn run(config: &Config, ticks: Option<u64>) -> CliResult {
    let store = open_store(config)?;
    let tick = Duration::from_millis(config.watch.tick_ms.max(1));

    let mut printed = 0u64;
    loop {
        println!(
            "{}  best {}d",
            format_elapsed(&store.elapsed_now()),
            store.longest_streak()
        );
        printed += 1;
        if ticks.is_some_and(|limit| printed >= limit) {
            break;
        }
        std::thread::sleep(tick);
    }
    Ok(())
}

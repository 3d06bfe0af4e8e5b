use voidlog_core::Config;

use crate::common::{open_store, CliResult};

pub fn run(config: &Config) -> CliResult {
    let store = open_store(config)?;
    let event = store.snapshot().to_event();
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}

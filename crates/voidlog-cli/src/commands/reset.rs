use voidlog_core::Config;

use crate::common::{open_store, CliResult};

pub fn run(config: &Config, confirmed: bool) -> CliResult {
    if !confirmed {
        return Err("refusing to reset without --yes".into());
    }

    let mut store = open_store(config)?;
    let outcome = store.reset_now();
    println!("{}", serde_json::to_string_pretty(&outcome.to_event())?);

    if let Some(e) = &outcome.persist_error {
        eprintln!("warning: reset not saved ({e}); it will be lost on restart");
    }
    Ok(())
}

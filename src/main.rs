use anyhow::Result;
use log::error;
use crate::errors::PipelineError;
use crate::initialization::init;
use crate::worker::run;

mod areas;
mod composer;
mod config;
mod errors;
mod initialization;
mod logging;
mod manager_entsoe;
mod manager_mqtt;
mod manager_norges_bank;
pub mod models;
mod worker;

fn main() -> Result<()> {
    // Load config and set up all managers. If initialization fails, we are pretty much out of luck
    // and can't even log.
    let (config, area, mgr) = match init() {
        Ok((c, a, m)) => (c, a, m),
        Err(e) => {
            return Err(PipelineError(format!("Initialization failed: {}", e)))?;
        }
    };

    // Fetch, convert and publish the price for the current hour
    match run(&config, &mgr, &area) {
        Ok(_) => {},
        Err(e) => {
            error!("Run failed: {}", e);
            return Err(e)?;
        }
    }

    Ok(())
}

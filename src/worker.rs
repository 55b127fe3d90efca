use chrono::Local;
use log::info;
use thiserror::Error;
use crate::areas::resolve_area;
use crate::composer::compose;
use crate::config::Config;
use crate::initialization::Mgr;

/// Runs the price publishing pipeline: resolves the area, fetches the day ahead
/// prices and the latest exchange rate, picks the current hour, composes the
/// message and publishes it. Nothing is published unless every stage succeeds.
///
/// # Arguments
///
/// * 'config' - configuration
/// * 'mgr' - struct with configured managers
/// * 'area' - the price area to publish for
pub fn run(config: &Config, mgr: &Mgr, area: &str) -> Result<(), WorkerError> {
    let domain = resolve_area(area)
        .map_err(|e| WorkerError::AreaError(e.to_string()))?;

    info!("Area: {} ({})", area, domain);

    let now = Local::now();

    let series = mgr.entsoe.get_day_ahead_prices(domain, now.date_naive())
        .map_err(|e| WorkerError::PriceFetchError(format!("area {}: {}", area, e)))?;

    let rate = mgr.norges_bank.get_latest_eur_nok()
        .map_err(|e| WorkerError::RateFetchError(e.to_string()))?;

    let index = series.hour_index(now.to_utc())
        .map_err(|e| WorkerError::HourError(format!("area {}: {}", area, e)))?;
    let raw_price = series.points[index].amount;

    info!("Hour: {}", index);
    info!("Price: {} EUR/MWh", raw_price);
    info!("Rate: {} NOK/EUR", rate);

    let vat_fraction = config.price.vat_percentage / 100.0;
    let message = compose(raw_price, rate, vat_fraction, area, now.fixed_offset());

    mgr.mqtt.publish_price(area, &message)
        .map_err(|e| WorkerError::PublishError(format!("area {}: {}", area, e)))?;

    Ok(())
}

/// Error depicting errors that occur while running the pipeline
///
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("error resolving price area: {0}")]
    AreaError(String),
    #[error("error fetching day ahead prices: {0}")]
    PriceFetchError(String),
    #[error("error fetching exchange rate: {0}")]
    RateFetchError(String),
    #[error("error selecting current hour: {0}")]
    HourError(String),
    #[error("error publishing price message: {0}")]
    PublishError(String),
}

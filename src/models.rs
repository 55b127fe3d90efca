use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::Serialize;
use crate::errors::HourOutOfRangeError;

pub const UNIT_OF_MEASUREMENT: &str = "NOK/kWh";

/// Message published for a price area, with prices in NOK/kWh excluding
/// and including VAT and the hour the price is valid for
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PriceMessage {
    pub hour: DateTime<FixedOffset>,
    pub area: String,
    pub price: f64,
    pub price_including_vat: f64,
    pub unit_of_measurement: String,
}

/// A single day ahead price in EUR/MWh at the provider's 1-based position
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub position: u32,
    pub amount: f64,
}

/// The time window a price series covers, points spaced by resolution from start
pub struct PeriodWindow {
    pub start: DateTime<Utc>,
    pub resolution: TimeDelta,
}

pub struct PriceSeries {
    pub window: PeriodWindow,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Returns the index of the price point covering the given instant.
    /// Instants before the window start or past the last point are out of range.
    ///
    /// # Arguments
    ///
    /// * 'at' - the instant to find the covering price point for
    pub fn hour_index(&self, at: DateTime<Utc>) -> Result<usize, HourOutOfRangeError> {
        let step = self.window.resolution.num_seconds();
        let elapsed = (at - self.window.start).num_seconds();
        let index = elapsed.div_euclid(step);

        if index < 0 || index as usize >= self.points.len() {
            return Err(HourOutOfRangeError { index, len: self.points.len() });
        }

        Ok(index as usize)
    }
}

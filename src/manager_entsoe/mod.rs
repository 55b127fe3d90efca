mod models;

use std::time::Duration;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use log::info;
use reqwest::blocking::Client;
use thiserror::Error;
use crate::config::EntsoeParameters;
use crate::manager_entsoe::models::PublicationMarketDocument;
use crate::models::{PeriodWindow, PricePoint, PriceSeries};

const REQUEST_URL: &str = "https://transparency.entsoe.eu/api";

pub struct Entsoe {
    client: Client,
    token: String,
}

impl Entsoe {
    /// Returns an Entsoe struct ready for fetching day ahead prices
    ///
    /// # Arguments
    ///
    /// * 'config' - ENTSO-E configuration parameters
    pub fn new(config: &EntsoeParameters) -> Result<Entsoe, EntsoeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Entsoe {
            client,
            token: config.token.clone(),
        })
    }

    /// Retrieves day ahead prices from the ENTSO-E transparency platform for the
    /// given local calendar day. The request window runs from local midnight to
    /// 23:00 local time, which is the convention the platform expects for a
    /// single day of prices.
    ///
    /// # Arguments
    ///
    /// * 'domain' - the bidding zone domain identifier, used as both in and out domain
    /// * 'day' - the local calendar day to retrieve prices for
    pub fn get_day_ahead_prices(&self, domain: &str, day: NaiveDate) -> Result<PriceSeries, EntsoeError> {
        let period_start = day.and_hms_opt(0, 0, 0).unwrap().format("%Y%m%d%H%M").to_string();
        let period_end = day.and_hms_opt(23, 0, 0).unwrap().format("%Y%m%d%H%M").to_string();

        info!("Period: {} - {}", period_start, period_end);

        let response = self.client
            .get(REQUEST_URL)
            .query(&vec![
                ("documentType", "A44"),
                ("in_Domain", domain),
                ("out_Domain", domain),
                ("periodStart", period_start.as_str()),
                ("periodEnd", period_end.as_str()),
                ("securityToken", self.token.as_str()),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(EntsoeError::StatusError(response.status().as_u16()));
        }

        let xml = response.text()?;
        let document: PublicationMarketDocument = quick_xml::de::from_str(&xml)?;

        document_to_series(&document)
    }
}

/// Transforms the market document to a plain price series, taking the first
/// time series and its first period
///
/// # Arguments
///
/// * 'document' - the deserialized market document
fn document_to_series(document: &PublicationMarketDocument) -> Result<PriceSeries, EntsoeError> {
    let time_series = document.time_series.first()
        .ok_or(EntsoeError::DocumentError("no time series in document".to_string()))?;
    let period = time_series.periods.first()
        .ok_or(EntsoeError::DocumentError("no period in time series".to_string()))?;

    let start = parse_interval_start(&period.time_interval.start)?;
    let resolution = parse_resolution(&period.resolution)?;

    if period.points.is_empty() {
        return Err(EntsoeError::DocumentError("no price points in period".to_string()));
    }

    let points: Vec<PricePoint> = period.points.iter()
        .map(|p| PricePoint { position: p.position, amount: p.amount })
        .collect();

    // Points must be 1-based and contiguous for position in the series to equal
    // the number of resolution steps since the window start
    let contiguous = points.iter()
        .enumerate()
        .all(|(i, p)| p.position == i as u32 + 1);
    if !contiguous {
        return Err(EntsoeError::DocumentError("price points are not contiguous".to_string()));
    }

    Ok(PriceSeries {
        window: PeriodWindow { start, resolution },
        points,
    })
}

/// Parses the period window start. The platform reports timestamps with minute
/// precision ("2024-06-14T22:00Z"), but full RFC 3339 is accepted as well.
///
/// # Arguments
///
/// * 'start' - the window start as reported in the document
fn parse_interval_start(start: &str) -> Result<DateTime<Utc>, EntsoeError> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(start) {
        return Ok(date_time.to_utc());
    }

    NaiveDateTime::parse_from_str(start, "%Y-%m-%dT%H:%MZ")
        .map(|naive| naive.and_utc())
        .map_err(|e| EntsoeError::DocumentError(format!("interval start '{}': {}", start, e)))
}

/// Parses the declared resolution of a period, e.g. "PT60M" or "PT1H"
///
/// # Arguments
///
/// * 'resolution' - the resolution as reported in the document
fn parse_resolution(resolution: &str) -> Result<TimeDelta, EntsoeError> {
    let err = || EntsoeError::DocumentError(format!("unsupported resolution '{}'", resolution));

    let rest = resolution.strip_prefix("PT").ok_or_else(err)?;
    if rest.len() < 2 {
        return Err(err());
    }

    let (value, unit) = rest.split_at(rest.len() - 1);
    let value: i64 = value.parse().map_err(|_| err())?;
    if value <= 0 {
        return Err(err());
    }

    match unit {
        "M" => Ok(TimeDelta::minutes(value)),
        "H" => Ok(TimeDelta::hours(value)),
        _ => Err(err()),
    }
}

#[derive(Error, Debug)]
pub enum EntsoeError {
    #[error("DocumentError: {0}")]
    DocumentError(String),
    #[error("NetworkError: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("StatusError: request failed with status {0}")]
    StatusError(u16),
}

impl From<quick_xml::DeError> for EntsoeError {
    fn from(e: quick_xml::DeError) -> Self {
        EntsoeError::DocumentError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Publication_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-3:publicationdocument:7:0">
    <mRID>5a6e603237c9404bb6cc31e1c7d30bd3</mRID>
    <type>A44</type>
    <TimeSeries>
        <mRID>1</mRID>
        <currency_Unit.name>EUR</currency_Unit.name>
        <price_Measure_Unit.name>MWH</price_Measure_Unit.name>
        <Period>
            <timeInterval>
                <start>2024-06-14T22:00Z</start>
                <end>2024-06-15T22:00Z</end>
            </timeInterval>
            <resolution>PT60M</resolution>
            <Point>
                <position>1</position>
                <price.amount>36.25</price.amount>
            </Point>
            <Point>
                <position>2</position>
                <price.amount>33.41</price.amount>
            </Point>
            <Point>
                <position>3</position>
                <price.amount>31.84</price.amount>
            </Point>
        </Period>
    </TimeSeries>
</Publication_MarketDocument>"#;

    #[test]
    fn parses_day_ahead_document() {
        let document: PublicationMarketDocument = quick_xml::de::from_str(DOCUMENT).unwrap();
        let series = document_to_series(&document).unwrap();

        assert_eq!(series.window.start, Utc.with_ymd_and_hms(2024, 6, 14, 22, 0, 0).unwrap());
        assert_eq!(series.window.resolution, TimeDelta::hours(1));
        assert_eq!(series.points.len(), 3);
        assert_eq!(series.points[0].amount, 36.25);
        assert_eq!(series.points[2].position, 3);
    }

    #[test]
    fn fails_without_time_series() {
        let xml = r#"<Publication_MarketDocument><mRID>1</mRID></Publication_MarketDocument>"#;

        let document: PublicationMarketDocument = quick_xml::de::from_str(xml).unwrap();
        assert!(matches!(document_to_series(&document), Err(EntsoeError::DocumentError(_))));
    }

    #[test]
    fn fails_without_points() {
        let xml = r#"<Publication_MarketDocument>
            <TimeSeries>
                <Period>
                    <timeInterval><start>2024-06-14T22:00Z</start><end>2024-06-15T22:00Z</end></timeInterval>
                    <resolution>PT60M</resolution>
                </Period>
            </TimeSeries>
        </Publication_MarketDocument>"#;

        let document: PublicationMarketDocument = quick_xml::de::from_str(xml).unwrap();
        assert!(matches!(document_to_series(&document), Err(EntsoeError::DocumentError(_))));
    }

    #[test]
    fn fails_for_non_contiguous_points() {
        let xml = r#"<Publication_MarketDocument>
            <TimeSeries>
                <Period>
                    <timeInterval><start>2024-06-14T22:00Z</start><end>2024-06-15T22:00Z</end></timeInterval>
                    <resolution>PT60M</resolution>
                    <Point><position>1</position><price.amount>36.25</price.amount></Point>
                    <Point><position>3</position><price.amount>31.84</price.amount></Point>
                </Period>
            </TimeSeries>
        </Publication_MarketDocument>"#;

        let document: PublicationMarketDocument = quick_xml::de::from_str(xml).unwrap();
        assert!(matches!(document_to_series(&document), Err(EntsoeError::DocumentError(_))));
    }

    #[test]
    fn parses_interval_start_with_and_without_seconds() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 14, 22, 0, 0).unwrap();

        assert_eq!(parse_interval_start("2024-06-14T22:00Z").unwrap(), expected);
        assert_eq!(parse_interval_start("2024-06-14T22:00:00Z").unwrap(), expected);
        assert!(parse_interval_start("14/06/2024").is_err());
    }

    #[test]
    fn parses_declared_resolutions() {
        assert_eq!(parse_resolution("PT60M").unwrap(), TimeDelta::hours(1));
        assert_eq!(parse_resolution("PT15M").unwrap(), TimeDelta::minutes(15));
        assert_eq!(parse_resolution("PT1H").unwrap(), TimeDelta::hours(1));
        assert!(parse_resolution("P1D").is_err());
        assert!(parse_resolution("PT0M").is_err());
        assert!(parse_resolution("PT").is_err());
    }
}

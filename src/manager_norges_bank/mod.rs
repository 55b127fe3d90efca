mod models;

use std::time::Duration;
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;
use crate::manager_norges_bank::models::ExchangeRateDocument;

const REQUEST_URL: &str = "https://data.norges-bank.no/api/data/EXR/B.EUR.NOK.SP";
const SERIES_KEY: &str = "0:0:0:0";

pub struct NorgesBank {
    client: Client,
}

impl NorgesBank {
    /// Returns a NorgesBank struct ready for fetching exchange rates
    ///
    pub fn new() -> Result<NorgesBank, NorgesBankError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(NorgesBank { client })
    }

    /// Retrieves the latest published EUR/NOK exchange rate from the
    /// Norges Bank data service
    ///
    pub fn get_latest_eur_nok(&self) -> Result<f64, NorgesBankError> {
        let response = self.client
            .get(REQUEST_URL)
            .query(&vec![
                ("lastNObservations", "1"),
                ("format", "sdmx-json"),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(NorgesBankError::StatusError(response.status().as_u16()));
        }

        let json = response.text()?;
        let document: ExchangeRateDocument = serde_json::from_str(&json)?;

        document_to_rate(&document)
    }
}

/// Extracts the rate from the nested SDMX observation structure, locating the
/// single expected series key and its first observation value
///
/// # Arguments
///
/// * 'document' - the deserialized exchange rate document
fn document_to_rate(document: &ExchangeRateDocument) -> Result<f64, NorgesBankError> {
    let data_set = document.data_sets.first()
        .ok_or(NorgesBankError::DocumentError("no data sets in document".to_string()))?;
    let series = data_set.series.get(SERIES_KEY)
        .ok_or(NorgesBankError::DocumentError(format!("no series {} in data set", SERIES_KEY)))?;
    let observation = series.observations.get("0")
        .and_then(|values| values.first())
        .ok_or(NorgesBankError::DocumentError("no observation in series".to_string()))?;

    observation_value(observation)
}

/// Observation values are reported as strings, but plain numbers are accepted as well
///
/// # Arguments
///
/// * 'value' - the observation value to convert
fn observation_value(value: &Value) -> Result<f64, NorgesBankError> {
    match value {
        Value::String(rate) => rate.parse::<f64>()
            .map_err(|e| NorgesBankError::DocumentError(format!("observation '{}': {}", rate, e))),
        Value::Number(rate) => rate.as_f64()
            .ok_or(NorgesBankError::DocumentError(format!("observation {} is not representable", rate))),
        other => Err(NorgesBankError::DocumentError(format!("unexpected observation value: {}", other))),
    }
}

#[derive(Error, Debug)]
pub enum NorgesBankError {
    #[error("DocumentError: {0}")]
    DocumentError(String),
    #[error("NetworkError: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("StatusError: request failed with status {0}")]
    StatusError(u16),
}

impl From<serde_json::Error> for NorgesBankError {
    fn from(e: serde_json::Error) -> Self {
        NorgesBankError::DocumentError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "dataSets": [
            {
                "action": "Information",
                "series": {
                    "0:0:0:0": {
                        "attributes": [0, 0, 0, null],
                        "observations": {
                            "0": ["11.2"]
                        }
                    }
                }
            }
        ]
    }"#;

    #[test]
    fn parses_latest_observation() {
        let document: ExchangeRateDocument = serde_json::from_str(DOCUMENT).unwrap();

        assert_eq!(document_to_rate(&document).unwrap(), 11.2);
    }

    #[test]
    fn accepts_numeric_observation_values() {
        let json = r#"{"dataSets": [{"series": {"0:0:0:0": {"observations": {"0": [11.45]}}}}]}"#;

        let document: ExchangeRateDocument = serde_json::from_str(json).unwrap();
        assert_eq!(document_to_rate(&document).unwrap(), 11.45);
    }

    #[test]
    fn fails_without_expected_series_key() {
        let json = r#"{"dataSets": [{"series": {"0:0:1:0": {"observations": {"0": ["11.2"]}}}}]}"#;

        let document: ExchangeRateDocument = serde_json::from_str(json).unwrap();
        assert!(matches!(document_to_rate(&document), Err(NorgesBankError::DocumentError(_))));
    }

    #[test]
    fn fails_without_observations() {
        let json = r#"{"dataSets": [{"series": {"0:0:0:0": {"observations": {}}}}]}"#;

        let document: ExchangeRateDocument = serde_json::from_str(json).unwrap();
        assert!(matches!(document_to_rate(&document), Err(NorgesBankError::DocumentError(_))));
    }

    #[test]
    fn fails_on_unparsable_observation() {
        let json = r#"{"dataSets": [{"series": {"0:0:0:0": {"observations": {"0": ["n/a"]}}}}]}"#;

        let document: ExchangeRateDocument = serde_json::from_str(json).unwrap();
        assert!(matches!(document_to_rate(&document), Err(NorgesBankError::DocumentError(_))));
    }
}

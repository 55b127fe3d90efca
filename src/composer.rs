use chrono::{DateTime, DurationRound, FixedOffset, TimeDelta};
use crate::models::{PriceMessage, UNIT_OF_MEASUREMENT};

/// Combines a raw day ahead price and an exchange rate into the message to publish.
/// The raw price in EUR/MWh is converted to NOK/kWh and reported both excluding
/// and including VAT, rounded to four decimals.
///
/// # Arguments
///
/// * 'raw_eur_per_mwh' - the spot price as reported by the market, in EUR/MWh
/// * 'rate_eur_nok' - the EUR/NOK exchange rate
/// * 'vat_fraction' - VAT as a fraction, e.g. 0.25
/// * 'area' - the price area the message is for
/// * 'now' - the instant the message is composed for
pub fn compose(raw_eur_per_mwh: f64, rate_eur_nok: f64, vat_fraction: f64, area: &str, now: DateTime<FixedOffset>) -> PriceMessage {
    let price = raw_eur_per_mwh / 1000.0 * rate_eur_nok;
    let price_including_vat = price * (1.0 + vat_fraction);

    let hour = now.duration_trunc(TimeDelta::hours(1)).unwrap();

    PriceMessage {
        hour,
        area: area.to_string(),
        price: round_to_four_decimals(price),
        price_including_vat: round_to_four_decimals(price_including_vat),
        unit_of_measurement: UNIT_OF_MEASUREMENT.to_string(),
    }
}

/// Rounds values to four decimals
///
/// # Arguments
///
/// * 'price' - the price to round to four decimals
fn round_to_four_decimals(price: f64) -> f64 {
    (price * 10000f64).round() / 10000f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn oslo_time(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600).unwrap()
            .with_ymd_and_hms(2024, 6, 15, hour, minute, 0).unwrap()
    }

    #[test]
    fn converts_and_rounds_to_four_decimals() {
        let message = compose(500.0, 11.5, 0.25, "NO1", oslo_time(14, 35));

        assert_eq!(message.price, 5.75);
        assert_eq!(message.price_including_vat, 7.1875);
        assert_eq!(message.unit_of_measurement, "NOK/kWh");
    }

    #[test]
    fn truncates_hour_to_start_of_hour() {
        let message = compose(500.0, 11.5, 0.25, "NO1", oslo_time(14, 35));

        assert_eq!(message.hour, oslo_time(14, 0));
    }

    #[test]
    fn identical_inputs_give_identical_messages() {
        let now = oslo_time(9, 12);

        assert_eq!(
            compose(450.0, 11.2, 0.25, "NO1", now),
            compose(450.0, 11.2, 0.25, "NO1", now)
        );
    }

    #[test]
    fn serializes_message_payload() {
        let message = compose(450.0, 11.2, 0.25, "NO1", oslo_time(14, 35));

        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"hour":"2024-06-15T14:00:00+02:00","area":"NO1","price":5.04,"price_including_vat":6.3,"unit_of_measurement":"NOK/kWh"}"#
        );
    }
}

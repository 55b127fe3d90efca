use thiserror::Error;

/// Returns the ENTSO-E domain identifier (EIC code) for a Norwegian price area
///
/// # Arguments
///
/// * 'area' - the price area to resolve, e.g. "NO1"
pub fn resolve_area(area: &str) -> Result<&'static str, AreaError> {
    match area {
        "NO1" => Ok("10YNO-1--------2"),
        "NO2" => Ok("10YNO-2--------T"),
        "NO3" => Ok("10YNO-3--------J"),
        "NO4" => Ok("10YNO-4--------9"),
        "NO5" => Ok("10Y1001A1001A48H"),
        _ => Err(AreaError::UnknownAreaError(area.to_string())),
    }
}

/// Error depicting a price area missing from the catalog
///
#[derive(Debug, Error)]
pub enum AreaError {
    #[error("unknown price area: {0}")]
    UnknownAreaError(String),
}

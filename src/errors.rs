use thiserror::Error;

/// Error depicting errors that occur while running the price publishing pipeline
///
#[derive(Debug, Error)]
#[error("error while publishing price: {0}")]
pub struct PipelineError(pub String);

/// Error depicting an instant falling outside the retrieved price series
///
#[derive(Debug, Error)]
#[error("index {index} is outside the price series of length {len}")]
pub struct HourOutOfRangeError {
    pub index: i64,
    pub len: usize,
}

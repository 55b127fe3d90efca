use std::env;
use log::info;
use thiserror::Error;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_entsoe::{Entsoe, EntsoeError};
use crate::manager_mqtt::Mqtt;
use crate::manager_norges_bank::{NorgesBank, NorgesBankError};

pub struct Mgr {
    pub entsoe: Entsoe,
    pub norges_bank: NorgesBank,
    pub mqtt: Mqtt,
}

/// Initializes and returns configuration, the price area to publish for, and
/// a Mgr struct holding the initialized managers
///
pub fn init() -> Result<(Config, String, Mgr), InitializationError> {
    let args: Vec<String> = env::args().collect();
    let config_path = args.iter()
        .find(|p| p.starts_with("--config="))
        .expect("config file argument should be present");
    let config_path = config_path
        .split_once('=')
        .expect("config file argument should be correct")
        .1;

    let area = args.iter()
        .find(|p| p.starts_with("--area="))
        .expect("price area argument should be present");
    let area = area
        .split_once('=')
        .expect("price area argument should be correct")
        .1
        .to_string();

    // Load configuration
    let config = load_config(&config_path)?;

    // Setup logging
    let _ = setup_logger(&config.general.log_path, config.general.log_level, config.general.log_to_stdout)?;

    // Print version
    info!("starting elspot version: {}", env!("CARGO_PKG_VERSION"));

    // Instantiate managers
    let entsoe = Entsoe::new(&config.entsoe)?;
    let norges_bank = NorgesBank::new()?;
    let mqtt = Mqtt::new(&config.mqtt);

    let mgr = Mgr {
        entsoe,
        norges_bank,
        mqtt,
    };

    Ok((config, area, mgr))
}

/// Error depicting errors that occur while initializing the publisher
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("EntsoeSetupError: {0}")]
    EntsoeSetupError(#[from] EntsoeError),
    #[error("NorgesBankSetupError: {0}")]
    NorgesBankSetupError(#[from] NorgesBankError),
}

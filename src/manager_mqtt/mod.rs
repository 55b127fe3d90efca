use std::time::{Duration, Instant};
use log::info;
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};
use thiserror::Error;
use crate::config::MqttParameters;
use crate::models::PriceMessage;

const ACK_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Mqtt {
    host: String,
    port: u16,
    username: String,
    password: String,
    topic_prefix: String,
}

impl Mqtt {
    /// Returns a new instance of the Mqtt struct
    ///
    /// # Arguments
    ///
    /// * 'config' - mqtt configuration parameters
    pub fn new(config: &MqttParameters) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            username: config.username.clone(),
            password: config.password.clone(),
            topic_prefix: config.topic_prefix.clone(),
        }
    }

    /// Publishes the price message retained on the area topic, over a fresh broker
    /// connection, and waits for the broker to acknowledge the publish before
    /// disconnecting. Retained delivery means late subscribers immediately get the
    /// last published price.
    ///
    /// # Arguments
    ///
    /// * 'area' - the price area the message is for
    /// * 'message' - the message to publish
    pub fn publish_price(&self, area: &str, message: &PriceMessage) -> Result<(), MqttError> {
        let topic = format!("{}/{}", self.topic_prefix, area);
        let payload = serde_json::to_string(message)
            .map_err(|e| MqttError::MessageError(e.to_string()))?;

        info!("Topic: {}", topic);
        info!("Message: {}", payload);

        let mut options = MqttOptions::new(format!("elspot_{}", area), self.host.clone(), self.port);
        options.set_credentials(self.username.clone(), self.password.clone());
        options.set_keep_alive(Duration::from_secs(5));

        let (client, mut connection) = Client::new(options, 10);

        client.publish(topic.as_str(), QoS::AtLeastOnce, true, payload.into_bytes())
            .map_err(|e| MqttError::PublishError(e.to_string()))?;

        // Drive the connection until the broker has acknowledged the publish.
        // Disconnecting before the acknowledgement could drop the message on the floor.
        let deadline = Instant::now() + ACK_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(MqttError::AckTimeoutError(topic));
            }

            match connection.recv_timeout(remaining) {
                Ok(Ok(Event::Incoming(Packet::PubAck(_)))) => break,
                Ok(Ok(_)) => (),
                Ok(Err(e)) => return Err(MqttError::ConnectionError(e.to_string())),
                Err(_) => return Err(MqttError::AckTimeoutError(topic)),
            }
        }

        client.disconnect()
            .map_err(|e| MqttError::ConnectionError(e.to_string()))?;

        Ok(())
    }
}

/// Error depicting errors that occur while publishing to the broker
///
#[derive(Debug, Error)]
pub enum MqttError {
    #[error("MessageError: {0}")]
    MessageError(String),
    #[error("PublishError: {0}")]
    PublishError(String),
    #[error("ConnectionError: {0}")]
    ConnectionError(String),
    #[error("AckTimeoutError: no acknowledgement for publish on {0}")]
    AckTimeoutError(String),
}

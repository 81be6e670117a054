//! Slack incoming-webhook delivery.
//!
//! A message is one POST of `{"text": ...}`. Slack answers 200 with body
//! `ok` on success. Failures are logged and reported to the caller as
//! `false`; nothing is retried.

use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};

use crate::config::DeliverySettings;
use crate::model::DeliveryError;

/// Something that can deliver a finished message.
///
/// Implemented by [`SlackWebhook`]; tests substitute recorders.
pub trait Notifier {
    /// Returns `true` when the message was accepted.
    fn deliver(&self, message: &str) -> bool;
}

/// JSON body of an incoming-webhook POST.
#[derive(Debug, Serialize)]
pub struct SlackPayload<'a> {
    pub text: &'a str,
}

/// Blocking client bound to one webhook URL.
pub struct SlackWebhook {
    client: reqwest::blocking::Client,
    url: String,
}

impl SlackWebhook {
    pub fn new(url: String, settings: &DeliverySettings) -> Result<Self, DeliveryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(SlackWebhook { client, url })
    }

    /// Posts `message`; anything but HTTP 200 is an error.
    pub fn post(&self, message: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SlackPayload { text: message })
            .send()
            // the webhook URL is itself a secret, keep it out of the logs
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

impl Notifier for SlackWebhook {
    fn deliver(&self, message: &str) -> bool {
        match self.post(message) {
            Ok(()) => {
                info!("message delivered to Slack");
                true
            }
            Err(e) => {
                error!(error = %e, "Slack delivery failed");
                false
            }
        }
    }
}

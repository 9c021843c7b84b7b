//! Alert hand-off.
//!
//! Delivery to chat or email is left to an external service; this only
//! emits the alert event.

use crate::threshold::Alert;

pub struct AlertNotifier {
    environment: String,
    notify: bool,
}

impl AlertNotifier {
    pub fn new(environment: &str, notify: bool) -> Self {
        Self {
            environment: environment.to_string(),
            notify,
        }
    }

    pub fn raise(&self, alert: &Alert) {
        tracing::warn!(
            environment = %self.environment,
            kind = alert.kind.as_str(),
            "ALERT: {}",
            alert.message
        );

        if self.notify {
            tracing::info!(
                environment = %self.environment,
                "Alert notification handed off for delivery: {}",
                alert.message
            );
        }
    }
}

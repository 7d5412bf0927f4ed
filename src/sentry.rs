//! Threshold evaluation and alerting.
//!
//! A [`Sentry`] checks one batch of poll-cycle data against the live settings,
//! sends a notification for every alertable condition, and returns the issues
//! it found. Checks never fail: errors are logged and the issues collected so
//! far are returned, so a broken store or notification endpoint cannot take
//! down the polling job.

mod air;
mod diagnostic;
mod issue;
mod network;
#[cfg(test)]
mod testing;

pub use issue::*;

use crate::notifier::{Notifier, Priority};
use crate::provider::ConfigurationProvider;

pub struct Sentry<P, N> {
    provider: P,
    notifier: N,
}

impl<P, N> Sentry<P, N>
where
    P: ConfigurationProvider,
    N: Notifier,
{
    pub fn new(provider: P, notifier: N) -> Self {
        Self { provider, notifier }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Best-effort delivery; failures are only logged.
    async fn notify(&self, text: &str, title: &str, priority: Priority) {
        match self
            .notifier
            .send_notification(text, title, priority)
            .await
        {
            Ok(status) => tracing::debug!(status, title, "notification delivered"),
            Err(err) => tracing::warn!(error = %err, title, "failed to deliver notification"),
        }
    }
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("bedroom"), "Bedroom");
        assert_eq!(capitalize("LIVING ROOM"), "Living room");
        assert_eq!(capitalize("łazienka"), "Łazienka");
        assert_eq!(capitalize(""), "");
    }
}

//! Push notification delivery.
//!
//! [`NtfyNotifier`] publishes plain-text messages to an [ntfy](https://ntfy.sh)
//! topic. The title and priority travel as request headers.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("notification endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("invalid notification title: {0:?}")]
    InvalidTitle(String),
}

/// Message priority on the ntfy 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Min = 1,
    Low = 2,
    Default = 3,
    High = 4,
    Urgent = 5,
}

impl Priority {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Delivers `text` and returns the HTTP status code of the endpoint.
    async fn send_notification(
        &self,
        text: &str,
        title: &str,
        priority: Priority,
    ) -> Result<u16, NotifyError>;
}

#[derive(Debug, Clone)]
pub struct NtfyNotifier {
    client: reqwest::Client,
    url: String,
}

impl NtfyNotifier {
    pub fn new(base_url: &str, topic: &str) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url: topic_url(base_url, topic),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Notifier for NtfyNotifier {
    async fn send_notification(
        &self,
        text: &str,
        title: &str,
        priority: Priority,
    ) -> Result<u16, NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .headers(headers(title, priority)?)
            .body(text.to_owned())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), title, "notification sent");

        if !status.is_success() {
            return Err(NotifyError::HttpStatus(status.as_u16()));
        }

        Ok(status.as_u16())
    }
}

fn topic_url(base_url: &str, topic: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        topic.trim_start_matches('/')
    )
}

fn headers(title: &str, priority: Priority) -> Result<HeaderMap, NotifyError> {
    let mut headers = HeaderMap::new();
    // ntfy reads the title header as raw UTF-8
    let title_value = HeaderValue::from_bytes(title.as_bytes())
        .map_err(|_| NotifyError::InvalidTitle(title.to_string()))?;
    headers.insert("Title", title_value);
    headers.insert("Priority", HeaderValue::from(u16::from(priority.as_u8())));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_url_joins_without_double_slash() {
        assert_eq!(topic_url("https://ntfy.sh/", "home"), "https://ntfy.sh/home");
        assert_eq!(topic_url("https://ntfy.sh", "/home"), "https://ntfy.sh/home");
    }

    #[test]
    fn test_headers_carry_title_and_priority() {
        let headers = headers("Sypialnia", Priority::Default).unwrap();
        assert_eq!(headers["Title"], "Sypialnia");
        assert_eq!(headers["Priority"], "3");
    }

    #[test]
    fn test_non_ascii_title_is_sent_as_utf8() {
        let headers = headers("Łazienka", Priority::High).unwrap();
        assert_eq!(headers["Title"].as_bytes(), "Łazienka".as_bytes());
    }

    #[test]
    fn test_control_characters_are_rejected() {
        let err = headers("bad\ntitle", Priority::Low).unwrap_err();
        assert!(matches!(err, NotifyError::InvalidTitle(_)));
    }

    #[test]
    fn test_priority_scale() {
        assert_eq!(Priority::Low.as_u8(), 2);
        assert_eq!(Priority::Default.as_u8(), 3);
        assert_eq!(Priority::High.as_u8(), 4);
        assert!(Priority::High > Priority::Low);
    }

    #[test]
    fn test_http_status_error_display() {
        let err = NotifyError::HttpStatus(502);
        assert_eq!(err.to_string(), "notification endpoint returned HTTP 502");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        let notifier = NtfyNotifier::new("http://127.0.0.1:9", "home").unwrap();
        let err = notifier
            .send_notification("hello", "Test", Priority::Default)
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Request(_)));
    }
}

use reqwest::header::HeaderMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use super::events::SessionEvent;
use crate::constants::DURATION_HEADERS;
use crate::utils::{PlayerError, PlayerResult};

/// Out-of-band duration lookup for sources whose native duration is unavailable.
///
/// Answers come back asynchronously as `SessionEvent::DurationProbed`
/// carrying the generation passed to `request`.
pub trait DurationProbe {
    fn request(&mut self, src: &str, generation: u64);
    fn cancel(&mut self);
}

/// Used when the page cannot issue header-only requests
pub struct NullProbe;

impl DurationProbe for NullProbe {
    fn request(&mut self, _src: &str, _generation: u64) {}

    fn cancel(&mut self) {}
}

/// Parse a single header value; anything but a positive finite number is rejected
pub fn parse_duration_value(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// First usable duration among the known duration headers
pub fn parse_duration_headers(headers: &HeaderMap) -> Option<f64> {
    DURATION_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_duration_value)
    })
}

/// Issues a `HEAD` request against the media URL and reads duration headers.
///
/// Only same-origin sources are probed; cross-origin sources are left to
/// native duration reporting.
pub struct HttpHeaderProbe {
    client: reqwest::Client,
    page_url: Url,
    events: UnboundedSender<SessionEvent>,
    runtime: Handle,
    in_flight: Option<JoinHandle<()>>,
}

impl HttpHeaderProbe {
    /// Must be called from within a tokio runtime
    pub fn new(
        page_url: Url,
        timeout: Duration,
        events: UnboundedSender<SessionEvent>,
    ) -> PlayerResult<Self> {
        let runtime = Handle::try_current().map_err(|e| PlayerError::Runtime(e.to_string()))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            page_url,
            events,
            runtime,
            in_flight: None,
        })
    }

    fn resolve_target(&self, src: &str) -> Option<Url> {
        let target = match self.page_url.join(src) {
            Ok(url) => url,
            Err(e) => {
                debug!("Cannot resolve media source {:?} for probing: {}", src, e);
                return None;
            }
        };
        if target.origin() != self.page_url.origin() {
            debug!("Skipping duration probe for cross-origin source {}", target);
            return None;
        }
        Some(target)
    }
}

impl DurationProbe for HttpHeaderProbe {
    fn request(&mut self, src: &str, generation: u64) {
        self.cancel();

        let Some(target) = self.resolve_target(src) else {
            return;
        };

        let client = self.client.clone();
        let events = self.events.clone();
        self.in_flight = Some(self.runtime.spawn(async move {
            let seconds = match client.head(target.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    let seconds = parse_duration_headers(response.headers());
                    debug!("Duration probe for {} returned {:?}", target, seconds);
                    seconds
                }
                Ok(response) => {
                    debug!("Duration probe for {} got status {}", target, response.status());
                    None
                }
                Err(e) => {
                    warn!("Duration probe for {} failed: {}", target, e);
                    None
                }
            };
            let _ = events.send(SessionEvent::DurationProbed {
                generation,
                seconds,
            });
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}

impl Drop for HttpHeaderProbe {
    fn drop(&mut self) {
        self.cancel();
    }
}

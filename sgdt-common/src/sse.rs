//! Server-Sent Events (SSE) utilities

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, info};

use crate::time::{clock_text, now};

/// Clock tick interval
pub const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

/// Create the live clock stream
///
/// Emits a `ConnectionStatus` event on connect, then a `clock` event carrying
/// the local wall-clock time (`HH:MM:SS`) once per `interval`.
///
/// # Example
/// ```rust,ignore
/// pub async fn clock_stream() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
///     sgdt_common::sse::create_clock_sse_stream("sgdt-dash", CLOCK_INTERVAL)
/// }
/// ```
pub fn create_clock_sse_stream(
    service_name: &'static str,
    interval: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {} clock", service_name);

    let stream = async_stream::stream! {
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let text = clock_text(&now());
            debug!("SSE: clock {}", text);
            yield Ok(Event::default().event("clock").data(text));
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}

//! Live clock stream

use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use sgdt_common::sse::{create_clock_sse_stream, CLOCK_INTERVAL};
use std::convert::Infallible;

/// GET /api/clock - SSE stream of `clock` events (`HH:MM:SS`)
pub async fn clock_stream() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    create_clock_sse_stream("sgdt-dash", CLOCK_INTERVAL)
}

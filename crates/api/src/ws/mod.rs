//! WebSocket change feed.
//!
//! Browsers subscribe to `/api/v1/ws` and receive a JSON text frame for
//! every job or settings change, so dashboards can refresh without polling.

mod handler;

pub use handler::ws_handler;

//! Survey sessions over WebSocket — one wizard per connection.

pub mod protocol;
pub mod ws;

pub use protocol::{ClientMessage, ServerMessage, apply, handle_text};
pub use ws::{SessionState, session_routes};

//! Pretotype survey — wizard sessions plus a submission relay.

pub mod config;
pub mod error;
pub mod forwarder;
pub mod server;
pub mod session;
pub mod survey;

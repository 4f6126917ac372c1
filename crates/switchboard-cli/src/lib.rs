//! Switchboard CLI library: command implementations, the sample handlers
//! and the HTTP client, shared by the `switchboard` binary and its tests.

pub mod client;
pub mod commands;
pub mod handlers;

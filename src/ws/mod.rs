//! WebSocket feed of catalog changes.
//!
//! Clients connect to `/ws`, send a `subscribe` command naming event ids
//! (or `"*"`), and then receive an `event` envelope for every matching
//! mutation.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;

//! # eventdesk
//!
//! REST API for event listings and participant registration.
//!
//! Organizers create events with a fixed capacity; the public registers
//! by email. Every registration is checked against capacity and for a
//! duplicate email under a single writer lock, and each mutation writes
//! both collections atomically so `registered` always equals the number
//! of stored participants.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Feed (ws/)
//!     │
//!     ├── RegistrationService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     └── CatalogStore (persistence/)
//!           ├── JsonFileStore  (events.json, participants.json)
//!           └── MemoryStore
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;

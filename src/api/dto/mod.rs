//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies reject unknown fields. Response bodies for events and
//! participants are the domain records themselves.

pub mod common_dto;
pub mod event_dto;
pub mod participant_dto;

pub use common_dto::*;
pub use event_dto::*;
pub use participant_dto::*;

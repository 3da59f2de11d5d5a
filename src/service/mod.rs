//! Service layer: business logic orchestration.
//!
//! [`RegistrationService`] owns every catalog mutation, enforces the
//! capacity and duplicate-registration rules, and emits notifications
//! through the [`super::domain::EventBus`].

pub mod registration_service;

pub use registration_service::RegistrationService;

//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **rest**: reqwest-backed adapters for the hosted auth and data service
//!
//! Adapters are thin translators that convert between domain types and wire
//! representations. They contain no business logic; the in-memory fixtures
//! live beside the ports in [`crate::domain::ports`].

pub mod rest;

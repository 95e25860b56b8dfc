//! Service Layer
//!
//! Orchestrates domain logic against the outbound ports.

pub mod membership_service;

pub use membership_service::BloomMembershipService;

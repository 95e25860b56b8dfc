//! Ports Layer
//!
//! - Driving Ports (inbound): the API the actor drives
//! - Driven Ports (outbound): routing state, transport, key transform, events

pub mod inbound;
pub mod outbound;

pub use inbound::{MaintenanceReport, MembershipApi};
pub use outbound::{
    BloomEvent, EventSink, IdentityTransform, KeyTransform, NoOpEventSink, PeerTransport,
    RoutingStateProvider,
};

//! Adapters Layer
//!
//! In-process implementations of the outbound ports.
//!
//! - `InMemoryRoutingTable`: routing state written by the tree protocol
//! - `ChannelTransport`: frames onto a bounded tokio channel
//! - `TracingEventSink` / `RecordingEventSink`: event delivery

pub mod channel_transport;
pub mod event_sinks;
pub mod routing_table;

pub use channel_transport::{ChannelTransport, OutboundFrame};
pub use event_sinks::{RecordingEventSink, TracingEventSink};
pub use routing_table::InMemoryRoutingTable;

//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the workspace (kernel-facing).
//! - `adapters`: OS specific implementations (filesystem, data directories).

pub mod adapters;
pub mod bus;
pub mod ports;

pub use bus::{DocumentEvent, EventBus, EventKind, EventReceiver, SubscriptionId};

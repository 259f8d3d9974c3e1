//! Core data model definitions shared across zigjoin crates.
#![allow(missing_docs)]

pub mod channels;
pub mod error;
pub mod frame;
pub mod join;
pub mod network;
pub mod stack_config;
pub mod status;

pub use channels::{ChannelMask, channel_mask};
pub use error::{ModelError, Result as ModelResult};
pub use frame::{FrameArg, STACK_STATUS_HANDLER, UnsolicitedFrame};
pub use join::{JoinMethod, JoinParameters, NodeRole};
pub use network::{
    ExtendedPanId, NetworkDescriptor, NetworkState, ScanResult, ScanType,
};
pub use stack_config::StackConfig;
pub use status::StackStatus;

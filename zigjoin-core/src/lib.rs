//! # zigjoin core
//!
//! Join orchestration for a Zigbee device attached to an EZSP coordinator.
//!
//! ## Overview
//!
//! - **Selection**: [`join::select_network`] picks the strongest joinable
//!   beacon from an active scan, first-seen wins on ties.
//! - **Parameters**: [`join::build_join_parameters`] derives the join
//!   request from the chosen beacon.
//! - **Status correlation**: [`join::StatusWaiter`] turns the unsolicited
//!   `stackStatusHandler` callback into an awaitable value and unregisters
//!   itself on every exit path.
//! - **Orchestration**: [`join::JoinOrchestrator`] sequences one join
//!   attempt; [`commission::Commissioner`] runs the whole reset, configure,
//!   scan and join script.
//!
//! Transport and framing are out of scope: anything implementing
//! [`driver::CoordinatorDriver`] can be driven. [`loopback`] provides a
//! scripted in-process coordinator.
//!
//! ## Example
//!
//! ```no_run
//! use zigjoin_core::{
//!     commission::Commissioner,
//!     config::CommissionConfig,
//!     loopback::{LoopbackCoordinator, LoopbackScript},
//! };
//!
//! async fn commission() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator =
//!         LoopbackCoordinator::new(LoopbackScript::new(vec![]));
//!     let report =
//!         Commissioner::new(&coordinator, CommissionConfig::default())
//!             .run()
//!             .await?;
//!     println!("final status: {:?}", report.status);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Full commissioning script built on the join orchestrator
pub mod commission;
/// Commissioning configuration
pub mod config;
/// Collaborator traits and the callback registry
pub mod driver;
pub mod error;
/// Network selection, join parameters, status waiter and orchestrator
pub mod join;
/// Scripted coordinator for tests and dry runs
pub mod loopback;

pub use error::{JoinError, Result};
pub use zigjoin_model as model;

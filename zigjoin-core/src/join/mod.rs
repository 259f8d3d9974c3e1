//! Join attempt building blocks: pick a network, derive its join
//! parameters, send the join and correlate the asynchronous outcome.

pub mod orchestrator;
pub mod params;
pub mod selector;
pub mod waiter;

pub use orchestrator::{JoinOrchestrator, JoinOutcome};
pub use params::{MAX_TX_POWER_DBM, build_join_parameters};
pub use selector::select_network;
pub use waiter::{StatusHandle, StatusWaiter, WaiterState};

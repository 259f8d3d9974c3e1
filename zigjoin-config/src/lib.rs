//! Configuration loading for zigjoin.
//!
//! A [`Config`] pairs the serial device settings with the
//! [`CommissionConfig`] consumed by the commissioning workflow. Both the
//! `zigjoinctl` binary and embedders load it the same way so there is a
//! single place that knows the file names, environment variables and
//! validation rules.

#![allow(missing_docs)]

pub mod error;
pub mod models;

pub use error::ConfigError;
pub use models::{Config, ConfigSource, DeviceConfig, FlowControl};
pub use zigjoin_core::config::CommissionConfig;

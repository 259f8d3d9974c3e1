//! Parameters handed to the coordinator's join command.

use std::{fmt, str::FromStr};

use crate::{error::ModelError, network::ExtendedPanId};

/// How the device associates with the target network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum JoinMethod {
    /// Plain MAC association using the hardware address.
    #[default]
    MacAssociation,
    NwkRejoin,
    NwkRejoinHaveNwkKey,
    ConfiguredNwkState,
}

impl JoinMethod {
    pub fn code(&self) -> u8 {
        match self {
            JoinMethod::MacAssociation => 0,
            JoinMethod::NwkRejoin => 1,
            JoinMethod::NwkRejoinHaveNwkKey => 2,
            JoinMethod::ConfiguredNwkState => 3,
        }
    }
}

/// Role the device takes once it is part of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeRole {
    Coordinator,
    #[default]
    Router,
    EndDevice,
    SleepyEndDevice,
}

impl NodeRole {
    pub fn code(&self) -> u8 {
        match self {
            NodeRole::Coordinator => 1,
            NodeRole::Router => 2,
            NodeRole::EndDevice => 3,
            NodeRole::SleepyEndDevice => 4,
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeRole::Coordinator => "coordinator",
            NodeRole::Router => "router",
            NodeRole::EndDevice => "end_device",
            NodeRole::SleepyEndDevice => "sleepy_end_device",
        };
        f.write_str(label)
    }
}

impl FromStr for NodeRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "coordinator" => Ok(NodeRole::Coordinator),
            "router" => Ok(NodeRole::Router),
            "end_device" => Ok(NodeRole::EndDevice),
            "sleepy_end_device" => Ok(NodeRole::SleepyEndDevice),
            _ => Err(ModelError::UnknownVariant {
                kind: "node role",
                value: s.to_string(),
            }),
        }
    }
}

/// Network parameters for one join attempt. Built fresh for every attempt
/// and passed to the join command by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoinParameters {
    pub extended_pan_id: ExtendedPanId,
    pub pan_id: u16,
    /// Transmit power in dBm.
    pub radio_tx_power: i8,
    pub radio_channel: u8,
    pub join_method: JoinMethod,
    pub nwk_manager_id: u16,
    pub nwk_update_id: u8,
    /// Reserved channel mask; zero when joining.
    pub channels: u32,
}

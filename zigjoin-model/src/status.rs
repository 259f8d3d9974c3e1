//! Status codes reported by the coordinator stack.

use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// Status reported by the stack, either as a command response or inside a
/// `stackStatusHandler` callback. Codes follow the EmberStatus numbering;
/// anything without a named variant is kept as [`StackStatus::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StackStatus {
    Success,
    ErrFatal,
    BadArgument,
    InvalidCall,
    NetworkUp,
    NetworkDown,
    NotJoined,
    JoinFailed,
    CannotJoinAsRouter,
    NetworkOpened,
    NetworkClosed,
    /// The stack is busy with another network operation.
    ResourceBusy,
    NoBeacons,
    Other(u8),
}

const NAMED: &[(StackStatus, u8, &str)] = &[
    (StackStatus::Success, 0x00, "success"),
    (StackStatus::ErrFatal, 0x01, "err_fatal"),
    (StackStatus::BadArgument, 0x02, "bad_argument"),
    (StackStatus::InvalidCall, 0x70, "invalid_call"),
    (StackStatus::NetworkUp, 0x90, "network_up"),
    (StackStatus::NetworkDown, 0x91, "network_down"),
    (StackStatus::NotJoined, 0x93, "not_joined"),
    (StackStatus::JoinFailed, 0x94, "join_failed"),
    (StackStatus::CannotJoinAsRouter, 0x97, "cannot_join_as_router"),
    (StackStatus::NetworkOpened, 0x9C, "network_opened"),
    (StackStatus::NetworkClosed, 0x9D, "network_closed"),
    (StackStatus::ResourceBusy, 0xA1, "resource_busy"),
    (StackStatus::NoBeacons, 0xAB, "no_beacons"),
];

impl StackStatus {
    pub fn from_code(code: u8) -> Self {
        NAMED
            .iter()
            .find(|(_, named, _)| *named == code)
            .map(|(status, _, _)| *status)
            .unwrap_or(StackStatus::Other(code))
    }

    pub fn code(&self) -> u8 {
        match self {
            StackStatus::Other(code) => *code,
            named => NAMED
                .iter()
                .find(|(status, _, _)| status == named)
                .map(|(_, code, _)| *code)
                .unwrap_or_default(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code() == 0x00
    }

    fn name(&self) -> Option<&'static str> {
        NAMED
            .iter()
            .find(|(status, _, _)| status == self)
            .map(|(_, _, name)| *name)
    }
}

impl From<u8> for StackStatus {
    fn from(code: u8) -> Self {
        StackStatus::from_code(code)
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({:#04x})", self.code()),
            None => write!(f, "status {:#04x}", self.code()),
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Accepts `network_up`, `network-up`, `networkUp` or a numeric code such
/// as `0x90`.
impl FromStr for StackStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let numeric = match trimmed.strip_prefix("0x") {
            Some(hex) => u8::from_str_radix(hex, 16).ok(),
            None => trimmed.parse::<u8>().ok(),
        };
        if let Some(code) = numeric {
            return Ok(StackStatus::from_code(code));
        }

        let wanted = normalize(trimmed);
        NAMED
            .iter()
            .find(|(_, _, name)| normalize(name) == wanted)
            .map(|(status, _, _)| *status)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "stack status",
                value: s.to_string(),
            })
    }
}

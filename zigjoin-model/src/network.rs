//! Network descriptors as reported by an active scan.

use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// 64-bit extended PAN identifier, displayed as colon separated hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ExtendedPanId(pub [u8; 8]);

impl ExtendedPanId {
    pub const fn new(bytes: [u8; 8]) -> Self {
        ExtendedPanId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl From<u64> for ExtendedPanId {
    fn from(value: u64) -> Self {
        ExtendedPanId(value.to_be_bytes())
    }
}

impl fmt::Display for ExtendedPanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, byte) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for ExtendedPanId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidExtendedPanId(s.to_string());
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 8 {
            return Err(invalid());
        }

        let mut bytes = [0u8; 8];
        for (slot, part) in bytes.iter_mut().zip(parts) {
            if part.len() != 2 {
                return Err(invalid());
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        Ok(ExtendedPanId(bytes))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ExtendedPanId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ExtendedPanId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Scan mode passed to the coordinator's scan command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScanType {
    Energy,
    #[default]
    Active,
}

impl ScanType {
    pub fn code(&self) -> u8 {
        match self {
            ScanType::Energy => 0x00,
            ScanType::Active => 0x01,
        }
    }
}

/// Network membership as reported by the stack's `networkState` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NetworkState {
    NoNetwork,
    JoiningNetwork,
    JoinedNetwork,
    JoinedNetworkNoParent,
    LeavingNetwork,
}

impl NetworkState {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(NetworkState::NoNetwork),
            0x01 => Some(NetworkState::JoiningNetwork),
            0x02 => Some(NetworkState::JoinedNetwork),
            0x03 => Some(NetworkState::JoinedNetworkNoParent),
            0x04 => Some(NetworkState::LeavingNetwork),
            _ => None,
        }
    }

    pub fn is_joined(&self) -> bool {
        matches!(
            self,
            NetworkState::JoinedNetwork | NetworkState::JoinedNetworkNoParent
        )
    }
}

impl fmt::Display for NetworkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NetworkState::NoNetwork => "no_network",
            NetworkState::JoiningNetwork => "joining_network",
            NetworkState::JoinedNetwork => "joined_network",
            NetworkState::JoinedNetworkNoParent => "joined_network_no_parent",
            NetworkState::LeavingNetwork => "leaving_network",
        };
        f.write_str(label)
    }
}

/// A network advertised in a beacon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkDescriptor {
    pub extended_pan_id: ExtendedPanId,
    pub pan_id: u16,
    pub channel: u8,
    pub nwk_update_id: u8,
    pub allowing_join: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_stack_profile"))]
    pub stack_profile: u8,
}

#[cfg(feature = "serde")]
fn default_stack_profile() -> u8 {
    2
}

/// One entry returned by an active scan: the advertised network plus the
/// link quality and signal strength it was heard with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanResult {
    pub network: NetworkDescriptor,
    pub lqi: u8,
    /// Received signal strength in dBm.
    pub rssi: i8,
}

impl ScanResult {
    pub fn new(network: NetworkDescriptor, lqi: u8, rssi: i8) -> Self {
        Self { network, lqi, rssi }
    }

    pub fn allows_joining(&self) -> bool {
        self.network.allowing_join
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_pan_id_display_and_parse_agree() {
        let id = ExtendedPanId::from(0xDEAD_BEEF_0011_2233);
        assert_eq!(id.to_string(), "de:ad:be:ef:00:11:22:33");
        assert_eq!("de:ad:be:ef:00:11:22:33".parse::<ExtendedPanId>(), Ok(id));
    }

    #[test]
    fn scan_type_wire_codes() {
        assert_eq!(ScanType::Energy.code(), 0x00);
        assert_eq!(ScanType::Active.code(), 0x01);
        assert_eq!(ScanType::default(), ScanType::Active);
    }

    #[test]
    fn extended_pan_id_rejects_malformed_input() {
        for raw in [
            "",
            "de:ad",
            "de:ad:be:ef:00:11:22:33:44",
            "zz:ad:be:ef:00:11:22:33",
            "d:ead:be:ef:00:11:22:33",
        ] {
            assert!(raw.parse::<ExtendedPanId>().is_err(), "{raw}");
        }
    }

    #[test]
    fn joined_states() {
        assert!(NetworkState::JoinedNetwork.is_joined());
        assert!(NetworkState::JoinedNetworkNoParent.is_joined());
        assert!(!NetworkState::NoNetwork.is_joined());
        assert_eq!(
            NetworkState::from_code(0x02),
            Some(NetworkState::JoinedNetwork)
        );
        assert_eq!(NetworkState::from_code(0x09), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scan_result_reads_from_json() {
        let raw = r#"{
            "network": {
                "extended_pan_id": "01:02:03:04:05:06:07:08",
                "pan_id": 4660,
                "channel": 15,
                "nwk_update_id": 0,
                "allowing_join": true
            },
            "lqi": 200,
            "rssi": -52
        }"#;
        let parsed: ScanResult =
            serde_json::from_str(raw).expect("scan result json");
        assert_eq!(parsed.network.pan_id, 0x1234);
        assert_eq!(parsed.network.stack_profile, 2);
        assert_eq!(parsed.rssi, -52);
    }
}

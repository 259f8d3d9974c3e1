#![allow(dead_code)]

use zigjoin_core::model::{ExtendedPanId, NetworkDescriptor, ScanResult};

pub const NET_A: u16 = 0x1A1A;
pub const NET_B: u16 = 0x2B2B;
pub const NET_C: u16 = 0x3C3C;

pub fn beacon(
    pan_id: u16,
    channel: u8,
    allowing_join: bool,
    rssi: i8,
) -> ScanResult {
    ScanResult::new(
        NetworkDescriptor {
            extended_pan_id: ExtendedPanId::from(
                0xDD00_0000_0000_0000 | u64::from(pan_id),
            ),
            pan_id,
            channel,
            nwk_update_id: (pan_id & 0x0F) as u8,
            allowing_join,
            stack_profile: 2,
        },
        180,
        rssi,
    )
}

/// A closed strong network and two open ones, the stronger of which is C.
pub fn three_networks() -> Vec<ScanResult> {
    vec![
        beacon(NET_A, 11, false, -40),
        beacon(NET_B, 11, true, -60),
        beacon(NET_C, 11, true, -50),
    ]
}

use tracing::debug;
use zigjoin_model::{NetworkDescriptor, ScanResult};

use crate::error::{JoinError, Result};

/// Picks the joinable network with the strongest signal.
///
/// Only entries whose beacon advertises `allowing_join` are considered.
/// Among those the highest RSSI wins; when several share the maximum the
/// one that appears first in `results` is returned. The comparison is an
/// explicit strictly-greater check, so the tie-break does not depend on any
/// sort being stable.
pub fn select_network(results: &[ScanResult]) -> Result<NetworkDescriptor> {
    let mut best: Option<&ScanResult> = None;
    for candidate in results.iter().filter(|result| result.allows_joining()) {
        match best {
            Some(current) if candidate.rssi <= current.rssi => {}
            _ => best = Some(candidate),
        }
    }

    let chosen = best.ok_or(JoinError::NoJoinableNetwork)?;
    debug!(
        candidates = results.len(),
        pan_id = chosen.network.pan_id,
        extended_pan_id = %chosen.network.extended_pan_id,
        channel = chosen.network.channel,
        rssi = chosen.rssi,
        lqi = chosen.lqi,
        "selected network"
    );
    Ok(chosen.network.clone())
}

#[cfg(test)]
mod tests {
    use zigjoin_model::ExtendedPanId;

    use super::*;

    fn scan(pan_id: u16, allowing_join: bool, rssi: i8) -> ScanResult {
        ScanResult::new(
            NetworkDescriptor {
                extended_pan_id: ExtendedPanId::from(u64::from(pan_id)),
                pan_id,
                channel: 15,
                nwk_update_id: 0,
                allowing_join,
                stack_profile: 2,
            },
            255,
            rssi,
        )
    }

    #[test]
    fn strongest_joinable_network_wins() {
        let results = [
            scan(0xA, false, -40),
            scan(0xB, true, -60),
            scan(0xC, true, -50),
        ];
        assert_eq!(select_network(&results).unwrap().pan_id, 0xC);
    }

    #[test]
    fn ties_resolve_to_the_first_entry_seen() {
        let results = [
            scan(0x1, true, -70),
            scan(0x2, true, -45),
            scan(0x3, true, -45),
            scan(0x4, false, -10),
            scan(0x5, true, -45),
        ];
        assert_eq!(select_network(&results).unwrap().pan_id, 0x2);
    }

    #[test]
    fn strictly_greater_later_entry_replaces_earlier_one() {
        let results = [scan(0x1, true, -45), scan(0x2, true, -44)];
        assert_eq!(select_network(&results).unwrap().pan_id, 0x2);
    }

    #[test]
    fn closed_networks_are_never_selected() {
        let results = [scan(0x1, false, -20), scan(0x2, false, -30)];
        assert_eq!(select_network(&results), Err(JoinError::NoJoinableNetwork));
    }

    #[test]
    fn empty_scan_has_no_joinable_network() {
        assert_eq!(select_network(&[]), Err(JoinError::NoJoinableNetwork));
    }

    #[test]
    fn extreme_rssi_values_compare_correctly() {
        let results = [scan(0x1, true, i8::MIN), scan(0x2, true, i8::MAX)];
        assert_eq!(select_network(&results).unwrap().pan_id, 0x2);
        let only_min = [scan(0x9, true, i8::MIN)];
        assert_eq!(select_network(&only_min).unwrap().pan_id, 0x9);
    }
}

use zigjoin_model::{JoinMethod, JoinParameters, NetworkDescriptor};

/// Transmit power used for every join attempt, in dBm.
pub const MAX_TX_POWER_DBM: i8 = 8;

/// Builds the join parameters for `network`: identity fields are copied
/// from the beacon, everything else takes the fixed join defaults.
pub fn build_join_parameters(network: &NetworkDescriptor) -> JoinParameters {
    JoinParameters {
        extended_pan_id: network.extended_pan_id,
        pan_id: network.pan_id,
        radio_tx_power: MAX_TX_POWER_DBM,
        radio_channel: network.channel,
        join_method: JoinMethod::MacAssociation,
        nwk_manager_id: 0,
        nwk_update_id: network.nwk_update_id,
        channels: 0,
    }
}

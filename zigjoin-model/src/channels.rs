//! Channel bitmasks as expected by the coordinator's scan command.

use std::fmt;

/// Lowest channel of the 2.4 GHz band.
pub const FIRST_2_4GHZ_CHANNEL: u8 = 11;
/// Highest channel of the 2.4 GHz band.
pub const LAST_2_4GHZ_CHANNEL: u8 = 26;

/// Bitmask with bit `c` set for every channel `c` the scan should visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChannelMask(pub u32);

impl ChannelMask {
    /// Every channel in 11..=26.
    pub const ALL_2_4GHZ: ChannelMask = ChannelMask(0x07FF_F800);

    pub const fn empty() -> Self {
        ChannelMask(0)
    }

    /// Encodes a set of channels. Duplicates are idempotent and channels
    /// that do not fit the 32-bit mask are dropped.
    pub fn from_channels<I>(channels: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        ChannelMask(channels.into_iter().fold(0u32, |mask, channel| {
            mask | 1u32.checked_shl(u32::from(channel)).unwrap_or(0)
        }))
    }

    pub fn contains(&self, channel: u8) -> bool {
        1u32.checked_shl(u32::from(channel))
            .is_some_and(|bit| self.0 & bit != 0)
    }

    /// Channels present in the mask, ascending.
    pub fn channels(&self) -> Vec<u8> {
        (0u8..32).filter(|channel| self.contains(*channel)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl From<ChannelMask> for u32 {
    fn from(mask: ChannelMask) -> Self {
        mask.0
    }
}

impl FromIterator<u8> for ChannelMask {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        ChannelMask::from_channels(iter)
    }
}

impl fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Shorthand for [`ChannelMask::from_channels`] returning the raw bits.
pub fn channel_mask<I>(channels: I) -> u32
where
    I: IntoIterator<Item = u8>,
{
    ChannelMask::from_channels(channels).bits()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_encodes_to_zero() {
        assert_eq!(channel_mask([]), 0);
        assert!(ChannelMask::from_channels(std::iter::empty()).is_empty());
    }

    #[test]
    fn single_channel_sets_its_bit() {
        assert_eq!(channel_mask([11]), 0x0000_0800);
        assert_eq!(channel_mask([26]), 0x0400_0000);
    }

    #[test]
    fn duplicates_are_idempotent() {
        assert_eq!(channel_mask([15, 15, 20, 15]), channel_mask([15, 20]));
    }

    #[test]
    fn decode_reproduces_the_encoded_set() {
        let sets: [&[u8]; 4] = [&[], &[11], &[11, 15, 20, 25], &[26, 12, 19]];
        for set in sets {
            let mask = ChannelMask::from_channels(set.iter().copied());
            let mut expected = set.to_vec();
            expected.sort_unstable();
            expected.dedup();
            assert_eq!(mask.channels(), expected, "set {set:?}");
        }
    }

    #[test]
    fn full_band_matches_constant() {
        let mask: ChannelMask =
            (FIRST_2_4GHZ_CHANNEL..=LAST_2_4GHZ_CHANNEL).collect();
        assert_eq!(mask, ChannelMask::ALL_2_4GHZ);
        assert_eq!(mask.to_string(), "0x07fff800");
    }

    #[test]
    fn out_of_range_channels_do_not_panic() {
        assert_eq!(channel_mask([40]), 0);
        assert!(!ChannelMask(u32::MAX).contains(200));
    }
}

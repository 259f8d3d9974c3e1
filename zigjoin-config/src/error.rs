use thiserror::Error;

/// A configuration that parsed but cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("commission.channels must name at least one channel")]
    NoChannels,

    #[error("channel {0} is outside the 2.4 GHz band (11-26)")]
    ChannelOutOfRange(u8),

    #[error("scan duration exponent {0} exceeds the stack maximum of 14")]
    ScanDurationTooLong(u8),

    #[error("join timeout must be greater than zero")]
    ZeroJoinTimeout,

    #[error("status event name must not be empty")]
    EmptyStatusEvent,

    #[error("device path must not be empty")]
    EmptyDevicePath,
}

//! Unsolicited callback frames pushed by the coordinator.

use crate::status::StackStatus;

/// Name of the callback the stack emits whenever its network status changes.
pub const STACK_STATUS_HANDLER: &str = "stackStatusHandler";

/// One decoded argument of a callback frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameArg {
    Status(StackStatus),
    U8(u8),
    U16(u16),
    U32(u32),
    Bytes(Vec<u8>),
}

/// A callback frame that was not requested by the preceding command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsolicitedFrame {
    pub name: String,
    pub args: Vec<FrameArg>,
}

impl UnsolicitedFrame {
    pub fn new(name: impl Into<String>, args: Vec<FrameArg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// A `stackStatusHandler` frame carrying `status`.
    pub fn stack_status(status: StackStatus) -> Self {
        Self::new(STACK_STATUS_HANDLER, vec![FrameArg::Status(status)])
    }

    /// The status carried by a single-argument status frame. Raw `u8`
    /// arguments are accepted as status codes.
    pub fn single_status(&self) -> Option<StackStatus> {
        match self.args.as_slice() {
            [FrameArg::Status(status)] => Some(*status),
            [FrameArg::U8(code)] => Some(StackStatus::from_code(*code)),
            _ => None,
        }
    }
}

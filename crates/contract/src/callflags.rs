//! Permission bits attached to cross-contract calls.

use bitflags::bitflags;

bitflags! {
    /// What a callee is allowed to do on behalf of the caller.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CallFlags: u8 {
        const READ_STATES = 0x01;
        const WRITE_STATES = 0x02;
        const ALLOW_CALL = 0x04;
        const ALLOW_NOTIFY = 0x08;

        const STATES = Self::READ_STATES.bits() | Self::WRITE_STATES.bits();
        const READ_ONLY = Self::READ_STATES.bits() | Self::ALLOW_CALL.bits();
        const ALL = Self::STATES.bits()
            | Self::ALLOW_CALL.bits()
            | Self::ALLOW_NOTIFY.bits();
    }
}

// Licensed under the Apache-2.0 license

//! Registers reached directly over the control-status bus.

/// Security control register
pub const SCTL: u32 = 0x0000_0240;

/// Lockdown override; engaged while a secure action is in flight
pub const LOCKDOWN_OVERRIDE: u32 = 0x0000_0244;

pub const LOCKDOWN_OVERRIDE_ENGAGED: u32 = 0x1;
pub const LOCKDOWN_OVERRIDE_DISENGAGED: u32 = 0x0;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Sctl: u32 {
        const LS_MODE = 1 << 0;
        const HS_MODE = 1 << 1;
    }
}

/// One secure bus doorbell. Heavy-secure and light-secure code each own a
/// copy of the block at a different CSB offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorbellRegs {
    pub ctrl: u32,
    pub data: u32,
    pub cmd: u32,
    pub inq_count: u32,
    pub inq_pop: u32,
}

impl DoorbellRegs {
    const fn at(base: u32) -> Self {
        Self {
            ctrl: base,
            data: base + 0x04,
            cmd: base + 0x08,
            inq_count: base + 0x0c,
            inq_pop: base + 0x10,
        }
    }

    pub const HEAVY: Self = Self::at(0x0000_0c00);
    pub const LIGHT: Self = Self::at(0x0000_0d00);
}

bitflags::bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct DoorbellCtrl: u32 {
        /// Request queue drained; previous transaction finished
        const EMPTY = 1 << 0;
        const RDERR = 1 << 1;
        const WRERR = 1 << 2;
        const PROTERR = 1 << 3;

        const ERRORS = Self::RDERR.bits() | Self::WRERR.bits() | Self::PROTERR.bits();
    }
}

/// Set in the command word for a write transaction
pub const DOORBELL_CMD_WRITE: u32 = 1 << 31;

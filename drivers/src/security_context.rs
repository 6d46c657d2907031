/*++

Licensed under the Apache-2.0 license.

File Name:

    security_context.rs

Abstract:

    File contains the execution context shared by every driver call:
    privilege level, processor identity and the tamper halt hook.

--*/

use se_registers::csb::{DoorbellRegs, Sctl};

/// Privilege level the driver code executes at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivLevel {
    /// Heavy-secure microcode
    Heavy,

    /// Light-secure microcode
    Light,
}

impl PrivLevel {
    /// Doorbell block owned by this privilege level
    pub const fn doorbell(self) -> DoorbellRegs {
        match self {
            Self::Heavy => DoorbellRegs::HEAVY,
            Self::Light => DoorbellRegs::LIGHT,
        }
    }

    /// Bit reported in `SCTL` while the processor runs at this level
    pub const fn sctl_mode(self) -> Sctl {
        match self {
            Self::Heavy => Sctl::HS_MODE,
            Self::Light => Sctl::LS_MODE,
        }
    }
}

/// Identity the mutex reports in its owner field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorId(pub u8);

impl ProcessorId {
    pub const SEC2: Self = Self(1);
    pub const GSP: Self = Self(2);
}

pub const DEFAULT_MUTEX_TIMEOUT_US: u32 = 1000;

/// Parks the processor. Never returns.
pub fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[derive(Clone, Copy)]
pub struct SecurityContext {
    pub level: PrivLevel,
    pub processor: ProcessorId,
    pub mutex_timeout_us: u32,
    halt: fn() -> !,
}

impl SecurityContext {
    pub const fn new(level: PrivLevel, processor: ProcessorId) -> Self {
        Self {
            level,
            processor,
            mutex_timeout_us: DEFAULT_MUTEX_TIMEOUT_US,
            halt: halt_forever,
        }
    }

    pub const fn with_mutex_timeout_us(mut self, timeout_us: u32) -> Self {
        self.mutex_timeout_us = timeout_us;
        self
    }

    /// Replace the routine invoked when tampering is detected
    pub const fn with_halt(mut self, halt: fn() -> !) -> Self {
        self.halt = halt;
        self
    }

    /// Stop execution after tampering was detected
    pub fn halt(&self) -> ! {
        (self.halt)()
    }
}

// Licensed under the Apache-2.0 license

//! Registers reached through the secure bus doorbell.

/// Upper half-word pattern returned by a faulted register read
pub const BADF_MASK: u32 = 0xffff_0000;
pub const BADF_VALUE: u32 = 0xbadf_0000;

#[inline]
pub const fn is_badf(val: u32) -> bool {
    val & BADF_MASK == BADF_VALUE
}

pub mod timer {
    /// Free-running nanosecond counter, low word
    pub const PTIMER_TIME_0: u32 = 0x0000_9400;

    /// Free-running nanosecond counter, high word
    pub const PTIMER_TIME_1: u32 = 0x0000_9410;
}

pub mod mutex {
    /// Reading attempts to take the PKA mutex
    pub const MUTEX: u32 = 0x0001_0000;
    pub const MUTEX_RELEASE: u32 = 0x0001_0004;
    pub const MUTEX_TMOUT_ACTION: u32 = 0x0001_0008;
    pub const MUTEX_WATCHDOG_TMOUT: u32 = 0x0001_000c;
    pub const MUTEX_STATUS: u32 = 0x0001_0010;

    /// Value read from `MUTEX` when the lock was granted
    pub const MUTEX_ACQUIRED: u32 = 0x1;
    pub const MUTEX_RELEASE_REQUEST: u32 = 0x1;

    /// Reset value of `MUTEX_WATCHDOG_TMOUT`; anything else means the
    /// register was tampered with.
    pub const MUTEX_WATCHDOG_TMOUT_DEFAULT: u32 = 0x0fff_ffff;

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct TmoutAction: u32 {
            const INTERRUPT = 1 << 0;
            const RELEASE_MUTEX = 1 << 1;
            const RESET_PKA = 1 << 2;
        }
    }

    pub const MUTEX_STATUS_OWNER_MASK: u32 = 0xf;

    /// Set when the watchdog forced the lock free
    pub const MUTEX_STATUS_WATCHDOG_RELEASED: u32 = 1 << 8;

    /// Owner id of an unlocked mutex
    pub const MUTEX_OWNER_NONE: u8 = 0;

    #[inline]
    pub const fn owner(status: u32) -> u8 {
        (status & MUTEX_STATUS_OWNER_MASK) as u8
    }
}

pub mod pka {
    pub const CONTROL: u32 = 0x0002_0000;
    pub const ENTRY: u32 = 0x0002_0004;
    pub const RETURN_CODE: u32 = 0x0002_0008;
    pub const STATUS: u32 = 0x0002_000c;
    pub const FLAGS: u32 = 0x0002_0010;
    pub const F_STACK: u32 = 0x0002_0014;
    pub const INT_ENABLE: u32 = 0x0002_0018;

    pub const CONTROL_GO: u32 = 1 << 31;
    pub const CONTROL_BASE_RADIX_SHIFT: u32 = 8;
    pub const CONTROL_BASE_RADIX_MASK: u32 = 0x7;
    pub const CONTROL_PARTIAL_RADIX_MASK: u32 = 0xff;

    /// Completion interrupt, write one to clear
    pub const STATUS_IRQ: u32 = 1 << 30;
    pub const INT_ENABLE_DONE: u32 = 1 << 30;

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct Flags: u32 {
            const ZERO = 1 << 0;
            const MEMBIT = 1 << 1;
            const BORROW = 1 << 2;
            const CARRY = 1 << 3;
            const F0 = 1 << 4;
            const F1 = 1 << 5;
            const F2 = 1 << 6;
            const F3 = 1 << 7;
        }
    }

    pub const RETURN_CODE_STOP_REASON_SHIFT: u32 = 16;
    pub const RETURN_CODE_STOP_REASON_MASK: u32 = 0xff;

    pub mod stop_reason {
        pub const NORMAL: u32 = 0;
        pub const INVALID_OPCODE: u32 = 1;
        pub const F_STACK_UNDERFLOW: u32 = 2;
        pub const F_STACK_OVERFLOW: u32 = 3;
        pub const WATCHDOG: u32 = 4;
        pub const HOST_REQUEST: u32 = 5;
        pub const P_STACK_UNDERFLOW: u32 = 6;
        pub const P_STACK_OVERFLOW: u32 = 7;
        pub const MEMORY_PORT_COLLISION: u32 = 8;
        pub const OPERATION_SIZE_EXCEEDED: u32 = 9;
    }

    /// Operand memory, four banks of `BANK_SIZE` bytes
    pub const BANK_START_A: u32 = 0x0002_8000;
    pub const BANK_START_B: u32 = 0x0002_9000;
    pub const BANK_START_C: u32 = 0x0002_a000;
    pub const BANK_START_D: u32 = 0x0002_b000;
    pub const BANK_SIZE: u32 = 0x1000;

    /// Microprogram entry points in the engine's firmware ROM
    pub mod entry {
        pub const CALC_R_INV: u32 = 0x10;
        pub const CALC_MP: u32 = 0x18;
        pub const CALC_R_SQR: u32 = 0x20;
        pub const MOD_MULT: u32 = 0x30;
        pub const MOD_ADD: u32 = 0x38;
        pub const MOD_REDUCE: u32 = 0x40;
        pub const MOD_INVERT: u32 = 0x48;
        pub const MOD_EXP: u32 = 0x50;
        pub const POINT_MULT: u32 = 0x60;
        pub const POINT_ADD: u32 = 0x68;
        pub const POINT_VERIFY: u32 = 0x70;
    }
}

pub mod trng {
    pub const STATUS: u32 = 0x0003_0000;
    pub const CMD: u32 = 0x0003_0004;
    pub const MODE: u32 = 0x0003_0008;
    pub const SMODE: u32 = 0x0003_000c;
    pub const INT_STATUS: u32 = 0x0003_0010;
    pub const RAND0: u32 = 0x0003_0020;

    /// Words produced by one generate command in 256-bit output mode
    pub const RAND_WORDS: usize = 8;

    pub const CMD_GEN_RANDOM: u32 = 0x1;
    pub const CMD_RESEED: u32 = 0x2;

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct Status: u32 {
            const SECURE = 1 << 0;
            const SEEDED = 1 << 1;
            const R256 = 1 << 2;
            const IDLE = 1 << 3;
        }
    }

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct Mode: u32 {
            const SECURE = 1 << 0;
            const R256 = 1 << 1;
        }
    }

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct Smode: u32 {
            const AUTOSEED = 1 << 0;
        }
    }

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct IntStatus: u32 {
            const RAND_READY = 1 << 0;
            const RESEED_DONE = 1 << 1;
        }
    }

    #[inline]
    pub const fn rand_reg(idx: usize) -> u32 {
        RAND0 + (idx as u32) * 4
    }

    #[inline]
    pub const fn is_rand_reg(addr: u32) -> bool {
        addr >= RAND0 && addr < RAND0 + (RAND_WORDS as u32) * 4 && addr % 4 == 0
    }
}

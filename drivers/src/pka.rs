/*++

Licensed under the Apache-2.0 license.

File Name:

    pka.rs

Abstract:

    File contains the PKA microprogram runner and the modular arithmetic
    primitives built on it.

--*/

use crate::mutex::PkaMutex;
use crate::radix::{Bank, OperandBankRef, RadixConfig};
use crate::secure_bus::SecureBus;
use crate::{cprintln, wait};
use se_error::{SeError, SeResult};
use se_registers::se::pka::{self, entry, stop_reason};
use se_registers::Csb;

/// Microprograms in the engine's firmware ROM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    CalcRInv,
    CalcMp,
    CalcRSqr,
    ModMult,
    ModAdd,
    ModReduce,
    ModInvert,
    ModExp,
    PointMult,
    PointAdd,
    PointVerify,
}

impl Program {
    pub const fn entry(self) -> u32 {
        match self {
            Self::CalcRInv => entry::CALC_R_INV,
            Self::CalcMp => entry::CALC_MP,
            Self::CalcRSqr => entry::CALC_R_SQR,
            Self::ModMult => entry::MOD_MULT,
            Self::ModAdd => entry::MOD_ADD,
            Self::ModReduce => entry::MOD_REDUCE,
            Self::ModInvert => entry::MOD_INVERT,
            Self::ModExp => entry::MOD_EXP,
            Self::PointMult => entry::POINT_MULT,
            Self::PointAdd => entry::POINT_ADD,
            Self::PointVerify => entry::POINT_VERIFY,
        }
    }
}

/// Operand slots the microprograms read and write
pub mod slot {
    use super::{Bank, OperandBankRef};

    pub const MODULUS: OperandBankRef = OperandBankRef::new(Bank::D, 0);
    pub const R_INV: OperandBankRef = OperandBankRef::new(Bank::C, 0);
    pub const MP: OperandBankRef = OperandBankRef::new(Bank::D, 1);
    pub const R_SQR: OperandBankRef = OperandBankRef::new(Bank::D, 3);

    pub const X: OperandBankRef = OperandBankRef::new(Bank::A, 0);
    pub const Y: OperandBankRef = OperandBankRef::new(Bank::B, 0);
    pub const RESULT: OperandBankRef = OperandBankRef::new(Bank::A, 0);
    pub const REDUCE_IN: OperandBankRef = OperandBankRef::new(Bank::C, 0);
    pub const INVERT_OUT: OperandBankRef = OperandBankRef::new(Bank::C, 0);
    pub const EXPONENT: OperandBankRef = OperandBankRef::new(Bank::D, 2);

    pub const POINT_X: OperandBankRef = OperandBankRef::new(Bank::A, 2);
    pub const POINT_Y: OperandBankRef = OperandBankRef::new(Bank::B, 2);
    pub const POINT2_X: OperandBankRef = OperandBankRef::new(Bank::A, 3);
    pub const POINT2_Y: OperandBankRef = OperandBankRef::new(Bank::B, 3);
    pub const CURVE_A: OperandBankRef = OperandBankRef::new(Bank::A, 6);
    pub const CURVE_B: OperandBankRef = OperandBankRef::new(Bank::A, 7);
    pub const SCALAR: OperandBankRef = OperandBankRef::new(Bank::D, 7);
}

/// Copy `words` into an operand slot, zero-extending to the slot width
pub(crate) fn write_operand<C: Csb>(
    bus: &mut SecureBus<C>,
    config: &RadixConfig,
    slot: OperandBankRef,
    words: &[u32],
) -> SeResult<()> {
    if words.len() > config.slot_words() {
        return Err(SeError::DRIVER_PKA_INVALID_OPERAND_LEN);
    }
    let base = config.bank_address(slot);
    for idx in 0..config.slot_words() {
        let word = words.get(idx).copied().unwrap_or(0);
        bus.write(base + (idx as u32) * 4, word)?;
    }
    Ok(())
}

/// Copy the low `out.len()` words of an operand slot into `out`
pub(crate) fn read_operand<C: Csb>(
    bus: &mut SecureBus<C>,
    config: &RadixConfig,
    slot: OperandBankRef,
    out: &mut [u32],
) -> SeResult<()> {
    if out.len() > config.slot_words() {
        return Err(SeError::DRIVER_PKA_INVALID_OPERAND_LEN);
    }
    let base = config.bank_address(slot);
    for (idx, word) in out.iter_mut().enumerate() {
        *word = bus.read(base + (idx as u32) * 4)?;
    }
    Ok(())
}

/// Start a microprogram and wait for it to stop
///
/// Must be called with the engine mutex held.
pub(crate) fn run_program<C: Csb>(
    bus: &mut SecureBus<C>,
    config: &RadixConfig,
    program: Program,
) -> SeResult<()> {
    bus.write(pka::FLAGS, 0)?;
    bus.write(pka::STATUS, pka::STATUS_IRQ)?;
    bus.write(pka::F_STACK, 0)?;
    bus.write(pka::ENTRY, program.entry())?;
    bus.write(pka::INT_ENABLE, pka::INT_ENABLE_DONE)?;
    bus.write(pka::CONTROL, pka::CONTROL_GO | config.control_bits())?;

    wait::until(|| Ok(bus.read(pka::STATUS)? & pka::STATUS_IRQ != 0))?;
    bus.write(pka::STATUS, pka::STATUS_IRQ)?;

    let return_code = bus.read(pka::RETURN_CODE)?;
    let reason =
        (return_code >> pka::RETURN_CODE_STOP_REASON_SHIFT) & pka::RETURN_CODE_STOP_REASON_MASK;
    check_stop_reason(reason).map_err(|err| {
        cprintln!(
            "[pka] program 0x{:02x} stopped with reason {}",
            program.entry(),
            reason
        );
        err
    })
}

fn check_stop_reason(reason: u32) -> SeResult<()> {
    match reason {
        stop_reason::NORMAL => Ok(()),
        stop_reason::INVALID_OPCODE => Err(SeError::DRIVER_PKA_INVALID_OPCODE),
        stop_reason::F_STACK_UNDERFLOW => Err(SeError::DRIVER_PKA_F_STACK_UNDERFLOW),
        stop_reason::F_STACK_OVERFLOW => Err(SeError::DRIVER_PKA_F_STACK_OVERFLOW),
        stop_reason::WATCHDOG => Err(SeError::DRIVER_PKA_WATCHDOG),
        stop_reason::HOST_REQUEST => Err(SeError::DRIVER_PKA_HOST_REQUEST),
        stop_reason::P_STACK_UNDERFLOW => Err(SeError::DRIVER_PKA_P_STACK_UNDERFLOW),
        stop_reason::P_STACK_OVERFLOW => Err(SeError::DRIVER_PKA_P_STACK_OVERFLOW),
        stop_reason::MEMORY_PORT_COLLISION => Err(SeError::DRIVER_PKA_MEMORY_PORT_COLLISION),
        stop_reason::OPERATION_SIZE_EXCEEDED => Err(SeError::DRIVER_PKA_OPERATION_SIZE_EXCEEDED),
        _ => Err(SeError::DRIVER_PKA_UNKNOWN_ERROR),
    }
}

/// Load the modulus and derive the Montgomery constants the arithmetic
/// microprograms depend on
pub(crate) fn montgomery_setup<C: Csb>(
    bus: &mut SecureBus<C>,
    config: &RadixConfig,
    modulus: &[u32],
) -> SeResult<()> {
    write_operand(bus, config, slot::MODULUS, modulus)?;
    run_program(bus, config, Program::CalcRInv)?;
    run_program(bus, config, Program::CalcMp)?;
    run_program(bus, config, Program::CalcRSqr)
}

/// Public key accelerator API
///
/// Operands are little-endian word slices, least significant word first.
/// Each operation holds the engine mutex for its whole duration.
pub struct Pka<'a, C: Csb> {
    pub(crate) bus: &'a mut SecureBus<C>,
}

impl<'a, C: Csb> Pka<'a, C> {
    pub fn new(bus: &'a mut SecureBus<C>) -> Self {
        Self { bus }
    }

    /// Compute `x mod modulus`
    pub fn mod_reduce(
        &mut self,
        config: &RadixConfig,
        x: &[u32],
        modulus: &[u32],
        out: &mut [u32],
    ) -> SeResult<()> {
        PkaMutex::with_mutex(self.bus, |bus| {
            montgomery_setup(bus, config, modulus)?;
            write_operand(bus, config, slot::REDUCE_IN, x)?;
            run_program(bus, config, Program::ModReduce)?;
            read_operand(bus, config, slot::RESULT, out)
        })
    }

    /// Compute `x^-1 mod modulus`
    pub fn mod_invert(
        &mut self,
        config: &RadixConfig,
        x: &[u32],
        modulus: &[u32],
        out: &mut [u32],
    ) -> SeResult<()> {
        PkaMutex::with_mutex(self.bus, |bus| {
            montgomery_setup(bus, config, modulus)?;
            write_operand(bus, config, slot::X, x)?;
            run_program(bus, config, Program::ModInvert)?;
            read_operand(bus, config, slot::INVERT_OUT, out)
        })
    }

    /// Compute `x * y mod modulus`
    pub fn mod_mult(
        &mut self,
        config: &RadixConfig,
        x: &[u32],
        y: &[u32],
        modulus: &[u32],
        out: &mut [u32],
    ) -> SeResult<()> {
        self.binary_op(config, Program::ModMult, x, y, modulus, out)
    }

    /// Compute `x + y mod modulus`
    pub fn mod_add(
        &mut self,
        config: &RadixConfig,
        x: &[u32],
        y: &[u32],
        modulus: &[u32],
        out: &mut [u32],
    ) -> SeResult<()> {
        self.binary_op(config, Program::ModAdd, x, y, modulus, out)
    }

    fn binary_op(
        &mut self,
        config: &RadixConfig,
        program: Program,
        x: &[u32],
        y: &[u32],
        modulus: &[u32],
        out: &mut [u32],
    ) -> SeResult<()> {
        PkaMutex::with_mutex(self.bus, |bus| {
            montgomery_setup(bus, config, modulus)?;
            write_operand(bus, config, slot::X, x)?;
            write_operand(bus, config, slot::Y, y)?;
            run_program(bus, config, program)?;
            read_operand(bus, config, slot::RESULT, out)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(check_stop_reason(0), Ok(()));
        assert_eq!(
            check_stop_reason(4),
            Err(SeError::DRIVER_PKA_WATCHDOG)
        );
        assert_eq!(
            check_stop_reason(9),
            Err(SeError::DRIVER_PKA_OPERATION_SIZE_EXCEEDED)
        );
        assert_eq!(
            check_stop_reason(0x42),
            Err(SeError::DRIVER_PKA_UNKNOWN_ERROR)
        );
    }
}

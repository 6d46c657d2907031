/*++

Licensed under the Apache-2.0 license.

File Name:

    secure_bus.rs

Abstract:

    File contains the doorbell transport used to reach security engine
    registers from the processor's control-status bus.

--*/

use crate::security_context::SecurityContext;
use crate::{cprintln, wait};
use se_error::{SeError, SeResult};
use se_registers::csb::{DoorbellCtrl, DoorbellRegs, DOORBELL_CMD_WRITE};
use se_registers::se::{is_badf, timer, trng};
use se_registers::Csb;

/// Extra reads of `PTIMER_TIME_1` before a sentinel value is declared stuck
const PTIMER_RESAMPLE_ATTEMPTS: usize = 3;

/// Secure bus transport. Owns the CSB capability; every engine register
/// access in the crate goes through this type.
pub struct SecureBus<C: Csb> {
    csb: C,
    ctx: SecurityContext,
    regs: DoorbellRegs,
}

impl<C: Csb> SecureBus<C> {
    pub fn new(csb: C, ctx: SecurityContext) -> Self {
        Self {
            csb,
            regs: ctx.level.doorbell(),
            ctx,
        }
    }

    pub fn context(&self) -> &SecurityContext {
        &self.ctx
    }

    pub fn into_inner(self) -> C {
        self.csb
    }

    /// Read a register directly on the control-status bus
    pub fn csb_read(&mut self, addr: u32) -> SeResult<u32> {
        self.csb
            .read(addr)
            .map_err(|_| SeError::DRIVER_CSB_PRIV_READ_ERROR)
    }

    /// Write a register directly on the control-status bus
    pub fn csb_write(&mut self, addr: u32, val: u32) -> SeResult<()> {
        self.csb
            .write(addr, val)
            .map_err(|_| SeError::DRIVER_CSB_PRIV_WRITE_ERROR)
    }

    /// Read a security engine register
    ///
    /// # Arguments
    ///
    /// * `addr` - Secure bus address
    ///
    /// # Returns
    ///
    /// * `u32` - Register value, after the 0xBADF sentinel policy was applied
    pub fn read(&mut self, addr: u32) -> SeResult<u32> {
        let val = self.read_raw(addr)?;
        self.check_badf(addr, val)
    }

    /// Write a security engine register. Writes are never retried.
    ///
    /// # Arguments
    ///
    /// * `addr` - Secure bus address
    /// * `val` - Data to write
    pub fn write(&mut self, addr: u32, val: u32) -> SeResult<()> {
        self.wait_empty()?;
        self.csb_write(self.regs.data, val)?;
        self.csb_write(self.regs.cmd, addr | DOORBELL_CMD_WRITE)?;
        let ctrl = self.wait_empty()?;
        Self::check_ctrl(ctrl)
    }

    fn read_raw(&mut self, addr: u32) -> SeResult<u32> {
        self.wait_empty()?;
        self.csb_write(self.regs.cmd, addr & !DOORBELL_CMD_WRITE)?;
        let inq_count = self.regs.inq_count;
        wait::until(|| Ok(self.csb_read(inq_count)? != 0))?;
        let val = self.csb_read(self.regs.inq_pop)?;
        let ctrl = DoorbellCtrl::from_bits_retain(self.csb_read(self.regs.ctrl)?);
        Self::check_ctrl(ctrl)?;
        Ok(val)
    }

    fn wait_empty(&mut self) -> SeResult<DoorbellCtrl> {
        loop {
            let ctrl = DoorbellCtrl::from_bits_retain(self.csb_read(self.regs.ctrl)?);
            if ctrl.contains(DoorbellCtrl::EMPTY) {
                return Ok(ctrl);
            }
        }
    }

    fn check_ctrl(ctrl: DoorbellCtrl) -> SeResult<()> {
        if ctrl.contains(DoorbellCtrl::PROTERR) {
            Err(SeError::DRIVER_SECURE_BUS_PROTOCOL_ERROR)
        } else if ctrl.contains(DoorbellCtrl::RDERR) {
            Err(SeError::DRIVER_SECURE_BUS_READ_ERROR)
        } else if ctrl.contains(DoorbellCtrl::WRERR) {
            Err(SeError::DRIVER_SECURE_BUS_WRITE_ERROR)
        } else {
            Ok(())
        }
    }

    fn check_badf(&mut self, addr: u32, val: u32) -> SeResult<u32> {
        if !is_badf(val) {
            return Ok(val);
        }
        match addr {
            // The low word legitimately passes through the sentinel range.
            timer::PTIMER_TIME_0 => Ok(val),
            timer::PTIMER_TIME_1 => {
                for _ in 0..PTIMER_RESAMPLE_ATTEMPTS {
                    if self.read_raw(addr)? != val {
                        return Ok(val);
                    }
                }
                cprintln!("[se-bus] PTIMER_TIME_1 stuck at 0x{:08x}", val);
                Err(SeError::DRIVER_SECURE_BUS_BADF_TIMER_STUCK)
            }
            addr if trng::is_rand_reg(addr) => Ok(val),
            _ => {
                cprintln!("[se-bus] read of 0x{:08x} returned 0x{:08x}", addr, val);
                Err(SeError::DRIVER_SECURE_BUS_BADF_VALUE)
            }
        }
    }
}

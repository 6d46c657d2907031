/*++

Licensed under the Apache-2.0 license.

File Name:

    model.rs

Abstract:

    File contains the simulated control-status bus of one processor: its
    two secure bus doorbells, the security control registers and the
    engines reached through the doorbells.

--*/

use crate::log::Log;
use crate::mutex::MutexModel;
use crate::pka::PkaModel;
use crate::trng::TrngModel;
use se_registers::csb::{
    DoorbellCtrl, DoorbellRegs, Sctl, DOORBELL_CMD_WRITE, LOCKDOWN_OVERRIDE,
    LOCKDOWN_OVERRIDE_DISENGAGED, SCTL,
};
use se_registers::se::{self, timer, BADF_VALUE};
use se_registers::{Csb, CsbError};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Write;

/// Default nanoseconds the free-running timer advances per read of its low
/// word
pub const TIMER_TICK_NS: u64 = 1000;

#[derive(Default)]
struct Doorbell {
    inq: VecDeque<u32>,
    data: u32,
    errors: DoorbellCtrl,
}

/// Simulated register file behind [`Csb`]
pub struct SeModel {
    pub log: Log,
    pub mutex: MutexModel,
    pub pka: PkaModel,
    pub trng: TrngModel,
    requester: u8,
    sctl: Sctl,
    lockdown: u32,
    time_ns: u64,
    tick_ns: u64,
    doorbells: [Doorbell; 2],
    scripted_reads: HashMap<u32, VecDeque<u32>>,
    bus_errors: HashMap<u32, DoorbellCtrl>,
    csb_read_faults: HashSet<u32>,
    csb_write_faults: HashSet<u32>,
}

impl SeModel {
    /// Model seen by processor `requester`, running in heavy-secure mode
    pub fn new(requester: u8) -> Self {
        Self {
            log: Log::new(),
            mutex: MutexModel::default(),
            pka: PkaModel::default(),
            trng: TrngModel::default(),
            requester,
            sctl: Sctl::HS_MODE,
            lockdown: LOCKDOWN_OVERRIDE_DISENGAGED,
            time_ns: 0,
            tick_ns: TIMER_TICK_NS,
            doorbells: Default::default(),
            scripted_reads: HashMap::new(),
            bus_errors: HashMap::new(),
            csb_read_faults: HashSet::new(),
            csb_write_faults: HashSet::new(),
        }
    }

    pub fn set_sctl(&mut self, sctl: Sctl) {
        self.sctl = sctl;
    }

    pub fn lockdown_override(&self) -> u32 {
        self.lockdown
    }

    pub fn time_ns(&self) -> u64 {
        self.time_ns
    }

    pub fn set_time_ns(&mut self, time_ns: u64) {
        self.time_ns = time_ns;
    }

    /// Make each read of the timer's low word advance time by `tick_ns`
    pub fn set_timer_tick_ns(&mut self, tick_ns: u64) {
        self.tick_ns = tick_ns;
    }

    /// Queue values returned by the next secure bus reads of `addr`, ahead of
    /// the register's real contents
    pub fn script_reads(&mut self, addr: u32, values: &[u32]) {
        self.scripted_reads
            .entry(addr)
            .or_default()
            .extend(values.iter().copied());
    }

    /// Report `errors` in the doorbell control register after every
    /// transaction addressed to `addr`
    pub fn inject_bus_error(&mut self, addr: u32, errors: DoorbellCtrl) {
        self.bus_errors.insert(addr, errors);
    }

    /// Fault CSB reads of `addr`
    pub fn fail_csb_read(&mut self, addr: u32) {
        self.csb_read_faults.insert(addr);
    }

    /// Fault CSB writes of `addr`
    pub fn fail_csb_write(&mut self, addr: u32) {
        self.csb_write_faults.insert(addr);
    }

    /// Fire the engine mutex watchdog
    pub fn fire_mutex_watchdog(&mut self) {
        if self.mutex.fire_watchdog() {
            self.pka.reset();
        }
    }

    /// Secure bus read that bypasses the doorbells
    pub fn peek(&mut self, addr: u32) -> u32 {
        self.se_read(addr)
    }

    /// Secure bus write that bypasses the doorbells
    pub fn poke(&mut self, addr: u32, val: u32) {
        self.se_write(addr, val)
    }

    fn doorbell_index(addr: u32) -> Option<(usize, u32)> {
        [DoorbellRegs::HEAVY, DoorbellRegs::LIGHT]
            .iter()
            .enumerate()
            .find(|(_, regs)| (regs.ctrl..=regs.inq_pop).contains(&addr))
            .map(|(idx, regs)| (idx, addr - regs.ctrl))
    }

    fn se_read(&mut self, addr: u32) -> u32 {
        writeln!(self.log.w(), "se_read({addr:#010x})").unwrap();
        if let Some(val) = self
            .scripted_reads
            .get_mut(&addr)
            .and_then(VecDeque::pop_front)
        {
            return val;
        }
        let val = match addr {
            timer::PTIMER_TIME_0 => {
                let val = self.time_ns as u32;
                self.time_ns += self.tick_ns;
                Some(val)
            }
            timer::PTIMER_TIME_1 => Some((self.time_ns >> 32) as u32),
            _ => self
                .mutex
                .read(self.requester, addr)
                .or_else(|| self.pka.read(addr))
                .or_else(|| self.trng.read(addr)),
        };
        val.unwrap_or(BADF_VALUE | 0x5e5e)
    }

    fn se_write(&mut self, addr: u32, val: u32) {
        writeln!(self.log.w(), "se_write({addr:#010x}, {val:#010x})").unwrap();
        let handled = self.mutex.write(self.requester, addr, val)
            || self.pka.write(addr, val)
            || self.trng.write(addr, val);
        if !handled {
            writeln!(self.log.w(), "se_write to unmapped {addr:#010x}").unwrap();
        }
    }

    fn doorbell_read(&mut self, idx: usize, offset: u32) -> u32 {
        let db = &mut self.doorbells[idx];
        match offset {
            0x00 => (DoorbellCtrl::EMPTY | db.errors).bits(),
            0x04 => db.data,
            0x0c => db.inq.len() as u32,
            0x10 => db.inq.pop_front().unwrap_or(BADF_VALUE),
            _ => 0,
        }
    }

    fn doorbell_write(&mut self, idx: usize, offset: u32, val: u32) {
        match offset {
            0x04 => self.doorbells[idx].data = val,
            0x08 => {
                let addr = val & !DOORBELL_CMD_WRITE;
                self.doorbells[idx].errors = self
                    .bus_errors
                    .get(&addr)
                    .copied()
                    .unwrap_or(DoorbellCtrl::empty());
                if val & DOORBELL_CMD_WRITE != 0 {
                    let data = self.doorbells[idx].data;
                    self.se_write(addr, data);
                } else {
                    let data = self.se_read(addr);
                    self.doorbells[idx].inq.push_back(data);
                }
            }
            _ => {}
        }
    }
}

impl Csb for SeModel {
    fn read(&mut self, addr: u32) -> Result<u32, CsbError> {
        if self.csb_read_faults.contains(&addr) {
            return Err(CsbError::ReadFault);
        }
        if let Some((idx, offset)) = Self::doorbell_index(addr) {
            return Ok(self.doorbell_read(idx, offset));
        }
        Ok(match addr {
            SCTL => self.sctl.bits(),
            LOCKDOWN_OVERRIDE => self.lockdown,
            _ => 0,
        })
    }

    fn write(&mut self, addr: u32, val: u32) -> Result<(), CsbError> {
        if self.csb_write_faults.contains(&addr) {
            return Err(CsbError::WriteFault);
        }
        if let Some((idx, offset)) = Self::doorbell_index(addr) {
            self.doorbell_write(idx, offset, val);
            return Ok(());
        }
        if addr == LOCKDOWN_OVERRIDE {
            writeln!(self.log.w(), "csb_write({addr:#010x}, {val:#010x})").unwrap();
            self.lockdown = val;
        }
        Ok(())
    }
}

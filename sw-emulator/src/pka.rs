/*++

Licensed under the Apache-2.0 license.

File Name:

    pka.rs

Abstract:

    File contains the simulated public key accelerator: control registers,
    four operand banks and the microprograms the drivers call.

--*/

use crate::math::{is_zero, mod_inv, Curve, Point};
use num_bigint::BigUint;
use se_registers::se::pka::*;

const BANK_WORDS: usize = (BANK_SIZE / 4) as usize;

/// Stop reason reported when an arithmetic program finds Montgomery
/// constants that do not belong to the loaded modulus
pub const STOP_MONTGOMERY_MISMATCH: u32 = 0xff;

#[derive(Clone, Copy)]
enum BankId {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

pub struct PkaModel {
    control: u32,
    entry: u32,
    return_code: u32,
    status: u32,
    flags: u32,
    f_stack: u32,
    int_enable: u32,
    banks: [Vec<u32>; 4],
    injected_stop: Option<u32>,
    history: Vec<u32>,
}

impl Default for PkaModel {
    fn default() -> Self {
        Self {
            control: 0,
            entry: 0,
            return_code: 0,
            status: 0,
            flags: 0,
            f_stack: 0,
            int_enable: 0,
            banks: std::array::from_fn(|_| vec![0; BANK_WORDS]),
            injected_stop: None,
            history: Vec::new(),
        }
    }
}

impl PkaModel {
    pub fn reset(&mut self) {
        let injected_stop = self.injected_stop.take();
        let history = std::mem::take(&mut self.history);
        *self = Self {
            injected_stop,
            history,
            ..Self::default()
        };
    }

    /// Entry points of every program started so far
    pub fn history(&self) -> &[u32] {
        &self.history
    }

    /// Make the next program stop with `reason` instead of running
    pub fn inject_stop_reason(&mut self, reason: u32) {
        self.injected_stop = Some(reason);
    }

    pub fn read(&self, addr: u32) -> Option<u32> {
        let val = match addr {
            CONTROL => self.control,
            ENTRY => self.entry,
            RETURN_CODE => self.return_code,
            STATUS => self.status,
            FLAGS => self.flags,
            F_STACK => self.f_stack,
            INT_ENABLE => self.int_enable,
            _ => {
                let (bank, idx) = Self::bank_word(addr)?;
                self.banks[bank][idx]
            }
        };
        Some(val)
    }

    pub fn write(&mut self, addr: u32, val: u32) -> bool {
        match addr {
            CONTROL => {
                self.control = val;
                if val & CONTROL_GO != 0 {
                    self.go();
                }
            }
            ENTRY => self.entry = val,
            STATUS => self.status &= !val,
            FLAGS => self.flags = val,
            F_STACK => self.f_stack = val,
            INT_ENABLE => self.int_enable = val,
            RETURN_CODE => {}
            _ => match Self::bank_word(addr) {
                Some((bank, idx)) => self.banks[bank][idx] = val,
                None => return false,
            },
        }
        true
    }

    fn bank_word(addr: u32) -> Option<(usize, usize)> {
        if !(BANK_START_A..BANK_START_D + BANK_SIZE).contains(&addr) || addr % 4 != 0 {
            return None;
        }
        let offset = addr - BANK_START_A;
        Some(((offset / BANK_SIZE) as usize, ((offset % BANK_SIZE) / 4) as usize))
    }

    fn go(&mut self) {
        self.history.push(self.entry);
        let reason = match self.injected_stop.take() {
            Some(reason) => reason,
            None => match self.execute() {
                Ok(()) => stop_reason::NORMAL,
                Err(reason) => reason,
            },
        };
        self.return_code = (reason & RETURN_CODE_STOP_REASON_MASK) << RETURN_CODE_STOP_REASON_SHIFT;
        self.control &= !CONTROL_GO;
        self.status |= STATUS_IRQ;
    }

    fn get(&self, bank: BankId, index: usize, words: usize) -> BigUint {
        let start = index * words;
        BigUint::from_slice(&self.banks[bank as usize][start..start + words])
    }

    fn set(&mut self, bank: BankId, index: usize, words: usize, val: &BigUint) {
        let start = index * words;
        let slot = &mut self.banks[bank as usize][start..start + words];
        slot.fill(0);
        for (dst, src) in slot.iter_mut().zip(val.to_u32_digits()) {
            *dst = src;
        }
    }

    fn get_point(&self, x_bank: BankId, y_bank: BankId, index: usize, words: usize) -> Point {
        let x = self.get(x_bank, index, words);
        let y = self.get(y_bank, index, words);
        if is_zero(&x) && is_zero(&y) {
            None
        } else {
            Some((x, y))
        }
    }

    fn set_point(&mut self, point: &Point, words: usize) {
        let zero = BigUint::from(0u32);
        let (x, y) = match point {
            Some((x, y)) => (x, y),
            None => (&zero, &zero),
        };
        self.set(BankId::A, 2, words, x);
        self.set(BankId::B, 2, words, y);
    }

    fn execute(&mut self) -> Result<(), u32> {
        let code = (self.control >> CONTROL_BASE_RADIX_SHIFT) & CONTROL_BASE_RADIX_MASK;
        if !(2..=6).contains(&code) {
            return Err(stop_reason::INVALID_OPCODE);
        }
        let words = (256usize << (code - 2)) / 32;
        let partial = (self.control & CONTROL_PARTIAL_RADIX_MASK) as usize;
        if partial > words {
            return Err(stop_reason::OPERATION_SIZE_EXCEEDED);
        }

        let m = self.get(BankId::D, 0, words);
        if is_zero(&m) || !m.bit(0) {
            return Err(STOP_MONTGOMERY_MISMATCH);
        }
        let r = BigUint::from(1u32) << (32 * words);

        match self.entry {
            entry::CALC_R_INV => {
                let r_inv = mod_inv(&r, &m).ok_or(STOP_MONTGOMERY_MISMATCH)?;
                self.set(BankId::C, 0, words, &r_inv);
                return Ok(());
            }
            entry::CALC_MP => {
                let mp = Self::mp(&m)?;
                self.set(BankId::D, 1, words, &mp);
                return Ok(());
            }
            entry::CALC_R_SQR => {
                self.set(BankId::D, 3, words, &((&r * &r) % &m));
                return Ok(());
            }
            _ => {}
        }

        if self.get(BankId::D, 1, words) != Self::mp(&m)?
            || self.get(BankId::D, 3, words) != (&r * &r) % &m
        {
            return Err(STOP_MONTGOMERY_MISMATCH);
        }

        match self.entry {
            entry::MOD_MULT => {
                let val = (self.get(BankId::A, 0, words) * self.get(BankId::B, 0, words)) % &m;
                self.set(BankId::A, 0, words, &val);
            }
            entry::MOD_ADD => {
                let val = (self.get(BankId::A, 0, words) + self.get(BankId::B, 0, words)) % &m;
                self.set(BankId::A, 0, words, &val);
            }
            entry::MOD_REDUCE => {
                let val = self.get(BankId::C, 0, words) % &m;
                self.set(BankId::A, 0, words, &val);
            }
            entry::MOD_INVERT => {
                let val = mod_inv(&self.get(BankId::A, 0, words), &m).unwrap_or_default();
                self.set(BankId::C, 0, words, &val);
            }
            entry::MOD_EXP => {
                let base = self.get(BankId::A, 0, words);
                let exp = self.get(BankId::D, 2, words);
                self.set(BankId::A, 0, words, &base.modpow(&exp, &m));
            }
            entry::POINT_MULT => {
                let curve = self.curve(&m, words);
                let k = self.get(BankId::D, 7, words);
                let point = self.get_point(BankId::A, BankId::B, 2, words);
                self.set_point(&curve.mul(&k, &point), words);
            }
            entry::POINT_ADD => {
                let curve = self.curve(&m, words);
                let p = self.get_point(BankId::A, BankId::B, 2, words);
                let q = self.get_point(BankId::A, BankId::B, 3, words);
                self.set_point(&curve.add(&p, &q), words);
            }
            entry::POINT_VERIFY => {
                let curve = self.curve(&m, words);
                let x = self.get(BankId::A, 2, words);
                let y = self.get(BankId::B, 2, words);
                let b = self.get(BankId::A, 7, words);
                let on_curve = x < m && y < m && curve.contains(&x, &y, &b);
                self.flags = if on_curve { Flags::ZERO.bits() } else { 0 };
            }
            _ => return Err(stop_reason::INVALID_OPCODE),
        }
        Ok(())
    }

    fn curve(&self, m: &BigUint, words: usize) -> Curve {
        Curve {
            p: m.clone(),
            a: self.get(BankId::A, 6, words) % m,
        }
    }

    /// `-m^-1 mod 2^32`
    fn mp(m: &BigUint) -> Result<BigUint, u32> {
        let word = BigUint::from(1u64 << 32);
        let inv = mod_inv(m, &word).ok_or(STOP_MONTGOMERY_MISMATCH)?;
        Ok((&word - inv) % &word)
    }
}

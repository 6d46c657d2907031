/*++

Licensed under the Apache-2.0 license.

File Name:

    trng.rs

Abstract:

    File contains the simulated true random number generator.

--*/

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use se_registers::se::trng::*;
use std::collections::VecDeque;

pub struct TrngModel {
    mode: Mode,
    smode: Smode,
    int_status: IntStatus,
    seeded: bool,
    refuse_seed: bool,
    rand: [u32; RAND_WORDS],
    rng: StdRng,
    scripted: VecDeque<u32>,
    generate_count: usize,
}

impl Default for TrngModel {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl TrngModel {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            mode: Mode::empty(),
            smode: Smode::empty(),
            int_status: IntStatus::empty(),
            seeded: false,
            refuse_seed: false,
            rand: [0; RAND_WORDS],
            rng: StdRng::seed_from_u64(seed),
            scripted: VecDeque::new(),
            generate_count: 0,
        }
    }

    /// Words handed out by the next generate commands, ahead of the PRNG
    pub fn script(&mut self, words: &[u32]) {
        self.scripted.extend(words);
    }

    /// Reseed commands complete but never leave the generator seeded
    pub fn refuse_seed(&mut self) {
        self.refuse_seed = true;
    }

    pub fn generate_count(&self) -> usize {
        self.generate_count
    }

    fn status(&self) -> Status {
        let mut status = Status::IDLE;
        status.set(Status::SECURE, self.mode.contains(Mode::SECURE));
        status.set(Status::R256, self.mode.contains(Mode::R256));
        status.set(Status::SEEDED, self.seeded);
        status
    }

    pub fn read(&mut self, addr: u32) -> Option<u32> {
        let val = match addr {
            STATUS => self.status().bits(),
            MODE => self.mode.bits(),
            SMODE => self.smode.bits(),
            INT_STATUS => self.int_status.bits(),
            CMD => 0,
            addr if is_rand_reg(addr) => self.rand[((addr - RAND0) / 4) as usize],
            _ => return None,
        };
        Some(val)
    }

    pub fn write(&mut self, addr: u32, val: u32) -> bool {
        match addr {
            MODE => self.mode = Mode::from_bits_truncate(val),
            SMODE => self.smode = Smode::from_bits_truncate(val),
            INT_STATUS => self.int_status.remove(IntStatus::from_bits_truncate(val)),
            CMD => self.command(val),
            STATUS => {}
            _ => return false,
        }
        true
    }

    fn command(&mut self, cmd: u32) {
        match cmd {
            CMD_RESEED => {
                self.seeded = !self.refuse_seed;
                self.int_status.insert(IntStatus::RESEED_DONE);
            }
            CMD_GEN_RANDOM if self.seeded => {
                for word in self.rand.iter_mut() {
                    *word = match self.scripted.pop_front() {
                        Some(word) => word,
                        None => self.rng.next_u32(),
                    };
                }
                self.generate_count += 1;
                self.int_status.insert(IntStatus::RAND_READY);
            }
            _ => {}
        }
    }
}

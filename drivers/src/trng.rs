/*++

Licensed under the Apache-2.0 license.

File Name:

    trng.rs

Abstract:

    File contains the API for the security engine's true random number
    generator.

--*/

use crate::mutex::PkaMutex;
use crate::secure_bus::SecureBus;
use crate::{cprintln, wait};
use se_error::{SeError, SeResult};
use se_registers::se::trng::*;
use se_registers::Csb;
use zeroize::Zeroize;

/// Source of random words for nonce generation
pub trait EntropySource<C: Csb> {
    /// Fill `out` with random words
    fn fill(&mut self, bus: &mut SecureBus<C>, out: &mut [u32]) -> SeResult<()>;
}

/// TRNG driver
#[derive(Default)]
pub struct Trng {
    /// Destination of the throwaway fetch that retires each request's state
    scratch: [u32; RAND_WORDS],
}

impl Trng {
    pub const fn new() -> Self {
        Self {
            scratch: [0; RAND_WORDS],
        }
    }

    /// Put the generator in secure, auto-seeded 256-bit mode. A no-op when it
    /// is already configured.
    pub fn enable<C: Csb>(&mut self, bus: &mut SecureBus<C>) -> SeResult<()> {
        PkaMutex::with_mutex(bus, Self::enable_locked)
    }

    /// Fill `out` with random words
    ///
    /// Words are produced in chunks of [`RAND_WORDS`]. One extra chunk is
    /// generated and discarded after the request so the last words handed
    /// out cannot be read back from the generator.
    ///
    /// # Arguments
    ///
    /// * `bus` - Secure bus transport
    /// * `out` - Destination, must not be empty
    pub fn fetch_random<C: Csb>(&mut self, bus: &mut SecureBus<C>, out: &mut [u32]) -> SeResult<()> {
        if out.is_empty() {
            return Err(SeError::DRIVER_TRNG_INVALID_LEN);
        }
        let scratch = &mut self.scratch;
        PkaMutex::with_mutex(bus, |bus| {
            Self::enable_locked(bus)?;
            for chunk in out.chunks_mut(RAND_WORDS) {
                Self::generate(bus, chunk)?;
            }
            let result = Self::generate(bus, scratch);
            scratch.zeroize();
            result
        })
    }

    /// Scratch buffer used for the throwaway fetch; zero between requests
    pub fn scratch(&self) -> &[u32] {
        &self.scratch
    }

    fn enable_locked<C: Csb>(bus: &mut SecureBus<C>) -> SeResult<()> {
        let ready = Status::SECURE | Status::SEEDED | Status::R256 | Status::IDLE;

        let status = Status::from_bits_truncate(bus.read(STATUS)?);
        let smode = Smode::from_bits_truncate(bus.read(SMODE)?);
        if status.contains(ready) && smode.contains(Smode::AUTOSEED) {
            return Ok(());
        }

        bus.write(MODE, (Mode::SECURE | Mode::R256).bits())?;
        bus.write(SMODE, Smode::AUTOSEED.bits())?;
        bus.write(INT_STATUS, IntStatus::all().bits())?;
        bus.write(CMD, CMD_RESEED)?;
        wait::until(|| {
            Ok(IntStatus::from_bits_truncate(bus.read(INT_STATUS)?).contains(IntStatus::RESEED_DONE))
        })?;
        bus.write(INT_STATUS, IntStatus::RESEED_DONE.bits())?;

        let status = Status::from_bits_truncate(bus.read(STATUS)?);
        if !status.contains(ready) {
            cprintln!("[trng] not ready after enable, status 0x{:08x}", status.bits());
            return Err(SeError::DRIVER_TRNG_NOT_READY);
        }
        Ok(())
    }

    fn generate<C: Csb>(bus: &mut SecureBus<C>, out: &mut [u32]) -> SeResult<()> {
        bus.write(INT_STATUS, IntStatus::all().bits())?;
        bus.write(CMD, CMD_GEN_RANDOM)?;
        wait::until(|| {
            Ok(IntStatus::from_bits_truncate(bus.read(INT_STATUS)?).contains(IntStatus::RAND_READY))
        })?;
        for (idx, word) in out.iter_mut().take(RAND_WORDS).enumerate() {
            *word = bus.read(rand_reg(idx))?;
        }
        Ok(())
    }
}

impl<C: Csb> EntropySource<C> for Trng {
    fn fill(&mut self, bus: &mut SecureBus<C>, out: &mut [u32]) -> SeResult<()> {
        self.fetch_random(bus, out)
    }
}

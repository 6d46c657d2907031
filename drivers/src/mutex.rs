/*++

Licensed under the Apache-2.0 license.

File Name:

    mutex.rs

Abstract:

    File contains the arbitration protocol guarding the PKA and TRNG
    engines, which are shared with other processors.

--*/

use crate::secure_bus::SecureBus;
use crate::security_context::ProcessorId;
use crate::{cprintln, timer};
use se_error::{first_error, SeError, SeResult};
use se_registers::se::mutex::*;
use se_registers::Csb;

/// Whether a previously granted lease is still in force
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseState {
    Held,

    /// Released by us, by another party or by the hardware watchdog
    Released,
}

/// Proof that the engine mutex was granted to this processor
#[must_use]
#[derive(Debug)]
pub struct MutexLease {
    owner: ProcessorId,
}

impl MutexLease {
    pub fn owner(&self) -> ProcessorId {
        self.owner
    }
}

/// PKA engine mutex
pub enum PkaMutex {}

impl PkaMutex {
    /// Acquire the engine mutex
    ///
    /// Halts the processor through the context's halt hook if the watchdog
    /// timeout register no longer holds its reset value.
    ///
    /// # Arguments
    ///
    /// * `bus` - Secure bus transport
    /// * `timeout_us` - Give up after this many microseconds
    ///
    /// # Returns
    ///
    /// * `MutexLease` - Lease on the mutex
    pub fn acquire<C: Csb>(bus: &mut SecureBus<C>, timeout_us: u32) -> SeResult<MutexLease> {
        let ctx = *bus.context();

        if bus.read(MUTEX_WATCHDOG_TMOUT)? != MUTEX_WATCHDOG_TMOUT_DEFAULT {
            cprintln!("[se-mutex] watchdog timeout register tampered");
            ctx.halt();
        }

        let start = timer::now_ns(bus)?;
        while bus.read(MUTEX)? != MUTEX_ACQUIRED {
            if timer::elapsed_us(start, timer::now_ns(bus)?) >= u64::from(timeout_us) {
                cprintln!("[se-mutex] acquire timed out after {} us", timeout_us);
                return Err(SeError::DRIVER_MUTEX_ACQUIRE_TIMEOUT);
            }
        }

        let action = TmoutAction::INTERRUPT | TmoutAction::RELEASE_MUTEX | TmoutAction::RESET_PKA;
        bus.write(MUTEX_TMOUT_ACTION, action.bits())?;

        let owner = owner(bus.read(MUTEX_STATUS)?);
        if owner != ctx.processor.0 {
            cprintln!("[se-mutex] granted but owned by {}", owner);
            return Err(SeError::DRIVER_MUTEX_ACQUIRE_TIMEOUT);
        }

        Ok(MutexLease {
            owner: ctx.processor,
        })
    }

    /// Release the engine mutex. The release request is always issued, even
    /// if no lease is held.
    pub fn release<C: Csb>(bus: &mut SecureBus<C>) -> SeResult<()> {
        let me = bus.context().processor;
        bus.write(MUTEX_RELEASE, MUTEX_RELEASE_REQUEST)?;
        if owner(bus.read(MUTEX_STATUS)?) == me.0 {
            cprintln!("[se-mutex] release failed");
            return Err(SeError::DRIVER_MUTEX_RELEASE_FAILED);
        }
        Ok(())
    }

    /// Check whether `lease` is still in force. A watchdog release is
    /// reported as [`LeaseState::Released`].
    pub fn observe<C: Csb>(bus: &mut SecureBus<C>, lease: &MutexLease) -> SeResult<LeaseState> {
        let status = bus.read(MUTEX_STATUS)?;
        if status & MUTEX_STATUS_WATCHDOG_RELEASED != 0 || owner(status) != lease.owner.0 {
            Ok(LeaseState::Released)
        } else {
            Ok(LeaseState::Held)
        }
    }

    /// Run `f` while holding the engine mutex
    ///
    /// `f` runs only if the acquire succeeded; the release always runs. The
    /// first failure wins.
    pub fn with_mutex<C, T, F>(bus: &mut SecureBus<C>, f: F) -> SeResult<T>
    where
        C: Csb,
        F: FnOnce(&mut SecureBus<C>) -> SeResult<T>,
    {
        let timeout_us = bus.context().mutex_timeout_us;
        let result = Self::acquire(bus, timeout_us).and_then(|_lease| f(bus));
        first_error(result, Self::release(bus))
    }
}

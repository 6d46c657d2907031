// Licensed under the Apache-2.0 license

use crate::secure_bus::SecureBus;
use se_error::SeResult;
use se_registers::se::timer::{PTIMER_TIME_0, PTIMER_TIME_1};
use se_registers::Csb;

/// Current value of the free-running 64-bit nanosecond counter
///
/// The high word is sampled before and after the low word; the pair is
/// re-read if the low word carried into the high word in between.
pub fn now_ns<C: Csb>(bus: &mut SecureBus<C>) -> SeResult<u64> {
    loop {
        let hi = bus.read(PTIMER_TIME_1)?;
        let lo = bus.read(PTIMER_TIME_0)?;
        if bus.read(PTIMER_TIME_1)? == hi {
            return Ok((u64::from(hi) << 32) | u64::from(lo));
        }
    }
}

/// Microseconds between two samples of [`now_ns`]
pub fn elapsed_us(start_ns: u64, now_ns: u64) -> u64 {
    now_ns.wrapping_sub(start_ns) / 1000
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    mutex_tests.rs

Abstract:

    File contains test cases for the engine mutex.

--*/

mod harness;

use harness::{bus, ctx, model};
use se_drivers::{LeaseState, PkaMutex, ProcessorId, SecureBus, SeError, SeResult};
use se_emu::TIMER_TICK_NS;
use se_registers::se::mutex::{
    TmoutAction, MUTEX_OWNER_NONE, MUTEX_STATUS, MUTEX_WATCHDOG_TMOUT,
};

const RELEASE_REQUEST: &str = "se_write(0x00010004, 0x00000001)";

#[test]
fn test_acquire_release() {
    let mut model = model();
    {
        let mut bus = bus(&mut model);
        let lease = PkaMutex::acquire(&mut bus, 1000).unwrap();
        assert_eq!(lease.owner(), ctx().processor);
        assert_eq!(PkaMutex::observe(&mut bus, &lease), Ok(LeaseState::Held));
    }
    assert_eq!(model.mutex.owner(), ctx().processor.0);
    assert_eq!(
        model.mutex.tmout_action(),
        TmoutAction::INTERRUPT | TmoutAction::RELEASE_MUTEX | TmoutAction::RESET_PKA
    );

    PkaMutex::release(&mut bus(&mut model)).unwrap();
    assert_eq!(model.mutex.owner(), MUTEX_OWNER_NONE);
}

#[test]
fn test_second_acquire_times_out() {
    let mut model = model();
    let mut bus = bus(&mut model);
    let _lease = PkaMutex::acquire(&mut bus, 1000).unwrap();
    assert_eq!(
        PkaMutex::acquire(&mut bus, 1000).map(|_| ()),
        Err(SeError::DRIVER_MUTEX_ACQUIRE_TIMEOUT)
    );
}

#[test]
fn test_timeout_is_measured_on_ptimer() {
    let mut model = model();
    model.mutex.lock_as(2);
    let start = model.time_ns();
    assert_eq!(
        PkaMutex::acquire(&mut bus(&mut model), 250).map(|_| ()),
        Err(SeError::DRIVER_MUTEX_ACQUIRE_TIMEOUT)
    );
    let waited_us = (model.time_ns() - start) / TIMER_TICK_NS;
    assert!((250..=252).contains(&waited_us), "waited {waited_us} us");
    assert_eq!(model.mutex.owner(), 2);
}

#[test]
fn test_timeout_beyond_low_word_range() {
    let mut model = model();
    model.mutex.lock_as(ProcessorId::GSP.0);
    model.set_timer_tick_ns(1_000_000);
    let start = model.time_ns();
    assert_eq!(
        PkaMutex::acquire(&mut bus(&mut model), 5_000_000).map(|_| ()),
        Err(SeError::DRIVER_MUTEX_ACQUIRE_TIMEOUT)
    );
    let waited_ms = (model.time_ns() - start) / 1_000_000;
    assert!((5000..=5002).contains(&waited_ms), "waited {waited_ms} ms");
    assert_eq!(model.mutex.owner(), ProcessorId::GSP.0);
}

#[test]
fn test_granted_to_foreign_owner() {
    let mut model = model();
    model.script_reads(MUTEX_STATUS, &[ProcessorId::GSP.0 as u32]);
    let mut ran = false;
    let result = PkaMutex::with_mutex(&mut bus(&mut model), |_| {
        ran = true;
        Ok(())
    });
    assert_eq!(result, Err(SeError::DRIVER_MUTEX_ACQUIRE_TIMEOUT));
    assert!(!ran);
    assert_eq!(model.log.count(RELEASE_REQUEST), 1);
    assert_eq!(model.mutex.owner(), MUTEX_OWNER_NONE);
}

#[test]
fn test_release_failure_reported() {
    let mut model = model();
    model.mutex.stick();
    let mut bus = bus(&mut model);
    let _lease = PkaMutex::acquire(&mut bus, 1000).unwrap();
    assert_eq!(
        PkaMutex::release(&mut bus),
        Err(SeError::DRIVER_MUTEX_RELEASE_FAILED)
    );
}

#[test]
fn test_release_of_foreign_lock_is_harmless() {
    let mut model = model();
    model.mutex.lock_as(2);
    assert_eq!(PkaMutex::release(&mut bus(&mut model)), Ok(()));
    assert_eq!(model.mutex.owner(), 2);
}

#[test]
fn test_watchdog_release_observed() {
    let mut model = model();
    let lease = PkaMutex::acquire(&mut bus(&mut model), 1000).unwrap();

    model.fire_mutex_watchdog();
    assert_eq!(
        PkaMutex::observe(&mut bus(&mut model), &lease),
        Ok(LeaseState::Released)
    );

    let mut bus = bus(&mut model);
    let lease = PkaMutex::acquire(&mut bus, 1000).unwrap();
    assert_eq!(PkaMutex::observe(&mut bus, &lease), Ok(LeaseState::Held));
}

#[test]
fn test_with_mutex_always_releases() {
    let mut model = model();
    let result: SeResult<()> =
        PkaMutex::with_mutex(&mut bus(&mut model), |_| Err(SeError::DRIVER_PKA_WATCHDOG));
    assert_eq!(result, Err(SeError::DRIVER_PKA_WATCHDOG));
    assert_eq!(model.mutex.owner(), MUTEX_OWNER_NONE);
}

#[test]
fn test_with_mutex_skips_body_without_lock() {
    let mut model = model();
    model.mutex.lock_as(2);
    let mut ran = false;
    let result = PkaMutex::with_mutex(&mut bus(&mut model), |_| {
        ran = true;
        Ok(())
    });
    assert_eq!(result, Err(SeError::DRIVER_MUTEX_ACQUIRE_TIMEOUT));
    assert!(!ran);
    assert_eq!(model.mutex.owner(), 2);
}

#[test]
fn test_with_mutex_reports_release_failure() {
    let mut model = model();
    model.mutex.stick();
    let result = PkaMutex::with_mutex(&mut bus(&mut model), |_| Ok(5));
    assert_eq!(result, Err(SeError::DRIVER_MUTEX_RELEASE_FAILED));
}

fn halt_for_test() -> ! {
    panic!("halted on tamper");
}

#[test]
#[should_panic(expected = "halted on tamper")]
fn test_tampered_watchdog_halts() {
    let mut model = model();
    model.poke(MUTEX_WATCHDOG_TMOUT, 0x10);
    let mut bus = SecureBus::new(&mut model, ctx().with_halt(halt_for_test));
    let _ = PkaMutex::acquire(&mut bus, 1000);
}

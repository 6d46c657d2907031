/*++

Licensed under the Apache-2.0 license.

File Name:

    secure_bus_tests.rs

Abstract:

    File contains test cases for the secure bus doorbell transport.

--*/

mod harness;

use harness::{bus, model};
use se_drivers::{PrivLevel, SecureBus, SecurityContext, SeError};
use se_registers::csb::{DoorbellCtrl, DoorbellRegs};
use se_registers::se::{mutex::MUTEX_STATUS, pka::BANK_START_A, timer, trng};

#[test]
fn test_write_then_read() {
    let mut model = model();
    let mut bus = bus(&mut model);
    bus.write(BANK_START_A + 8, 0x1234_5678).unwrap();
    assert_eq!(bus.read(BANK_START_A + 8), Ok(0x1234_5678));
    assert_eq!(model.log.count("se_write(0x00028008, 0x12345678)"), 1);
}

#[test]
fn test_light_secure_uses_its_own_doorbell() {
    let mut model = model();
    model.fail_csb_read(DoorbellRegs::HEAVY.ctrl);
    let ctx = SecurityContext::new(PrivLevel::Light, harness::ctx().processor);
    let mut bus = SecureBus::new(&mut model, ctx);
    assert_eq!(bus.read(MUTEX_STATUS), Ok(0));
}

#[test]
fn test_sentinel_on_ordinary_register() {
    let mut model = model();
    model.script_reads(MUTEX_STATUS, &[0xbadf_0042]);
    assert_eq!(
        bus(&mut model).read(MUTEX_STATUS),
        Err(SeError::DRIVER_SECURE_BUS_BADF_VALUE)
    );
}

#[test]
fn test_sentinel_on_timer_low_word_accepted() {
    let mut model = model();
    model.script_reads(timer::PTIMER_TIME_0, &[0xbadf_1234]);
    assert_eq!(bus(&mut model).read(timer::PTIMER_TIME_0), Ok(0xbadf_1234));
}

#[test]
fn test_sentinel_on_timer_high_word_stuck() {
    let mut model = model();
    model.script_reads(timer::PTIMER_TIME_1, &[0xbadf_0000; 4]);
    assert_eq!(
        bus(&mut model).read(timer::PTIMER_TIME_1),
        Err(SeError::DRIVER_SECURE_BUS_BADF_TIMER_STUCK)
    );
    assert_eq!(model.log.count("se_read(0x00009410)"), 4);
}

#[test]
fn test_sentinel_on_timer_high_word_live() {
    let mut model = model();
    model.script_reads(timer::PTIMER_TIME_1, &[0xbadf_0000, 0xbadf_0000, 0xbadf_0001]);
    assert_eq!(bus(&mut model).read(timer::PTIMER_TIME_1), Ok(0xbadf_0000));
}

#[test]
fn test_sentinel_on_random_output_accepted() {
    let mut model = model();
    model.script_reads(trng::rand_reg(3), &[0xbadf_beef]);
    assert_eq!(bus(&mut model).read(trng::rand_reg(3)), Ok(0xbadf_beef));
}

#[test]
fn test_doorbell_error_bits() {
    let mut model = model();
    model.inject_bus_error(BANK_START_A, DoorbellCtrl::RDERR);
    model.inject_bus_error(BANK_START_A + 4, DoorbellCtrl::WRERR);
    model.inject_bus_error(BANK_START_A + 8, DoorbellCtrl::PROTERR | DoorbellCtrl::RDERR);
    let mut bus = bus(&mut model);
    assert_eq!(
        bus.read(BANK_START_A),
        Err(SeError::DRIVER_SECURE_BUS_READ_ERROR)
    );
    assert_eq!(
        bus.write(BANK_START_A + 4, 1),
        Err(SeError::DRIVER_SECURE_BUS_WRITE_ERROR)
    );
    assert_eq!(
        bus.read(BANK_START_A + 8),
        Err(SeError::DRIVER_SECURE_BUS_PROTOCOL_ERROR)
    );
    // Errors belong to the transaction that raised them.
    assert_eq!(bus.read(BANK_START_A + 12), Ok(0));
}

#[test]
fn test_write_is_not_retried() {
    let mut model = model();
    model.inject_bus_error(BANK_START_A, DoorbellCtrl::WRERR);
    assert!(bus(&mut model).write(BANK_START_A, 7).is_err());
    assert_eq!(model.log.count("se_write(0x00028000"), 1);
}

#[test]
fn test_csb_faults() {
    let mut model = model();
    model.fail_csb_read(DoorbellRegs::HEAVY.ctrl);
    assert_eq!(
        bus(&mut model).read(MUTEX_STATUS),
        Err(SeError::DRIVER_CSB_PRIV_READ_ERROR)
    );

    let mut model = harness::model();
    model.fail_csb_write(DoorbellRegs::HEAVY.cmd);
    assert_eq!(
        bus(&mut model).write(BANK_START_A, 1),
        Err(SeError::DRIVER_CSB_PRIV_WRITE_ERROR)
    );
}

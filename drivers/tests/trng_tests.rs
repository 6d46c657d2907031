/*++

Licensed under the Apache-2.0 license.

File Name:

    trng_tests.rs

Abstract:

    File contains test cases for the TRNG API.

--*/

mod harness;

use harness::{bus, model};
use se_drivers::{SeError, Trng};
use se_registers::se::mutex::MUTEX_OWNER_NONE;

const MODE_WRITE: &str = "se_write(0x00030008";
const GENERATE: &str = "se_write(0x00030004, 0x00000001)";

#[test]
fn test_fetch_random_chunks_and_discard() {
    for (len, generates) in [(1usize, 2usize), (8, 2), (9, 3), (20, 4)] {
        let mut model = model();
        let script: Vec<u32> = (1..=64).collect();
        model.trng.script(&script);
        let mut trng = Trng::new();
        let mut out = vec![0u32; len];
        trng.fetch_random(&mut bus(&mut model), &mut out).unwrap();

        assert_eq!(model.trng.generate_count(), generates, "len {len}");
        assert!(trng.scratch().iter().all(|w| *w == 0));
        assert_eq!(model.mutex.owner(), MUTEX_OWNER_NONE);
        assert_eq!(out, (1..=len as u32).collect::<Vec<u32>>());
    }
}

#[test]
fn test_partial_chunk_skips_rest_of_output() {
    let mut model = model();
    model.trng.script(&(1..=24).collect::<Vec<u32>>());
    let mut trng = Trng::new();
    let mut first = [0u32; 3];
    let mut second = [0u32; 3];
    trng.fetch_random(&mut bus(&mut model), &mut first).unwrap();
    trng.fetch_random(&mut bus(&mut model), &mut second).unwrap();
    assert_eq!(first, [1, 2, 3]);
    // Words 9..16 went to the discarded fetch.
    assert_eq!(second, [17, 18, 19]);
}

#[test]
fn test_enable_is_idempotent() {
    let mut model = model();
    let mut trng = Trng::new();
    trng.enable(&mut bus(&mut model)).unwrap();
    assert_eq!(model.log.count(MODE_WRITE), 1);

    model.log.take();
    trng.enable(&mut bus(&mut model)).unwrap();
    let mut out = [0u32; 4];
    trng.fetch_random(&mut bus(&mut model), &mut out).unwrap();
    assert_eq!(model.log.count(MODE_WRITE), 0);
    assert_eq!(model.log.count("se_write(0x00030004, 0x00000002)"), 0);
    assert_eq!(model.log.count(GENERATE), 2);
}

#[test]
fn test_not_ready_after_enable() {
    let mut model = model();
    model.trng.refuse_seed();
    let mut trng = Trng::new();
    assert_eq!(
        trng.enable(&mut bus(&mut model)),
        Err(SeError::DRIVER_TRNG_NOT_READY)
    );
    let mut out = [0u32; 8];
    assert_eq!(
        trng.fetch_random(&mut bus(&mut model), &mut out),
        Err(SeError::DRIVER_TRNG_NOT_READY)
    );
    assert_eq!(model.trng.generate_count(), 0);
    assert_eq!(model.mutex.owner(), MUTEX_OWNER_NONE);
}

#[test]
fn test_empty_request_rejected() {
    let mut model = model();
    let mut trng = Trng::new();
    assert_eq!(
        trng.fetch_random(&mut bus(&mut model), &mut []),
        Err(SeError::DRIVER_TRNG_INVALID_LEN)
    );
    assert_eq!(model.log.count("se_"), 0);
}

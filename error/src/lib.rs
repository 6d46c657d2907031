/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the status codes reported by the security engine drivers
    and the secure action dispatcher.

--*/
#![cfg_attr(not(any(test, feature = "std")), no_std)]
use core::convert::From;
use core::num::{NonZeroU32, TryFromIntError};

/// Security Engine Error Type
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SeError(pub NonZeroU32);

/// Macro to define error constants ensuring uniqueness
///
/// This macro takes a list of (name, value, doc) tuples and generates
/// constant definitions for each error code.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: SeError = SeError::new_const($value);
        )*

        #[cfg(test)]
        /// Returns a vector of all defined error constants for testing uniqueness
        pub fn all_constants() -> Vec<(&'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl SeError {
    /// Create an error; intended to only be used from const contexts, as we
    /// don't want runtime panics if val is zero. The preferred way to get an
    /// SeError from a u32 is `SeError::try_from()`.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("SeError cannot be 0"),
        }
    }

    define_error_constants![
        // Transport
        (
            DRIVER_CSB_PRIV_READ_ERROR,
            0x0001_0001,
            "Transport Error: CSB priv read of a doorbell register faulted"
        ),
        (
            DRIVER_CSB_PRIV_WRITE_ERROR,
            0x0001_0002,
            "Transport Error: CSB priv write of a doorbell register faulted"
        ),
        (
            DRIVER_SECURE_BUS_READ_ERROR,
            0x0001_0003,
            "Transport Error: secure bus reported a read error"
        ),
        (
            DRIVER_SECURE_BUS_WRITE_ERROR,
            0x0001_0004,
            "Transport Error: secure bus reported a write error"
        ),
        (
            DRIVER_SECURE_BUS_PROTOCOL_ERROR,
            0x0001_0005,
            "Transport Error: secure bus reported a protocol error"
        ),
        (
            DRIVER_SECURE_BUS_BADF_VALUE,
            0x0001_0006,
            "Transport Error: register read returned the 0xBADF sentinel"
        ),
        (
            DRIVER_SECURE_BUS_BADF_TIMER_STUCK,
            0x0001_0007,
            "Transport Error: PTIMER high word stuck at the 0xBADF sentinel"
        ),
        // Arbitration
        (
            DRIVER_MUTEX_ACQUIRE_TIMEOUT,
            0x0002_0001,
            "Mutex Error: acquire timed out or lock owner mismatch"
        ),
        (
            DRIVER_MUTEX_RELEASE_FAILED,
            0x0002_0002,
            "Mutex Error: lock still held by this processor after release"
        ),
        // Validation
        (
            DRIVER_PKA_INVALID_KEY_SIZE,
            0x0003_0001,
            "Validation Error: key size does not map to a radix class"
        ),
        (
            DRIVER_PKA_INVALID_OPERAND_LEN,
            0x0003_0002,
            "Validation Error: operand does not fit the configured radix"
        ),
        (
            DRIVER_TRNG_INVALID_LEN,
            0x0003_0003,
            "Validation Error: random output buffer is empty"
        ),
        // Arithmetic and protocol
        (
            DRIVER_ECC_POINT_NOT_ON_CURVE,
            0x0004_0001,
            "ECC Error: point is not on the curve"
        ),
        (
            DRIVER_ECDSA_RETRIES_EXHAUSTED,
            0x0004_0002,
            "ECC Error: ECDSA signing exhausted its retry budget"
        ),
        (
            DRIVER_RSA_UNSUPPORTED_KEY_SIZE,
            0x0004_0003,
            "RSA Error: only 1024 and 3072 bit keys are supported"
        ),
        (
            DRIVER_RSA_INVALID_BUFFER,
            0x0004_0004,
            "RSA Error: operand or output buffer does not match the key size"
        ),
        (
            DRIVER_PKA_INVALID_OPCODE,
            0x0004_0010,
            "PKA Error: microprogram hit an invalid opcode"
        ),
        (
            DRIVER_PKA_F_STACK_UNDERFLOW,
            0x0004_0011,
            "PKA Error: function stack underflow"
        ),
        (
            DRIVER_PKA_F_STACK_OVERFLOW,
            0x0004_0012,
            "PKA Error: function stack overflow"
        ),
        (
            DRIVER_PKA_WATCHDOG,
            0x0004_0013,
            "PKA Error: engine watchdog fired"
        ),
        (
            DRIVER_PKA_HOST_REQUEST,
            0x0004_0014,
            "PKA Error: microprogram stopped on host request"
        ),
        (
            DRIVER_PKA_P_STACK_UNDERFLOW,
            0x0004_0015,
            "PKA Error: parameter stack underflow"
        ),
        (
            DRIVER_PKA_P_STACK_OVERFLOW,
            0x0004_0016,
            "PKA Error: parameter stack overflow"
        ),
        (
            DRIVER_PKA_MEMORY_PORT_COLLISION,
            0x0004_0017,
            "PKA Error: operand memory port collision"
        ),
        (
            DRIVER_PKA_OPERATION_SIZE_EXCEEDED,
            0x0004_0018,
            "PKA Error: operation size exceeds the configured radix"
        ),
        (
            DRIVER_PKA_UNKNOWN_ERROR,
            0x0004_0019,
            "PKA Error: unknown stop reason"
        ),
        // TRNG
        (
            DRIVER_TRNG_NOT_READY,
            0x0005_0001,
            "TRNG Error: generator not secure, seeded and idle after enable"
        ),
        // Secure action
        (
            SECURE_ACTION_INVALID_ACTION,
            0x0006_0001,
            "Secure Action Error: unknown action type"
        ),
        (
            SECURE_ACTION_ARG_CHECK_FAILED,
            0x0006_0002,
            "Secure Action Error: non-zero byte outside the selected payload member"
        ),
        (
            SECURE_ACTION_NOT_PRIVILEGED,
            0x0006_0003,
            "Secure Action Error: caller did not pass the privileged-mode pre-checks"
        ),
        (
            SECURE_ACTION_LIB_INTEGRITY_FAILED,
            0x0006_0004,
            "Secure Action Error: companion library integrity check failed"
        ),
        (
            SECURE_ACTION_INVALID_REQUEST_SIZE,
            0x0006_0005,
            "Secure Action Error: request buffer has the wrong size"
        ),
        (
            SECURE_ACTION_INVALID_ARGUMENT,
            0x0006_0006,
            "Secure Action Error: length field exceeds its buffer"
        ),
        (
            SECURE_ACTION_STAGE_FAILED,
            0x0006_0007,
            "Secure Action Error: protocol stage handler rejected the request"
        ),
        // Known answer tests
        (
            KAT_PKA_POINT_VERIFY_FAILURE,
            0x0007_0001,
            "KAT Error: generator point failed verification"
        ),
        (
            KAT_PKA_POINT_MULT_FAILURE,
            0x0007_0002,
            "KAT Error: point multiply produced the wrong answer"
        ),
        (
            KAT_PKA_MOD_EXP_FAILURE,
            0x0007_0003,
            "KAT Error: modular exponentiation produced the wrong answer"
        ),
    ];
}

impl From<core::num::NonZeroU32> for crate::SeError {
    fn from(val: core::num::NonZeroU32) -> Self {
        crate::SeError(val)
    }
}

impl From<SeError> for core::num::NonZeroU32 {
    fn from(val: SeError) -> Self {
        val.0
    }
}

impl From<SeError> for u32 {
    fn from(val: SeError) -> Self {
        core::num::NonZeroU32::from(val).get()
    }
}

impl TryFrom<u32> for SeError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        match NonZeroU32::try_from(val) {
            Ok(val) => Ok(SeError(val)),
            Err(err) => Err(err),
        }
    }
}

pub type SeResult<T> = Result<T, SeError>;

/// Combines the outcome of an operation with the outcome of the cleanup that
/// followed it. The operation's failure is preserved; a cleanup failure is
/// only reported when the operation itself succeeded.
pub fn first_error<T>(primary: SeResult<T>, cleanup: SeResult<()>) -> SeResult<T> {
    match (primary, cleanup) {
        (Err(err), _) => Err(err),
        (Ok(_), Err(err)) => Err(err),
        (Ok(val), Ok(())) => Ok(val),
    }
}

/// Status word handed back across the privilege boundary; zero is success.
pub fn status_code<T>(result: &SeResult<T>) -> u32 {
    match result {
        Ok(_) => 0,
        Err(err) => u32::from(*err),
    }
}

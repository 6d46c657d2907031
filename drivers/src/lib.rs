/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the security engine driver library.

--*/

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod printer;

mod array;
mod ecc;
mod mutex;
mod pka;
mod radix;
mod rsa;
mod secure_bus;
mod security_context;
mod timer;
mod trng;
mod wait;

pub use array::{be_bytes_to_le_words, is_zero, le_words_to_be_bytes};
pub use ecc::{CurveParams, EcPoint, EcSignature, ECC_MAX_WORDS};
pub use mutex::{LeaseState, MutexLease, PkaMutex};
pub use pka::{slot, Pka, Program};
pub use radix::{
    configure_radix, Bank, OperandBankRef, RadixClass, RadixConfig, SUPPORTED_KEY_SIZES,
};
pub use rsa::{RSA_KEY_SIZES, RSA_MAX_KEY_BYTES};
pub use se_error::{first_error, status_code, SeError, SeResult};
pub use se_registers::Csb;
pub use secure_bus::SecureBus;
pub use security_context::{
    halt_forever, PrivLevel, ProcessorId, SecurityContext, DEFAULT_MUTEX_TIMEOUT_US,
};
pub use timer::{elapsed_us, now_ns};
pub use trng::{EntropySource, Trng};

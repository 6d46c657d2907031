/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the security engine Known Answer Tests.

--*/

#![no_std]

mod p256;
mod pka_kat;

pub use p256::P256;
pub use pka_kat::PkaKat;

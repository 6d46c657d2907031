/*++

Licensed under the Apache-2.0 license.

File Name:

    abi.rs

Abstract:

    File contains the secure action wire format exchanged across the
    privilege boundary.

--*/

use core::mem::size_of;
use se_drivers::{SeError, SeResult};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
use zeroize::Zeroize;

pub const HASH_INPUT_MAX: usize = 128;
pub const HASH_DIGEST_SIZE: usize = 32;
pub const KEY_MAX: usize = 32;
pub const DERIVE_SECRET_SIZE: usize = 32;
pub const DERIVE_LABEL_MAX: usize = 64;
pub const RTX_SIZE: usize = 8;
pub const EKPUB_KM_SIZE: usize = 128;
pub const PRIME_SIZE: usize = 32;
pub const EKS_SIZE: usize = 16;
pub const RIV_SIZE: usize = 8;
pub const SRM_MAX: usize = 160;

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RegisterAccessArgs {
    /// Non-zero for a read
    pub is_read: u32,
    pub addr: u32,

    /// Value to write, or the value read
    pub val: u32,
}

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct HashComputeArgs {
    pub input_len: u32,
    pub input: [u8; HASH_INPUT_MAX],
    pub digest: [u8; HASH_DIGEST_SIZE],
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Zeroize)]
pub struct GenerateKeyArgs {
    pub key_len: u32,
    pub key: [u8; KEY_MAX],
}

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Zeroize)]
pub struct DeriveKeyArgs {
    pub secret: [u8; DERIVE_SECRET_SIZE],
    pub label_len: u32,
    pub label: [u8; DERIVE_LABEL_MAX],
    pub key: [u8; KEY_MAX],
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct StartSessionArgs {
    pub session_id: u32,

    /// Transmitter random, filled in by the stage handler
    pub rtx: [u8; RTX_SIZE],
}

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct GenerateKmKdArgs {
    pub session_id: u32,

    /// Master key encrypted with the receiver's public key
    pub ekpub_km: [u8; EKPUB_KM_SIZE],
}

/// Shared by the H', L' and M' validation stages
#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct PrimeArgs {
    pub session_id: u32,
    pub prime: [u8; PRIME_SIZE],
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct SessionKeyArgs {
    pub session_id: u32,
    pub eks: [u8; EKS_SIZE],
    pub riv: [u8; RIV_SIZE],
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct ControlEncryptionArgs {
    pub session_id: u32,
    pub enable: u32,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct VprimeArgs {
    pub session_id: u32,
    pub device_count: u32,
    pub vprime: [u8; PRIME_SIZE],
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct EndSessionArgs {
    pub session_id: u32,
}

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct SrmRevocationArgs {
    pub srm_len: u32,
    pub srm: [u8; SRM_MAX],
}

const fn max(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}

/// Size of the payload union: the largest argument structure
pub const PAYLOAD_SIZE: usize = max(
    max(
        max(size_of::<HashComputeArgs>(), size_of::<SrmRevocationArgs>()),
        max(size_of::<DeriveKeyArgs>(), size_of::<GenerateKmKdArgs>()),
    ),
    max(size_of::<VprimeArgs>(), size_of::<RegisterAccessArgs>()),
);

/// Offset of the payload union in a request
pub const PAYLOAD_OFFSET: usize = size_of::<u32>();

/// Size of a secure action request: tag plus payload union
pub const REQUEST_SIZE: usize = PAYLOAD_OFFSET + PAYLOAD_SIZE;

/// Copy an argument structure out of the payload
pub(crate) fn read_args<T: FromBytes>(payload: &[u8]) -> SeResult<T> {
    payload
        .get(..size_of::<T>())
        .and_then(|bytes| T::read_from_bytes(bytes).ok())
        .ok_or(SeError::SECURE_ACTION_INVALID_REQUEST_SIZE)
}

/// Copy an argument structure back into the payload
pub(crate) fn write_args<T: IntoBytes + Immutable>(payload: &mut [u8], args: &T) -> SeResult<()> {
    let bytes = args.as_bytes();
    payload
        .get_mut(..bytes.len())
        .ok_or(SeError::SECURE_ACTION_INVALID_REQUEST_SIZE)?
        .copy_from_slice(bytes);
    Ok(())
}

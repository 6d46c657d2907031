/*++

Licensed under the Apache-2.0 license.

File Name:

    integrity.rs

Abstract:

    File contains the companion library integrity checks run before a
    secure action touches its arguments.

--*/

use crate::action::CompanionLib;
use se_drivers::{cprintln, SeError, SeResult};
use sha2::{Digest, Sha256};

pub const LIB_DIGEST_SIZE: usize = 32;

/// Validates the companion libraries an action depends on
pub trait LibraryIntegrity {
    /// Check a single library
    fn validate(&mut self, lib: CompanionLib) -> SeResult<()>;

    /// Check every library in `libs`, stopping at the first failure
    fn validate_all(&mut self, libs: CompanionLib) -> SeResult<()> {
        for lib in libs.iter() {
            self.validate(lib)?;
        }
        Ok(())
    }
}

/// A library image and the digest it was measured with
pub struct MeasuredLibrary<'a> {
    pub lib: CompanionLib,
    pub image: &'a [u8],
    pub expected: [u8; LIB_DIGEST_SIZE],
}

/// Integrity checker comparing the SHA-256 of each library image against
/// its measurement. A library without an entry fails.
pub struct MeasuredLibraries<'a> {
    entries: &'a [MeasuredLibrary<'a>],
}

impl<'a> MeasuredLibraries<'a> {
    pub fn new(entries: &'a [MeasuredLibrary<'a>]) -> Self {
        Self { entries }
    }
}

impl LibraryIntegrity for MeasuredLibraries<'_> {
    fn validate(&mut self, lib: CompanionLib) -> SeResult<()> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.lib == lib)
            .ok_or(SeError::SECURE_ACTION_LIB_INTEGRITY_FAILED)?;

        if Sha256::digest(entry.image).as_slice() != entry.expected.as_slice() {
            cprintln!("[sa] library 0x{:x} failed measurement", lib.bits());
            return Err(SeError::SECURE_ACTION_LIB_INTEGRITY_FAILED);
        }
        Ok(())
    }
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    key.rs

Abstract:

    File contains the key generation and key derivation secure actions.

--*/

use crate::abi::{DeriveKeyArgs, GenerateKeyArgs, KEY_MAX};
use crate::drivers::Drivers;
use hmac::{Hmac, Mac};
use se_drivers::{Csb, SeError, SeResult};
use sha2::Sha256;
use zeroize::Zeroize;

const KEY_WORDS: usize = KEY_MAX / 4;

pub struct GenerateKeyCmd;
impl GenerateKeyCmd {
    /// Fill the first `key_len` bytes of `key` from the TRNG. Remaining
    /// bytes are cleared.
    pub(crate) fn execute<C: Csb>(
        drivers: &mut Drivers<C>,
        args: &mut GenerateKeyArgs,
    ) -> SeResult<()> {
        let len = args.key_len as usize;
        if len == 0 || len > KEY_MAX {
            return Err(SeError::SECURE_ACTION_INVALID_ARGUMENT);
        }

        let mut words = [0u32; KEY_WORDS];
        let count = len.div_ceil(4);
        let result = drivers.trng.fetch_random(&mut drivers.bus, &mut words[..count]);
        if result.is_ok() {
            args.key.fill(0);
            for (dst, word) in args.key[..len]
                .chunks_mut(4)
                .zip(words.iter().map(|w| w.to_le_bytes()))
            {
                dst.copy_from_slice(&word[..dst.len()]);
            }
        }
        words.zeroize();
        result
    }
}

pub struct DeriveKeyCmd;
impl DeriveKeyCmd {
    /// HMAC-SHA256 keyed with `secret` over the first `label_len` bytes of
    /// `label`. The secret is cleared once the key is derived.
    pub(crate) fn execute(args: &mut DeriveKeyArgs) -> SeResult<()> {
        let label = args
            .label
            .get(..args.label_len as usize)
            .ok_or(SeError::SECURE_ACTION_INVALID_ARGUMENT)?;

        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&args.secret)
            .map_err(|_| SeError::SECURE_ACTION_INVALID_ARGUMENT)?;
        mac.update(label);
        args.key.copy_from_slice(&mac.finalize().into_bytes());
        args.secret.zeroize();
        Ok(())
    }
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    rsa.rs

Abstract:

    File contains RSA modular exponentiation on the PKA. Every operand
    and the result are big-endian byte strings of the key size.

--*/

use crate::array::{be_bytes_to_le_words, le_words_to_be_bytes};
use crate::mutex::PkaMutex;
use crate::pka::{montgomery_setup, read_operand, run_program, slot, write_operand, Pka, Program};
use crate::radix::RadixConfig;
use se_error::{SeError, SeResult};
use se_registers::Csb;
use zeroize::Zeroize;

/// Largest supported modulus, in bytes
pub const RSA_MAX_KEY_BYTES: usize = 384;

/// Key sizes the exponentiation path accepts
pub const RSA_KEY_SIZES: [u32; 2] = [1024, 3072];

impl<'a, C: Csb> Pka<'a, C> {
    /// Compute `base^exponent mod modulus`
    ///
    /// # Arguments
    ///
    /// * `key_size` - 1024 or 3072
    /// * `modulus` - Big-endian modulus of `key_size / 8` bytes
    /// * `exponent` - Big-endian exponent of `key_size / 8` bytes
    /// * `base` - Big-endian base of `key_size / 8` bytes
    /// * `out` - Receives the big-endian result in its first `key_size / 8` bytes
    pub fn mod_exp(
        &mut self,
        key_size: u32,
        modulus: &[u8],
        exponent: &[u8],
        base: &[u8],
        out: &mut [u8],
    ) -> SeResult<()> {
        if !RSA_KEY_SIZES.contains(&key_size) {
            return Err(SeError::DRIVER_RSA_UNSUPPORTED_KEY_SIZE);
        }
        let len = (key_size / 8) as usize;
        if modulus.len() != len
            || exponent.len() != len
            || base.len() != len
            || out.len() < len
        {
            return Err(SeError::DRIVER_RSA_INVALID_BUFFER);
        }
        let config = RadixConfig::configure(key_size)?;

        let mut scratch = [0u8; RSA_MAX_KEY_BYTES];
        let mut word_buf = [0u32; RSA_MAX_KEY_BYTES / 4];
        let words = &mut word_buf[..len / 4];

        let result = PkaMutex::with_mutex(self.bus, |bus| {
            be_bytes_to_le_words(modulus, words);
            montgomery_setup(bus, &config, words)?;
            be_bytes_to_le_words(exponent, words);
            write_operand(bus, &config, slot::EXPONENT, words)?;
            be_bytes_to_le_words(base, words);
            write_operand(bus, &config, slot::X, words)?;
            run_program(bus, &config, Program::ModExp)?;
            read_operand(bus, &config, slot::RESULT, words)?;
            le_words_to_be_bytes(words, &mut scratch[..len]);
            out[..len].copy_from_slice(&scratch[..len]);
            Ok(())
        });

        scratch.zeroize();
        word_buf.zeroize();
        result
    }
}

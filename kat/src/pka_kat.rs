/*++

Licensed under the Apache-2.0 license.

File Name:

    pka_kat.rs

Abstract:

    File contains the Known Answer Tests (KAT) for the PKA.

--*/

use crate::P256;
use se_drivers::{Csb, EcPoint, Pka, SeError, SeResult};

/// RFC 6979 A.2.5 private key
const PRIV_KEY: [u32; 8] = [
    0x120f6721, 0x7b8a622b, 0x36e89b12, 0x4e50c3db, 0x67b1d693, 0x6b5c2157, 0x45ba7516, 0xc9afa9d8,
];

const PUB_KEY_X: [u32; 8] = [
    0x60f29fb6, 0xe669622e, 0x3b61fa6c, 0xc049b892, 0xc6356d68, 0xc961eb74, 0x255a9d31, 0x60fed4ba,
];

const PUB_KEY_Y: [u32; 8] = [
    0xd4462299, 0x77a3c294, 0x2d7e9f51, 0xf2f1b20c, 0x5628bc64, 0xa41ae9e9, 0x08b8bc99, 0x7903fe10,
];

const MOD_EXP_KEY_SIZE: u32 = 1024;
const MOD_EXP_BYTES: usize = 128;

#[derive(Default, Debug)]
pub struct PkaKat {}

impl PkaKat {
    /// This function executes the Known Answer Tests (aka KAT) for the PKA.
    ///
    /// Test vector source:
    /// RFC 6979 A.2.5 key pair; 2^10 mod 1001.
    ///
    /// # Arguments
    ///
    /// * `pka` - PKA Driver
    ///
    /// # Returns
    ///
    /// * `SeResult` - Result denoting the KAT outcome.
    pub fn execute<C: Csb>(&self, pka: &mut Pka<C>) -> SeResult<()> {
        self.kat_point_verify(pka)?;
        self.kat_point_mult(pka)?;
        self.kat_mod_exp(pka)
    }

    fn kat_point_verify<C: Csb>(&self, pka: &mut Pka<C>) -> SeResult<()> {
        pka.point_verify(&P256, &P256.generator())
            .map_err(|_| SeError::KAT_PKA_POINT_VERIFY_FAILURE)
    }

    fn kat_point_mult<C: Csb>(&self, pka: &mut Pka<C>) -> SeResult<()> {
        let mut x = [0u32; 8];
        let mut y = [0u32; 8];
        pka.point_mult(
            &P256,
            &PRIV_KEY,
            &P256.generator(),
            Some(&mut x),
            Some(&mut y),
        )
        .map_err(|_| SeError::KAT_PKA_POINT_MULT_FAILURE)?;

        if x != PUB_KEY_X || y != PUB_KEY_Y {
            Err(SeError::KAT_PKA_POINT_MULT_FAILURE)?;
        }
        pka.point_verify(&P256, &EcPoint { x: &x, y: &y })
            .map_err(|_| SeError::KAT_PKA_POINT_MULT_FAILURE)
    }

    fn kat_mod_exp<C: Csb>(&self, pka: &mut Pka<C>) -> SeResult<()> {
        let mut modulus = [0u8; MOD_EXP_BYTES];
        modulus[MOD_EXP_BYTES - 2..].copy_from_slice(&1001u16.to_be_bytes());
        let mut exponent = [0u8; MOD_EXP_BYTES];
        exponent[MOD_EXP_BYTES - 1] = 10;
        let mut base = [0u8; MOD_EXP_BYTES];
        base[MOD_EXP_BYTES - 1] = 2;
        let mut out = [0u8; MOD_EXP_BYTES];

        pka.mod_exp(MOD_EXP_KEY_SIZE, &modulus, &exponent, &base, &mut out)
            .map_err(|_| SeError::KAT_PKA_MOD_EXP_FAILURE)?;

        let mut expected = [0u8; MOD_EXP_BYTES];
        expected[MOD_EXP_BYTES - 1] = 23;
        if out != expected {
            Err(SeError::KAT_PKA_MOD_EXP_FAILURE)?;
        }
        Ok(())
    }
}

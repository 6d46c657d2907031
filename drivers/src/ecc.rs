/*++

Licensed under the Apache-2.0 license.

File Name:

    ecc.rs

Abstract:

    File contains the elliptic curve operations and ECDSA signing built on
    the PKA.

--*/

use crate::array::is_zero;
use crate::mutex::PkaMutex;
use crate::pka::{montgomery_setup, read_operand, run_program, slot, Pka, Program};
use crate::radix::RadixConfig;
use crate::secure_bus::SecureBus;
use crate::trng::EntropySource;
use crate::cprintln;
use se_error::{SeError, SeResult};
use se_registers::se::pka::{Flags, FLAGS};
use se_registers::Csb;
use zeroize::Zeroize;

use crate::pka::write_operand;

/// Largest curve coordinate, in words, the signing path keeps on the stack
pub const ECC_MAX_WORDS: usize = 16;

/// Short Weierstrass curve `y^2 = x^3 + ax + b` over the prime `modulus`
///
/// All values are little-endian word slices of `key_size / 32` words.
#[derive(Debug, Clone, Copy)]
pub struct CurveParams<'a> {
    pub key_size: u32,
    pub modulus: &'a [u32],
    pub a: &'a [u32],
    pub b: &'a [u32],
    pub gx: &'a [u32],
    pub gy: &'a [u32],
    pub order: &'a [u32],
}

impl<'a> CurveParams<'a> {
    pub fn generator(&self) -> EcPoint<'a> {
        EcPoint {
            x: self.gx,
            y: self.gy,
        }
    }
}

/// Affine point
#[derive(Debug, Clone, Copy)]
pub struct EcPoint<'a> {
    pub x: &'a [u32],
    pub y: &'a [u32],
}

/// ECDSA signature
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Zeroize)]
pub struct EcSignature {
    r: [u32; ECC_MAX_WORDS],
    s: [u32; ECC_MAX_WORDS],
    words: usize,
}

impl EcSignature {
    /// Random point, little-endian words
    pub fn r(&self) -> &[u32] {
        &self.r[..self.words]
    }

    /// Proof, little-endian words
    pub fn s(&self) -> &[u32] {
        &self.s[..self.words]
    }
}

impl<'a, C: Csb> Pka<'a, C> {
    /// Scalar multiply `k * point`
    ///
    /// # Arguments
    ///
    /// * `curve` - Curve parameters
    /// * `k` - Scalar
    /// * `point` - Point to multiply
    /// * `x_out` - Receives the result's X coordinate, if requested
    /// * `y_out` - Receives the result's Y coordinate, if requested
    pub fn point_mult(
        &mut self,
        curve: &CurveParams,
        k: &[u32],
        point: &EcPoint,
        x_out: Option<&mut [u32]>,
        y_out: Option<&mut [u32]>,
    ) -> SeResult<()> {
        let config = RadixConfig::configure(curve.key_size)?;
        PkaMutex::with_mutex(self.bus, |bus| {
            montgomery_setup(bus, &config, curve.modulus)?;
            write_operand(bus, &config, slot::CURVE_A, curve.a)?;
            write_operand(bus, &config, slot::POINT_X, point.x)?;
            write_operand(bus, &config, slot::POINT_Y, point.y)?;
            write_operand(bus, &config, slot::SCALAR, k)?;
            run_program(bus, &config, Program::PointMult)?;
            read_result(bus, &config, x_out, y_out)
        })
    }

    /// Add two points
    pub fn point_add(
        &mut self,
        curve: &CurveParams,
        p: &EcPoint,
        q: &EcPoint,
        x_out: Option<&mut [u32]>,
        y_out: Option<&mut [u32]>,
    ) -> SeResult<()> {
        let config = RadixConfig::configure(curve.key_size)?;
        PkaMutex::with_mutex(self.bus, |bus| {
            montgomery_setup(bus, &config, curve.modulus)?;
            write_operand(bus, &config, slot::CURVE_A, curve.a)?;
            write_operand(bus, &config, slot::POINT_X, p.x)?;
            write_operand(bus, &config, slot::POINT_Y, p.y)?;
            write_operand(bus, &config, slot::POINT2_X, q.x)?;
            write_operand(bus, &config, slot::POINT2_Y, q.y)?;
            run_program(bus, &config, Program::PointAdd)?;
            read_result(bus, &config, x_out, y_out)
        })
    }

    /// Check that `point` satisfies the curve equation
    pub fn point_verify(&mut self, curve: &CurveParams, point: &EcPoint) -> SeResult<()> {
        let config = RadixConfig::configure(curve.key_size)?;
        PkaMutex::with_mutex(self.bus, |bus| {
            montgomery_setup(bus, &config, curve.modulus)?;
            write_operand(bus, &config, slot::CURVE_A, curve.a)?;
            write_operand(bus, &config, slot::CURVE_B, curve.b)?;
            write_operand(bus, &config, slot::POINT_X, point.x)?;
            write_operand(bus, &config, slot::POINT_Y, point.y)?;
            run_program(bus, &config, Program::PointVerify)?;
            let flags = Flags::from_bits_truncate(bus.read(FLAGS)?);
            if flags.contains(Flags::ZERO) {
                Ok(())
            } else {
                Err(SeError::DRIVER_ECC_POINT_NOT_ON_CURVE)
            }
        })
    }

    /// Sign a message hash
    ///
    /// # Arguments
    ///
    /// * `curve` - Curve parameters
    /// * `hash` - Message hash, little-endian words
    /// * `private_key` - Signing key, little-endian words
    /// * `max_attempts` - Number of nonces to try before giving up
    /// * `rng` - Nonce source
    ///
    /// # Returns
    ///
    /// * `EcSignature` - Generated signature
    pub fn ecdsa_sign_hash<R: EntropySource<C>>(
        &mut self,
        curve: &CurveParams,
        hash: &[u32],
        private_key: &[u32],
        max_attempts: u32,
        rng: &mut R,
    ) -> SeResult<EcSignature> {
        let config = RadixConfig::configure(curve.key_size)?;
        let words = config.requested_words();
        if words > ECC_MAX_WORDS {
            return Err(SeError::DRIVER_PKA_INVALID_KEY_SIZE);
        }

        let mut k = [0u32; ECC_MAX_WORDS];
        let mut k_inv = [0u32; ECC_MAX_WORDS];
        let mut d = [0u32; ECC_MAX_WORDS];
        let mut tmp = [0u32; ECC_MAX_WORDS];

        let result = self.ecdsa_attempts(
            curve,
            &config,
            hash,
            private_key,
            max_attempts,
            rng,
            &mut k[..words],
            &mut k_inv[..words],
            &mut d[..words],
            &mut tmp[..words],
        );

        k.zeroize();
        k_inv.zeroize();
        d.zeroize();
        tmp.zeroize();
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn ecdsa_attempts<R: EntropySource<C>>(
        &mut self,
        curve: &CurveParams,
        config: &RadixConfig,
        hash: &[u32],
        private_key: &[u32],
        max_attempts: u32,
        rng: &mut R,
        k: &mut [u32],
        k_inv: &mut [u32],
        d: &mut [u32],
        tmp: &mut [u32],
    ) -> SeResult<EcSignature> {
        let words = k.len();
        let mut sig = EcSignature {
            words,
            ..Default::default()
        };

        for _ in 0..max_attempts {
            rng.fill(self.bus, k)?;
            if is_zero(k) {
                continue;
            }

            // r = X(kG) mod n
            self.point_mult(curve, k, &curve.generator(), Some(&mut *tmp), None)?;
            self.mod_reduce(config, tmp, curve.order, &mut sig.r[..words])?;
            if is_zero(sig.r()) {
                continue;
            }

            // s = k^-1 (h + d * r) mod n
            self.mod_reduce(config, private_key, curve.order, d)?;
            self.mod_invert(config, k, curve.order, k_inv)?;
            self.mod_mult(config, d, sig.r(), curve.order, tmp)?;
            self.mod_reduce(config, hash, curve.order, d)?;
            let sum = &mut sig.s[..words];
            self.mod_add(config, tmp, d, curve.order, sum)?;
            tmp.copy_from_slice(sum);
            self.mod_mult(config, tmp, k_inv, curve.order, sum)?;
            if is_zero(sig.s()) {
                continue;
            }
            return Ok(sig);
        }

        sig.zeroize();
        cprintln!("[pka] ECDSA gave up after {} attempts", max_attempts);
        Err(SeError::DRIVER_ECDSA_RETRIES_EXHAUSTED)
    }
}

fn read_result<C: Csb>(
    bus: &mut SecureBus<C>,
    config: &RadixConfig,
    x_out: Option<&mut [u32]>,
    y_out: Option<&mut [u32]>,
) -> SeResult<()> {
    if let Some(x) = x_out {
        read_operand(bus, config, slot::POINT_X, x)?;
    }
    if let Some(y) = y_out {
        read_operand(bus, config, slot::POINT_Y, y)?;
    }
    Ok(())
}

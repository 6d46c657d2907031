/*++

Licensed under the Apache-2.0 license.

File Name:

    ecc_tests.rs

Abstract:

    File contains test cases for the elliptic curve and ECDSA APIs.

--*/

mod harness;

use harness::{big, bus, model, to_words, words, P256};
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{ProjectivePoint, Scalar};
use se_drivers::{
    le_words_to_be_bytes, EcPoint, EcSignature, EntropySource, Pka, SecureBus, SeError, SeResult,
    Trng,
};
use se_registers::Csb;
use sha2::{Digest, Sha256};

const SIGN_KEY: &str = "C9AFA9D845BA75166B5C215767B1D6934E50C3DB36E89B127B8A622B120F6721";
const PUB_X: &str = "60FED4BA255A9D31C961EB74C6356D68C049B8923B61FA6CE669622E60F29FB6";
const PUB_Y: &str = "7903FE1008B8BC99A41AE9E95628BC64F2F1B20C2D7E9F5177A3C294D4462299";
const NONCE: &str = "A6E3C57DD01ABE90086538398355DD4C3B17AA873382B0F24D6129493D8AAD60";
const SIG_R: &str = "EFD48B2AACB6A8FD1140DD9CD45E81D69D2C877B56AAF991C34D0EA84EAF3716";
const SIG_S: &str = "F7CB1C942D657C41D436C7A1B6E29F65F3E900DBB9AFF4064DC4AB2F843ACDA8";

/// Hands out scripted nonces, then zeros
#[derive(Default)]
struct ScriptedNonce {
    nonces: Vec<Vec<u32>>,
    fills: usize,
}

impl<C: Csb> EntropySource<C> for ScriptedNonce {
    fn fill(&mut self, _bus: &mut SecureBus<C>, out: &mut [u32]) -> SeResult<()> {
        out.fill(0);
        if let Some(nonce) = self.nonces.get(self.fills) {
            out[..nonce.len()].copy_from_slice(nonce);
        }
        self.fills += 1;
        Ok(())
    }
}

fn sample_hash() -> Vec<u32> {
    let digest = Sha256::digest(b"sample");
    let mut out = vec![0u32; 8];
    se_drivers::be_bytes_to_le_words(&digest, &mut out);
    out
}

fn p256_mul(k: u64) -> (Vec<u32>, Vec<u32>) {
    let point = (ProjectivePoint::GENERATOR * Scalar::from(k))
        .to_affine()
        .to_encoded_point(false);
    (
        words(&hex::encode(point.x().unwrap())),
        words(&hex::encode(point.y().unwrap())),
    )
}

fn signature_bytes(sig: &EcSignature) -> [u8; 64] {
    let mut out = [0u8; 64];
    le_words_to_be_bytes(sig.r(), &mut out[..32]);
    le_words_to_be_bytes(sig.s(), &mut out[32..]);
    out
}

fn verify_with_p256(sig: &EcSignature, hash: &[u32]) -> bool {
    let mut sec1 = [0u8; 65];
    sec1[0] = 0x04;
    sec1[1..33].copy_from_slice(&hex::decode(PUB_X).unwrap());
    sec1[33..].copy_from_slice(&hex::decode(PUB_Y).unwrap());
    let key = VerifyingKey::from_sec1_bytes(&sec1).unwrap();

    let mut digest = [0u8; 32];
    le_words_to_be_bytes(hash, &mut digest);
    let sig = Signature::from_slice(&signature_bytes(sig)).unwrap();
    key.verify_prehash(&digest, &sig).is_ok()
}

#[test]
fn test_generator_on_curve() {
    let curve = P256::new();
    let params = curve.params();
    let mut model = model();
    let mut bus = bus(&mut model);
    let mut pka = Pka::new(&mut bus);
    pka.point_verify(&params, &params.generator()).unwrap();

    let bad_y = to_words(&(big(&curve.gy) + 1u32), 8);
    assert_eq!(
        pka.point_verify(&params, &EcPoint { x: &curve.gx, y: &bad_y }),
        Err(SeError::DRIVER_ECC_POINT_NOT_ON_CURVE)
    );
}

#[test]
fn test_point_mult() {
    let curve = P256::new();
    let params = curve.params();
    let mut model = model();
    let mut bus = bus(&mut model);
    let mut pka = Pka::new(&mut bus);
    let mut x = [0u32; 8];
    let mut y = [0u32; 8];

    pka.point_mult(&params, &[1], &params.generator(), Some(&mut x), Some(&mut y))
        .unwrap();
    assert_eq!((&x[..], &y[..]), (&curve.gx[..], &curve.gy[..]));

    for k in [2u64, 3] {
        pka.point_mult(&params, &[k as u32], &params.generator(), Some(&mut x), Some(&mut y))
            .unwrap();
        let (ex, ey) = p256_mul(k);
        assert_eq!((x.to_vec(), y.to_vec()), (ex, ey), "k = {k}");
        pka.point_verify(&params, &EcPoint { x: &x, y: &y }).unwrap();
    }

    // (n - 1)G = -G
    let n_minus_1 = to_words(&(big(&curve.n) - 1u32), 8);
    pka.point_mult(&params, &n_minus_1, &params.generator(), Some(&mut x), Some(&mut y))
        .unwrap();
    assert_eq!(x.to_vec(), curve.gx);
    assert_eq!(big(&y), big(&curve.p) - big(&curve.gy));

    pka.point_mult(&params, &words(SIGN_KEY), &params.generator(), Some(&mut x), Some(&mut y))
        .unwrap();
    assert_eq!(x.to_vec(), words(PUB_X));
    assert_eq!(y.to_vec(), words(PUB_Y));
    pka.point_verify(&params, &EcPoint { x: &x, y: &y }).unwrap();
}

#[test]
fn test_point_mult_single_coordinate() {
    let curve = P256::new();
    let params = curve.params();
    let mut model = model();
    let mut x = [0u32; 8];
    Pka::new(&mut bus(&mut model))
        .point_mult(&params, &words(SIGN_KEY), &params.generator(), Some(&mut x), None)
        .unwrap();
    assert_eq!(x.to_vec(), words(PUB_X));
    assert_eq!(model.log.count("se_read(0x00029040)"), 0);
}

#[test]
fn test_point_add() {
    let curve = P256::new();
    let params = curve.params();
    let (x2, y2) = p256_mul(2);
    let (x3, y3) = p256_mul(3);
    let mut model = model();
    let mut x = [0u32; 8];
    let mut y = [0u32; 8];
    Pka::new(&mut bus(&mut model))
        .point_add(
            &params,
            &params.generator(),
            &EcPoint { x: &x2, y: &y2 },
            Some(&mut x),
            Some(&mut y),
        )
        .unwrap();
    assert_eq!((x.to_vec(), y.to_vec()), (x3, y3));
}

#[test]
fn test_ecdsa_rfc6979_sample() {
    let curve = P256::new();
    let hash = sample_hash();
    let mut rng = ScriptedNonce {
        nonces: vec![words(NONCE)],
        ..Default::default()
    };
    let mut model = model();
    let sig = Pka::new(&mut bus(&mut model))
        .ecdsa_sign_hash(&curve.params(), &hash, &words(SIGN_KEY), 4, &mut rng)
        .unwrap();
    assert_eq!(sig.r(), &words(SIG_R)[..]);
    assert_eq!(sig.s(), &words(SIG_S)[..]);
    assert_eq!(rng.fills, 1);
    assert!(verify_with_p256(&sig, &hash));
}

#[test]
fn test_ecdsa_skips_zero_nonce() {
    let curve = P256::new();
    let mut rng = ScriptedNonce {
        nonces: vec![vec![0; 8], words(NONCE)],
        ..Default::default()
    };
    let mut model = model();
    let sig = Pka::new(&mut bus(&mut model))
        .ecdsa_sign_hash(&curve.params(), &sample_hash(), &words(SIGN_KEY), 4, &mut rng)
        .unwrap();
    assert_eq!(rng.fills, 2);
    assert_eq!(sig.r(), &words(SIG_R)[..]);
}

#[test]
fn test_ecdsa_retries_exhausted() {
    let curve = P256::new();
    let mut rng = ScriptedNonce::default();
    let mut model = model();
    assert_eq!(
        Pka::new(&mut bus(&mut model)).ecdsa_sign_hash(
            &curve.params(),
            &sample_hash(),
            &words(SIGN_KEY),
            3,
            &mut rng
        ),
        Err(SeError::DRIVER_ECDSA_RETRIES_EXHAUSTED)
    );
    assert_eq!(rng.fills, 3);
    assert!(model.pka.history().is_empty());
}

#[test]
fn test_ecdsa_with_trng_nonce() {
    let curve = P256::new();
    let hash = sample_hash();
    let mut model = model();
    let mut trng = Trng::new();
    let sig = Pka::new(&mut bus(&mut model))
        .ecdsa_sign_hash(&curve.params(), &hash, &words(SIGN_KEY), 4, &mut trng)
        .unwrap();
    assert!(verify_with_p256(&sig, &hash));
    assert!(trng.scratch().iter().all(|w| *w == 0));
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains helpers shared by the driver integration tests.

--*/
#![allow(dead_code)]

use num_bigint::BigUint;
use se_drivers::{
    be_bytes_to_le_words, CurveParams, PrivLevel, ProcessorId, SecureBus, SecurityContext,
};
use se_emu::SeModel;

pub fn ctx() -> SecurityContext {
    SecurityContext::new(PrivLevel::Heavy, ProcessorId::SEC2)
}

/// Model whose requester matches [`ctx`]
pub fn model() -> SeModel {
    SeModel::new(ProcessorId::SEC2.0)
}

pub fn bus(model: &mut SeModel) -> SecureBus<&mut SeModel> {
    SecureBus::new(model, ctx())
}

/// Big-endian hex string to little-endian words
pub fn words(hex_str: &str) -> Vec<u32> {
    let bytes = hex::decode(hex_str).unwrap();
    let mut out = vec![0u32; bytes.len() / 4];
    be_bytes_to_le_words(&bytes, &mut out);
    out
}

pub fn big(words: &[u32]) -> BigUint {
    BigUint::from_slice(words)
}

pub fn to_words(n: &BigUint, len: usize) -> Vec<u32> {
    let mut out = n.to_u32_digits();
    out.resize(len, 0);
    out
}

pub struct P256 {
    pub p: Vec<u32>,
    pub a: Vec<u32>,
    pub b: Vec<u32>,
    pub gx: Vec<u32>,
    pub gy: Vec<u32>,
    pub n: Vec<u32>,
}

impl P256 {
    pub fn new() -> Self {
        Self {
            p: words("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF"),
            a: words("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC"),
            b: words("5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B"),
            gx: words("6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296"),
            gy: words("4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5"),
            n: words("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551"),
        }
    }

    pub fn params(&self) -> CurveParams<'_> {
        CurveParams {
            key_size: 256,
            modulus: &self.p,
            a: &self.a,
            b: &self.b,
            gx: &self.gx,
            gy: &self.gy,
            order: &self.n,
        }
    }
}

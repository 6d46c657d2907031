/*++

Licensed under the Apache-2.0 license.

File Name:

    math.rs

Abstract:

    File contains the big number and affine curve arithmetic behind the
    simulated PKA microprograms.

--*/

use num_bigint::{BigInt, BigUint};

pub fn is_zero(n: &BigUint) -> bool {
    n.bits() == 0
}

pub fn sub_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    ((a % m) + m - (b % m)) % m
}

/// `a^-1 mod m`, if it exists
pub fn mod_inv(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if is_zero(m) {
        return None;
    }
    let m_int = BigInt::from(m.clone());
    let (mut old_r, mut r) = (BigInt::from(a % m), m_int.clone());
    let (mut old_s, mut s) = (BigInt::from(1), BigInt::from(0));
    while r != BigInt::from(0) {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }
    if old_r != BigInt::from(1) {
        return None;
    }
    (((old_s % &m_int) + &m_int) % &m_int).to_biguint()
}

/// Affine point; `None` is the point at infinity
pub type Point = Option<(BigUint, BigUint)>;

pub struct Curve {
    pub p: BigUint,
    pub a: BigUint,
}

impl Curve {
    pub fn add(&self, lhs: &Point, rhs: &Point) -> Point {
        let p = &self.p;
        let ((x1, y1), (x2, y2)) = match (lhs, rhs) {
            (None, _) => return rhs.clone(),
            (_, None) => return lhs.clone(),
            (Some(l), Some(r)) => (l, r),
        };
        let lambda = if x1 == x2 {
            if is_zero(&((y1 + y2) % p)) {
                return None;
            }
            let num = (BigUint::from(3u32) * x1 * x1 + &self.a) % p;
            let den = mod_inv(&((BigUint::from(2u32) * y1) % p), p)?;
            (num * den) % p
        } else {
            let num = sub_mod(y2, y1, p);
            let den = mod_inv(&sub_mod(x2, x1, p), p)?;
            (num * den) % p
        };
        let x3 = sub_mod(&sub_mod(&(&lambda * &lambda), x1, p), x2, p);
        let y3 = sub_mod(&(&lambda * sub_mod(x1, &x3, p)), y1, p);
        Some((x3, y3))
    }

    pub fn mul(&self, k: &BigUint, point: &Point) -> Point {
        let mut acc: Point = None;
        for bit in (0..k.bits()).rev() {
            acc = self.add(&acc, &acc);
            if k.bit(bit) {
                acc = self.add(&acc, point);
            }
        }
        acc
    }

    pub fn contains(&self, x: &BigUint, y: &BigUint, b: &BigUint) -> bool {
        let p = &self.p;
        let lhs = (y * y) % p;
        let rhs = (x * x * x + &self.a * x + b) % p;
        lhs == rhs
    }
}

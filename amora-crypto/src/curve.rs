//! STARK-curve operations.
//!
//! Thin wrappers over `starknet-curve` point arithmetic with the protocol's
//! conventions layered on top: scalars live in `[1, N-1]` where `N` is the
//! curve order, private keys are parity-normalized, and x-only recovery
//! always selects the even-y root.
//!
//! Field arithmetic on [`FieldElement`] is modulo the field prime `P`;
//! scalar arithmetic must be modulo the curve order `N < P`, so the
//! order-level helpers here go through `BigUint`.

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use starknet_crypto::FieldElement;
use starknet_curve::curve_params::{ALPHA, BETA, EC_ORDER, GENERATOR};
use starknet_curve::AffinePoint;

use amora_core::serde_felt::to_hex;
use amora_core::{AmoraError, Result};

lazy_static! {
    /// Curve order `N` as a big integer, for arithmetic the field type
    /// cannot do.
    static ref CURVE_ORDER: BigUint = BigUint::from_bytes_be(&EC_ORDER.to_bytes_be());
}

/// The standard generator `G`.
pub fn generator() -> AffinePoint {
    GENERATOR
}

/// The curve order `N` as a felt.
pub fn curve_order() -> FieldElement {
    EC_ORDER
}

/// Converts a felt to a big integer.
pub fn felt_to_biguint(value: &FieldElement) -> BigUint {
    BigUint::from_bytes_be(&value.to_bytes_be())
}

/// Converts a big integer known to be below the field prime back to a felt.
pub(crate) fn biguint_to_felt(value: &BigUint) -> FieldElement {
    let bytes = value.to_bytes_be();
    let mut buf = [0u8; 32];
    buf[32 - bytes.len()..].copy_from_slice(&bytes);
    // Callers only pass values reduced below N < P, so this cannot wrap.
    FieldElement::from_bytes_be(&buf).unwrap_or(FieldElement::ZERO)
}

/// True when `k` is a usable scalar, i.e. in `[1, N-1]`.
pub fn is_valid_scalar(k: &FieldElement) -> bool {
    *k != FieldElement::ZERO && felt_to_biguint(k) < *CURVE_ORDER
}

/// Uniformly samples a parity-normalized scalar from `[1, N-1]`.
///
/// Rejection-samples 252-bit candidates so the distribution stays uniform,
/// then flips the scalar if `y(k*G)` is odd.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Result<FieldElement> {
    loop {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        // Clamp to 252 bits; N is just above 2^251, so roughly half the
        // candidates survive.
        bytes[0] &= 0x0f;
        let candidate = BigUint::from_bytes_be(&bytes);
        if candidate.is_zero() || candidate >= *CURVE_ORDER {
            continue;
        }
        return normalize_parity(&biguint_to_felt(&candidate));
    }
}

/// Computes `k * G`.
pub fn mul_base(k: &FieldElement) -> Result<AffinePoint> {
    if *k == FieldElement::ZERO {
        return Err(AmoraError::ZeroPoint);
    }
    let point = &GENERATOR * &k.to_bits_le();
    if point.infinity {
        return Err(AmoraError::ZeroPoint);
    }
    Ok(point)
}

/// Computes `k * P`.
pub fn mul_point(k: &FieldElement, point: &AffinePoint) -> Result<AffinePoint> {
    if *k == FieldElement::ZERO || point.infinity {
        return Err(AmoraError::ZeroPoint);
    }
    let result = point * &k.to_bits_le();
    if result.infinity {
        return Err(AmoraError::ZeroPoint);
    }
    Ok(result)
}

/// Group addition `P + Q`.
pub fn add_points(p: &AffinePoint, q: &AffinePoint) -> Result<AffinePoint> {
    let result = p + q;
    if result.infinity {
        return Err(AmoraError::ZeroPoint);
    }
    Ok(result)
}

/// Recovers the canonical (even-y) point with the given x-coordinate.
///
/// Fails with [`AmoraError::NotOnCurve`] when `x^3 + a*x + b` has no square
/// root in the field.
pub fn recover_point(x: &FieldElement) -> Result<AffinePoint> {
    if *x == FieldElement::ZERO {
        return Err(AmoraError::ZeroPoint);
    }
    let rhs = *x * *x * *x + ALPHA * *x + BETA;
    let y = rhs
        .sqrt()
        .ok_or_else(|| AmoraError::NotOnCurve(to_hex(x)))?;
    let y = if is_even(&y) { y } else { -y };
    Ok(AffinePoint {
        x: *x,
        y,
        infinity: false,
    })
}

/// True when the point's y-coordinate is even.
pub fn is_even_y(point: &AffinePoint) -> bool {
    is_even(&point.y)
}

fn is_even(value: &FieldElement) -> bool {
    value.to_bytes_be()[31] & 1 == 0
}

/// Returns `x(k * G)`, the wire form of a public key.
pub fn derive_public_key(k: &FieldElement) -> Result<FieldElement> {
    Ok(mul_base(k)?.x)
}

/// Returns `k` if `y(k * G)` is even, `N - k` otherwise.
///
/// Negating a scalar negates the point's y and leaves x untouched, so this
/// picks the representative whose public point is the canonical even-y one.
/// Idempotent.
pub fn normalize_parity(k: &FieldElement) -> Result<FieldElement> {
    if !is_valid_scalar(k) {
        return Err(AmoraError::OutOfRange(format!(
            "scalar {} is not in [1, N-1]",
            to_hex(k)
        )));
    }
    let point = mul_base(k)?;
    if is_even_y(&point) {
        Ok(*k)
    } else {
        Ok(biguint_to_felt(&(&*CURVE_ORDER - felt_to_biguint(k))))
    }
}

/// Scalar addition modulo the curve order: `(a + b) mod N`.
pub fn add_mod_order(a: &FieldElement, b: &FieldElement) -> FieldElement {
    let sum = (felt_to_biguint(a) + felt_to_biguint(b)) % &*CURVE_ORDER;
    biguint_to_felt(&sum)
}

//! Key generation, import, and the ECDH shared secret.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use starknet_crypto::FieldElement;

use amora_core::{KeyPair, Result, StealthKeys};

use crate::curve::{
    derive_public_key, is_valid_scalar, mul_point, normalize_parity, random_scalar, recover_point,
};

/// Generates a fresh parity-normalized key pair from the given RNG.
pub fn generate_keypair_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<KeyPair> {
    let secret = random_scalar(rng)?;
    let public = derive_public_key(&secret)?;
    Ok(KeyPair::new(secret, public))
}

/// Generates a fresh key pair from the platform CSPRNG.
pub fn generate_keypair() -> Result<KeyPair> {
    generate_keypair_with_rng(&mut OsRng)
}

/// Generates a recipient key set (spending + viewing) with independent
/// entropy, from the given RNG.
pub fn generate_stealth_keys_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<StealthKeys> {
    Ok(StealthKeys::new(
        generate_keypair_with_rng(rng)?,
        generate_keypair_with_rng(rng)?,
    ))
}

/// Generates a recipient key set from the platform CSPRNG.
pub fn generate_stealth_keys() -> Result<StealthKeys> {
    generate_stealth_keys_with_rng(&mut OsRng)
}

/// Imports a raw secret scalar as a key pair.
///
/// The scalar is range-checked and parity-normalized, so the returned
/// secret may be `N - input`. Every entry point that accepts outside key
/// material must come through here to keep x-only transport sound.
pub fn keypair_from_secret(secret: &FieldElement) -> Result<KeyPair> {
    let secret = normalize_parity(secret)?;
    let public = derive_public_key(&secret)?;
    Ok(KeyPair::new(secret, public))
}

/// ECDH: the x-coordinate of `secret * point(public_x)`.
///
/// Symmetric by construction: `ecdh(a, B) == ecdh(b, A)` for any two key
/// pairs, because both sides land on (a multiple of) the same point up to
/// y-sign, and x is sign-invariant.
pub fn shared_secret(secret: &FieldElement, public_x: &FieldElement) -> Result<FieldElement> {
    if !is_valid_scalar(secret) {
        return Err(amora_core::AmoraError::OutOfRange(
            "ECDH secret is not in [1, N-1]".into(),
        ));
    }
    let point = recover_point(public_x)?;
    Ok(mul_point(secret, &point)?.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{is_even_y, mul_base};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x6b657973)
    }

    #[test]
    fn generated_pairs_are_consistent() {
        let pair = generate_keypair_with_rng(&mut rng()).unwrap();
        pair.validate().unwrap();
        assert_eq!(derive_public_key(&pair.secret).unwrap(), pair.public);
        assert!(is_even_y(&mul_base(&pair.secret).unwrap()));
    }

    #[test]
    fn stealth_keys_use_independent_entropy() {
        let keys = generate_stealth_keys_with_rng(&mut rng()).unwrap();
        keys.validate().unwrap();
        assert_ne!(keys.spending.secret, keys.viewing.secret);
        assert_ne!(keys.spending.public, keys.viewing.public);
    }

    #[test]
    fn import_normalizes() {
        let pair = generate_keypair_with_rng(&mut rng()).unwrap();
        // Re-importing a normalized secret is the identity.
        let again = keypair_from_secret(&pair.secret).unwrap();
        assert_eq!(again, pair);

        // Importing zero fails.
        assert!(keypair_from_secret(&FieldElement::ZERO).is_err());
    }

    #[test]
    fn ecdh_is_symmetric() {
        let mut rng = rng();
        let a = generate_keypair_with_rng(&mut rng).unwrap();
        let b = generate_keypair_with_rng(&mut rng).unwrap();
        let ab = shared_secret(&a.secret, &b.public).unwrap();
        let ba = shared_secret(&b.secret, &a.public).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn ecdh_differs_per_peer() {
        let mut rng = rng();
        let a = generate_keypair_with_rng(&mut rng).unwrap();
        let b = generate_keypair_with_rng(&mut rng).unwrap();
        let c = generate_keypair_with_rng(&mut rng).unwrap();
        assert_ne!(
            shared_secret(&a.secret, &b.public).unwrap(),
            shared_secret(&a.secret, &c.public).unwrap()
        );
    }
}

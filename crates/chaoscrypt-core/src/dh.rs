//! Diffie-Hellman style key exchange over Chebyshev polynomials.
//!
//! Public values are `T_a(param) mod p`; both parties arrive at
//! `T_a(T_b(param)) = T_{ab}(param)`. Private keys are derived from the
//! entropy label of the exchange, so replaying a label replays the exchange
//! and neighbouring labels give small, controlled key perturbations.

use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::PrimitiveError;
use crate::chaos::ChebyshevPoly;
use crate::prime::{random_in_range, random_prime};
use crate::primitive::{EntropyLabel, ExchangeOutcome, KeyExchange, SystemInfo};

/// Smallest modulus ever used, in bits.
const MIN_PRIME_BITS: u64 = 256;

/// Largest supported private key size.
pub const MAX_PRIVATE_BITS: u32 = 1024;

/// Tag Bob's key material is derived from; Bob never varies.
const BOB_TAG: &str = "bob";

#[derive(Debug, Clone)]
pub struct ChebyshevDh {
    private_bits: u32,
    public_bits: u32,
    cheby: ChebyshevPoly,
    param: BigUint,
    salt: [u8; 32],
}

/// One party's key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypair {
    pub private: BigUint,
    pub public: BigUint,
    /// Unmasked `T_private(param)`; this is what the peer needs.
    pub raw_public: BigUint,
}

impl ChebyshevDh {
    /// Draw a fresh modulus, public parameter and label salt from `rng`.
    pub fn new<R: Rng + ?Sized>(private_bits: u32, rng: &mut R) -> Result<Self, PrimitiveError> {
        if !(2..=MAX_PRIVATE_BITS).contains(&private_bits) {
            return Err(PrimitiveError::invalid(format!(
                "private_bits must be in 2..={MAX_PRIVATE_BITS}, got {private_bits}"
            )));
        }
        let prime_bits = MIN_PRIME_BITS.max(u64::from(private_bits) * 4);
        let public_bits = (private_bits * 2).min((prime_bits - 1) as u32);
        let param_bits = prime_bits - 1;

        let modulus = random_prime(prime_bits, rng)?;
        let low = BigUint::one() << (param_bits - 1);
        let high = (BigUint::one() << param_bits) - BigUint::one();
        let param = random_in_range(&low, &high, rng);
        let mut salt = [0u8; 32];
        rng.fill(&mut salt);

        log::debug!(
            "chebyshev exchange: private_bits={private_bits} mod_bits={} public_bits={public_bits}",
            modulus.bits()
        );
        Ok(Self {
            private_bits,
            public_bits,
            cheby: ChebyshevPoly::new(modulus),
            param,
            salt,
        })
    }

    pub fn modulus(&self) -> &BigUint {
        self.cheby.modulus()
    }

    /// Map `tag` to a private key in `[2^(b-1), 2^b - 1]`.
    fn derive_private(&self, tag: &str) -> BigUint {
        let bits = u64::from(self.private_bits);
        let mut material = Vec::with_capacity(bits.div_ceil(8) as usize + 32);
        let mut counter = 0u32;
        while (material.len() as u64) * 8 < bits {
            let mut h = Sha256::new();
            h.update(self.salt);
            h.update(tag.as_bytes());
            h.update(counter.to_be_bytes());
            material.extend_from_slice(&h.finalize());
            counter += 1;
        }
        let low = BigUint::one() << (bits - 1);
        low.clone() + BigUint::from_bytes_be(&material) % &low
    }

    /// Key material for `tag`.
    pub fn keypair(&self, tag: &str) -> Keypair {
        let private = self.derive_private(tag);
        let raw_public = self.cheby.eval(&private, &self.param);
        let top = BigUint::one() << (self.public_bits - 1);
        let mask = (BigUint::one() << self.public_bits) - BigUint::one();
        let public = ((&raw_public & &mask) | top) % self.modulus();
        Keypair {
            private,
            public,
            raw_public,
        }
    }

    pub fn compute_shared(&self, private: &BigUint, other_raw_public: &BigUint) -> BigUint {
        self.cheby.eval(private, other_raw_public)
    }
}

impl KeyExchange for ChebyshevDh {
    fn system_info(&self) -> SystemInfo {
        SystemInfo {
            modulus: self.modulus().clone(),
            mod_bits: self.modulus().bits(),
            param: self.param.clone(),
            param_bits: self.param.bits(),
            private_bits: self.private_bits,
            public_bits: self.public_bits,
        }
    }

    fn simulate_exchange(&self, label: EntropyLabel) -> Result<ExchangeOutcome, PrimitiveError> {
        let alice = self.keypair(label.as_str());
        let bob = self.keypair(BOB_TAG);
        let shared_secret = self.compute_shared(&alice.private, &bob.raw_public);
        let bob_shared = self.compute_shared(&bob.private, &alice.raw_public);
        Ok(ExchangeOutcome {
            label,
            alice_private: alice.private,
            alice_public: alice.public,
            alice_raw_public: alice.raw_public,
            bob_private: bob.private,
            bob_public: bob.public,
            bob_raw_public: bob.raw_public,
            shared_secret,
            bob_shared,
            mod_bits: self.modulus().bits(),
        })
    }
}

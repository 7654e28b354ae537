//! # chaoscrypt-core
//!
//! Experimental cryptographic primitives built on chaotic dynamics.
//!
//! - [`HyperchaosBoxGenerator`]: S-boxes shuffled by a five-dimensional
//!   four-wing hyperchaotic attractor seeded from a shared secret.
//! - [`HyperchaosBlockCipher`]: a Feistel network whose round keys come from
//!   the same attractor.
//! - [`ChebyshevDh`]: a Diffie-Hellman style exchange using the semigroup
//!   property of Chebyshev polynomials over a prime field.
//!
//! None of these are meant to protect real data. They exist to be measured:
//! `chaoscrypt-props` drives them through the traits in [`primitive`] and
//! scores their avalanche behavior.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chaoscrypt_core::{BlockCipher, SBoxGenerator};
//! use chaoscrypt_core::{HyperchaosBlockCipher, HyperchaosBoxGenerator};
//!
//! let sbox = HyperchaosBoxGenerator::new(123_456, 256)?.generate()?;
//! let cipher = HyperchaosBlockCipher::new(sbox, 8, 16)?;
//! let ct = cipher.encrypt(&[0u8; 16], b"testkey12")?;
//! assert_eq!(ct.len(), 16);
//! # Ok::<(), chaoscrypt_core::PrimitiveError>(())
//! ```

pub mod chaos;
pub mod dh;
pub mod error;
pub mod factory;
pub mod feistel;
pub mod prime;
pub mod primitive;
pub mod sbox;

pub use chaos::{ChebyshevPoly, HyperchaosSystem, Trajectory};
pub use dh::{ChebyshevDh, Keypair};
pub use error::PrimitiveError;
pub use factory::HyperchaosPrimitives;
pub use feistel::{CipherInfo, HyperchaosBlockCipher};
pub use primitive::{
    BlockCipher, EntropyLabel, ExchangeOutcome, KeyExchange, PrimitiveFactory, SBoxGenerator,
    SystemInfo,
};
pub use sbox::HyperchaosBoxGenerator;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Chaotic maps the primitives are built from.

pub mod attractor;
pub mod chebyshev;

pub use attractor::{HyperchaosSystem, STATE_DIM, State, Trajectory};
pub use chebyshev::ChebyshevPoly;

use sha2::{Digest, Sha256};

/// Derive an initial condition from arbitrary key material.
///
/// The SHA-256 digest is read as five big-endian 32-bit words, each mapped
/// linearly onto `[-1, 1]`.
pub fn initial_state_from_bytes(material: &[u8]) -> State {
    let digest = Sha256::digest(material);
    let mut state = [0.0; STATE_DIM];
    for (slot, word) in state.iter_mut().zip(digest.chunks_exact(4)) {
        let value = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
        *slot = (value as f64 / u32::MAX as f64) * 2.0 - 1.0;
    }
    state
}

/// Minimal big-endian encoding of `secret` (zero encodes as no bytes).
pub fn secret_bytes(secret: u64) -> Vec<u8> {
    let bytes = secret.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

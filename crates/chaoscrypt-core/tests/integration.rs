//! Integration tests for chaoscrypt-core.
//!
//! These tests exercise the primitives together, the way the measurement
//! engine does: secret -> S-box -> cipher, and label -> key exchange.

use chaoscrypt_core::sbox::is_permutation;
use chaoscrypt_core::{
    BlockCipher, EntropyLabel, HyperchaosBlockCipher, HyperchaosBoxGenerator,
    HyperchaosPrimitives, HyperchaosSystem, PrimitiveError, PrimitiveFactory, SBoxGenerator,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

#[test]
fn sbox_feeds_cipher() {
    let sbox = HyperchaosBoxGenerator::new(123_456, 256)
        .unwrap()
        .generate()
        .unwrap();
    assert!(is_permutation(&sbox));

    let cipher = HyperchaosBlockCipher::new(sbox, 8, 16).unwrap();
    let pt = *b"sixteen byte msg";
    let ct = cipher.encrypt(&pt, b"testkey12").unwrap();
    assert_eq!(ct.len(), 16);
    assert_ne!(ct, pt);
    assert_eq!(cipher.decrypt_block(&ct, b"testkey12").unwrap(), pt);
}

#[test]
fn cbc_round_trip_over_many_lengths() {
    let sbox = HyperchaosBoxGenerator::new(42, 256).unwrap().generate().unwrap();
    let cipher = HyperchaosBlockCipher::new(sbox, 4, 8).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let mut iv = [0u8; 8];
    rng.fill_bytes(&mut iv);

    for len in [0usize, 1, 7, 8, 9, 31, 64] {
        let mut msg = vec![0u8; len];
        rng.fill_bytes(&mut msg);
        let ct = cipher.encrypt_cbc(&msg, b"k", &iv).unwrap();
        assert_eq!(ct.len() % 8, 0);
        assert_eq!(&ct[..8], &iv);
        assert_eq!(cipher.decrypt_cbc(&ct, b"k").unwrap(), msg, "length {len}");
    }
}

#[test]
fn wrong_block_length_is_reported() {
    let cipher = HyperchaosBlockCipher::new((0..256).collect(), 2, 16).unwrap();
    let err = cipher.encrypt(&[0u8; 15], b"k").unwrap_err();
    assert_eq!(
        err,
        PrimitiveError::BlockLength {
            expected: 16,
            got: 15
        }
    );
}

#[test]
fn factory_key_exchange_agrees_for_every_label() {
    let dh = HyperchaosPrimitives::default().key_exchange(16, 2024).unwrap();
    let info = dh.system_info();
    assert_eq!(info.private_bits, 16);
    assert_eq!(info.mod_bits, 256);
    for label in EntropyLabel::ALL {
        let outcome = dh.simulate_exchange(label).unwrap();
        assert!(outcome.matches(), "{label}");
        assert_eq!(outcome.label, label);
        assert_eq!(outcome.alice_private.bits(), 16);
    }
}

#[test]
fn labels_select_distinct_keys() {
    let dh = HyperchaosPrimitives::default().key_exchange(32, 5).unwrap();
    let keys: Vec<_> = EntropyLabel::ALL
        .into_iter()
        .map(|l| dh.simulate_exchange(l).unwrap().alice_private)
        .collect();
    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn same_seed_same_exchange() {
    let f = HyperchaosPrimitives::default();
    let a = f.key_exchange(8, 11).unwrap();
    let b = f.key_exchange(8, 11).unwrap();
    assert_eq!(a.system_info(), b.system_info());
    assert_eq!(
        a.simulate_exchange(EntropyLabel::BaselineEntropyA).unwrap(),
        b.simulate_exchange(EntropyLabel::BaselineEntropyA).unwrap()
    );
}

#[test]
fn custom_system_changes_sboxes() {
    let default = HyperchaosPrimitives::default()
        .sbox_generator(99, 128)
        .unwrap()
        .generate()
        .unwrap();
    let tuned = HyperchaosPrimitives::with_system(HyperchaosSystem::new(2.0, 6.0, 0.5))
        .sbox_generator(99, 128)
        .unwrap()
        .generate()
        .unwrap();
    assert!(is_permutation(&tuned));
    assert_ne!(default, tuned);
}

#[test]
fn keystream_bytes_are_deterministic() {
    let system = HyperchaosSystem::default();
    let a = system.generate_bytes(&[0.1, -0.2, 0.3], 64, 10);
    let b = system.generate_bytes(&[0.1, -0.2, 0.3], 64, 10);
    assert_eq!(a.len(), 64);
    assert_eq!(a, b);
    let blocks = system.generate_block(&[0.1, -0.2, 0.3], 16, 4, 10);
    assert_eq!(blocks.concat(), a);
}

//! S-box avalanche: how much a substitution table changes when the secret
//! it is generated from changes slightly.

use std::ops::RangeInclusive;

use chaoscrypt_core::PrimitiveFactory;
use rand::Rng;

use crate::PropsError;
use crate::difference::table_difference;
use crate::result::{PassPolicy, TestResult, TrialRecord};

pub const PROPERTY: &str = "sbox_avalanche";

pub const DEFAULT_BOX_SIZE: usize = 256;

/// Range a base secret is drawn from when none is given.
pub const SECRET_RANGE: RangeInclusive<u64> = 100_000..=999_999;

/// Offsets added to the base secret to get the related secrets.
pub const SECRET_OFFSETS: [u64; 4] = [1, 2, 3, 4];

pub const DEFAULT_POLICY: PassPolicy = PassPolicy::Above { lower: 25.0 };

/// Generate S-boxes from `base, base+1, ..., base+4` and score how many
/// entries of each related table differ from the base table.
///
/// `shared_secret` of `None` draws the base from [`SECRET_RANGE`] using `rng`.
pub fn test_sbox_avalanche<F, R>(
    factory: &F,
    box_size: usize,
    shared_secret: Option<u64>,
    policy: PassPolicy,
    rng: &mut R,
) -> Result<TestResult, PropsError>
where
    F: PrimitiveFactory + ?Sized,
    R: Rng + ?Sized,
{
    if box_size == 0 {
        return Err(PropsError::invalid("box_size must be positive"));
    }
    let base_secret = shared_secret.unwrap_or_else(|| rng.random_range(SECRET_RANGE));
    let base_table = generate_table(factory, base_secret, box_size)?;
    log::debug!("{PROPERTY}: base secret {base_secret}, {box_size} entries");

    let mut tests = Vec::with_capacity(SECRET_OFFSETS.len());
    for offset in SECRET_OFFSETS {
        let modified_secret = base_secret.checked_add(offset).ok_or_else(|| {
            PropsError::invalid(format!("secret {base_secret} + {offset} overflows"))
        })?;
        let table = generate_table(factory, modified_secret, box_size)?;
        let diff = table_difference(&base_table, &table);
        log::debug!(
            "{PROPERTY}: secret {modified_secret} changes {}/{box_size} entries",
            diff.differing_entries
        );
        tests.push(TrialRecord::Sbox {
            base_secret,
            modified_secret,
            differing_entries: diff.differing_entries,
            box_size,
            difference_percent: diff.difference_percent,
        });
    }
    TestResult::from_trials(PROPERTY, tests, policy)
}

/// Generate one table and hold the generator to its requested size.
fn generate_table<F>(factory: &F, secret: u64, box_size: usize) -> Result<Vec<u32>, PropsError>
where
    F: PrimitiveFactory + ?Sized,
{
    let table = factory.sbox_generator(secret, box_size)?.generate()?;
    if table.len() != box_size {
        return Err(PropsError::invalid(format!(
            "sbox for secret {secret} has {} entries, expected {box_size}",
            table.len()
        )));
    }
    Ok(table)
}

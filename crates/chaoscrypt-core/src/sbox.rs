//! S-box generation from a shared secret.
//!
//! The secret seeds the hyperchaotic system; the resulting trajectory drives
//! a Fisher-Yates shuffle of the identity permutation, so every generated
//! table is a permutation of `0..box_size`.

use crate::PrimitiveError;
use crate::chaos::{HyperchaosSystem, initial_state_from_bytes, secret_bytes};
use crate::primitive::SBoxGenerator;

/// Integration window for S-box trajectories.
const TIME_SPAN: (f64, f64) = (0.0, 10.0);

/// Generates substitution tables from a numeric secret.
#[derive(Debug, Clone)]
pub struct HyperchaosBoxGenerator {
    secret: u64,
    box_size: usize,
    system: HyperchaosSystem,
}

impl HyperchaosBoxGenerator {
    pub fn new(secret: u64, box_size: usize) -> Result<Self, PrimitiveError> {
        Self::with_system(secret, box_size, HyperchaosSystem::default())
    }

    pub fn with_system(
        secret: u64,
        box_size: usize,
        system: HyperchaosSystem,
    ) -> Result<Self, PrimitiveError> {
        if box_size == 0 {
            return Err(PrimitiveError::invalid("box_size must be at least 1"));
        }
        if u32::try_from(box_size).is_err() {
            return Err(PrimitiveError::invalid(format!(
                "box_size {box_size} does not fit a u32 table entry"
            )));
        }
        Ok(Self {
            secret,
            box_size,
            system,
        })
    }

    pub fn secret(&self) -> u64 {
        self.secret
    }

    fn shuffle(&self) -> Vec<u32> {
        let initial = initial_state_from_bytes(&secret_bytes(self.secret));
        let trajectory = self
            .system
            .generate_sequence(&initial, TIME_SPAN, self.box_size * 2);
        let xs = trajectory.component(0);
        let ys = trajectory.component(1);

        let mut table: Vec<u32> = (0..self.box_size as u32).collect();
        for i in (1..self.box_size).rev() {
            let span = (i + 1) as f64;
            let combined = (xs[i] + ys[i]).abs();
            let swap = ((combined * span).floor() as usize) % (i + 1);
            table.swap(i, swap);
        }
        table
    }
}

impl SBoxGenerator for HyperchaosBoxGenerator {
    fn box_size(&self) -> usize {
        self.box_size
    }

    fn generate(&self) -> Result<Vec<u32>, PrimitiveError> {
        Ok(self.shuffle())
    }
}

/// True when `table` holds every value in `0..table.len()` exactly once.
pub fn is_permutation(table: &[u32]) -> bool {
    let mut seen = vec![false; table.len()];
    for &entry in table {
        match seen.get_mut(entry as usize) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

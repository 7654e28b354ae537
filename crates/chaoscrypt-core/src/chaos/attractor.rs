//! Five-dimensional four-wing hyperchaotic system.
//!
//! ```text
//! dx/dt = 10 (y - x) + u
//! dy/dt = 28 x - y - x w^2 - v
//! dw/dt = k1 x y w - k2 w + k3 v
//! du/dt = -x w^2 + 2 u
//! dv/dt = 8 y
//! ```
//!
//! Integration is fixed-step fourth-order Runge-Kutta. The system is not
//! dissipative in `u`, so every step folds components back into
//! `[-STATE_BOUND, STATE_BOUND]`; without the fold long trajectories overflow
//! to infinity and every derived byte collapses to the same value.

/// Number of state variables `(x, y, w, u, v)`.
pub const STATE_DIM: usize = 5;

/// One point in phase space.
pub type State = [f64; STATE_DIM];

/// Value used to complete a short initial state.
pub const STATE_FILL: f64 = 0.1;

/// Largest integration step, in time units.
const MAX_STEP: f64 = 1e-3;

/// Components are folded back into `[-STATE_BOUND, STATE_BOUND]`.
const STATE_BOUND: f64 = 100.0;

/// Time between keystream samples.
const KEYSTREAM_DT: f64 = 0.01;

/// A sampled trajectory: `points[i]` is the state at `times[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub points: Vec<State>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values of state variable `index` (0 = x, 1 = y, ...) over time.
    pub fn component(&self, index: usize) -> Vec<f64> {
        self.points.iter().map(|p| p[index]).collect()
    }

    /// Drop the first `skip` samples and keep at most `length` of the rest.
    pub fn window(&self, skip: usize, length: usize) -> Trajectory {
        let start = skip.min(self.points.len());
        let end = (start + length).min(self.points.len());
        Trajectory {
            times: self.times[start..end].to_vec(),
            points: self.points[start..end].to_vec(),
        }
    }

    /// Row-major flattening: all x values, then all y values, and so on.
    pub fn flatten(&self) -> Vec<f64> {
        (0..STATE_DIM).flat_map(|i| self.component(i)).collect()
    }
}

/// Control parameters of the hyperchaotic system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperchaosSystem {
    k1: f64,
    k2: f64,
    k3: f64,
}

impl Default for HyperchaosSystem {
    fn default() -> Self {
        Self::new(1.0, 4.0, 1.2)
    }
}

impl HyperchaosSystem {
    /// Build a system, clamping the parameters to the range where the
    /// attractor is known to be chaotic.
    pub fn new(k1: f64, k2: f64, k3: f64) -> Self {
        Self {
            k1: k1.clamp(0.1, 10.0),
            k2: k2.clamp(1.0, 20.0),
            k3: k3.clamp(0.1, 5.0),
        }
    }

    pub fn params(&self) -> (f64, f64, f64) {
        (self.k1, self.k2, self.k3)
    }

    fn derivatives(&self, s: &State) -> State {
        let [x, y, w, u, v] = *s;
        [
            10.0 * (y - x) + u,
            28.0 * x - y - x * w * w - v,
            self.k1 * x * y * w - self.k2 * w + self.k3 * v,
            -x * w * w + 2.0 * u,
            8.0 * y,
        ]
    }

    fn rk4_step(&self, s: &State, dt: f64) -> State {
        let offset = |base: &State, k: &State, h: f64| -> State {
            let mut out = *base;
            for i in 0..STATE_DIM {
                out[i] += h * k[i];
            }
            out
        };
        let k1 = self.derivatives(s);
        let k2 = self.derivatives(&offset(s, &k1, dt / 2.0));
        let k3 = self.derivatives(&offset(s, &k2, dt / 2.0));
        let k4 = self.derivatives(&offset(s, &k3, dt));
        let mut next = *s;
        for i in 0..STATE_DIM {
            next[i] += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        fold(&mut next);
        next
    }

    /// Integrate from `initial` over `time_span`, sampling `num_points`
    /// evenly spaced states (both ends included).
    ///
    /// A short `initial` slice is completed with [`STATE_FILL`]; extra
    /// values are ignored.
    pub fn generate_sequence(
        &self,
        initial: &[f64],
        time_span: (f64, f64),
        num_points: usize,
    ) -> Trajectory {
        let (t0, t1) = (time_span.0.min(time_span.1), time_span.0.max(time_span.1));
        let mut state = complete_state(initial);
        let mut times = Vec::with_capacity(num_points);
        let mut points = Vec::with_capacity(num_points);
        if num_points == 0 {
            return Trajectory { times, points };
        }

        let gap = if num_points > 1 {
            (t1 - t0) / (num_points - 1) as f64
        } else {
            0.0
        };
        let substeps = (gap / MAX_STEP).ceil().max(1.0) as usize;
        let dt = gap / substeps as f64;

        times.push(t0);
        points.push(state);
        for i in 1..num_points {
            for _ in 0..substeps {
                state = self.rk4_step(&state, dt);
            }
            times.push(t0 + gap * i as f64);
            points.push(state);
        }
        Trajectory { times, points }
    }

    /// Sample `length` states spaced `0.01` apart after discarding `skip`
    /// transient samples.
    pub fn generate_keystream(&self, initial: &[f64], length: usize, skip: usize) -> Trajectory {
        let total = length + skip;
        let span = (0.0, total as f64 * KEYSTREAM_DT);
        self.generate_sequence(initial, span, total)
            .window(skip, length)
    }

    /// Derive `num_bytes` bytes from the x and y components of the keystream.
    pub fn generate_bytes(&self, initial: &[f64], num_bytes: usize, skip: usize) -> Vec<u8> {
        let stream = self.generate_keystream(initial, num_bytes, skip);
        stream
            .points
            .iter()
            .map(|p| state_to_byte(p[0], p[1]))
            .collect()
    }

    /// Split `block_size * num_blocks` keystream bytes into blocks.
    pub fn generate_block(
        &self,
        initial: &[f64],
        block_size: usize,
        num_blocks: usize,
        skip: usize,
    ) -> Vec<Vec<u8>> {
        if block_size == 0 {
            return vec![Vec::new(); num_blocks];
        }
        self.generate_bytes(initial, block_size * num_blocks, skip)
            .chunks(block_size)
            .map(<[u8]>::to_vec)
            .collect()
    }
}

/// Pad or truncate an initial condition to exactly five components.
pub fn complete_state(initial: &[f64]) -> State {
    let mut state = [STATE_FILL; STATE_DIM];
    for (slot, &value) in state.iter_mut().zip(initial) {
        *slot = value;
    }
    state
}

fn fold(state: &mut State) {
    for v in state.iter_mut() {
        if !v.is_finite() {
            *v = STATE_FILL;
        } else if v.abs() > STATE_BOUND {
            *v = (*v + STATE_BOUND).rem_euclid(2.0 * STATE_BOUND) - STATE_BOUND;
        }
    }
}

fn state_to_byte(x: f64, y: f64) -> u8 {
    let value = (x.abs() * 128.0 + y.abs() * 128.0).rem_euclid(256.0);
    // rem_euclid can round up to exactly 256.0
    (value as u32 % 256) as u8
}

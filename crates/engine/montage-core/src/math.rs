//! Scalar helpers shared by the sequencer, templates and camera rig.

use std::f32::consts::TAU;

#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        return lo;
    }
    v.max(lo).min(hi)
}

/// Clamp into `[0, 1]`; NaN maps to 0.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    clamp(v, 0.0, 1.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

#[inline]
pub fn add3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Normalized progress of `value` between `start` and `end`, clamped.
#[inline]
pub fn progress(value: f32, start: f32, end: f32) -> f32 {
    let span = end - start;
    if span <= 0.0 {
        return if value >= end { 1.0 } else { 0.0 };
    }
    clamp01((value - start) / span)
}

/// Blend factor for frame-rate independent exponential damping: `1 - exp(-lambda * dt)`.
#[inline]
pub fn damp_factor(lambda: f32, dt: f32) -> f32 {
    if !(lambda > 0.0) || !(dt > 0.0) {
        return if lambda.is_infinite() { 1.0 } else { 0.0 };
    }
    1.0 - (-lambda * dt).exp()
}

/// One damping step of `current` toward `target`.
#[inline]
pub fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    current + (target - current) * damp_factor(lambda, dt)
}

#[inline]
pub fn damp3(current: [f32; 3], target: [f32; 3], lambda: f32, dt: f32) -> [f32; 3] {
    let k = damp_factor(lambda, dt);
    [
        current[0] + (target[0] - current[0]) * k,
        current[1] + (target[1] - current[1]) * k,
        current[2] + (target[2] - current[2]) * k,
    ]
}

/// Integer hash (lowbias32) used to derive per-frame seeds.
#[inline]
pub fn hash_u32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Seed for a frame, mixed with a per-effect salt so unrelated effects decorrelate.
#[inline]
pub fn hash_frame(frame: u32, salt: u32) -> u32 {
    hash_u32(frame ^ hash_u32(salt.wrapping_add(0x9e37_79b9)))
}

/// Deterministic value in `[0, 1)` derived from `seed`.
#[inline]
pub fn seeded_random(seed: u32) -> f32 {
    (hash_u32(seed) >> 8) as f32 / (1u32 << 24) as f32
}

/// Deterministic value in `[-1, 1)`.
#[inline]
pub fn seeded_signed(seed: u32) -> f32 {
    seeded_random(seed) * 2.0 - 1.0
}

/// Small deterministic stream of values, for tests and procedural layouts.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_f32(&mut self) -> f32 {
        self.state = self.state.wrapping_add(0x9e37_79b9);
        seeded_random(self.state)
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lerp(lo, hi, self.next_f32())
    }
}

const NOISE_FREQS: [f32; 3] = [0.37, 0.83, 1.91];
const NOISE_AMPS: [f32; 3] = [0.6, 0.3, 0.1];

/// Band-limited noise in `[-1, 1]`: a sum of sines at incommensurate frequencies with seeded
/// phases. Continuous in `time`, so sampling it every frame never produces per-frame jumps.
pub fn smooth_noise(time: f32, seed: u32, frequency_scale: f32) -> f32 {
    let mut sum = 0.0;
    for (i, (freq, amp)) in NOISE_FREQS.iter().zip(NOISE_AMPS.iter()).enumerate() {
        let phase = seeded_random(hash_u32(seed.wrapping_add(i as u32))) * TAU;
        sum += amp * (TAU * freq * frequency_scale * time + phase).sin();
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp01_handles_nan_and_bounds() {
        assert_eq!(clamp01(f32::NAN), 0.0);
        assert_eq!(clamp01(-2.0), 0.0);
        assert_eq!(clamp01(3.0), 1.0);
        assert_eq!(clamp01(0.25), 0.25);
    }

    #[test]
    fn damp_converges_and_is_rate_independent() {
        // Two half steps equal one full step.
        let one = damp(0.0, 1.0, 3.0, 0.2);
        let half = damp(damp(0.0, 1.0, 3.0, 0.1), 1.0, 3.0, 0.1);
        assert!((one - half).abs() < 1e-6);
        assert_eq!(damp(0.5, 1.0, 0.0, 0.1), 0.5);
    }

    #[test]
    fn seeded_random_is_stable_and_bounded() {
        for seed in 0..1000 {
            let a = seeded_random(seed);
            assert_eq!(a, seeded_random(seed));
            assert!((0.0..1.0).contains(&a));
        }
        assert_ne!(hash_frame(10, 1), hash_frame(10, 2));
    }

    #[test]
    fn smooth_noise_is_continuous() {
        let dt = 1.0 / 30.0;
        let mut prev = smooth_noise(0.0, 7, 1.0);
        for i in 1..300 {
            let v = smooth_noise(i as f32 * dt, 7, 1.0);
            assert!(v.abs() <= 1.0);
            assert!((v - prev).abs() < 0.5);
            prev = v;
        }
    }
}

//! Zero scanning of the Riemann zeta function on the critical line.
//!
//! Zeros of ζ(1/2 + it) coincide with sign changes of the real-valued
//! Riemann–Siegel function Z(t). `siegel_z` evaluates Z with the
//! Riemann–Siegel formula (main sum plus the C0 and C1 remainder terms),
//! which is accurate to roughly 1e-7 near t = 3e4 and degrades to ~1e-3 near
//! the first zero. `scan_zeros` walks a fixed grid and refines every sign
//! change by bisection.

use crate::config::ZetaConfig;
use crate::error::{ResonanceError, Result};
use serde::Serialize;
use std::f64::consts::{PI, TAU};
use std::fmt;

/// Below 2π the main sum is empty and the formula has no meaning.
pub const MIN_HEIGHT: f64 = TAU;

const BISECT_TOL: f64 = 1e-10;
const BISECT_MAX_ITER: usize = 200;

/// Taylor coefficients of C0 in powers of z², z = 1 - 2p.
const C0: [f64; 15] = [
    0.382_683_432_365_089_77,
    0.437_240_468_077_520_45,
    0.132_376_575_480_343_52,
    -0.013_605_026_047_674_19,
    -0.013_567_621_970_103_58,
    -0.001_623_725_323_144_47,
    0.000_297_053_537_333_80,
    0.000_079_433_008_795_21,
    0.000_000_465_561_246_15,
    -0.000_001_432_725_163_10,
    -0.000_000_103_548_471_12,
    0.000_000_012_357_927_08,
    0.000_000_001_788_108_39,
    -0.000_000_000_033_914_14,
    -0.000_000_000_016_326_63,
];

/// Taylor coefficients of C1 in odd powers of z.
const C1: [f64; 11] = [
    0.026_825_102_628_375_35,
    -0.013_784_773_426_351_85,
    -0.038_491_250_482_235_08,
    -0.009_871_066_299_062_08,
    0.003_310_759_760_858_40,
    0.001_464_780_857_795_42,
    0.000_013_207_940_624_88,
    -0.000_059_227_487_018_47,
    -0.000_005_980_242_585_37,
    0.000_000_964_132_245_62,
    0.000_000_183_347_337_22,
];

fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Riemann–Siegel theta function, asymptotic expansion.
pub fn theta(t: f64) -> f64 {
    t / 2.0 * (t / TAU).ln() - t / 2.0 - PI / 8.0 + 1.0 / (48.0 * t) + 7.0 / (5760.0 * t.powi(3))
}

/// Riemann–Siegel Z(t) for `t >= MIN_HEIGHT`.
pub fn siegel_z(t: f64) -> f64 {
    let a = (t / TAU).sqrt();
    let n = a.floor();
    let th = theta(t);

    let mut sum = 0.0;
    for k in 1..=(n as u64) {
        let k = k as f64;
        sum += (th - t * k.ln()).cos() / k.sqrt();
    }

    let z = 1.0 - 2.0 * (a - n);
    let z2 = z * z;
    let c0 = horner(&C0, z2);
    let c1 = z * horner(&C1, z2);
    let sign = if (n as u64) % 2 == 1 { 1.0 } else { -1.0 };
    2.0 * sum + sign * (c0 + c1 / a) / a.sqrt()
}

fn bisect(f: impl Fn(f64) -> f64, mut lo: f64, mut hi: f64) -> f64 {
    let mut f_lo = f(lo);
    for _ in 0..BISECT_MAX_ITER {
        if hi - lo < BISECT_TOL {
            break;
        }
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 {
            return mid;
        }
        if (f_mid < 0.0) == (f_lo < 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Upper bound on grid intervals in one scan.
pub const MAX_INTERVALS: usize = 10_000_000;

/// Number of grid intervals `[start + (i-1)*step, start + i*step]` whose left
/// edge lies before `end`.
pub fn grid_intervals(start: f64, end: f64, step: f64) -> f64 {
    ((end - start) / step - 1e-9).ceil()
}

fn check_range(start: f64, end: f64, step: f64) -> Result<usize> {
    let finite = start.is_finite() && end.is_finite() && step.is_finite();
    if !finite || step <= 0.0 || start >= end {
        return Err(ResonanceError::InvalidScanRange { start, end, step });
    }
    if start < MIN_HEIGHT {
        return Err(ResonanceError::HeightOutOfDomain(start));
    }
    let intervals = grid_intervals(start, end, step);
    if intervals > MAX_INTERVALS as f64 {
        return Err(ResonanceError::ScanTooFine {
            step,
            intervals,
            max: MAX_INTERVALS,
        });
    }
    Ok(intervals as usize)
}

/// Roots of `f` on the grid `start + i*step`, `i = 0..=intervals`.
///
/// A grid point where `f` is exactly zero is a root on its own and is never
/// the endpoint of a bisected interval, so it is reported once.
fn scan_sign_changes(f: impl Fn(f64) -> f64, start: f64, step: f64, intervals: usize) -> Vec<f64> {
    let mut roots = Vec::new();
    let mut prev_t = start;
    let mut prev_v = f(prev_t);
    if prev_v == 0.0 {
        roots.push(prev_t);
    }
    for i in 1..=intervals {
        let t = start + i as f64 * step;
        let v = f(t);
        if v == 0.0 {
            roots.push(t);
        } else if prev_v != 0.0 && (v < 0.0) != (prev_v < 0.0) {
            let root = bisect(&f, prev_t, t);
            tracing::debug!(t = root, "zero crossing");
            roots.push(root);
        }
        prev_t = t;
        prev_v = v;
    }
    roots
}

/// Zeros of Z in `[start, end)` found on the grid `start + i*step`.
///
/// The last grid interval begins before `end` and may extend past it. A
/// crossing inside that overhang is still found; one past it is not.
pub fn scan_zeros(start: f64, end: f64, step: f64) -> Result<Vec<f64>> {
    let intervals = check_range(start, end, step)?;
    Ok(scan_sign_changes(siegel_z, start, step, intervals))
}

/// Evenly spaced samples of Z over `[start, end]`, endpoints included.
pub fn sample_curve(start: f64, end: f64, samples: usize) -> Vec<(f64, f64)> {
    match samples {
        0 => Vec::new(),
        1 => vec![(start, siegel_z(start))],
        n => {
            let dt = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    let t = start + i as f64 * dt;
                    (t, siegel_z(t))
                })
                .collect()
        }
    }
}

/// Riemann–von Mangoldt estimate of the number of zeros with 0 < Im ≤ T.
pub fn approximate_index(height: f64) -> f64 {
    let x = height / TAU;
    x * x.ln() - x + 0.875
}

// ---------------------------------------------------------------------------
// Proximity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "DIRECT HIT")]
    DirectHit,
    #[serde(rename = "NEAR MISS")]
    NearMiss,
    #[serde(rename = "MISS")]
    Miss,
}

impl Verdict {
    pub fn classify(distance: f64, direct_hit: f64, near_miss: f64) -> Self {
        if distance < direct_hit {
            Verdict::DirectHit
        } else if distance < near_miss {
            Verdict::NearMiss
        } else {
            Verdict::Miss
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::DirectHit => "DIRECT HIT",
            Verdict::NearMiss => "NEAR MISS",
            Verdict::Miss => "MISS",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Proximity {
    pub target: u64,
    pub nearest: f64,
    pub distance: f64,
    pub verdict: Verdict,
}

/// Nearest zero to `target`, or `None` when no zeros were found.
pub fn proximity(
    target: u64,
    zeros: &[f64],
    direct_hit: f64,
    near_miss: f64,
) -> Option<Proximity> {
    let t = target as f64;
    let nearest = zeros
        .iter()
        .copied()
        .min_by(|a, b| (a - t).abs().total_cmp(&(b - t).abs()))?;
    let distance = (nearest - t).abs();
    Some(Proximity {
        target,
        nearest,
        distance,
        verdict: Verdict::classify(distance, direct_hit, near_miss),
    })
}

// ---------------------------------------------------------------------------
// ZetaReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ZetaReport {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    pub zeros: Vec<f64>,
    pub proximity: Vec<Proximity>,
    pub index_height: f64,
    pub approximate_index: f64,
}

pub fn run_scan(cfg: &ZetaConfig) -> Result<ZetaReport> {
    tracing::info!(start = cfg.start, end = cfg.end, step = cfg.step, "scanning critical line");
    let zeros = scan_zeros(cfg.start, cfg.end, cfg.step)?;
    let proximity = cfg
        .targets
        .iter()
        .filter_map(|&target| proximity(target, &zeros, cfg.direct_hit, cfg.near_miss))
        .collect();
    Ok(ZetaReport {
        start: cfg.start,
        end: cfg.end,
        step: cfg.step,
        zeros,
        proximity,
        index_height: cfg.index_height,
        approximate_index: approximate_index(cfg.index_height),
    })
}

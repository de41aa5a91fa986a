use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// AmplitudeClass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AmplitudeClass {
    Prime,
    Composite,
    PrimorialSingularity,
}

impl AmplitudeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            AmplitudeClass::Prime => "PRIME",
            AmplitudeClass::Composite => "COMPOSITE",
            AmplitudeClass::PrimorialSingularity => "PRIMORIAL_SINGULARITY",
        }
    }
}

impl fmt::Display for AmplitudeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AmplitudeClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRIME" => Ok(AmplitudeClass::Prime),
            "COMPOSITE" => Ok(AmplitudeClass::Composite),
            "PRIMORIAL_SINGULARITY" => Ok(AmplitudeClass::PrimorialSingularity),
            other => Err(format!("unknown amplitude class: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// TargetSpec
// ---------------------------------------------------------------------------

/// Inclusive amplitude range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmplitudeRange {
    pub start: u64,
    pub end: u64,
}

impl AmplitudeRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, amplitude: u64) -> bool {
        (self.start..=self.end).contains(&amplitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSpec {
    #[serde(default = "default_ranges")]
    pub ranges: Vec<AmplitudeRange>,
    #[serde(default = "default_extra")]
    pub extra: Vec<u64>,
    #[serde(default = "default_singularities")]
    pub singularities: Vec<u64>,
}

fn default_ranges() -> Vec<AmplitudeRange> {
    vec![
        // foundation
        AmplitudeRange::new(5, 50),
        // singularity sector around 30030
        AmplitudeRange::new(30020, 30040),
    ]
}

fn default_extra() -> Vec<u64> {
    vec![137, 360, 720, 1000, 2520, 5040]
}

fn default_singularities() -> Vec<u64> {
    vec![30030]
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            ranges: default_ranges(),
            extra: default_extra(),
            singularities: default_singularities(),
        }
    }
}

impl TargetSpec {
    /// All amplitudes, deduplicated and ascending.
    pub fn amplitudes(&self) -> Vec<u64> {
        let mut set = BTreeSet::new();
        for r in &self.ranges {
            set.extend(r.start..=r.end);
        }
        set.extend(self.extra.iter().copied());
        set.into_iter().collect()
    }

    pub fn classify(&self, amplitude: u64) -> AmplitudeClass {
        if self.singularities.contains(&amplitude) {
            AmplitudeClass::PrimorialSingularity
        } else if is_prime(amplitude) {
            AmplitudeClass::Prime
        } else {
            AmplitudeClass::Composite
        }
    }
}

// ---------------------------------------------------------------------------
// Number theory helpers
// ---------------------------------------------------------------------------

/// Witnesses that make Miller–Rabin deterministic over all of `u64`.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1u64;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    'witness: for a in WITNESSES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// True when `n` is the product of the first k primes for some k >= 1.
pub fn is_primorial(n: u64) -> bool {
    let mut product = 1u64;
    let mut p = 2u64;
    while product < n {
        if is_prime(p) {
            product = match product.checked_mul(p) {
                Some(v) => v,
                None => return false,
            };
        }
        p += 1;
    }
    product == n && n > 1
}

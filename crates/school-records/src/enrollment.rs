//! # Enrollment Codes
//!
//! Students without an enrollment code get one of the form `<year><6 digits>`, e.g.
//! `2024537182`. The generator makes no uniqueness promise: about one code in 900 000 per
//! year collides, and the student service retries against the unique index when it does.

use chrono::{Datelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const SUFFIX_MIN: u32 = 100_000;
const SUFFIX_MAX: u32 = 999_999;

pub struct EnrollmentCodeGenerator {
    rng: Mutex<StdRng>,
    fixed_year: Option<i32>,
}

impl Default for EnrollmentCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrollmentCodeGenerator {
    /// Entropy-seeded generator using the wall-clock year.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            fixed_year: None,
        }
    }

    /// Deterministic generator: same seed, same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            fixed_year: None,
        }
    }

    /// Pin the year instead of reading the clock.
    pub fn with_fixed_year(mut self, year: i32) -> Self {
        self.fixed_year = Some(year);
        self
    }

    pub fn current_year(&self) -> i32 {
        self.fixed_year.unwrap_or_else(|| Utc::now().year())
    }

    pub fn generate(&self) -> String {
        let suffix = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.gen_range(SUFFIX_MIN..=SUFFIX_MAX)
        };
        format!("{}{suffix}", self.current_year())
    }
}

/// True when `code` has the generated shape `<4-digit year><6-digit number>`.
pub fn is_generated_shape(code: &str) -> bool {
    code.len() == 10
        && code.bytes().all(|b| b.is_ascii_digit())
        && code[4..].parse::<u32>().is_ok_and(|n| (SUFFIX_MIN..=SUFFIX_MAX).contains(&n))
}

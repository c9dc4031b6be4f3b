use rand::Rng;
use std::{
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How new short codes are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStrategy {
    /// Uniform random alphanumeric string.
    Random,
    /// Leading decimal digits of the current Unix time in nanoseconds.
    /// Collides easily; only kept for compatibility with timestamp-style codes.
    ///
    /// The timestamp has [`TIMESTAMP_DIGITS`] digits, so longer codes are not
    /// possible. At length 8 the code changes once every 100 seconds, so at
    /// most one create per 100-second window succeeds.
    Timestamp,
}

/// Decimal digits in a nanosecond Unix timestamp (until the year 2286).
pub const TIMESTAMP_DIGITS: usize = 19;

impl FromStr for CodeStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "random" => Ok(Self::Random),
            "timestamp" => Ok(Self::Timestamp),
            other => anyhow::bail!("SHORT_CODE_STRATEGY must be 'random' or 'timestamp', got '{other}'"),
        }
    }
}

/// Short-code generator settings shared by every create request.
#[derive(Debug, Clone)]
pub struct ShortCodes {
    pub strategy: CodeStrategy,
    pub length: usize,
    /// Upper bound on insert attempts when a generated code is already taken.
    pub attempts: u32,
}

impl ShortCodes {
    pub fn new(strategy: CodeStrategy, length: usize, attempts: u32) -> Self {
        Self {
            strategy,
            length,
            attempts,
        }
    }

    pub fn generate(&self) -> String {
        match self.strategy {
            CodeStrategy::Random => random_code(&mut rand::thread_rng(), self.length),
            CodeStrategy::Timestamp => timestamp_code(self.length),
        }
    }
}

impl Default for ShortCodes {
    fn default() -> Self {
        Self::new(CodeStrategy::Random, 8, 5)
    }
}

fn random_code(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}

fn timestamp_code(len: usize) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let mut digits = nanos.to_string();
    digits.truncate(len);
    digits
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn random_codes_are_alphanumeric_with_requested_length() {
        let codes = ShortCodes::new(CodeStrategy::Random, 8, 1);
        for _ in 0..100 {
            let code = codes.generate();
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn seeded_rng_gives_reproducible_codes() {
        let first = random_code(&mut StdRng::seed_from_u64(7), 8);
        let again = random_code(&mut StdRng::seed_from_u64(7), 8);
        assert_eq!(first, again);

        let mut rng = StdRng::seed_from_u64(7);
        let a = random_code(&mut rng, 8);
        let b = random_code(&mut rng, 8);
        assert_eq!(a, first);
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_rng_covers_the_whole_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<char> = random_code(&mut rng, 10_000).chars().collect();
        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[test]
    fn timestamp_codes_fit_in_the_digit_count() {
        let code = ShortCodes::new(CodeStrategy::Timestamp, TIMESTAMP_DIGITS, 1).generate();
        assert_eq!(code.len(), TIMESTAMP_DIGITS);
    }

    #[test]
    fn timestamp_codes_are_truncated_digits() {
        let code = ShortCodes::new(CodeStrategy::Timestamp, 8, 1).generate();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn parses_strategy_names() {
        assert_eq!("random".parse::<CodeStrategy>().unwrap(), CodeStrategy::Random);
        assert_eq!(" timestamp ".parse::<CodeStrategy>().unwrap(), CodeStrategy::Timestamp);
        assert!("sequence".parse::<CodeStrategy>().is_err());
    }
}

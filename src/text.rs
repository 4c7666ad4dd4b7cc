//! Challenge text generation.
//!
//! Not cryptographically secure: callers choose the RNG, and the widget uses a
//! `SmallRng` seeded once from `getrandom`.

use rand::Rng;

use crate::config::{CaptchaConfig, CaseType, CharsType, MAX_LENGTH};

const DIGITS: &str = "0123456789";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Resolve the alphabet for a class/case pair.
///
/// The case transform keeps duplicates (`upper` turns `a-zA-Z` into two copies
/// of `A-Z`) so sampling weights stay what hosts already observe.
pub fn alphabet(chars: CharsType, case: CaseType) -> Vec<char> {
    let base = match chars {
        CharsType::Numbers => DIGITS.chars().collect::<Vec<_>>(),
        CharsType::Letters => LOWER.chars().chain(UPPER.chars()).collect(),
        CharsType::Alphanumeric => DIGITS.chars().chain(LOWER.chars()).chain(UPPER.chars()).collect(),
    };
    match case {
        CaseType::Lower => base.iter().map(char::to_ascii_lowercase).collect(),
        CaseType::Upper => base.iter().map(char::to_ascii_uppercase).collect(),
        CaseType::Mixed => base,
    }
}

/// Draw `config.length` characters (at most `MAX_LENGTH`), each uniformly and
/// independently from the resolved alphabet.
pub fn generate_text<R: Rng>(rng: &mut R, config: &CaptchaConfig) -> String {
    let pool = alphabet(config.chars, config.case);
    (0..config.length.min(MAX_LENGTH))
        .map(|_| pool[rng.gen_range(0..pool.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn cfg(length: usize, chars: CharsType, case: CaseType) -> CaptchaConfig {
        CaptchaConfig { length, chars, case, ..CaptchaConfig::default() }
    }

    #[test]
    fn alphabet_sizes() {
        assert_eq!(alphabet(CharsType::Numbers, CaseType::Mixed).len(), 10);
        assert_eq!(alphabet(CharsType::Letters, CaseType::Mixed).len(), 52);
        assert_eq!(alphabet(CharsType::Alphanumeric, CaseType::Mixed).len(), 62);
        // duplicates survive the case transform
        assert_eq!(alphabet(CharsType::Alphanumeric, CaseType::Upper).len(), 62);
    }

    #[test]
    fn numbers_ignore_case() {
        let lower = alphabet(CharsType::Numbers, CaseType::Lower);
        let upper = alphabet(CharsType::Numbers, CaseType::Upper);
        assert_eq!(lower, upper);
    }

    #[test]
    fn exact_length() {
        let mut rng = SmallRng::seed_from_u64(7);
        for len in [0, 1, 6, 32] {
            let text = generate_text(&mut rng, &cfg(len, CharsType::Alphanumeric, CaseType::Mixed));
            assert_eq!(text.chars().count(), len);
        }
    }

    #[test]
    fn zero_length_is_empty() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(generate_text(&mut rng, &cfg(0, CharsType::Letters, CaseType::Lower)).is_empty());
    }

    #[test]
    fn oversized_length_is_capped() {
        let mut rng = SmallRng::seed_from_u64(4);
        let text = generate_text(&mut rng, &cfg(usize::MAX, CharsType::Numbers, CaseType::Mixed));
        assert_eq!(text.len(), MAX_LENGTH);
    }

    #[test]
    fn same_seed_same_text() {
        let c = CaptchaConfig::default();
        let a = generate_text(&mut SmallRng::seed_from_u64(42), &c);
        let b = generate_text(&mut SmallRng::seed_from_u64(42), &c);
        assert_eq!(a, b);
    }
}

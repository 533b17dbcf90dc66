use crate::engine::config::ConfigError;
use rand::Rng;

/// Letters naming the copolymer components, in order.
pub const COPOLYMER_LETTERS: &str = "ABCDEFGHIJK";

/// Draws a random copolymer sequence of `n_monomers` letters.
///
/// Each position is one of the first `n_copolymers` letters of
/// [`COPOLYMER_LETTERS`], chosen with equal probability. The generator is
/// supplied by the caller, so a seeded one gives a reproducible sequence.
pub fn random_sequence<R: Rng + ?Sized>(
    n_copolymers: usize,
    n_monomers: usize,
    rng: &mut R,
) -> Result<String, ConfigError> {
    let letters = COPOLYMER_LETTERS.as_bytes();
    if n_copolymers == 0 || n_copolymers > letters.len() {
        return Err(ConfigError::InvalidParameter {
            parameter: "n_copolymers",
            reason: format!(
                "must be between 1 and {}, got {}",
                letters.len(),
                n_copolymers
            ),
        });
    }

    Ok((0..n_monomers)
        .map(|_| char::from(letters[rng.gen_range(0..n_copolymers)]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn same_seed_gives_the_same_sequence() {
        let first = random_sequence(3, 50, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = random_sequence(3, 50, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 50);
    }

    #[test]
    fn only_the_requested_letters_appear() {
        let mut rng = StdRng::seed_from_u64(42);
        let sequence = random_sequence(2, 500, &mut rng).unwrap();
        assert!(sequence.chars().all(|c| c == 'A' || c == 'B'));
        assert!(sequence.contains('A'));
        assert!(sequence.contains('B'));
    }

    #[test]
    fn every_letter_is_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let sequence = random_sequence(11, 2000, &mut rng).unwrap();
        for letter in COPOLYMER_LETTERS.chars() {
            assert!(sequence.contains(letter), "{} missing", letter);
        }
    }

    #[test]
    fn single_component_is_a_homopolymer() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(random_sequence(1, 5, &mut rng).unwrap(), "AAAAA");
        assert_eq!(random_sequence(4, 0, &mut rng).unwrap(), "");
    }

    #[test]
    fn component_count_is_bounded() {
        let mut rng = StdRng::seed_from_u64(0);
        for n in [0, 12] {
            assert!(matches!(
                random_sequence(n, 10, &mut rng),
                Err(ConfigError::InvalidParameter {
                    parameter: "n_copolymers",
                    ..
                })
            ));
        }
    }
}

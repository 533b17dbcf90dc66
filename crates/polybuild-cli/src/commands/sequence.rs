use crate::cli::SequenceArgs;
use crate::error::Result;
use polybuild::workflows::sequence::random_sequence;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

pub fn run(args: SequenceArgs) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => {
            info!("Seeding sequence generator with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let sequence = random_sequence(args.copolymers, args.monomers, &mut rng)?;
    println!("{}", sequence);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_component_count_is_reported() {
        let args = SequenceArgs {
            copolymers: 12,
            monomers: 5,
            seed: Some(1),
        };
        assert!(run(args).is_err());
    }
}

//! Simulation scenarios.

use rand::rngs::StdRng;
use rand::Rng;

/// Named load shape for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Uniformly random distinct pairs.
    Random,
    /// Transfers around the account ring, i to i+1.
    Cycle,
    /// All workers hammer accounts 0 and 1 in alternating directions.
    HotPair,
}

impl Scenario {
    /// Load a scenario by name.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        match name {
            "random" => Ok(Self::Random),
            "cycle" => Ok(Self::Cycle),
            "hot-pair" => Ok(Self::HotPair),
            _ => Err(anyhow::anyhow!("Unknown scenario: {}", name)),
        }
    }

    /// Scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Cycle => "cycle",
            Self::HotPair => "hot-pair",
        }
    }

    /// One-line description for startup logging.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Random => "uniformly random transfers between distinct accounts",
            Self::Cycle => "transfers around the account ring",
            Self::HotPair => "opposite-direction transfers over one account pair",
        }
    }

    /// Pick the (from, to) account indices for one transfer.
    pub fn pick_pair(
        &self,
        rng: &mut StdRng,
        worker: usize,
        iteration: usize,
        accounts: usize,
    ) -> (usize, usize) {
        match self {
            Self::Random => {
                let from = rng.gen_range(0..accounts);
                let mut to = rng.gen_range(0..accounts);
                while to == from {
                    to = rng.gen_range(0..accounts);
                }
                (from, to)
            }
            Self::Cycle => {
                let from = (worker + iteration) % accounts;
                (from, (from + 1) % accounts)
            }
            Self::HotPair => {
                if (worker + iteration) % 2 == 0 {
                    (0, 1)
                } else {
                    (1, 0)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_load_by_name() {
        assert_eq!(Scenario::load("random").unwrap(), Scenario::Random);
        assert_eq!(Scenario::load("cycle").unwrap(), Scenario::Cycle);
        assert_eq!(Scenario::load("hot-pair").unwrap(), Scenario::HotPair);
        assert!(Scenario::load("does-not-exist").is_err());
    }

    #[test]
    fn test_random_never_picks_self() {
        let mut rng = StdRng::seed_from_u64(7);
        for iteration in 0..1000 {
            let (from, to) = Scenario::Random.pick_pair(&mut rng, 0, iteration, 4);
            assert_ne!(from, to);
            assert!(from < 4 && to < 4);
        }
    }

    #[test]
    fn test_cycle_moves_to_the_next_account() {
        let mut rng = StdRng::seed_from_u64(7);
        for worker in 0..3 {
            for iteration in 0..10 {
                let (from, to) = Scenario::Cycle.pick_pair(&mut rng, worker, iteration, 5);
                assert_eq!(to, (from + 1) % 5);
            }
        }
    }

    #[test]
    fn test_hot_pair_alternates_direction() {
        let mut rng = StdRng::seed_from_u64(7);
        let first = Scenario::HotPair.pick_pair(&mut rng, 0, 0, 8);
        let second = Scenario::HotPair.pick_pair(&mut rng, 0, 1, 8);
        assert_eq!(first, (0, 1));
        assert_eq!(second, (1, 0));
    }
}

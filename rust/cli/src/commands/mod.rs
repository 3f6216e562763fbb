//! Command handler modules for the evohold CLI.
//!
//! Every subcommand lives in its own file and follows the same pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed as parameters
//! - Errors propagated via `CliError`; the dispatcher maps them to exit code `2`

mod breed;
mod cfg;
mod compare;
mod evaluate;
mod import;
mod leaderboard;
mod spawn;
mod validate;

pub use breed::{handle_breed_command, BreedArgs};
pub use cfg::handle_cfg_command;
pub use compare::handle_compare_command;
pub use evaluate::{handle_evaluate_command, EvaluateArgs};
pub use import::handle_import_command;
pub use leaderboard::handle_leaderboard_command;
pub use spawn::handle_spawn_command;
pub use validate::handle_validate_command;

use evohold_genetics::breeder::BreederConfig;

use crate::config::Config;

/// Breeder settings for a command run: the resolved seed plus the
/// configured base mutation rate and strength.
pub(crate) fn breeder_config(seed: Option<u64>, cfg: &Config) -> BreederConfig {
    BreederConfig {
        seed,
        base_mutation_rate: cfg.mutation_rate,
        base_mutation_strength: cfg.mutation_strength,
        ..BreederConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breeder_config_carries_mutation_settings() {
        let cfg = Config {
            mutation_rate: 0.3,
            mutation_strength: 0.05,
            ..Config::default()
        };
        let bc = breeder_config(Some(9), &cfg);
        assert_eq!(bc.seed, Some(9));
        assert_eq!(bc.base_mutation_rate, 0.3);
        assert_eq!(bc.base_mutation_strength, 0.05);
        assert_eq!(
            bc.novelty_injection_rate,
            BreederConfig::default().novelty_injection_rate
        );
    }

    #[test]
    fn test_breeder_config_without_seed() {
        assert_eq!(breeder_config(None, &Config::default()).seed, None);
    }
}

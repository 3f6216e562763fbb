//! Configuration command handler.
//!
//! Prints the resolved configuration with the source of every value
//! (default, file or environment).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "hands": {
//!     "value": 1000,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "hands": {
            "value": config.hands,
            "source": sources.hands,
        },
        "duplicate_sets": {
            "value": config.duplicate_sets,
            "source": sources.duplicate_sets,
        },
        "workers": {
            "value": config.workers,
            "source": sources.workers,
        },
        "store": {
            "value": config.store,
            "source": sources.store,
        },
        "mutation_rate": {
            "value": config.mutation_rate,
            "source": sources.mutation_rate,
        },
        "mutation_strength": {
            "value": config.mutation_strength,
            "source": sources.mutation_strength,
        }
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&display)?)?;
    Ok(())
}

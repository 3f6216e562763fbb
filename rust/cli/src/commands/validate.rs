use std::io::Write;
use std::path::Path;

use evohold_genetics::sanitize::validate_external;

use crate::error::CliError;
use crate::io_utils::{read_json_file, split_submission};

/// Handle the validate command.
///
/// Strict counterpart of `import`: nothing is repaired, every problem in
/// the genome payload is listed on `out`.
pub fn handle_validate_command(input: &Path, out: &mut dyn Write) -> Result<(), CliError> {
    let (_, value) = read_json_file(input)?;
    let (payload, _) = split_submission(&value);
    let report = validate_external(payload);
    if report.is_valid() {
        writeln!(out, "OK")?;
        return Ok(());
    }
    write!(out, "{}", report)?;
    Err(CliError::InvalidInput(format!(
        "{} issue(s) found",
        report.issues.len()
    )))
}

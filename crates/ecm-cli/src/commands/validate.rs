//! Validate command implementation.

use super::read_input;
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ecm_extractor::{parse_reply, ValidationOptions};

/// Execute the validate command.
///
/// The input is a saved model reply; no model is called.
pub fn execute_validate(args: ValidateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let input = read_input(&args.input)?;
    let mut options = config.extractor.validation_options();
    options.strict_units |= args.strict_units;

    let report = validate_reply(&input.text, &options, args.nested, formatter)?;
    if !report.diagnostics.is_empty() {
        eprintln!("{}", report.diagnostics);
    }
    println!("{}", report.output);
    Ok(())
}

/// Rendered outcome of validating one reply
pub(crate) struct Report {
    pub output: String,
    pub diagnostics: String,
}

pub(crate) fn validate_reply(
    reply: &str,
    options: &ValidationOptions,
    nested: bool,
    formatter: &Formatter,
) -> Result<Report> {
    let batch = parse_reply(reply, options)?;

    let mut diagnostics = Vec::new();
    if batch.coerced_from_object {
        diagnostics.push(formatter.info("Reply was a single object; treated as one-element array"));
    }
    if !batch.failures.is_empty() {
        diagnostics.push(formatter.format_failures(&batch.failures));
    }
    diagnostics.push(formatter.extraction_summary(batch.records.len(), batch.elements_attempted));

    Ok(Report {
        output: formatter.format_records(&batch.records, nested)?,
        diagnostics: diagnostics.join("\n"),
    })
}

//! Extract command implementation.

use super::read_input;
use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use ecm_domain::traits::ModelTransport;
use ecm_extractor::{ExtractionRequest, ExtractionResult, Extractor, ExtractorConfig};
use ecm_llm::{create_transport, ProviderClient, ProviderKind};
use std::fmt::Display;
use std::sync::Arc;
use tracing::info;

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let input = read_input(&args.input)?;

    // The blocking HTTP client is built outside the async runtime
    let transport = match args.provider.as_deref() {
        Some(name) => ProviderClient::from_kind(name.parse::<ProviderKind>()?, &config.llm)?,
        None => create_transport(&config.llm, "extraction")?,
    };
    info!(
        "Using provider '{}' (default model {})",
        transport.provider_name(),
        transport.default_model()
    );

    let mut extractor_config = config.extractor.clone();
    extractor_config.strict_units |= args.strict_units;

    let request = ExtractionRequest {
        text: input.text,
        source_id: args.source_id.unwrap_or(input.name),
        model: args.model,
    };

    let transport = Arc::new(transport);
    let result = run_extraction(Arc::clone(&transport), extractor_config, request)?;

    if !result.failures.is_empty() {
        eprintln!("{}", formatter.format_failures(&result.failures));
    }
    eprintln!(
        "{}",
        formatter.extraction_summary(result.record_count(), result.metadata.elements_attempted)
    );
    println!("{}", formatter.format_records(&result.records, args.nested)?);
    eprintln!("{}", formatter.usage(&transport.usage()));

    Ok(())
}

/// Run one extraction to completion on a dedicated runtime.
pub(crate) fn run_extraction<T>(
    transport: Arc<T>,
    config: ExtractorConfig,
    request: ExtractionRequest,
) -> Result<ExtractionResult>
where
    T: ModelTransport + Send + Sync + 'static,
    T::Error: Display,
{
    config.validate().map_err(CliError::Config)?;
    let extractor = Extractor::from_arc(transport, config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(extractor.extract(request))?;
    Ok(result)
}

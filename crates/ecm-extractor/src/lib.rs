//! ECM Extractor
//!
//! Converts building energy-audit text into validated Energy Conservation
//! Measure (ECM) records using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Text → Prompt → ModelTransport → recover_json → validate → EcmRecord → flatten
//! ```
//!
//! # Key Features
//!
//! - **Schema-driven prompt**: the record schema, extraction rules, canonical
//!   units and a worked example are embedded in every prompt
//! - **Response recovery**: JSON is cut out of fenced or chatty replies
//! - **Per-element validation**: a bad element is dropped and reported with
//!   field paths; the rest of the batch survives
//! - **Flattening**: validated records project into a fixed flat shape
//!
//! # Example Usage
//!
//! ```
//! use ecm_extractor::{ExtractionRequest, Extractor, ExtractorConfig};
//! use ecm_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"[{"ecm_detail": {"name": "LED Upgrade"}}]"#);
//! let extractor = Extractor::new(llm, ExtractorConfig::default());
//!
//! let request = ExtractionRequest::new("Replace T8 lamps with LED.", "audit.pdf");
//! let result = extractor.extract(request).await?;
//!
//! assert_eq!(result.record_count(), 1);
//! for flat in result.to_flat_records() {
//!     println!("{}", flat["ecm_name"]);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod flatten;
mod parser;
mod prompt;
mod recovery;
mod schema;
mod types;
mod validate;


pub use config::{ExtractorConfig, DEFAULT_EXTRACTED_BY};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use flatten::{flatten, FlatRecord, AGGREGATE_FUEL_TYPE};
pub use parser::{parse_reply, ParsedBatch};
pub use prompt::{build_prompt, PromptBuilder, EXAMPLE_RECORD, SYSTEM_PROMPT};
pub use recovery::recover_json;
pub use schema::record_schema;
pub use types::{ElementFailure, ExtractionMetadata, ExtractionRequest, ExtractionResult};
pub use validate::{validate_record, ValidationOptions};

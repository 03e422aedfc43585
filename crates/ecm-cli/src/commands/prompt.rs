//! Prompt command implementation.

use super::read_input;
use crate::cli::InputArgs;
use crate::error::Result;
use ecm_extractor::{record_schema, PromptBuilder, SYSTEM_PROMPT};

/// Execute the prompt command.
pub fn execute_prompt(args: InputArgs) -> Result<()> {
    let input = read_input(&args)?;
    println!("{}", render_prompt(&input.text, &input.name));
    Ok(())
}

/// System and user prompt exactly as `extract` sends them.
fn render_prompt(text: &str, source_name: &str) -> String {
    let schema = record_schema();
    let user = PromptBuilder::new(text, &schema)
        .with_source_name(source_name)
        .build();
    format!("--- system ---\n{}\n\n--- user ---\n{}", SYSTEM_PROMPT, user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecm_extractor::{ExtractionRequest, Extractor, ExtractorConfig};
    use ecm_llm::MockProvider;

    #[test]
    fn test_matches_extractor_prompt() {
        let extractor = Extractor::new(MockProvider::default(), ExtractorConfig::default());
        let request = ExtractionRequest::new("Upgrade the boiler.", "audit.md");

        let rendered = render_prompt("Upgrade the boiler.", "audit.md");
        assert!(rendered.ends_with(&extractor.prompt_for(&request)));
        assert!(rendered.contains(SYSTEM_PROMPT));
    }
}

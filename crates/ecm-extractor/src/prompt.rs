//! LLM prompt engineering for ECM extraction

use ecm_domain::UnitKind;
use serde_json::Value;

/// System message sent with every extraction call
pub const SYSTEM_PROMPT: &str = "You are a data extraction assistant specialized in building energy audits. \
Extract information accurately and return valid JSON only.";

/// Builds the user prompt for one document
pub struct PromptBuilder<'a> {
    text: &'a str,
    schema: &'a Value,
    source_name: Option<&'a str>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(text: &'a str, schema: &'a Value) -> Self {
        Self {
            text,
            schema,
            source_name: None,
        }
    }

    /// Mention the source document by name
    pub fn with_source_name(mut self, name: &'a str) -> Self {
        self.source_name = Some(name).filter(|n| !n.trim().is_empty());
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(TASK_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("SCHEMA (each ECM record should match this structure):\n```json\n");
        prompt.push_str(&format!("{:#}", self.schema));
        prompt.push_str("\n```\n\n");

        prompt.push_str(EXTRACTION_GUIDELINES);
        prompt.push('\n');
        prompt.push_str(&unit_rules());
        prompt.push('\n');

        if let Some(name) = self.source_name {
            prompt.push_str(&format!("SOURCE DOCUMENT: {}\n\n", name));
        }

        prompt.push_str("DOCUMENT CONTENT:\n```markdown\n");
        prompt.push_str(self.text);
        prompt.push_str("\n```\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt.push_str("\n```json\n[\n");
        prompt.push_str(EXAMPLE_RECORD);
        prompt.push_str("\n]\n```\n\nJSON RESPONSE:");

        prompt
    }
}

/// Build the extraction prompt for `text`
///
/// Pure; an empty `text` still yields a complete prompt.
///
/// # Examples
///
/// ```
/// use ecm_extractor::{build_prompt, record_schema};
///
/// let prompt = build_prompt("Replace T8 lamps with LED.", &record_schema());
/// assert!(prompt.contains("Return ONLY a JSON array"));
/// assert!(prompt.contains("Replace T8 lamps with LED."));
/// ```
pub fn build_prompt(text: &str, schema: &Value) -> String {
    PromptBuilder::new(text, schema).build()
}

fn unit_rules() -> String {
    let mut rules = String::from("CANONICAL UNITS (use exactly these abbreviations):\n");
    for kind in UnitKind::ALL {
        rules.push_str(&format!("- {}: {}\n", kind, kind.canonical_units().join(", ")));
    }
    rules
}

const TASK_INSTRUCTIONS: &str = r#"You are an expert at extracting Energy Conservation Measure (ECM) data from building audit reports.

TASK: Extract ALL Energy Conservation Measures from the document as an array of ECM records.

IMPORTANT REQUIREMENTS:
- Return a JSON array of ECM records (even if only one ECM is found)
- Extract every measure as a separate, complete array item
- Include building information in each record when available
- Use null for missing values; do not make up data"#;

const EXTRACTION_GUIDELINES: &str = r#"EXTRACTION GUIDELINES:
1. Identify ALL Energy Conservation Measures in the document
2. For each ECM, extract:
   - Name and description
   - Cost estimates (with currency)
   - Energy savings (with units)
   - Payback period
   - Implementation status
   - Priority level if mentioned
3. Extract building information (name, address, type, floor area) if available
4. Extract audit information (date, auditor, type) if available
5. Format quantities as objects with "value" and "unit" keys; money uses "value" and "currency"
6. Normalize units: remove "/year" suffixes, write "kWh" not "kilowatt-hours"
"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"RESPONSE FORMAT:
Return ONLY a JSON array of ECM records. No additional text or explanation.

Example:"#;

/// One fully populated record, as shown to the model
pub const EXAMPLE_RECORD: &str = r#"  {
    "submission_metadata": {
      "source_filename": "office_building_a_audit.pdf",
      "extraction_date": "2024-05-01",
      "extracted_by": "ECM Extractor"
    },
    "building_snapshot": {
      "building_id": "BLDG-001",
      "building_name": "Office Building A",
      "address": "123 Main Street, Springfield",
      "property_type": "Office",
      "gross_floor_area": {"value": 50000, "unit": "sf"},
      "year_built": 1985
    },
    "audit_info": {
      "audit_date": "2024-03-15",
      "auditor_name": "Energy Partners LLC",
      "audit_type": "ASHRAE Level 2"
    },
    "ecm_detail": {
      "name": "LED Lighting Upgrade",
      "description": "Replace existing T8 fluorescent fixtures with LED",
      "ecm_category": "Lighting",
      "cost_estimate": {"value": 25000, "currency": "USD"},
      "annual_cost_savings": {"value": 5000, "currency": "USD"},
      "simple_payback": {"value": 5, "unit": "year"},
      "annual_energy_savings": {"value": 50000, "unit": "kWh"},
      "annual_demand_reduction": 12.5,
      "savings_by_fuel": [
        {
          "fuel_type": "Electricity",
          "energy_savings": {"value": 50000, "unit": "kWh"},
          "cost_savings": {"value": 5000, "currency": "USD"},
          "demand_reduction": 12.5
        }
      ],
      "implementation_status": "recommended",
      "priority": "high",
      "technical_feasibility": "No structural changes required",
      "existing_equipment": "T8 fluorescent troffers",
      "proposed_equipment": "LED troffers with occupancy sensors",
      "useful_life": {"value": 15, "unit": "year"},
      "notes": "Eligible for utility rebate"
    }
  }"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::record_schema;
    use crate::validate::{validate_record, ValidationOptions};

    #[test]
    fn test_prompt_contains_document_and_rules() {
        let schema = record_schema();
        let prompt = build_prompt("Install VFDs on AHU-1.", &schema);

        assert!(prompt.contains("Install VFDs on AHU-1."));
        assert!(prompt.contains("separate, complete array item"));
        assert!(prompt.contains("Use null for missing values"));
        assert!(prompt.contains("Return ONLY a JSON array"));
        assert!(prompt.ends_with("JSON RESPONSE:"));
    }

    #[test]
    fn test_prompt_lists_every_canonical_unit() {
        let prompt = build_prompt("", &record_schema());
        for kind in UnitKind::ALL {
            for unit in kind.canonical_units() {
                assert!(prompt.contains(unit), "missing unit {}", unit);
            }
        }
        assert!(prompt.contains("- energy: kBtu, MMBtu, Btu, kWh, MWh, GWh, therm, GJ"));
    }

    #[test]
    fn test_prompt_embeds_schema() {
        let schema = record_schema();
        let prompt = build_prompt("x", &schema);
        assert!(prompt.contains(&format!("{:#}", schema)));
    }

    #[test]
    fn test_empty_text_still_builds() {
        let prompt = build_prompt("", &record_schema());
        assert!(prompt.contains("DOCUMENT CONTENT:"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let schema = record_schema();
        assert_eq!(build_prompt("abc", &schema), build_prompt("abc", &schema));
    }

    #[test]
    fn test_source_name() {
        let schema = record_schema();
        let prompt = PromptBuilder::new("x", &schema)
            .with_source_name("audit.pdf")
            .build();
        assert!(prompt.contains("SOURCE DOCUMENT: audit.pdf"));

        let blank = PromptBuilder::new("x", &schema).with_source_name("  ").build();
        assert!(!blank.contains("SOURCE DOCUMENT"));
    }

    #[test]
    fn test_example_record_validates_strictly() {
        let value: Value = serde_json::from_str(EXAMPLE_RECORD).unwrap();
        let options = ValidationOptions {
            strict_units: true,
            extracted_by_default: None,
        };
        let record = validate_record(&value, &options).unwrap();
        assert_eq!(record.name(), "LED Lighting Upgrade");
        assert_eq!(record.ecm_detail.savings_by_fuel.len(), 1);
    }
}

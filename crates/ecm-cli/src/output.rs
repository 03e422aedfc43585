//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use ecm_domain::{
    Area, AuditInfo, BuildingSnapshot, Duration, EcmDetail, EcmRecord, Energy, Money,
    SavingsEntry, SubmissionMetadata,
};
use ecm_extractor::{flatten, ElementFailure};
use ecm_llm::UsageSnapshot;
use serde_json::{json, Map, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format validated records; `nested` selects the nested JSON shape.
    pub fn format_records(&self, records: &[EcmRecord], nested: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_records_json(records, nested),
            OutputFormat::Table => Ok(self.format_records_table(records)),
            OutputFormat::Quiet => Ok(self.format_records_quiet(records)),
        }
    }

    fn format_records_json(&self, records: &[EcmRecord], nested: bool) -> Result<String> {
        let values: Vec<Value> = records
            .iter()
            .map(|r| {
                if nested {
                    nested_json(r)
                } else {
                    Value::Object(flatten(r))
                }
            })
            .collect();
        Ok(serde_json::to_string_pretty(&values)?)
    }

    fn format_records_table(&self, records: &[EcmRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No ECMs found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "#",
            "ECM",
            "Category",
            "Status",
            "Cost",
            "Annual Savings",
            "Energy Savings",
            "Payback",
        ]);

        for (idx, record) in records.iter().enumerate() {
            let detail = &record.ecm_detail;
            builder.push_record([
                (idx + 1).to_string(),
                detail.name.to_string(),
                detail.ecm_category.clone().unwrap_or_else(|| "-".to_string()),
                detail
                    .implementation_status
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
                money_cell(detail.cost_estimate.as_ref()),
                money_cell(detail.annual_cost_savings.as_ref()),
                detail
                    .annual_energy_savings
                    .as_ref()
                    .map(|e| format!("{} {}", e.value(), e.unit()))
                    .unwrap_or_else(|| "-".to_string()),
                detail
                    .simple_payback
                    .as_ref()
                    .map(|d| format!("{} {}", d.value(), d.unit()))
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Quiet mode: one ECM name per line.
    fn format_records_quiet(&self, records: &[EcmRecord]) -> String {
        let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
        names.join("\n")
    }

    /// Format dropped elements with their field errors.
    pub fn format_failures(&self, failures: &[ElementFailure]) -> String {
        let mut lines = Vec::new();
        for failure in failures {
            lines.push(self.error(&format!("ECM {} validation failed:", failure.element)));
            for error in &failure.errors {
                lines.push(format!("  {}", error));
            }
        }
        lines.join("\n")
    }

    /// Summary line for an extraction.
    pub fn extraction_summary(&self, validated: usize, attempted: usize) -> String {
        let message = format!("Extracted {} of {} ECM record(s)", validated, attempted);
        if validated == attempted {
            self.success(&message)
        } else {
            self.warning(&message)
        }
    }

    /// Usage counters of the transport.
    pub fn usage(&self, usage: &UsageSnapshot) -> String {
        usage
            .to_string()
            .lines()
            .map(|line| self.info(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn money_cell(money: Option<&Money>) -> String {
    money
        .map(|m| format!("{} {}", m.value(), m.currency()))
        .unwrap_or_else(|| "-".to_string())
}

/// Nested JSON form of a record, omitting absent fields.
pub fn nested_json(record: &EcmRecord) -> Value {
    let mut obj = Map::new();
    if let Some(submission) = &record.submission_metadata {
        obj.insert("submission_metadata".into(), submission_json(submission));
    }
    if let Some(building) = &record.building_snapshot {
        obj.insert("building_snapshot".into(), building_json(building));
    }
    if let Some(audit) = &record.audit_info {
        obj.insert("audit_info".into(), audit_json(audit));
    }
    obj.insert("ecm_detail".into(), detail_json(&record.ecm_detail));
    Value::Object(obj)
}

fn put<T: Into<Value> + Clone>(obj: &mut Map<String, Value>, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        obj.insert(key.to_string(), value.clone().into());
    }
}

fn money_json(m: &Money) -> Value {
    json!({"value": m.value(), "currency": m.currency()})
}

fn energy_json(e: &Energy) -> Value {
    json!({"value": e.value(), "unit": e.unit()})
}

fn area_json(a: &Area) -> Value {
    json!({"value": a.value(), "unit": a.unit()})
}

fn duration_json(d: &Duration) -> Value {
    json!({"value": d.value(), "unit": d.unit()})
}

fn submission_json(s: &SubmissionMetadata) -> Value {
    let mut obj = Map::new();
    put(&mut obj, "source_filename", &s.source_filename);
    put(&mut obj, "extraction_date", &s.extraction_date);
    put(&mut obj, "extracted_by", &s.extracted_by);
    Value::Object(obj)
}

fn building_json(b: &BuildingSnapshot) -> Value {
    let mut obj = Map::new();
    put(&mut obj, "building_id", &b.building_id);
    put(&mut obj, "building_name", &b.building_name);
    put(&mut obj, "address", &b.address);
    put(&mut obj, "property_type", &b.property_type);
    put(&mut obj, "gross_floor_area", &b.gross_floor_area.as_ref().map(area_json));
    put(&mut obj, "year_built", &b.year_built);
    Value::Object(obj)
}

fn audit_json(a: &AuditInfo) -> Value {
    let mut obj = Map::new();
    put(&mut obj, "audit_date", &a.audit_date);
    put(&mut obj, "auditor_name", &a.auditor_name);
    put(&mut obj, "audit_type", &a.audit_type);
    Value::Object(obj)
}

fn savings_json(s: &SavingsEntry) -> Value {
    let mut obj = Map::new();
    put(&mut obj, "fuel_type", &s.fuel_type);
    put(&mut obj, "energy_savings", &s.energy_savings.as_ref().map(energy_json));
    put(&mut obj, "cost_savings", &s.cost_savings.as_ref().map(money_json));
    put(&mut obj, "demand_reduction", &s.demand_reduction);
    Value::Object(obj)
}

fn detail_json(d: &EcmDetail) -> Value {
    let mut obj = Map::new();
    obj.insert("name".into(), json!(d.name.as_str()));
    put(&mut obj, "description", &d.description);
    put(&mut obj, "ecm_category", &d.ecm_category);
    put(&mut obj, "cost_estimate", &d.cost_estimate.as_ref().map(money_json));
    put(&mut obj, "annual_cost_savings", &d.annual_cost_savings.as_ref().map(money_json));
    put(&mut obj, "simple_payback", &d.simple_payback.as_ref().map(duration_json));
    put(&mut obj, "annual_energy_savings", &d.annual_energy_savings.as_ref().map(energy_json));
    put(&mut obj, "annual_demand_reduction", &d.annual_demand_reduction);
    if !d.savings_by_fuel.is_empty() {
        let entries = d.savings_by_fuel.iter().map(savings_json).collect();
        obj.insert("savings_by_fuel".into(), Value::Array(entries));
    }
    put(&mut obj, "implementation_status", &d.implementation_status);
    put(&mut obj, "priority", &d.priority);
    put(&mut obj, "technical_feasibility", &d.technical_feasibility);
    put(&mut obj, "existing_equipment", &d.existing_equipment);
    put(&mut obj, "proposed_equipment", &d.proposed_equipment);
    put(&mut obj, "useful_life", &d.useful_life.as_ref().map(duration_json));
    put(&mut obj, "notes", &d.notes);
    Value::Object(obj)
}

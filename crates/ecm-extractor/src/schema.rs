//! Machine-readable description of the ECM record shape
//!
//! Embedded in the prompt so the model can self-check its output. Mirrors
//! what [`crate::validate::validate_record`] accepts.

use ecm_domain::UnitKind;
use serde_json::{json, Value};

fn units_hint(kind: UnitKind) -> String {
    format!("one of: {}", kind.canonical_units().join(", "))
}

fn quantity(title: &str, description: &str, unit_key: &str, kind: UnitKind, required: &[&str]) -> Value {
    json!({
        "title": title,
        "description": description,
        "type": "object",
        "properties": {
            "value": {"type": "number"},
            unit_key: {"type": "string", "description": units_hint(kind)}
        },
        "required": required
    })
}

fn optional_string(description: &str) -> Value {
    json!({"type": ["string", "null"], "description": description})
}

fn reference(name: &str) -> Value {
    json!({"anyOf": [{"$ref": format!("#/$defs/{}", name)}, {"type": "null"}]})
}

/// JSON-Schema-style description of one ECM record
///
/// Deterministic: repeated calls return equal values.
pub fn record_schema() -> Value {
    let mut energy = quantity(
        "EnergyQuantity",
        "Energy value with unit",
        "unit",
        UnitKind::Energy,
        &["value", "unit"],
    );
    energy["properties"]["value"]["minimum"] = json!(0);

    let mut area = quantity(
        "AreaQuantity",
        "Building area measurement (unit defaults to sf)",
        "unit",
        UnitKind::Area,
        &["value"],
    );
    area["properties"]["value"]["minimum"] = json!(0);

    let mut duration = quantity(
        "DurationQuantity",
        "Time duration",
        "unit",
        UnitKind::Time,
        &["value", "unit"],
    );
    duration["properties"]["value"]["minimum"] = json!(0);

    let money = quantity(
        "MoneyQuantity",
        "Monetary value with currency (currency defaults to USD)",
        "currency",
        UnitKind::Money,
        &["value"],
    );

    json!({
        "title": "ECMRecord",
        "description": "One Energy Conservation Measure with its building, audit and submission context",
        "type": "object",
        "properties": {
            "submission_metadata": reference("SubmissionMetadata"),
            "building_snapshot": reference("BuildingSnapshot"),
            "audit_info": reference("AuditInfo"),
            "ecm_detail": {"$ref": "#/$defs/EcmDetail"}
        },
        "required": ["ecm_detail"],
        "$defs": {
            "MoneyQuantity": money,
            "EnergyQuantity": energy,
            "AreaQuantity": area,
            "DurationQuantity": duration,
            "SavingsEntry": {
                "title": "SavingsEntry",
                "description": "Energy and cost savings for a specific fuel type",
                "type": "object",
                "properties": {
                    "fuel_type": optional_string("Fuel type (electricity, natural gas, etc.)"),
                    "energy_savings": reference("EnergyQuantity"),
                    "cost_savings": reference("MoneyQuantity"),
                    "demand_reduction": {"type": ["number", "null"], "description": "Peak demand reduction in kW"}
                }
            },
            "BuildingSnapshot": {
                "title": "BuildingSnapshot",
                "description": "Basic building information",
                "type": "object",
                "properties": {
                    "building_id": optional_string("Building identifier"),
                    "building_name": optional_string("Building name"),
                    "address": optional_string("Street address"),
                    "property_type": optional_string("Property type (Office, School, etc.)"),
                    "gross_floor_area": reference("AreaQuantity"),
                    "year_built": {"type": ["integer", "null"]}
                }
            },
            "AuditInfo": {
                "title": "AuditInfo",
                "description": "Audit/assessment metadata",
                "type": "object",
                "properties": {
                    "audit_date": optional_string("Audit date as written in the report"),
                    "auditor_name": optional_string("Auditor or firm name"),
                    "audit_type": optional_string("Audit type (ASHRAE Level 1/2/3, etc.)")
                }
            },
            "SubmissionMetadata": {
                "title": "SubmissionMetadata",
                "description": "Metadata about the data submission",
                "type": "object",
                "properties": {
                    "source_filename": optional_string("Source document filename"),
                    "extraction_date": optional_string("Extraction date"),
                    "extracted_by": optional_string("Extraction tool or person")
                }
            },
            "EcmDetail": {
                "title": "EcmDetail",
                "description": "Core ECM (Energy Conservation Measure) information",
                "type": "object",
                "properties": {
                    "name": {"type": "string", "minLength": 1, "description": "ECM name/title"},
                    "description": optional_string("Detailed description"),
                    "ecm_category": optional_string("Category (HVAC, Lighting, etc.)"),
                    "cost_estimate": reference("MoneyQuantity"),
                    "annual_cost_savings": reference("MoneyQuantity"),
                    "simple_payback": reference("DurationQuantity"),
                    "annual_energy_savings": reference("EnergyQuantity"),
                    "annual_demand_reduction": {"type": ["number", "null"], "description": "Peak demand reduction (kW)"},
                    "savings_by_fuel": {
                        "type": ["array", "null"],
                        "items": {"$ref": "#/$defs/SavingsEntry"},
                        "description": "Detailed savings breakdown by fuel type"
                    },
                    "implementation_status": optional_string("Status (recommended, implemented, etc.)"),
                    "priority": optional_string("Priority level (high, medium, low)"),
                    "technical_feasibility": optional_string("Technical feasibility notes"),
                    "existing_equipment": optional_string("Equipment being replaced"),
                    "proposed_equipment": optional_string("Proposed equipment"),
                    "useful_life": reference("DurationQuantity"),
                    "notes": optional_string("Additional notes")
                },
                "required": ["name"]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_ecm_detail_and_name() {
        let schema = record_schema();
        assert_eq!(schema["required"], json!(["ecm_detail"]));
        assert_eq!(schema["$defs"]["EcmDetail"]["required"], json!(["name"]));
    }

    #[test]
    fn test_schema_lists_canonical_units() {
        let schema = record_schema();
        let hint = schema["$defs"]["EnergyQuantity"]["properties"]["unit"]["description"]
            .as_str()
            .unwrap();
        assert!(hint.contains("kWh"));
        assert!(hint.contains("MMBtu"));
        assert_eq!(
            schema["$defs"]["MoneyQuantity"]["properties"]["currency"]["type"],
            "string"
        );
    }

    #[test]
    fn test_schema_is_deterministic() {
        assert_eq!(record_schema(), record_schema());
        assert_eq!(record_schema().to_string(), record_schema().to_string());
    }
}

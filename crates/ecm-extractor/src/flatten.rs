//! Project a validated record into the flat shape consumed by storage and UI
//!
//! Every quantity, monetary or physical, becomes `{"value": f64, "unit": str}`;
//! money puts its currency in the `unit` slot. Absent ECM quantities are
//! filled with fixed zero-valued defaults so downstream consumers always see
//! the same keys. Sub-entity blocks (submission, building, audit) only appear
//! when the record carries that sub-entity.

use ecm_domain::{
    quantity::DEFAULT_AREA_UNIT, AuditInfo, BuildingSnapshot, EcmDetail, EcmRecord, Money,
    SavingsEntry, SubmissionMetadata,
};
use serde_json::{json, Map, Value};

/// Flat key/value form of one record
pub type FlatRecord = Map<String, Value>;

/// Fuel type label for the implicit entry built from ECM-level aggregates
pub const AGGREGATE_FUEL_TYPE: &str = "Electricity";

const DEFAULT_STATUS: &str = "recommended";
const DEFAULT_SCOPE: &str = "Other";
const DEFAULT_LIFETIME_YEARS: f64 = 15.0;
const DEMAND_UNIT: &str = "kW";

fn pair(value: f64, unit: &str) -> Value {
    json!({"value": value, "unit": unit})
}

fn money(money: &Money) -> Value {
    pair(money.value(), money.currency())
}

fn text(value: &Option<String>) -> Value {
    Value::String(value.clone().unwrap_or_default())
}

// Empty strings count as absent
fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or(default)
}

/// Flatten one record
///
/// Pure and deterministic: the same record always yields the same map.
///
/// # Examples
///
/// ```
/// use ecm_domain::{EcmDetail, EcmName, EcmRecord};
/// use ecm_extractor::flatten;
///
/// let record = EcmRecord::new(EcmDetail::new(EcmName::new("LED Upgrade").unwrap()));
/// let flat = flatten(&record);
/// assert_eq!(flat["ecm_name"], "LED Upgrade");
/// assert_eq!(flat["ecm_status"], "recommended");
/// ```
pub fn flatten(record: &EcmRecord) -> FlatRecord {
    let mut flat = FlatRecord::new();

    if let Some(submission) = &record.submission_metadata {
        flatten_submission(submission, &mut flat);
    }
    if let Some(building) = &record.building_snapshot {
        flatten_building(building, &mut flat);
    }
    if let Some(audit) = &record.audit_info {
        flatten_audit(audit, &mut flat);
    }
    flatten_detail(&record.ecm_detail, &mut flat);

    flat
}

fn flatten_submission(submission: &SubmissionMetadata, flat: &mut FlatRecord) {
    flat.insert("source_filename".into(), text(&submission.source_filename));
    flat.insert("source_file_type".into(), json!("pdf"));
    flat.insert("submitter_organization".into(), text(&submission.extracted_by));
}

fn flatten_building(building: &BuildingSnapshot, flat: &mut FlatRecord) {
    flat.insert("building_name".into(), text(&building.building_name));
    flat.insert("building_address".into(), text(&building.address));
    flat.insert("primary_property_type".into(), text(&building.property_type));

    let area = match &building.gross_floor_area {
        Some(area) => pair(area.value(), area.unit()),
        None => pair(0.0, DEFAULT_AREA_UNIT),
    };
    flat.insert("gross_floor_area".into(), area.clone());
    flat.insert("primary_property_type_area".into(), area);

    flat.insert("zip_code".into(), pair(0.0, ""));
    flat.insert("site_eui_at_audit".into(), pair(0.0, "kBtu/sf"));
}

fn flatten_audit(audit: &AuditInfo, flat: &mut FlatRecord) {
    flat.insert("audit_type".into(), json!(audit.audit_type));
    flat.insert("audit_completion_date".into(), json!(audit.audit_date));
}

fn flatten_detail(detail: &EcmDetail, flat: &mut FlatRecord) {
    flat.insert("ecm_name".into(), json!(detail.name.as_str()));
    flat.insert("ecm_description".into(), text(&detail.description));
    flat.insert("ecm_additional_details".into(), text(&detail.notes));
    flat.insert(
        "ecm_status".into(),
        json!(or_default(&detail.implementation_status, DEFAULT_STATUS)),
    );
    flat.insert(
        "ecm_scope".into(),
        json!(or_default(&detail.ecm_category, DEFAULT_SCOPE)),
    );

    let cost = match &detail.cost_estimate {
        Some(cost) => money(cost),
        None => pair(0.0, "USD"),
    };
    flat.insert("implementation_cost".into(), cost);
    flat.insert("incentives".into(), pair(0.0, "USD"));

    let lifetime = match &detail.useful_life {
        Some(life) => pair(life.value(), life.unit()),
        None => pair(DEFAULT_LIFETIME_YEARS, "year"),
    };
    flat.insert("ecm_lifetime".into(), lifetime);

    flat.insert("savings_entries".into(), Value::Array(savings_entries(detail)));
}

/// Aggregate entry first (when any aggregate exists), then each per-fuel
/// entry. Entries are concatenated, never merged by fuel type.
fn savings_entries(detail: &EcmDetail) -> Vec<Value> {
    let mut entries = Vec::with_capacity(detail.savings_by_fuel.len() + 1);

    let demand = detail.annual_demand_reduction.filter(|d| *d != 0.0);
    if detail.annual_energy_savings.is_some() || detail.annual_cost_savings.is_some() || demand.is_some() {
        let aggregate = SavingsEntry {
            fuel_type: Some(AGGREGATE_FUEL_TYPE.to_string()),
            energy_savings: detail.annual_energy_savings.clone(),
            cost_savings: detail.annual_cost_savings.clone(),
            demand_reduction: demand,
        };
        entries.push(savings_entry(&aggregate));
    }

    entries.extend(detail.savings_by_fuel.iter().map(savings_entry));
    entries
}

fn savings_entry(entry: &SavingsEntry) -> Value {
    let mut flat = Map::new();
    flat.insert("fuel_type".into(), json!(entry.fuel_type));
    if let Some(energy) = &entry.energy_savings {
        flat.insert("energy_savings".into(), pair(energy.value(), energy.unit()));
    }
    if let Some(cost) = &entry.cost_savings {
        flat.insert("cost_savings".into(), money(cost));
    }
    if let Some(demand) = entry.demand_reduction.filter(|d| *d != 0.0) {
        flat.insert("demand_savings".into(), pair(demand, DEMAND_UNIT));
    }
    Value::Object(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecm_domain::{Area, Duration, EcmName, Energy};

    fn named(name: &str) -> EcmRecord {
        EcmRecord::new(EcmDetail::new(EcmName::new(name).unwrap()))
    }

    #[test]
    fn test_name_only_record_gets_defaults() {
        let flat = flatten(&named("LED Upgrade"));

        assert_eq!(flat["ecm_name"], "LED Upgrade");
        assert_eq!(flat["ecm_status"], "recommended");
        assert_eq!(flat["ecm_scope"], "Other");
        assert_eq!(flat["ecm_lifetime"], json!({"value": 15.0, "unit": "year"}));
        assert_eq!(flat["implementation_cost"], json!({"value": 0.0, "unit": "USD"}));
        assert_eq!(flat["incentives"], json!({"value": 0.0, "unit": "USD"}));
        assert_eq!(flat["ecm_description"], "");
        assert_eq!(flat["ecm_additional_details"], "");
        assert_eq!(flat["savings_entries"], json!([]));
    }

    #[test]
    fn test_empty_status_and_category_get_defaults() {
        let mut record = named("LED");
        record.ecm_detail.implementation_status = Some(String::new());
        record.ecm_detail.ecm_category = Some(String::new());

        let flat = flatten(&record);
        assert_eq!(flat["ecm_status"], "recommended");
        assert_eq!(flat["ecm_scope"], "Other");
    }

    #[test]
    fn test_given_status_and_category_are_kept() {
        let mut record = named("LED");
        record.ecm_detail.implementation_status = Some("implemented".to_string());
        record.ecm_detail.ecm_category = Some("Lighting".to_string());

        let flat = flatten(&record);
        assert_eq!(flat["ecm_status"], "implemented");
        assert_eq!(flat["ecm_scope"], "Lighting");
    }

    #[test]
    fn test_absent_sub_entities_emit_no_keys() {
        let flat = flatten(&named("X"));
        assert!(!flat.contains_key("building_name"));
        assert!(!flat.contains_key("gross_floor_area"));
        assert!(!flat.contains_key("audit_type"));
        assert!(!flat.contains_key("source_filename"));
    }

    #[test]
    fn test_money_currency_moves_to_unit() {
        let mut record = named("VFD");
        record.ecm_detail.cost_estimate = Some(Money::new(12500.0, "CAD").unwrap());
        let flat = flatten(&record);
        assert_eq!(flat["implementation_cost"], json!({"value": 12500.0, "unit": "CAD"}));
    }

    #[test]
    fn test_building_block() {
        let mut record = named("X");
        record.building_snapshot = Some(BuildingSnapshot {
            building_name: Some("City Hall".to_string()),
            gross_floor_area: Some(Area::new(50000.0, "sf").unwrap()),
            ..BuildingSnapshot::default()
        });
        let flat = flatten(&record);

        assert_eq!(flat["building_name"], "City Hall");
        assert_eq!(flat["building_address"], "");
        assert_eq!(flat["gross_floor_area"], json!({"value": 50000.0, "unit": "sf"}));
        assert_eq!(flat["primary_property_type_area"], flat["gross_floor_area"]);
        assert_eq!(flat["zip_code"], json!({"value": 0.0, "unit": ""}));
        assert_eq!(flat["site_eui_at_audit"], json!({"value": 0.0, "unit": "kBtu/sf"}));
    }

    #[test]
    fn test_building_without_area_defaults() {
        let mut record = named("X");
        record.building_snapshot = Some(BuildingSnapshot::default());
        let flat = flatten(&record);
        assert_eq!(flat["gross_floor_area"], json!({"value": 0.0, "unit": "sf"}));
    }

    #[test]
    fn test_submission_and_audit_blocks() {
        let mut record = named("X");
        record.submission_metadata = Some(SubmissionMetadata {
            source_filename: Some("audit.pdf".to_string()),
            extracted_by: Some("ECM Extractor".to_string()),
            ..SubmissionMetadata::default()
        });
        record.audit_info = Some(AuditInfo {
            audit_type: Some("ASHRAE Level 2".to_string()),
            ..AuditInfo::default()
        });
        let flat = flatten(&record);

        assert_eq!(flat["source_filename"], "audit.pdf");
        assert_eq!(flat["source_file_type"], "pdf");
        assert_eq!(flat["submitter_organization"], "ECM Extractor");
        assert_eq!(flat["audit_type"], "ASHRAE Level 2");
        assert_eq!(flat["audit_completion_date"], Value::Null);
    }

    #[test]
    fn test_aggregate_then_fuel_entries_concatenated() {
        let mut record = named("Chiller");
        let detail = &mut record.ecm_detail;
        detail.annual_energy_savings = Some(Energy::new(50000.0, "kWh").unwrap());
        detail.annual_cost_savings = Some(Money::usd(5000.0).unwrap());
        detail.annual_demand_reduction = Some(12.5);
        detail.savings_by_fuel = vec![
            SavingsEntry {
                fuel_type: Some("Electricity".to_string()),
                energy_savings: Some(Energy::new(50000.0, "kWh").unwrap()),
                ..SavingsEntry::default()
            },
            SavingsEntry {
                fuel_type: Some("Natural Gas".to_string()),
                cost_savings: Some(Money::usd(800.0).unwrap()),
                demand_reduction: Some(0.0),
                ..SavingsEntry::default()
            },
        ];
        let flat = flatten(&record);

        assert_eq!(
            flat["savings_entries"],
            json!([
                {
                    "fuel_type": "Electricity",
                    "energy_savings": {"value": 50000.0, "unit": "kWh"},
                    "cost_savings": {"value": 5000.0, "unit": "USD"},
                    "demand_savings": {"value": 12.5, "unit": "kW"}
                },
                {
                    "fuel_type": "Electricity",
                    "energy_savings": {"value": 50000.0, "unit": "kWh"}
                },
                {
                    "fuel_type": "Natural Gas",
                    "cost_savings": {"value": 800.0, "unit": "USD"}
                }
            ])
        );
    }

    #[test]
    fn test_cost_only_aggregate_emits_entry() {
        let mut record = named("Controls");
        record.ecm_detail.annual_cost_savings = Some(Money::usd(300.0).unwrap());
        let flat = flatten(&record);
        assert_eq!(
            flat["savings_entries"],
            json!([{"fuel_type": "Electricity", "cost_savings": {"value": 300.0, "unit": "USD"}}])
        );
    }

    #[test]
    fn test_zero_demand_alone_emits_nothing() {
        let mut record = named("X");
        record.ecm_detail.annual_demand_reduction = Some(0.0);
        assert_eq!(flatten(&record)["savings_entries"], json!([]));
    }

    #[test]
    fn test_useful_life_passes_through() {
        let mut record = named("X");
        record.ecm_detail.useful_life = Some(Duration::new(20.0, "year").unwrap());
        record.ecm_detail.ecm_category = Some("HVAC".to_string());
        record.ecm_detail.implementation_status = Some("implemented".to_string());
        let flat = flatten(&record);
        assert_eq!(flat["ecm_lifetime"], json!({"value": 20.0, "unit": "year"}));
        assert_eq!(flat["ecm_scope"], "HVAC");
        assert_eq!(flat["ecm_status"], "implemented");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use ecm_domain::{EcmName, Energy};
    use proptest::prelude::*;

    fn arb_entry() -> impl Strategy<Value = SavingsEntry> {
        (
            prop::option::of("[A-Za-z ]{1,12}"),
            prop::option::of(0.0f64..1e9),
            prop::option::of(-1e6f64..1e6),
            prop::option::of(0.0f64..1e4),
        )
            .prop_map(|(fuel_type, energy, cost, demand)| SavingsEntry {
                fuel_type,
                energy_savings: energy.map(|v| Energy::new(v, "kWh").unwrap()),
                cost_savings: cost.map(|v| Money::usd(v).unwrap()),
                demand_reduction: demand,
            })
    }

    fn arb_record() -> impl Strategy<Value = EcmRecord> {
        (
            "[A-Za-z][A-Za-z ]{0,20}",
            prop::option::of(-1e7f64..1e7),
            prop::option::of(0.0f64..1e9),
            prop::collection::vec(arb_entry(), 0..4),
        )
            .prop_map(|(name, cost, energy, fuels)| {
                let mut detail = EcmDetail::new(EcmName::new(name).unwrap());
                detail.cost_estimate = cost.map(|v| Money::usd(v).unwrap());
                detail.annual_energy_savings = energy.map(|v| Energy::new(v, "MMBtu").unwrap());
                detail.savings_by_fuel = fuels;
                EcmRecord::new(detail)
            })
    }

    proptest! {
        /// Property: flattening is deterministic
        #[test]
        fn test_flatten_deterministic(record in arb_record()) {
            prop_assert_eq!(flatten(&record), flatten(&record.clone()));
        }

        /// Property: every per-fuel entry appears, after the optional aggregate
        #[test]
        fn test_entries_concatenated(record in arb_record()) {
            let flat = flatten(&record);
            let entries = flat["savings_entries"].as_array().unwrap();
            let aggregate = usize::from(record.ecm_detail.annual_energy_savings.is_some());
            prop_assert_eq!(entries.len(), aggregate + record.ecm_detail.savings_by_fuel.len());
        }
    }
}

//! Validate one extracted JSON element into an [`EcmRecord`]
//!
//! The walk collects every field error it finds instead of stopping at the
//! first one. An element with any error yields no record; its partially
//! built sub-entities are discarded.

use ecm_domain::quantity::{DEFAULT_AREA_UNIT, DEFAULT_CURRENCY};
use ecm_domain::{
    Area, AuditInfo, BuildingSnapshot, Duration, EcmDetail, EcmName, EcmRecord, Energy,
    FieldError, Money, QuantityError, SavingsEntry, SubmissionMetadata, UnitKind,
};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// Options that change how strictly elements are validated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOptions {
    /// Reject units and currencies outside the canonical sets
    pub strict_units: bool,

    /// Value for `submission_metadata.extracted_by` when the key is omitted
    pub extracted_by_default: Option<String>,
}

/// Validate one element of the model's array
///
/// Accepted record keys are `submission_metadata`, `building_snapshot`,
/// `audit_info` and `ecm_detail`, with `submission`, `building`, `audit` and
/// `ecm` as aliases. Unknown keys are ignored; `null` counts as absent.
///
/// # Errors
///
/// Every field-level problem, each with its dot-separated path.
pub fn validate_record(
    value: &Value,
    options: &ValidationOptions,
) -> Result<EcmRecord, Vec<FieldError>> {
    let mut walker = Walker {
        options,
        errors: Vec::new(),
    };
    let record = walker.record(value);

    match record {
        Some(record) if walker.errors.is_empty() => Ok(record),
        _ => Err(walker.errors),
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// First present, non-null value among `keys`
fn lookup<'v>(obj: &'v Object, keys: &[&str]) -> Option<&'v Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

struct Walker<'o> {
    options: &'o ValidationOptions,
    errors: Vec<FieldError>,
}

impl Walker<'_> {
    fn fail(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, message));
    }

    fn as_object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Object> {
        match value.as_object() {
            Some(obj) => Some(obj),
            None if path.is_empty() => {
                self.fail(path, "expected a JSON object");
                None
            }
            None => {
                self.fail(path, "expected an object");
                None
            }
        }
    }

    fn string(&mut self, obj: &Object, key: &str, parent: &str) -> Option<String> {
        match lookup(obj, &[key])? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.fail(join(parent, key), "expected a string");
                None
            }
        }
    }

    fn number(&mut self, obj: &Object, key: &str, parent: &str) -> Option<f64> {
        let value = lookup(obj, &[key])?;
        let path = join(parent, key);
        match parse_number(value) {
            Some(n) if n.is_finite() => Some(n),
            Some(n) => {
                self.fail(path, QuantityError::NonFinite(n).to_string());
                None
            }
            None => {
                self.fail(path, "expected a number");
                None
            }
        }
    }

    fn integer(&mut self, obj: &Object, key: &str, parent: &str) -> Option<i64> {
        let value = lookup(obj, &[key])?;
        let parsed = parse_integer(value);
        if parsed.is_none() {
            self.fail(join(parent, key), "expected an integer");
        }
        parsed
    }

    /// Read `{value, <unit_key>}`; returns the value and unit on success
    fn quantity_parts(
        &mut self,
        obj: &Object,
        key: &str,
        parent: &str,
        unit_key: &str,
        default_unit: Option<&str>,
        kind: UnitKind,
    ) -> Option<(f64, String, String)> {
        let path = join(parent, key);
        let inner = lookup(obj, &[key])?;
        let inner = self.as_object(inner, &path)?;

        let value = if lookup(inner, &["value"]).is_none() {
            self.fail(join(&path, "value"), "field required");
            None
        } else {
            self.number(inner, "value", &path)
        };

        let unit = match (lookup(inner, &[unit_key]), default_unit) {
            (None, Some(default)) => Some(default.to_string()),
            (None, None) => {
                self.fail(join(&path, unit_key), "field required");
                None
            }
            (Some(_), _) => self.string(inner, unit_key, &path),
        };

        let (value, unit) = (value?, unit?);
        if self.options.strict_units && !kind.is_canonical(&unit) {
            self.fail(
                join(&path, unit_key),
                format!(
                    "'{}' is not a canonical {} unit (expected one of: {})",
                    unit,
                    kind,
                    kind.canonical_units().join(", ")
                ),
            );
            return None;
        }
        Some((value, unit, path))
    }

    fn built<T>(&mut self, result: Result<T, QuantityError>, path: &str) -> Option<T> {
        match result {
            Ok(quantity) => Some(quantity),
            Err(e) => {
                self.fail(join(path, "value"), e.to_string());
                None
            }
        }
    }

    fn money(&mut self, obj: &Object, key: &str, parent: &str) -> Option<Money> {
        let (value, currency, path) = self.quantity_parts(
            obj,
            key,
            parent,
            "currency",
            Some(DEFAULT_CURRENCY),
            UnitKind::Money,
        )?;
        self.built(Money::new(value, currency), &path)
    }

    fn energy(&mut self, obj: &Object, key: &str, parent: &str) -> Option<Energy> {
        let (value, unit, path) =
            self.quantity_parts(obj, key, parent, "unit", None, UnitKind::Energy)?;
        self.built(Energy::new(value, unit), &path)
    }

    fn area(&mut self, obj: &Object, key: &str, parent: &str) -> Option<Area> {
        let (value, unit, path) = self.quantity_parts(
            obj,
            key,
            parent,
            "unit",
            Some(DEFAULT_AREA_UNIT),
            UnitKind::Area,
        )?;
        self.built(Area::new(value, unit), &path)
    }

    fn duration(&mut self, obj: &Object, key: &str, parent: &str) -> Option<Duration> {
        let (value, unit, path) =
            self.quantity_parts(obj, key, parent, "unit", None, UnitKind::Time)?;
        self.built(Duration::new(value, unit), &path)
    }

    fn record(&mut self, value: &Value) -> Option<EcmRecord> {
        let obj = self.as_object(value, "")?;

        let submission_metadata = lookup(obj, &["submission_metadata", "submission"])
            .and_then(|v| self.submission(v, "submission_metadata"));
        let building_snapshot = lookup(obj, &["building_snapshot", "building"])
            .and_then(|v| self.building(v, "building_snapshot"));
        let audit_info =
            lookup(obj, &["audit_info", "audit"]).and_then(|v| self.audit(v, "audit_info"));

        let ecm_detail = match lookup(obj, &["ecm_detail", "ecm"]) {
            Some(v) => self.ecm_detail(v, "ecm_detail"),
            None => {
                self.fail("ecm_detail", "field required");
                None
            }
        };

        Some(EcmRecord {
            submission_metadata,
            building_snapshot,
            audit_info,
            ecm_detail: ecm_detail?,
        })
    }

    fn submission(&mut self, value: &Value, path: &str) -> Option<SubmissionMetadata> {
        let obj = self.as_object(value, path)?;
        let extracted_by = if obj.contains_key("extracted_by") {
            self.string(obj, "extracted_by", path)
        } else {
            self.options.extracted_by_default.clone()
        };
        Some(SubmissionMetadata {
            source_filename: self.string(obj, "source_filename", path),
            extraction_date: self.string(obj, "extraction_date", path),
            extracted_by,
        })
    }

    fn building(&mut self, value: &Value, path: &str) -> Option<BuildingSnapshot> {
        let obj = self.as_object(value, path)?;
        Some(BuildingSnapshot {
            building_id: self.string(obj, "building_id", path),
            building_name: self.string(obj, "building_name", path),
            address: self.string(obj, "address", path),
            property_type: self.string(obj, "property_type", path),
            gross_floor_area: self.area(obj, "gross_floor_area", path),
            year_built: self.integer(obj, "year_built", path),
        })
    }

    fn audit(&mut self, value: &Value, path: &str) -> Option<AuditInfo> {
        let obj = self.as_object(value, path)?;
        Some(AuditInfo {
            audit_date: self.string(obj, "audit_date", path),
            auditor_name: self.string(obj, "auditor_name", path),
            audit_type: self.string(obj, "audit_type", path),
        })
    }

    fn savings_entry(&mut self, value: &Value, path: &str) -> Option<SavingsEntry> {
        let obj = self.as_object(value, path)?;
        Some(SavingsEntry {
            fuel_type: self.string(obj, "fuel_type", path),
            energy_savings: self.energy(obj, "energy_savings", path),
            cost_savings: self.money(obj, "cost_savings", path),
            demand_reduction: self.number(obj, "demand_reduction", path),
        })
    }

    fn savings_by_fuel(&mut self, obj: &Object, parent: &str) -> Vec<SavingsEntry> {
        let path = join(parent, "savings_by_fuel");
        match lookup(obj, &["savings_by_fuel"]) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| self.savings_entry(item, &join(&path, &i.to_string())))
                .collect(),
            Some(_) => {
                self.fail(path, "expected an array");
                Vec::new()
            }
        }
    }

    fn ecm_name(&mut self, obj: &Object, parent: &str) -> Option<EcmName> {
        let path = join(parent, "name");
        match lookup(obj, &["name"]) {
            None => {
                self.fail(path, "field required");
                None
            }
            Some(Value::String(s)) => match EcmName::new(s.as_str()) {
                Ok(name) => Some(name),
                Err(e) => {
                    self.fail(path, e);
                    None
                }
            },
            Some(_) => {
                self.fail(path, "expected a string");
                None
            }
        }
    }

    fn ecm_detail(&mut self, value: &Value, path: &str) -> Option<EcmDetail> {
        let obj = self.as_object(value, path)?;
        let name = self.ecm_name(obj, path);

        let description = self.string(obj, "description", path);
        let ecm_category = self.string(obj, "ecm_category", path);
        let cost_estimate = self.money(obj, "cost_estimate", path);
        let annual_cost_savings = self.money(obj, "annual_cost_savings", path);
        let simple_payback = self.duration(obj, "simple_payback", path);
        let annual_energy_savings = self.energy(obj, "annual_energy_savings", path);
        let annual_demand_reduction = self.number(obj, "annual_demand_reduction", path);
        let savings_by_fuel = self.savings_by_fuel(obj, path);
        let implementation_status = self.string(obj, "implementation_status", path);
        let priority = self.string(obj, "priority", path);
        let technical_feasibility = self.string(obj, "technical_feasibility", path);
        let existing_equipment = self.string(obj, "existing_equipment", path);
        let proposed_equipment = self.string(obj, "proposed_equipment", path);
        let useful_life = self.duration(obj, "useful_life", path);
        let notes = self.string(obj, "notes", path);

        Some(EcmDetail {
            name: name?,
            description,
            ecm_category,
            cost_estimate,
            annual_cost_savings,
            simple_payback,
            annual_energy_savings,
            annual_demand_reduction,
            savings_by_fuel,
            implementation_status,
            priority,
            technical_feasibility,
            existing_equipment,
            proposed_equipment,
            useful_life,
            notes,
        })
    }
}

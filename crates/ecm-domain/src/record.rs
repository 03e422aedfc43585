//! ECM record schema
//!
//! An [`EcmRecord`] is the atomic unit of extraction: one measure plus the
//! optional context it was found in. Only [`EcmDetail::name`] is structurally
//! required; every other leaf is optional.

use crate::quantity::{Area, Duration, Energy, Money};
use std::fmt;

/// Non-empty ECM name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EcmName(String);

impl EcmName {
    /// Create a name, rejecting empty or whitespace-only strings
    ///
    /// # Examples
    ///
    /// ```
    /// use ecm_domain::EcmName;
    ///
    /// assert!(EcmName::new("LED Upgrade").is_ok());
    /// assert!(EcmName::new("   ").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        Ok(Self(name))
    }

    /// Borrow the name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EcmName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Savings for one fuel type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SavingsEntry {
    /// Fuel type (electricity, natural gas, ...)
    pub fuel_type: Option<String>,
    /// Annual energy savings for this fuel
    pub energy_savings: Option<Energy>,
    /// Annual cost savings for this fuel
    pub cost_savings: Option<Money>,
    /// Peak demand reduction in kW
    pub demand_reduction: Option<f64>,
}

/// Descriptive building information
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildingSnapshot {
    /// Building identifier
    pub building_id: Option<String>,
    /// Building name
    pub building_name: Option<String>,
    /// Street address
    pub address: Option<String>,
    /// Property type (Office, K-12 School, ...)
    pub property_type: Option<String>,
    /// Gross floor area
    pub gross_floor_area: Option<Area>,
    /// Year of construction
    pub year_built: Option<i64>,
}

/// Audit metadata
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditInfo {
    /// Audit date as written in the document (not parsed)
    pub audit_date: Option<String>,
    /// Auditor name
    pub auditor_name: Option<String>,
    /// Audit type (ASHRAE Level 2, ...)
    pub audit_type: Option<String>,
}

/// Provenance of an extracted record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionMetadata {
    /// Original document filename
    pub source_filename: Option<String>,
    /// Extraction date as a free-text string
    pub extraction_date: Option<String>,
    /// Tool or person that performed the extraction
    pub extracted_by: Option<String>,
}

/// Core ECM information
#[derive(Debug, Clone, PartialEq)]
pub struct EcmDetail {
    /// ECM name (required)
    pub name: EcmName,
    /// Detailed description
    pub description: Option<String>,
    /// Category (HVAC, Lighting, ...)
    pub ecm_category: Option<String>,

    /// Estimated implementation cost
    pub cost_estimate: Option<Money>,
    /// Annual cost savings across all fuels
    pub annual_cost_savings: Option<Money>,
    /// Simple payback period
    pub simple_payback: Option<Duration>,

    /// Annual energy savings across all fuels
    pub annual_energy_savings: Option<Energy>,
    /// Peak demand reduction in kW
    pub annual_demand_reduction: Option<f64>,
    /// Per-fuel savings breakdown
    pub savings_by_fuel: Vec<SavingsEntry>,

    /// Status (recommended, implemented, ...)
    pub implementation_status: Option<String>,
    /// Priority (high, medium, low)
    pub priority: Option<String>,
    /// Technical feasibility notes
    pub technical_feasibility: Option<String>,

    /// Equipment being replaced
    pub existing_equipment: Option<String>,
    /// Replacement equipment
    pub proposed_equipment: Option<String>,
    /// Expected useful life
    pub useful_life: Option<Duration>,
    /// Free-text notes
    pub notes: Option<String>,
}

impl EcmDetail {
    /// Create a detail with only the required name populated
    pub fn new(name: EcmName) -> Self {
        Self {
            name,
            description: None,
            ecm_category: None,
            cost_estimate: None,
            annual_cost_savings: None,
            simple_payback: None,
            annual_energy_savings: None,
            annual_demand_reduction: None,
            savings_by_fuel: Vec::new(),
            implementation_status: None,
            priority: None,
            technical_feasibility: None,
            existing_equipment: None,
            proposed_equipment: None,
            useful_life: None,
            notes: None,
        }
    }
}

/// One extracted measure with its context
#[derive(Debug, Clone, PartialEq)]
pub struct EcmRecord {
    /// Provenance
    pub submission_metadata: Option<SubmissionMetadata>,
    /// Building context
    pub building_snapshot: Option<BuildingSnapshot>,
    /// Audit context
    pub audit_info: Option<AuditInfo>,
    /// The measure itself
    pub ecm_detail: EcmDetail,
}

impl EcmRecord {
    /// Create a record from its required detail
    pub fn new(ecm_detail: EcmDetail) -> Self {
        Self {
            submission_metadata: None,
            building_snapshot: None,
            audit_info: None,
            ecm_detail,
        }
    }

    /// Shorthand for the measure name
    pub fn name(&self) -> &str {
        self.ecm_detail.name.as_str()
    }
}

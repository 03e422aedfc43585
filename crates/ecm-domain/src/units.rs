//! Canonical unit sets
//!
//! The model is instructed to normalize units to these abbreviations. The
//! validation layer only enforces them when strict units are enabled.

use std::fmt;

/// Kind of quantity a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Energy amounts
    Energy,
    /// Peak demand / power
    Demand,
    /// Currency codes
    Money,
    /// Floor area
    Area,
    /// Time spans
    Time,
}

const ENERGY_UNITS: &[&str] = &["kBtu", "MMBtu", "Btu", "kWh", "MWh", "GWh", "therm", "GJ"];
const DEMAND_UNITS: &[&str] = &["kW", "MW", "W", "hp", "ton"];
const MONEY_UNITS: &[&str] = &["USD", "CAD", "EUR", "GBP"];
const AREA_UNITS: &[&str] = &["sf", "m2", "acre"];
const TIME_UNITS: &[&str] = &["year", "month", "week", "day"];

impl UnitKind {
    /// All kinds, in prompt order
    pub const ALL: [UnitKind; 5] = [
        UnitKind::Energy,
        UnitKind::Demand,
        UnitKind::Money,
        UnitKind::Area,
        UnitKind::Time,
    ];

    /// The canonical abbreviations for this kind
    pub fn canonical_units(self) -> &'static [&'static str] {
        match self {
            UnitKind::Energy => ENERGY_UNITS,
            UnitKind::Demand => DEMAND_UNITS,
            UnitKind::Money => MONEY_UNITS,
            UnitKind::Area => AREA_UNITS,
            UnitKind::Time => TIME_UNITS,
        }
    }

    /// Whether `unit` is one of the canonical abbreviations (exact match)
    ///
    /// # Examples
    ///
    /// ```
    /// use ecm_domain::UnitKind;
    ///
    /// assert!(UnitKind::Energy.is_canonical("kWh"));
    /// assert!(!UnitKind::Energy.is_canonical("kilowatt-hours"));
    /// ```
    pub fn is_canonical(self, unit: &str) -> bool {
        self.canonical_units().contains(&unit)
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UnitKind::Energy => "energy",
            UnitKind::Demand => "demand",
            UnitKind::Money => "money",
            UnitKind::Area => "area",
            UnitKind::Time => "time",
        };
        f.write_str(label)
    }
}

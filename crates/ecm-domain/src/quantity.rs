//! Quantity value objects
//!
//! Each quantity pairs a finite value with a free-text unit (or currency).
//! Physical quantities (energy, area, duration) must be non-negative; money
//! may be negative (e.g. a net cost increase reported as a saving).
//!
//! Unit strings are not checked here. Canonical-unit enforcement is an
//! opt-in concern of the validation layer, see [`crate::units`].

use crate::error::QuantityError;

/// Default unit for an area that omits one
pub const DEFAULT_AREA_UNIT: &str = "sf";

/// Default currency for a money amount that omits one
pub const DEFAULT_CURRENCY: &str = "USD";

fn check_finite(value: f64) -> Result<f64, QuantityError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(QuantityError::NonFinite(value))
    }
}

fn check_non_negative(value: f64) -> Result<f64, QuantityError> {
    let value = check_finite(value)?;
    if value < 0.0 {
        return Err(QuantityError::Negative(value));
    }
    Ok(value)
}

/// Monetary amount with a currency code
#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    value: f64,
    currency: String,
}

impl Money {
    /// Create a money amount
    ///
    /// # Examples
    ///
    /// ```
    /// use ecm_domain::Money;
    ///
    /// let cost = Money::new(25_000.0, "USD").unwrap();
    /// assert_eq!(cost.value(), 25_000.0);
    /// assert!(Money::new(f64::NAN, "USD").is_err());
    /// ```
    pub fn new(value: f64, currency: impl Into<String>) -> Result<Self, QuantityError> {
        Ok(Self {
            value: check_finite(value)?,
            currency: currency.into(),
        })
    }

    /// Create a money amount in the default currency
    pub fn usd(value: f64) -> Result<Self, QuantityError> {
        Self::new(value, DEFAULT_CURRENCY)
    }

    /// The amount
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The currency code
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

macro_rules! physical_quantity {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            value: f64,
            unit: String,
        }

        impl $name {
            /// Create the quantity, rejecting non-finite or negative values
            pub fn new(value: f64, unit: impl Into<String>) -> Result<Self, QuantityError> {
                Ok(Self {
                    value: check_non_negative(value)?,
                    unit: unit.into(),
                })
            }

            /// The magnitude
            pub fn value(&self) -> f64 {
                self.value
            }

            /// The unit
            pub fn unit(&self) -> &str {
                &self.unit
            }
        }
    };
}

physical_quantity! {
    /// Energy amount (kWh, MMBtu, therm, ...)
    Energy
}

physical_quantity! {
    /// Floor area (sf, m2, acre)
    Area
}

physical_quantity! {
    /// Time span (year, month, week, day)
    Duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_allows_negative() {
        let m = Money::new(-500.0, "USD").unwrap();
        assert_eq!(m.value(), -500.0);
        assert_eq!(m.currency(), "USD");
    }

    #[test]
    fn test_money_rejects_infinite() {
        assert_eq!(
            Money::new(f64::INFINITY, "USD"),
            Err(QuantityError::NonFinite(f64::INFINITY))
        );
    }

    #[test]
    fn test_energy_rejects_negative() {
        assert_eq!(
            Energy::new(-1.0, "kWh"),
            Err(QuantityError::Negative(-1.0))
        );
    }

    #[test]
    fn test_zero_is_allowed() {
        assert!(Area::new(0.0, "sf").is_ok());
        assert!(Duration::new(0.0, "year").is_ok());
    }

    #[test]
    fn test_duration_rejects_nan() {
        assert!(matches!(
            Duration::new(f64::NAN, "year"),
            Err(QuantityError::NonFinite(_))
        ));
    }

    #[test]
    fn test_usd_shortcut() {
        assert_eq!(Money::usd(10.0).unwrap().currency(), DEFAULT_CURRENCY);
    }
}

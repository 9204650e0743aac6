//! Row-count targets derived from the scale factor.

use crate::error::{Result, SynthError};
use crate::table::Table;

const CUSTOMER_BASE: f64 = 150_000.0;
const SUPPLIER_BASE: f64 = 10_000.0;
const PART_BASE: f64 = 200_000.0;
const ORDER_BASE: f64 = 1_500_000.0;

const SNAP_TOLERANCE: f64 = 1e-9;

/// Mean of the uniform 1..=7 line-item fan-out.
pub const AVG_LINES_PER_ORDER: u64 = 4;

/// A validated, strictly positive scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(SynthError::InvalidScaleFactor(value))
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    /// `floor(base * sf)`, treating a product within a relative 1e-9 of an
    /// integer as that integer. Decimal inputs such as 0.29 are not exact in
    /// binary and would otherwise floor one row short.
    fn scale(&self, base: f64) -> u64 {
        let product = base * self.0;
        let nearest = product.round();
        if (product - nearest).abs() <= SNAP_TOLERANCE * nearest.max(1.0) {
            nearest as u64
        } else {
            product.floor() as u64
        }
    }
}

/// Target sizes for every generated collection whose size is fixed up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinalities {
    pub customers: u64,
    pub suppliers: u64,
    pub parts: u64,
    pub orders: u64,
}

impl Cardinalities {
    /// Derives the row counts for `sf`, rejecting any scale small enough that
    /// a table would come out empty (orders and line items need at least one
    /// customer, part and supplier to reference).
    pub fn for_scale(sf: ScaleFactor) -> Result<Self> {
        let counts = Self {
            customers: sf.scale(CUSTOMER_BASE),
            suppliers: sf.scale(SUPPLIER_BASE),
            parts: sf.scale(PART_BASE),
            orders: sf.scale(ORDER_BASE),
        };
        counts.validate()?;
        Ok(counts)
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            (Table::Customer, self.customers),
            (Table::Supplier, self.suppliers),
            (Table::Part, self.parts),
            (Table::Orders, self.orders),
        ];
        for (table, count) in checks {
            if count == 0 {
                return Err(SynthError::InvalidCount { table, count: 0 });
            }
        }
        Ok(())
    }

    /// Expected (not exact) number of line items.
    pub fn expected_lineitems(&self) -> u64 {
        self.orders * AVG_LINES_PER_ORDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_factor_point_one() {
        let counts = Cardinalities::for_scale(ScaleFactor::new(0.1).unwrap()).unwrap();
        assert_eq!(
            counts,
            Cardinalities {
                customers: 15_000,
                suppliers: 1_000,
                parts: 20_000,
                orders: 150_000,
            }
        );
        assert_eq!(counts.expected_lineitems(), 600_000);
    }

    #[test]
    fn counts_round_down() {
        // 2^-12 keeps every product exact
        let counts = Cardinalities::for_scale(ScaleFactor::new(0.000244140625).unwrap()).unwrap();
        assert_eq!(counts.customers, 36);
        assert_eq!(counts.suppliers, 2);
        assert_eq!(counts.parts, 48);
        assert_eq!(counts.orders, 366);
    }

    #[test]
    fn decimal_scale_factors_are_not_undercounted() {
        let counts = Cardinalities::for_scale(ScaleFactor::new(0.29).unwrap()).unwrap();
        assert_eq!(
            counts,
            Cardinalities {
                customers: 43_500,
                suppliers: 2_900,
                parts: 58_000,
                orders: 435_000,
            }
        );

        let counts = Cardinalities::for_scale(ScaleFactor::new(0.57).unwrap()).unwrap();
        assert_eq!(
            counts,
            Cardinalities {
                customers: 85_500,
                suppliers: 5_700,
                parts: 114_000,
                orders: 855_000,
            }
        );
    }

    #[test]
    fn non_positive_scale_factor_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ScaleFactor::new(bad),
                Err(SynthError::InvalidScaleFactor(_))
            ));
        }
    }

    #[test]
    fn empty_supplier_table_rejected() {
        let err = Cardinalities::for_scale(ScaleFactor::new(0.00001).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            SynthError::InvalidCount {
                table: Table::Supplier,
                ..
            }
        ));
    }
}

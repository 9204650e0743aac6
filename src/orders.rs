//! ORDERS and LINEITEM generation.
//!
//! Each order picks a customer, then spawns 1 to 7 line items numbered from 1.
//! Line items pick their part and supplier independently; the pair is not
//! required to exist in PARTSUPP.

use std::fmt;

use rand::Rng;

use crate::error::{Result, SynthError};
use crate::sampling::{date, key, money, pick};
use crate::serializer::TblRow;
use crate::table::Table;
use crate::values::{Date, Decimal};

pub const ORDER_STATUSES: &[&str] = &["O", "F", "P"];
pub const PRIORITIES: &[&str] = &["1-URGENT", "2-HIGH", "3-MEDIUM", "4-NOT SPECIFIED", "5-LOW"];
pub const RETURN_FLAGS: &[&str] = &["R", "A", "N"];
pub const LINE_STATUSES: &[&str] = &["O", "F"];
pub const SHIP_MODES: &[&str] = &["REG AIR", "AIR", "RAIL", "SHIP", "TRUCK", "MAIL", "FOB"];
pub const SHIP_INSTRUCTIONS: &[&str] = &["DELIVER IN PERSON", "COLLECT COD", "NONE", "TAKE BACK RETURN"];

pub const MAX_LINES_PER_ORDER: i32 = 7;
pub const CLERK_COUNT: i32 = 1_000;
pub const QUANTITY_MAX: i32 = 50;
/// Total price bounds, in hundredths.
pub const TOTALPRICE_MIN: i64 = 80_000;
pub const TOTALPRICE_MAX: i64 = 50_000_000;
/// Per-unit price bounds for the extended price, in hundredths.
pub const UNIT_PRICE_MIN: i64 = 90_000;
pub const UNIT_PRICE_MAX: i64 = 210_000;
/// Discount and tax upper bounds, in hundredths.
pub const DISCOUNT_MAX: i64 = 10;
pub const TAX_MAX: i64 = 8;

pub const FIRST_DATE: Date = Date::new(1992, 1, 1);
pub const LAST_DATE: Date = Date::new(1998, 12, 28);

/// The ORDERS table
///
/// ```text
/// 1|3691|O|194029.55|1996-01-02|5-LOW|Clerk#000000951|0|Comment 0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub o_orderkey: i64,
    /// Foreign key to CUSTOMER
    pub o_custkey: i64,
    pub o_orderstatus: &'static str,
    pub o_totalprice: Decimal,
    pub o_orderdate: Date,
    pub o_orderpriority: &'static str,
    pub o_clerk: String,
    pub o_shippriority: i32,
    pub o_comment: String,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}|{}|{}",
            self.o_orderkey,
            self.o_custkey,
            self.o_orderstatus,
            self.o_totalprice,
            self.o_orderdate,
            self.o_orderpriority,
            self.o_clerk,
            self.o_shippriority,
            self.o_comment
        )
    }
}

impl TblRow for Order {
    const TABLE: Table = Table::Orders;
}

/// The LINEITEM table
///
/// Ship, commit and receipt dates come from a single sampled date; no
/// ordering between them is modeled.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Foreign key to ORDERS
    pub l_orderkey: i64,
    /// Foreign key to PART
    pub l_partkey: i64,
    /// Foreign key to SUPPLIER
    pub l_suppkey: i64,
    /// 1-based position within the order
    pub l_linenumber: i32,
    pub l_quantity: i32,
    pub l_extendedprice: Decimal,
    pub l_discount: Decimal,
    pub l_tax: Decimal,
    pub l_returnflag: &'static str,
    pub l_linestatus: &'static str,
    pub l_shipdate: Date,
    pub l_commitdate: Date,
    pub l_receiptdate: Date,
    pub l_shipinstruct: &'static str,
    pub l_shipmode: &'static str,
    pub l_comment: String,
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
            self.l_orderkey,
            self.l_partkey,
            self.l_suppkey,
            self.l_linenumber,
            self.l_quantity,
            self.l_extendedprice,
            self.l_discount,
            self.l_tax,
            self.l_returnflag,
            self.l_linestatus,
            self.l_shipdate,
            self.l_commitdate,
            self.l_receiptdate,
            self.l_shipinstruct,
            self.l_shipmode,
            self.l_comment
        )
    }
}

impl TblRow for LineItem {
    const TABLE: Table = Table::Lineitem;
}

/// Key spaces the order hierarchy draws its foreign keys from.
#[derive(Debug, Clone, Copy)]
pub struct OrderKeySpace {
    pub customers: u64,
    pub parts: u64,
    pub suppliers: u64,
}

impl OrderKeySpace {
    fn validate(&self) -> Result<()> {
        let checks = [
            (Table::Customer, self.customers),
            (Table::Part, self.parts),
            (Table::Supplier, self.suppliers),
        ];
        for (table, count) in checks {
            if count == 0 {
                return Err(SynthError::InvalidCount { table, count: 0 });
            }
        }
        Ok(())
    }
}

/// Orders together with the line items they spawned.
#[derive(Debug, Default)]
pub struct OrderHierarchy {
    pub orders: Vec<Order>,
    pub lineitems: Vec<LineItem>,
}

fn build_order<R: Rng + ?Sized>(rng: &mut R, index: u64, customers: u64) -> Order {
    Order {
        o_orderkey: index as i64 + 1,
        o_custkey: key(rng, customers) as i64,
        o_orderstatus: pick(rng, ORDER_STATUSES),
        o_totalprice: money(rng, TOTALPRICE_MIN, TOTALPRICE_MAX),
        o_orderdate: date(rng),
        o_orderpriority: pick(rng, PRIORITIES),
        o_clerk: format!("Clerk#{:09}", rng.random_range(1..=CLERK_COUNT)),
        o_shippriority: rng.random_range(0..=1),
        o_comment: format!("Comment {index}"),
    }
}

fn build_lineitem<R: Rng + ?Sized>(
    rng: &mut R,
    orderkey: i64,
    linenumber: i32,
    keys: &OrderKeySpace,
) -> LineItem {
    let l_partkey = key(rng, keys.parts) as i64;
    let l_suppkey = key(rng, keys.suppliers) as i64;
    let l_quantity = rng.random_range(1..=QUANTITY_MAX);
    let unit_price = rng.random_range(UNIT_PRICE_MIN..=UNIT_PRICE_MAX);
    let l_discount = money(rng, 0, DISCOUNT_MAX);
    let l_tax = money(rng, 0, TAX_MAX);
    let l_returnflag = pick(rng, RETURN_FLAGS);
    let l_linestatus = pick(rng, LINE_STATUSES);
    let shipped = date(rng);

    LineItem {
        l_orderkey: orderkey,
        l_partkey,
        l_suppkey,
        l_linenumber: linenumber,
        l_quantity,
        l_extendedprice: Decimal::from_hundredths(l_quantity as i64 * unit_price),
        l_discount,
        l_tax,
        l_returnflag,
        l_linestatus,
        l_shipdate: shipped,
        l_commitdate: shipped,
        l_receiptdate: shipped,
        l_shipinstruct: pick(rng, SHIP_INSTRUCTIONS),
        l_shipmode: pick(rng, SHIP_MODES),
        l_comment: format!("Comment {orderkey}-{linenumber}"),
    }
}

/// Generates `order_count` orders keyed `1..=order_count` and their line
/// items. Fails only if a referenced key space is empty.
pub fn generate_orders<R: Rng + ?Sized>(
    rng: &mut R,
    order_count: u64,
    keys: OrderKeySpace,
) -> Result<OrderHierarchy> {
    if order_count == 0 {
        return Ok(OrderHierarchy::default());
    }
    keys.validate()?;

    let mut orders = Vec::with_capacity(order_count as usize);
    let mut lineitems = Vec::with_capacity(order_count as usize * 4);

    for index in 0..order_count {
        let order = build_order(rng, index, keys.customers);
        let fan_out = rng.random_range(1..=MAX_LINES_PER_ORDER);
        for linenumber in 1..=fan_out {
            lineitems.push(build_lineitem(rng, order.o_orderkey, linenumber, &keys));
        }
        orders.push(order);
    }

    Ok(OrderHierarchy { orders, lineitems })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const KEYS: OrderKeySpace = OrderKeySpace {
        customers: 150,
        parts: 200,
        suppliers: 10,
    };

    fn run(seed: u64, count: u64) -> OrderHierarchy {
        generate_orders(&mut StdRng::seed_from_u64(seed), count, KEYS).unwrap()
    }

    #[test]
    fn order_keys_and_customer_range() {
        let h = run(1, 1_500);
        assert_eq!(h.orders.len(), 1_500);
        for (i, o) in h.orders.iter().enumerate() {
            assert_eq!(o.o_orderkey, i as i64 + 1);
            assert!((1..=150).contains(&o.o_custkey));
            assert!(FIRST_DATE <= o.o_orderdate && o.o_orderdate <= LAST_DATE);
            assert!((0..=1).contains(&o.o_shippriority));
        }
        assert!(h.lineitems.len() >= 1_500 && h.lineitems.len() <= 7 * 1_500);
    }

    #[test]
    fn linenumbers_are_sequential_per_order() {
        let h = run(2, 800);
        let mut expected_order = 1;
        let mut expected_line = 1;
        for l in &h.lineitems {
            if l.l_orderkey != expected_order {
                assert_eq!(l.l_orderkey, expected_order + 1);
                assert_eq!(l.l_linenumber, 1);
                expected_order = l.l_orderkey;
                expected_line = 1;
            }
            assert_eq!(l.l_linenumber, expected_line);
            assert!(l.l_linenumber <= MAX_LINES_PER_ORDER);
            expected_line += 1;
        }
        assert_eq!(expected_order, 800);
    }

    #[test]
    fn lineitem_value_ranges() {
        let h = run(3, 500);
        for l in &h.lineitems {
            assert!((1..=200).contains(&l.l_partkey));
            assert!((1..=10).contains(&l.l_suppkey));
            assert!((1..=QUANTITY_MAX).contains(&l.l_quantity));
            assert!((0..=DISCOUNT_MAX).contains(&l.l_discount.hundredths()));
            assert!((0..=TAX_MAX).contains(&l.l_tax.hundredths()));
            let per_unit = l.l_extendedprice.hundredths() / l.l_quantity as i64;
            assert!((UNIT_PRICE_MIN..=UNIT_PRICE_MAX).contains(&per_unit));
            assert_eq!(l.l_shipdate, l.l_receiptdate);
            assert_eq!(
                l.to_string().split('|').count(),
                Table::Lineitem.columns().len()
            );
        }
    }

    #[test]
    fn empty_key_space_is_rejected() {
        let keys = OrderKeySpace {
            suppliers: 0,
            ..KEYS
        };
        let err = generate_orders(&mut StdRng::seed_from_u64(4), 10, keys).unwrap_err();
        assert!(matches!(
            err,
            SynthError::InvalidCount {
                table: Table::Supplier,
                ..
            }
        ));
        // no orders means nothing to reference
        assert!(generate_orders(&mut StdRng::seed_from_u64(4), 0, keys)
            .unwrap()
            .orders
            .is_empty());
    }

    #[test]
    fn same_seed_same_shape() {
        let a = run(5, 300);
        let b = run(5, 300);
        assert_eq!(a.lineitems.len(), b.lineitems.len());
        assert_eq!(a.orders, b.orders);
    }
}

//! Generators for the independent entities: CUSTOMER, SUPPLIER and PART.
//!
//! Keys are dense from 1. Every other attribute is drawn on its own from a
//! uniform range or a fixed vocabulary; the nation foreign key is uniform over
//! the nation keyspace with no skew.

use std::fmt;

use rand::Rng;

use crate::reference::Nation;
use crate::sampling::{money, phone, pick};
use crate::serializer::TblRow;
use crate::table::Table;
use crate::values::Decimal;

pub const SEGMENTS: &[&str] = &[
    "AUTOMOBILE",
    "BUILDING",
    "FURNITURE",
    "MACHINERY",
    "HOUSEHOLD",
];
pub const MANUFACTURERS: &[&str] = &[
    "Manufacturer#1",
    "Manufacturer#2",
    "Manufacturer#3",
    "Manufacturer#4",
    "Manufacturer#5",
];
pub const BRANDS: &[&str] = &["Brand#1", "Brand#2", "Brand#3", "Brand#4", "Brand#5"];
pub const PART_TYPES: &[&str] = &["STANDARD", "ECONOMY", "PROMO", "SMALL", "MEDIUM", "LARGE"];
pub const CONTAINERS: &[&str] = &[
    "SM CASE", "SM BOX", "SM PACK", "SM PKG", "MED CASE", "MED BOX", "MED PACK", "MED PKG",
    "LG CASE", "LG BOX", "LG PACK", "LG PKG",
];

/// Account balance bounds, in hundredths.
pub const ACCTBAL_MIN: i64 = -99_999;
pub const ACCTBAL_MAX: i64 = 999_999;
/// Retail price bounds, in hundredths.
pub const RETAILPRICE_MIN: i64 = 90_100;
pub const RETAILPRICE_MAX: i64 = 209_899;

fn address<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("Address {}", rng.random_range(1..=1000))
}

fn nation_key<R: Rng + ?Sized>(rng: &mut R, nations: &[Nation]) -> i64 {
    nations[rng.random_range(0..nations.len())].n_nationkey
}

/// The CUSTOMER table
///
/// ```text
/// 1|Customer#000000001|Address 312|17|25-989-741-2988|711.56|BUILDING|Comment 0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub c_custkey: i64,
    pub c_name: String,
    pub c_address: String,
    /// Foreign key to NATION
    pub c_nationkey: i64,
    pub c_phone: String,
    pub c_acctbal: Decimal,
    pub c_mktsegment: &'static str,
    pub c_comment: String,
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}|{}",
            self.c_custkey,
            self.c_name,
            self.c_address,
            self.c_nationkey,
            self.c_phone,
            self.c_acctbal,
            self.c_mktsegment,
            self.c_comment
        )
    }
}

impl TblRow for Customer {
    const TABLE: Table = Table::Customer;
}

/// Generates `count` customers keyed `1..=count`. `nations` must be non-empty.
pub fn generate_customers<R: Rng + ?Sized>(
    rng: &mut R,
    count: u64,
    nations: &[Nation],
) -> Vec<Customer> {
    (0..count)
        .map(|index| {
            let custkey = index as i64 + 1;
            Customer {
                c_custkey: custkey,
                c_name: format!("Customer#{custkey:09}"),
                c_address: address(rng),
                c_nationkey: nation_key(rng, nations),
                c_phone: phone(rng),
                c_acctbal: money(rng, ACCTBAL_MIN, ACCTBAL_MAX),
                c_mktsegment: pick(rng, SEGMENTS),
                c_comment: format!("Comment {index}"),
            }
        })
        .collect()
}

/// The SUPPLIER table
#[derive(Debug, Clone, PartialEq)]
pub struct Supplier {
    pub s_suppkey: i64,
    pub s_name: String,
    pub s_address: String,
    /// Foreign key to NATION
    pub s_nationkey: i64,
    pub s_phone: String,
    pub s_acctbal: Decimal,
    pub s_comment: String,
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}",
            self.s_suppkey,
            self.s_name,
            self.s_address,
            self.s_nationkey,
            self.s_phone,
            self.s_acctbal,
            self.s_comment
        )
    }
}

impl TblRow for Supplier {
    const TABLE: Table = Table::Supplier;
}

/// Generates `count` suppliers keyed `1..=count`. `nations` must be non-empty.
pub fn generate_suppliers<R: Rng + ?Sized>(
    rng: &mut R,
    count: u64,
    nations: &[Nation],
) -> Vec<Supplier> {
    (0..count)
        .map(|index| {
            let suppkey = index as i64 + 1;
            Supplier {
                s_suppkey: suppkey,
                s_name: format!("Supplier#{suppkey:09}"),
                s_address: address(rng),
                s_nationkey: nation_key(rng, nations),
                s_phone: phone(rng),
                s_acctbal: money(rng, ACCTBAL_MIN, ACCTBAL_MAX),
                s_comment: format!("Comment {index}"),
            }
        })
        .collect()
}

/// The PART table
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub p_partkey: i64,
    pub p_name: String,
    pub p_mfgr: &'static str,
    pub p_brand: &'static str,
    pub p_type: &'static str,
    pub p_size: i32,
    pub p_container: &'static str,
    pub p_retailprice: Decimal,
    pub p_comment: String,
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}|{}|{}",
            self.p_partkey,
            self.p_name,
            self.p_mfgr,
            self.p_brand,
            self.p_type,
            self.p_size,
            self.p_container,
            self.p_retailprice,
            self.p_comment
        )
    }
}

impl TblRow for Part {
    const TABLE: Table = Table::Part;
}

/// Generates `count` parts keyed `1..=count`.
pub fn generate_parts<R: Rng + ?Sized>(rng: &mut R, count: u64) -> Vec<Part> {
    (0..count)
        .map(|index| {
            let partkey = index as i64 + 1;
            Part {
                p_partkey: partkey,
                p_name: format!("Part {partkey}"),
                p_mfgr: pick(rng, MANUFACTURERS),
                p_brand: pick(rng, BRANDS),
                p_type: pick(rng, PART_TYPES),
                p_size: rng.random_range(1..=50),
                p_container: pick(rng, CONTAINERS),
                p_retailprice: money(rng, RETAILPRICE_MIN, RETAILPRICE_MAX),
                p_comment: format!("Comment {index}"),
            }
        })
        .collect()
}

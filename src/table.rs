//! Table identifiers, file naming and column layouts.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::SynthError;

/// One of the eight generated TPC-H tables.
///
/// Variants are declared in generation order: reference data first, then the
/// independent entities, then the tables that reference them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    /// Region table (5 rows)
    Region,
    /// Nation table (25 rows)
    Nation,
    /// Customer table (150,000 rows at SF=1)
    Customer,
    /// Supplier table (10,000 rows at SF=1)
    Supplier,
    /// Part table (200,000 rows at SF=1)
    Part,
    /// Part-Supplier relationship, up to 4 rows per part
    Partsupp,
    /// Orders table (1,500,000 rows at SF=1)
    Orders,
    /// Line item table, 1 to 7 rows per order
    Lineitem,
}

const REGION_COLUMNS: &[&str] = &["r_regionkey", "r_name", "r_comment"];
const NATION_COLUMNS: &[&str] = &["n_nationkey", "n_name", "n_regionkey", "n_comment"];
const CUSTOMER_COLUMNS: &[&str] = &[
    "c_custkey",
    "c_name",
    "c_address",
    "c_nationkey",
    "c_phone",
    "c_acctbal",
    "c_mktsegment",
    "c_comment",
];
const SUPPLIER_COLUMNS: &[&str] = &[
    "s_suppkey",
    "s_name",
    "s_address",
    "s_nationkey",
    "s_phone",
    "s_acctbal",
    "s_comment",
];
const PART_COLUMNS: &[&str] = &[
    "p_partkey",
    "p_name",
    "p_mfgr",
    "p_brand",
    "p_type",
    "p_size",
    "p_container",
    "p_retailprice",
    "p_comment",
];
const PARTSUPP_COLUMNS: &[&str] = &[
    "ps_partkey",
    "ps_suppkey",
    "ps_availqty",
    "ps_supplycost",
    "ps_comment",
];
const ORDERS_COLUMNS: &[&str] = &[
    "o_orderkey",
    "o_custkey",
    "o_orderstatus",
    "o_totalprice",
    "o_orderdate",
    "o_orderpriority",
    "o_clerk",
    "o_shippriority",
    "o_comment",
];
const LINEITEM_COLUMNS: &[&str] = &[
    "l_orderkey",
    "l_partkey",
    "l_suppkey",
    "l_linenumber",
    "l_quantity",
    "l_extendedprice",
    "l_discount",
    "l_tax",
    "l_returnflag",
    "l_linestatus",
    "l_shipdate",
    "l_commitdate",
    "l_receiptdate",
    "l_shipinstruct",
    "l_shipmode",
    "l_comment",
];

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Region,
        Table::Nation,
        Table::Customer,
        Table::Supplier,
        Table::Part,
        Table::Partsupp,
        Table::Orders,
        Table::Lineitem,
    ];

    /// The table name, also used as the file stem.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Region => "region",
            Table::Nation => "nation",
            Table::Customer => "customer",
            Table::Supplier => "supplier",
            Table::Part => "part",
            Table::Partsupp => "partsupp",
            Table::Orders => "orders",
            Table::Lineitem => "lineitem",
        }
    }

    /// Column names in file order. The header row is exactly this list.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Region => REGION_COLUMNS,
            Table::Nation => NATION_COLUMNS,
            Table::Customer => CUSTOMER_COLUMNS,
            Table::Supplier => SUPPLIER_COLUMNS,
            Table::Part => PART_COLUMNS,
            Table::Partsupp => PARTSUPP_COLUMNS,
            Table::Orders => ORDERS_COLUMNS,
            Table::Lineitem => LINEITEM_COLUMNS,
        }
    }

    /// Conventional file name for the given extension, e.g. `orders.tbl`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.name())
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Table {
    type Err = SynthError;

    /// Accepts the full table name or the dbgen single-letter alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "r" | "region" => Ok(Table::Region),
            "n" | "nation" => Ok(Table::Nation),
            "c" | "customer" => Ok(Table::Customer),
            "s" | "supplier" => Ok(Table::Supplier),
            "P" | "part" => Ok(Table::Part),
            "S" | "partsupp" => Ok(Table::Partsupp),
            "O" | "orders" => Ok(Table::Orders),
            "L" | "lineitem" => Ok(Table::Lineitem),
            other => Err(SynthError::UnknownTable(other.to_string())),
        }
    }
}

//! Referential-integrity and range checks over a generated `.tbl` directory.
//!
//! Tables are checked parents first so that foreign keys can be tested
//! against the row counts actually found on disk. A table whose file is
//! missing is reported and its dependents skip the corresponding check.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use ahash::AHashSet;
use tracing::{info, warn};

use crate::entities::{ACCTBAL_MAX, ACCTBAL_MIN, RETAILPRICE_MAX, RETAILPRICE_MIN};
use crate::error::Result;
use crate::orders::{DISCOUNT_MAX, FIRST_DATE, LAST_DATE, MAX_LINES_PER_ORDER, QUANTITY_MAX, TAX_MAX};
use crate::partsupp::MAX_SUPPLIERS_PER_PART;
use crate::reader::{for_each_record, tbl_path, Record};
use crate::reference::{nations, regions};
use crate::table::Table;
use crate::values::{Date, Decimal};

/// Violations kept verbatim; further ones are only counted.
const MAX_RECORDED_VIOLATIONS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub table: Table,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}: {}", self.table, self.line, self.message)
    }
}

#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Rows found per table that was present.
    pub row_counts: BTreeMap<Table, u64>,
    pub missing: Vec<Table>,
    pub violations: Vec<Violation>,
    pub violation_count: u64,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.violation_count == 0
    }

    fn flag(&mut self, record: &Record<'_>, message: impl Into<String>) {
        self.violation_count += 1;
        if self.violations.len() < MAX_RECORDED_VIOLATIONS {
            self.violations.push(Violation {
                table: record.table,
                line: record.line,
                message: message.into(),
            });
        }
    }

    /// Records a violation that concerns the table as a whole.
    fn flag_table(&mut self, table: Table, message: impl Into<String>) {
        self.violation_count += 1;
        if self.violations.len() < MAX_RECORDED_VIOLATIONS {
            self.violations.push(Violation {
                table,
                line: 0,
                message: message.into(),
            });
        }
    }

    fn count(&self, table: Table) -> Option<u64> {
        self.row_counts.get(&table).copied()
    }
}

fn in_range(value: i64, parent: Option<u64>) -> bool {
    match parent {
        Some(count) => value >= 1 && value as u64 <= count,
        None => true,
    }
}

/// Checks every table present in `dir`.
pub fn verify_dir(dir: &Path) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();
    for table in Table::ALL {
        let path = tbl_path(dir, table);
        if !path.exists() {
            warn!(%table, path = %path.display(), "table file missing, skipping");
            report.missing.push(table);
            continue;
        }
        let rows = match table {
            Table::Region => check_region(&path, &mut report)?,
            Table::Nation => check_nation(&path, &mut report)?,
            Table::Customer | Table::Supplier => check_account_holder(&path, table, &mut report)?,
            Table::Part => check_part(&path, &mut report)?,
            Table::Partsupp => check_partsupp(&path, &mut report)?,
            Table::Orders => check_orders(&path, &mut report)?,
            Table::Lineitem => check_lineitem(&path, &mut report)?,
        };
        info!(%table, rows, "verified");
        report.row_counts.insert(table, rows);
    }
    Ok(report)
}

fn check_region(path: &Path, report: &mut VerifyReport) -> Result<u64> {
    let expected = regions();
    let rows = for_each_record(path, Table::Region, |r| {
        let key: i64 = r.parse(0)?;
        match expected.get(key as usize) {
            Some(region) if region.r_name == r.text(1) => {}
            _ => report.flag(r, format!("unexpected region {key} '{}'", r.text(1))),
        }
        Ok(())
    })?;
    if rows != expected.len() as u64 {
        report.flag_table(Table::Region, format!("expected {} rows, found {rows}", expected.len()));
    }
    Ok(rows)
}

fn check_nation(path: &Path, report: &mut VerifyReport) -> Result<u64> {
    let expected = nations();
    let rows = for_each_record(path, Table::Nation, |r| {
        let key: i64 = r.parse(0)?;
        let regionkey: i64 = r.parse(2)?;
        match expected.get(key as usize) {
            Some(n) if n.n_name == r.text(1) && n.n_regionkey == regionkey => {}
            _ => report.flag(r, format!("unexpected nation {key} '{}'", r.text(1))),
        }
        Ok(())
    })?;
    if rows != expected.len() as u64 {
        report.flag_table(Table::Nation, format!("expected {} rows, found {rows}", expected.len()));
    }
    Ok(rows)
}

/// CUSTOMER and SUPPLIER share key, nation and balance columns at the same
/// positions (0, 3, 5).
fn check_account_holder(path: &Path, table: Table, report: &mut VerifyReport) -> Result<u64> {
    let nation_count = nations().len() as i64;
    let mut next_key = 1;
    for_each_record(path, table, |r| {
        let key: i64 = r.parse(0)?;
        let nationkey: i64 = r.parse(3)?;
        let balance: Decimal = r.parse(5)?;
        if key != next_key {
            report.flag(r, format!("key {key} out of sequence, expected {next_key}"));
        }
        next_key = key + 1;
        if !(0..nation_count).contains(&nationkey) {
            report.flag(r, format!("nationkey {nationkey} not in NATION"));
        }
        if !(ACCTBAL_MIN..=ACCTBAL_MAX).contains(&balance.hundredths()) {
            report.flag(r, format!("account balance {balance} out of range"));
        }
        Ok(())
    })
}

fn check_part(path: &Path, report: &mut VerifyReport) -> Result<u64> {
    let mut next_key = 1;
    for_each_record(path, Table::Part, |r| {
        let key: i64 = r.parse(0)?;
        let size: i32 = r.parse(5)?;
        let price: Decimal = r.parse(7)?;
        if key != next_key {
            report.flag(r, format!("key {key} out of sequence, expected {next_key}"));
        }
        next_key = key + 1;
        if !(1..=50).contains(&size) {
            report.flag(r, format!("size {size} out of range"));
        }
        if !(RETAILPRICE_MIN..=RETAILPRICE_MAX).contains(&price.hundredths()) {
            report.flag(r, format!("retail price {price} out of range"));
        }
        Ok(())
    })
}

fn check_partsupp(path: &Path, report: &mut VerifyReport) -> Result<u64> {
    let parts = report.count(Table::Part);
    let suppliers = report.count(Table::Supplier);
    let mut seen: AHashSet<(i64, i64)> = AHashSet::new();
    let mut per_part: BTreeMap<i64, u64> = BTreeMap::new();
    let rows = for_each_record(path, Table::Partsupp, |r| {
        let partkey: i64 = r.parse(0)?;
        let suppkey: i64 = r.parse(1)?;
        if !in_range(partkey, parts) {
            report.flag(r, format!("partkey {partkey} not in PART"));
        }
        if !in_range(suppkey, suppliers) {
            report.flag(r, format!("suppkey {suppkey} not in SUPPLIER"));
        }
        if !seen.insert((partkey, suppkey)) {
            report.flag(r, format!("duplicate pair ({partkey}, {suppkey})"));
        }
        let fan_out = per_part.entry(partkey).or_default();
        *fan_out += 1;
        if *fan_out > MAX_SUPPLIERS_PER_PART {
            report.flag(r, format!("part {partkey} has more than {MAX_SUPPLIERS_PER_PART} suppliers"));
        }
        Ok(())
    })?;

    if let Some(parts) = parts {
        let covered = (1..=parts as i64).filter(|key| per_part.contains_key(key)).count() as u64;
        if covered != parts {
            report.flag_table(
                Table::Partsupp,
                format!("{} of {parts} parts have no supplier", parts - covered),
            );
        }
    }
    Ok(rows)
}

fn check_orders(path: &Path, report: &mut VerifyReport) -> Result<u64> {
    let customers = report.count(Table::Customer);
    let mut next_key = 1;
    for_each_record(path, Table::Orders, |r| {
        let key: i64 = r.parse(0)?;
        let custkey: i64 = r.parse(1)?;
        let date: Date = r.parse(4)?;
        if key != next_key {
            report.flag(r, format!("key {key} out of sequence, expected {next_key}"));
        }
        next_key = key + 1;
        if !in_range(custkey, customers) {
            report.flag(r, format!("custkey {custkey} not in CUSTOMER"));
        }
        if date < FIRST_DATE || date > LAST_DATE {
            report.flag(r, format!("order date {date} out of range"));
        }
        Ok(())
    })
}

fn check_lineitem(path: &Path, report: &mut VerifyReport) -> Result<u64> {
    let orders = report.count(Table::Orders);
    let parts = report.count(Table::Part);
    let suppliers = report.count(Table::Supplier);
    let mut finished_orders: AHashSet<i64> = AHashSet::new();
    let mut current: Option<(i64, i32)> = None;

    let rows = for_each_record(path, Table::Lineitem, |r| {
        let orderkey: i64 = r.parse(0)?;
        let partkey: i64 = r.parse(1)?;
        let suppkey: i64 = r.parse(2)?;
        let linenumber: i32 = r.parse(3)?;
        let quantity: i32 = r.parse(4)?;
        let discount: Decimal = r.parse(6)?;
        let tax: Decimal = r.parse(7)?;

        let expected_line = match current {
            Some((key, last)) if key == orderkey => last + 1,
            Some((key, _)) => {
                finished_orders.insert(key);
                1
            }
            None => 1,
        };
        if finished_orders.contains(&orderkey) {
            report.flag(r, format!("order {orderkey} line items are not contiguous"));
        }
        if linenumber != expected_line || linenumber > MAX_LINES_PER_ORDER {
            report.flag(
                r,
                format!("linenumber {linenumber} for order {orderkey}, expected {expected_line}"),
            );
        }
        current = Some((orderkey, linenumber));

        if !in_range(orderkey, orders) {
            report.flag(r, format!("orderkey {orderkey} not in ORDERS"));
        }
        if !in_range(partkey, parts) {
            report.flag(r, format!("partkey {partkey} not in PART"));
        }
        if !in_range(suppkey, suppliers) {
            report.flag(r, format!("suppkey {suppkey} not in SUPPLIER"));
        }
        if !(1..=QUANTITY_MAX).contains(&quantity) {
            report.flag(r, format!("quantity {quantity} out of range"));
        }
        if !(0..=DISCOUNT_MAX).contains(&discount.hundredths()) {
            report.flag(r, format!("discount {discount} out of range"));
        }
        if !(0..=TAX_MAX).contains(&tax.hundredths()) {
            report.flag(r, format!("tax {tax} out of range"));
        }
        Ok(())
    })?;

    if let Some((key, _)) = current {
        finished_orders.insert(key);
    }
    if let Some(orders) = orders {
        if finished_orders.len() as u64 != orders {
            report.flag_table(
                Table::Lineitem,
                format!("{} of {orders} orders have line items", finished_orders.len()),
            );
        }
    }
    Ok(rows)
}

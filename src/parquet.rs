//! Apache Parquet output through `arrow2`.
//!
//! Every table is converted to a single Arrow chunk and written as one row
//! group. Keys are Int64, money and ratios `Decimal(15, 2)`, dates and text
//! Utf8.

use std::fs::{self, File};
use std::path::Path;

use arrow2::array::{Array, Int32Array, Int64Array, PrimitiveArray, Utf8Array};
use arrow2::chunk::Chunk;
use arrow2::datatypes::{DataType, Field, Schema};
use arrow2::io::parquet::write::{
    transverse, CompressionOptions, Encoding, FileWriter, RowGroupIterator, Version, WriteOptions,
};
use tracing::debug;

use crate::entities::{Customer, Part, Supplier};
use crate::error::{Result, SynthError};
use crate::orders::{LineItem, Order};
use crate::partsupp::PartSupp;
use crate::reference::{Nation, Region};
use crate::serializer::{staging_path, TblRow};

static WRITE_OPTIONS: WriteOptions = WriteOptions {
    write_statistics: true,
    compression: CompressionOptions::Snappy,
    version: Version::V2,
    data_pagesize_limit: None,
};

const MONEY: DataType = DataType::Decimal(15, 2);

macro_rules! int64 {
    ($rows:expr, $field:ident) => {
        Int64Array::from_vec($rows.iter().map(|r| r.$field).collect()).boxed()
    };
}

macro_rules! int32 {
    ($rows:expr, $field:ident) => {
        Int32Array::from_vec($rows.iter().map(|r| r.$field).collect()).boxed()
    };
}

macro_rules! utf8 {
    ($rows:expr, $field:ident) => {
        Utf8Array::<i32>::from_slice(
            $rows
                .iter()
                .map(|r| r.$field.to_string())
                .collect::<Vec<_>>(),
        )
        .boxed()
    };
}

macro_rules! money {
    ($rows:expr, $field:ident) => {
        PrimitiveArray::<i128>::from_vec(
            $rows
                .iter()
                .map(|r| r.$field.hundredths() as i128)
                .collect(),
        )
        .to(MONEY)
        .boxed()
    };
}

/// A row type that can be laid out as Arrow columns, in table column order.
pub trait ArrowRow: TblRow + Sized {
    fn data_types() -> Vec<DataType>;
    fn arrays(rows: &[Self]) -> Vec<Box<dyn Array>>;

    fn schema() -> Schema {
        let fields: Vec<Field> = Self::TABLE
            .columns()
            .iter()
            .zip(Self::data_types())
            .map(|(name, data_type)| Field::new(*name, data_type, false))
            .collect();
        Schema::from(fields)
    }
}

impl ArrowRow for Region {
    fn data_types() -> Vec<DataType> {
        vec![DataType::Int64, DataType::Utf8, DataType::Utf8]
    }

    fn arrays(rows: &[Self]) -> Vec<Box<dyn Array>> {
        vec![
            int64!(rows, r_regionkey),
            utf8!(rows, r_name),
            utf8!(rows, r_comment),
        ]
    }
}

impl ArrowRow for Nation {
    fn data_types() -> Vec<DataType> {
        vec![
            DataType::Int64,
            DataType::Utf8,
            DataType::Int64,
            DataType::Utf8,
        ]
    }

    fn arrays(rows: &[Self]) -> Vec<Box<dyn Array>> {
        vec![
            int64!(rows, n_nationkey),
            utf8!(rows, n_name),
            int64!(rows, n_regionkey),
            utf8!(rows, n_comment),
        ]
    }
}

impl ArrowRow for Customer {
    fn data_types() -> Vec<DataType> {
        vec![
            DataType::Int64,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Int64,
            DataType::Utf8,
            MONEY,
            DataType::Utf8,
            DataType::Utf8,
        ]
    }

    fn arrays(rows: &[Self]) -> Vec<Box<dyn Array>> {
        vec![
            int64!(rows, c_custkey),
            utf8!(rows, c_name),
            utf8!(rows, c_address),
            int64!(rows, c_nationkey),
            utf8!(rows, c_phone),
            money!(rows, c_acctbal),
            utf8!(rows, c_mktsegment),
            utf8!(rows, c_comment),
        ]
    }
}

impl ArrowRow for Supplier {
    fn data_types() -> Vec<DataType> {
        vec![
            DataType::Int64,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Int64,
            DataType::Utf8,
            MONEY,
            DataType::Utf8,
        ]
    }

    fn arrays(rows: &[Self]) -> Vec<Box<dyn Array>> {
        vec![
            int64!(rows, s_suppkey),
            utf8!(rows, s_name),
            utf8!(rows, s_address),
            int64!(rows, s_nationkey),
            utf8!(rows, s_phone),
            money!(rows, s_acctbal),
            utf8!(rows, s_comment),
        ]
    }
}

impl ArrowRow for Part {
    fn data_types() -> Vec<DataType> {
        vec![
            DataType::Int64,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Int32,
            DataType::Utf8,
            MONEY,
            DataType::Utf8,
        ]
    }

    fn arrays(rows: &[Self]) -> Vec<Box<dyn Array>> {
        vec![
            int64!(rows, p_partkey),
            utf8!(rows, p_name),
            utf8!(rows, p_mfgr),
            utf8!(rows, p_brand),
            utf8!(rows, p_type),
            int32!(rows, p_size),
            utf8!(rows, p_container),
            money!(rows, p_retailprice),
            utf8!(rows, p_comment),
        ]
    }
}

impl ArrowRow for PartSupp {
    fn data_types() -> Vec<DataType> {
        vec![
            DataType::Int64,
            DataType::Int64,
            DataType::Int32,
            MONEY,
            DataType::Utf8,
        ]
    }

    fn arrays(rows: &[Self]) -> Vec<Box<dyn Array>> {
        vec![
            int64!(rows, ps_partkey),
            int64!(rows, ps_suppkey),
            int32!(rows, ps_availqty),
            money!(rows, ps_supplycost),
            utf8!(rows, ps_comment),
        ]
    }
}

impl ArrowRow for Order {
    fn data_types() -> Vec<DataType> {
        vec![
            DataType::Int64,
            DataType::Int64,
            DataType::Utf8,
            MONEY,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Int32,
            DataType::Utf8,
        ]
    }

    fn arrays(rows: &[Self]) -> Vec<Box<dyn Array>> {
        vec![
            int64!(rows, o_orderkey),
            int64!(rows, o_custkey),
            utf8!(rows, o_orderstatus),
            money!(rows, o_totalprice),
            utf8!(rows, o_orderdate),
            utf8!(rows, o_orderpriority),
            utf8!(rows, o_clerk),
            int32!(rows, o_shippriority),
            utf8!(rows, o_comment),
        ]
    }
}

impl ArrowRow for LineItem {
    fn data_types() -> Vec<DataType> {
        vec![
            DataType::Int64,
            DataType::Int64,
            DataType::Int64,
            DataType::Int32,
            DataType::Int32,
            MONEY,
            MONEY,
            MONEY,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Utf8,
            DataType::Utf8,
        ]
    }

    fn arrays(rows: &[Self]) -> Vec<Box<dyn Array>> {
        vec![
            int64!(rows, l_orderkey),
            int64!(rows, l_partkey),
            int64!(rows, l_suppkey),
            int32!(rows, l_linenumber),
            int32!(rows, l_quantity),
            money!(rows, l_extendedprice),
            money!(rows, l_discount),
            money!(rows, l_tax),
            utf8!(rows, l_returnflag),
            utf8!(rows, l_linestatus),
            utf8!(rows, l_shipdate),
            utf8!(rows, l_commitdate),
            utf8!(rows, l_receiptdate),
            utf8!(rows, l_shipinstruct),
            utf8!(rows, l_shipmode),
            utf8!(rows, l_comment),
        ]
    }
}

/// Writes `rows` to `path` as a single-row-group Parquet file, staged through
/// `<path>.tmp` like the `.tbl` writer.
pub fn write_parquet<T: ArrowRow>(rows: &[T], path: &Path) -> Result<()> {
    let table = T::TABLE;
    let encode_err = |source: arrow2::error::Error| SynthError::Parquet { table, source };

    let schema = T::schema();
    let chunk = Chunk::try_new(T::arrays(rows)).map_err(encode_err)?;
    let encodings = schema
        .fields
        .iter()
        .map(|f| transverse(&f.data_type, |_| Encoding::Plain))
        .collect();
    let row_groups =
        RowGroupIterator::try_new(vec![Ok(chunk)].into_iter(), &schema, WRITE_OPTIONS, encodings)
            .map_err(encode_err)?;

    let staged = staging_path(path);
    let file = File::create(&staged).map_err(|source| SynthError::Write {
        table,
        path: staged.clone(),
        source,
    })?;

    let mut writer = FileWriter::try_new(file, schema, WRITE_OPTIONS).map_err(encode_err)?;
    for group in row_groups {
        writer.write(group.map_err(encode_err)?).map_err(encode_err)?;
    }
    let size = writer.end(None).map_err(encode_err)?;

    fs::rename(&staged, path).map_err(|source| SynthError::Write {
        table,
        path: path.to_path_buf(),
        source,
    })?;
    debug!(%table, rows = rows.len(), bytes = size, path = %path.display(), "wrote parquet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{nations, regions};
    use crate::table::Table;
    use std::io::Read;

    fn assert_aligned<T: ArrowRow>() {
        assert_eq!(T::data_types().len(), T::TABLE.columns().len(), "{}", T::TABLE);
    }

    #[test]
    fn schemas_cover_every_column() {
        assert_aligned::<Region>();
        assert_aligned::<Nation>();
        assert_aligned::<Customer>();
        assert_aligned::<Supplier>();
        assert_aligned::<Part>();
        assert_aligned::<PartSupp>();
        assert_aligned::<Order>();
        assert_aligned::<LineItem>();
        assert_eq!(LineItem::schema().fields[0].name, "l_orderkey");
    }

    #[test]
    fn arrays_have_one_entry_per_row() {
        let arrays = Nation::arrays(nations());
        assert_eq!(arrays.len(), Table::Nation.columns().len());
        assert!(arrays.iter().all(|a| a.len() == 25));
    }

    #[test]
    fn writes_parquet_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.parquet");
        write_parquet(regions(), &path).unwrap();

        let mut magic = [0u8; 4];
        File::open(&path).unwrap().read_exact(&mut magic).unwrap();
        assert_eq!(&magic, b"PAR1");
        assert!(!staging_path(&path).exists());
    }
}

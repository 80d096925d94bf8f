use crate::Mat;

use parquet::basic::Type as ParquetType;
use parquet::basic::{Compression, ConvertedType, ZstdLevel};
use parquet::data_type::{ByteArray, ByteArrayType, DoubleType};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::Type;
use std::fs::File;
use std::sync::Arc;

///
/// Write a dense factor matrix in long format: one record per
/// `(row, factor, value)` cell, zstd-compressed.
///
/// * `row_names`: external names for the matrix rows; the dense row
///   number is used when absent
/// * `factors`: rows x K matrix
/// * `file_path`: output parquet file
///
pub fn write_factors_parquet(
    row_names: Option<&[Box<str>]>,
    factors: &Mat,
    file_path: &str,
) -> anyhow::Result<()> {
    if let Some(names) = row_names {
        anyhow::ensure!(
            names.len() == factors.nrows(),
            "number of row names and matrix rows should match"
        );
    }

    // define schema
    let fields = vec![
        ("row", ParquetType::BYTE_ARRAY, ConvertedType::UTF8),
        ("factor", ParquetType::BYTE_ARRAY, ConvertedType::UTF8),
        ("value", ParquetType::DOUBLE, ConvertedType::NONE),
    ];

    let schema = Arc::new(
        Type::group_type_builder("FactorMatrix")
            .with_fields(
                fields
                    .into_iter()
                    .map(|(name, parquet_type, converted_type)| {
                        Arc::new(
                            Type::primitive_type_builder(name, parquet_type)
                                .with_repetition(parquet::basic::Repetition::REQUIRED)
                                .with_converted_type(converted_type)
                                .build()
                                .unwrap(),
                        )
                    })
                    .collect(),
            )
            .build()?,
    );

    // melt the matrix into long-format columns
    let nelem = factors.nrows() * factors.ncols();
    let mut rows = Vec::with_capacity(nelem);
    let mut cols = Vec::with_capacity(nelem);
    let mut values = Vec::with_capacity(nelem);

    for k in 0..factors.ncols() {
        let factor_label = ByteArray::from(k.to_string().as_bytes());
        for r in 0..factors.nrows() {
            let row_label = if let Some(names) = row_names {
                ByteArray::from(names[r].as_ref())
            } else {
                ByteArray::from(r.to_string().as_bytes())
            };
            rows.push(row_label);
            cols.push(factor_label.clone());
            values.push(factors[(r, k)]);
        }
    }

    // write data to parquet
    let file = File::create(file_path)?;
    let zstd_level = ZstdLevel::try_new(5)?;
    let writer_properties = Arc::new(
        WriterProperties::builder()
            .set_compression(Compression::ZSTD(zstd_level))
            .build(),
    );
    let mut writer = SerializedFileWriter::new(file, schema, writer_properties)?;
    let mut row_group_writer = writer.next_row_group()?;

    for data in [&rows, &cols] {
        if let Some(mut column_writer) = row_group_writer.next_column()? {
            let typed_writer = column_writer.typed::<ByteArrayType>();
            typed_writer.write_batch(data, None, None)?;
            column_writer.close()?;
        }
    }

    if let Some(mut column_writer) = row_group_writer.next_column()? {
        let typed_writer = column_writer.typed::<DoubleType>();
        typed_writer.write_batch(&values, None, None)?;
        column_writer.close()?;
    }

    row_group_writer.close()?;
    writer.close()?;

    Ok(())
}

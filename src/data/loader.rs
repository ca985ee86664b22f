use std::io::Read;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{DataError, Result};
use super::model::{
    missing_columns, Dataset, Record, COL_COMPANY_SIZE, COL_CONTRACT, COL_REMOTE, COL_RESIDENCE,
    COL_ROLE, COL_SALARY_USD, COL_SENIORITY, COL_YEAR,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a salary dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the required columns (recommended)
/// * `.json`    – `[{ "ano": 2023, "senioridade": "senior", ... }, ...]`
/// * `.parquet` – flat table with the required columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv_reader(std::fs::File::open(path)?),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row, then one record per line. Columns beyond the
/// required ones are ignored; cells are trimmed.
pub fn load_csv_reader<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let missing = missing_columns(headers.iter());
    if !missing.is_empty() {
        return Err(DataError::Schema { missing });
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<Record>().enumerate() {
        let record = result.map_err(|e| csv_parse_error(row_no, &headers, &e))?;
        record.validate(row_no)?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

/// Turn a csv deserialisation failure into a row-level [`DataError::Parse`].
fn csv_parse_error(row_no: usize, headers: &csv::StringRecord, err: &csv::Error) -> DataError {
    let column = match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err
            .field()
            .and_then(|idx| headers.get(idx as usize))
            .unwrap_or("?")
            .to_string(),
        _ => "?".to_string(),
    };
    DataError::Parse {
        row: row_no,
        column,
        message: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "ano": 2023, "senioridade": "senior", "contrato": "integral",
///     "tamanho_empresa": "grande", "cargo": "Data Scientist", "usd": 150000,
///     "remoto": "remoto", "residencia_iso3": "USA" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root.as_array().ok_or_else(|| DataError::Parse {
        row: 0,
        column: "<root>".to_string(),
        message: "expected a top-level JSON array".to_string(),
    })?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DataError::parse(row_no, "<row>", "not a JSON object"))?;

        let missing = missing_columns(obj.keys().map(String::as_str));
        if !missing.is_empty() {
            return Err(DataError::Schema { missing });
        }

        let record: Record = serde_json::from_value(row.clone())
            .map_err(|e| DataError::parse(row_no, "<row>", e.to_string()))?;
        record.validate(row_no)?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the salary table.
///
/// `ano` is a 32- or 64-bit integer, `usd` a 32- or 64-bit integer or float,
/// the rest UTF-8 strings, plain or dictionary-encoded (Pandas `category`, Polars
/// `Categorical`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    // Checked up front: a file without rows yields no batches.
    let missing = missing_columns(builder.schema().fields().iter().map(|f| f.name().as_str()));
    if !missing.is_empty() {
        return Err(DataError::Schema { missing });
    }

    let mut records = Vec::new();
    let mut row_offset = 0usize;

    for batch_result in builder.build()? {
        let batch = batch_result?;

        let year = column(&batch, COL_YEAR)?;
        let seniority = text_column(&batch, COL_SENIORITY)?;
        let contract = text_column(&batch, COL_CONTRACT)?;
        let size = text_column(&batch, COL_COMPANY_SIZE)?;
        let role = text_column(&batch, COL_ROLE)?;
        let usd = column(&batch, COL_SALARY_USD)?;
        let remote = text_column(&batch, COL_REMOTE)?;
        let residence = text_column(&batch, COL_RESIDENCE)?;

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row;
            let record = Record {
                year: extract_i64(&year, row, row_no, COL_YEAR)?,
                seniority: extract_string(&seniority, row, row_no, COL_SENIORITY)?,
                contract_type: extract_string(&contract, row, row_no, COL_CONTRACT)?,
                company_size: extract_string(&size, row, row_no, COL_COMPANY_SIZE)?,
                role: extract_string(&role, row, row_no, COL_ROLE)?,
                salary_usd: extract_f64(&usd, row, row_no, COL_SALARY_USD)?,
                remote_ratio: extract_string(&remote, row, row_no, COL_REMOTE)?,
                residence_country_code: extract_string(&residence, row, row_no, COL_RESIDENCE)?,
            };
            record.validate(row_no)?;
            records.push(record);
        }
        row_offset += batch.num_rows();
    }

    Ok(Dataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    batch
        .column_by_name(name)
        .cloned()
        .ok_or_else(|| DataError::Schema {
            missing: vec![name.to_string()],
        })
}

/// A text column with dictionary encoding unpacked to plain `Utf8`.
fn text_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    let col = column(batch, name)?;
    match col.data_type() {
        DataType::Dictionary(_, values)
            if matches!(values.as_ref(), DataType::Utf8 | DataType::LargeUtf8) =>
        {
            Ok(cast(&col, &DataType::Utf8)?)
        }
        _ => Ok(col),
    }
}

fn extract_i64(col: &ArrayRef, row: usize, row_no: usize, name: &str) -> Result<i64> {
    if col.is_null(row) {
        return Err(DataError::parse(row_no, name, "null value"));
    }
    match col.data_type() {
        DataType::Int64 => downcast::<Int64Array>(col, row_no, name).map(|a| a.value(row)),
        DataType::Int32 => {
            downcast::<Int32Array>(col, row_no, name).map(|a| i64::from(a.value(row)))
        }
        other => Err(DataError::parse(
            row_no,
            name,
            format!("expected an integer column, got {other:?}"),
        )),
    }
}

fn extract_f64(col: &ArrayRef, row: usize, row_no: usize, name: &str) -> Result<f64> {
    if col.is_null(row) {
        return Err(DataError::parse(row_no, name, "null value"));
    }
    match col.data_type() {
        DataType::Float64 => downcast::<Float64Array>(col, row_no, name).map(|a| a.value(row)),
        DataType::Float32 => {
            downcast::<Float32Array>(col, row_no, name).map(|a| f64::from(a.value(row)))
        }
        DataType::Int64 => {
            downcast::<Int64Array>(col, row_no, name).map(|a| a.value(row) as f64)
        }
        DataType::Int32 => {
            downcast::<Int32Array>(col, row_no, name).map(|a| f64::from(a.value(row)))
        }
        other => Err(DataError::parse(
            row_no,
            name,
            format!("expected a numeric column, got {other:?}"),
        )),
    }
}

fn extract_string(col: &ArrayRef, row: usize, row_no: usize, name: &str) -> Result<String> {
    if col.is_null(row) {
        return Err(DataError::parse(row_no, name, "null value"));
    }
    match col.data_type() {
        DataType::Utf8 => {
            downcast::<StringArray>(col, row_no, name).map(|a| a.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => Err(DataError::parse(
            row_no,
            name,
            format!("expected a string column, got {other:?}"),
        )),
    }
}

fn downcast<'a, T: Array + 'static>(
    col: &'a ArrayRef,
    row_no: usize,
    name: &str,
) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| DataError::parse(row_no, name, "unexpected Arrow array layout"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto,residencia_iso3";

    #[test]
    fn csv_loads_records_in_order() {
        let csv = format!(
            "{HEADER},salario\n\
             2023,senior,integral,grande,Data Scientist,150000,remoto,USA,1\n\
             2022, junior ,integral,pequena,Analyst,60000.5,presencial,BRA,2\n"
        );
        let ds = load_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].role, "Data Scientist");
        assert_eq!(ds.records[1].seniority, "junior");
        assert_eq!(ds.records[1].salary_usd, 60000.5);
        assert_eq!(ds.records[1].residence_country_code, "BRA");
    }

    #[test]
    fn csv_missing_columns_is_schema_error() {
        let csv = "ano,senioridade,cargo,usd\n2023,senior,Analyst,1\n";
        match load_csv_reader(csv.as_bytes()) {
            Err(DataError::Schema { missing }) => assert_eq!(
                missing,
                vec!["contrato", "tamanho_empresa", "remoto", "residencia_iso3"]
            ),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn csv_bad_number_names_row_and_column() {
        let csv = format!(
            "{HEADER}\n\
             2023,senior,integral,grande,Analyst,1000,remoto,USA\n\
             2023,senior,integral,grande,Analyst,lots,remoto,USA\n"
        );
        match load_csv_reader(csv.as_bytes()) {
            Err(DataError::Parse { row, column, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "usd");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn csv_negative_salary_is_parse_error() {
        let csv = format!("{HEADER}\n2023,senior,integral,grande,Analyst,-1,remoto,USA\n");
        assert!(matches!(
            load_csv_reader(csv.as_bytes()),
            Err(DataError::Parse { row: 0, .. })
        ));
    }

    #[test]
    fn header_only_csv_is_empty_dataset() {
        let ds = load_csv_reader(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("salaries.CSV");
        let mut f = std::fs::File::create(&csv_path).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        writeln!(f, "2024,pleno,integral,media,Engineer,90000,hibrido,PRT").unwrap();
        drop(f);
        assert_eq!(load_file(&csv_path).unwrap().len(), 1);

        let json_path = dir.path().join("salaries.json");
        std::fs::write(
            &json_path,
            r#"[{"ano": 2024, "senioridade": "pleno", "contrato": "integral",
                "tamanho_empresa": "media", "cargo": "Engineer", "usd": 90000.0,
                "remoto": "hibrido", "residencia_iso3": "PRT"}]"#,
        )
        .unwrap();
        let ds = load_file(&json_path).unwrap();
        assert_eq!(ds.records[0].year, 2024);

        let xlsx = dir.path().join("salaries.xlsx");
        std::fs::write(&xlsx, b"").unwrap();
        assert!(matches!(
            load_file(&xlsx),
            Err(DataError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn json_missing_column_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"[{"ano": 2024, "cargo": "Engineer"}]"#).unwrap();
        assert!(matches!(load_file(&path), Err(DataError::Schema { .. })));
    }

    // -- Parquet --

    use std::sync::Arc;

    use arrow::array::{DictionaryArray, LargeStringArray};
    use arrow::datatypes::{Field, Int32Type, Schema};
    use parquet::arrow::ArrowWriter;

    fn write_parquet(path: &Path, columns: Vec<(Field, ArrayRef)>) {
        let (fields, arrays): (Vec<_>, Vec<_>) = columns.into_iter().unzip();
        let schema = Arc::new(Schema::new(fields));
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema.clone(), None).unwrap();
        if arrays.first().is_some_and(|a| !a.is_empty()) {
            writer
                .write(&RecordBatch::try_new(schema, arrays).unwrap())
                .unwrap();
        }
        writer.close().unwrap();
    }

    fn utf8(name: &str, values: Vec<&str>) -> (Field, ArrayRef) {
        (
            Field::new(name, DataType::Utf8, false),
            Arc::new(StringArray::from(values)),
        )
    }

    #[test]
    fn parquet_zero_rows_still_checks_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.parquet");
        write_parquet(
            &path,
            vec![(
                Field::new(COL_YEAR, DataType::Int64, false),
                Arc::new(Int64Array::from(Vec::<i64>::new())),
            )],
        );

        match load_file(&path) {
            Err(DataError::Schema { missing }) => {
                assert_eq!(missing.len(), 7);
                assert!(!missing.contains(&COL_YEAR.to_string()));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn parquet_reads_narrow_and_dictionary_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salaries.parquet");
        let seniority: DictionaryArray<Int32Type> =
            vec!["senior", "junior", "senior"].into_iter().collect();
        write_parquet(
            &path,
            vec![
                (
                    Field::new(COL_YEAR, DataType::Int32, false),
                    Arc::new(Int32Array::from(vec![2023, 2024, 2024])),
                ),
                (
                    Field::new(
                        COL_SENIORITY,
                        DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
                        false,
                    ),
                    Arc::new(seniority),
                ),
                utf8(COL_CONTRACT, vec!["integral", "parcial", "integral"]),
                utf8(COL_COMPANY_SIZE, vec!["grande", "media", "pequena"]),
                (
                    Field::new(COL_ROLE, DataType::LargeUtf8, false),
                    Arc::new(LargeStringArray::from(vec![
                        "Data Scientist",
                        "Analyst",
                        "Engineer",
                    ])),
                ),
                (
                    Field::new(COL_SALARY_USD, DataType::Float32, false),
                    Arc::new(Float32Array::from(vec![150_000.5, 60_000.0, 90_000.25])),
                ),
                utf8(COL_REMOTE, vec!["remoto", "hibrido", "presencial"]),
                utf8(COL_RESIDENCE, vec!["USA", "BRA", "PRT"]),
            ],
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].year, 2023);
        assert_eq!(ds.records[1].seniority, "junior");
        assert_eq!(ds.records[2].seniority, "senior");
        assert_eq!(ds.records[0].role, "Data Scientist");
        assert_eq!(ds.records[0].salary_usd, 150_000.5);
        assert_eq!(ds.records[2].residence_country_code, "PRT");
    }

    #[test]
    fn parquet_null_cell_names_row_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nulls.parquet");
        write_parquet(
            &path,
            vec![
                (
                    Field::new(COL_YEAR, DataType::Int64, false),
                    Arc::new(Int64Array::from(vec![2023, 2024])),
                ),
                utf8(COL_SENIORITY, vec!["senior", "junior"]),
                utf8(COL_CONTRACT, vec!["integral", "integral"]),
                utf8(COL_COMPANY_SIZE, vec!["grande", "media"]),
                utf8(COL_ROLE, vec!["Analyst", "Analyst"]),
                (
                    Field::new(COL_SALARY_USD, DataType::Float64, true),
                    Arc::new(Float64Array::from(vec![Some(50_000.0), None])),
                ),
                utf8(COL_REMOTE, vec!["remoto", "remoto"]),
                utf8(COL_RESIDENCE, vec!["USA", "USA"]),
            ],
        );

        match load_file(&path) {
            Err(DataError::Parse { row, column, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, COL_SALARY_USD);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}

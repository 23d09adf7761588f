use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, MedalTable};

/// Cell texts read as missing values, on top of the empty string.
const NA_MARKERS: &[&str] = &["NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "<NA>", "#N/A"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a medal table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`             – comma-delimited with a header row
/// * `.tsv` / `.tab`    – tab-delimited with a header row
/// * `.json`            – `[{ "year": 2000, "medal": "Gold", ... }, ...]`
/// * `.parquet` / `.pq` – one column per field
///
/// Headers are normalized and checked against the required columns before
/// the table is returned.
pub fn load_file(path: &Path) -> Result<MedalTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (headers, rows) = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" | "tab" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let table = MedalTable::from_raw(&headers, rows)
        .with_context(|| format!("checking columns of {}", path.display()))?;
    Ok(table)
}

type RawTable = (Vec<String>, Vec<Vec<CellValue>>);

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context("opening delimited file")?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        // Short rows are padded later; long rows have nowhere to go.
        if record.len() > headers.len() {
            bail!(
                "row {row_no}: {} fields but the header has {}",
                record.len(),
                headers.len()
            );
        }
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok((headers, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() || NA_MARKERS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns are the
/// union of keys over all records; keys absent from a record are missing.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok((headers, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => guess_cell_type(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::String(b.to_string()),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok((headers, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => guess_cell_type(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => guess_cell_type(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => float_cell(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => float_cell(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::String(col.as_boolean().value(row).to_string()),
        other => CellValue::String(format!("{other:?}")),
    }
}

/// Pandas writes missing floats as NaN rather than null.
fn float_cell(v: f64) -> CellValue {
    if v.is_nan() {
        CellValue::Null
    } else {
        CellValue::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, SchemaError};
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv_with_original_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "medals.csv",
            " Ano ,Medalha,Esporte,Modalidade,Pais,Pais_ISO3,Cidade,Event,Sexo,Atleta\n\
             2000,Gold,Swimming,100m,United States,USA,Sydney,100m freestyle,Men,A\n\
             2004,Silver,Fencing,Epee,Unified Team,,Athens,Epee individual,Women,B\n",
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, Column::Year), &CellValue::Integer(2000));
        assert_eq!(table.value(0, Column::Country), &CellValue::from("United States"));
        assert!(table.value(1, Column::CountryIso3).is_null());
    }

    #[test]
    fn test_load_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "medals.tsv",
            "year\tmedal\tsport\tmodality\tcountry\tcountry_iso3\tcity\tevent\tsex\tathlete\n\
             1996\tBronze\tRowing\tCoxless\tFrance\tFRA\tAtlanta\tPair\tMen\tC\n",
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, Column::CountryIso3), &CellValue::from("FRA"));
    }

    #[test]
    fn test_missing_column_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "medals.csv", "year,medal\n2000,Gold\n");

        let err = load_file(&path).unwrap_err();
        let schema_err = err.downcast_ref::<SchemaError>().unwrap();
        assert!(matches!(schema_err, SchemaError::MissingColumns(cols) if cols.contains(&"athlete")));
    }

    #[test]
    fn test_missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "medals.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file extension: .xlsx");
    }

    #[test]
    fn test_na_markers_are_missing() {
        assert!(guess_cell_type("").is_null());
        assert!(guess_cell_type("NaN").is_null());
        assert!(guess_cell_type("<NA>").is_null());
        assert_eq!(guess_cell_type("2008"), CellValue::Integer(2008));
        assert_eq!(guess_cell_type("2008.5"), CellValue::Float(2008.5));
        assert_eq!(guess_cell_type("Nadia"), CellValue::from("Nadia"));
    }

    #[test]
    fn test_row_longer_than_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "medals.csv",
            "year,medal,sport,modality,country,country_iso3,city,event,sex,athlete\n\
             2000,Gold,Swimming,100m,USA,USA,Sydney,100m,Men,A,extra\n",
        );

        let err = load_file(&path).unwrap_err();
        assert_eq!(err.to_string(), "row 0: 11 fields but the header has 10");
    }

    #[test]
    fn test_short_row_is_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "medals.csv",
            "year,medal,sport,modality,country,country_iso3,city,event,sex,athlete\n\
             2000,Gold,Swimming,100m,USA,USA,Sydney,100m,Men\n",
        );

        let table = load_file(&path).unwrap();
        assert!(table.value(0, Column::Athlete).is_null());
    }

    #[test]
    fn test_nan_float_is_missing() {
        assert!(float_cell(f64::NAN).is_null());
        assert_eq!(float_cell(2.5), CellValue::Float(2.5));
    }

    #[test]
    fn test_load_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "medals.json",
            r#"[
                {"year": 2008, "medal": "Gold", "sport": "Athletics", "modality": "Sprint",
                 "country": "Jamaica", "country_iso3": "JAM", "city": "Beijing",
                 "event": "100m", "sex": "Men", "athlete": "Bolt"},
                {"year": 2008, "medal": "Silver", "sport": "Athletics", "modality": "Sprint",
                 "country": "Trinidad and Tobago", "country_iso3": null, "city": "Beijing",
                 "event": "100m", "sex": "Men", "athlete": "Thompson"}
            ]"#,
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, Column::Athlete), &CellValue::from("Bolt"));
        assert!(table.value(1, Column::CountryIso3).is_null());
    }

    #[test]
    fn test_load_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medals.parquet");

        let mut fields = vec![Field::new("year", DataType::Int64, false)];
        for col in &Column::ALL[1..] {
            fields.push(Field::new(col.name(), DataType::Utf8, true));
        }
        let schema = Arc::new(Schema::new(fields));

        let mut columns: Vec<Arc<dyn Array>> = vec![Arc::new(Int64Array::from(vec![1992, 1996]))];
        for col in &Column::ALL[1..] {
            let values: Vec<Option<&str>> = if *col == Column::CountryIso3 {
                vec![Some("ESP"), None]
            } else {
                vec![Some("x"), Some("y")]
            };
            columns.push(Arc::new(StringArray::from(values)));
        }
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(1, Column::Year), &CellValue::Integer(1996));
        assert_eq!(table.value(0, Column::CountryIso3), &CellValue::from("ESP"));
        assert!(table.value(1, Column::CountryIso3).is_null());
    }
}

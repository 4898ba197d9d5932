use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{Dataset, Track, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a track dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; the Spotify export as written by `df.to_csv()`
/// * `.json`    – `[{ "track_name": "...", "popularity": 71, ... }, ...]`
/// * `.parquet` – one column per field, as written by Pandas or Polars
///
/// Every format must carry the columns in [`REQUIRED_COLUMNS`]; any extra
/// columns are ignored.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} tracks spanning {} distinct years from {}",
        dataset.len(),
        dataset.years().len(),
        path.display()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Format-independent row parsing
// ---------------------------------------------------------------------------

/// One raw cell, borrowed from whatever the format reader produced.
#[derive(Debug, Clone, Copy)]
enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Null,
    /// A value of a type no track field can hold (bool, list, ...).
    Unsupported(&'a str),
}

/// Positions of the required columns, in [`REQUIRED_COLUMNS`] order.
struct ColumnIndex {
    positions: [usize; REQUIRED_COLUMNS.len()],
}

impl ColumnIndex {
    /// Locate every required column among `names`, reporting all that are missing.
    fn locate<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, LoadError> {
        let names: Vec<&str> = names.into_iter().map(str::trim).collect();
        let mut positions = [0; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();

        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match names.iter().position(|n| *n == column) {
                Some(i) => *slot = i,
                None => missing.push(column.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(ColumnIndex { positions })
        } else {
            Err(LoadError::MissingColumns(missing))
        }
    }
}

/// Build a track from cells given in [`REQUIRED_COLUMNS`] order.
fn track_from_cells(row: usize, cells: [Cell<'_>; REQUIRED_COLUMNS.len()]) -> Result<Track, LoadError> {
    let [track_name, album_name, artist_name, popularity, danceability, energy, valence, year] =
        cells;
    Ok(Track {
        track_name: text(track_name, row, REQUIRED_COLUMNS[0])?,
        album_name: text(album_name, row, REQUIRED_COLUMNS[1])?,
        artist_name: text(artist_name, row, REQUIRED_COLUMNS[2])?,
        popularity: number(popularity, row, REQUIRED_COLUMNS[3])?,
        danceability: number(danceability, row, REQUIRED_COLUMNS[4])?,
        energy: number(energy, row, REQUIRED_COLUMNS[5])?,
        valence: number(valence, row, REQUIRED_COLUMNS[6])?,
        year: year_value(year, row, REQUIRED_COLUMNS[7])?,
    })
}

fn invalid(row: usize, column: &'static str, value: impl ToString) -> LoadError {
    LoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}

fn text(cell: Cell<'_>, row: usize, column: &'static str) -> Result<String, LoadError> {
    match cell {
        Cell::Text(s) if !s.is_empty() => Ok(s.to_string()),
        // Names like "1999" come back as numbers from JSON and Parquet.
        Cell::Number(n) => Ok(n.to_string()),
        Cell::Text(_) | Cell::Null => Err(LoadError::MissingValue { row, column }),
        Cell::Unsupported(v) => Err(invalid(row, column, v)),
    }
}

fn number(cell: Cell<'_>, row: usize, column: &'static str) -> Result<f64, LoadError> {
    let value = match cell {
        Cell::Number(n) => n,
        Cell::Text(s) if s.trim().is_empty() => {
            return Err(LoadError::MissingValue { row, column })
        }
        Cell::Text(s) => s.trim().parse::<f64>().map_err(|_| invalid(row, column, s))?,
        Cell::Null => return Err(LoadError::MissingValue { row, column }),
        Cell::Unsupported(v) => return Err(invalid(row, column, v)),
    };
    // "nan" and "inf" parse fine but would poison every mean downstream.
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(row, column, value))
    }
}

/// Years may be absent, and pandas writes them as `2020.0` once a column holds
/// any null.
fn year_value(cell: Cell<'_>, row: usize, column: &'static str) -> Result<Option<i32>, LoadError> {
    match cell {
        Cell::Null => return Ok(None),
        Cell::Text(s) if s.trim().is_empty() => return Ok(None),
        _ => {}
    }
    let value = number(cell, row, column)?;
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(invalid(row, column, value));
    }
    Ok(Some(value as i32))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one track per record.
fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let index = ColumnIndex::locate(reader.headers()?.iter())?;

    let mut tracks = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cells = index
            .positions
            .map(|i| Cell::Text(record.get(i).unwrap_or("")));
        tracks.push(track_from_cells(row_no, cells)?);
    }

    Ok(Dataset::from_tracks(tracks))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "track_name": "Blinding Lights",
///     "album_name": "After Hours",
///     "artist_name": "The Weeknd",
///     "popularity": 91,
///     "danceability": 0.514,
///     "energy": 0.73,
///     "valence": 0.334,
///     "year": 2020
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected a top-level JSON array".into()))?;

    // Records carry the columns; with none there is nothing to check them on.
    if records.is_empty() {
        return Err(LoadError::MissingColumns(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        ));
    }

    let mut tracks = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !obj.contains_key(**c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns(missing));
        }

        let rendered: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| obj[*c].to_string()).collect();
        let cells: [Cell<'_>; REQUIRED_COLUMNS.len()] =
            std::array::from_fn(|k| json_cell(&obj[REQUIRED_COLUMNS[k]], &rendered[k]));
        tracks.push(track_from_cells(i, cells)?);
    }

    Ok(Dataset::from_tracks(tracks))
}

fn json_cell<'a>(val: &'a JsonValue, rendered: &'a str) -> Cell<'a> {
    match val {
        JsonValue::String(s) => Cell::Text(s),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Unsupported(rendered)),
        JsonValue::Null => Cell::Null,
        _ => Cell::Unsupported(rendered),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per track field.
///
/// Text columns may be Utf8 or LargeUtf8; numeric columns any of
/// Int16/Int32/Int64/Float32/Float64. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let index = ColumnIndex::locate(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build()?;

    let mut tracks = Vec::new();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result?;
        let columns = index
            .positions
            .iter()
            .map(|&i| plain_column(batch.column(i)))
            .collect::<Result<Vec<ArrayRef>, LoadError>>()?;
        let type_names: Vec<String> = columns.iter().map(|c| format!("{:?}", c.data_type())).collect();

        for row in 0..batch.num_rows() {
            let cells: [Cell<'_>; REQUIRED_COLUMNS.len()] =
                std::array::from_fn(|k| arrow_cell(&columns[k], row, &type_names[k]));
            tracks.push(track_from_cells(row_offset + row, cells)?);
        }
        row_offset += batch.num_rows();
    }

    Ok(Dataset::from_tracks(tracks))
}

/// Decode dictionary and view encodings so [`arrow_cell`] only sees plain
/// arrays. Pandas writes `category` columns as `Dictionary(Int32, Utf8)`.
fn plain_column(col: &ArrayRef) -> Result<ArrayRef, LoadError> {
    let target = match col.data_type() {
        DataType::Dictionary(_, value) => match value.as_ref() {
            DataType::Utf8View => DataType::Utf8,
            other => other.clone(),
        },
        DataType::Utf8View => DataType::Utf8,
        _ => return Ok(Arc::clone(col)),
    };
    Ok(cast(col, &target)?)
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell<'a>(col: &'a ArrayRef, row: usize, type_name: &'a str) -> Cell<'a> {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row)),
        DataType::Int16 => Cell::Number(col.as_primitive::<Int16Type>().value(row) as f64),
        DataType::Int32 => Cell::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Cell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Cell::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Number(col.as_primitive::<Float64Type>().value(row)),
        _ => Cell::Unsupported(type_name),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use arrow::array::{DictionaryArray, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    const HEADER: &str = "track_id,track_name,album_name,artist_name,popularity,danceability,energy,valence,year";

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_and_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{HEADER}\n\
             id1,A,X,P,90,0.8,0.5,0.2,2020\n\
             id2,B,X,P,80,0.3,0.9,0.1,2020.0\n\
             id3,\"Hello, World\",Y,Q,75,0.4,0.4,0.4,\n"
        );
        let path = write_file(&dir, "tracks.csv", &csv);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.tracks[0].track_name, "A");
        assert_eq!(ds.tracks[0].popularity, 90.0);
        assert_eq!(ds.tracks[1].year, Some(2020));
        assert_eq!(ds.tracks[2].track_name, "Hello, World");
        assert_eq!(ds.tracks[2].year, None);
        assert_eq!(ds.years().iter().copied().collect::<Vec<_>>(), vec![2020]);
    }

    #[test]
    fn csv_missing_columns_are_all_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tracks.csv", "track_name,album_name,popularity\nA,X,1\n");

        match load_file(&path) {
            Err(LoadError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["artist_name", "danceability", "energy", "valence", "year"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn csv_non_numeric_popularity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{HEADER}\nid1,A,X,P,very,0.8,0.5,0.2,2020\n");
        let path = write_file(&dir, "tracks.csv", &csv);

        match load_file(&path) {
            Err(LoadError::InvalidValue { row, column, value }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "popularity");
                assert_eq!(value, "very");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn csv_nan_feature_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{HEADER}\nid1,A,X,P,50,NaN,0.5,0.2,2020\n");
        let path = write_file(&dir, "tracks.csv", &csv);

        assert!(matches!(
            load_file(&path),
            Err(LoadError::InvalidValue { column: "danceability", .. })
        ));
    }

    #[test]
    fn csv_empty_required_value_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{HEADER}\nid1,A,X,P,50,0.5,,0.2,2020\n");
        let path = write_file(&dir, "tracks.csv", &csv);

        assert!(matches!(
            load_file(&path),
            Err(LoadError::MissingValue { row: 0, column: "energy" })
        ));
    }

    #[test]
    fn fractional_year_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{HEADER}\nid1,A,X,P,50,0.5,0.5,0.2,2020.5\n");
        let path = write_file(&dir, "tracks.csv", &csv);

        assert!(matches!(
            load_file(&path),
            Err(LoadError::InvalidValue { column: "year", .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        assert!(matches!(load_file(&path), Err(LoadError::Io { .. })));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tracks.xlsx", "");
        match load_file(&path) {
            Err(LoadError::UnsupportedFormat(ext)) => assert_eq!(ext, "xlsx"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"[
            {"track_name": "A", "album_name": "X", "artist_name": "P", "popularity": 90,
             "danceability": 0.8, "energy": 0.5, "valence": 0.2, "year": 2020, "genre": "pop"},
            {"track_name": 1999, "album_name": "1999", "artist_name": "Prince", "popularity": 70,
             "danceability": 0.9, "energy": 0.7, "valence": 0.8, "year": null}
        ]"#;
        let path = write_file(&dir, "tracks.json", json);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.tracks[0].year, Some(2020));
        assert_eq!(ds.tracks[1].track_name, "1999");
        assert_eq!(ds.tracks[1].year, None);
    }

    #[test]
    fn json_bool_popularity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"[{"track_name": "A", "album_name": "X", "artist_name": "P", "popularity": true,
             "danceability": 0.8, "energy": 0.5, "valence": 0.2, "year": 2020}]"#;
        let path = write_file(&dir, "tracks.json", json);

        match load_file(&path) {
            Err(LoadError::InvalidValue { column, value, .. }) => {
                assert_eq!(column, "popularity");
                assert_eq!(value, "true");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn empty_json_array_lacks_every_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tracks.json", "[]");

        match load_file(&path) {
            Err(LoadError::MissingColumns(cols)) => assert_eq!(cols.len(), REQUIRED_COLUMNS.len()),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn json_must_be_an_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tracks.json", r#"{"track_name": "A"}"#);
        assert!(matches!(load_file(&path), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn loads_parquet_with_mixed_numeric_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracks.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("track_name", DataType::Utf8, false),
            Field::new("album_name", DataType::Utf8, false),
            Field::new("artist_name", DataType::Utf8, false),
            Field::new("popularity", DataType::Int64, false),
            Field::new("danceability", DataType::Float64, false),
            Field::new("energy", DataType::Float64, false),
            Field::new("valence", DataType::Float64, false),
            Field::new("year", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(StringArray::from(vec!["X", "Y"])),
                Arc::new(StringArray::from(vec!["P", "Q"])),
                Arc::new(Int64Array::from(vec![90, 60])),
                Arc::new(Float64Array::from(vec![0.8, 0.3])),
                Arc::new(Float64Array::from(vec![0.5, 0.9])),
                Arc::new(Float64Array::from(vec![0.2, 0.1])),
                Arc::new(Float64Array::from(vec![Some(2020.0), None])),
            ],
        )
        .unwrap();

        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.tracks[0].popularity, 90.0);
        assert_eq!(ds.tracks[0].year, Some(2020));
        assert_eq!(ds.tracks[1].artist_name, "Q");
        assert_eq!(ds.tracks[1].year, None);
    }

    #[test]
    fn loads_parquet_with_categorical_text_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracks.parquet");

        let categorical =
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
        let schema = Arc::new(Schema::new(vec![
            Field::new("track_name", DataType::Utf8, false),
            Field::new("album_name", categorical.clone(), false),
            Field::new("artist_name", categorical, false),
            Field::new("popularity", DataType::Int64, false),
            Field::new("danceability", DataType::Float64, false),
            Field::new("energy", DataType::Float64, false),
            Field::new("valence", DataType::Float64, false),
            Field::new("year", DataType::Int64, true),
        ]));
        let albums: DictionaryArray<Int32Type> = vec!["X", "X", "Y"].into_iter().collect();
        let artists: DictionaryArray<Int32Type> = vec!["P", "Q", "P"].into_iter().collect();
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B", "C"])),
                Arc::new(albums),
                Arc::new(artists),
                Arc::new(Int64Array::from(vec![90, 60, 70])),
                Arc::new(Float64Array::from(vec![0.8, 0.3, 0.5])),
                Arc::new(Float64Array::from(vec![0.5, 0.9, 0.5])),
                Arc::new(Float64Array::from(vec![0.2, 0.1, 0.5])),
                Arc::new(Int64Array::from(vec![Some(2020), Some(2021), None])),
            ],
        )
        .unwrap();

        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        let albums: Vec<&str> = ds.tracks.iter().map(|t| t.album_name.as_str()).collect();
        let artists: Vec<&str> = ds.tracks.iter().map(|t| t.artist_name.as_str()).collect();
        assert_eq!(albums, vec!["X", "X", "Y"]);
        assert_eq!(artists, vec!["P", "Q", "P"]);
        assert_eq!(ds.tracks[2].year, None);
    }

    #[test]
    fn parquet_missing_columns_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracks.parquet");

        let schema = Arc::new(Schema::new(vec![Field::new("track_name", DataType::Utf8, false)]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(StringArray::from(vec!["A"]))],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        match load_file(&path) {
            Err(LoadError::MissingColumns(cols)) => assert_eq!(cols.len(), 7),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}

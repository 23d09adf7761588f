use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the medal table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a delimited file yields.
/// Used as a `BTreeSet` / `BTreeMap` key downstream, so it must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                String(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Column – the logical columns every medal table must carry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Year,
    Medal,
    Sport,
    Modality,
    Country,
    CountryIso3,
    City,
    Event,
    Sex,
    Athlete,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Year,
        Column::Medal,
        Column::Sport,
        Column::Modality,
        Column::Country,
        Column::CountryIso3,
        Column::City,
        Column::Event,
        Column::Sex,
        Column::Athlete,
    ];

    /// Canonical (normalized) header name.
    pub fn name(self) -> &'static str {
        match self {
            Column::Year => "year",
            Column::Medal => "medal",
            Column::Sport => "sport",
            Column::Modality => "modality",
            Column::Country => "country",
            Column::CountryIso3 => "country_iso3",
            Column::City => "city",
            Column::Event => "event",
            Column::Sex => "sex",
            Column::Athlete => "athlete",
        }
    }

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Column::Year => "Year",
            Column::Medal => "Medal",
            Column::Sport => "Sport",
            Column::Modality => "Modality",
            Column::Country => "Country",
            Column::CountryIso3 => "Country (ISO3)",
            Column::City => "City",
            Column::Event => "Event",
            Column::Sex => "Sex",
            Column::Athlete => "Athlete",
        }
    }

    /// Normalized header names accepted for this column, in priority order.
    /// The Portuguese names are the headers of the published medal dataset.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::Year => &["year", "ano"],
            Column::Medal => &["medal", "medalha"],
            Column::Sport => &["sport", "esporte"],
            Column::Modality => &["modality", "discipline", "modalidade"],
            Column::Country => &["country", "pais", "país"],
            Column::CountryIso3 => &["country_iso3", "iso3", "pais_iso3"],
            Column::City => &["city", "cidade"],
            Column::Event => &["event", "evento"],
            Column::Sex => &["sex", "gender", "sexo"],
            Column::Athlete => &["athlete", "atleta"],
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Strip a leading byte-order mark, trim and lowercase a header.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Schema – logical column → position in the loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("input has no header row")]
    NoHeader,
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
}

/// Resolved once at load time; every later access goes through it.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    positions: [usize; Column::ALL.len()],
}

impl Schema {
    /// Resolve every [`Column`] against already-normalized headers.
    pub fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        if headers.is_empty() {
            return Err(SchemaError::NoHeader);
        }

        let mut positions = [0usize; Column::ALL.len()];
        let mut missing = Vec::new();
        for col in Column::ALL {
            let found = col
                .aliases()
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == alias));
            match found {
                Some(pos) => positions[col.index()] = pos,
                None => missing.push(col.name()),
            }
        }

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns(missing));
        }
        Ok(Schema { positions })
    }

    pub fn position(&self, col: Column) -> usize {
        self.positions[col.index()]
    }
}

// ---------------------------------------------------------------------------
// MedalTable – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded source table. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct MedalTable {
    /// Normalized header names in file order (includes extra columns).
    pub column_names: Vec<String>,
    /// Row-major cells; every row has exactly `column_names.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
    schema: Schema,
}

impl MedalTable {
    /// Normalize raw headers, check the schema contract and square up rows.
    pub fn from_raw(raw_headers: &[String], mut rows: Vec<Vec<CellValue>>) -> Result<Self, SchemaError> {
        let column_names: Vec<String> = raw_headers.iter().map(|h| normalize_header(h)).collect();
        let schema = Schema::resolve(&column_names)?;

        let width = column_names.len();
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }

        Ok(MedalTable {
            column_names,
            rows,
            schema,
        })
    }

    #[cfg(test)]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Value of a logical column in a given row.
    pub fn value(&self, row: usize, col: Column) -> &CellValue {
        &self.rows[row][self.schema.position(col)]
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a table with the canonical headers from
    /// `(year, medal, sport, modality, country, iso3, city, event, sex, athlete)` rows.
    pub(crate) fn table(rows: &[(i64, &str, &str, &str, &str, &str, &str, &str, &str, &str)]) -> MedalTable {
        let headers: Vec<String> = Column::ALL.iter().map(|c| c.name().to_string()).collect();
        let cell = |s: &str| {
            if s.is_empty() {
                CellValue::Null
            } else {
                CellValue::from(s)
            }
        };
        let rows = rows
            .iter()
            .map(|r| {
                vec![
                    CellValue::Integer(r.0),
                    cell(r.1),
                    cell(r.2),
                    cell(r.3),
                    cell(r.4),
                    cell(r.5),
                    cell(r.6),
                    cell(r.7),
                    cell(r.8),
                    cell(r.9),
                ]
            })
            .collect();
        MedalTable::from_raw(&headers, rows).unwrap()
    }

    #[test]
    fn test_headers_are_trimmed_and_lowercased() {
        let raw: Vec<String> = [" Ano", "MEDALHA ", "Esporte", "Modalidade", "Pais", "Pais_ISO3", "Cidade", "Event", "Sexo", "Atleta", " Notes "]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let table = MedalTable::from_raw(&raw, vec![]).unwrap();

        assert_eq!(table.column_names[0], "ano");
        assert_eq!(table.column_names[10], "notes");
        assert_eq!(table.schema().position(Column::Year), 0);
        assert_eq!(table.schema().position(Column::CountryIso3), 5);
        assert_eq!(table.schema().position(Column::Athlete), 9);
    }

    #[test]
    fn test_byte_order_mark_is_stripped_from_first_header() {
        assert_eq!(normalize_header("\u{feff}Ano"), "ano");
        assert_eq!(normalize_header("\u{feff} Year "), "year");
    }

    #[test]
    fn test_missing_columns_are_all_reported() {
        let raw: Vec<String> = ["year", "medal", "sport", "modality", "country", "city", "event", "sex"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = MedalTable::from_raw(&raw, vec![]).unwrap_err();
        assert_eq!(err, SchemaError::MissingColumns(vec!["country_iso3", "athlete"]));
        assert_eq!(err.to_string(), "missing required column(s): country_iso3, athlete");
    }

    #[test]
    fn test_empty_header_is_rejected() {
        assert_eq!(MedalTable::from_raw(&[], vec![]).unwrap_err(), SchemaError::NoHeader);
    }

    #[test]
    fn test_short_rows_are_padded_with_null() {
        let headers: Vec<String> = Column::ALL.iter().map(|c| c.name().to_string()).collect();
        let table = MedalTable::from_raw(&headers, vec![vec![CellValue::Integer(2000)]]).unwrap();
        assert_eq!(table.rows[0].len(), 10);
        assert!(table.value(0, Column::Athlete).is_null());
        assert_eq!(table.value(0, Column::Year), &CellValue::Integer(2000));
    }

    #[test]
    fn test_cell_ordering_groups_by_type() {
        let mut values = vec![
            CellValue::from("b"),
            CellValue::Integer(2004),
            CellValue::Null,
            CellValue::from("a"),
            CellValue::Integer(2000),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Integer(2000),
                CellValue::Integer(2004),
                CellValue::from("a"),
                CellValue::from("b"),
            ]
        );
    }
}

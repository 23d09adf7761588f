use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Index into a slice of length `n`, skewed towards the front so a few
    /// countries and athletes dominate the rankings.
    fn skewed_index(&mut self, n: usize) -> usize {
        let u = self.next_f64();
        ((u * u) * n as f64) as usize % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (country, ISO3 code or None when the delegation has no code)
const COUNTRIES: &[(&str, Option<&str>)] = &[
    ("United States", Some("USA")),
    ("Soviet Union", Some("URS")),
    ("Germany", Some("DEU")),
    ("China", Some("CHN")),
    ("Australia", Some("AUS")),
    ("France", Some("FRA")),
    ("Italy", Some("ITA")),
    ("Hungary", Some("HUN")),
    ("Japan", Some("JPN")),
    ("Great Britain", Some("GBR")),
    ("Romania", Some("ROU")),
    ("Cuba", Some("CUB")),
    ("Brazil", Some("BRA")),
    ("Kenya", Some("KEN")),
    ("Unified Team", None),
    ("Independent Olympic Participants", None),
];

/// (sport, modality, events)
const SPORTS: &[(&str, &str, &[&str])] = &[
    ("Aquatics", "Swimming", &["100m freestyle", "200m butterfly", "4x100m medley relay"]),
    ("Aquatics", "Diving", &["3m springboard", "10m platform"]),
    ("Athletics", "Athletics", &["100m", "marathon", "long jump", "javelin throw"]),
    ("Gymnastics", "Artistic G.", &["individual all-round", "floor exercises"]),
    ("Fencing", "Fencing", &["epee individual", "foil team"]),
    ("Rowing", "Rowing", &["single sculls", "eight with coxswain"]),
    ("Judo", "Judo", &["60 - 66kg", "+ 100kg"]),
];

const GAMES: &[(i64, &str)] = &[
    (1976, "Montreal"),
    (1980, "Moscow"),
    (1984, "Los Angeles"),
    (1988, "Seoul"),
    (1992, "Barcelona"),
    (1996, "Atlanta"),
    (2000, "Sydney"),
    (2004, "Athens"),
    (2008, "Beijing"),
];

const MEDALS: [&str; 3] = ["Gold", "Silver", "Bronze"];
const ATHLETES_PER_COUNTRY: usize = 6;

struct Row {
    year: i64,
    medal: &'static str,
    sport: &'static str,
    modality: &'static str,
    country: &'static str,
    country_iso3: Option<&'static str>,
    city: &'static str,
    event: &'static str,
    sex: &'static str,
    athlete: String,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(year, city) in GAMES {
        for &(sport, modality, events) in SPORTS {
            for &event in events {
                for sex in ["Men", "Women"] {
                    for medal in MEDALS {
                        let (country, iso3) = COUNTRIES[rng.skewed_index(COUNTRIES.len())];
                        let athlete_no = rng.skewed_index(ATHLETES_PER_COUNTRY);
                        let initial = *rng.pick(&['A', 'B', 'C', 'D', 'E']);
                        rows.push(Row {
                            year,
                            medal,
                            sport,
                            modality,
                            country,
                            country_iso3: iso3,
                            city,
                            event,
                            sex,
                            athlete: format!("{initial}. {} {sex} #{athlete_no}", iso3.unwrap_or("IOP")),
                        });
                    }
                }
            }
        }
    }
    rows
}

const HEADERS: [&str; 10] = [
    "year",
    "medal",
    "sport",
    "modality",
    "country",
    "country_iso3",
    "city",
    "event",
    "sex",
    "athlete",
];

fn write_csv(rows: &[Row], path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for r in rows {
        let year = r.year.to_string();
        writer.write_record([
            year.as_str(),
            r.medal,
            r.sport,
            r.modality,
            r.country,
            r.country_iso3.unwrap_or(""),
            r.city,
            r.event,
            r.sex,
            r.athlete.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> anyhow::Result<()> {
    let text = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let fields: Vec<Field> = HEADERS
        .iter()
        .map(|&name| match name {
            "year" => Field::new(name, DataType::Int64, false),
            "country_iso3" => Field::new(name, DataType::Utf8, true),
            _ => Field::new(name, DataType::Utf8, false),
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
        text(|r| r.medal),
        text(|r| r.sport),
        text(|r| r.modality),
        text(|r| r.country),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.country_iso3).collect::<Vec<_>>(),
        )),
        text(|r| r.city),
        text(|r| r.event),
        text(|r| r.sex),
        text(|r| r.athlete.as_str()),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns)?;
    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/medals_sample.csv".to_string());
    let output_path = Path::new(&output);

    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    match output_path.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("pq") => write_parquet(&rows, output_path)?,
        _ => write_csv(&rows, output_path)?,
    }

    println!("Wrote {} medal records to {output}", rows.len());
    Ok(())
}

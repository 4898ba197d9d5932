use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

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

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One output row, in the column layout the dashboard reads.
#[derive(Serialize)]
struct Row {
    track_id: String,
    track_name: String,
    album_name: String,
    artist_name: String,
    popularity: i64,
    danceability: f64,
    energy: f64,
    valence: f64,
    /// Empty cell in the CSV, null in Parquet.
    year: Option<i64>,
}

/// Round to three decimals like the Spotify audio-feature export.
fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    // (artist, base popularity, danceability bias, energy bias)
    let artists = [
        ("Neon Harbor", 72.0, 0.25, 0.10),
        ("The Paper Kites", 58.0, -0.10, -0.20),
        ("Luna Vega", 81.0, 0.15, 0.05),
        ("Grey Static", 45.0, -0.05, 0.30),
        ("Marisol", 66.0, 0.20, -0.05),
    ];
    let words = ["Midnight", "Golden", "Echo", "River", "Paper", "Static", "Velvet", "Summer"];
    let nouns = ["Lights", "Hearts", "Road", "Dreams", "Skyline", "Signals", "Waves"];

    let mut rows = Vec::new();
    for (artist, base, dance_bias, energy_bias) in artists {
        for album_no in 0..3 {
            let album = format!("{} {}", rng.pick(&words), rng.pick(&nouns));
            let year = 2015 + (rng.next_u64() % 9) as i64;
            for _ in 0..6 {
                let popularity = (base + rng.range(-20.0, 20.0)).clamp(0.0, 100.0).round() as i64;
                rows.push(Row {
                    track_id: format!("trk{:05}", rows.len()),
                    track_name: format!("{} {}", rng.pick(&words), rng.pick(&nouns)),
                    album_name: album.clone(),
                    artist_name: artist.to_string(),
                    popularity,
                    danceability: round3((0.5 + dance_bias + rng.range(-0.2, 0.2)).clamp(0.0, 1.0)),
                    energy: round3((0.5 + energy_bias + rng.range(-0.25, 0.25)).clamp(0.0, 1.0)),
                    valence: round3(rng.range(0.05, 0.95)),
                    // Every artist's third album lacks a release year.
                    year: (album_no < 2).then_some(year),
                });
            }
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let text = |f: fn(&Row) -> &str| Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()));
    let float = |f: fn(&Row) -> f64| Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()));

    let schema = Arc::new(Schema::new(vec![
        Field::new("track_id", DataType::Utf8, false),
        Field::new("track_name", DataType::Utf8, false),
        Field::new("album_name", DataType::Utf8, false),
        Field::new("artist_name", DataType::Utf8, false),
        Field::new("popularity", DataType::Int64, false),
        Field::new("danceability", DataType::Float64, false),
        Field::new("energy", DataType::Float64, false),
        Field::new("valence", DataType::Float64, false),
        Field::new("year", DataType::Int64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.track_id.as_str()),
            text(|r| r.track_name.as_str()),
            text(|r| r.album_name.as_str()),
            text(|r| r.artist_name.as_str()),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.popularity).collect::<Vec<_>>())),
            float(|r| r.danceability),
            float(|r| r.energy),
            float(|r| r.valence),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "spotify_tracks_filtered.csv")?;
    write_parquet(&rows, "spotify_tracks_filtered.parquet")?;

    println!(
        "Wrote {} tracks to spotify_tracks_filtered.csv and spotify_tracks_filtered.parquet",
        rows.len()
    );
    Ok(())
}

//! Writes a deterministic synthetic dataset in the layout `tunematch` reads:
//! `;`-delimited, with the stray trailing spaces real exports carry in a
//! couple of header names.
//!
//! Usage: `generate_sample [OUTPUT] [TRACKS_PER_GENRE_YEAR]`

use anyhow::{Context, Result};

const HEADER: [&str; 14] = [
    "title",
    "artist",
    "top genre",
    "year",
    "bpm",
    "energy",
    "danceability ",
    "dB",
    "liveness",
    "valence",
    "duration",
    "acousticness",
    "speechiness ",
    "popularity",
];

/// Per-genre centre of each feature, in header order from `bpm` onward.
struct GenreProfile {
    name: &'static str,
    centre: [f64; 10],
}

const PROFILES: [GenreProfile; 4] = [
    GenreProfile {
        name: "dance pop",
        centre: [120.0, 75.0, 68.0, -5.0, 15.0, 55.0, 215.0, 12.0, 7.0, 70.0],
    },
    GenreProfile {
        name: "pop",
        centre: [110.0, 65.0, 62.0, -6.0, 14.0, 48.0, 225.0, 20.0, 6.0, 66.0],
    },
    GenreProfile {
        name: "electropop",
        centre: [126.0, 82.0, 66.0, -4.5, 20.0, 50.0, 205.0, 8.0, 8.0, 60.0],
    },
    GenreProfile {
        name: "canadian pop",
        centre: [100.0, 55.0, 58.0, -7.0, 12.0, 40.0, 235.0, 30.0, 5.0, 72.0],
    },
];

/// Spread of each feature around the genre centre.
const SPREAD: [f64; 10] = [12.0, 10.0, 8.0, 1.5, 8.0, 15.0, 25.0, 12.0, 3.0, 10.0];

/// Clamp bounds of each feature.
const BOUNDS: [(f64, f64); 10] = [
    (60.0, 200.0),
    (0.0, 100.0),
    (0.0, 100.0),
    (-20.0, 0.0),
    (0.0, 100.0),
    (0.0, 100.0),
    (120.0, 420.0),
    (0.0, 100.0),
    (0.0, 60.0),
    (0.0, 100.0),
];

const ARTISTS: [&str; 6] = [
    "Nova Lane",
    "The Glass Hours",
    "Mira Kole",
    "Static Bloom",
    "Juno Vale",
    "Paper Satellites",
];

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn features(profile: &GenreProfile, rng: &mut SimpleRng) -> Vec<String> {
    (0..10)
        .map(|i| {
            let (lo, hi) = BOUNDS[i];
            let v = rng.gauss(profile.centre[i], SPREAD[i]).clamp(lo, hi).round();
            format!("{v}")
        })
        .collect()
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "Spotify.csv".to_string());
    let per_cell: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid track count '{n}'"))?,
        None => 3,
    };

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    let mut rows = 0usize;
    for year in 2010..2020 {
        for profile in &PROFILES {
            for _ in 0..per_cell {
                rows += 1;
                let title = format!("Track {rows:04}");
                let mut record = vec![
                    title,
                    rng.pick(&ARTISTS).to_string(),
                    profile.name.to_string(),
                    year.to_string(),
                ];
                record.extend(features(profile, &mut rng));
                writer.write_record(&record)?;
            }
        }
    }

    // Two tracks sharing a title, to exercise duplicate-title handling.
    for (artist, year) in [("Nova Lane", 2014), ("Juno Vale", 2017)] {
        rows += 1;
        let mut record = vec![
            "Echo".to_string(),
            artist.to_string(),
            PROFILES[0].name.to_string(),
            year.to_string(),
        ];
        record.extend(features(&PROFILES[0], &mut rng));
        writer.write_record(&record)?;
    }

    writer.flush().context("flushing output")?;
    println!("Wrote {rows} tracks to {output_path}");
    Ok(())
}

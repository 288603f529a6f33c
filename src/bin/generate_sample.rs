//! Writes a synthetic provider worksheet as CSV for trying the viewer offline.
//!
//! Usage: `generate_sample [OUTPUT] [COUNT]`

use anyhow::{Context, Result};

const FIRST_NAMES: [&str; 12] = [
    "John", "Jane", "Priya", "Marcus", "Elena", "Wei", "Samuel", "Aisha", "Tomas", "Grace",
    "Omar", "Hannah",
];
const LAST_NAMES: [&str; 12] = [
    "Smith", "Doe", "Patel", "Johnson", "Rossi", "Chen", "Okafor", "Khan", "Novak", "Kim",
    "Haddad", "Larsen",
];
const SUFFIXES: [&str; 3] = ["MD", "DO", "PA-C"];

/// Employment types as they appear in the worksheet, annotations included.
const EMPLOYMENT: [&str; 7] = [
    "Partner",
    "Partner [2020-Present]",
    "Employee",
    "Employee [PT]",
    "Locum Tenens",
    "Associate [Track 2026]",
    "Extender",
];

/// Subspecialty tags, including the spellings the viewer normalizes.
const SUBSPECIALTIES: [&str; 9] = [
    "Body Imaging",
    "Neuro",
    "MSK",
    "PET/CT",
    "Breast",
    "IR",
    "Diagnostic\u{a0}",
    "Pediatrics",
    "Cardiothoracic",
];

const LOCATIONS: [&str; 4] = ["Richmond", "Newport News", "Williamsburg", "Norfolk"];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

/// One to three tags joined by a mix of `, ` and `/` delimiters.
fn subspecialty_cell(rng: &mut SimpleRng) -> String {
    let count = 1 + rng.below(3);
    let mut cell = String::new();
    for i in 0..count {
        if i > 0 {
            cell.push_str(if rng.below(2) == 0 { ", " } else { "/" });
        }
        cell.push_str(rng.pick(&SUBSPECIALTIES));
    }
    cell
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "sample_providers.csv".to_string());
    let count: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("'{n}' is not a row count"))?,
        None => 60,
    };

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record([
        "MILV Radiologist/Extender",
        "Employment Type",
        "Subspecialty",
        "Primary Location",
        "Start Year",
    ])?;

    for _ in 0..count {
        let name = format!(
            "{} {}, {}",
            rng.pick(&FIRST_NAMES),
            rng.pick(&LAST_NAMES),
            rng.pick(&SUFFIXES)
        );
        let start_year = (2005 + rng.below(20)).to_string();
        writer.write_record([
            name.as_str(),
            rng.pick(&EMPLOYMENT),
            subspecialty_cell(&mut rng).as_str(),
            rng.pick(&LOCATIONS),
            start_year.as_str(),
        ])?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {count} providers to {output_path}");
    Ok(())
}

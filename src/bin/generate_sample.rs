//! Writes an instrument-style export for trying the viewer by hand:
//! a metadata block, the `BEGIN RECORD` marker, then timestamped readings
//! with a few blank rows, `SDI` diagnostic rows and malformed lines mixed in.

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use enviro_dash::demo::write_instrument_export;

const READINGS: usize = 2_000;

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_readings.txt".to_string());
    let file = std::fs::File::create(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    let mut out = BufWriter::new(file);

    let mut rng = StdRng::seed_from_u64(42);
    let written = write_instrument_export(&mut out, &mut rng, READINGS)?;
    out.flush()?;

    log::info!("Wrote {written} readings ({READINGS} lines) to {output_path}");
    println!("Wrote {written} readings ({READINGS} lines) to {output_path}");
    Ok(())
}

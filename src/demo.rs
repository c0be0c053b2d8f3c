use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};

use crate::config::{DEMO_COLUMNS, DEMO_ROWS};
use crate::data::model::{Column, ColumnData, Dataset};

/// A table of standard-normal draws, one numeric column per name.
pub fn random_table<R: Rng>(rng: &mut R, rows: usize, columns: &[&str]) -> Dataset {
    let columns = columns
        .iter()
        .map(|name| Column {
            name: name.to_string(),
            data: ColumnData::Numeric(
                (0..rows)
                    .map(|_| Some(rng.sample::<f64, _>(StandardNormal)))
                    .collect(),
            ),
        })
        .collect();
    Dataset { columns }
}

/// The demo table: 10 rows of columns `A`, `B`, `C`.
pub fn demo_table() -> Dataset {
    random_table(&mut rand::rng(), DEMO_ROWS, DEMO_COLUMNS)
}

/// Minutes between readings in [`write_instrument_export`].
pub const SAMPLE_STEP_MINUTES: i64 = 15;

/// Write an instrument-style export: a metadata block, the `BEGIN RECORD`
/// marker, then `readings` timestamped lines with a few blank rows, `SDI`
/// diagnostic rows and over-long lines mixed in.  Returns how many clean
/// readings were written.
pub fn write_instrument_export<W: Write, R: Rng>(
    out: &mut W,
    rng: &mut R,
    readings: usize,
) -> Result<usize> {
    let temp_noise = Normal::new(0.0_f64, 0.4).context("temperature noise")?;
    let turb_noise = Normal::new(0.0_f64, 1.5).context("turbidity noise")?;

    writeln!(out, "Station: Upper Creek 04")?;
    writeln!(out, "Logger: WQ-200 s/n 11873")?;
    writeln!(out, "Interval: {SAMPLE_STEP_MINUTES} min")?;
    writeln!(out, "Units: degC, NTU, mg/L")?;
    writeln!(out, "BEGIN RECORD")?;
    writeln!(out, "DateTime,Temp_C,Turbidity_NTU,DO_mgL,Status")?;

    let start = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("start timestamp")?;
    let per_day = 24.0 * 60.0 / SAMPLE_STEP_MINUTES as f64;

    let mut written = 0;
    for i in 0..readings {
        let ts = start + Duration::minutes(SAMPLE_STEP_MINUTES * i as i64);
        let ts = ts.format("%Y-%m-%d %H:%M:%S");
        let day_phase = (i as f64 / per_day) * std::f64::consts::TAU;
        let drift = i as f64 / readings as f64;

        let temp: f64 = 14.0 + 3.0 * day_phase.sin() + 2.0 * drift + temp_noise.sample(rng);
        let mut turbidity: f64 = 8.0 + turb_noise.sample(rng).abs();
        if rng.random_range(0..100) < 2 {
            turbidity *= 6.0;
        }
        let dissolved_o2: f64 = 9.5 - 0.2 * (temp - 14.0) + rng.random_range(-0.2..0.2);

        match rng.random_range(0..200) {
            0 => writeln!(out, ",,,,")?,
            1 => writeln!(out, "{ts},SDI-ERROR,,,probe fault")?,
            2 => writeln!(
                out,
                "{ts},{temp:.2},{turbidity:.2},{dissolved_o2:.2},ok,extra,fields"
            )?,
            _ => {
                writeln!(out, "{ts},{temp:.2},{turbidity:.2},{dissolved_o2:.2},ok")?;
                written += 1;
            }
        }
    }
    Ok(written)
}

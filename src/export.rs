use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::model::Dataset;

/// Write the dataset (band columns included, if attached) as CSV.
/// Missing values become empty fields.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(dataset.columns.iter().map(|c| c.name.as_str()))
        .context("writing CSV header")?;

    for row in 0..dataset.len() {
        let record: Vec<String> = dataset
            .columns
            .iter()
            .map(|c| c.data.cell(row).to_string())
            .collect();
        out.write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    out.flush().context("flushing CSV output")?;
    Ok(())
}

pub fn export_to_path(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, file)?;
    log::info!("Exported {} rows to {}", dataset.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::RawUpload;
    use crate::pipeline::{attach_band, process_upload};

    #[test]
    fn exported_csv_carries_band_and_blanks() {
        let upload = RawUpload {
            file_name: "in.csv".into(),
            bytes: b"Time,V,Note\n2024-01-01 00:00,1,\n2024-01-01 01:00,1,ok\n2024-01-01 02:00,1,\n"
                .to_vec(),
        };
        let mut processed = process_upload(&upload).unwrap();
        attach_band(&mut processed.dataset, "V", 3).unwrap();

        let mut buf = Vec::new();
        write_csv(&processed.dataset, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Time,V,Note,mean,std,upper,lower");
        assert_eq!(lines[1], "2024-01-01 00:00:00,1,,1,0,1,1");
        assert_eq!(lines[2], "2024-01-01 01:00:00,1,ok,1,0,1,1");
        assert_eq!(lines.len(), 4);
    }
}

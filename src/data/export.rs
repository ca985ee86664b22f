use std::io::Write;
use std::path::Path;

use super::aggregate::Aggregates;
use super::error::Result;
use super::model::Record;

/// Write records as CSV using the source column names, so an export can be
/// loaded straight back in.
pub fn write_csv<W: Write>(sink: W, records: &[&Record]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_csv(path: &Path, records: &[&Record]) -> Result<()> {
    write_csv(std::fs::File::create(path)?, records)?;
    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

/// Pretty-printed JSON with the KPIs and every chart series.
pub fn export_summary_json(path: &Path, aggregates: &Aggregates) -> Result<()> {
    let mut sink = std::io::BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut sink, aggregates)?;
    sink.flush()?;
    log::info!("Exported summary to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::{AggregateSettings, Aggregates};
    use crate::data::loader::{load_csv_reader, load_file};
    use crate::data::model::tests::record;

    #[test]
    fn exported_csv_loads_back() {
        let recs = [
            record(2023, "senior", "integral", "grande", "Data Scientist", 150_000.0),
            record(2021, "junior", "pj", "pequena", "Analyst", 42_000.5),
        ];
        let view: Vec<&Record> = recs.iter().collect();

        let mut buf = Vec::new();
        write_csv(&mut buf, &view).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with(
            "ano,senioridade,contrato,tamanho_empresa,cargo,usd,remoto,residencia_iso3"
        ));

        let reloaded = load_csv_reader(buf.as_slice()).unwrap();
        assert_eq!(reloaded.records, recs.to_vec());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.csv");
        export_csv(&path, &view).unwrap();
        assert_eq!(load_file(&path).unwrap().len(), 2);
    }

    #[test]
    fn summary_json_has_every_series() {
        let recs = [record(2023, "senior", "integral", "grande", "Data Scientist", 10.0)];
        let view: Vec<&Record> = recs.iter().collect();
        let aggregates = Aggregates::compute(
            &view,
            &AggregateSettings {
                top_roles: 10,
                histogram_bins: 5,
                country_role: "Data Scientist".into(),
            },
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        export_summary_json(&path, &aggregates).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["kpis"]["record_count"], 1);
        assert_eq!(json["kpis"]["mode_role"], "Data Scientist");
        assert_eq!(json["histogram"].as_array().unwrap().len(), 5);
        assert_eq!(json["salary_by_country"][0]["country"], "USA");
        assert_eq!(json["remote_ratio"][0]["category"], "remoto");
    }
}

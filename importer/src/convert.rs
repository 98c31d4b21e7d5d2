use std::path::{Path, PathBuf};

use anyhow::Context;

/// `<dir>/<stem>.json` becomes `<dir>/<stem>_opendota.json`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    input.with_file_name(format!("{}_opendota.json", stem))
}

pub fn write_json<T>(path: &Path, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating output file {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("writing {}", path.display()))?;
    std::io::Write::flush(&mut writer)?;

    Ok(())
}

/// Converts the event log at `input` and stores the record at `output`.
#[tracing::instrument(skip_all, fields(input = %input.display()))]
pub fn convert_file(input: &Path, output: &Path) -> anyhow::Result<analysis::Conversion> {
    let file = std::fs::File::open(input)
        .with_context(|| format!("opening event log {}", input.display()))?;

    let source = input.to_string_lossy();
    let conversion = analysis::convert_reader(std::io::BufReader::new(file), &source)
        .with_context(|| format!("reading event log {}", input.display()))?;

    write_json(output, &conversion.record)?;

    tracing::info!("Wrote match record to {}", output.display());

    Ok(conversion)
}

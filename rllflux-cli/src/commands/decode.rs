use anyhow::{Context, Result};
use colored::*;
use rllflux_core::{decoder::decode_reader, DecodeEvent, DecodeStats, FrameDiagnostic, Record};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// One record as written to the `--json` output
#[derive(Debug, Serialize, Deserialize)]
pub struct RecoveredRecord {
    pub tag: String,
    pub length: usize,
    pub check: String,
    pub intact: Option<bool>,
    pub payload: String,
}

impl From<&Record> for RecoveredRecord {
    fn from(record: &Record) -> Self {
        Self {
            tag: record.kind.tag().to_string(),
            length: record.length,
            check: record.check_hex(),
            intact: record.is_intact(),
            payload: hex::encode(&record.payload),
        }
    }
}

/// `4 <waveform length>`
pub fn format_diagnostic(diag: &FrameDiagnostic) -> String {
    format!("4 {}", diag.waveform_len)
}

/// `6 <tag> <length> <check> <payload hex>`
pub fn format_record(record: &Record) -> String {
    format!(
        "6 {} {:5} {} {}",
        record.kind.tag(),
        record.length,
        record.check_hex(),
        hex::encode(&record.payload)
    )
}

/// Decode `input`, writing one line per event to `out`
///
/// Lines already written stay written if the capture becomes unreadable part
/// way through.
pub fn run<W: Write>(input: &Path, out: &mut W, json: Option<&Path>) -> Result<DecodeStats> {
    info!("Decoding capture: {}", input.display());

    let file = File::open(input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;

    let mut stats = DecodeStats::default();
    let mut recovered = Vec::new();

    for event in decode_reader(file) {
        let event =
            event.with_context(|| format!("Failed to read input file: {}", input.display()))?;
        stats.observe(&event);

        match &event {
            DecodeEvent::Frame(diag) => writeln!(out, "{}", format_diagnostic(diag))?,
            DecodeEvent::Record(record) => {
                writeln!(out, "{}", format_record(record))?;
                if json.is_some() {
                    recovered.push(RecoveredRecord::from(record));
                }
            }
        }
    }

    if let Some(json_path) = json {
        let text = serde_json::to_string_pretty(&recovered)
            .with_context(|| "Failed to serialize recovered records")?;

        fs::write(json_path, text)
            .with_context(|| format!("Failed to write JSON file: {}", json_path.display()))?;

        info!("Records written to: {}", json_path.display());
    }

    Ok(stats)
}

pub fn execute(input: &Path, json: Option<&Path>, stats: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = run(input, &mut out, json);
    out.flush()?;
    let summary = result?;

    if stats {
        print_stats(&summary);
    }

    Ok(())
}

fn print_stats(stats: &DecodeStats) {
    eprintln!("\n=== Decode Results ===");
    eprintln!("Frames:            {}", stats.frames);
    eprintln!("Empty frames:      {}", stats.empty_frames);
    if stats.truncated_frames > 0 {
        eprintln!("Truncated frames:  {}", stats.truncated_frames.to_string().yellow());
    } else {
        eprintln!("Truncated frames:  {}", stats.truncated_frames);
    }
    eprintln!("Waveform cells:    {}", stats.cells);
    eprintln!(
        "Data marks:        {} ({} intact)",
        stats.data_marks, stats.intact_data_marks
    );
    eprintln!(
        "Address marks:     {} ({} intact)",
        stats.address_marks, stats.intact_address_marks
    );
    eprintln!("Unknown records:   {}", stats.unknown_records);

    let marks = stats.data_marks + stats.address_marks;
    let intact = stats.intact_data_marks + stats.intact_address_marks;
    if marks == 0 {
        eprintln!("{} No address or data marks found", "✗".red());
    } else if intact == marks {
        eprintln!("{} All {} marks intact", "✓".green(), marks);
    } else {
        eprintln!(
            "{} {:.2}% of marks intact",
            "✗".red(),
            stats.intact_rate()
        );
    }
}

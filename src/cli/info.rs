use crate::error::Result;
use crate::inspect::{inspect, StreamForm, StreamReport};
use std::path::Path;

/// Options for the info command
#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    pub json: bool,
}

/// Describe the chunks of a canonical or shuffled PNG file
pub fn show_info(path: &Path, options: &InfoOptions) -> Result<String> {
    let data = std::fs::read(path)?;
    let report = inspect(&data)?;

    if options.json {
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        return Ok(json);
    }
    Ok(render_report(path, &report))
}

fn render_report(path: &Path, report: &StreamReport) -> String {
    let mut output = String::new();

    output.push_str("PNG Chunk Information\n");
    output.push_str("=====================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Size: {}\n", format_size(report.total_bytes as u64)));
    let form = match report.form {
        StreamForm::Canonical => "canonical",
        StreamForm::Shuffled => "shuffled",
    };
    output.push_str(&format!("Form: {}\n", form));
    output.push_str(&format!("Chunks: {}\n", report.chunks.len()));
    output.push_str(&format!("Invalid CRCs: {}\n\n", report.invalid_crcs()));

    output.push_str(&format!(
        "{:>5} {:>10} {:<6} {:>10} {:<10} {}\n",
        "Pos", "Offset", "Type", "Length", "Trailer", "Notes"
    ));
    for chunk in &report.chunks {
        let mut notes = Vec::new();
        match chunk.crc_valid {
            Some(true) => notes.push("crc ok"),
            Some(false) => notes.push("CRC MISMATCH"),
            None => notes.push("position"),
        }
        if !chunk.known {
            notes.push("unknown type");
        }
        if chunk.critical {
            notes.push("critical");
        }
        output.push_str(&format!(
            "{:>5} {:>10} {:<6} {:>10} {:<10} {}\n",
            chunk.position,
            chunk.offset,
            chunk.chunk_type.to_string(),
            chunk.length,
            chunk.trailer,
            notes.join(", ")
        ));
    }

    output
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use dauc_algo::UcSolution;
use dauc_core::Model;
use tabwriter::TabWriter;

/// Create the parent directory of an output file if needed.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    Ok(())
}

/// Hourly on/off and output per generator.
pub fn print_commitment_table(solution: &UcSolution) -> Result<()> {
    let Some(first) = solution.schedules.first() else {
        return Ok(());
    };
    let hours = first.power_mw.len();
    let mut writer = TabWriter::new(io::stdout());

    let header: Vec<String> = (1..=hours).map(|h| format!("H{h}")).collect();
    writeln!(writer, "UNIT\t{}", header.join("\t"))?;
    for sched in &solution.schedules {
        let cells: Vec<String> = (1..=hours)
            .map(|h| {
                if sched.is_on(h) {
                    format!("{:.1}", sched.power_mw[h - 1])
                } else {
                    "off".to_string()
                }
            })
            .collect();
        writeln!(writer, "{}\t{}", sched.name, cells.join("\t"))?;
    }
    let totals: Vec<String> = (1..=hours)
        .map(|h| format!("{:.1}", solution.total_generation(h)))
        .collect();
    writeln!(writer, "TOTAL\t{}", totals.join("\t"))?;
    writer.flush()?;
    Ok(())
}

/// Row counts of a model grouped by constraint family.
pub fn print_row_counts(model: &Model) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "FAMILY\tROWS")?;
    for (kind, count) in model.counts_by_kind() {
        writeln!(writer, "{}\t{}", kind.label(), count)?;
    }
    writer.flush()?;
    Ok(())
}

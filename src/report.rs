use std::io::{self, Write};

use crate::life::sweep::SweepRow;

pub const CSV_HEADER: &str = "Noise Level,Combination,Mean,Std Dev,CV";

/// Write successful rows as CSV in sweep order; failed groups are skipped
/// (they were already reported by the orchestrator). Returns the number of
/// data rows written.
pub fn write_csv<W: Write>(mut out: W, rows: &[SweepRow]) -> io::Result<usize> {
    writeln!(out, "{CSV_HEADER}")?;
    let mut written = 0;
    for row in rows {
        if let Ok(stat) = &row.outcome {
            writeln!(
                out,
                "{},{},{},{},{}",
                row.noise_level, row.pattern_id, stat.mean, stat.std_dev, stat.cv
            )?;
            written += 1;
        }
    }
    out.flush()?;
    Ok(written)
}

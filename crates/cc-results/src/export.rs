//! CSV export of stored time series.

use crate::ResultsResult;
use crate::types::TickRecord;
use std::io::Write;
use std::path::Path;

/// Write a header row and one row per tick.
pub fn write_csv<W: Write>(writer: W, records: &[TickRecord]) -> ResultsResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_csv(path: &Path, records: &[TickRecord]) -> ResultsResult<()> {
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tick: usize) -> TickRecord {
        TickRecord {
            tick,
            time_s: tick as f64,
            error_kph: 1.5,
            speed_kph: 100.0,
            gear: 6,
            throttle: -0.25,
            speedometer_kph: 106.5,
            inclination_deg: 0.0,
        }
    }

    #[test]
    fn header_and_rows() {
        let mut out = Vec::new();
        write_csv(&mut out, &[record(0), record(1)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "tick,time_s,error_kph,speed_kph,gear,throttle,speedometer_kph,inclination_deg"
        );
        assert_eq!(lines[2], "1,1.0,1.5,100.0,6,-0.25,106.5,0.0");
    }
}

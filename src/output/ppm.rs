//! File encoders: PPM images and the mountain data file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Error;
use crate::mountain::MountainReport;

/// Map an escape count to an RGB triple.
///
/// 0 ("inside the set") is black; escaping points cycle each channel
/// through a simple modular scheme.
#[inline]
pub fn colorize(iter: u32) -> (u8, u8, u8) {
    if iter == 0 {
        (0, 0, 0)
    } else {
        (
            (iter % 256) as u8,
            (iter.wrapping_mul(2) % 256) as u8,
            (iter.wrapping_mul(5) % 256) as u8,
        )
    }
}

/// Write a rendered count grid as a plain-text PPM (P3) image.
///
/// `counts` is row-major, `width * height` entries.
pub fn write_ppm<W: Write>(
    mut w: W,
    counts: &[u32],
    width: usize,
    height: usize,
) -> Result<(), Error> {
    assert_eq!(counts.len(), width * height, "counts length mismatch");

    writeln!(w, "P3\n{width} {height}\n255")?;
    for &iter in counts {
        let (r, g, b) = colorize(iter);
        writeln!(w, "{r} {g} {b}")?;
    }
    Ok(())
}

/// Write a rendered count grid to a PPM file.
pub fn write_ppm_file<P: AsRef<Path>>(
    path: P,
    counts: &[u32],
    width: usize,
    height: usize,
) -> Result<(), Error> {
    let file = BufWriter::new(File::create(path)?);
    write_ppm(file, counts, width, height)
}

/// Write the mountain table in the tab-separated format the course's
/// plotting scripts expect: a stride header row, then one row per
/// working-set size labelled with log2 of the size in KiB.
pub fn write_mountain_dat<W: Write>(mut w: W, report: &MountainReport) -> Result<(), Error> {
    write!(w, "# Memory mountain (MB/sec)\n--\t")?;
    for stride in &report.strides {
        write!(w, "{stride}\t")?;
    }
    writeln!(w)?;

    for row in &report.rows {
        write!(w, "{}\t", row.log2_kb)?;
        for bw in &row.bandwidth_mb_s {
            write!(w, "{bw:.0}\t")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Write the mountain table to a file.
pub fn write_mountain_dat_file<P: AsRef<Path>>(
    path: P,
    report: &MountainReport,
) -> Result<(), Error> {
    let file = BufWriter::new(File::create(path)?);
    write_mountain_dat(file, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mountain::MountainRow;

    #[test]
    fn test_colorize_inside_is_black() {
        assert_eq!(colorize(0), (0, 0, 0));
    }

    #[test]
    fn test_colorize_scheme() {
        assert_eq!(colorize(100), (100, 200, 244));
        // channels wrap independently mod 256
        assert_eq!(colorize(257), (1, 2, 5));
    }

    #[test]
    fn test_ppm_header_and_body() {
        let counts = vec![0u32, 1, 2, 3];
        let mut buf = Vec::new();
        write_ppm(&mut buf, &counts, 2, 2).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("P3"));
        assert_eq!(lines.next(), Some("2 2"));
        assert_eq!(lines.next(), Some("255"));
        assert_eq!(lines.next(), Some("0 0 0"));
        assert_eq!(lines.next(), Some("1 2 5"));
        assert_eq!(text.lines().count(), 3 + 4);
    }

    #[test]
    fn test_mountain_dat_layout() {
        let report = MountainReport {
            strides: vec![1, 2],
            rows: vec![MountainRow {
                size_bytes: 1 << 16,
                log2_kb: 6,
                bandwidth_mb_s: vec![1234.4, 567.6],
            }],
        };
        let mut buf = Vec::new();
        write_mountain_dat(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("# Memory mountain (MB/sec)"));
        assert_eq!(lines.next(), Some("--\t1\t2\t"));
        assert_eq!(lines.next(), Some("6\t1234\t568\t"));
    }
}

//! Terminal output formatting with colors.

use colored::Colorize;

use crate::mountain::MountainReport;
use crate::timing::Measurement;

/// Format a measurement for human-readable terminal output.
///
/// Converged results get a green check; cap-terminated ones a yellow
/// warning, since the best timing then carries more residual spread.
pub fn format_measurement(label: &str, m: &Measurement) -> String {
    let status = if m.converged {
        format!("{} converged", "\u{2713}".green().bold())
    } else {
        format!("{} sample cap reached", "\u{26A0}".yellow().bold())
    };

    let spread = match (m.best_samples.first(), m.best_samples.last()) {
        (Some(best), Some(worst)) if *best > 0.0 => (worst - best) / best * 100.0,
        _ => 0.0,
    };

    format!(
        "{}: best {} over {} trials ({}, spread {:.2}%, overhead {})\n",
        label.bold(),
        format_seconds(m.best).cyan(),
        m.samples,
        status,
        spread,
        format_seconds(m.overhead),
    )
}

/// Format the mountain as the conventional size × stride table, strides
/// across, sizes (log2 KiB) down.
pub fn format_mountain(report: &MountainReport) -> String {
    let mut out = String::new();

    out.push_str(&"# Memory mountain (MB/sec)\n".bold().to_string());
    out.push_str("--\t");
    for stride in &report.strides {
        out.push_str(&format!("{stride}\t"));
    }
    out.push('\n');

    for row in &report.rows {
        out.push_str(&format!("{}\t", row.log2_kb));
        for bw in &row.bandwidth_mb_s {
            out.push_str(&format!("{bw:.0}\t"));
        }
        out.push('\n');
    }

    out
}

/// Render a duration in seconds with a unit that keeps the mantissa sane.
fn format_seconds(secs: f64) -> String {
    if secs >= 1.0 {
        format!("{secs:.3} s")
    } else if secs >= 1e-3 {
        format!("{:.3} ms", secs * 1e3)
    } else if secs >= 1e-6 {
        format!("{:.3} us", secs * 1e6)
    } else {
        format!("{:.1} ns", secs * 1e9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_measurement(converged: bool) -> Measurement {
        Measurement {
            best: 1.25e-4,
            overhead: 3.0e-8,
            samples: 17,
            converged,
            best_samples: vec![1.25e-4, 1.26e-4, 1.27e-4],
        }
    }

    #[test]
    fn test_format_measurement_mentions_trials() {
        let text = format_measurement("copy", &sample_measurement(true));
        assert!(text.contains("17 trials"));
        assert!(text.contains("converged"));
    }

    #[test]
    fn test_format_measurement_flags_cap() {
        let text = format_measurement("copy", &sample_measurement(false));
        assert!(text.contains("sample cap"));
    }

    #[test]
    fn test_format_seconds_units() {
        assert_eq!(format_seconds(2.5), "2.500 s");
        assert_eq!(format_seconds(2.5e-3), "2.500 ms");
        assert_eq!(format_seconds(2.5e-6), "2.500 us");
        assert_eq!(format_seconds(2.5e-8), "25.0 ns");
    }
}

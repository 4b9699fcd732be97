//! Instance file parser.
//!
//! Reads the line-oriented benchmark format:
//!
//! ```text
//! 20                      <- number of jobs N
//! 5                       <- number of machines M
//! 873654221 379008056     <- initial/current seeds (ignored)
//! 0                       <- job index (ignored)
//! 1278                    <- due date (ignored)
//! 54 79 16 66 58          <- processing times of job 0 on machines 0..M
//! 1
//! ...
//! ```
//!
//! Every job contributes exactly three lines. Lines after the last job block
//! are ignored with a warning.

use std::path::Path;
use std::str::FromStr;

use crate::error::{FlowShopError, Result};
use crate::models::{InstanceData, MatrixLayout};

/// Line cursor that reports 1-based line numbers in errors.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        match self.inner.next() {
            Some((i, line)) => {
                self.last = i + 1;
                Ok(line)
            }
            None => Err(FlowShopError::parse(
                self.last + 1,
                format!("unexpected end of input, expected {what}"),
            )),
        }
    }

    fn count(&mut self, what: &str) -> Result<usize> {
        let line = self.next(what)?;
        line.trim()
            .parse()
            .map_err(|_| FlowShopError::parse(self.last, format!("invalid {what}: {line:?}")))
    }
}

/// Parses an instance from benchmark text.
///
/// # Errors
/// Fails on missing lines, non-numeric fields, a processing-time line whose
/// length differs from the machine count, or non-positive times.
pub fn parse_instance(text: &str) -> Result<InstanceData> {
    let mut lines = Lines::new(text);
    let no_jobs = lines.count("job count")?;
    let no_machines = lines.count("machine count")?;
    if no_jobs.checked_mul(no_machines).is_none() {
        return Err(FlowShopError::parse(
            2,
            format!("{no_jobs} jobs x {no_machines} machines is too large"),
        ));
    }
    lines.next("seed line")?;

    // Job-major, grown one job line at a time.
    let mut proc_times = Vec::new();
    for j in 0..no_jobs {
        lines.next("job index")?;
        lines.next("due date")?;
        let line = lines.next("processing times")?;
        let times = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<i64>().map_err(|_| {
                    FlowShopError::parse(lines.last, format!("invalid processing time {tok:?}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if times.len() != no_machines {
            return Err(FlowShopError::parse(
                lines.last,
                format!(
                    "job {j} has {} processing times, expected {no_machines}",
                    times.len()
                ),
            ));
        }
        proc_times.extend(times);
    }

    let trailing = lines.inner.filter(|(_, l)| !l.trim().is_empty()).count();
    if trailing > 0 {
        log::warn!("ignoring {trailing} non-empty line(s) after the last job block");
    }

    InstanceData::from_flat(no_jobs, no_machines, proc_times, MatrixLayout::JobMajor)
}

/// Reads and parses an instance file.
pub fn read_instance(path: impl AsRef<Path>) -> Result<InstanceData> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let data = parse_instance(&text)?;
    log::debug!(
        "loaded {}: {} jobs x {} machines",
        path.display(),
        data.no_jobs(),
        data.no_machines()
    );
    Ok(data)
}

impl FromStr for InstanceData {
    type Err = FlowShopError;

    fn from_str(s: &str) -> Result<Self> {
        parse_instance(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "3
2
873654221 379008056
0
100
4 7
1
100
2 5
2
100
9 1
";

    #[test]
    fn test_parse_sample() {
        let d = parse_instance(SAMPLE).unwrap();
        assert_eq!(d.no_jobs(), 3);
        assert_eq!(d.no_machines(), 2);
        assert_eq!(d.pt(0, 1), 7);
        assert_eq!(d.pt(2, 0), 9);
        assert_eq!(d.machine_row(0), &[4, 2, 9]);
        assert_eq!(d.job_total(1), 7);
    }

    #[test]
    fn test_from_str() {
        let d: InstanceData = SAMPLE.parse().unwrap();
        assert_eq!(d.no_jobs(), 3);
    }

    #[test]
    fn test_tolerates_padding_and_trailing_lines() {
        let text = SAMPLE.replace("4 7", "   4    7  ") + "\nextra stuff\n";
        let d = parse_instance(&text).unwrap();
        assert_eq!(d.pt(0, 0), 4);
        assert_eq!(d.pt(0, 1), 7);
    }

    #[test]
    fn test_truncated_input() {
        let text: String = SAMPLE.lines().take(9).collect::<Vec<_>>().join("\n");
        match parse_instance(&text) {
            Err(FlowShopError::Parse { line, message }) => {
                assert_eq!(line, 10);
                assert!(message.contains("job index"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_machine_count() {
        let text = SAMPLE.replace("2 5", "2 5 8");
        match parse_instance(&text) {
            Err(FlowShopError::Parse { line, .. }) => assert_eq!(line, 9),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(
            parse_instance("three\n2\n"),
            Err(FlowShopError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_oversized_header_fails_fast() {
        match parse_instance("5000000000\n5000000000\n1\n") {
            Err(FlowShopError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("too large"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        // Huge but representable counts fail on the first missing job line.
        assert!(matches!(
            parse_instance("100000000\n1000\n1 1\n"),
            Err(FlowShopError::Parse { line: 4, .. })
        ));
    }

    #[test]
    fn test_bad_time_token() {
        let text = SAMPLE.replace("9 1", "9 x");
        assert!(matches!(
            parse_instance(&text),
            Err(FlowShopError::Parse { line: 12, .. })
        ));
    }

    #[test]
    fn test_non_positive_time_rejected() {
        let text = SAMPLE.replace("9 1", "9 0");
        assert!(matches!(
            parse_instance(&text),
            Err(FlowShopError::InvalidInstance(_))
        ));
    }

    #[test]
    fn test_read_instance_file() {
        let path = std::env::temp_dir().join("u_flowshop_parser_test.txt");
        std::fs::write(&path, SAMPLE).unwrap();
        let d = read_instance(&path).unwrap();
        assert_eq!(d.no_jobs(), 3);
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            read_instance("/nonexistent/instance.txt"),
            Err(FlowShopError::Io(_))
        ));
    }
}

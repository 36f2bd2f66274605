//! Progress reporting for a single stream copy
//!
//! The copier decides *when* to report; a [`ProgressSink`] decides *how*.
//! Two sinks are provided:
//! - [`LineProgress`]: a carriage-return refreshed text line on any writer
//! - [`BarProgress`]: an indicatif bar for interactive terminals

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Receives progress updates from the copier
pub trait ProgressSink {
    /// `written` bytes copied so far; `total` is known on the sending side only
    fn update(&mut self, written: u64, total: Option<u64>);

    /// Copy finished after `written` bytes
    fn finish(&mut self, written: u64);
}

/// Text progress line, refreshed in place with `\r`
pub struct LineProgress<W: Write> {
    label: String,
    out: W,
}

impl LineProgress<io::Stdout> {
    /// Progress line on stdout
    pub fn stdout(label: impl Into<String>) -> Self {
        Self::new(label, io::stdout())
    }
}

impl<W: Write> LineProgress<W> {
    /// Progress line on an arbitrary writer
    pub fn new(label: impl Into<String>, out: W) -> Self {
        Self {
            label: label.into(),
            out,
        }
    }

    /// Consume the sink and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for LineProgress<W> {
    fn update(&mut self, written: u64, total: Option<u64>) {
        // Display errors never abort a transfer
        let _ = match total {
            Some(total) if total > 0 => write!(
                self.out,
                "\r{}: {:.1}% ({}/{})",
                self.label,
                percentage(written, total),
                format_bytes(written),
                format_bytes(total)
            ),
            _ => write!(self.out, "\r{}: {}", self.label, format_bytes(written)),
        };
        let _ = self.out.flush();
    }

    fn finish(&mut self, _written: u64) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}

/// Bar layout when the total size is known
const BAR_TEMPLATE: &str =
    "{prefix:.bold.dim} [{bar:40.green/white}] {percent}% {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta})";

/// Spinner layout when the total size is unknown
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {prefix:.bold.dim} {bytes} ({bytes_per_sec})";

/// indicatif progress bar (known size) or byte spinner (unknown size)
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    /// Create a bar drawn on stdout
    pub fn new(label: &str, total: Option<u64>) -> Self {
        let bar = ProgressBar::with_draw_target(total, ProgressDrawTarget::stdout());

        let style = match total {
            Some(_) => ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .map(|s| s.progress_chars("=> ")),
            None => ProgressStyle::default_spinner().template(SPINNER_TEMPLATE),
        };
        bar.set_style(style.unwrap_or_else(|_| ProgressStyle::default_bar()));
        bar.set_prefix(label.to_string());

        Self { bar }
    }

    /// Create a hidden bar (tests, quiet runs)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Current bar position
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressSink for BarProgress {
    fn update(&mut self, written: u64, total: Option<u64>) {
        if let Some(total) = total {
            self.bar.set_length(total);
        }
        self.bar.set_position(written);
    }

    fn finish(&mut self, written: u64) {
        self.bar.set_position(written);
        self.bar.finish();
    }
}

/// Pick a sink for stdout: a bar on an attended terminal, a text line otherwise
pub fn stdout_sink(label: &str, total: Option<u64>) -> Box<dyn ProgressSink> {
    if console::Term::stdout().features().is_attended() {
        Box::new(BarProgress::new(label, total))
    } else {
        Box::new(LineProgress::stdout(label))
    }
}

/// Completion percentage; 0 when the total is unknown or zero
pub fn percentage(written: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        written as f64 / total as f64 * 100.0
    }
}

/// Human-readable byte count (binary units)
pub fn format_bytes(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Bytes per second; a zero-length interval yields 0
pub fn throughput(bytes: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (bytes as f64 / secs) as u64
    } else {
        0
    }
}

/// Elapsed time rounded to milliseconds, e.g. `1s 250ms`
pub fn format_elapsed(elapsed: Duration) -> String {
    let rounded = Duration::from_millis(elapsed.as_millis() as u64);
    humantime::format_duration(rounded).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_zero_duration() {
        assert_eq!(throughput(1_000_000, Duration::ZERO), 0);
        assert_eq!(throughput(0, Duration::ZERO), 0);
        assert_eq!(throughput(2048, Duration::from_secs(2)), 1024);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(50, 200), 25.0);
        assert_eq!(percentage(200, 200), 100.0);
    }

    #[test]
    fn test_format_bytes() {
        assert!(format_bytes(512).starts_with("512"));
        assert!(format_bytes(3 * 1024 * 1024).contains('M'));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_micros(1_250_400)), "1s 250ms");
        assert_eq!(format_elapsed(Duration::ZERO), "0s");
    }

    #[test]
    fn test_line_progress_known_total() {
        let mut sink = LineProgress::new("Sending", Vec::new());
        sink.update(512, Some(1024));
        sink.finish(1024);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.starts_with("\rSending: 50.0% ("));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_line_progress_unknown_total() {
        let mut sink = LineProgress::new("Receiving", Vec::new());
        sink.update(100, None);
        // A zero total is treated like an unknown one
        sink.update(200, Some(0));

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(!out.contains('%'));
        assert_eq!(out.matches("\rReceiving: ").count(), 2);
    }

    #[test]
    fn test_bar_progress_tracks_position() {
        let mut sink = BarProgress::hidden();
        sink.update(4096, Some(8192));
        assert_eq!(sink.position(), 4096);
        sink.finish(8192);
        assert_eq!(sink.position(), 8192);
    }

    #[test]
    fn test_bar_templates_parse() {
        assert!(BAR_TEMPLATE.contains("{percent}%"));
        assert!(ProgressStyle::default_bar().template(BAR_TEMPLATE).is_ok());
        assert!(ProgressStyle::default_spinner().template(SPINNER_TEMPLATE).is_ok());
    }
}

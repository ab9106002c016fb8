use std::{
    fmt,
    io::{self, Stderr, Write},
    time::{Duration, Instant},
};

/// One progress update, rendered as a single overwritable terminal line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStatus<'a> {
    pub last_id: &'a str,
    pub total: u64,
    pub rate: u64,
    pub annotation: &'a str,
}

impl fmt::Display for ProgressStatus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\rdumping {} ({}) at {} rec/sec {} ",
            self.last_id, self.total, self.rate, self.annotation
        )
    }
}

/// Whole records per second since the run started.
pub fn records_per_sec(total: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (total as f64 / secs) as u64
    } else {
        0
    }
}

/// Writes the per-page progress line to the diagnostic stream.
///
/// Write errors are ignored: the line is informational and must never stop
/// an export.
pub struct ProgressReporter<W = Stderr> {
    out: W,
    started: Instant,
}

impl ProgressReporter<Stderr> {
    pub fn stderr() -> Self {
        ProgressReporter::new(io::stderr())
    }
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        ProgressReporter {
            out,
            started: Instant::now(),
        }
    }

    /// Restarts the throughput clock.
    pub fn start(&mut self) {
        self.started = Instant::now();
    }

    pub fn page(&mut self, last_id: &str, total: u64, annotation: &str) {
        let status = ProgressStatus {
            last_id,
            total,
            rate: records_per_sec(total, self.started.elapsed()),
            annotation,
        };
        write!(self.out, "{status}").ok();
        self.out.flush().ok();
    }

    /// Ends the progress line. Called once, when the export terminates.
    pub fn finish(&mut self) {
        writeln!(self.out).ok();
        self.out.flush().ok();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

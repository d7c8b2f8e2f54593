// src/report.rs
//! Reporting sinks for progress, finished trajectories and audits
//!
//! The generator and auditor never print. Callers plug a [`Reporter`] into
//! [`crate::simulate`] to render the run however they like.

use crate::audit::AuditReport;
use crate::config::SimulationConfig;
use crate::generator::{ProgressSnapshot, Trajectory};
use std::io::{self, Write};
use tracing::info;

/// Observer of a simulation run
pub trait Reporter {
    fn on_start(&mut self, _config: &SimulationConfig) {}
    fn on_progress(&mut self, snapshot: &ProgressSnapshot);
    fn on_trajectory(&mut self, _trajectory: &Trajectory) {}
    fn on_audit(&mut self, report: &AuditReport);
}

/// Discards every callback
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn on_progress(&mut self, _snapshot: &ProgressSnapshot) {}
    fn on_audit(&mut self, _report: &AuditReport) {}
}

/// Forwards callbacks as `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn on_start(&mut self, config: &SimulationConfig) {
        info!(seed = config.seed, steps = config.step_count, "simulation started");
    }

    fn on_progress(&mut self, snapshot: &ProgressSnapshot) {
        info!(
            step = snapshot.step,
            percent = snapshot.percent_complete,
            price = snapshot.rounded_price,
            momentum = snapshot.abs_momentum,
            "progress"
        );
    }

    fn on_audit(&mut self, report: &AuditReport) {
        info!(
            final_price = report.final_price,
            volatility = report.annualized_volatility,
            max_drawdown = report.max_drawdown,
            status = "VERIFIED",
            "audit"
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Start(SimulationConfig),
    Progress(ProgressSnapshot),
    Trajectory { len: usize },
    Audit(AuditReport),
}

/// Keeps every callback in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    pub fn snapshots(&self) -> Vec<ProgressSnapshot> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Progress(snapshot) => Some(*snapshot),
                _ => None,
            })
            .collect()
    }

    pub fn audit(&self) -> Option<AuditReport> {
        self.events.iter().rev().find_map(|event| match event {
            ReportEvent::Audit(report) => Some(*report),
            _ => None,
        })
    }
}

impl Reporter for RecordingReporter {
    fn on_start(&mut self, config: &SimulationConfig) {
        self.events.push(ReportEvent::Start(*config));
    }

    fn on_progress(&mut self, snapshot: &ProgressSnapshot) {
        self.events.push(ReportEvent::Progress(*snapshot));
    }

    fn on_trajectory(&mut self, trajectory: &Trajectory) {
        self.events.push(ReportEvent::Trajectory {
            len: trajectory.len(),
        });
    }

    fn on_audit(&mut self, report: &AuditReport) {
        self.events.push(ReportEvent::Audit(*report));
    }
}

const RULE_WIDTH: usize = 32;

/// Fixed-width console table: seed banner, one row per snapshot, audit block
///
/// Write failures are held until [`ConsoleReporter::finish`].
pub struct ConsoleReporter<W: Write> {
    out: W,
    chart_width: Option<usize>,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        ConsoleReporter {
            out,
            chart_width: None,
            error: None,
        }
    }

    /// Also draw the finished trajectory as a sparkline `width` cells wide
    pub fn with_chart(mut self, width: usize) -> Self {
        self.chart_width = Some(width.max(1));
        self
    }

    /// Flush and hand back the writer, or the first write error
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{}", line) {
            self.error = Some(err);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_start(&mut self, config: &SimulationConfig) {
        self.emit(format_args!("MASTER SEED: {}", config.seed));
        self.emit(format_args!(
            "{:<10} | {:<8} | {}",
            "PROGRESS", "PRICE", "MOMENTUM"
        ));
        self.emit(format_args!("{}", "-".repeat(RULE_WIDTH)));
    }

    fn on_progress(&mut self, snapshot: &ProgressSnapshot) {
        self.emit(format_args!("{}", format_progress_row(snapshot)));
    }

    fn on_trajectory(&mut self, trajectory: &Trajectory) {
        if let Some(width) = self.chart_width {
            let chart = sparkline(trajectory.as_slice(), width);
            self.emit(format_args!("{}", chart));
        }
    }

    fn on_audit(&mut self, report: &AuditReport) {
        for line in format_audit_block(report) {
            self.emit(format_args!("{}", line));
        }
    }
}

/// One progress row: percent, banker's-rounded price, |momentum|
pub fn format_progress_row(snapshot: &ProgressSnapshot) -> String {
    format!(
        "{:>3.0}%        | {:<8} | {:.2}",
        snapshot.percent_complete, snapshot.rounded_price, snapshot.abs_momentum
    )
}

/// Format a ratio as a percentage with two decimals
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

pub fn format_audit_block(report: &AuditReport) -> Vec<String> {
    vec![
        "=".repeat(RULE_WIDTH),
        format!("FINAL PRICE:    {:.2}", report.final_price),
        format!("VOLATILITY:     {}", format_percent(report.annualized_volatility)),
        format!("MAX DRAWDOWN:   {}", format_percent(report.max_drawdown)),
        "STATUS:         VERIFIED".to_string(),
        "=".repeat(RULE_WIDTH),
    ]
}

/// Render a price path as a sparkline of at most `width` cells
///
/// Longer paths are averaged into `width` contiguous buckets.
pub fn sparkline(data: &[f64], width: usize) -> String {
    let chars = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    if data.is_empty() || width == 0 {
        return String::new();
    }

    let cells = width.min(data.len());
    let buckets: Vec<f64> = (0..cells)
        .map(|c| {
            let start = c * data.len() / cells;
            let end = ((c + 1) * data.len() / cells).max(start + 1);
            let bucket = &data[start..end];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect();

    let min_val = buckets.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max_val = buckets.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let range = max_val - min_val;

    buckets
        .iter()
        .map(|&v| {
            let normalized = if range > 1e-10 {
                (v - min_val) / range
            } else {
                0.5
            };
            let idx = (normalized * (chars.len() - 1) as f64) as usize;
            chars[idx.min(chars.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(percent: f64, price: f64, momentum: f64) -> ProgressSnapshot {
        ProgressSnapshot {
            step: 0,
            percent_complete: percent,
            price,
            rounded_price: price.round_ties_even() as i64,
            abs_momentum: momentum,
        }
    }

    #[test]
    fn test_progress_row_layout() {
        assert_eq!(
            format_progress_row(&snapshot(10.0, 104.6, 0.7122964154280993)),
            " 10%        | 105      | 0.71"
        );
        assert_eq!(
            format_progress_row(&snapshot(100.0, 102.76, 0.994)),
            "100%        | 103      | 0.99"
        );
    }

    #[test]
    fn test_rounding_is_half_even() {
        assert_eq!(snapshot(50.0, 100.5, 0.0).rounded_price, 100);
        assert_eq!(snapshot(50.0, 101.5, 0.0).rounded_price, 102);
    }

    #[test]
    fn test_audit_block() {
        let block = format_audit_block(&AuditReport {
            annualized_volatility: 0.013418184863311734,
            max_drawdown: -0.11463676833708938,
            final_price: 102.76587198216197,
        });
        assert_eq!(block.len(), 6);
        assert_eq!(block[1], "FINAL PRICE:    102.77");
        assert_eq!(block[2], "VOLATILITY:     1.34%");
        assert_eq!(block[3], "MAX DRAWDOWN:   -11.46%");
        assert!(block[4].ends_with("VERIFIED"));
    }

    #[test]
    fn test_console_reporter_output() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.on_start(&SimulationConfig::default());
        reporter.on_progress(&snapshot(10.0, 104.6, 0.71));
        let out = String::from_utf8(reporter.finish().unwrap()).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "MASTER SEED: 888");
        assert_eq!(lines[1], "PROGRESS   | PRICE    | MOMENTUM");
        assert_eq!(lines[2], "-".repeat(32));
        assert_eq!(lines[3], " 10%        | 105      | 0.71");
    }

    #[test]
    fn test_sparkline() {
        let spark = sparkline(&[1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert_eq!(spark.chars().count(), 5);
        assert!(spark.starts_with('▁'));
        assert!(spark.ends_with('█'));

        let downsampled: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        assert_eq!(sparkline(&downsampled, 40).chars().count(), 40);
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn test_recording_reporter() {
        let mut reporter = RecordingReporter::new();
        let report = AuditReport {
            annualized_volatility: 0.1,
            max_drawdown: 0.0,
            final_price: 1.0,
        };
        reporter.on_progress(&snapshot(50.0, 1.0, 0.0));
        reporter.on_audit(&report);

        assert_eq!(reporter.events().len(), 2);
        assert_eq!(reporter.snapshots().len(), 1);
        assert_eq!(reporter.audit(), Some(report));
    }
}

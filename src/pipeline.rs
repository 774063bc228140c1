//! Run orchestration.
//!
//! One run walks a fixed sequence against a single event store:
//!
//! ```text
//! Init → SummaryComputed → EmptyExit
//!                        → ReportsRunning → ExportsRunning → Done
//! ```
//!
//! Only the summary stage can end a run early. After it, every report and
//! export is attempted on its own: a failure at any stage of one spec is
//! logged, recorded in the [`RunReport`], and the run moves on to the next.
//!
//! # Example
//!
//! ```no_run
//! use notification_analytics::pipeline::Pipeline;
//! use notification_analytics::render::{FileRenderer, OutputLocation};
//! use notification_analytics::store::SqliteEventStore;
//!
//! let store = SqliteEventStore::open("notifications.db");
//! let pipeline = Pipeline::new(store, FileRenderer, OutputLocation::new("analytics_output"));
//! let report = pipeline.run(chrono::Local::now().naive_local());
//! println!("{}", report);
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::render::{ArtifactRenderer, OutputLocation, RenderError};
use crate::report::{catalog, Materialize, ReportSpec, TransformError};
use crate::store::{EventStore, StoreError};
use crate::summary::{self, SummaryStats};

// ============================================================================
// Error Types
// ============================================================================

/// Stage of a spec at which it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Query,
    Transform,
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Query => "query",
            Stage::Transform => "transform",
            Stage::Render => "render",
        })
    }
}

/// Why a single spec produced no artifact.
#[derive(Debug, thiserror::Error)]
pub enum SpecFailure {
    #[error("{0}")]
    Query(#[source] StoreError),

    #[error("query returned no rows")]
    Empty,

    #[error("{0}")]
    Transform(#[source] TransformError),

    #[error("{0}")]
    Render(#[source] RenderError),
}

impl SpecFailure {
    pub fn stage(&self) -> Stage {
        match self {
            SpecFailure::Query(_) | SpecFailure::Empty => Stage::Query,
            SpecFailure::Transform(_) => Stage::Transform,
            SpecFailure::Render(_) => Stage::Render,
        }
    }

    /// Empty results are expected and skipped without being errors.
    pub fn is_error(&self) -> bool {
        !matches!(self, SpecFailure::Empty)
    }
}

pub type SpecResult<T> = Result<T, SpecFailure>;

// ============================================================================
// Run State
// ============================================================================

/// Orchestrator state. The last state reached is reported in [`RunReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Init,
    SummaryComputed,
    EmptyExit,
    ReportsRunning,
    ExportsRunning,
    Done,
    /// The event store could not be reached.
    ConnectionFailed,
    /// The store was reachable but the summary query failed.
    SummaryFailed,
    /// The output directory could not be created.
    OutputUnavailable,
}

impl RunState {
    /// Whether the run should exit with a success status.
    pub fn is_success(self) -> bool {
        matches!(self, RunState::EmptyExit | RunState::Done)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunState::Init => "init",
            RunState::SummaryComputed => "summary computed",
            RunState::EmptyExit => "empty dataset",
            RunState::ReportsRunning => "reports running",
            RunState::ExportsRunning => "exports running",
            RunState::Done => "done",
            RunState::ConnectionFailed => "connection failed",
            RunState::SummaryFailed => "summary failed",
            RunState::OutputUnavailable => "output unavailable",
        })
    }
}

// ============================================================================
// Run Report
// ============================================================================

/// An artifact written during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub spec: &'static str,
    pub path: PathBuf,
}

/// A spec that produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub spec: &'static str,
    pub stage: Stage,
    pub reason: String,
    /// False when the spec was skipped only because its query had no rows.
    pub error: bool,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub state: RunState,
    pub output_dir: PathBuf,
    pub summary: Option<SummaryStats>,
    pub produced: Vec<Artifact>,
    pub skipped: Vec<Skipped>,
    pub attempted: usize,
    /// Cause of a failed terminal state.
    pub failure: Option<String>,
}

impl RunReport {
    fn new(output_dir: &Path) -> Self {
        Self {
            state: RunState::Init,
            output_dir: output_dir.to_path_buf(),
            summary: None,
            produced: Vec::new(),
            skipped: Vec::new(),
            attempted: 0,
            failure: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }

    fn advance(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "pipeline state");
        self.state = next;
    }

    fn fail(mut self, next: RunState, cause: impl fmt::Display) -> Self {
        error!(state = %next, error = %cause, "run aborted");
        self.failure = Some(cause.to_string());
        self.advance(next);
        self
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(summary) = &self.summary {
            writeln!(f, "{}", summary)?;
            writeln!(f)?;
        }

        match self.state {
            RunState::EmptyExit => {
                return write!(f, "No notifications in the event store; nothing to report.");
            }
            RunState::ConnectionFailed | RunState::SummaryFailed | RunState::OutputUnavailable => {
                write!(f, "Run failed ({})", self.state)?;
                if let Some(cause) = &self.failure {
                    write!(f, ": {}", cause)?;
                }
                return Ok(());
            }
            _ => {}
        }

        writeln!(
            f,
            "Artifacts produced: {} of {} attempted",
            self.produced.len(),
            self.attempted
        )?;
        for artifact in &self.produced {
            writeln!(f, "  wrote    {}", artifact.path.display())?;
        }
        for skipped in &self.skipped {
            writeln!(
                f,
                "  skipped  {} ({}): {}",
                skipped.spec, skipped.stage, skipped.reason
            )?;
        }
        write!(f, "Output directory: {}", self.output_dir.display())
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Sequences summary, reports, and exports against one store.
pub struct Pipeline<S, R> {
    store: S,
    renderer: R,
    output: OutputLocation,
}

impl<S: EventStore, R: ArtifactRenderer> Pipeline<S, R> {
    pub fn new(store: S, renderer: R, output: OutputLocation) -> Self {
        Self {
            store,
            renderer,
            output,
        }
    }

    /// Run every stage with `now` as the reference time.
    pub fn run(&self, now: NaiveDateTime) -> RunReport {
        let mut report = RunReport::new(self.output.root());
        info!(
            dialect = ?self.store.dialect(),
            output = %self.output.root().display(),
            "starting analytics run"
        );

        if let Err(e) = self.store.ping() {
            return report.fail(RunState::ConnectionFailed, e);
        }

        let summary = match summary::compute(&self.store, now) {
            Ok(summary) => summary,
            Err(e) if e.is_connection() => return report.fail(RunState::ConnectionFailed, e),
            Err(e) => return report.fail(RunState::SummaryFailed, e),
        };
        info!(
            total = summary.total,
            active_days = summary.active_days,
            "summary computed"
        );
        let empty = summary.is_empty();
        report.summary = Some(summary);
        report.advance(RunState::SummaryComputed);

        if empty {
            info!("event store is empty, no artifacts to produce");
            report.advance(RunState::EmptyExit);
            return report;
        }

        if let Err(e) = self.output.ensure() {
            return report.fail(RunState::OutputUnavailable, e);
        }

        report.advance(RunState::ReportsRunning);
        for spec in catalog::reports() {
            self.attempt(&mut report, spec, now);
        }

        report.advance(RunState::ExportsRunning);
        for spec in catalog::exports() {
            self.attempt(&mut report, spec, now);
        }

        report.advance(RunState::Done);
        info!(
            produced = report.produced.len(),
            attempted = report.attempted,
            "run finished"
        );
        report
    }

    fn attempt(&self, report: &mut RunReport, spec: &'static ReportSpec, now: NaiveDateTime) {
        report.attempted += 1;
        match self.run_spec(spec, now) {
            Ok(path) => {
                info!(spec = spec.name, path = %path.display(), "artifact written");
                report.produced.push(Artifact {
                    spec: spec.name,
                    path,
                });
            }
            Err(failure) => {
                if failure.is_error() {
                    warn!(spec = spec.name, stage = %failure.stage(), error = %failure, "spec skipped");
                } else {
                    info!(spec = spec.name, "no rows, spec skipped");
                }
                self.remove_previous(spec);
                report.skipped.push(Skipped {
                    spec: spec.name,
                    stage: failure.stage(),
                    reason: failure.to_string(),
                    error: failure.is_error(),
                });
            }
        }
    }

    /// Fetch, transform, and render a single spec.
    pub fn run_spec(&self, spec: &ReportSpec, now: NaiveDateTime) -> SpecResult<PathBuf> {
        let query = spec.query(self.store.dialect(), now);
        let rows = self.store.run(&query).map_err(SpecFailure::Query)?;
        if rows.is_empty() {
            return Err(SpecFailure::Empty);
        }
        debug!(spec = spec.name, rows = rows.len(), "query returned rows");

        let path = self.output.path_for(spec.file_name);
        match spec.materialize {
            Materialize::Chart(transform) => {
                let chart = transform(&rows).map_err(SpecFailure::Transform)?;
                self.renderer
                    .write_chart(&chart, &path)
                    .map_err(SpecFailure::Render)?;
                debug!(spec = spec.name, chart = chart.data.kind(), "chart rendered");
            }
            Materialize::Table => {
                self.renderer
                    .write_table(&rows, &path)
                    .map_err(SpecFailure::Render)?;
            }
        }
        Ok(path)
    }

    /// A skipped spec must not leave an artifact from an earlier run behind.
    fn remove_previous(&self, spec: &ReportSpec) {
        let path = self.output.path_for(spec.file_name);
        if !path.is_file() {
            return;
        }
        match fs::remove_file(&path) {
            Ok(()) => debug!(spec = spec.name, path = %path.display(), "removed stale artifact"),
            Err(e) => warn!(spec = spec.name, path = %path.display(), error = %e, "could not remove stale artifact"),
        }
    }
}

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    /// No reachable player offers the operations a sink needs.
    #[error("no media player with {0} found")]
    NoPlayer(String),
    #[error("D-Bus error: {0}")]
    Bus(#[from] zbus::Error),
    #[error("the player does not support {0}")]
    Unsupported(&'static str),
    #[error("{0}")]
    Call(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// A sink call failed partway through; items before `path` were already sent.
    #[error("{operation} failed for {path} after {dispatched} item(s) were sent: {source}")]
    Call {
        operation: &'static str,
        path: String,
        dispatched: usize,
        #[source]
        source: SinkError,
    },
}

/// A stateful playback target: a playlist that can be appended to, and
/// optionally a "play next" queue.
pub trait TrackSink {
    /// Append `address` to the playlist, starting playback of it if `play_now`.
    /// Returns the position the sink reports for the call.
    fn add_item(&mut self, address: &str, play_now: bool) -> Result<i32, SinkError>;

    /// Current playlist length.
    fn current_length(&mut self) -> Result<i32, SinkError>;

    fn supports_queue_next(&self) -> bool {
        false
    }

    /// Put the playlist entry at `position` into the play-next queue.
    fn queue_next(&mut self, _position: i32) -> Result<(), SinkError> {
        Err(SinkError::Unsupported("queueing"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub path: String,
    pub should_play: bool,
}

/// Ordered sink operations for a selection. Only the first step may start
/// playback, and only when playing was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    pub steps: Vec<PlanStep>,
}

impl DispatchPlan {
    pub fn new(paths: &[String], play_requested: bool) -> Self {
        let steps = paths
            .iter()
            .enumerate()
            .map(|(pos, path)| PlanStep {
                path: path.clone(),
                should_play: play_requested && pos == 0,
            })
            .collect();
        DispatchPlan { steps }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub dispatched: usize,
    /// Paths that did not exist locally but were still handed to the sink.
    pub missing: Vec<String>,
}

/// Send `paths` to `sink` in order, playing the first one if `play_requested`.
///
/// Calls are strictly sequential. The first failing call aborts the rest of
/// the plan; anything already added stays in the player.
pub fn dispatch<S: TrackSink + ?Sized>(
    sink: &mut S,
    paths: &[String],
    play_requested: bool,
) -> Result<DispatchReport, DispatchError> {
    let plan = DispatchPlan::new(paths, play_requested);
    let mut report = DispatchReport::default();

    for step in &plan.steps {
        if !Path::new(&step.path).exists() {
            log::error!("File does not exist: {}", step.path);
            report.missing.push(step.path.clone());
        }

        let address = file_uri(&step.path);
        let fail = |operation: &'static str, dispatched: usize| {
            let path = step.path.clone();
            move |source: SinkError| DispatchError::Call {
                operation,
                path,
                dispatched,
                source,
            }
        };

        sink.add_item(&address, step.should_play)
            .map_err(fail("add item", report.dispatched))?;
        log::debug!("added {} (play: {})", address, step.should_play);

        if !step.should_play && sink.supports_queue_next() {
            let length = sink
                .current_length()
                .map_err(fail("read playlist length", report.dispatched))?;
            if length > 0 {
                sink.queue_next(length - 1)
                    .map_err(fail("queue item", report.dispatched))?;
            }
        }
        report.dispatched += 1;
    }
    Ok(report)
}

/// `file://` URI for `path`. Paths the `url` crate rejects (relative ones)
/// are passed through with a bare scheme prefix.
pub fn file_uri(path: &str) -> String {
    match url::Url::from_file_path(path) {
        Ok(uri) => uri.to_string(),
        Err(()) => format!("file://{}", path),
    }
}

//! Result collection: the reading side of the separator protocol.
//!
//! The four sink histories of one context are split on the frame. Segment `0` of each sink belongs to the
//! before-code, segment `1` to the main-invocation slot and segment `k + 2` to testcase `k`. A harness that ran to
//! completion wrote exactly the expected number of frames to every sink; fewer frames mean it crashed or was killed,
//! and every unit past the last frame is reported as missing.
//!
//! ## Notes
//! - The observed frame count is the minimum over the captured sinks: a process killed halfway through writing a
//!   separator leaves some sinks one frame ahead, and that half-written unit never started. Standard streams the
//!   runner did not capture take no part in it.
//! - Standard streams carry submission output and are read lossily; the value and exception sinks are written by the
//!   harness and must be valid UTF-8.
//! - Records of the unit that was running when the history ends may be cut off mid-write. They are decoded
//!   leniently (a malformed record becomes `None`); records of every other unit must be well-formed.

use std::fs;
use std::path::Path;

use framejudge_core::framing::{count_frames, split_frames};
use framejudge_core::payload::{self, Payload, PayloadError};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// One of the four sinks, as the collector names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkName {
    Values,
    Exceptions,
    Stdout,
    Stderr,
}

impl std::fmt::Display for SinkName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SinkName::Values => "value",
            SinkName::Exceptions => "exception",
            SinkName::Stdout => "stdout",
            SinkName::Stderr => "stderr",
        };
        f.write_str(name)
    }
}

/// Error while collecting a context's records.
#[derive(Debug, Error, Diagnostic)]
pub enum CollectError {
    #[error("the {sink} sink has {observed} frames but the harness writes only {expected}")]
    #[diagnostic(
        code(framejudge::collect::extra_frames),
        help("the history was produced with another descriptor, or program output contains the frame")
    )]
    TooManyFrames {
        sink: SinkName,
        expected: usize,
        observed: usize,
    },

    #[error("{sink} record of slot {slot} is invalid: {source}")]
    #[diagnostic(code(framejudge::collect::record))]
    Record {
        sink: SinkName,
        slot: usize,
        #[source]
        source: PayloadError,
    },

    #[error("cannot read {path}: {source}")]
    #[diagnostic(code(framejudge::collect::io))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The raw histories of the four sinks of one context.
///
/// `None` marks a standard stream the runner did not capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkHistories {
    pub values: String,
    pub exceptions: String,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl SinkHistories {
    /// Read sink histories from files; a missing stdout or stderr path means that sink was not captured.
    pub fn read(
        values: &Path,
        exceptions: &Path,
        stdout: Option<&Path>,
        stderr: Option<&Path>,
    ) -> Result<Self, CollectError> {
        let error = |path: &Path| {
            let path = path.display().to_string();
            move |source| CollectError::Read { path, source }
        };
        let read = |path: &Path| fs::read_to_string(path).map_err(error(path));
        let read_lossy = |path: &Path| {
            fs::read(path)
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .map_err(error(path))
        };
        Ok(Self {
            values: read(values)?,
            exceptions: read(exceptions)?,
            stdout: stdout.map(read_lossy).transpose()?,
            stderr: stderr.map(read_lossy).transpose()?,
        })
    }

    /// The sinks that were captured.
    fn captured(&self) -> Vec<(SinkName, &str)> {
        let mut sinks = vec![
            (SinkName::Values, self.values.as_str()),
            (SinkName::Exceptions, self.exceptions.as_str()),
        ];
        if let Some(stdout) = &self.stdout {
            sinks.push((SinkName::Stdout, stdout.as_str()));
        }
        if let Some(stderr) = &self.stderr {
            sinks.push((SinkName::Stderr, stderr.as_str()));
        }
        sinks
    }
}

/// Everything one unit wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitRecord {
    /// Segment index in the sink histories.
    pub slot: usize,
    pub value: Option<Payload>,
    pub exception: Option<Payload>,
    pub stdout: String,
    pub stderr: String,
    /// The history ends inside this unit.
    pub interrupted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CollectStatus {
    Complete,
    /// The harness stopped early (crash or timeout).
    Truncated { expected: usize, observed: usize },
}

/// Records of one context, reconstructed from its sink histories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedContext {
    pub before_stdout: String,
    pub before_stderr: String,
    /// The main-invocation slot; `None` only when the harness died in its before-code.
    pub main: Option<UnitRecord>,
    /// Testcases that started, in order.
    pub testcases: Vec<UnitRecord>,
    pub status: CollectStatus,
    /// Indices of testcases that never started.
    pub missing: Vec<usize>,
}

impl CollectedContext {
    pub fn is_complete(&self) -> bool {
        self.status == CollectStatus::Complete
    }
}

/// Reconstruct the records of one context.
///
/// `expected_separators` is the frame count a complete run writes (`1 + testcases`).
pub fn collect(
    token: &str,
    histories: &SinkHistories,
    expected_separators: usize,
) -> Result<CollectedContext, CollectError> {
    let mut observed = usize::MAX;
    for (sink, history) in histories.captured() {
        let frames = count_frames(history, token);
        if frames > expected_separators {
            return Err(CollectError::TooManyFrames {
                sink,
                expected: expected_separators,
                observed: frames,
            });
        }
        observed = observed.min(frames);
    }

    let status = if observed == expected_separators {
        CollectStatus::Complete
    } else {
        tracing::warn!(expected = expected_separators, observed, "sink histories are truncated");
        CollectStatus::Truncated {
            expected: expected_separators,
            observed,
        }
    };
    let truncated = status != CollectStatus::Complete;

    let values = split_frames(&histories.values, token);
    let exceptions = split_frames(&histories.exceptions, token);
    let stdout = split_frames(histories.stdout.as_deref().unwrap_or_default(), token);
    let stderr = split_frames(histories.stderr.as_deref().unwrap_or_default(), token);
    let segment = |segments: &[&str], slot: usize| segments.get(slot).copied().unwrap_or_default().to_string();

    let mut units = Vec::with_capacity(observed);
    for slot in 1..=observed {
        let interrupted = truncated && slot == observed;
        units.push(UnitRecord {
            slot,
            value: decode_record(SinkName::Values, slot, values.get(slot).copied(), interrupted)?,
            exception: decode_record(SinkName::Exceptions, slot, exceptions.get(slot).copied(), interrupted)?,
            stdout: segment(&stdout, slot),
            stderr: segment(&stderr, slot),
            interrupted,
        });
    }

    let mut units = units.into_iter();
    let main = units.next();
    let testcases: Vec<UnitRecord> = units.collect();
    let expected_testcases = expected_separators.saturating_sub(1);
    let missing = (testcases.len()..expected_testcases).collect();

    Ok(CollectedContext {
        before_stdout: segment(&stdout, 0),
        before_stderr: segment(&stderr, 0),
        main,
        testcases,
        status,
        missing,
    })
}

fn decode_record(
    sink: SinkName,
    slot: usize,
    record: Option<&str>,
    lenient: bool,
) -> Result<Option<Payload>, CollectError> {
    match payload::decode(record.unwrap_or_default()) {
        Ok(payload) => Ok(payload),
        Err(e) if lenient => {
            tracing::debug!(sink = %sink, slot, error = %e, "dropping cut-off record");
            Ok(None)
        }
        Err(source) => Err(CollectError::Record { sink, slot, source }),
    }
}

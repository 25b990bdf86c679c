//! The context harness state machine.
//!
//! ```text
//! Initialized --finish_before--> RanBefore --execute_main--> RanMain
//!                                    |                          |
//!                                    +-----execute_testcase-----+--> RunningTestcases
//!                                                                         |
//!                 RanBefore / RanMain / RunningTestcases --enter_after--> RanAfter --close--> Closed
//! ```
//!
//! The harness owns its [`ChannelSet`]; dropping it on any path (early `?` return, unwinding panic in before-code)
//! closes the sinks.

use std::fmt;

use framejudge_core::Token;

use crate::channels::ChannelSet;
use crate::errors::HarnessError;
use crate::executor::{self, CaughtException, ExceptionStatement, Outcome};
use crate::separator::SeparatorEmitter;

/// Lifecycle state of a [`ContextHarness`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Initialized,
    RanBefore,
    RanMain,
    RunningTestcases,
    RanAfter,
    Closed,
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HarnessState::Initialized => "initialized",
            HarnessState::RanBefore => "past its before-code",
            HarnessState::RanMain => "past its main invocation",
            HarnessState::RunningTestcases => "running testcases",
            HarnessState::RanAfter => "past its after-code",
            HarnessState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Drives one context from construction to close.
#[derive(Debug)]
pub struct ContextHarness {
    channels: ChannelSet,
    separator: SeparatorEmitter,
    state: HarnessState,
    testcases: usize,
}

impl ContextHarness {
    /// Create a harness for `token` over `channels`.
    pub fn new(token: &str, channels: ChannelSet) -> Result<Self, HarnessError> {
        let token = Token::parse(token)?;
        Ok(Self {
            channels,
            separator: SeparatorEmitter::new(&token),
            state: HarnessState::Initialized,
            testcases: 0,
        })
    }

    /// Create a harness writing `<token>_values.txt` and `<token>_exceptions.txt` in the working directory.
    pub fn with_default_files(token: &str) -> Result<Self, HarnessError> {
        let channels = ChannelSet::open_files(
            framejudge_core::framing::value_file_name(token),
            framejudge_core::framing::exception_file_name(token),
        )?;
        Self::new(token, channels)
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    /// Number of separators written so far.
    pub fn separators(&self) -> usize {
        self.separator.emitted()
    }

    /// Mark the before-code as done and open the main-invocation slot with a separator.
    pub fn finish_before(&mut self) -> Result<(), HarnessError> {
        self.expect(&[HarnessState::Initialized], "finish the before-code")?;
        self.separator.emit(&mut self.channels)?;
        self.transition(HarnessState::RanBefore);
        Ok(())
    }

    /// Run the main invocation as a unit.
    pub fn execute_main<F>(
        &mut self,
        main: F,
        exception: ExceptionStatement<'_>,
    ) -> Result<Option<CaughtException>, HarnessError>
    where
        F: FnOnce(),
    {
        self.expect(&[HarnessState::RanBefore], "run the main invocation")?;
        let caught = executor::execute_unit(
            &mut self.channels,
            || {
                main();
                Outcome::Nothing
            },
            exception,
        )?;
        self.transition(HarnessState::RanMain);
        Ok(caught)
    }

    /// Write a separator and run one testcase as a unit.
    pub fn execute_testcase<F>(
        &mut self,
        statement: F,
        exception: ExceptionStatement<'_>,
    ) -> Result<Option<CaughtException>, HarnessError>
    where
        F: FnOnce() -> Outcome,
    {
        self.expect(
            &[HarnessState::RanBefore, HarnessState::RanMain, HarnessState::RunningTestcases],
            "run a testcase",
        )?;
        self.separator.emit(&mut self.channels)?;
        self.state = HarnessState::RunningTestcases;
        self.testcases += 1;
        tracing::debug!(testcase = self.testcases, "running testcase");
        executor::execute_unit(&mut self.channels, statement, exception)
    }

    /// Mark the start of the after-code. Nothing is framed from here on.
    pub fn enter_after(&mut self) -> Result<(), HarnessError> {
        self.expect(
            &[HarnessState::RanBefore, HarnessState::RanMain, HarnessState::RunningTestcases],
            "run the after-code",
        )?;
        self.transition(HarnessState::RanAfter);
        Ok(())
    }

    /// Flush and close every sink.
    pub fn close(mut self) -> Result<(), HarnessError> {
        self.state = HarnessState::Closed;
        self.channels.close()
    }

    fn expect(&self, allowed: &[HarnessState], action: &'static str) -> Result<(), HarnessError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(HarnessError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    fn transition(&mut self, to: HarnessState) {
        tracing::debug!(from = %self.state, to = %to, "harness transition");
        self.state = to;
    }
}

//! Writing the frame into every sink.

use framejudge_core::Token;

use crate::channels::{ChannelSet, Sink};
use crate::errors::HarnessError;

/// Writes `--<token>-- SEP` to the value, exception, stdout and stderr sinks, in that order, flushing each sink
/// before moving on to the next.
#[derive(Debug, Clone)]
pub struct SeparatorEmitter {
    frame: String,
    emitted: usize,
}

impl SeparatorEmitter {
    pub fn new(token: &Token) -> Self {
        Self {
            frame: token.frame(),
            emitted: 0,
        }
    }

    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// How many separators were written so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn emit(&mut self, channels: &mut ChannelSet) -> Result<(), HarnessError> {
        for sink in Sink::ORDER {
            channels.write(sink, self.frame.as_bytes())?;
            channels.flush(sink)?;
        }
        self.emitted += 1;
        Ok(())
    }
}

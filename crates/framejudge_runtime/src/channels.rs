//! The four sinks of one context.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::HarnessError;

/// One of the four sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sink {
    Value,
    Exception,
    Stdout,
    Stderr,
}

impl Sink {
    /// The order in which a separator is written to the sinks.
    pub const ORDER: [Sink; 4] = [Sink::Value, Sink::Exception, Sink::Stdout, Sink::Stderr];

    fn index(self) -> usize {
        match self {
            Sink::Value => 0,
            Sink::Exception => 1,
            Sink::Stdout => 2,
            Sink::Stderr => 3,
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sink::Value => "value",
            Sink::Exception => "exception",
            Sink::Stdout => "stdout",
            Sink::Stderr => "stderr",
        };
        f.write_str(name)
    }
}

/// An in-memory sink whose contents can be read back while a harness still owns a clone of it.
#[derive(Debug, Clone, Default)]
pub struct MemorySink(Arc<Mutex<Vec<u8>>>);

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Four independently flushable sinks, append-only for one context.
pub struct ChannelSet {
    sinks: [Box<dyn Write>; 4],
    closed: bool,
}

impl ChannelSet {
    /// Build a channel set from arbitrary writers.
    pub fn from_writers(
        value: impl Write + 'static,
        exception: impl Write + 'static,
        stdout: impl Write + 'static,
        stderr: impl Write + 'static,
    ) -> Self {
        Self {
            sinks: [Box::new(value), Box::new(exception), Box::new(stdout), Box::new(stderr)],
            closed: false,
        }
    }

    /// Open the durable value and exception files and mirror the process's own standard streams.
    ///
    /// Existing files are truncated.
    pub fn open_files(value_path: impl AsRef<Path>, exception_path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let value = open(Sink::Value, value_path.as_ref())?;
        let exception = open(Sink::Exception, exception_path.as_ref())?;
        Ok(Self::from_writers(value, exception, io::stdout(), io::stderr()))
    }

    /// Build a channel set of four in-memory sinks, returned alongside so their contents can be inspected.
    pub fn in_memory() -> (Self, [MemorySink; 4]) {
        let sinks = [MemorySink::new(), MemorySink::new(), MemorySink::new(), MemorySink::new()];
        let set = Self::from_writers(sinks[0].clone(), sinks[1].clone(), sinks[2].clone(), sinks[3].clone());
        (set, sinks)
    }

    pub fn write(&mut self, sink: Sink, bytes: &[u8]) -> Result<(), HarnessError> {
        self.sinks[sink.index()].write_all(bytes).map_err(HarnessError::io(sink))
    }

    pub fn flush(&mut self, sink: Sink) -> Result<(), HarnessError> {
        self.sinks[sink.index()].flush().map_err(HarnessError::io(sink))
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Flush every sink and release the durable ones.
    ///
    /// Closing twice is a no-op. The first flush failure is returned after all sinks were attempted.
    pub fn close(&mut self) -> Result<(), HarnessError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut first_error = None;
        for sink in Sink::ORDER {
            if let Err(e) = self.flush(sink) {
                first_error.get_or_insert(e);
            }
        }
        // Dropping the boxed writers closes the files.
        self.sinks[Sink::Value.index()] = Box::new(io::sink());
        self.sinks[Sink::Exception.index()] = Box::new(io::sink());
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for ChannelSet {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl fmt::Debug for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSet").field("closed", &self.closed).finish_non_exhaustive()
    }
}

fn open(sink: Sink, path: &Path) -> Result<BufWriter<File>, HarnessError> {
    File::create(path).map(BufWriter::new).map_err(|source| HarnessError::Open {
        sink,
        path: path.display().to_string(),
        source,
    })
}

// src/system/log_sink.rs

use crate::constants;
use std::fs::File;
use std::io::{BufWriter, Result as IoResult, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// An append-only, flushable, closable text sink accumulating the output of
/// executed commands for later upload.
///
/// Exactly one sink exists per automaton run. `close` must be safe to call
/// more than once: the first call releases the backing resource, later calls
/// are no-ops.
pub trait LogSink {
    /// Appends text to the sink.
    fn append(&mut self, text: &str) -> IoResult<()>;

    /// Flushes buffered content through to the backing resource.
    fn flush(&mut self) -> IoResult<()>;

    /// Closes the sink. Idempotent.
    fn close(&mut self) -> IoResult<()>;

    /// The name of the backing resource, used as the local path when the
    /// accumulated log is uploaded.
    fn name(&self) -> &str;
}

// --- FILE-BACKED SINK ---

/// A log sink writing through a buffered file, the normal choice for a real
/// worker run.
#[derive(Debug)]
pub struct FileSink {
    name: String,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Creates (truncating) the backing file at `path`.
    pub fn create(path: &Path) -> IoResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            name: path.to_string_lossy().into_owned(),
            writer: Some(BufWriter::new(file)),
        })
    }
}

impl LogSink for FileSink {
    fn append(&mut self, text: &str) -> IoResult<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(text.as_bytes()),
            None => Err(closed_error(&self.name)),
        }
    }

    fn flush(&mut self) -> IoResult<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Err(closed_error(&self.name)),
        }
    }

    fn close(&mut self) -> IoResult<()> {
        // Taking the writer both flushes on drop and makes a second close a
        // no-op. Flush explicitly first so errors surface here, not in drop.
        match self.writer.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// --- IN-MEMORY SINK ---

/// A log sink accumulating into a shared in-memory buffer, for runs where
/// nothing should touch the filesystem (primarily tests).
///
/// The buffer is behind an `Arc` so callers can keep a handle and inspect the
/// accumulated text after the automaton has consumed (and closed) the sink.
#[derive(Debug, Clone)]
pub struct BufferSink {
    name: String,
    contents: Arc<Mutex<String>>,
    closed: bool,
}

impl BufferSink {
    pub fn new() -> Self {
        Self {
            name: constants::LOG_FILE_NAME.to_string(),
            contents: Arc::new(Mutex::new(String::new())),
            closed: false,
        }
    }

    /// Creates a sink plus a handle for reading the buffer back later.
    pub fn with_handle() -> (Self, Arc<Mutex<String>>) {
        let sink = Self::new();
        let handle = Arc::clone(&sink.contents);
        (sink, handle)
    }
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for BufferSink {
    fn append(&mut self, text: &str) -> IoResult<()> {
        if self.closed {
            return Err(closed_error(&self.name));
        }
        self.contents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> IoResult<()> {
        if self.closed {
            return Err(closed_error(&self.name));
        }
        Ok(())
    }

    fn close(&mut self) -> IoResult<()> {
        self.closed = true;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn closed_error(name: &str) -> std::io::Error {
    std::io::Error::other(format!("log sink '{}' is already closed", name))
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_file_sink_writes_through_on_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(constants::LOG_FILE_NAME);

        let mut sink = FileSink::create(&path).unwrap();
        sink.append("line one\n").unwrap();
        sink.append("line two\n").unwrap();
        sink.flush().unwrap();
        sink.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "line one\nline two\n");
        assert_eq!(sink.name(), path.to_string_lossy());
    }

    #[test]
    fn test_file_sink_second_close_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::create(&dir.path().join("log.txt")).unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
    }

    #[test]
    fn test_file_sink_append_after_close_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::create(&dir.path().join("log.txt")).unwrap();
        sink.close().unwrap();
        assert!(sink.append("too late").is_err());
    }

    #[test]
    fn test_buffer_sink_accumulates_and_reads_back_after_close() {
        let (mut sink, handle) = BufferSink::with_handle();
        sink.append("hello ").unwrap();
        sink.append("world").unwrap();
        sink.flush().unwrap();
        sink.close().unwrap();
        sink.close().unwrap(); // idempotent

        assert_eq!(
            handle.lock().unwrap_or_else(|e| e.into_inner()).as_str(),
            "hello world"
        );
        assert_eq!(sink.name(), constants::LOG_FILE_NAME);
    }
}

// src/core/dispatch.rs

use colored::*;
use std::sync::{Arc, Mutex};

/// Completion callback for an upload. The automaton never supplies one
/// today; the slot exists because the dispatch protocol defines it.
pub type UploadCallback = Box<dyn FnOnce() + Send>;

/// The collaborator surface the automaton reports through.
///
/// One implementation talks to ROB central dispatch over the wire; that lives
/// outside this crate. Here the trait is the seam: a console implementation
/// for stand-alone runs and a recording one for tests.
pub trait Dispatcher {
    /// Sends a file to the central repository of built artifacts.
    /// Fire-and-forget from the automaton's perspective.
    fn send_upload(
        &mut self,
        local_path: &str,
        remote_name: &str,
        public: bool,
        on_complete: Option<UploadCallback>,
    );

    /// Updates the status shown for this worker on central dispatch.
    fn on_status_update(&mut self, message: &str);

    /// Reports that the script ended in failure.
    fn on_error(&mut self, message: &str);

    /// Reports that the script finished normally.
    fn on_finish(&mut self);
}

// --- CONSOLE DISPATCHER (STAND-ALONE MODE) ---

/// Prints every event as a prefixed line, for running scripts from the
/// command line without a central dispatch connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDispatcher;

impl Dispatcher for ConsoleDispatcher {
    fn send_upload(
        &mut self,
        local_path: &str,
        remote_name: &str,
        public: bool,
        _on_complete: Option<UploadCallback>,
    ) {
        println!(
            "{} {} -> {}{}",
            "[UPLOAD]".blue().bold(),
            local_path,
            remote_name,
            if public { " (public)" } else { "" }
        );
    }

    fn on_status_update(&mut self, message: &str) {
        println!("{} {}", "[STATUS]".cyan().bold(), message);
    }

    fn on_error(&mut self, message: &str) {
        eprintln!("{} {}", "[ERROR]".red().bold(), message);
    }

    fn on_finish(&mut self) {
        println!("{}", "Finished.".green());
    }
}

// --- RECORDING DISPATCHER (TESTS) ---

/// One recorded dispatcher call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    Upload {
        local_path: String,
        remote_name: String,
        public: bool,
        has_callback: bool,
    },
    Status(String),
    Error(String),
    Finish,
}

/// Journals every call so tests can assert on exactly what the automaton
/// reported, and in which order.
#[derive(Debug, Default, Clone)]
pub struct RecordingDispatcher {
    events: Arc<Mutex<Vec<DispatchEvent>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in call order.
    pub fn events(&self) -> Vec<DispatchEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, event: DispatchEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl Dispatcher for RecordingDispatcher {
    fn send_upload(
        &mut self,
        local_path: &str,
        remote_name: &str,
        public: bool,
        on_complete: Option<UploadCallback>,
    ) {
        self.record(DispatchEvent::Upload {
            local_path: local_path.to_string(),
            remote_name: remote_name.to_string(),
            public,
            has_callback: on_complete.is_some(),
        });
    }

    fn on_status_update(&mut self, message: &str) {
        self.record(DispatchEvent::Status(message.to_string()));
    }

    fn on_error(&mut self, message: &str) {
        self.record(DispatchEvent::Error(message.to_string()));
    }

    fn on_finish(&mut self) {
        self.record(DispatchEvent::Finish);
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_dispatcher_journals_in_call_order() {
        let mut dispatcher = RecordingDispatcher::new();
        dispatcher.on_status_update("building");
        dispatcher.send_upload("local", "remote", true, None);
        dispatcher.on_finish();

        assert_eq!(
            dispatcher.events(),
            vec![
                DispatchEvent::Status("building".to_string()),
                DispatchEvent::Upload {
                    local_path: "local".to_string(),
                    remote_name: "remote".to_string(),
                    public: true,
                    has_callback: false,
                },
                DispatchEvent::Finish,
            ]
        );
    }

    #[test]
    fn test_recording_dispatcher_clones_share_the_journal() {
        let dispatcher = RecordingDispatcher::new();
        let mut handle = dispatcher.clone();
        handle.on_error("boom");
        assert_eq!(
            dispatcher.events(),
            vec![DispatchEvent::Error("boom".to_string())]
        );
    }
}

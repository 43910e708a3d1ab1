// src/core/automaton.rs

use crate::{
    constants,
    core::{dispatch::Dispatcher, parser},
    models::{RunOutcome, State},
    system::{log_sink::LogSink, shell},
};
use std::path::PathBuf;

/// The finite-state automaton that parses and executes rob-scripts.
///
/// Each call to `step` runs the handler bound to the current state to
/// completion and sets the successor state; `run` steps until the absorbing
/// `Terminal` state. The automaton owns all mutable execution context (the
/// pending arguments, the working directory, the log sink) and is built
/// fresh for every script: instances are never reused.
///
/// By design this is a flat automaton. There is no call stack, no recursion,
/// and no way for a script to jump anywhere but the next line.
pub struct ScriptAutomaton<'a> {
    lines: Box<dyn Iterator<Item = String> + 'a>,
    dispatch: &'a mut dyn Dispatcher,
    sink: Box<dyn LogSink>,
    state: State,
    pending_args: Vec<String>,
    working_dir: Option<PathBuf>,
    worker_name: String,
    outcome: RunOutcome,
}

impl std::fmt::Debug for ScriptAutomaton<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptAutomaton")
            .field("state", &self.state)
            .field("pending_args", &self.pending_args)
            .field("working_dir", &self.working_dir)
            .field("worker_name", &self.worker_name)
            .finish_non_exhaustive()
    }
}

impl<'a> ScriptAutomaton<'a> {
    /// Builds an automaton over an iterator of script lines.
    ///
    /// `worker_name` identifies this worker when naming the log uploaded
    /// after a required-step failure; stand-alone runs pass an empty string.
    pub fn new(
        lines: impl Iterator<Item = String> + 'a,
        dispatch: &'a mut dyn Dispatcher,
        sink: Box<dyn LogSink>,
        worker_name: &str,
    ) -> Self {
        Self {
            lines: Box::new(lines),
            dispatch,
            sink,
            state: State::ReadLine,
            pending_args: Vec::new(),
            working_dir: None,
            worker_name: worker_name.to_string(),
            outcome: RunOutcome::Completed,
        }
    }

    /// Steps the automaton until it reaches `Terminal`.
    ///
    /// Stepping never fails: shell failures, log I/O trouble, and malformed
    /// lines are all absorbed into transitions and reported through the
    /// dispatcher. The returned outcome says whether the run ended through
    /// the error path.
    pub fn run(&mut self) -> RunOutcome {
        while self.state != State::Terminal {
            self.step();
        }
        self.outcome
    }

    /// Runs the handler for the current state exactly once.
    fn step(&mut self) {
        match self.state {
            State::ReadLine => self.read_line(),
            State::ChangeDir => self.change_dir(),
            State::ExecShell => self.exec_shell(true),
            State::TryExecShell => self.exec_shell(false),
            State::Upload => self.upload(),
            State::ChangeStatus => self.change_status(),
            State::SendLog => self.send_log(false),
            State::SendLogTerminal => self.send_log(true),
            State::Finish => self.finish(false),
            State::FinishError => self.finish(true),
            State::Terminal => {}
        }
    }

    // --- STATE HANDLERS ---

    /// Reads the next script line and dispatches on its command symbol.
    /// End of input is the normal route into `Finish`; a line that parses to
    /// no command leaves the state untouched so the next step reads on.
    fn read_line(&mut self) {
        let line = match self.lines.next() {
            Some(line) => line,
            None => {
                self.state = State::Finish;
                return;
            }
        };

        if let Some(command) = parser::parse_line(&line) {
            self.state = command.symbol.dispatch_state();
            self.pending_args = command.args;
        }
    }

    /// Sets the directory subsequent shell commands run in. The directory is
    /// not checked for existence here; a bad path surfaces as a failed shell
    /// step, with the usual required/optional semantics.
    fn change_dir(&mut self) {
        self.working_dir = Some(PathBuf::from(self.arg(0)));
        self.state = State::ReadLine;
    }

    /// Runs one shell command and appends its output to the log.
    ///
    /// On failure the log gets an error-tagged entry and the pending
    /// arguments are replaced with the worker-specific remote log name, ready
    /// for the log-upload handler. A `required` step then takes the
    /// error-reporting path; an optional one reads the next line as if
    /// nothing happened.
    fn exec_shell(&mut self, required: bool) {
        let command = self.arg(0).to_string();

        match shell::execute_capture(&command, self.working_dir.as_deref()) {
            Ok(output) => {
                self.append_to_log(&output);
                self.state = State::ReadLine;
            }
            Err(err) => {
                let mut entry = format!("[ERROR] {}", err);
                let diagnostic = err.captured_output();
                if !diagnostic.is_empty() {
                    entry.push('\n');
                    entry.push_str(diagnostic);
                }
                self.append_to_log(&entry);

                self.pending_args = vec![format!(
                    "{}{}",
                    self.worker_name,
                    constants::WORKER_LOG_EXTENSION
                )];
                self.state = if required {
                    State::SendLogTerminal
                } else {
                    log::warn!("Optional step '{}' failed; continuing.", command);
                    State::ReadLine
                };
            }
        }
    }

    /// Hands a built artifact to the upload collaborator. Public, no
    /// completion callback.
    fn upload(&mut self) {
        let local_path = self.arg(0).to_string();
        let remote_name = self.arg(1).to_string();
        self.dispatch.send_upload(&local_path, &remote_name, true, None);
        self.state = State::ReadLine;
    }

    /// Reports a status message to central dispatch.
    fn change_status(&mut self) {
        let message = self.arg(0).to_string();
        self.dispatch.on_status_update(&message);
        self.state = State::ReadLine;
    }

    /// Flushes and uploads the accumulated build log.
    ///
    /// One handler serves both the mid-script `%` command and the
    /// error-reporting path; `error_path` picks the successor state. This is
    /// the one place where how a state was entered, not just which handler
    /// runs, decides where the automaton goes next.
    fn send_log(&mut self, error_path: bool) {
        self.dispatch.on_status_update(constants::SENDING_LOG_NOTICE);

        let remote_name = self.arg(0).to_string();
        if let Err(err) = self.sink.flush() {
            log::warn!("Could not flush build log '{}': {}", self.sink.name(), err);
        }
        let local_path = self.sink.name().to_string();
        self.dispatch.send_upload(&local_path, &remote_name, true, None);

        self.state = if error_path {
            State::FinishError
        } else {
            State::ReadLine
        };
    }

    /// Reports the end of the run and closes the log sink. Both termination
    /// paths converge here; `failed` picks which collaborator hears about it.
    fn finish(&mut self, failed: bool) {
        if failed {
            self.dispatch.on_error(constants::RUN_FAILED_MESSAGE);
            self.outcome = RunOutcome::Failed;
        } else {
            self.dispatch.on_finish();
        }

        if let Err(err) = self.sink.close() {
            log::warn!("Could not close build log '{}': {}", self.sink.name(), err);
        }
        self.state = State::Terminal;
    }

    // --- HELPERS ---

    /// The pending argument at `index`. The parser guarantees arity for every
    /// parser-fed state, so a miss here means an internal transition bug;
    /// degrade to an empty string rather than crash mid-run.
    fn arg(&self, index: usize) -> &str {
        self.pending_args
            .get(index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn append_to_log(&mut self, text: &str) {
        if let Err(err) = self.sink.append(text) {
            log::warn!("Could not write to build log '{}': {}", self.sink.name(), err);
        }
    }
}

/// Runs a complete rob-script from a single string, stepping the automaton
/// to termination. Convenience wrapper for callers holding the rendered
/// script text.
pub fn run_script(
    script: &str,
    dispatch: &mut dyn Dispatcher,
    sink: Box<dyn LogSink>,
    worker_name: &str,
) -> RunOutcome {
    let lines: Vec<String> = script.lines().map(str::to_string).collect();
    let mut automaton = ScriptAutomaton::new(lines.into_iter(), dispatch, sink, worker_name);
    automaton.run()
}

// MARK: --- UNIT TESTS ---

// src/models.rs

// --- SCRIPT LANGUAGE MODELS ---
// The shapes shared between the line parser and the execution automaton.

/// The fixed set of single-character command symbols a rob-script line can
/// start with. Anything else is not a command and the line is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// `"` — report a status message to the dispatcher.
    ChangeStatus,
    /// `/` — change the working directory for subsequent shell commands.
    ChangeDir,
    /// `>` — run a shell command; failure aborts the script via the error path.
    ExecShell,
    /// `?` — run a shell command; failure is logged and execution continues.
    TryExecShell,
    /// `^` — upload a build artifact to the central repository.
    Upload,
    /// `%` — upload the accumulated build log.
    SendLog,
}

impl Symbol {
    /// Maps a raw symbol token to its `Symbol`, or `None` for an
    /// unrecognized directive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "\"" => Some(Self::ChangeStatus),
            "/" => Some(Self::ChangeDir),
            ">" => Some(Self::ExecShell),
            "?" => Some(Self::TryExecShell),
            "^" => Some(Self::Upload),
            "%" => Some(Self::SendLog),
            _ => None,
        }
    }

    /// The number of arguments the symbol's handler reads. Lines may carry
    /// more fields than this; they ride along unused.
    pub fn min_arity(self) -> usize {
        match self {
            Self::Upload => 2,
            _ => 1,
        }
    }

    /// The automaton state this symbol dispatches to.
    pub fn dispatch_state(self) -> State {
        match self {
            Self::ChangeStatus => State::ChangeStatus,
            Self::ChangeDir => State::ChangeDir,
            Self::ExecShell => State::ExecShell,
            Self::TryExecShell => State::TryExecShell,
            Self::Upload => State::Upload,
            Self::SendLog => State::SendLog,
        }
    }
}

/// A parsed script line: a command symbol plus its positional arguments in
/// original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub symbol: Symbol,
    pub args: Vec<String>,
}

// --- AUTOMATON MODELS ---

/// Every state of the execution automaton. Transitions are total: each state
/// has exactly one handler, and only `Terminal` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Parse the next script line and dispatch on its symbol.
    ReadLine,
    /// Set the working directory for subsequent shell commands.
    ChangeDir,
    /// Run a required shell command.
    ExecShell,
    /// Run an optional shell command.
    TryExecShell,
    /// Upload a build artifact.
    Upload,
    /// Report a status message.
    ChangeStatus,
    /// Upload the build log mid-script.
    SendLog,
    /// Upload the build log while ending the script in failure.
    SendLogTerminal,
    /// Normal termination: report finish, close the log.
    Finish,
    /// Error termination: report the failure, close the log.
    FinishError,
    /// Absorbing; the stepping loop stops here.
    Terminal,
}

/// How a completed run ended. Stepping itself never returns errors; every
/// failure is absorbed into a transition, so this is the only signal the
/// caller gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The script ran to its end (or an explicit finish) without a required
    /// step failing.
    Completed,
    /// A required shell step failed; the log was uploaded and the error
    /// collaborator was notified.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table_is_complete() {
        assert_eq!(Symbol::from_token("\""), Some(Symbol::ChangeStatus));
        assert_eq!(Symbol::from_token("/"), Some(Symbol::ChangeDir));
        assert_eq!(Symbol::from_token(">"), Some(Symbol::ExecShell));
        assert_eq!(Symbol::from_token("?"), Some(Symbol::TryExecShell));
        assert_eq!(Symbol::from_token("^"), Some(Symbol::Upload));
        assert_eq!(Symbol::from_token("%"), Some(Symbol::SendLog));
        assert_eq!(Symbol::from_token("#"), None);
        assert_eq!(Symbol::from_token(""), None);
    }

    #[test]
    fn test_upload_takes_two_arguments() {
        assert_eq!(Symbol::Upload.min_arity(), 2);
        assert_eq!(Symbol::ExecShell.min_arity(), 1);
    }
}

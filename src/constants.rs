// src/constants.rs

/// The name of the local scratch file accumulating executed-command output.
pub const LOG_FILE_NAME: &str = "robscript_build_log.txt";

/// Extension appended to the worker name when deriving the remote log name
/// after a required step fails.
pub const WORKER_LOG_EXTENSION: &str = ".txt";

/// Status notice reported to the dispatcher right before a log upload.
pub const SENDING_LOG_NOTICE: &str = "Sending log...";

/// Message handed to the error collaborator when a script ends in failure.
pub const RUN_FAILED_MESSAGE: &str = "Something went wrong. :( Please see log.";

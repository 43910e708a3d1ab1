// src/core/parser.rs

use crate::models::{Command, Symbol};

/// Parses one raw script line into a `Command`.
///
/// A line is tab-separated: the first field is the command symbol, the rest
/// are positional arguments in original order. Returns `None` when the line
/// carries no runnable command, either because the symbol is not in the
/// command table or because the line has fewer fields than the symbol's
/// handler reads. Both cases are skipped by the automaton, not failed.
pub fn parse_line(line: &str) -> Option<Command> {
    let mut fields = line.split('\t');
    let token = fields.next().unwrap_or_default();

    let symbol = match Symbol::from_token(token) {
        Some(symbol) => symbol,
        None => {
            log::debug!("Skipping line with unrecognized symbol: '{}'", token);
            return None;
        }
    };

    let args: Vec<String> = fields.map(str::to_string).collect();
    if args.len() < symbol.min_arity() {
        log::warn!(
            "Skipping '{}' line: expected {} argument(s), found {}.",
            token,
            symbol.min_arity(),
            args.len()
        );
        return None;
    }

    Some(Command { symbol, args })
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_line() {
        let command = parse_line("\"\tTest status.").unwrap();
        assert_eq!(command.symbol, Symbol::ChangeStatus);
        assert_eq!(command.args, vec!["Test status.".to_string()]);
    }

    #[test]
    fn test_parse_upload_line_keeps_argument_order() {
        let command = parse_line("^\t/tmp/build.tgz\treleases/build.tgz").unwrap();
        assert_eq!(command.symbol, Symbol::Upload);
        assert_eq!(
            command.args,
            vec!["/tmp/build.tgz".to_string(), "releases/build.tgz".to_string()]
        );
    }

    #[test]
    fn test_unrecognized_symbol_is_no_command() {
        assert!(parse_line("#\tthis is a comment").is_none());
        assert!(parse_line("status without a symbol").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn test_known_symbol_with_too_few_fields_is_skipped() {
        // A lone `>` has no command string to run; treated as no command.
        assert!(parse_line(">").is_none());
        assert!(parse_line("^\tonly_local_path").is_none());
    }

    #[test]
    fn test_extra_fields_ride_along() {
        let command = parse_line(">\techo hi\tignored").unwrap();
        assert_eq!(command.symbol, Symbol::ExecShell);
        assert_eq!(command.args, vec!["echo hi".to_string(), "ignored".to_string()]);
    }
}

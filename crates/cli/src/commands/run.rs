use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use rigshop_core::config::{AppConfig, DispatcherConfig};
use rigshop_core::{Catalog, InMemoryAuditSink};
use tracing::{debug, info};

use crate::commands::CommandResult;
use crate::dispatch::{execute, parse_line, Request};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub executed: usize,
    pub rejected: usize,
    pub halted: bool,
}

/// Reads commands until the terminator or end of input, writing one result
/// line per command.
pub fn run_session<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    catalog: &mut Catalog,
    dispatcher: &DispatcherConfig,
) -> io::Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    for (line_number, line) in input.lines().enumerate() {
        let line = line?;
        let outcome = match parse_line(&line, &dispatcher.terminator) {
            Ok(None) => continue,
            Ok(Some(Request::Terminate)) => {
                debug!(event_name = "session.terminated", line = line_number + 1, "terminator read");
                break;
            }
            Ok(Some(request)) => match execute(catalog, &request) {
                Some(result) => result.map_err(|error| error.to_string()),
                None => break,
            },
            Err(error) => Err(error.to_string()),
        };

        match outcome {
            Ok(message) => {
                summary.executed += 1;
                writeln!(output, "{message}")?;
            }
            Err(message) => {
                summary.rejected += 1;
                writeln!(output, "{message}")?;
                if dispatcher.halt_on_error {
                    summary.halted = true;
                    break;
                }
            }
        }
    }

    Ok(summary)
}

pub fn run(config: &AppConfig, input: Option<&Path>, audit: bool) -> CommandResult {
    let sink = InMemoryAuditSink::default();
    let mut catalog =
        if audit { Catalog::new().with_audit_sink(sink.clone()) } else { Catalog::new() };

    let mut buffer = Vec::new();
    let session = match input {
        Some(path) => match File::open(path) {
            Ok(file) => {
                run_session(BufReader::new(file), &mut buffer, &mut catalog, &config.dispatcher)
            }
            Err(error) => {
                return CommandResult::failure(
                    "run",
                    "input_read",
                    format!("could not open `{}`: {error}", path.display()),
                    3,
                );
            }
        },
        None => run_session(io::stdin().lock(), &mut buffer, &mut catalog, &config.dispatcher),
    };

    let summary = match session {
        Ok(summary) => summary,
        Err(error) => {
            return CommandResult::failure(
                "run",
                "input_read",
                format!("session input failed: {error}"),
                3,
            );
        }
    };

    info!(
        event_name = "session.completed",
        executed = summary.executed,
        rejected = summary.rejected,
        halted = summary.halted,
        remaining_computers = catalog.computers().count(),
        "command session completed"
    );

    let mut output = String::from_utf8_lossy(&buffer).trim_end().to_string();
    if audit {
        for event in sink.events() {
            let line = serde_json::to_string(&event)
                .unwrap_or_else(|error| format!("{{\"error\":\"audit serialization: {error}\"}}"));
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&line);
        }
    }

    CommandResult { exit_code: if summary.halted { 4 } else { 0 }, output }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rigshop_core::config::DispatcherConfig;
    use rigshop_core::Catalog;

    use super::{run_session, SessionSummary};

    fn dispatcher(halt_on_error: bool) -> DispatcherConfig {
        DispatcherConfig { terminator: "Close".to_string(), halt_on_error }
    }

    fn session(script: &str, halt_on_error: bool) -> (String, SessionSummary) {
        let mut catalog = Catalog::new();
        let mut output = Vec::new();
        let summary = run_session(
            Cursor::new(script.to_string()),
            &mut output,
            &mut catalog,
            &dispatcher(halt_on_error),
        )
        .expect("in-memory io cannot fail");
        (String::from_utf8(output).expect("utf8 output"), summary)
    }

    #[test]
    fn prints_results_and_errors_in_order() {
        let (output, summary) = session(
            "AddComputer Laptop 1 Dell XPS 1000\nAddComputer Laptop 1 Dell XPS 1000\n\nBuyBest 50\n",
            false,
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Computer with id 1 added successfully.",
                "Computer with this id already exists.",
                "Can't buy a computer with a budget of $50.00.",
            ]
        );
        assert_eq!(summary, SessionSummary { executed: 1, rejected: 2, halted: false });
    }

    #[test]
    fn stops_at_terminator() {
        let (output, summary) =
            session("AddComputer Laptop 1 Dell XPS 1000\nClose\nGetComputerData 1\n", false);

        assert_eq!(output.lines().count(), 1);
        assert_eq!(summary.executed, 1);
    }

    #[test]
    fn halts_on_first_error_when_configured() {
        let (output, summary) = session("BuyComputer 9\nAddComputer Laptop 1 Dell XPS 1000\n", true);

        assert_eq!(output.trim_end(), "Computer with this id does not exist.");
        assert!(summary.halted);
        assert_eq!(summary.executed, 0);
    }
}

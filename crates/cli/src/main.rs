use std::process::ExitCode;

fn main() -> ExitCode {
    rigshop_cli::run()
}

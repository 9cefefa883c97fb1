use std::process::ExitCode;

fn main() -> ExitCode {
    ridewise_cli::run()
}

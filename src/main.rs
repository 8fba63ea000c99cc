use std::process::ExitCode;

fn main() -> ExitCode {
    ses_diff::main()
}

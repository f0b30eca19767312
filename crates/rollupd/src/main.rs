use std::process::ExitCode;

fn main() -> ExitCode {
    match rollupd::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if rollupd::telemetry::is_initialised() {
                tracing::error!(
                    target: concat!(env!("CARGO_PKG_NAME"), "::process"),
                    error = %error,
                    "rollupd terminated"
                );
            } else {
                eprintln!("rollupd: {error}");
            }
            ExitCode::FAILURE
        }
    }
}

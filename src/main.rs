// structsem: golden-output conformance runner for aggregate value semantics

use std::io;
use std::process::ExitCode;

use structsem::errors::MemoryError;
use structsem::suite::{run_all, Machine};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries only golden output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut machine = match Machine::new(stdout.lock()) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("setup error: {}", e);
            return ExitCode::from(1);
        }
    };

    match run_all(&mut machine) {
        Ok(()) => ExitCode::SUCCESS,
        Err(MemoryError::PointerArithmeticMismatch { .. }) => {
            // The scenario already wrote the diagnostic line to stdout
            ExitCode::from(255)
        }
        Err(e) => {
            eprintln!("runtime error: {}", e);
            ExitCode::from(1)
        }
    }
}

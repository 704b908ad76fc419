#![deny(unsafe_code)]

use mimalloc::MiMalloc;

/// High-performance memory allocator for the per-block buffers.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::ffi::OsString;
use std::io::{self, Write};
use std::{env, process::ExitCode};

/// Forwards arguments and I/O handles to the CLI crate and maps its status.
fn run_with<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let status = cli::run(args, stdout, stderr);
    let _ = stdout.flush();
    let _ = stderr.flush();
    cli::exit_code_from(status)
}

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();
    // Workers log to stderr through tracing; the handle must not stay locked.
    let mut stderr = io::stderr();
    run_with(env::args_os(), &mut stdout, &mut stderr)
}

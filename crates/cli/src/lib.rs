#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the command-line front-end of `file-signature`: it parses
//! `<INPUT> <OUTPUT> [BLOCK_SIZE]` together with a handful of options, checks
//! up front that one block can be allocated, and runs a
//! [`FileHasher`](signature::FileHasher).
//!
//! # Design
//!
//! [`run`] takes the argument iterator and handles for standard output and
//! error, returning the process exit code, so the binary's `main` stays a
//! one-liner and the whole surface is testable in-process. A `clap` builder
//! recognises the options; operand validation is done by hand so the block
//! size messages stay exact.
//!
//! # Invariants
//!
//! - `run` never panics; I/O failures on the output handles surface as exit
//!   code `1`.
//! - Every failure exits with `1`. Success prints `Hash has been counted.` and
//!   exits with `0`.
//! - Diagnostics go to standard error and never mix with the success line.
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(["file-signature", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("file-signature "));
//! assert!(stderr.is_empty());
//! ```

mod arguments;

use std::ffi::OsString;
use std::io::Write;

use logging::{RUN_TARGET, VerbosityConfig};
use signature::{FileHasher, HasherConfig, probe_allocation};

use arguments::{ALLOCATION_MESSAGE, Operands, ParsedArgs, parse_args, parse_operands};

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Printed on standard output after a successful run.
pub const SUCCESS_MESSAGE: &str = "Hash has been counted.";

/// Deterministic help text describing the supported options.
const HELP_TEXT: &str = concat!(
    "Usage: file-signature [OPTIONS] <INPUT> <OUTPUT> [BLOCK_SIZE]\n",
    "\n",
    "Splits INPUT into BLOCK_SIZE-byte blocks (default 1048576), computes the\n",
    "CRC-32 of every block in parallel and writes one lowercase hexadecimal\n",
    "checksum per line, in block order, to OUTPUT.\n",
    "\n",
    "Options:\n",
    "  -h, --help         Show this help message and exit.\n",
    "  -V, --version      Output version information and exit.\n",
    "  -v, --verbose      Increase diagnostic output; repeat for more detail.\n",
    "  -j, --threads N    Number of worker threads (defaults to the CPU count).\n",
    "      --sequential   Hash blocks on the main thread only.\n",
    "\n",
    "Diagnostics are written to standard error. RUST_LOG overrides --verbose.\n",
);

/// Renders the help text describing the supported options.
fn render_help() -> String {
    HELP_TEXT.to_owned()
}

/// Renders the version banner.
fn render_version() -> String {
    format!("{} {}\n", arguments::PROGRAM_NAME, env!("CARGO_PKG_VERSION"))
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// Returns the process exit code the caller should use.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => {
            let _ = write!(stderr, "{}", error.render());
            1
        }
    }
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    let ParsedArgs {
        show_help,
        show_version,
        verbose,
        threads,
        sequential,
        operands,
    } = parsed;

    if show_help {
        return i32::from(stdout.write_all(render_help().as_bytes()).is_err());
    }

    if show_version {
        return i32::from(stdout.write_all(render_version().as_bytes()).is_err());
    }

    // A subscriber may already be installed when embedded; keep it.
    let _ = logging::init_tracing(VerbosityConfig::from_verbose_level(verbose));

    let Operands {
        input,
        output,
        block_size,
        ignored,
    } = match parse_operands(operands) {
        Ok(operands) => operands,
        Err(error) => {
            let message = error.message();
            let _ = write!(stderr, "{message}");
            if !message.ends_with('\n') {
                let _ = writeln!(stderr);
            }
            return 1;
        }
    };
    if ignored > 0 {
        tracing::warn!(target: RUN_TARGET, ignored, "ignoring extra operands");
    }

    let mut config = HasherConfig::new();
    if let Some(block_size) = block_size {
        config = config.with_block_size(block_size);
    }
    if let Some(threads) = threads {
        config = config.with_workers(threads);
    }

    if probe_allocation(config.block_size.get()).is_err() {
        let _ = writeln!(stderr, "{ALLOCATION_MESSAGE}");
        return 1;
    }

    let mut hasher = FileHasher::new(input, output, config).sequential(sequential);
    match hasher.run() {
        Ok(summary) => {
            tracing::info!(
                target: RUN_TARGET,
                input = %hasher.input().display(),
                output = %hasher.output().display(),
                blocks = summary.blocks,
                bytes = summary.bytes,
                workers = summary.workers,
                "signature written"
            );
            i32::from(writeln!(stdout, "{SUCCESS_MESSAGE}").is_err())
        }
        Err(_) => {
            let _ = writeln!(stderr, "{}", hasher.last_error());
            1
        }
    }
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::fs;
    use test_support::{InputFixture, expected_signature};

    fn run_with_args<I, S>(args: I) -> (i32, Vec<u8>, Vec<u8>)
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run(args, &mut stdout, &mut stderr);
        (code, stdout, stderr)
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("utf-8 output")
    }

    #[test]
    fn help_flag_renders_static_help_snapshot() {
        let (code, stdout, stderr) =
            run_with_args([OsStr::new("file-signature"), OsStr::new("--help")]);

        assert_eq!(code, 0);
        assert!(stderr.is_empty());
        assert_eq!(stdout, render_help().into_bytes());
    }

    #[test]
    fn short_version_flag_renders_banner() {
        let (code, stdout, stderr) = run_with_args(["file-signature", "-V"]);

        assert_eq!(code, 0);
        assert!(stderr.is_empty());
        assert_eq!(text(stdout), render_version());
    }

    #[test]
    fn no_operands_prints_usage() {
        let (code, stdout, stderr) = run_with_args(["file-signature"]);

        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert!(text(stderr).starts_with("Parameters should be:"));
    }

    #[test]
    fn single_operand_prints_usage() {
        let (code, _, stderr) = run_with_args(["file-signature", "only-input"]);
        assert_eq!(code, 1);
        assert_eq!(text(stderr), arguments::USAGE_TEXT);
    }

    #[test]
    fn non_integer_block_size_is_rejected() {
        let (code, stdout, stderr) = run_with_args(["file-signature", "in", "out", "12kb"]);

        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert_eq!(text(stderr), "Parameter <block size> should be integer\n");
    }

    #[test]
    fn zero_block_size_is_rejected() {
        let (code, _, stderr) = run_with_args(["file-signature", "in", "out", "0"]);
        assert_eq!(code, 1);
        assert!(text(stderr).contains("greater than zero"));
    }

    #[test]
    fn unknown_option_fails_with_code_one() {
        let (code, stdout, stderr) = run_with_args(["file-signature", "--frobnicate", "a", "b"]);
        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert!(!stderr.is_empty());
    }

    #[test]
    fn missing_input_reports_hasher_error() {
        let fixture = InputFixture::patterned(8).expect("fixture");
        let missing = fixture.path("absent.bin");
        let output = fixture.path("out.sig");

        let (code, stdout, stderr) = run_with_args([
            OsString::from("file-signature"),
            missing.into_os_string(),
            output.into_os_string(),
        ]);

        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert!(text(stderr).starts_with("Cannot open input file"));
    }

    #[test]
    fn successful_run_writes_signature() {
        let fixture = InputFixture::patterned(10_000).expect("fixture");
        let output = fixture.path("out.sig");

        let (code, stdout, stderr) = run_with_args([
            OsString::from("file-signature"),
            OsString::from("-j"),
            OsString::from("3"),
            fixture.input().as_os_str().to_owned(),
            output.clone().into_os_string(),
            OsString::from("1024"),
        ]);

        assert_eq!(code, 0, "{}", text(stderr));
        assert_eq!(text(stdout), format!("{SUCCESS_MESSAGE}\n"));
        assert_eq!(
            fs::read_to_string(&output).expect("read output"),
            expected_signature(fixture.data(), 1024)
        );
    }

    #[test]
    fn sequential_flag_produces_same_output() {
        let fixture = InputFixture::patterned(5_000).expect("fixture");
        let output = fixture.path("seq.sig");

        let (code, _, _) = run_with_args([
            OsString::from("file-signature"),
            OsString::from("--sequential"),
            fixture.input().as_os_str().to_owned(),
            output.clone().into_os_string(),
            OsString::from("700"),
        ]);

        assert_eq!(code, 0);
        assert_eq!(
            fs::read_to_string(&output).expect("read output"),
            fixture.expected_signature(700)
        );
    }

    #[test]
    fn exit_code_from_clamps() {
        let render = |status| format!("{:?}", exit_code_from(status));
        assert_eq!(render(0), format!("{:?}", std::process::ExitCode::SUCCESS));
        assert_eq!(render(1), format!("{:?}", std::process::ExitCode::from(1)));
        assert_eq!(render(-5), render(0));
        assert_eq!(render(1000), format!("{:?}", std::process::ExitCode::from(255)));
    }
}

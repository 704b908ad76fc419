//! crates/cli/src/arguments.rs
//! Command definition and operand validation.

use std::ffi::{OsStr, OsString};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser, value_parser};

/// Program name used when the argument list is empty.
pub(crate) const PROGRAM_NAME: &str = "file-signature";

/// Printed when fewer than two operands are given.
pub(crate) const USAGE_TEXT: &str = concat!(
    "Parameters should be: file-signature <input file> <output file> [block size]\n",
    "Try 'file-signature --help' for more information.\n",
);

/// Printed when the block size operand is not a decimal literal.
pub(crate) const NOT_INTEGER_MESSAGE: &str = "Parameter <block size> should be integer";

/// Printed when the block size operand is zero.
pub(crate) const ZERO_BLOCK_MESSAGE: &str = "Parameter <block size> should be greater than zero";

/// Printed when the block size cannot be allocated.
pub(crate) const ALLOCATION_MESSAGE: &str =
    "Cannot allocate memory. Maybe the block size is too big.";

/// Result of parsing the raw argument list.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub(crate) show_help: bool,
    pub(crate) show_version: bool,
    pub(crate) verbose: u8,
    pub(crate) threads: Option<NonZeroUsize>,
    pub(crate) sequential: bool,
    pub(crate) operands: Vec<OsString>,
}

/// Operands after validation.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct Operands {
    pub(crate) input: PathBuf,
    pub(crate) output: PathBuf,
    pub(crate) block_size: Option<NonZeroUsize>,
    pub(crate) ignored: usize,
}

/// Why the operand list was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OperandError {
    /// Fewer than two operands.
    Missing,
    /// Block size contains something other than ASCII digits.
    NotInteger,
    /// Block size is zero.
    Zero,
    /// Block size does not fit the address space.
    TooLarge,
}

impl OperandError {
    pub(crate) const fn message(self) -> &'static str {
        match self {
            Self::Missing => USAGE_TEXT,
            Self::NotInteger => NOT_INTEGER_MESSAGE,
            Self::Zero => ZERO_BLOCK_MESSAGE,
            Self::TooLarge => ALLOCATION_MESSAGE,
        }
    }
}

/// Builds the `clap` command. Help and version are rendered by the caller.
pub(crate) fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output; repeat for more detail.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('j')
                .value_name("N")
                .help("Number of worker threads (defaults to the CPU count).")
                .num_args(1)
                .action(ArgAction::Set)
                .value_parser(value_parser!(NonZeroUsize)),
        )
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .help("Hash blocks on the main thread only.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("args")
                .action(ArgAction::Append)
                .num_args(1..)
                .allow_negative_numbers(true)
                .value_parser(OsStringValueParser::new()),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        verbose: matches.get_count("verbose"),
        threads: matches.remove_one::<NonZeroUsize>("threads"),
        sequential: matches.get_flag("sequential"),
        operands: matches
            .remove_many::<OsString>("args")
            .map(|values| values.collect())
            .unwrap_or_default(),
    })
}

/// Splits the operand list into paths and the optional block size.
pub(crate) fn parse_operands(operands: Vec<OsString>) -> Result<Operands, OperandError> {
    let mut operands = operands.into_iter();
    let (Some(input), Some(output)) = (operands.next(), operands.next()) else {
        return Err(OperandError::Missing);
    };
    let block_size = operands
        .next()
        .map(|raw| parse_block_size(&raw))
        .transpose()?;

    Ok(Operands {
        input: PathBuf::from(input),
        output: PathBuf::from(output),
        block_size,
        ignored: operands.count(),
    })
}

/// Parses a block size made only of ASCII digits.
pub(crate) fn parse_block_size(raw: &OsStr) -> Result<NonZeroUsize, OperandError> {
    let text = raw.to_str().ok_or(OperandError::NotInteger)?;
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(OperandError::NotInteger);
    }
    let value: usize = text.parse().map_err(|_| OperandError::TooLarge)?;
    NonZeroUsize::new(value).ok_or(OperandError::Zero)
}

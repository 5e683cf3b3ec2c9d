// Command line front end for bitspeak.
//
// Explicit subcommands with long-form options. `encode` turns bytes into
// pronounceable text, `decode` reverses it, `config` reports defaults and
// build features.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use log::LevelFilter;

use crate::charset::{self, CharSet, CharSetError};
use crate::codec::Format;
use crate::config::{
    self, Config, ConfigError, DEFAULT_MAX_LINE_SIZE, DEFAULT_MAX_WORD_SIZE, SkipChars,
};
use crate::engine::Bitspeak;

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Value parsers
// ---------------------------------------------------------------------------

fn parse_delimiter(s: &str) -> Result<String, CharSetError> {
    charset::unescape(s)
}

fn parse_char_set(s: &str) -> Result<CharSet, CharSetError> {
    CharSet::parse(s)
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Reversible binary-to-text encoder producing pronounceable words.
#[derive(Parser, Debug)]
#[command(
    name = "bitspeak",
    version,
    about = "Encode binary data as pronounceable text",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode bytes as bitspeak text.
    Encode(EncodeArgs),
    /// Decode bitspeak text back into bytes.
    Decode(DecodeArgs),
    /// Print defaults and build configuration.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Six bits per syllable (consonant + vowel).
    #[value(alias = "bs-6")]
    Bs6,
    /// Eight bits per syllable (consonant group + vowel group).
    #[value(alias = "bs-8")]
    Bs8,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Bs6 => Format::Bs6,
            FormatArg::Bs8 => Format::Bs8,
        }
    }
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Encoding format.
    #[arg(long, short = 'b', value_enum, default_value_t = FormatArg::Bs6)]
    format: FormatArg,

    /// Inline input text instead of a file.
    #[arg(long, short = 't', conflicts_with_all = ["input", "input_pos"])]
    text: Option<String>,

    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct WrapArgs {
    /// Maximum characters per word (-1 for no limit).
    #[arg(long = "max-word-size", allow_negative_numbers = true)]
    max_word_size: Option<i64>,

    /// Maximum characters per line (-1 for no limit).
    #[arg(long = "max-line-size", allow_negative_numbers = true)]
    max_line_size: Option<i64>,

    /// Text placed between words (backslash escapes allowed).
    #[arg(long = "word-delimiter", allow_hyphen_values = true, value_parser = parse_delimiter)]
    word_delimiter: Option<String>,

    /// Text placed between lines (backslash escapes allowed).
    #[arg(long = "line-delimiter", allow_hyphen_values = true, value_parser = parse_delimiter)]
    line_delimiter: Option<String>,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    #[command(flatten)]
    io: IoArgs,

    #[command(flatten)]
    wrap: WrapArgs,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Characters ignored between symbols, as ranges (e.g. `a-z0-9\-`).
    #[arg(long = "skip-chars", allow_hyphen_values = true, value_parser = parse_char_set)]
    skip_chars: Option<CharSet>,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Decode,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    format: Format,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    text: Option<String>,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    max_word_size: Option<i64>,
    max_line_size: Option<i64>,
    word_delimiter: Option<String>,
    line_delimiter: Option<String>,
    skip_chars: Option<CharSet>,
}

impl Options {
    fn base(command: Command, cli: &Cli) -> Self {
        Self {
            command,
            format: Format::Bs6,
            use_stdout: false,
            force: cli.force,
            quiet: cli.quiet,
            verbose: cli.verbose.min(2),
            json_output: cli.json_output,
            text: None,
            input_file: None,
            output_file: None,
            max_word_size: None,
            max_line_size: None,
            word_delimiter: None,
            line_delimiter: None,
            skip_chars: None,
        }
    }

    fn with_io(mut self, io: IoArgs) -> Self {
        self.format = io.format.into();
        self.use_stdout = io.stdout;
        self.text = io.text;
        self.input_file = io.input.or(io.input_pos);
        self.output_file = io.output.or(io.output_pos);
        self
    }
}

fn resolve_options(mut cli: Cli) -> Options {
    let command = std::mem::replace(&mut cli.command, Cmd::Config);
    match command {
        Cmd::Encode(args) => {
            let mut opts = Options::base(Command::Encode, &cli).with_io(args.io);
            opts.max_word_size = args.wrap.max_word_size;
            opts.max_line_size = args.wrap.max_line_size;
            opts.word_delimiter = args.wrap.word_delimiter;
            opts.line_delimiter = args.wrap.line_delimiter;
            opts
        }
        Cmd::Decode(args) => {
            let mut opts = Options::base(Command::Decode, &cli).with_io(args.io);
            opts.skip_chars = args.skip_chars;
            opts
        }
        Cmd::Config => Options::base(Command::Config, &cli),
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("bitspeak".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let opts = resolve_options(cli);
        let _ = build_config(&opts);
    }
}

// ---------------------------------------------------------------------------
// Build the codec configuration from CLI options
// ---------------------------------------------------------------------------

fn build_config(opts: &Options) -> Result<Config, ConfigError> {
    let mut builder = Config::builder();
    if let Some(size) = opts.max_word_size {
        builder = builder.max_word_size(size);
    }
    if let Some(size) = opts.max_line_size {
        builder = builder.max_line_size(size);
    }
    if let Some(delimiter) = &opts.word_delimiter {
        builder = builder.word_delimiter(delimiter.as_str());
    }
    if let Some(delimiter) = &opts.line_delimiter {
        builder = builder.line_delimiter(delimiter.as_str());
    }
    if let Some(set) = &opts.skip_chars {
        builder = builder.skip_chars(SkipChars::Set(set.clone()));
    }
    builder.build()
}

// ---------------------------------------------------------------------------
// Byte counting wrapper for stats
// ---------------------------------------------------------------------------

struct Counted<T> {
    inner: T,
    count: u64,
}

impl<T> Counted<T> {
    fn new(inner: T) -> Self {
        Self { inner, count: 0 }
    }
}

impl<R: Read> Read for Counted<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

impl<W: Write> Write for Counted<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Shared input/output setup
// ---------------------------------------------------------------------------

fn open_input(opts: &Options) -> Option<Box<dyn Read>> {
    if let Some(text) = &opts.text {
        return Some(Box::new(io::Cursor::new(text.clone().into_bytes())));
    }
    match &opts.input_file {
        Some(path) => match File::open(path) {
            Ok(f) => Some(Box::new(BufReader::with_capacity(BUF_SIZE, f))),
            Err(e) => {
                eprintln!("bitspeak: input file: {}: {e}", path.display());
                None
            }
        },
        None => Some(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_output(opts: &Options) -> Option<Box<dyn Write>> {
    match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => Some(Box::new(BufWriter::with_capacity(
            BUF_SIZE,
            io::stdout().lock(),
        ))),
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                eprintln!(
                    "bitspeak: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return None;
            }
            match File::create(path) {
                Ok(f) => Some(Box::new(BufWriter::with_capacity(BUF_SIZE, f))),
                Err(e) => {
                    eprintln!("bitspeak: output file: {}: {e}", path.display());
                    None
                }
            }
        }
    }
}

fn codec_for(opts: &Options) -> Option<Bitspeak> {
    match build_config(opts) {
        Ok(config) => Some(Bitspeak::new(opts.format, config)),
        Err(e) => {
            eprintln!("bitspeak: {e}");
            None
        }
    }
}

fn print_json(json: &serde_json::Value) {
    match serde_json::to_string_pretty(json) {
        Ok(text) => eprintln!("{text}"),
        Err(e) => eprintln!("bitspeak: json: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("bitspeak version {version} (Rust), Copyright (C) bitspeak contributors");
    eprintln!("Licensed under the MIT License");

    let file_io = cfg!(feature = "file-io") as u8;
    let line_delimiter = config::DEFAULT_LINE_DELIMITER.escape_default();
    let ptr_size = std::mem::size_of::<*const ()>();

    eprintln!("FORMATS={} {}", Format::Bs6, Format::Bs8);
    eprintln!("FILE_IO={file_io}");
    eprintln!("DEFAULT_MAX_WORD_SIZE={DEFAULT_MAX_WORD_SIZE}");
    eprintln!("DEFAULT_MAX_LINE_SIZE={DEFAULT_MAX_LINE_SIZE}");
    eprintln!("DEFAULT_WORD_DELIMITER={}", config::DEFAULT_WORD_DELIMITER);
    eprintln!("DEFAULT_LINE_DELIMITER={line_delimiter}");
    eprintln!("sizeof(usize)={ptr_size}");

    0
}

// ---------------------------------------------------------------------------
// Encode command
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    let Some(codec) = codec_for(opts) else {
        return 1;
    };
    let Some(reader) = open_input(opts) else {
        return 1;
    };
    let Some(writer) = open_output(opts) else {
        return 1;
    };

    let mut reader = Counted::new(reader);
    let mut writer = Counted::new(writer);

    let chars = match codec.encode_stream(&mut reader, &mut writer) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("bitspeak: encode error: {e}");
            return 1;
        }
    };

    if let Err(e) = writer.flush() {
        eprintln!("bitspeak: write flush error: {e}");
        return 1;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "bitspeak: encoder: format: {}, input size: {}, characters: {chars}",
            codec.name(),
            reader.count
        );
    }

    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "encode",
            "format": codec.name(),
            "input_size": reader.count,
            "output_size": writer.count,
            "characters": chars,
        }));
    }

    0
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let Some(codec) = codec_for(opts) else {
        return 1;
    };
    let Some(reader) = open_input(opts) else {
        return 1;
    };
    let Some(mut writer) = open_output(opts) else {
        return 1;
    };

    let mut reader = Counted::new(reader);

    let total = match codec.decode_stream(&mut reader, &mut writer) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("bitspeak: decode error: {e}");
            return 1;
        }
    };

    if let Err(e) = writer.flush() {
        eprintln!("bitspeak: write flush error: {e}");
        return 1;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "bitspeak: decoder: format: {}, input size: {}, output size: {total}",
            codec.name(),
            reader.count
        );
    }

    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "decode",
            "format": codec.name(),
            "input_size": reader.count,
            "output_size": total,
        }));
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(opts: &Options) -> LevelFilter {
    match (opts.quiet, opts.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if opts.quiet || opts.verbose > 0 {
        logger.filter_module("bitspeak", log_filter(&opts));
    }
    logger.format_timestamp(None).format_target(false).init();

    // Warn if -c overrides output filename.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        eprintln!(
            "bitspeak: warning: -c option overrides output filename: {}",
            path.display()
        );
    }

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_opts(args: &[&str]) -> Options {
        let argv: Vec<String> = std::iter::once("bitspeak".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let cli = Cli::try_parse_from(argv).expect("cli parse failed");
        resolve_options(cli)
    }

    fn parse_fails(args: &[&str]) -> bool {
        let argv = std::iter::once("bitspeak").chain(args.iter().copied());
        Cli::try_parse_from(argv).is_err()
    }

    #[test]
    fn encode_subcommand_maps_correctly() {
        let opts = parse_opts(&[
            "encode",
            "--format",
            "bs8",
            "--max-word-size",
            "4",
            "--max-line-size",
            "-1",
            "in.bin",
            "out.txt",
        ]);
        assert_eq!(opts.command, Command::Encode);
        assert_eq!(opts.format, Format::Bs8);
        assert_eq!(opts.max_word_size, Some(4));
        assert_eq!(opts.max_line_size, Some(-1));
        assert_eq!(opts.input_file, Some(PathBuf::from("in.bin")));
        assert_eq!(opts.output_file, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn decode_subcommand_maps_correctly() {
        let opts = parse_opts(&[
            "--quiet",
            "decode",
            "-b",
            "bs-6",
            "--skip-chars",
            "a-c\\-",
            "--input",
            "in.txt",
            "--output",
            "out.bin",
        ]);
        assert_eq!(opts.command, Command::Decode);
        assert_eq!(opts.format, Format::Bs6);
        assert!(opts.quiet);
        let skip = opts.skip_chars.as_ref().unwrap();
        assert!(skip.contains('b'));
        assert!(skip.contains('-'));
        assert!(!skip.contains(' '));
        assert_eq!(opts.input_file, Some(PathBuf::from("in.txt")));
        assert_eq!(opts.output_file, Some(PathBuf::from("out.bin")));
    }

    #[test]
    fn format_defaults_to_bs6() {
        assert_eq!(parse_opts(&["encode"]).format, Format::Bs6);
    }

    #[test]
    fn global_stdio_and_force_flags() {
        let opts = parse_opts(&["--force", "encode", "--stdout", "in", "out"]);
        assert!(opts.use_stdout);
        assert!(opts.force);
    }

    #[test]
    fn verbose_is_capped() {
        let verbose = parse_opts(&["--verbose", "--verbose", "--verbose", "encode", "in", "out"]);
        assert_eq!(verbose.verbose, 2);
        assert_eq!(log_filter(&verbose), LevelFilter::Trace);
        assert_eq!(log_filter(&parse_opts(&["-q", "config"])), LevelFilter::Error);
    }

    #[test]
    fn delimiters_are_unescaped() {
        let opts = parse_opts(&[
            "encode",
            "--word-delimiter",
            "\\t",
            "--line-delimiter",
            "\\r\\n",
        ]);
        assert_eq!(opts.word_delimiter.as_deref(), Some("\t"));
        assert_eq!(opts.line_delimiter.as_deref(), Some("\r\n"));

        let opts = parse_opts(&["encode", "--word-delimiter", "-"]);
        assert_eq!(opts.word_delimiter.as_deref(), Some("-"));
    }

    #[test]
    fn bad_escapes_are_rejected() {
        assert!(parse_fails(&["encode", "--word-delimiter", "\\q"]));
        assert!(parse_fails(&["decode", "--skip-chars", "z-a"]));
    }

    #[test]
    fn text_conflicts_with_input() {
        let opts = parse_opts(&["encode", "--text", "hello"]);
        assert_eq!(opts.text.as_deref(), Some("hello"));
        assert!(parse_fails(&["encode", "--text", "hello", "--input", "in"]));
        assert!(parse_fails(&["encode", "--text", "hello", "in"]));
    }

    #[test]
    fn config_command_maps() {
        assert_eq!(parse_opts(&["config"]).command, Command::Config);
    }

    #[test]
    fn config_mapping() {
        let opts = parse_opts(&[
            "encode",
            "--max-word-size",
            "3",
            "--max-line-size",
            "20",
            "--word-delimiter",
            " ",
        ]);
        let config = build_config(&opts).unwrap();
        assert_eq!(config.max_word_size(), Some(3));
        assert_eq!(config.max_line_size(), Some(20));
        assert_eq!(config.word_delimiter(), " ");
        assert_eq!(config.line_delimiter(), config::DEFAULT_LINE_DELIMITER);

        let defaults = build_config(&parse_opts(&["encode"])).unwrap();
        assert_eq!(defaults, Config::default());
    }

    #[test]
    fn invalid_sizes_surface_as_config_errors() {
        let opts = parse_opts(&["encode", "--max-word-size", "0"]);
        assert_eq!(build_config(&opts), Err(ConfigError::InvalidWordSize(0)));
        let opts = parse_opts(&["encode", "--max-line-size", "-2"]);
        assert_eq!(build_config(&opts), Err(ConfigError::InvalidLineSize(-2)));
    }

    #[test]
    fn skip_chars_replace_default_predicate() {
        let opts = parse_opts(&["decode", "--skip-chars", "x"]);
        let config = build_config(&opts).unwrap();
        assert!(config.is_skipped('x'));
        assert!(!config.is_skipped(' '));
    }

    #[test]
    fn fuzz_entry_tolerates_garbage() {
        fuzz_try_parse_args(&["encode".into(), "--max-word-size".into(), "x".into()]);
        fuzz_try_parse_args(&["decode".into(), "--skip-chars".into(), "\\".into()]);
    }
}

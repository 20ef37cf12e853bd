// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustsri
// File: app.rs
// Author: rustsri maintainers

use crate::rgh::algorithm::Algorithm;
use crate::rgh::dispatch::{Dispatcher, RunOutcome};
use crate::rgh::error::{ErrorKind, SriError};
use crate::rgh::source::{InputReference, Resolver};
use clap::{Arg, ArgAction};
use clap_complete::{generate, Generator, Shell};
use colored::*;
use std::ffi::OsString;
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

pub const PROGRAM_NAME: &str = "sri";
pub const LOG_ENV: &str = "SRI_LOG";

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INPUT_FAILURE: i32 = 1;
pub const EXIT_STARTUP_FAILURE: i32 = 2;

const HELP_TEMPLATE: &str = "{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

const AFTER_HELP: &str = "\
Computes a cryptographic hash for each of the given files or HTTP URLs.
For each file/URL, prints the hash in Subresource Integrity format,
followed by a tab character, the filename/URL and a newline.
If no files are given, reads standard input.
A file named \"-\" is also interpreted to mean standard input.
If zero or one positional arguments are given,
print only the hash without a filename.
Set SRI_LOG (e.g. SRI_LOG=debug) to control diagnostic logging.";

/// Settings for one invocation, resolved from the command line.
#[derive(Clone, Debug)]
pub struct RunConfig {
	pub algorithm: Algorithm,
	pub references: Vec<InputReference>,
	pub verbose: bool,
}

impl RunConfig {
	pub fn from_matches(matches: &clap::ArgMatches) -> Result<Self, SriError> {
		let algorithm = match matches.get_one::<String>("algorithm") {
			Some(name) => name.parse()?,
			None => Algorithm::default(),
		};
		let references = InputReference::from_args(
			matches
				.get_many::<OsString>("references")
				.into_iter()
				.flatten(),
		);
		Ok(Self {
			algorithm,
			references,
			verbose: matches.get_flag("verbose"),
		})
	}
}

pub fn build_cli() -> clap::Command {
	let algorithm_help = format!(
		"Hash function to use (one of {})",
		Algorithm::names().join(", ")
	);
	clap::Command::new(PROGRAM_NAME)
		.color(clap::ColorChoice::Never)
		.help_template(HELP_TEMPLATE)
		.bin_name(PROGRAM_NAME)
		.version(clap::crate_version!())
		.about("Compute Subresource Integrity hashes for files and URLs")
		.after_help(AFTER_HELP)
		.arg(
			Arg::new("algorithm")
				.short('a')
				.long("algorithm")
				.value_name("NAME")
				.help(algorithm_help)
				.default_value(Algorithm::default().name()),
		)
		.arg(
			Arg::new("verbose")
				.short('v')
				.long("verbose")
				.help("Log worker activity to stderr")
				.action(ArgAction::SetTrue),
		)
		.arg(
			Arg::new("completions")
				.long("completions")
				.value_name("SHELL")
				.value_parser(clap::value_parser!(Shell))
				.help("Print shell completions and exit"),
		)
		.arg(
			Arg::new("references")
				.value_name("FILE_OR_URL")
				.help("Files, http(s) URLs or - for stdin")
				.value_parser(clap::value_parser!(OsString))
				.num_args(0..)
				.action(ArgAction::Append),
		)
}

fn init_logging(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_env(LOG_ENV)
			.unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	// A second initialisation (e.g. from tests) is harmless.
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_target(false)
		.try_init();
}

/// Exit code for an error that ends the run before any input is hashed.
pub fn exit_code_for(kind: ErrorKind) -> i32 {
	match kind {
		ErrorKind::StartupConfig => EXIT_STARTUP_FAILURE,
		ErrorKind::Resolution
		| ErrorKind::Read
		| ErrorKind::Write
		| ErrorKind::Internal => EXIT_INPUT_FAILURE,
	}
}

fn report_fatal(err: &SriError) -> i32 {
	let prefix = format!("{}:", PROGRAM_NAME);
	if io::stderr().is_terminal() {
		eprintln!("{} {}", prefix.red().bold(), err);
	} else {
		eprintln!("{} {}", prefix, err);
	}
	exit_code_for(err.kind())
}

/// Hash every configured reference, writing to the process streams.
pub fn execute(config: &RunConfig) -> Result<RunOutcome, SriError> {
	let resolver = Resolver::new()?;
	let dispatcher =
		Dispatcher::new(config.algorithm, resolver, PROGRAM_NAME);
	let stdout = io::stdout();
	let stderr = io::stderr();
	Ok(dispatcher.run(
		&config.references,
		&mut stdout.lock(),
		&mut stderr.lock(),
	))
}

/// Parse arguments, run, and return the process exit code.
pub fn run() -> i32 {
	let matches = build_cli().get_matches();

	if let Some(shell) = matches.get_one::<Shell>("completions").copied() {
		print_completions(shell, &mut build_cli());
		return EXIT_SUCCESS;
	}

	let config = match RunConfig::from_matches(&matches) {
		Ok(config) => config,
		Err(e) => return report_fatal(&e),
	};
	init_logging(config.verbose);
	tracing::debug!(
		algorithm = %config.algorithm,
		inputs = config.references.len(),
		"starting run"
	);

	match execute(&config) {
		Ok(outcome) if outcome.success => EXIT_SUCCESS,
		Ok(outcome) => {
			tracing::debug!(failed = outcome.failed, "run finished with failures");
			EXIT_INPUT_FAILURE
		}
		Err(e) => report_fatal(&e),
	}
}

fn print_completions<G: Generator>(gen: G, cmd: &mut clap::Command) {
	generate(
		gen,
		cmd,
		cmd.get_name().to_string(),
		&mut io::stdout(),
	);
}

// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustsri
// File: dispatch.rs
// Author: rustsri maintainers
//
// Fan-out one worker thread per input, fan-in over a channel, and print
// results in the order the inputs were given.

use crate::rgh::algorithm::Algorithm;
use crate::rgh::error::SriError;
use crate::rgh::hash::digest_reader;
use crate::rgh::output::{format_diagnostic, format_sri};
use crate::rgh::source::{InputReference, Resolver};
use std::io::Write;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, warn};

/// Outcome of hashing one input. Produced once by its worker and consumed
/// once by the aggregator.
#[derive(Debug)]
pub struct DigestResult {
	pub index: usize,
	pub reference: String,
	pub outcome: Result<Vec<u8>, SriError>,
}

/// Summary of a whole run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunOutcome {
	pub success: bool,
	pub succeeded: usize,
	pub failed: usize,
}

pub struct Dispatcher {
	algorithm: Algorithm,
	resolver: Resolver,
	program: String,
}

impl Dispatcher {
	pub fn new(
		algorithm: Algorithm,
		resolver: Resolver,
		program: impl Into<String>,
	) -> Self {
		Self {
			algorithm,
			resolver,
			program: program.into(),
		}
	}

	/// Hash every reference concurrently and write one SRI line per
	/// successful input to `out`, one diagnostic per failure to `err`.
	///
	/// Lines appear in input order. A failed input gets no SRI line.
	/// Write failures are reported on `err` and do not stop the run.
	pub fn run<W: Write, E: Write>(
		&self,
		references: &[InputReference],
		out: &mut W,
		err: &mut E,
	) -> RunOutcome {
		let (tx, rx) = mpsc::channel();
		let mut slots: Vec<Option<DigestResult>> =
			references.iter().map(|_| None).collect();

		for (index, reference) in references.iter().enumerate() {
			if let Err(e) = self.spawn_worker(index, reference, tx.clone()) {
				slots[index] = Some(DigestResult {
					index,
					reference: reference.to_string(),
					outcome: Err(SriError::Spawn(e)),
				});
			}
		}
		// Only workers hold senders now; collection ends when the last one
		// finishes.
		drop(tx);
		self.collect(references, slots, rx, out, err)
	}

	/// Drain `rx` into per-input slots, emitting the ready prefix as
	/// results arrive. Inputs whose sender hung up without a result are
	/// reported as [`SriError::WorkerLost`]. Release builds abort on panic,
	/// so there this only triggers if a worker is torn down some other way.
	fn collect<W: Write, E: Write>(
		&self,
		references: &[InputReference],
		mut slots: Vec<Option<DigestResult>>,
		rx: Receiver<DigestResult>,
		out: &mut W,
		err: &mut E,
	) -> RunOutcome {
		let mut aggregator = Aggregator {
			algorithm: self.algorithm,
			program: &self.program,
			include_suffix: references.len() > 1,
			outcome: RunOutcome {
				success: true,
				..RunOutcome::default()
			},
		};
		let mut next = 0;
		aggregator.flush_ready(&mut slots, &mut next, out, err);
		for result in rx {
			let index = result.index;
			slots[index] = Some(result);
			aggregator.flush_ready(&mut slots, &mut next, out, err);
		}

		for (index, slot) in slots.iter_mut().enumerate().skip(next) {
			if slot.is_none() {
				warn!(index, "worker exited without a result");
				*slot = Some(DigestResult {
					index,
					reference: references[index].to_string(),
					outcome: Err(SriError::WorkerLost),
				});
			}
		}
		aggregator.flush_ready(&mut slots, &mut next, out, err);
		aggregator.outcome
	}

	fn spawn_worker(
		&self,
		index: usize,
		reference: &InputReference,
		tx: Sender<DigestResult>,
	) -> std::io::Result<()> {
		let resolver = self.resolver.clone();
		let algorithm = self.algorithm;
		let reference = reference.clone();
		thread::Builder::new()
			.name(format!("sri-worker-{}", index))
			.spawn(move || {
				debug!(index, %reference, "worker started");
				let outcome = resolver
					.resolve(&reference)
					.and_then(|stream| digest_reader(stream, algorithm));
				debug!(index, ok = outcome.is_ok(), "worker finished");
				// The receiver outlives every worker.
				let _ = tx.send(DigestResult {
					index,
					reference: reference.to_string(),
					outcome,
				});
			})?;
		Ok(())
	}
}

struct Aggregator<'a> {
	algorithm: Algorithm,
	program: &'a str,
	include_suffix: bool,
	outcome: RunOutcome,
}

impl Aggregator<'_> {
	/// Emit the longest run of ready results starting at `next`.
	fn flush_ready<W: Write, E: Write>(
		&mut self,
		slots: &mut [Option<DigestResult>],
		next: &mut usize,
		out: &mut W,
		err: &mut E,
	) {
		while let Some(result) = slots.get_mut(*next).and_then(Option::take)
		{
			self.emit(result, out, err);
			*next += 1;
		}
	}

	fn emit<W: Write, E: Write>(
		&mut self,
		result: DigestResult,
		out: &mut W,
		err: &mut E,
	) {
		let digest = match result.outcome {
			Ok(digest) => digest,
			Err(e) => {
				self.fail(&result.reference, &e, err);
				return;
			}
		};
		let line = format_sri(
			self.algorithm.name(),
			&digest,
			&result.reference,
			self.include_suffix,
		);
		match out.write_all(line.as_bytes()).and_then(|()| out.flush()) {
			Ok(()) => {
				debug!(index = result.index, "wrote result line");
				self.outcome.succeeded += 1;
			}
			Err(e) => self.fail(&result.reference, &SriError::Write(e), err),
		}
	}

	fn fail<E: Write>(&mut self, reference: &str, error: &SriError, err: &mut E) {
		self.outcome.success = false;
		self.outcome.failed += 1;
		let line = format_diagnostic(self.program, reference, error);
		// Nowhere left to report a broken stderr.
		let _ = err.write_all(line.as_bytes());
	}
}

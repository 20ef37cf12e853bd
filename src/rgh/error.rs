// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustsri
// File: error.rs
// Author: rustsri maintainers
//
// Error taxonomy shared by the resolver, digest computer and aggregator.

use std::io;
use thiserror::Error;

/// Coarse classification of [`SriError`], matching how the failure
/// is treated at the process level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
	/// Fatal before any input is touched.
	StartupConfig,
	/// The input could not be opened or fetched.
	Resolution,
	/// The input failed while its bytes were being hashed.
	Read,
	/// A result line could not be written to stdout.
	Write,
	/// A worker could not be started or vanished without reporting.
	Internal,
}

#[derive(Debug, Error)]
pub enum SriError {
	#[error("unknown hash function {0}")]
	UnknownAlgorithm(String),

	#[error("invalid URL: {0}")]
	InvalidUrl(#[source] url::ParseError),

	#[error("{0}")]
	Request(#[source] reqwest::Error),

	#[error("HTTP error {0}")]
	HttpStatus(reqwest::StatusCode),

	#[error("{0}")]
	Open(#[source] io::Error),

	#[error("{0}")]
	Read(#[source] io::Error),

	#[error("{0}")]
	Write(#[source] io::Error),

	#[error("failed to start worker: {0}")]
	Spawn(#[source] io::Error),

	#[error("worker terminated without reporting a result")]
	WorkerLost,
}

impl SriError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::UnknownAlgorithm(_) => ErrorKind::StartupConfig,
			Self::InvalidUrl(_)
			| Self::Request(_)
			| Self::HttpStatus(_)
			| Self::Open(_) => ErrorKind::Resolution,
			Self::Read(_) => ErrorKind::Read,
			Self::Write(_) => ErrorKind::Write,
			Self::Spawn(_) | Self::WorkerLost => ErrorKind::Internal,
		}
	}
}

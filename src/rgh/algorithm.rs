// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustsri
// File: algorithm.rs
// Author: rustsri maintainers

use crate::rgh::error::SriError;
use digest::DynDigest;
use sha2::Digest;
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// Digest algorithms admitted in Subresource Integrity strings.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, EnumIter)]
pub enum Algorithm {
	Sha256,
	#[default]
	Sha384,
	Sha512,
}

impl Algorithm {
	/// Lowercase identifier used as the SRI prefix.
	pub fn name(self) -> &'static str {
		match self {
			Self::Sha256 => "sha256",
			Self::Sha384 => "sha384",
			Self::Sha512 => "sha512",
		}
	}

	/// Output size in bytes.
	pub fn digest_len(self) -> usize {
		match self {
			Self::Sha256 => 32,
			Self::Sha384 => 48,
			Self::Sha512 => 64,
		}
	}

	pub fn hasher(self) -> Box<dyn DynDigest + Send> {
		match self {
			Self::Sha256 => Box::new(sha2::Sha256::new()),
			Self::Sha384 => Box::new(sha2::Sha384::new()),
			Self::Sha512 => Box::new(sha2::Sha512::new()),
		}
	}

	/// Supported names in sorted order.
	pub fn names() -> Vec<&'static str> {
		let mut names: Vec<_> = Self::iter().map(Self::name).collect();
		names.sort_unstable();
		names
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.name())
	}
}

impl FromStr for Algorithm {
	type Err = SriError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::iter()
			.find(|alg| alg.name() == s)
			.ok_or_else(|| SriError::UnknownAlgorithm(s.to_string()))
	}
}

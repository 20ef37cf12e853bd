// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustsri
// File: hash.rs
// Author: rustsri maintainers

use crate::rgh::algorithm::Algorithm;
use crate::rgh::error::SriError;
use std::io::{self, Read};

const CHUNK_SIZE: usize = 64 * 1024;

/// Hash everything `reader` yields, one chunk at a time.
///
/// The reader is consumed and dropped before returning, so an HTTP body
/// or file handle is released on both the success and the error path.
/// A read failure discards the partial state.
pub fn digest_reader<R: Read>(
	mut reader: R,
	algorithm: Algorithm,
) -> Result<Vec<u8>, SriError> {
	let mut hasher = algorithm.hasher();
	let mut buffer = vec![0; CHUNK_SIZE];
	loop {
		let count = match reader.read(&mut buffer) {
			Ok(0) => break,
			Ok(count) => count,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(SriError::Read(e)),
		};
		hasher.update(&buffer[..count]);
	}
	Ok(hasher.finalize().into_vec())
}

pub fn digest_bytes(data: &[u8], algorithm: Algorithm) -> Vec<u8> {
	let mut hasher = algorithm.hasher();
	hasher.update(data);
	hasher.finalize().into_vec()
}

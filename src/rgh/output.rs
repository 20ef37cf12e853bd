// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustsri
// Module: output
// Purpose: Render digests as Subresource Integrity lines.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

/// Render `<algorithm>-<base64(digest)>`, optionally followed by a tab and
/// the reference. Always newline-terminated.
pub fn format_sri(
	algorithm_name: &str,
	digest: &[u8],
	reference: &str,
	include_suffix: bool,
) -> String {
	let encoded = STANDARD.encode(digest);
	let mut line = String::with_capacity(
		algorithm_name.len() + encoded.len() + reference.len() + 3,
	);
	line.push_str(algorithm_name);
	line.push('-');
	line.push_str(&encoded);
	if include_suffix {
		line.push('\t');
		line.push_str(reference);
	}
	line.push('\n');
	line
}

/// `program: reference: description`, newline-terminated.
pub fn format_diagnostic(
	program: &str,
	reference: &str,
	error: &dyn fmt::Display,
) -> String {
	format!("{}: {}: {}\n", program, reference, error)
}

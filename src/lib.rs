// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustsri
// File: lib.rs
// Author: rustsri maintainers

pub mod rgh {
	pub mod algorithm;
	pub mod app;
	pub mod dispatch;
	pub mod error;
	pub mod hash;
	pub mod output;
	pub mod source;
}

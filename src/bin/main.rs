// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustsri
// File: main.rs
// Author: rustsri maintainers

use rustsri::rgh::app;

fn main() {
	std::process::exit(app::run());
}

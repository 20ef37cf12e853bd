// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustsri
// File: cli.rs
// Author: rustsri maintainers

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

const X_SHA384: &str =
	"sha384-11LCxR+6DimqGQVwqdQlPkQHegWNMpf6OlYw1b0BJiL5fCisrtMTtcg7uZDKp9qF";
const Y_SHA384: &str =
	"sha384-iDxSvWEF2t82QRzLxbOxn5km8/+svwJ1s7ftbhIor/bFWFoud/Ho/e9qI+Mbg4z2";

#[allow(deprecated)]
fn sri() -> Command {
	let mut cmd = Command::cargo_bin("sri").expect("binary sri available");
	cmd.env_remove("SRI_LOG")
		.env("NO_PROXY", "127.0.0.1")
		.env("no_proxy", "127.0.0.1");
	cmd
}

/// Answer every connection on a loopback port with the same response.
fn serve(status_line: &'static str, body: &'static [u8]) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let addr = listener.local_addr().unwrap();
	thread::spawn(move || {
		for stream in listener.incoming() {
			let Ok(stream) = stream else { break };
			let mut reader =
				BufReader::new(stream.try_clone().unwrap());
			let mut line = String::new();
			while reader.read_line(&mut line).unwrap_or(0) > 0 {
				if line == "\r\n" {
					break;
				}
				line.clear();
			}
			let mut stream = stream;
			let _ = write!(
				stream,
				"HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
				status_line,
				body.len()
			);
			let _ = stream.write_all(body);
		}
	});
	format!("http://{}/asset.js", addr)
}

#[test]
fn stdin_sha256_has_no_suffix() {
	sri()
		.args(["-a", "sha256"])
		.write_stdin("abc")
		.assert()
		.success()
		.stdout("sha256-ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0=\n")
		.stderr("");
}

#[test]
fn explicit_dash_reads_stdin() {
	sri()
		.args(["-a", "sha256", "-"])
		.write_stdin("abc")
		.assert()
		.success()
		.stdout("sha256-ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0=\n");
}

#[test]
fn two_files_default_to_sha384_with_suffix() {
	let dir = tempfile::tempdir().unwrap();
	let a = dir.path().join("fileA");
	let b = dir.path().join("fileB");
	fs::write(&a, "x").unwrap();
	fs::write(&b, "y").unwrap();

	let expected = format!(
		"{}\t{}\n{}\t{}\n",
		X_SHA384,
		a.display(),
		Y_SHA384,
		b.display()
	);
	sri().arg(&a).arg(&b).assert().success().stdout(expected);
}

#[test]
fn missing_file_reports_and_fails_but_siblings_print() {
	let dir = tempfile::tempdir().unwrap();
	let a = dir.path().join("present");
	fs::write(&a, "x").unwrap();
	let missing = dir.path().join("absent");

	sri()
		.arg(&missing)
		.arg(&a)
		.assert()
		.code(1)
		.stdout(format!("{}\t{}\n", X_SHA384, a.display()))
		.stderr(predicate::str::starts_with(format!(
			"sri: {}: ",
			missing.display()
		)));
}

#[test]
fn unknown_algorithm_is_a_distinct_failure() {
	sri()
		.args(["-a", "md5"])
		.assert()
		.code(2)
		.stdout("")
		.stderr(predicate::str::contains("unknown hash function md5"));
}

#[test]
fn uppercase_algorithm_name_is_rejected() {
	sri()
		.args(["-a", "SHA256"])
		.assert()
		.code(2)
		.stdout("")
		.stderr(predicate::str::contains("unknown hash function SHA256"));
}

#[cfg(unix)]
#[test]
fn non_utf8_file_name_is_hashed() {
	use std::ffi::OsString;
	use std::os::unix::ffi::OsStringExt;

	let dir = tempfile::tempdir().unwrap();
	let odd = dir.path().join(OsString::from_vec(b"f\xff".to_vec()));
	if fs::write(&odd, "x").is_err() {
		// Some filesystems refuse non-UTF-8 names.
		return;
	}
	let other = dir.path().join("plain");
	fs::write(&other, "y").unwrap();

	sri().arg(&odd).assert().success().stdout(format!("{}\n", X_SHA384));
	sri()
		.arg(&odd)
		.arg(&other)
		.assert()
		.success()
		.stdout(format!(
			"{}\t{}\n{}\t{}\n",
			X_SHA384,
			odd.display(),
			Y_SHA384,
			other.display()
		));
}

#[test]
fn url_is_hashed() {
	let url = serve("200 OK", b"x");
	sri()
		.arg(&url)
		.assert()
		.success()
		.stdout(format!("{}\n", X_SHA384));
}

#[test]
fn url_not_found_is_an_error_not_empty_input() {
	let url = serve("404 Not Found", b"");
	let ok = serve("200 OK", b"y");
	sri()
		.arg(&url)
		.arg(&ok)
		.assert()
		.code(1)
		.stdout(format!("{}\t{}\n", Y_SHA384, ok))
		.stderr(format!("sri: {}: HTTP error 404 Not Found\n", url));
}

#[test]
fn help_mentions_stdin_behaviour() {
	sri()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("If no files are given, reads standard input."));
}

#[test]
fn completions_are_generated() {
	sri()
		.args(["--completions", "bash"])
		.assert()
		.success()
		.stdout(predicate::str::contains("sri"));
}

// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: rustsri
// File: source.rs
// Author: rustsri maintainers
//
// Turns a command-line reference into a byte stream: stdin, an HTTP(S)
// response body or a local file.

use crate::rgh::error::SriError;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

pub const STDIN_REFERENCE: &str = "-";

/// Byte stream handed from the resolver to the digest computer.
pub type InputStream = Box<dyn Read + Send>;

/// One user-supplied input, classified by its textual shape.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputReference {
	Stdin,
	Url(String),
	Path(PathBuf),
}

impl InputReference {
	/// Classify a raw argument. Only UTF-8 text can be `-` or a URL;
	/// anything else is taken as a filesystem path.
	pub fn parse<S: AsRef<OsStr> + ?Sized>(reference: &S) -> Self {
		let reference = reference.as_ref();
		match reference.to_str() {
			Some(STDIN_REFERENCE) => Self::Stdin,
			Some(text)
				if text.starts_with("http://")
					|| text.starts_with("https://") =>
			{
				Self::Url(text.to_string())
			}
			_ => Self::Path(PathBuf::from(reference)),
		}
	}

	/// Expand the positional arguments; no arguments means stdin.
	pub fn from_args<I, S>(args: I) -> Vec<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<OsStr>,
	{
		let mut references: Vec<Self> =
			args.into_iter().map(|arg| Self::parse(&arg)).collect();
		if references.is_empty() {
			references.push(Self::Stdin);
		}
		references
	}
}

impl fmt::Display for InputReference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Stdin => f.write_str(STDIN_REFERENCE),
			Self::Url(url) => f.write_str(url),
			Self::Path(path) => write!(f, "{}", path.display()),
		}
	}
}

/// Opens input references. Cheap to clone; clones share the HTTP
/// connection pool.
#[derive(Clone, Debug)]
pub struct Resolver {
	client: Client,
}

impl Resolver {
	pub fn new() -> Result<Self, SriError> {
		let client = Client::builder()
			.user_agent(concat!(
				env!("CARGO_PKG_NAME"),
				"/",
				env!("CARGO_PKG_VERSION")
			))
			.timeout(None)
			.build()
			.map_err(SriError::Request)?;
		Ok(Self { client })
	}

	pub fn with_client(client: Client) -> Self {
		Self { client }
	}

	pub fn resolve(
		&self,
		reference: &InputReference,
	) -> Result<InputStream, SriError> {
		match reference {
			InputReference::Stdin => Ok(Box::new(std::io::stdin())),
			InputReference::Url(url) => self.fetch(url),
			InputReference::Path(path) => {
				let file = File::open(path).map_err(SriError::Open)?;
				Ok(Box::new(file))
			}
		}
	}

	fn fetch(&self, url: &str) -> Result<InputStream, SriError> {
		let parsed = url::Url::parse(url).map_err(SriError::InvalidUrl)?;
		let response = self
			.client
			.get(parsed)
			.send()
			.map_err(SriError::Request)?;
		let status = response.status();
		debug!(%url, %status, "received response");
		// Other 2xx codes are rejected as well.
		if status != StatusCode::OK {
			drop(response);
			return Err(SriError::HttpStatus(status));
		}
		Ok(Box::new(response))
	}
}

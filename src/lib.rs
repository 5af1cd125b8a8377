//! Pull based `multipart/form-data` encoding.
//!
//! The [`Encoder`] asks a [`PartSource`] for one [`Part`] at a time and
//! streams the part's body straight through to whoever pulls bytes out of
//! it. Only the small boundary/header fragment of the current part is ever
//! held in memory, bodies are never buffered.
//!
//! ```
//! # extern crate multipart_pull;
//! use std::io::Read;
//! use multipart_pull::{MultipartReader, Part, source};
//!
//! # fn main() {
//! let parts = vec![
//!     Part::form_field("greeting", "hello"),
//!     Part::form_file("upload", "a.txt", &b"file content"[..]),
//! ];
//!
//! let mut reader = MultipartReader::new(source::from_iter(parts))
//!     .with_boundary("XxX");
//!
//! let mut body = String::new();
//! reader.read_to_string(&mut body).unwrap();
//!
//! assert!(body.starts_with("--XxX\r\nContent-Disposition: form-data; name=\"greeting\"\r\n"));
//! assert!(body.ends_with("\r\n--XxX--"));
//! assert_eq!(reader.written_parts(), 2);
//! # }
//! ```
//!
//! # Known limitation
//!
//! Neither bodies nor header values are scanned for the boundary. If a
//! body contains `\r\n--{boundary}` the produced stream is ambiguous for
//! decoders. Use a random boundary (the default) to make this practically
//! impossible.

#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;
extern crate rand;
extern crate hex;
#[cfg(feature="stream")]
extern crate futures;

pub mod error;
pub mod boundary;
pub mod part;
pub mod source;
mod fragment;
pub mod encoder;
pub mod reader;
#[cfg(feature="stream")]
pub mod stream;

pub use self::error::MultipartError;
pub use self::part::{Part, Headers};
pub use self::source::{PartSource, BoxPartSource};
pub use self::encoder::{Encoder, Filled, Status};
pub use self::reader::MultipartReader;
#[cfg(feature="stream")]
pub use self::stream::MultipartStream;

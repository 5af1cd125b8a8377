//! Errors originating in this crate.
//!
//! Errors of the part source and of the part bodies are never wrapped,
//! they reach the caller as the exact `io::Error` they were returned as.
//! Errors created by the encoder itself are `MultipartError`s, which are
//! carried inside an `io::Error` (of kind `Other`) so that they can pass
//! through `io::Read` shaped interfaces. Use `MultipartError::from_io`
//! to get them back out.
use std::io;

use failure::{Compat, Fail};
use rand;


#[derive(Debug, Fail)]
pub enum MultipartError {

    /// The encoder was asked for data but no `PartSource` was set.
    ///
    /// This error is sticky, i.e. every call to `fill` will return it
    /// until a part source is set.
    #[fail(display = "no part source was set for the multipart encoder")]
    MissingPartSource,

    /// The random source failed while generating a boundary.
    #[fail(display = "failed to gather randomness for the multipart boundary: {}", _0)]
    EntropyUnavailable(#[cause] rand::Error),

    /// The boundary can only be changed between streams.
    #[fail(display = "the boundary can not be changed while a multipart stream is in progress")]
    BoundaryLocked,
}

impl MultipartError {

    /// wraps the error into an `io::Error` with `ErrorKind::Other`
    pub fn into_io(self) -> io::Error {
        io::Error::new(io::ErrorKind::Other, self.compat())
    }

    /// returns the `MultipartError` wrapped by `into_io`, if any
    pub fn from_io(err: &io::Error) -> Option<&MultipartError> {
        err.get_ref()
            .and_then(|inner| inner.downcast_ref::<Compat<MultipartError>>())
            .map(|compat| compat.get_ref())
    }
}

impl From<MultipartError> for io::Error {
    fn from(err: MultipartError) -> io::Error {
        err.into_io()
    }
}

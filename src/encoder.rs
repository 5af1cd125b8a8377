//! The incremental multipart encoder.
use std::fmt;
use std::mem;
use std::io::{self, Read};

use rand::RngCore;

use ::boundary::{create_boundary_with, create_random_boundary, form_data_content_type};
use ::error::MultipartError;
use ::fragment::Fragment;
use ::part::{Part, BoxBody};
use ::source::{PartSource, BoxPartSource};

pub type BoxRng = Box<dyn RngCore + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// the stream is not finished, call `fill` again
    Pending,
    /// the stream was completely written, the encoder re-armed itself
    /// and the next call to `fill` would start a new stream
    EndOfStream
}

/// The result of a successful `Encoder::fill` call.
///
/// Note that `written` can be `0` with a `Pending` status, this happens
/// when the body of a part was exhausted and the next part will only
/// be requested on the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filled {
    pub written: usize,
    pub status: Status
}

impl Filled {
    fn pending(written: usize) -> Self {
        Filled { written, status: Status::Pending }
    }

    fn end_of_stream(written: usize) -> Self {
        Filled { written, status: Status::EndOfStream }
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.status == Status::EndOfStream
    }
}

enum State {
    /// no stream in progress
    Uninitialized,
    /// stream started, no part attached
    Idle,
    /// the header fragment is written, the body waits behind it
    Header { fragment: Fragment, body: BoxBody },
    /// the body of the current part is streamed through, an error of the
    /// body which came after header bytes of the same call waits in `failed`
    Body { body: BoxBody, failed: Option<io::Error> },
    /// the closing boundary is written
    Trailer(Fragment),
}

impl fmt::Debug for State {
    fn fmt(&self, fter: &mut fmt::Formatter) -> fmt::Result {
        use self::State::*;
        match *self {
            Uninitialized => write!(fter, "Uninitialized"),
            Idle => write!(fter, "Idle"),
            Header { ref fragment, .. } => fter.debug_struct("Header")
                .field("fragment", fragment)
                .finish(),
            Body { ref failed, .. } => fter.debug_struct("Body")
                .field("failed", failed)
                .finish(),
            Trailer(ref fragment) => fter.debug_tuple("Trailer")
                .field(fragment)
                .finish()
        }
    }
}

/// Produces a multipart body, part by part, on demand.
///
/// Each call to `fill` writes as many bytes as are ready into the given
/// buffer. Parts are requested from the `PartSource` lazily, i.e. only
/// once the body of the previous part was exhausted, and bodies are
/// passed through without buffering them.
///
/// The produced stream looks like:
///
/// ```text
/// --{boundary}\r\n{headers}\r\n{body 0}
/// \r\n--{boundary}\r\n{headers}\r\n{body 1}
/// ...
/// \r\n--{boundary}--
/// ```
///
/// Once the closing boundary was written the encoder resets itself, so
/// it can be reused for another stream (normally after setting a new part
/// source). A generated boundary is kept, use `set_boundary("")` to have
/// a new one generated.
///
/// If you need a `io::Read` impl. use `MultipartReader`.
pub struct Encoder<P = BoxPartSource> {
    boundary: String,
    part_source: Option<P>,
    rng: Option<BoxRng>,
    written_parts: usize,
    state: State
}

impl<P> Encoder<P>
    where P: PartSource
{

    /// create a new encoder without a part source and boundary
    ///
    /// Calling `fill` without setting a part source first will fail
    /// with `MultipartError::MissingPartSource`.
    pub fn new() -> Self {
        Encoder {
            boundary: String::new(),
            part_source: None,
            rng: None,
            written_parts: 0,
            state: State::Uninitialized
        }
    }

    pub fn with_part_source(mut self, part_source: P) -> Self {
        self.part_source = Some(part_source);
        self
    }

    /// use the given boundary instead of generating one
    ///
    /// The boundary is used as is, it's the callers responsibility to
    /// make sure it's a valid boundary not appearing in any part.
    pub fn with_boundary<B>(mut self, boundary: B) -> Self
        where B: Into<String>
    {
        self.boundary = boundary.into();
        self
    }

    /// use `rng` instead of the OS random source to generate boundaries
    pub fn with_rng<R>(mut self, rng: R) -> Self
        where R: RngCore + Send + 'static
    {
        self.rng = Some(Box::new(rng));
        self
    }

    /// sets the part source, replacing the previous one
    ///
    /// The part source is only asked for parts once the current part (if
    /// any) is finished, so replacing it while a stream is in progress
    /// continues the stream with the parts of the new source.
    pub fn set_part_source(&mut self, part_source: P) {
        self.part_source = Some(part_source);
    }

    pub fn take_part_source(&mut self) -> Option<P> {
        self.part_source.take()
    }

    pub fn part_source_mut(&mut self) -> Option<&mut P> {
        self.part_source.as_mut()
    }

    /// sets the boundary for the next stream, an empty string means a
    /// new one is generated when the stream starts
    ///
    /// # Error
    ///
    /// Fails with `MultipartError::BoundaryLocked` if a stream is in progress.
    pub fn set_boundary<B>(&mut self, boundary: B) -> Result<(), MultipartError>
        where B: Into<String>
    {
        if self.is_streaming() {
            return Err(MultipartError::BoundaryLocked);
        }
        self.boundary = boundary.into();
        Ok(())
    }

    /// the boundary, if one was set or generated
    pub fn boundary(&self) -> Option<&str> {
        if self.boundary.is_empty() {
            None
        } else {
            Some(&self.boundary)
        }
    }

    /// the `Content-Type` header value matching the produced stream
    ///
    /// If no boundary was set yet one is generated, which is then used
    /// by the next stream.
    pub fn content_type(&mut self) -> Result<String, MultipartError> {
        self.ensure_boundary()?;
        Ok(form_data_content_type(&self.boundary))
    }

    /// number of parts written in the current (or last) stream
    ///
    /// A part counts as written as soon as its header was written.
    pub fn written_parts(&self) -> usize {
        self.written_parts
    }

    /// true if a stream was started but not yet finished
    pub fn is_streaming(&self) -> bool {
        match self.state {
            State::Uninitialized => false,
            _ => true
        }
    }

    /// write the next bytes of the stream into `buf`
    ///
    /// Never writes more than `buf.len()` bytes and only blocks if the part
    /// source or the current body blocks. An empty `buf` only starts the
    /// stream (if not yet started) but does not write anything.
    ///
    /// # Errors
    ///
    /// - `MultipartError::MissingPartSource` (wrapped in a `io::Error`)
    ///   if no part source was set, nothing is written in this case
    /// - `MultipartError::EntropyUnavailable` if a boundary had to be
    ///   generated but the random source failed
    /// - any error returned by the part source, nothing was written and
    ///   the next call will ask the part source again
    /// - any error returned by the body of the current part, including
    ///   `ErrorKind::Interrupted`, the body stays attached so the call can
    ///   be retried; if the error occurs after header bytes where written in
    ///   the same call, those bytes are returned and the error is returned
    ///   by the next call
    pub fn fill(&mut self, buf: &mut [u8]) -> io::Result<Filled> {
        if buf.is_empty() {
            if !self.is_streaming() {
                self.initialize()?;
            }
            return Ok(Filled::pending(0));
        }

        let mut written = 0;
        loop {
            // every branch puts back a state before leaving the loop
            match mem::replace(&mut self.state, State::Uninitialized) {
                State::Uninitialized => {
                    self.initialize()?;
                },
                State::Idle => {
                    match self.next_part() {
                        Ok(Some(part)) => {
                            let (headers, body) = part.into_parts();
                            trace!("attaching part {} ({} header fields)",
                                self.written_parts, headers.len());
                            let fragment = Fragment::part_header(
                                &self.boundary, self.written_parts, &headers);
                            self.state = State::Header { fragment, body };
                        },
                        Ok(None) => {
                            trace!("part source exhausted after {} parts", self.written_parts);
                            self.state = State::Trailer(Fragment::closing(&self.boundary));
                        },
                        Err(err) => {
                            self.state = State::Idle;
                            return Err(err);
                        }
                    }
                },
                State::Header { mut fragment, body } => {
                    written += fragment.drain_into(&mut buf[written..]);
                    if !fragment.is_drained() {
                        self.state = State::Header { fragment, body };
                        return Ok(Filled::pending(written));
                    }
                    self.written_parts += 1;
                    self.state = State::Body { body, failed: None };
                    if written == buf.len() {
                        return Ok(Filled::pending(written));
                    }
                },
                State::Body { mut body, failed } => {
                    if let Some(err) = failed {
                        self.state = State::Body { body, failed: None };
                        return Err(err);
                    }
                    match body.read(&mut buf[written..]) {
                        Ok(0) => {
                            trace!("body of part {} exhausted", self.written_parts - 1);
                            // the next part is only requested on the next call
                            self.state = State::Idle;
                            return Ok(Filled::pending(written));
                        },
                        Ok(count) => {
                            self.state = State::Body { body, failed: None };
                            return Ok(Filled::pending(written + count));
                        },
                        Err(err) => {
                            // header bytes already in `buf` must not get lost,
                            // the error is returned by the next call instead
                            if written > 0 {
                                self.state = State::Body { body, failed: Some(err) };
                                return Ok(Filled::pending(written));
                            }
                            self.state = State::Body { body, failed: None };
                            return Err(err);
                        }
                    }
                },
                State::Trailer(mut fragment) => {
                    written += fragment.drain_into(&mut buf[written..]);
                    if fragment.is_drained() {
                        debug!("multipart stream with boundary {:?} finished with {} parts",
                            self.boundary, self.written_parts);
                        // state stays `Uninitialized`
                        return Ok(Filled::end_of_stream(written));
                    }
                    self.state = State::Trailer(fragment);
                    return Ok(Filled::pending(written));
                }
            }
        }
    }

    fn initialize(&mut self) -> io::Result<()> {
        self.written_parts = 0;
        self.ensure_boundary()?;
        if self.part_source.is_none() {
            return Err(MultipartError::MissingPartSource.into());
        }
        debug!("starting multipart stream with boundary {:?}", self.boundary);
        self.state = State::Idle;
        Ok(())
    }

    fn ensure_boundary(&mut self) -> Result<(), MultipartError> {
        if self.boundary.is_empty() {
            self.boundary = match self.rng {
                Some(ref mut rng) => create_boundary_with(&mut **rng)?,
                None => create_random_boundary()?
            };
        }
        Ok(())
    }

    fn next_part(&mut self) -> io::Result<Option<Part>> {
        match self.part_source {
            Some(ref mut part_source) => part_source.next_part(),
            None => Err(MultipartError::MissingPartSource.into())
        }
    }
}

impl<P> Default for Encoder<P>
    where P: PartSource
{
    fn default() -> Self {
        Encoder::new()
    }
}

impl<P> fmt::Debug for Encoder<P> {
    fn fmt(&self, fter: &mut fmt::Formatter) -> fmt::Result {
        fter.debug_struct("Encoder")
            .field("boundary", &self.boundary)
            .field("has_part_source", &self.part_source.is_some())
            .field("written_parts", &self.written_parts)
            .field("state", &self.state)
            .finish()
    }
}

use std::fmt;
use std::io::{self, Read};

use rand::RngCore;

use ::encoder::Encoder;
use ::error::MultipartError;
use ::source::{PartSource, BoxPartSource};

/// `io::Read` adapter for `Encoder`.
///
/// `Encoder::fill` can return zero bytes without the stream being
/// finished, which `io::Read` would treat as end of file. This adapter
/// keeps calling `fill` until there are bytes or the stream ends.
///
/// Reads interrupted by a body (`ErrorKind::Interrupted`) are retried.
///
/// After the end of the stream `read` keeps returning `Ok(0)`. Setting a
/// new part source through `set_part_source` re-arms the reader for the
/// next stream.
pub struct MultipartReader<P = BoxPartSource> {
    encoder: Encoder<P>,
    finished: bool
}

impl<P> MultipartReader<P>
    where P: PartSource
{

    pub fn new(part_source: P) -> Self {
        MultipartReader::from_encoder(Encoder::new().with_part_source(part_source))
    }

    pub fn from_encoder(encoder: Encoder<P>) -> Self {
        MultipartReader { encoder, finished: false }
    }

    /// see `Encoder::with_boundary`
    pub fn with_boundary<B>(self, boundary: B) -> Self
        where B: Into<String>
    {
        let MultipartReader { encoder, finished } = self;
        MultipartReader { encoder: encoder.with_boundary(boundary), finished }
    }

    /// see `Encoder::with_rng`
    pub fn with_rng<R>(self, rng: R) -> Self
        where R: RngCore + Send + 'static
    {
        let MultipartReader { encoder, finished } = self;
        MultipartReader { encoder: encoder.with_rng(rng), finished }
    }

    /// sets the part source and re-arms the reader if the last stream ended
    pub fn set_part_source(&mut self, part_source: P) {
        self.encoder.set_part_source(part_source);
        self.finished = false;
    }

    /// see `Encoder::set_boundary`, this does not re-arm the reader
    pub fn set_boundary<B>(&mut self, boundary: B) -> Result<(), MultipartError>
        where B: Into<String>
    {
        self.encoder.set_boundary(boundary)
    }

    pub fn boundary(&self) -> Option<&str> {
        self.encoder.boundary()
    }

    /// see `Encoder::content_type`
    pub fn content_type(&mut self) -> Result<String, MultipartError> {
        self.encoder.content_type()
    }

    pub fn written_parts(&self) -> usize {
        self.encoder.written_parts()
    }

    /// true once the stream was completely read
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn encoder(&self) -> &Encoder<P> {
        &self.encoder
    }

    pub fn into_inner(self) -> Encoder<P> {
        self.encoder
    }
}

impl<P> Read for MultipartReader<P>
    where P: PartSource
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }
        loop {
            let filled = match self.encoder.fill(buf) {
                Ok(filled) => filled,
                Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err)
            };
            if filled.is_end_of_stream() {
                self.finished = true;
                return Ok(filled.written);
            }
            if filled.written > 0 {
                return Ok(filled.written);
            }
        }
    }
}

impl<P> fmt::Debug for MultipartReader<P> {
    fn fmt(&self, fter: &mut fmt::Formatter) -> fmt::Result {
        fter.debug_struct("MultipartReader")
            .field("encoder", &self.encoder)
            .field("finished", &self.finished)
            .finish()
    }
}

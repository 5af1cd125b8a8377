//! `futures::Stream` adapter, for clients taking a stream of chunks as body.
use std::cmp;
use std::fmt;
use std::io::Read;

use futures::{Async, Poll, Stream};

use ::encoder::Encoder;
use ::reader::MultipartReader;
use ::source::{PartSource, BoxPartSource};

pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// A stream of chunks of a multipart body.
///
/// Each poll does one (synchronous) read, so if the part source or a
/// body blocks so does `poll`. This is fine for in-memory or file backed
/// parts, for slow sources consider offloading the stream e.g. into a
/// thread pool.
pub struct MultipartStream<P = BoxPartSource> {
    reader: MultipartReader<P>,
    chunk_size: usize
}

impl<P> MultipartStream<P>
    where P: PartSource
{

    pub fn new(reader: MultipartReader<P>) -> Self {
        MultipartStream { reader, chunk_size: DEFAULT_CHUNK_SIZE }
    }

    pub fn from_encoder(encoder: Encoder<P>) -> Self {
        MultipartStream::new(MultipartReader::from_encoder(encoder))
    }

    /// the maximal size of the produced chunks, a size of 0 is treated as 1
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = cmp::max(chunk_size, 1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn reader(&self) -> &MultipartReader<P> {
        &self.reader
    }

    pub fn into_inner(self) -> MultipartReader<P> {
        self.reader
    }
}

impl<P> Stream for MultipartStream<P>
    where P: PartSource
{
    type Item = Vec<u8>;
    type Error = ::std::io::Error;

    fn poll(&mut self) -> Poll<Option<Self::Item>, Self::Error> {
        let mut chunk = vec![0u8; self.chunk_size];
        let count = self.reader.read(&mut chunk)?;
        if count == 0 {
            return Ok(Async::Ready(None));
        }
        chunk.truncate(count);
        Ok(Async::Ready(Some(chunk)))
    }
}

impl<P> fmt::Debug for MultipartStream<P> {
    fn fmt(&self, fter: &mut fmt::Formatter) -> fmt::Result {
        fter.debug_struct("MultipartStream")
            .field("reader", &self.reader)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

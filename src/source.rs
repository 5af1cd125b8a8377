//! Providers of the parts of a multipart stream.
use std::io;

use ::part::Part;

/// Provides the parts of a multipart stream, one at a time.
///
/// `next_part` is called by the encoder each time it needs a new part,
/// which is when the stream starts and when the body of the previous
/// part was fully read.
///
/// - `Ok(Some(part))` adds `part` to the stream
/// - `Ok(None)` signals that there are no more parts, the encoder
///   then writes the closing boundary and ends the stream
/// - `Err(err)` is passed to the caller as is, the encoder will
///   call `next_part` again on the next read
///
/// Implementations can block or do I/O (e.g. open the next file), the
/// read operation which triggered the call blocks until it returns.
pub trait PartSource {
    fn next_part(&mut self) -> io::Result<Option<Part>>;
}

pub type BoxPartSource = Box<dyn PartSource + Send>;

impl<P> PartSource for Box<P>
    where P: PartSource + ?Sized
{
    fn next_part(&mut self) -> io::Result<Option<Part>> {
        (**self).next_part()
    }
}

impl<'a, P> PartSource for &'a mut P
    where P: PartSource + ?Sized
{
    fn next_part(&mut self) -> io::Result<Option<Part>> {
        (**self).next_part()
    }
}


/// `PartSource` calling a closure, see `from_fn`
#[derive(Debug, Clone)]
pub struct FromFn<F> {
    func: F
}

/// create a `PartSource` from a closure
///
/// ```
/// # extern crate multipart_pull;
/// # use multipart_pull::{Part, source};
/// # fn main() {
/// let mut count = 0;
/// let parts = source::from_fn(move || {
///     if count >= 3 {
///         return Ok(None);
///     }
///     count += 1;
///     Ok(Some(Part::form_field(&format!("field{}", count), "value")))
/// });
/// # let _ = parts;
/// # }
/// ```
pub fn from_fn<F>(func: F) -> FromFn<F>
    where F: FnMut() -> io::Result<Option<Part>>
{
    FromFn { func }
}

impl<F> PartSource for FromFn<F>
    where F: FnMut() -> io::Result<Option<Part>>
{
    fn next_part(&mut self) -> io::Result<Option<Part>> {
        (self.func)()
    }
}


/// `PartSource` yielding the parts of an iterator, see `from_iter`
#[derive(Debug, Clone)]
pub struct FromIter<I> {
    iter: I
}

/// create a `PartSource` from anything iterable over `Part`s
///
/// The source is exhausted once the iterator is.
pub fn from_iter<I>(iter: I) -> FromIter<I::IntoIter>
    where I: IntoIterator<Item=Part>
{
    FromIter { iter: iter.into_iter() }
}

impl<I> PartSource for FromIter<I>
    where I: Iterator<Item=Part>
{
    fn next_part(&mut self) -> io::Result<Option<Part>> {
        Ok(self.iter.next())
    }
}

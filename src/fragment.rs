use std::cmp;

use ::part::Headers;

const CRLF: &[u8] = b"\r\n";
const DASHES: &[u8] = b"--";

/// A small in-memory chunk of the stream (boundary line plus headers,
/// or the closing boundary) which is drained into the output buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fragment {
    data: Vec<u8>,
    pos: usize
}

impl Fragment {

    fn new(data: Vec<u8>) -> Self {
        Fragment { data, pos: 0 }
    }

    /// the boundary line and header block of the part with index `index`
    ///
    /// All but the first part start with the CRLF terminating the body of
    /// the previous part. Header fields are written in the (sorted) order
    /// of `Headers::iter`, one line per value.
    pub(crate) fn part_header(boundary: &str, index: usize, headers: &Headers) -> Self {
        let mut data = Vec::with_capacity(boundary.len() + 8 + headers.len() * 32);
        if index > 0 {
            data.extend_from_slice(CRLF);
        }
        data.extend_from_slice(DASHES);
        data.extend_from_slice(boundary.as_bytes());
        data.extend_from_slice(CRLF);

        for (name, values) in headers {
            for value in values {
                data.extend_from_slice(name.as_bytes());
                data.extend_from_slice(b": ");
                data.extend_from_slice(value.as_bytes());
                data.extend_from_slice(CRLF);
            }
        }

        //the empty line between the headers and the body
        data.extend_from_slice(CRLF);
        Fragment::new(data)
    }

    /// the closing boundary, note that there is no trailing CRLF
    pub(crate) fn closing(boundary: &str) -> Self {
        let mut data = Vec::with_capacity(boundary.len() + 6);
        data.extend_from_slice(CRLF);
        data.extend_from_slice(DASHES);
        data.extend_from_slice(boundary.as_bytes());
        data.extend_from_slice(DASHES);
        Fragment::new(data)
    }

    /// copies as many pending bytes as fit into `out`, returns the number copied
    pub(crate) fn drain_into(&mut self, out: &mut [u8]) -> usize {
        let pending = &self.data[self.pos..];
        let count = cmp::min(pending.len(), out.len());
        out[..count].copy_from_slice(&pending[..count]);
        self.pos += count;
        count
    }

    pub(crate) fn is_drained(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }
}

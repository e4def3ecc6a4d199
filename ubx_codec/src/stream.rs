//! Decoding frames straight from a byte source.
//!
//! The decoder only peeks until a whole frame is buffered and consumes it in
//! one step. On error nothing is consumed: resynchronization (usually
//! `source.consume(1)` and retry) is up to the owner of the source.

use tracing::trace;

use crate::{
    constants::{UBX_FRAME_OVERHEAD, UBX_HEADER_LEN, UBX_SYNC_SIZE},
    error::StreamError,
    frame::{check_sync, FrameDecoder, OwnedFrame},
};

/// Supplier of bytes for [`FrameDecoder::decode_stream`]
pub trait ByteSource {
    type Error;

    /// Returns a view of at least `count` bytes from the head of the source,
    /// blocking until they are available. Must not consume anything.
    fn peek(&mut self, count: usize) -> Result<&[u8], Self::Error>;

    /// Drops `count` bytes from the head of the source.
    fn consume(&mut self, count: usize);
}

/// In-memory source ran out of bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("byte source exhausted, {requested} bytes requested but {available} available")]
pub struct SourceExhausted {
    pub requested: usize,
    pub available: usize,
}

/// [`ByteSource`] over a borrowed slice
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> &'a [u8] {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteSource for SliceSource<'_> {
    type Error = SourceExhausted;

    fn peek(&mut self, count: usize) -> Result<&[u8], SourceExhausted> {
        if count > self.data.len() {
            return Err(SourceExhausted {
                requested: count,
                available: self.data.len(),
            });
        }
        Ok(&self.data[..count])
    }

    fn consume(&mut self, count: usize) {
        let count = core::cmp::min(count, self.data.len());
        self.data = &self.data[count..];
    }
}

#[cfg(feature = "std")]
pub use io_source::IoSource;

#[cfg(feature = "std")]
mod io_source {
    use super::ByteSource;
    use std::io::{self, Read};
    use std::vec::Vec;

    const READ_CHUNK: usize = 256;

    /// Buffered [`ByteSource`] over any [`std::io::Read`], such as a serial port.
    ///
    /// `peek` blocks inside `read` until enough bytes arrived. End of input
    /// before that is reported as [`io::ErrorKind::UnexpectedEof`].
    #[derive(Debug)]
    pub struct IoSource<R: Read> {
        reader: R,
        buf: Vec<u8>,
    }

    impl<R: Read> IoSource<R> {
        pub fn new(reader: R) -> Self {
            Self {
                reader,
                buf: Vec::new(),
            }
        }

        /// Number of bytes read from the reader but not consumed yet
        pub fn buffered(&self) -> usize {
            self.buf.len()
        }

        pub fn into_inner(self) -> R {
            self.reader
        }
    }

    impl<R: Read> ByteSource for IoSource<R> {
        type Error = io::Error;

        fn peek(&mut self, count: usize) -> io::Result<&[u8]> {
            let mut chunk = [0u8; READ_CHUNK];
            while self.buf.len() < count {
                let want = core::cmp::min(READ_CHUNK, count - self.buf.len());
                match self.reader.read(&mut chunk[..want]) {
                    Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                    Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
                    Err(e) => return Err(e),
                }
            }
            Ok(&self.buf[..count])
        }

        fn consume(&mut self, count: usize) {
            let count = core::cmp::min(count, self.buf.len());
            self.buf.drain(..count);
        }
    }
}

impl FrameDecoder {
    /// Wait for one complete frame at the head of `source` and decode it.
    ///
    /// Peeks the sync chars, then the header, then the whole `length + 8`
    /// bytes. The frame is consumed only once it validated completely.
    pub fn decode_stream<S: ByteSource>(
        &self,
        source: &mut S,
    ) -> Result<OwnedFrame, StreamError<S::Error>> {
        trace!("waiting for UBX sync chars");
        check_sync(source.peek(UBX_SYNC_SIZE).map_err(StreamError::Source)?)?;

        trace!("waiting for UBX header");
        let pack_len = self.payload_len(source.peek(UBX_HEADER_LEN).map_err(StreamError::Source)?)?;

        let frame_len = pack_len + UBX_FRAME_OVERHEAD;
        trace!(frame_len, "waiting for UBX frame");
        let bytes = source.peek(frame_len).map_err(StreamError::Source)?;
        let frame = self.decode(&bytes[..frame_len])?.to_owned_frame();

        source.consume(frame_len);
        Ok(frame)
    }
}

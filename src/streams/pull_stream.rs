use std::io::{self, Read};

/// A forward-only byte stream the demuxer pulls from.
///
/// No `Seek` bound: the demuxer sees bytes in order, once.
pub trait PullStream: Read {
    /// Total length if the source knows it up front.
    fn byte_len(&self) -> Option<u64> {
        None
    }
    fn callback_count(&self) -> u64 {
        0
    }
    fn bytes_served(&self) -> u64 {
        0
    }
    fn log_stats(&self) {}
}

impl<S: PullStream + ?Sized> PullStream for &mut S {
    fn byte_len(&self) -> Option<u64> {
        (**self).byte_len()
    }
    fn callback_count(&self) -> u64 {
        (**self).callback_count()
    }
    fn bytes_served(&self) -> u64 {
        (**self).bytes_served()
    }
    fn log_stats(&self) {
        (**self).log_stats()
    }
}

/// Wraps any reader as a [`PullStream`], counting reads.
#[derive(Debug)]
pub struct ReadOnlyStream<R: Read> {
    inner: R,
    reads: u64,
    bytes: u64,
}

impl<R: Read> ReadOnlyStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            reads: 0,
            bytes: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for ReadOnlyStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.reads += 1;
        self.bytes += n as u64;
        Ok(n)
    }
}

impl<R: Read> PullStream for ReadOnlyStream<R> {
    fn callback_count(&self) -> u64 {
        self.reads
    }
    fn bytes_served(&self) -> u64 {
        self.bytes
    }
}

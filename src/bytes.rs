use std::io::{self, ErrorKind};

/// Window provides a growable view over bytes pulled from a reader on demand.
///
/// Consumed bytes are released by advancing a start index rather than shifting the
/// buffer; the buffer is compacted only once the consumed prefix is at least as large
/// as the live data, so sustained streaming stays linear.
pub(crate) struct Window<R>
where
    R: io::Read + Send,
{
    reader: R,
    buf: Vec<u8>,
    start: usize,
    read_size: usize,
    num_read: usize,
    eof: bool,
}

impl<R> Window<R>
where
    R: io::Read + Send,
{
    pub fn new(reader: R, read_size: usize) -> Self {
        Window {
            reader,
            buf: Vec::new(),
            start: 0,
            read_size: read_size.max(1),
            num_read: 0,
            eof: false,
        }
    }

    /// Bytes available and not yet consumed.
    pub fn available(&self) -> &[u8] {
        &self.buf[self.start..]
    }

    pub fn len(&self) -> usize {
        self.buf.len() - self.start
    }

    /// Release the first `count` available bytes. Cannot fail; releasing more than
    /// is available empties the window.
    pub fn consume(&mut self, count: usize) {
        self.start = (self.start + count).min(self.buf.len());
        if self.start == self.buf.len() {
            self.buf.clear();
            self.start = 0;
        }
    }

    /// Release all available bytes.
    pub fn clear(&mut self) {
        self.consume(self.len());
    }

    /// Pull up to `read_size` more bytes from the reader. Returns `Ok(false)` once the
    /// reader signals end-of-data, i.e., a zero length read or `UnexpectedEof`.
    ///
    /// # Errors
    /// Any reader error other than `Interrupted` or `UnexpectedEof`.
    pub fn fill(&mut self) -> Result<bool, io::Error> {
        if self.eof {
            return Ok(false);
        }
        if self.start > 0 && self.start >= self.len() {
            self.buf.drain(..self.start);
            self.start = 0;
        }

        let end = self.buf.len();
        self.buf.resize(end + self.read_size, 0);
        loop {
            match self.reader.read(&mut self.buf[end..]) {
                Ok(0) => {
                    self.buf.truncate(end);
                    self.eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.buf.truncate(end + n);
                    self.num_read += n;
                    return Ok(true);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                    self.buf.truncate(end);
                    self.eof = true;
                    return Ok(false);
                }
                Err(err) => {
                    self.buf.truncate(end);
                    return Err(err);
                }
            }
        }
    }

    /// Stream offset of the first available byte.
    pub fn offset(&self) -> usize {
        self.num_read - self.len()
    }
}

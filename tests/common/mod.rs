use std::io;
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path =
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    path.push("tests/fixtures");
    path.push(name);
    path
}

/// Reader producing at most `chunk` bytes per read, like a slow network source.
pub struct Trickle {
    dat: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl Trickle {
    pub fn new(dat: Vec<u8>, chunk: usize) -> Self {
        Trickle { dat, pos: 0, chunk }
    }
}

impl io::Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.dat.len() - self.pos);
        buf[..n].copy_from_slice(&self.dat[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

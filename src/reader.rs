//! Generic Buffered Reader
use std::{
    fs::File,
    io::{BufRead, BufReader, Error as IoError, Read},
    path::Path,
};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

#[derive(Debug)]
pub enum BufferedReader {
    /// Readable NAV file
    PlainFile(BufReader<File>),
    /// gzip compressed NAV file
    #[cfg(feature = "flate2")]
    GzFile(BufReader<GzDecoder<File>>),
}

impl BufferedReader {
    /// Opens a plain NAV file, or a gzip compressed one when
    /// the name terminates with `.gz`.
    pub fn new(path: &Path) -> Result<Self, IoError> {
        let gzip = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);
        if gzip {
            Self::gzip(path)
        } else {
            Ok(Self::PlainFile(BufReader::new(File::open(path)?)))
        }
    }

    /// Opens a gzip compressed NAV file, whatever its name
    pub fn gzip(path: &Path) -> Result<Self, IoError> {
        #[cfg(feature = "flate2")]
        {
            let fd = File::open(path)?;
            Ok(Self::GzFile(BufReader::new(GzDecoder::new(fd))))
        }
        #[cfg(not(feature = "flate2"))]
        {
            Err(IoError::new(
                std::io::ErrorKind::Unsupported,
                format!(
                    "{}: gzip compressed data requires the flate2 feature",
                    path.display()
                ),
            ))
        }
    }

    /// Consumes this reader, returning the whole (ASCII) content
    pub fn read_content(mut self) -> Result<String, IoError> {
        let mut content = String::new();
        self.read_to_string(&mut content)?;
        Ok(content)
    }
}

impl Read for BufferedReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        match self {
            Self::PlainFile(h) => h.read(buf),
            #[cfg(feature = "flate2")]
            Self::GzFile(h) => h.read(buf),
        }
    }
}

impl BufRead for BufferedReader {
    fn fill_buf(&mut self) -> Result<&[u8], IoError> {
        match self {
            Self::PlainFile(h) => h.fill_buf(),
            #[cfg(feature = "flate2")]
            Self::GzFile(h) => h.fill_buf(),
        }
    }
    fn consume(&mut self, s: usize) {
        match self {
            Self::PlainFile(h) => h.consume(s),
            #[cfg(feature = "flate2")]
            Self::GzFile(h) => h.consume(s),
        }
    }
}

//! Streaming FASTA reader.
//!
//! Records are `>`-prefixed header lines followed by any number of body lines.
//! LF and CRLF endings are both accepted and blank lines are skipped. Body
//! bytes before the first header fail with [`KestrelError::NoHeader`]; a line
//! longer than the configured limit fails with [`KestrelError::LineTooLong`].

use std::io::{BufRead, Read};

use kestrel_core::{KestrelError, Result};

/// Default per-line limit: 1 MiB.
pub const DEFAULT_MAX_LINE: usize = 1 << 20;

/// One FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FastaRecord {
    /// Header text after `>`, line ending removed.
    pub header: String,
    /// Concatenated body lines.
    pub seq: Vec<u8>,
}

/// Iterator over the records of a FASTA stream.
pub struct FastaReader<R> {
    reader: R,
    max_line: usize,
    line: Vec<u8>,
    header: Option<String>,
    seq: Vec<u8>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    /// Reader with the default line limit.
    pub fn new(reader: R) -> Self {
        Self::with_max_line(reader, DEFAULT_MAX_LINE)
    }

    /// Reader that rejects lines longer than `limit` bytes.
    pub fn with_max_line(reader: R, limit: usize) -> Self {
        Self {
            reader,
            max_line: limit,
            line: Vec::new(),
            header: None,
            seq: Vec::new(),
            done: false,
        }
    }

    /// Read one line into `self.line` without its ending. `Ok(false)` at EOF.
    fn read_line(&mut self) -> Result<bool> {
        self.line.clear();
        // room for the line plus "\r\n"
        let cap = self.max_line as u64 + 2;
        let n = (&mut self.reader).take(cap).read_until(b'\n', &mut self.line)?;
        if n == 0 {
            return Ok(false);
        }
        let terminated = self.line.last() == Some(&b'\n');
        if terminated {
            self.line.pop();
        }
        if self.line.last() == Some(&b'\r') {
            self.line.pop();
        }
        if self.line.len() > self.max_line || (!terminated && n as u64 == cap) {
            return Err(KestrelError::LineTooLong {
                limit: self.max_line,
            });
        }
        Ok(true)
    }

    fn finish_record(&mut self, header: String) -> FastaRecord {
        FastaRecord {
            header,
            seq: std::mem::take(&mut self.seq),
        }
    }

    fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        loop {
            if !self.read_line()? {
                return Ok(self.header.take().map(|h| self.finish_record(h)));
            }
            if self.line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            if self.line[0] == b'>' {
                let header = String::from_utf8_lossy(&self.line[1..]).trim().to_string();
                if let Some(prev) = self.header.replace(header) {
                    return Ok(Some(self.finish_record(prev)));
                }
                continue;
            }
            if self.header.is_none() {
                return Err(KestrelError::NoHeader);
            }
            self.seq
                .extend(self.line.iter().filter(|b| !b.is_ascii_whitespace()));
        }
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Read every record of a FASTA stream.
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>> {
    FastaReader::new(reader).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<Vec<FastaRecord>> {
        read_fasta(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn multi_line_records() {
        let recs = parse(">seq1 first\nACGT\nacgt\n\n>seq2\nTTTT\n").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].header, "seq1 first");
        assert_eq!(recs[0].seq, b"ACGTacgt");
        assert_eq!(recs[1].header, "seq2");
        assert_eq!(recs[1].seq, b"TTTT");
    }

    #[test]
    fn crlf_and_missing_final_newline() {
        let recs = parse(">a\r\nAC\r\nGT\r\n>b\r\nGG").unwrap();
        assert_eq!(recs[0].seq, b"ACGT");
        assert_eq!(recs[1].seq, b"GG");
    }

    #[test]
    fn leading_blank_lines_and_empty_body() {
        let recs = parse("\n\n>empty\n>full\nA\n").unwrap();
        assert_eq!(recs[0].seq, b"");
        assert_eq!(recs[1].seq, b"A");
    }

    #[test]
    fn body_before_header() {
        assert!(matches!(parse("ACGT\n>x\nA\n"), Err(KestrelError::NoHeader)));
    }

    #[test]
    fn empty_input() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn line_limit() {
        let text = ">x\nACGTACGTAC\n";
        let r: Result<Vec<_>> =
            FastaReader::with_max_line(Cursor::new(text.as_bytes()), 8).collect();
        assert!(matches!(r, Err(KestrelError::LineTooLong { limit: 8 })));
        let ok: Result<Vec<_>> =
            FastaReader::with_max_line(Cursor::new(">x\r\nACGTACGT\r\n".as_bytes()), 8).collect();
        assert_eq!(ok.unwrap()[0].seq, b"ACGTACGT");
    }

    #[test]
    fn stops_after_error() {
        let mut it = FastaReader::new(Cursor::new("AC\n>x\nA\n".as_bytes()));
        assert!(it.next().unwrap().is_err());
        assert!(it.next().is_none());
    }
}

// In: src/source/rows.rs

//! Line-level screening in front of the Arrow CSV reader.
//!
//! The Arrow reader fails a whole batch on a row with too many fields or an
//! unterminated quoted field. `RowGuard` replaces such a line with a row of
//! empty cells, which the typed layers then count as malformed.

use std::io::{self, BufRead, BufReader, Read};

pub struct RowGuard<R> {
    inner: BufReader<R>,
    fields: usize,
    line: Vec<u8>,
    pos: usize,
    line_no: u64,
    blanked: u64,
}

impl<R: Read> RowGuard<R> {
    /// `inner` must be positioned after the header; `fields` is the header's
    /// column count.
    pub fn new(inner: BufReader<R>, fields: usize) -> Self {
        Self {
            inner,
            fields: fields.max(1),
            line: Vec::new(),
            pos: 0,
            line_no: 1,
            blanked: 0,
        }
    }

    /// Number of lines replaced so far.
    pub fn blanked(&self) -> u64 {
        self.blanked
    }

    fn next_line(&mut self) -> io::Result<bool> {
        self.line.clear();
        self.pos = 0;
        if self.inner.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(false);
        }
        self.line_no += 1;

        if !is_well_formed(&self.line, self.fields) {
            log::debug!(
                "Line {} does not fit the {}-column header; passing it on as an empty row",
                self.line_no,
                self.fields
            );
            self.blanked += 1;
            self.line.clear();
            self.line.resize(self.fields - 1, b'\t');
            self.line.push(b'\n');
        }
        Ok(true)
    }
}

impl<R: Read> Read for RowGuard<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.line.len() && !self.next_line()? {
            return Ok(0);
        }
        let n = out.len().min(self.line.len() - self.pos);
        out[..n].copy_from_slice(&self.line[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// No more fields than the header, and no quoted field left open.
/// Short rows are left to the reader, which pads them with nulls.
fn is_well_formed(line: &[u8], fields: usize) -> bool {
    let body = line
        .strip_suffix(b"\n")
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
        .unwrap_or(line);
    if body.is_empty() {
        return true;
    }

    let mut count = 0;
    for cell in body.split(|&b| b == b'\t') {
        count += 1;
        if cell.first() == Some(&b'"') && (cell.len() < 2 || cell.last() != Some(&b'"')) {
            return false;
        }
    }
    count <= fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn screen(body: &str, fields: usize) -> String {
        let mut guard = RowGuard::new(BufReader::new(Cursor::new(body.to_string())), fields);
        let mut out = String::new();
        guard.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_rows_that_fit_pass_through() {
        let body = "tt1\tnm1\tactor\ntt1\tnm2\r\n\"quoted\"\tnm3\tactress";
        assert_eq!(screen(body, 3), body);
    }

    #[test]
    fn test_extra_fields_and_open_quotes_are_blanked() {
        let body = "tt1\tnm1\tactor\textra\ntt1\t\"nm2\tdirector\ntt2\tnm3\tactor\n";
        let mut guard = RowGuard::new(BufReader::new(Cursor::new(body)), 3);
        let mut out = String::new();
        guard.read_to_string(&mut out).unwrap();

        assert_eq!(out, "\t\t\n\t\t\ntt2\tnm3\tactor\n");
        assert_eq!(guard.blanked(), 2);
    }
}

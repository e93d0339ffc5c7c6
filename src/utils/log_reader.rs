//! Reading raw pod event logs into memory.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// Raw log file contents, one entry per line (line terminators stripped).
#[derive(Debug, Clone, Default)]
pub struct LogLines {
    lines: Vec<String>,
}

impl LogLines {
    /// Reads every line from `reader`.
    pub fn parse<R: Read>(reader: R) -> std::io::Result<Self> {
        let lines = BufReader::new(reader)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()?;
        Ok(Self { lines })
    }

    /// Reads a whole log file. The handle is closed before this returns.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Self::parse(file)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines with their 1-based line numbers.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_lines_from_reader() {
        let log = LogLines::parse("first\nsecond\r\nthird".as_bytes()).unwrap();

        let lines: Vec<(usize, &str)> = log.numbered().collect();
        assert_eq!(lines, vec![(1, "first"), (2, "second"), (3, "third")]);
    }

    #[test]
    fn reads_lines_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a b c").unwrap();
        writeln!(file, "d e f").unwrap();

        let log = LogLines::read_from_file(file.path()).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LogLines::read_from_file(dir.path().join("missing.txt")).is_err());
    }
}

//! FASTA/FASTQ reading with automatic decompression
//!
//! Records are handed to a callback as borrowed slices. No alphabet checks
//! happen here: characters outside an alphabet are mapped to its sentinels
//! by the conversions, and `seqrank verify` reports them.

use anyhow::{Context, Result};
use needletail::parse_fastx_file;
use std::path::Path;

/// One parsed record
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Header up to the end of line
    pub id: &'a [u8],
    /// Sequence with line breaks removed
    pub seq: &'a [u8],
    /// Quality string (FASTQ only)
    pub qual: Option<&'a [u8]>,
}

impl Record<'_> {
    /// Header as text, lossy for non-UTF-8 bytes
    pub fn name(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.id)
    }
}

/// Parse a FASTA/FASTQ file and call a function for each record
///
/// # Arguments
/// * `path` - Path to input file (may be gzipped)
/// * `callback` - Function called for each record
///
/// # Errors
/// Returns error if the file cannot be opened, the format is invalid, or the
/// callback fails.
pub fn parse_sequences<P, F>(path: P, mut callback: F) -> Result<usize>
where
    P: AsRef<Path>,
    F: FnMut(Record<'_>) -> Result<()>,
{
    let path = path.as_ref();

    // needletail automatically handles gzip decompression
    let mut reader = parse_fastx_file(path)
        .with_context(|| format!("Failed to open sequence file: {}", path.display()))?;

    let mut num_records = 0;
    while let Some(record) = reader.next() {
        let record = record
            .with_context(|| format!("Failed to parse sequence record in {}", path.display()))?;

        let seq = record.seq();
        callback(Record {
            id: record.id(),
            seq: &seq,
            qual: record.qual(),
        })?;
        num_records += 1;
    }

    tracing::debug!("Read {} records from {}", num_records, path.display());
    Ok(num_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_fasta_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, ">seq1 first")?;
        writeln!(temp_file, "ACGT")?;
        writeln!(temp_file, "NNac")?;
        writeln!(temp_file, ">seq2")?;
        writeln!(temp_file, "MKV*X")?;
        temp_file.flush()?;

        let mut records = Vec::new();
        let n = parse_sequences(temp_file.path(), |record| {
            assert!(record.qual.is_none());
            records.push((record.name().into_owned(), record.seq.to_vec()));
            Ok(())
        })?;

        assert_eq!(n, 2);
        assert_eq!(records[0].0, "seq1 first");
        // no validation: ambiguity codes and lower case pass through
        assert_eq!(records[0].1, b"ACGTNNac");
        assert_eq!(records[1].0, "seq2");
        assert_eq!(records[1].1, b"MKV*X");

        Ok(())
    }

    #[test]
    fn test_parse_fastq_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "@read1")?;
        writeln!(temp_file, "ACGTN")?;
        writeln!(temp_file, "+")?;
        writeln!(temp_file, "II#5!")?;
        temp_file.flush()?;

        let mut quals = Vec::new();
        parse_sequences(temp_file.path(), |record| {
            assert_eq!(record.seq, b"ACGTN");
            quals.push(record.qual.map(<[u8]>::to_vec));
            Ok(())
        })?;

        assert_eq!(quals, vec![Some(b"II#5!".to_vec())]);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = parse_sequences("/nonexistent/reads.fa", |_| Ok(())).unwrap_err();
        assert!(err.to_string().contains("Failed to open sequence file"));
    }

    #[test]
    fn test_callback_error_propagates() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, ">a")?;
        writeln!(temp_file, "ACGT")?;
        writeln!(temp_file, ">b")?;
        writeln!(temp_file, "ACGT")?;
        temp_file.flush()?;

        let mut seen = 0;
        let result = parse_sequences(temp_file.path(), |_| {
            seen += 1;
            anyhow::bail!("stop")
        });
        assert!(result.is_err());
        assert_eq!(seen, 1);
        Ok(())
    }
}

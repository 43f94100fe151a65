//! FASTA reading and writing for templates and primer files.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::errors::ConfigError;
use crate::models::primer::{PairId, PairRegistry, PrimerPair};

/// Get a reader for either a gzip'd or non-gzip'd file.
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Extracts one sequence and its full id from a FASTA file.
///
/// With no prefix the first record is taken; otherwise the first record
/// whose id starts with the prefix. The sequence ends at a blank line or at
/// the next header.
///
pub fn find_sequence(path: &Path, id_prefix: Option<&str>) -> Result<(String, String)> {
    let reader = get_dynamic_reader(path)?;
    let mut lines = reader.lines();

    let mut full_id: Option<String> = None;
    match id_prefix {
        None => {
            if let Some(first) = lines.next() {
                let first = first?;
                if let Some(rest) = first.strip_prefix('>') {
                    full_id = rest.split_whitespace().next().map(str::to_string);
                    log::info!(
                        "No sequence id passed, taking first sequence from {:?} with id {}",
                        path,
                        full_id.as_deref().unwrap_or("")
                    );
                }
            }
        }
        Some(prefix) => {
            log::info!("Partial sequence id given: {}", prefix);
            for line in lines.by_ref() {
                let line = line?;
                if let Some(rest) = line.strip_prefix('>') {
                    if rest.starts_with(prefix) {
                        full_id = rest.split_whitespace().next().map(str::to_string);
                        break;
                    }
                }
            }
        }
    }

    let Some(full_id) = full_id else {
        return Err(ConfigError::SequenceNotFound(id_prefix.unwrap_or_default().to_string()).into());
    };

    let mut sequence = String::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('>') {
            break;
        }
        sequence.push_str(line.trim());
    }

    Ok((sequence, full_id))
}

/// Parses every record of a FASTA file into `(id, sequence)` tuples, ids cut
/// at the first whitespace, sequences stripped of line breaks. Records with
/// an empty sequence are dropped.
pub fn parse_fasta_records<R: BufRead>(reader: R) -> Result<Vec<(String, String)>> {
    let mut records = Vec::new();
    let mut current_id = String::new();
    let mut sequence = String::new();

    for line in reader.lines() {
        let line = line?;
        if let Some(rest) = line.strip_prefix('>') {
            if !sequence.is_empty() {
                records.push((std::mem::take(&mut current_id), std::mem::take(&mut sequence)));
            } else {
                current_id.clear();
            }
            current_id.push_str(rest.split_whitespace().next().unwrap_or_default());
        } else {
            sequence.push_str(line.trim());
        }
    }
    if !sequence.is_empty() {
        records.push((current_id, sequence));
    }

    Ok(records)
}

/// The two primer files belonging to one prefix.
pub fn primer_file_names(prefix: &str) -> (PathBuf, PathBuf) {
    (
        PathBuf::from(format!("{prefix}_left.fas")),
        PathBuf::from(format!("{prefix}_right.fas")),
    )
}

/// Writes FASTA records as `>id`, sequence, blank separator line.
pub fn write_fasta<'a, I>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    for (id, sequence) in records {
        writeln!(writer, ">{id}\n{sequence}\n")?;
    }
    writer.flush()?;
    Ok(())
}

///
/// Reads pre-existing primer pairs back into a registry. Pairs are formed
/// positionally: the n-th record of the left file with the n-th record of
/// the right file; unpaired trailing records are discarded.
///
pub fn read_primer_files(prefix: &str) -> Result<PairRegistry> {
    let (left_name, right_name) = primer_file_names(prefix);

    let left = File::open(&left_name)
        .map_err(|_| ConfigError::MissingPrimerFile(left_name.display().to_string()))?;
    let right = File::open(&right_name)
        .map_err(|_| ConfigError::MissingPrimerFile(right_name.display().to_string()))?;

    let left_records = parse_fasta_records(BufReader::new(left))?;
    let right_records = parse_fasta_records(BufReader::new(right))?;
    log::debug!(
        "Extracted {} left and {} right primer records from files with prefix '{}'",
        left_records.len(),
        right_records.len(),
        prefix
    );

    let mut registry = PairRegistry::default();
    for ((left_id, left_seq), (right_id, right_seq)) in
        left_records.into_iter().zip(right_records)
    {
        registry.insert(
            PairId::new(&left_id, &right_id),
            PrimerPair {
                forward: left_seq,
                reverse: right_seq,
            },
        );
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    const TWO_RECORDS: &str = ">seq_alpha some description\nACGTACGT\nTTTT\n\n>seq_beta\nGGGGCCCC\n";

    #[rstest]
    fn first_sequence_is_taken_without_a_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.fas");
        std::fs::write(&path, TWO_RECORDS).unwrap();

        let (sequence, id) = find_sequence(&path, None).unwrap();
        assert_eq!(id, "seq_alpha");
        assert_eq!(sequence, "ACGTACGTTTTT");
    }

    #[rstest]
    fn prefix_selects_a_later_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.fas");
        std::fs::write(&path, TWO_RECORDS).unwrap();

        let (sequence, id) = find_sequence(&path, Some("seq_b")).unwrap();
        assert_eq!(id, "seq_beta");
        assert_eq!(sequence, "GGGGCCCC");
    }

    #[rstest]
    fn unmatched_prefix_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.fas");
        std::fs::write(&path, TWO_RECORDS).unwrap();

        assert!(find_sequence(&path, Some("nope")).is_err());
    }

    #[rstest]
    fn gzipped_input_is_read_transparently() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.fas.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(TWO_RECORDS.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let (sequence, id) = find_sequence(&path, None).unwrap();
        assert_eq!(id, "seq_alpha");
        assert_eq!(sequence, "ACGTACGTTTTT");
    }

    #[rstest]
    fn records_parse_with_ids_cut_at_whitespace() {
        let records = parse_fasta_records(Cursor::new(TWO_RECORDS)).unwrap();
        assert_eq!(
            records,
            vec![
                ("seq_alpha".to_string(), "ACGTACGTTTTT".to_string()),
                ("seq_beta".to_string(), "GGGGCCCC".to_string()),
            ]
        );
    }

    #[rstest]
    fn primer_files_round_trip_into_a_registry() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("primers").display().to_string();
        let (left_path, right_path) = primer_file_names(&prefix);

        write_fasta(
            &left_path,
            vec![("fwd_0", "ACGTACGTACGT"), ("fwd_1", "TTTTGGGGCCCC")],
        )
        .unwrap();
        write_fasta(
            &right_path,
            vec![("rev_0", "GGCCGGCCGGCC"), ("rev_1", "AATTAATTAATT")],
        )
        .unwrap();

        let registry = read_primer_files(&prefix).unwrap();
        assert_eq!(registry.len(), 2);

        let pair = registry.get(&PairId::new("fwd_1", "rev_1")).unwrap();
        assert_eq!(pair.forward, "TTTTGGGGCCCC");
        assert_eq!(pair.reverse, "AATTAATTAATT");
    }

    #[rstest]
    fn unpaired_trailing_records_are_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("primers").display().to_string();
        let (left_path, right_path) = primer_file_names(&prefix);

        write_fasta(
            &left_path,
            vec![("fwd_0", "ACGTACGTACGT"), ("fwd_1", "TTTTGGGGCCCC")],
        )
        .unwrap();
        write_fasta(&right_path, vec![("rev_0", "GGCCGGCCGGCC")]).unwrap();

        let registry = read_primer_files(&prefix).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[rstest]
    fn missing_primer_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("absent").display().to_string();

        assert!(read_primer_files(&prefix).is_err());
    }
}

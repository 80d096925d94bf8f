use crate::common_io::{open_buf_reader, write_types};
use std::io::BufRead;

/// Raw rating triplet keyed by external ids.
pub type RawTriplet = (u64, u64, f64);

///
/// Read `user item value` triplets from a delimited text file.
///
/// * `input_file` - file name--either gzipped or not; lines starting
///   with `#` or `%` are treated as comments; fields are separated by
///   any run of whitespace.
///
pub fn read_rating_triplets(input_file: &str) -> anyhow::Result<Vec<RawTriplet>> {
    let buf: Box<dyn BufRead> = open_buf_reader(input_file)?;
    let mut triplets = vec![];

    for (line_no, line) in buf.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
            continue;
        }

        let mut words = line.split_whitespace();
        let parsed = (|| -> Option<RawTriplet> {
            let user = words.next()?.parse::<u64>().ok()?;
            let item = words.next()?.parse::<u64>().ok()?;
            let value = words.next()?.parse::<f64>().ok()?;
            Some((user, item, value))
        })();

        match parsed {
            Some(triplet) => triplets.push(triplet),
            None => {
                anyhow::bail!(
                    "failed to parse rating triplet at line {}: '{}'",
                    line_no + 1,
                    line
                );
            }
        }
    }

    Ok(triplets)
}

///
/// Write `user item value` triplets, tab-separated, one per line.
///
/// * `output_file` - file name--either gzipped or not
///
pub fn write_rating_triplets(triplets: &[RawTriplet], output_file: &str) -> anyhow::Result<()> {
    let lines: Vec<String> = triplets
        .iter()
        .map(|&(user, item, value)| format!("{}\t{}\t{}", user, item, value))
        .collect();
    write_types(&lines, output_file)
}

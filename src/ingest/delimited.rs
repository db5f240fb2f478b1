use csv::{ReaderBuilder, StringRecord};
use std::{fs::File, path::Path};

use crate::error::Result;

/// Read every row of a CSV export, header rows included.
pub fn read_rows(path: &Path) -> Result<Vec<StringRecord>> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // width is checked per row by the caller
        .from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(result?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_quoted_fields_and_ragged_rows() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "a,b\n\"O'Brien County\",\"1,000\",x\n").unwrap();

        let rows = read_rows(tmp.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(&rows[1][0], "O'Brien County");
        assert_eq!(&rows[1][1], "1,000");
    }
}

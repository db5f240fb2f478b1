use calamine::{open_workbook, Data, Reader, Xlsx};
use csv::StringRecord;
use std::path::Path;

use crate::error::{LimitsError, Result};

/// Read the first worksheet as text rows.
pub fn read_rows(path: &Path) -> Result<Vec<StringRecord>> {
    let mut workbook = open_workbook::<Xlsx<_>, _>(path)
        .map_err(|e| LimitsError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LimitsError::MissingWorksheet)?
        .map_err(|e| LimitsError::Spreadsheet(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<StringRecord>())
        .collect())
}

/// Integral floats are written without a fractional part so limits and FIPS
/// codes read back as integers.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
        other => other.to_string(),
    }
}

/// Builds a minimal single-sheet workbook for tests. Cells in columns F..I
/// that parse as numbers are stored as numeric cells, everything else as
/// inline strings; empty cells are omitted.
#[cfg(test)]
pub(crate) fn write_test_workbook(rows: &[Vec<&str>]) -> anyhow::Result<tempfile::NamedTempFile> {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    fn xml_text(s: &str) -> String {
        s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let last_col = (b'A' + (width - 1) as u8) as char;
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    sheet.push_str(&format!(r#"<dimension ref="A1:{}{}"/><sheetData>"#, last_col, rows.len()));
    for (r, row) in rows.iter().enumerate() {
        sheet.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let cell_ref = format!("{}{}", (b'A' + c as u8) as char, r + 1);
            if c >= 5 && value.parse::<f64>().is_ok() {
                sheet.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, value));
            } else {
                sheet.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    cell_ref,
                    xml_text(value)
                ));
            }
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let parts: [(&str, &str); 4] = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#,
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
        ),
    ];

    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, body) in parts {
            zip.start_file(name, options)?;
            zip.write_all(body.as_bytes())?;
        }
        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(sheet.as_bytes())?;
        zip.finish()?;
    }

    let mut tmp = tempfile::Builder::new().suffix(".xlsx").tempfile()?;
    tmp.write_all(&buf)?;
    tmp.flush()?;
    Ok(tmp)
}

#[cfg(test)]
pub(crate) fn sheet_header() -> Vec<Vec<&'static str>> {
    vec![
        vec!["FHFA Conforming Loan Limits", "", "", "", "", "", "", "", ""],
        vec![
            "FIPS State Code",
            "FIPS County Code",
            "County Name",
            "State",
            "CBSA Number",
            "One-Unit Limit",
            "Two-Unit Limit",
            "Three-Unit Limit",
            "Four-Unit Limit",
        ],
    ]
}

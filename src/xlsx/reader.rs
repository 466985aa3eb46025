//! Worksheet row reader.

use crate::container::OoxmlContainer;
use crate::error::Result;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;
use std::rc::Rc;

use super::shared_strings::SharedStrings;

/// Location of the optional shared-string table.
pub const SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";

/// Location of the only worksheet that is read.
pub const SHEET_PATH: &str = "xl/worksheets/sheet1.xml";

/// One data row of the worksheet, keyed by header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    row: usize,
    values: HashMap<String, String>,
}

impl RawRow {
    /// Create a row from header/value pairs.
    ///
    /// A header that appears twice keeps its last value.
    pub fn new<K, V>(row: usize, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            row,
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Cell text under `column`, or `""` when the column is absent.
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    /// 1-based row number in the sheet.
    pub fn row_number(&self) -> usize {
        self.row
    }
}

/// Reader for the first worksheet of an XLSX workbook.
///
/// # Example
///
/// ```no_run
/// use swarmset::xlsx::WorkbookReader;
///
/// let reader = WorkbookReader::open("telemetry.xlsx")?;
/// for row in reader.rows() {
///     let row = row?;
///     println!("{} @ {}", row.get("DroneID"), row.get("TimePoint"));
/// }
/// # Ok::<(), swarmset::Error>(())
/// ```
#[derive(Debug)]
pub struct WorkbookReader {
    shared_strings: SharedStrings,
    sheet_xml: String,
}

impl WorkbookReader {
    /// Open an XLSX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_container(&OoxmlContainer::open(path)?)
    }

    /// Create a reader from the workbook bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_container(&OoxmlContainer::from_bytes(data)?)
    }

    /// Create a reader from any seekable source.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_container(&OoxmlContainer::from_reader(reader)?)
    }

    fn from_container(container: &OoxmlContainer) -> Result<Self> {
        let shared_strings = match container.read_optional_xml(SHARED_STRINGS_PATH)? {
            Some(xml) => SharedStrings::parse(&xml)?,
            None => SharedStrings::default(),
        };
        let sheet_xml = container.read_xml(SHEET_PATH)?;

        Ok(Self {
            shared_strings,
            sheet_xml,
        })
    }

    /// The workbook's shared-string table.
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// Iterate over the data rows, header row excluded.
    ///
    /// Rows are decoded as the iterator advances. The first error ends the
    /// iteration.
    pub fn rows(&self) -> RawRows<'_> {
        RawRows {
            reader: quick_xml::Reader::from_str(&self.sheet_xml),
            shared_strings: &self.shared_strings,
            headers: None,
            last_row: 0,
            done: false,
        }
    }
}

/// Lazy iterator over [`RawRow`]s. See [`WorkbookReader::rows`].
pub struct RawRows<'a> {
    reader: quick_xml::Reader<&'a [u8]>,
    shared_strings: &'a SharedStrings,
    headers: Option<Rc<[String]>>,
    last_row: usize,
    done: bool,
}

/// Cells of one `<row>` in column order.
struct SheetRow {
    number: usize,
    cells: Vec<String>,
}

impl SheetRow {
    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// Cell currently being decoded.
struct PendingCell {
    reference: Option<String>,
    cell_type: Option<String>,
    has_value: bool,
    text: String,
}

impl RawRows<'_> {
    /// Header names, once the header row has been read.
    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    fn next_sheet_row(&mut self) -> Result<Option<SheetRow>> {
        let mut row: Option<SheetRow> = None;
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_inline = false;
        let mut phonetic_depth = 0usize;

        loop {
            match self.reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"row" => row = Some(self.open_row(&e)),
                    b"c" if row.is_some() => cell = Some(open_cell(&e)),
                    b"v" => {
                        if let Some(cell) = cell.as_mut() {
                            cell.has_value = true;
                            in_value = true;
                        }
                    }
                    b"is" if cell.is_some() => in_inline = true,
                    b"rPh" if in_inline => phonetic_depth += 1,
                    b"t" if in_inline && phonetic_depth == 0 => in_value = true,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"row" => return Ok(Some(self.open_row(&e))),
                    b"c" => {
                        if let Some(row) = row.as_mut() {
                            place(row, open_cell(&e).reference.as_deref(), String::new());
                        }
                    }
                    b"v" => {
                        if let Some(cell) = cell.as_mut() {
                            cell.has_value = true;
                        }
                    }
                    _ => {}
                },
                Event::Text(e) if in_value => {
                    if let Some(cell) = cell.as_mut() {
                        cell.text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) if in_value => {
                    if let Some(cell) = cell.as_mut() {
                        cell.text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"row" => return Ok(row),
                    b"c" => {
                        if let (Some(row), Some(done)) = (row.as_mut(), cell.take()) {
                            let value = self.resolve(&done, row)?;
                            place(row, done.reference.as_deref(), value);
                        }
                        in_value = false;
                        in_inline = false;
                        phonetic_depth = 0;
                    }
                    b"v" | b"t" => in_value = false,
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"is" => in_inline = false,
                    _ => {}
                },
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    fn open_row(&mut self, e: &BytesStart<'_>) -> SheetRow {
        let number = attribute(e, b"r")
            .and_then(|r| r.trim().parse::<usize>().ok())
            .unwrap_or(self.last_row + 1);
        self.last_row = number;
        SheetRow {
            number,
            cells: Vec::new(),
        }
    }

    fn resolve(&self, cell: &PendingCell, row: &SheetRow) -> Result<String> {
        match cell.cell_type.as_deref() {
            Some("s") if cell.has_value => {
                let label = cell
                    .reference
                    .clone()
                    .unwrap_or_else(|| format!("#{} in row {}", row.cells.len() + 1, row.number));
                Ok(self.shared_strings.resolve(&cell.text, &label)?.to_string())
            }
            _ => Ok(cell.text.clone()),
        }
    }

    fn emit(&self, headers: &[String], row: SheetRow) -> RawRow {
        let SheetRow { number, mut cells } = row;
        cells.resize(headers.len(), String::new());
        RawRow::new(number, headers.iter().cloned().zip(cells))
    }
}

impl Iterator for RawRows<'_> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let row = match self.next_sheet_row() {
                Ok(Some(row)) => row,
                Ok(None) => {
                    self.done = true;
                    if self.headers.is_none() {
                        log::warn!("worksheet has no header row");
                    }
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            if row.is_blank() {
                log::debug!("sheet row {}: blank, skipped", row.number);
                continue;
            }

            match self.headers.clone() {
                Some(headers) => return Some(Ok(self.emit(&headers, row))),
                None => {
                    let headers: Rc<[String]> =
                        row.cells.iter().map(|h| h.trim().to_string()).collect();
                    log::debug!("sheet row {}: {} header columns", row.number, headers.len());
                    self.headers = Some(headers);
                }
            }
        }
        None
    }
}

fn open_cell(e: &BytesStart<'_>) -> PendingCell {
    PendingCell {
        reference: attribute(e, b"r"),
        cell_type: attribute(e, b"t"),
        has_value: false,
        text: String::new(),
    }
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Store `value` at the column named by `reference`, or after the last cell.
fn place(row: &mut SheetRow, reference: Option<&str>, value: String) {
    let column = reference
        .and_then(column_index)
        .unwrap_or(row.cells.len());
    if column >= row.cells.len() {
        row.cells.resize(column + 1, String::new());
    }
    row.cells[column] = value;
}

/// Zero-based column of an A1-style reference (`"C7"` -> 2).
pub(crate) fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .collect();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let column = letters.iter().fold(0usize, |acc, b| {
        acc * 26 + usize::from(b.to_ascii_uppercase() - b'A' + 1)
    });
    Some(column - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sheet(rows: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            rows
        )
    }

    fn reader(shared: &str, rows: &str) -> WorkbookReader {
        WorkbookReader {
            shared_strings: SharedStrings::parse(shared).unwrap(),
            sheet_xml: sheet(rows),
        }
    }

    const SHARED: &str = "<sst><si><t>DroneID</t></si><si><t>TimePoint</t></si><si><t>State</t></si><si><t>TP1</t></si></sst>";

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("C7"), Some(2));
        assert_eq!(column_index("Z3"), Some(25));
        assert_eq!(column_index("AA10"), Some(26));
        assert_eq!(column_index("7"), None);
    }

    #[test]
    fn test_header_then_rows() {
        let r = reader(
            SHARED,
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c></row>
<row r="2"><c r="A2"><v>7</v></c><c r="B2" t="s"><v>3</v></c><c r="C2" t="inlineStr"><is><t>Patrol</t></is></c></row>"#,
        );

        let rows: Vec<RawRow> = r.rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number(), 2);
        assert_eq!(rows[0].get("DroneID"), "7");
        assert_eq!(rows[0].get("TimePoint"), "TP1");
        assert_eq!(rows[0].get("State"), "Patrol");
        assert_eq!(rows[0].get("Battery Percentage"), "");
    }

    #[test]
    fn test_sparse_and_short_rows() {
        let r = reader(
            SHARED,
            r#"<row r="1"><c t="s"><v>0</v></c><c t="s"><v>1</v></c><c t="s"><v>2</v></c></row>
<row r="2"><c r="A2"><v>3</v></c><c r="C2" t="str"><v>Idle</v></c></row>
<row r="3"><c><v>4</v></c></row>"#,
        );

        let rows: Vec<RawRow> = r.rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("DroneID"), "3");
        assert_eq!(rows[0].get("TimePoint"), "");
        assert_eq!(rows[0].get("State"), "Idle");
        assert_eq!(rows[1].get("DroneID"), "4");
        assert_eq!(rows[1].get("State"), "");
    }

    #[test]
    fn test_blank_rows_skipped() {
        let r = reader(
            SHARED,
            r#"<row r="1"/>
<row r="2"><c r="A2" t="str"><v>  </v></c></row>
<row r="3"><c t="s"><v>0</v></c><c t="s"><v>1</v></c></row>
<row r="4"></row>
<row r="5"><c r="A5"/><c r="B5" t="s"></c></row>
<row r="6"><c r="A6"><v>12</v></c></row>"#,
        );

        let mut rows = r.rows();
        let first = rows.next().unwrap().unwrap();
        assert_eq!(first.row_number(), 6);
        assert_eq!(first.get("DroneID"), "12");
        assert_eq!(rows.headers().map(<[String]>::len), Some(2));
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_inline_rich_text() {
        let r = reader(
            SHARED,
            r#"<row r="1"><c t="s"><v>0</v></c><c t="s"><v>1</v></c><c t="s"><v>2</v></c></row>
<row r="2"><c r="A2"><v>5</v></c><c r="B2" t="s"><v>3</v></c><c r="C2" t="inlineStr"><is><r><t>Return </t></r><r><t>to Base</t></r><rPh sb="0" eb="1"><t>ritan</t></rPh></is></c></row>"#,
        );

        let rows: Vec<RawRow> = r.rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows[0].get("State"), "Return to Base");
    }

    #[test]
    fn test_header_only() {
        let r = reader(SHARED, r#"<row r="1"><c t="s"><v>0</v></c></row>"#);
        assert_eq!(r.rows().count(), 0);
    }

    #[test]
    fn test_unresolvable_shared_string() {
        let r = reader(
            SHARED,
            r#"<row r="1"><c t="s"><v>0</v></c></row><row r="2"><c r="A2" t="s"><v>42</v></c></row>"#,
        );

        let results: Vec<Result<RawRow>> = r.rows().collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(
            &results[0],
            Err(Error::SharedStringIndex { cell, .. }) if cell == "A2"
        ));
    }

    #[test]
    fn test_malformed_sheet() {
        let r = reader(SHARED, r#"<row r="1"><c t="s"><v>0</v></row>"#);
        let results: Vec<Result<RawRow>> = r.rows().collect();
        assert!(matches!(results.as_slice(), [Err(Error::XmlParse(_))]));
    }
}

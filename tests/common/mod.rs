//! Synthetic telemetry workbooks for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const HEADERS: [&str; 17] = [
    "DroneID",
    "TimePoint",
    "SwarmID",
    "TaskID",
    "State",
    "PositionX",
    "PositionY",
    "PositionZ",
    "VelocityX",
    "VelocityY",
    "VelocityZ",
    "Pitch",
    "Roll",
    "Yaw",
    "Battery Percentage",
    "Detection Range(Circle)",
    "Notes",
];

/// Builds an XLSX package in memory.
///
/// Text cells go through the shared-string table, numeric-looking cells are
/// written as plain `<v>` values, mirroring what Excel produces.
#[derive(Default)]
pub struct WorkbookBuilder {
    rows: Vec<Vec<String>>,
    shared: Vec<String>,
    raw_rows: Vec<String>,
    with_shared_strings: bool,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self {
            with_shared_strings: true,
            ..Default::default()
        }
    }

    /// Start with the full telemetry header row.
    pub fn telemetry() -> Self {
        Self::new().row(&HEADERS)
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Row from `(header, value)` pairs laid out under [`HEADERS`].
    pub fn record(self, pairs: &[(&str, &str)]) -> Self {
        let cells: Vec<&str> = HEADERS
            .iter()
            .map(|h| {
                pairs
                    .iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| *v)
                    .unwrap_or("")
            })
            .collect();
        self.row(&cells)
    }

    /// Append literal `<row>` XML after the generated rows.
    pub fn raw_row(mut self, xml: &str) -> Self {
        self.raw_rows.push(xml.to_string());
        self
    }

    /// Write text cells as inline strings and omit `xl/sharedStrings.xml`.
    pub fn inline_strings(mut self) -> Self {
        self.with_shared_strings = false;
        self
    }

    fn shared_index(&mut self, text: &str) -> usize {
        match self.shared.iter().position(|s| s == text) {
            Some(i) => i,
            None => {
                self.shared.push(text.to_string());
                self.shared.len() - 1
            }
        }
    }

    fn sheet_xml(&mut self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        let rows = std::mem::take(&mut self.rows);
        for (r, cells) in rows.iter().enumerate() {
            let row_number = r + 1;
            xml.push_str(&format!("<row r=\"{}\">", row_number));
            for (c, value) in cells.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let reference = format!("{}{}", column_name(c), row_number);
                if value.parse::<f64>().is_ok() {
                    xml.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, value));
                } else if self.with_shared_strings {
                    let idx = self.shared_index(value);
                    xml.push_str(&format!("<c r=\"{}\" t=\"s\"><v>{}</v></c>", reference, idx));
                } else {
                    xml.push_str(&format!(
                        "<c r=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                        reference,
                        escape(value)
                    ));
                }
            }
            xml.push_str("</row>");
        }
        for raw in &self.raw_rows {
            xml.push_str(raw);
        }
        xml.push_str("</sheetData></worksheet>");
        xml
    }

    fn shared_strings_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
            self.shared.len()
        );
        for s in &self.shared {
            xml.push_str(&format!("<si><t>{}</t></si>", escape(s)));
        }
        xml.push_str("</sst>");
        xml
    }

    pub fn build(mut self) -> Vec<u8> {
        let sheet = self.sheet_xml();
        let mut parts = vec![
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("xl/workbook.xml", WORKBOOK.to_string()),
            ("xl/worksheets/sheet1.xml", sheet),
        ];
        if self.with_shared_strings {
            parts.push(("xl/sharedStrings.xml", self.shared_strings_xml()));
        }
        package(&parts)
    }
}

/// Zip the given parts.
pub fn package(parts: &[(&str, String)]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, body) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="Telemetry" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

//! ZIP container access for OOXML workbooks.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use zip::result::ZipError;

/// In-memory view over the ZIP archive of a workbook package.
///
/// The whole package is held in memory; parts are inflated on demand.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

/// Decode XML part bytes to a string.
///
/// Parts are UTF-8 in practice, but a UTF-8 BOM or a UTF-16 BOM (either byte
/// order) is honored. The declaration of a UTF-16 part is rewritten to
/// `UTF-8` so quick-xml does not try to decode it a second time.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec()).map_err(invalid_text),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes).map(|s| retag_utf8(&s)),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes).map(|s| retag_utf8(&s)),
        _ => String::from_utf8(bytes.to_vec()).map_err(invalid_text),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(invalid_text)
}

fn invalid_text(err: impl std::fmt::Display) -> Error {
    Error::XmlParse(format!("undecodable XML text: {}", err))
}

/// Rewrite a `UTF-16` encoding declaration to `UTF-8`.
fn retag_utf8(content: &str) -> String {
    let Some(end) = content
        .starts_with("<?xml")
        .then(|| content.find("?>"))
        .flatten()
    else {
        return content.to_string();
    };

    let (decl, rest) = content.split_at(end + 2);
    let fixed = ["\"UTF-16\"", "'UTF-16'", "\"utf-16\"", "'utf-16'"]
        .iter()
        .fold(decl.to_string(), |d, needle| {
            d.replace(&format!("encoding={}", needle), "encoding=\"UTF-8\"")
        });
    format!("{}{}", fixed, rest)
}

impl OoxmlContainer {
    /// Open a workbook package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use swarmset::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("telemetry.xlsx")?;
    /// assert!(container.exists("xl/worksheets/sheet1.xml"));
    /// # Ok::<(), swarmset::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Create a container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Create a container from a reader, buffering it fully.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read an XML part as a string.
    ///
    /// A part that is absent yields [`Error::MissingComponent`]; a part that
    /// is present but corrupt yields [`Error::ZipArchive`].
    pub fn read_xml(&self, path: &str) -> Result<String> {
        self.read_optional_xml(path)?
            .ok_or_else(|| Error::MissingComponent(path.to_string()))
    }

    /// Read an XML part that the package is allowed to omit.
    pub fn read_optional_xml(&self, path: &str) -> Result<Option<String>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = match archive.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| Error::ZipArchive(format!("{}: {}", path, e)))?;
        decode_xml_bytes(&bytes).map(Some)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// List all parts in the archive.
    pub fn list_files(&self) -> Vec<String> {
        self.archive
            .borrow()
            .file_names()
            .map(String::from)
            .collect()
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.list_files().len())
            .finish()
    }
}

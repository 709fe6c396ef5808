use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::error::{DecodeError, EncodeError, Result};

static QUOTED_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"]+)""#).expect("quoted filename pattern is valid")
});

/// An NZB document: an optional header and the files it describes.
///
/// All attribute values are kept exactly as they appear in the XML. A
/// document without a `<head>` element has an empty [`Head`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nzb {
    pub head: Head,
    pub files: Vec<NzbFile>,
}

/// Descriptive metadata from `<head>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Head {
    pub meta: Vec<Meta>,
}

/// A `<meta type="...">value</meta>` pair. Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub kind: String,
    pub value: String,
}

/// A single file available for download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NzbFile {
    pub poster: String,
    /// Server-supplied timestamp, not interpreted
    pub date: String,
    pub subject: String,
    pub groups: Groups,
    pub segments: Segments,
}

/// Mirrors the `<groups>` wrapper element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Groups {
    pub group: Vec<Group>,
}

/// A newsgroup the file was posted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub name: String,
}

/// Mirrors the `<segments>` wrapper element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    pub segment: Vec<Segment>,
}

/// One article holding part of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    pub bytes: String,
    /// 1-based position within the file
    pub number: String,
    pub message_id: String,
}

impl Nzb {
    /// Decode an NZB document from raw bytes, honouring its declared encoding.
    pub fn from_bytes(data: &[u8]) -> std::result::Result<Self, DecodeError> {
        super::decode::decode(data)
    }

    /// Read and decode an NZB file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self::from_bytes(&data)?)
    }

    /// The output-format value tree (wrappers flattened).
    pub fn to_json_value(&self) -> serde_json::Value {
        super::shape::to_value(self)
    }

    /// Indented JSON text.
    pub fn to_json(&self) -> std::result::Result<String, EncodeError> {
        Ok(serde_json::to_string_pretty(&self.to_json_value())?)
    }

    pub fn to_json_compact(&self) -> std::result::Result<String, EncodeError> {
        Ok(serde_json::to_string(&self.to_json_value())?)
    }

    /// Stream JSON into `writer`, indented when `pretty` is set.
    pub fn write_json<W: std::io::Write>(
        &self,
        writer: W,
        pretty: bool,
    ) -> std::result::Result<(), EncodeError> {
        let value = self.to_json_value();
        if pretty {
            serde_json::to_writer_pretty(writer, &value)?;
        } else {
            serde_json::to_writer(writer, &value)?;
        }
        Ok(())
    }

    /// First meta value with the given type, e.g. `title` or `password`.
    pub fn meta(&self, kind: &str) -> Option<&str> {
        self.head
            .meta
            .iter()
            .find(|m| m.kind == kind)
            .map(|m| m.value.as_str())
    }

    pub fn total_segments(&self) -> usize {
        self.files.iter().map(|f| f.segments.segment.len()).sum()
    }

    /// Sum of all segment sizes that parse as integers.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(NzbFile::total_bytes).sum()
    }

    /// Everything except PAR2 recovery files.
    pub fn main_files(&self) -> Vec<&NzbFile> {
        self.files.iter().filter(|f| !f.is_par2()).collect()
    }

    pub fn par2_files(&self) -> Vec<&NzbFile> {
        self.files.iter().filter(|f| f.is_par2()).collect()
    }
}

impl NzbFile {
    /// File name quoted in the subject line, as in
    /// `[1/9] - "filename.ext" yEnc (1/5202)`.
    pub fn filename(&self) -> Option<&str> {
        QUOTED_FILENAME
            .captures(&self.subject)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn is_par2(&self) -> bool {
        let subject = self.subject.to_lowercase();
        subject.contains(".par2") || (subject.contains(".par") && !subject.contains(".part"))
    }

    pub fn total_bytes(&self) -> u64 {
        self.segments
            .segment
            .iter()
            .filter_map(Segment::byte_count)
            .sum()
    }
}

impl Segment {
    /// The `bytes` attribute as a number, if it is one.
    pub fn byte_count(&self) -> Option<u64> {
        self.bytes.trim().parse().ok()
    }

    /// The `number` attribute as a number, if it is one.
    pub fn position(&self) -> Option<u32> {
        self.number.trim().parse().ok()
    }
}

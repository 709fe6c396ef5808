//! NZB XML decoder.
//!
//! Input bytes are transcoded to UTF-8 first, then walked with a pull
//! parser. A stack of open elements tracks where we are in the schema so
//! misplaced elements are rejected instead of silently dropped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::mem;

use super::charset;
use super::model::{Group, Meta, Nzb, NzbFile, Segment};
use super::schema::xml;
use crate::error::DecodeError;

/// Decode a complete NZB document.
pub fn decode(data: &[u8]) -> Result<Nzb, DecodeError> {
    let text = charset::transcode(data)?;
    let mut reader = Reader::from_str(&text);
    let mut builder = Builder::default();

    loop {
        builder.position = reader.buffer_position() as u64;

        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                return Err(DecodeError::Xml {
                    position: reader.error_position() as u64,
                    source,
                })
            }
        };

        match event {
            Event::Start(ref e) => builder.start(e)?,
            Event::Empty(ref e) => {
                builder.start(e)?;
                builder.end();
            }
            Event::End(_) => builder.end(),
            Event::Text(ref e) if builder.in_leaf() => {
                let text = e.unescape().map_err(|source| builder.xml_error(source))?;
                builder.text.push_str(&text);
            }
            Event::CData(ref e) if builder.in_leaf() => {
                // already UTF-8, it came from a &str
                builder.text.push_str(&String::from_utf8_lossy(e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    builder.finish()
}

/// An open element.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Frame {
    Nzb,
    Head,
    Meta,
    File,
    Groups,
    Group,
    Segments,
    Segment,
    /// An element outside the NZB vocabulary, ignored with its subtree
    Skipped(String),
}

impl Frame {
    fn name(&self) -> &str {
        match self {
            Frame::Nzb => xml::NZB,
            Frame::Head => xml::HEAD,
            Frame::Meta => xml::META,
            Frame::File => xml::FILE,
            Frame::Groups => xml::GROUPS,
            Frame::Group => xml::GROUP,
            Frame::Segments => xml::SEGMENTS,
            Frame::Segment => xml::SEGMENT,
            Frame::Skipped(name) => name,
        }
    }

    /// Elements whose text content is the value.
    fn is_leaf(&self) -> bool {
        matches!(self, Frame::Meta | Frame::Group | Frame::Segment)
    }
}

#[derive(Default)]
struct Builder {
    nzb: Nzb,
    seen_root: bool,
    stack: Vec<Frame>,
    /// Text collected for the open leaf element
    text: String,
    meta: Meta,
    segment: Segment,
    position: u64,
}

impl Builder {
    fn in_leaf(&self) -> bool {
        self.stack.last().is_some_and(Frame::is_leaf)
    }

    fn xml_error(&self, source: quick_xml::Error) -> DecodeError {
        DecodeError::Xml {
            position: self.position,
            source,
        }
    }

    fn start(&mut self, e: &BytesStart<'_>) -> Result<(), DecodeError> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let parent = self.stack.last().cloned();

        let frame = match (parent.as_ref(), name.as_str()) {
            (Some(Frame::Skipped(_)), _) => Frame::Skipped(name.clone()),
            (None, xml::NZB) if !self.seen_root => {
                self.seen_root = true;
                Frame::Nzb
            }
            (Some(Frame::Nzb), xml::HEAD) => Frame::Head,
            (Some(Frame::Nzb), xml::FILE) => {
                self.begin_file(e)?;
                Frame::File
            }
            (Some(Frame::Head), xml::META) => {
                self.begin_meta(e)?;
                Frame::Meta
            }
            (Some(Frame::File), xml::GROUPS) => Frame::Groups,
            (Some(Frame::File), xml::SEGMENTS) => Frame::Segments,
            (Some(Frame::Groups), xml::GROUP) => {
                self.text.clear();
                Frame::Group
            }
            (Some(Frame::Segments), xml::SEGMENT) => {
                self.begin_segment(e)?;
                Frame::Segment
            }
            (Some(parent), _) if !parent.is_leaf() && !xml::is_known(&name) => {
                Frame::Skipped(name.clone())
            }
            (parent, _) => {
                return Err(DecodeError::UnexpectedElement {
                    parent: parent.map_or_else(
                        || "document".to_string(),
                        |p| format!("<{}>", p.name()),
                    ),
                    element: name.clone(),
                })
            }
        };

        self.stack.push(frame);
        Ok(())
    }

    fn end(&mut self) {
        // The reader has already matched end tags against start tags.
        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame {
            Frame::Meta => {
                let mut meta = mem::take(&mut self.meta);
                meta.value = mem::take(&mut self.text);
                self.nzb.head.meta.push(meta);
            }
            Frame::Group => {
                let name = mem::take(&mut self.text);
                if let Some(file) = self.nzb.files.last_mut() {
                    file.groups.group.push(Group { name });
                }
            }
            Frame::Segment => {
                let mut segment = mem::take(&mut self.segment);
                segment.message_id = mem::take(&mut self.text);
                if let Some(file) = self.nzb.files.last_mut() {
                    file.segments.segment.push(segment);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<Nzb, DecodeError> {
        if let Some(open) = self.stack.last() {
            return Err(DecodeError::UnclosedElement(open.name().to_string()));
        }
        if !self.seen_root {
            return Err(DecodeError::MissingRoot);
        }
        Ok(self.nzb)
    }

    fn begin_file(&mut self, e: &BytesStart<'_>) -> Result<(), DecodeError> {
        let mut file = NzbFile::default();
        for (key, value) in self.attributes(e)? {
            match key.as_str() {
                xml::FILE_POSTER => file.poster = value,
                xml::FILE_DATE => file.date = value,
                xml::FILE_SUBJECT => file.subject = value,
                _ => {}
            }
        }
        self.nzb.files.push(file);
        Ok(())
    }

    fn begin_meta(&mut self, e: &BytesStart<'_>) -> Result<(), DecodeError> {
        self.meta = Meta::default();
        self.text.clear();
        for (key, value) in self.attributes(e)? {
            if key == xml::META_TYPE {
                self.meta.kind = value;
            }
        }
        Ok(())
    }

    fn begin_segment(&mut self, e: &BytesStart<'_>) -> Result<(), DecodeError> {
        self.segment = Segment::default();
        self.text.clear();
        for (key, value) in self.attributes(e)? {
            match key.as_str() {
                xml::SEGMENT_BYTES => self.segment.bytes = value,
                xml::SEGMENT_NUMBER => self.segment.number = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Attributes as (local name, unescaped value) pairs.
    fn attributes(&self, e: &BytesStart<'_>) -> Result<Vec<(String, String)>, DecodeError> {
        let mut out = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|source| self.xml_error(source))?
                .into_owned();
            out.push((key, value));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nzb PUBLIC "-//newzBin//DTD NZB 1.1//EN" "http://www.newzbin.com/DTD/nzb/nzb-1.1.dtd">
<nzb xmlns="http://www.newzbin.com/DTD/2003/nzb">
  <head>
    <meta type="title">Test File</meta>
    <meta type="password">secret123</meta>
  </head>
  <file poster="user@example.com" date="1234567890" subject="Test [1/1]">
    <groups>
      <group>alt.binaries.test</group>
      <group>alt.binaries.backup</group>
    </groups>
    <segments>
      <segment bytes="768000" number="1">part1of2@example.com</segment>
      <segment bytes="512" number="2">part2of2@example.com</segment>
    </segments>
  </file>
</nzb>"#;

    #[test]
    fn test_decode_simple() {
        let nzb = decode(SIMPLE.as_bytes()).unwrap();

        assert_eq!(nzb.head.meta.len(), 2);
        assert_eq!(nzb.head.meta[0].kind, "title");
        assert_eq!(nzb.head.meta[0].value, "Test File");
        assert_eq!(nzb.meta("password"), Some("secret123"));

        assert_eq!(nzb.files.len(), 1);
        let file = &nzb.files[0];
        assert_eq!(file.poster, "user@example.com");
        assert_eq!(file.date, "1234567890");
        assert_eq!(file.subject, "Test [1/1]");

        let groups: Vec<&str> = file.groups.group.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(groups, ["alt.binaries.test", "alt.binaries.backup"]);

        assert_eq!(file.segments.segment.len(), 2);
        let seg = &file.segments.segment[1];
        assert_eq!(seg.bytes, "512");
        assert_eq!(seg.number, "2");
        assert_eq!(seg.message_id, "part2of2@example.com");
    }

    #[test]
    fn test_files_keep_input_order() {
        let mut xml = String::from("<nzb>");
        for i in 0..5 {
            xml.push_str(&format!(
                r#"<file poster="p" date="{i}" subject="file {i}"><groups><group>g</group></groups><segments><segment bytes="1" number="1">{i}@x</segment></segments></file>"#
            ));
        }
        xml.push_str("</nzb>");

        let nzb = decode(xml.as_bytes()).unwrap();
        assert_eq!(nzb.files.len(), 5);
        for (i, file) in nzb.files.iter().enumerate() {
            assert_eq!(file.subject, format!("file {i}"));
        }
    }

    #[test]
    fn test_segment_order_is_preserved_not_sorted() {
        let xml = r#"<nzb><file><groups/><segments>
            <segment bytes="3" number="3">c@x</segment>
            <segment bytes="1" number="1">a@x</segment>
            <segment bytes="2" number="2">b@x</segment>
        </segments></file></nzb>"#;

        let nzb = decode(xml.as_bytes()).unwrap();
        let numbers: Vec<&str> = nzb.files[0]
            .segments
            .segment
            .iter()
            .map(|s| s.number.as_str())
            .collect();
        assert_eq!(numbers, ["3", "1", "2"]);
    }

    #[test]
    fn test_missing_head_yields_empty_head() {
        let nzb = decode(b"<nzb><file poster=\"p\" date=\"d\" subject=\"s\"/></nzb>").unwrap();
        assert!(nzb.head.meta.is_empty());
        assert_eq!(nzb.files.len(), 1);
        assert!(nzb.files[0].groups.group.is_empty());
    }

    #[test]
    fn test_empty_nzb_is_legal() {
        let nzb = decode(b"<nzb/>").unwrap();
        assert!(nzb.files.is_empty());
    }

    #[test]
    fn test_missing_attributes_are_empty() {
        let nzb = decode(b"<nzb><head><meta>untyped</meta></head><file/></nzb>").unwrap();
        assert_eq!(nzb.head.meta[0].kind, "");
        assert_eq!(nzb.head.meta[0].value, "untyped");
        assert_eq!(nzb.files[0].poster, "");
    }

    #[test]
    fn test_entities_and_cdata() {
        let xml = r#"<nzb><file subject="&quot;a&amp;b.rar&quot; yEnc"><groups><group><![CDATA[alt.binaries.<cdata>]]></group></groups></file></nzb>"#;
        let nzb = decode(xml.as_bytes()).unwrap();
        assert_eq!(nzb.files[0].subject, r#""a&b.rar" yEnc"#);
        assert_eq!(nzb.files[0].groups.group[0].name, "alt.binaries.<cdata>");
    }

    #[test]
    fn test_text_is_not_trimmed() {
        let nzb = decode(b"<nzb><file><groups><group> alt.test </group></groups></file></nzb>").unwrap();
        assert_eq!(nzb.files[0].groups.group[0].name, " alt.test ");
    }

    #[test]
    fn test_latin1_subject() {
        let mut xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<nzb><file poster=\"Andr\xe9\" date=\"1\" subject=\"Caf\xe9 cr\xe8me\"/></nzb>".to_vec();
        xml.push(b'\n');

        let nzb = decode(&xml).unwrap();
        assert_eq!(nzb.files[0].subject, "Café crème");
        assert_eq!(nzb.files[0].poster, "André");
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let xml = r#"<nzb><extension><file poster="ignored"/></extension><file poster="kept"><groups><group>g</group></groups><x-note>hi</x-note></file></nzb>"#;
        let nzb = decode(xml.as_bytes()).unwrap();
        assert_eq!(nzb.files.len(), 1);
        assert_eq!(nzb.files[0].poster, "kept");
        assert_eq!(nzb.files[0].groups.group.len(), 1);
    }

    #[test]
    fn test_unclosed_tag_is_rejected() {
        let err = decode(b"<nzb><file poster=\"p\"><groups><group>g</group></groups>").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnclosedElement(_) | DecodeError::Xml { .. }
        ));
    }

    #[test]
    fn test_mismatched_tag_is_rejected() {
        let err = decode(b"<nzb><file></nzb></file>").unwrap_err();
        assert!(matches!(err, DecodeError::Xml { .. }));
    }

    #[test]
    fn test_invalid_entity_is_rejected() {
        let err = decode(br#"<nzb><file subject="a &bogus; b"/></nzb>"#).unwrap_err();
        assert!(matches!(err, DecodeError::Xml { .. }));
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let err = decode(b"<rss><channel/></rss>").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedElement { ref element, .. } if element == "rss"
        ));
    }

    #[test]
    fn test_misplaced_element_is_rejected() {
        let err = decode(b"<nzb><file><group>g</group></file></nzb>").unwrap_err();
        match err {
            DecodeError::UnexpectedElement { element, parent } => {
                assert_eq!(element, "group");
                assert_eq!(parent, "<file>");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = decode(b"<nzb><file><groups><group><b>g</b></group></groups></file></nzb>")
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedElement { .. }));
    }

    #[test]
    fn test_no_root_is_rejected() {
        let err = decode(b"<?xml version=\"1.0\"?>\n").unwrap_err();
        assert!(matches!(err, DecodeError::MissingRoot));
    }
}

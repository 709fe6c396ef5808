//! Field mapping between the NZB wire format and the JSON output.
//!
//! Each entity lists where its fields come from in the XML and which key
//! they land under in JSON. The decoder and the shape transform both read
//! from these tables, so a rename happens in one place.

/// Element and attribute names in NZB XML.
pub mod xml {
    pub const NZB: &str = "nzb";
    pub const HEAD: &str = "head";
    pub const META: &str = "meta";
    pub const FILE: &str = "file";
    pub const GROUPS: &str = "groups";
    pub const GROUP: &str = "group";
    pub const SEGMENTS: &str = "segments";
    pub const SEGMENT: &str = "segment";

    pub const META_TYPE: &str = "type";
    pub const FILE_POSTER: &str = "poster";
    pub const FILE_DATE: &str = "date";
    pub const FILE_SUBJECT: &str = "subject";
    pub const SEGMENT_BYTES: &str = "bytes";
    pub const SEGMENT_NUMBER: &str = "number";

    /// Every element name the decoder understands. Anything else is skipped.
    pub const ELEMENTS: &[&str] = &[NZB, HEAD, META, FILE, GROUPS, GROUP, SEGMENTS, SEGMENT];

    pub fn is_known(name: &str) -> bool {
        ELEMENTS.contains(&name)
    }
}

/// Keys in the JSON output.
pub mod json {
    pub const HEAD: &str = "head";
    pub const META: &str = "meta";
    pub const FILE: &str = "file";

    pub const META_TYPE: &str = "type";
    pub const META_VALUE: &str = "value";

    pub const FILE_POSTER: &str = "poster";
    pub const FILE_DATE: &str = "date";
    pub const FILE_SUBJECT: &str = "subject";
    /// Bare array of newsgroup names; `<groups>` has no JSON counterpart
    pub const FILE_GROUP: &str = "group";
    /// Bare array of segments; `<segments>` has no JSON counterpart
    pub const FILE_SEGMENT: &str = "segment";

    pub const SEGMENT_BYTES: &str = "bytes";
    pub const SEGMENT_NUMBER: &str = "number";
    pub const SEGMENT_NAME: &str = "name";
}

//! Shape transform from the decoded document to its JSON form.
//!
//! The JSON layout differs from the XML on purpose: the `<groups>` and
//! `<segments>` wrappers disappear and their children become bare arrays,
//! a group is a plain string, and an empty header is left out. Keys are
//! inserted in a fixed order, which `serde_json`'s `preserve_order` keeps
//! through serialization.

use serde_json::{Map, Value};

use super::model::{Group, Head, Meta, Nzb, NzbFile, Segment};
use super::schema::json;

pub fn to_value(nzb: &Nzb) -> Value {
    let mut obj = Map::new();
    if let Some(head) = head_value(&nzb.head) {
        obj.insert(json::HEAD.to_string(), head);
    }
    obj.insert(
        json::FILE.to_string(),
        Value::Array(nzb.files.iter().map(file_value).collect()),
    );
    Value::Object(obj)
}

/// `None` when there is no metadata to show.
fn head_value(head: &Head) -> Option<Value> {
    if head.meta.is_empty() {
        return None;
    }
    let mut obj = Map::new();
    obj.insert(
        json::META.to_string(),
        Value::Array(head.meta.iter().map(meta_value).collect()),
    );
    Some(Value::Object(obj))
}

fn meta_value(meta: &Meta) -> Value {
    let mut obj = Map::new();
    if !meta.kind.is_empty() {
        obj.insert(json::META_TYPE.to_string(), string(&meta.kind));
    }
    if !meta.value.is_empty() {
        obj.insert(json::META_VALUE.to_string(), string(&meta.value));
    }
    Value::Object(obj)
}

fn file_value(file: &NzbFile) -> Value {
    let mut obj = Map::new();
    obj.insert(json::FILE_POSTER.to_string(), string(&file.poster));
    obj.insert(json::FILE_DATE.to_string(), string(&file.date));
    obj.insert(json::FILE_SUBJECT.to_string(), string(&file.subject));
    obj.insert(
        json::FILE_GROUP.to_string(),
        Value::Array(file.groups.group.iter().map(group_value).collect()),
    );
    obj.insert(
        json::FILE_SEGMENT.to_string(),
        Value::Array(file.segments.segment.iter().map(segment_value).collect()),
    );
    Value::Object(obj)
}

fn group_value(group: &Group) -> Value {
    string(&group.name)
}

fn segment_value(segment: &Segment) -> Value {
    let mut obj = Map::new();
    obj.insert(json::SEGMENT_BYTES.to_string(), string(&segment.bytes));
    obj.insert(json::SEGMENT_NUMBER.to_string(), string(&segment.number));
    obj.insert(json::SEGMENT_NAME.to_string(), string(&segment.message_id));
    Value::Object(obj)
}

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nzb::model::{Groups, Segments};
    use serde_json::json;

    fn sample_file() -> NzbFile {
        NzbFile {
            poster: "poster@example.com".to_string(),
            date: "1234567890".to_string(),
            subject: "Example [1/1]".to_string(),
            groups: Groups {
                group: vec![
                    Group {
                        name: "alt.binaries.example".to_string(),
                    },
                    Group {
                        name: "alt.binaries.misc".to_string(),
                    },
                ],
            },
            segments: Segments {
                segment: vec![Segment {
                    bytes: "123".to_string(),
                    number: "1".to_string(),
                    message_id: "msgid@host".to_string(),
                }],
            },
        }
    }

    #[test]
    fn test_wrappers_are_flattened() {
        let nzb = Nzb {
            head: Head::default(),
            files: vec![sample_file()],
        };

        assert_eq!(
            to_value(&nzb),
            json!({
                "file": [{
                    "poster": "poster@example.com",
                    "date": "1234567890",
                    "subject": "Example [1/1]",
                    "group": ["alt.binaries.example", "alt.binaries.misc"],
                    "segment": [{"bytes": "123", "number": "1", "name": "msgid@host"}]
                }]
            })
        );
    }

    #[test]
    fn test_empty_head_is_omitted() {
        let value = to_value(&Nzb::default());
        assert_eq!(value, json!({ "file": [] }));
    }

    #[test]
    fn test_meta_fields_omitted_when_empty() {
        let nzb = Nzb {
            head: Head {
                meta: vec![
                    Meta {
                        kind: "title".to_string(),
                        value: "Example".to_string(),
                    },
                    Meta {
                        kind: String::new(),
                        value: "untyped".to_string(),
                    },
                    Meta::default(),
                ],
            },
            files: vec![],
        };

        assert_eq!(
            to_value(&nzb),
            json!({
                "head": {"meta": [{"type": "title", "value": "Example"}, {"value": "untyped"}, {}]},
                "file": []
            })
        );
    }

    #[test]
    fn test_key_order_is_fixed() {
        let nzb = Nzb {
            head: Head {
                meta: vec![Meta {
                    kind: "title".to_string(),
                    value: "Example".to_string(),
                }],
            },
            files: vec![sample_file()],
        };

        let text = serde_json::to_string(&to_value(&nzb)).unwrap();
        assert_eq!(
            text,
            concat!(
                r#"{"head":{"meta":[{"type":"title","value":"Example"}]},"#,
                r#""file":[{"poster":"poster@example.com","date":"1234567890","subject":"Example [1/1]","#,
                r#""group":["alt.binaries.example","alt.binaries.misc"],"#,
                r#""segment":[{"bytes":"123","number":"1","name":"msgid@host"}]}]}"#
            )
        );
    }
}

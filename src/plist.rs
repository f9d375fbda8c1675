//! XML property-list reading for service configuration files.
//!
//! The `plist` crate supplies the event stream; this module folds it into a
//! small [`PlistValue`] tree restricted to the types a launchd job uses.
//! Reals and dates are kept as text. Data and UID values are dropped along
//! with their dictionary key.

use crate::error::{KettleError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use ::plist::stream::{Event, XmlReader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlistValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Array(Vec<PlistValue>),
    Dictionary(BTreeMap<String, PlistValue>),
}

impl PlistValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlistValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PlistValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PlistValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PlistValue]> {
        match self {
            PlistValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, PlistValue>> {
        match self {
            PlistValue::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a dictionary
    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        self.as_dict().and_then(|map| map.get(key))
    }

    /// Scalar rendered as text; containers have none
    pub fn string_value(&self) -> Option<String> {
        match self {
            PlistValue::String(s) => Some(s.clone()),
            PlistValue::Integer(i) => Some(i.to_string()),
            PlistValue::Boolean(b) => Some(b.to_string()),
            PlistValue::Array(_) | PlistValue::Dictionary(_) => None,
        }
    }

    /// Encode as an XML property list
    pub fn to_xml(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.to_plist().to_writer_xml(&mut buf)?;
        String::from_utf8(buf).map_err(|e| KettleError::ParsingFailed(e.to_string()))
    }

    fn to_plist(&self) -> ::plist::Value {
        match self {
            PlistValue::String(s) => ::plist::Value::String(s.clone()),
            PlistValue::Integer(i) => ::plist::Value::Integer((*i).into()),
            PlistValue::Boolean(b) => ::plist::Value::Boolean(*b),
            PlistValue::Array(items) => {
                ::plist::Value::Array(items.iter().map(PlistValue::to_plist).collect())
            }
            PlistValue::Dictionary(map) => {
                let mut dict = ::plist::Dictionary::new();
                for (key, value) in map {
                    dict.insert(key.clone(), value.to_plist());
                }
                ::plist::Value::Dictionary(dict)
            }
        }
    }
}

/// Parse XML property-list text
pub fn parse(xml: &str) -> Result<PlistValue> {
    let mut builder = TreeBuilder::default();

    for event in XmlReader::new(Cursor::new(xml.as_bytes())) {
        match event? {
            Event::StartDictionary(_) => builder.open(Frame::dictionary()),
            Event::StartArray(_) => builder.open(Frame::Array(Vec::new())),
            Event::EndCollection => builder.close()?,
            Event::String(s) => builder.string(s.into_owned())?,
            Event::Integer(i) => builder.attach(integer_value(i))?,
            Event::Boolean(b) => builder.attach(PlistValue::Boolean(b))?,
            Event::Real(r) => builder.attach(PlistValue::String(r.to_string()))?,
            Event::Date(d) => builder.attach(PlistValue::String(date_string(d)))?,
            _ => builder.skip(),
        }
    }

    builder.finish()
}

/// Parse a property-list file
pub fn parse_file(path: &Path) -> Result<PlistValue> {
    debug!("Parsing property list {}", path.display());
    let xml = std::fs::read_to_string(path)?;
    parse(&xml)
}

fn integer_value(i: ::plist::Integer) -> PlistValue {
    match i.as_signed() {
        Some(v) => PlistValue::Integer(v),
        // Beyond i64::MAX
        None => PlistValue::String(i.as_unsigned().map(|v| v.to_string()).unwrap_or_default()),
    }
}

fn date_string(date: ::plist::Date) -> String {
    DateTime::<Utc>::from(SystemTime::from(date)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

enum Frame {
    Dictionary {
        entries: BTreeMap<String, PlistValue>,
        pending_key: Option<String>,
    },
    Array(Vec<PlistValue>),
}

impl Frame {
    fn dictionary() -> Self {
        Frame::Dictionary {
            entries: BTreeMap::new(),
            pending_key: None,
        }
    }
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<PlistValue>,
}

impl TreeBuilder {
    fn open(&mut self, frame: Frame) {
        self.stack.push(frame);
    }

    fn close(&mut self) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| KettleError::ParsingFailed("unbalanced collection end".into()))?;
        let value = match frame {
            Frame::Dictionary {
                entries,
                pending_key,
            } => {
                if let Some(key) = pending_key {
                    debug!("Dropping key without value: {}", key);
                }
                PlistValue::Dictionary(entries)
            }
            Frame::Array(items) => PlistValue::Array(items),
        };
        self.attach(value)
    }

    /// Strings double as dictionary keys
    fn string(&mut self, s: String) -> Result<()> {
        if let Some(Frame::Dictionary { pending_key, .. }) = self.stack.last_mut() {
            if pending_key.is_none() {
                *pending_key = Some(s);
                return Ok(());
            }
        }
        self.attach(PlistValue::String(s))
    }

    fn attach(&mut self, value: PlistValue) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Dictionary {
                entries,
                pending_key,
            }) => {
                let key = pending_key.take().ok_or_else(|| {
                    KettleError::ParsingFailed("dictionary value without a key".into())
                })?;
                entries.insert(key, value);
            }
            None => {
                if self.root.is_some() {
                    return Err(KettleError::ParsingFailed(
                        "property list has more than one root value".into(),
                    ));
                }
                self.root = Some(value);
            }
        }
        Ok(())
    }

    /// Unsupported scalar: drop it and any key waiting for it
    fn skip(&mut self) {
        if let Some(Frame::Dictionary { pending_key, .. }) = self.stack.last_mut() {
            if let Some(key) = pending_key.take() {
                debug!("Dropping unsupported value for key {}", key);
            }
        }
    }

    fn finish(self) -> Result<PlistValue> {
        if !self.stack.is_empty() {
            return Err(KettleError::ParsingFailed(
                "unterminated collection in property list".into(),
            ));
        }
        self.root
            .ok_or_else(|| KettleError::ParsingFailed("property list contains no value".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>homebrew.mxcl.postgresql</string>
    <key>ProgramArguments</key>
    <array>
        <string>/opt/homebrew/opt/postgresql/bin/postgres</string>
        <string>-D</string>
        <string>/opt/homebrew/var/postgres</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
    <key>KeepAlive</key>
    <dict>
        <key>SuccessfulExit</key>
        <false/>
    </dict>
    <key>ThrottleInterval</key>
    <integer>30</integer>
</dict>
</plist>"#;

    #[test]
    fn test_parse_service_plist() {
        let value = parse(SERVICE_PLIST).unwrap();

        assert_eq!(
            value.get("Label").and_then(PlistValue::as_str),
            Some("homebrew.mxcl.postgresql")
        );

        let args = value
            .get("ProgramArguments")
            .and_then(PlistValue::as_array)
            .unwrap();
        assert_eq!(args.len(), 3);
        assert_eq!(args[1].as_str(), Some("-D"));

        assert_eq!(value.get("RunAtLoad").and_then(PlistValue::as_bool), Some(true));

        let keep_alive = value.get("KeepAlive").unwrap();
        assert_eq!(
            keep_alive.get("SuccessfulExit").and_then(PlistValue::as_bool),
            Some(false)
        );

        assert_eq!(
            value.get("ThrottleInterval").and_then(PlistValue::as_integer),
            Some(30)
        );
    }

    #[test]
    fn test_parse_invalid_xml() {
        assert!(parse("This is not XML").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_parse_empty_dict() {
        let value = parse(r#"<?xml version="1.0" encoding="UTF-8"?><plist version="1.0"><dict/></plist>"#)
            .unwrap();
        assert_eq!(value, PlistValue::Dictionary(BTreeMap::new()));
    }

    #[test]
    fn test_parse_keeps_real_and_drops_data() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>Nice</key>
    <real>1.5</real>
    <key>Blob</key>
    <data>AAEC</data>
    <key>After</key>
    <string>kept</string>
</dict>
</plist>"#;
        let value = parse(xml).unwrap();
        assert_eq!(value.get("Nice").and_then(PlistValue::as_str), Some("1.5"));
        assert!(value.get("Blob").is_none());
        assert_eq!(value.get("After").and_then(PlistValue::as_str), Some("kept"));
    }

    #[test]
    fn test_string_value() {
        assert_eq!(PlistValue::Integer(42).string_value().as_deref(), Some("42"));
        assert_eq!(PlistValue::Boolean(true).string_value().as_deref(), Some("true"));
        assert_eq!(
            PlistValue::String("x".into()).string_value().as_deref(),
            Some("x")
        );
        assert!(PlistValue::Array(vec![]).string_value().is_none());
    }

    #[test]
    fn test_round_trip() {
        let mut inner = BTreeMap::new();
        inner.insert("SuccessfulExit".to_string(), PlistValue::Boolean(false));
        let mut root = BTreeMap::new();
        root.insert("Label".to_string(), PlistValue::String("homebrew.mxcl.redis".into()));
        root.insert("KeepAlive".to_string(), PlistValue::Dictionary(inner));
        root.insert(
            "ProgramArguments".to_string(),
            PlistValue::Array(vec![
                PlistValue::String("/opt/homebrew/opt/redis/bin/redis-server".into()),
                PlistValue::Integer(6379),
                PlistValue::Array(vec![PlistValue::Boolean(true)]),
            ]),
        );
        let value = PlistValue::Dictionary(root);

        let xml = value.to_xml().unwrap();
        assert!(xml.contains("<key>Label</key>"));
        assert_eq!(parse(&xml).unwrap(), value);
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homebrew.mxcl.postgresql.plist");
        std::fs::write(&path, SERVICE_PLIST).unwrap();
        let value = parse_file(&path).unwrap();
        assert!(value.get("Label").is_some());
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let value = parse(SERVICE_PLIST).unwrap();
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["RunAtLoad"], serde_json::json!(true));
        assert_eq!(json["ProgramArguments"][1], serde_json::json!("-D"));
    }
}

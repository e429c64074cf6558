//! Comment-tag and struct-tag parsing
//!
//! Declarations carry two kinds of annotation:
//!
//! - **Comment tags**: doc-comment lines of the form `+key=value` (or a bare
//!   `+key`). A key may repeat; values are kept in the order they appear.
//! - **Struct tags**: the raw tag string on a field, in the
//!   `key:"value" key2:"value2"` form. The `json` key decides the
//!   serialization name; every other key lands in a free-form map.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Comment tag key to its values; values keep their line order
pub type CommentTags = BTreeMap<String, Vec<String>>;

const TAG_MARKER: &str = "+";

static STRUCT_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_.\-]*):"((?:[^"\\]|\\.)*)""#)
        .expect("struct tag regex should be valid")
});

/// Collect `+key=value` tags from comment lines
///
/// Leading `//` and surrounding whitespace are ignored. A tag without `=`
/// records an empty value.
pub fn extract_comment_tags(lines: &[String]) -> CommentTags {
    let mut out = CommentTags::new();
    for line in lines {
        let line = line.trim();
        let line = line.strip_prefix("//").unwrap_or(line).trim();
        let Some(body) = line.strip_prefix(TAG_MARKER) else {
            continue;
        };
        let (key, value) = match body.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (body.trim(), ""),
        };
        if key.is_empty() {
            continue;
        }
        out.entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }
    out
}

/// Parsed view of a field's struct tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTagInfo {
    /// Field name as declared
    pub field_name: String,
    /// Explicit json name, empty when the tag omits it
    pub name: String,
    /// `json:"-"` or `ignore:"true"`
    pub ignore: bool,
    pub omit_empty: bool,
    /// Every non-json key
    pub tags: BTreeMap<String, String>,
}

impl FieldTagInfo {
    /// Name the field serializes under
    pub fn marshal_name(&self) -> String {
        if self.name.is_empty() {
            to_snake_case(&self.field_name)
        } else {
            self.name.clone()
        }
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }
}

/// Parse a raw struct tag for the field called `field_name`
pub fn parse_field_tags(field_name: &str, raw: &str) -> FieldTagInfo {
    let mut info = FieldTagInfo {
        field_name: field_name.to_string(),
        ..FieldTagInfo::default()
    };

    for caps in STRUCT_TAG_REGEX.captures_iter(raw) {
        let key = &caps[1];
        let value = caps[2].replace("\\\"", "\"");
        if key == "json" {
            if value == "-" {
                info.ignore = true;
                continue;
            }
            let mut parts = value.split(',');
            info.name = parts.next().unwrap_or_default().to_string();
            for opt in parts {
                if opt == "omitempty" {
                    info.omit_empty = true;
                }
            }
        } else {
            info.tags.insert(key.to_string(), value);
        }
    }

    if info.tags.get("ignore").map(|v| v == "true").unwrap_or(false) {
        info.ignore = true;
    }
    info
}

/// Convert a camel-case identifier to snake_case, keeping acronyms together
/// (`VMName` becomes `vm_name`)
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.map(|n| n.is_lowercase()).unwrap_or(false),
                _ => false,
            };
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch == '-' || ch == ' ' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.push(ch);
        }
    }
    result
}

/// Convert a camel-case identifier to kebab-case (`SyncStatus` becomes `sync-status`)
pub fn to_kebab_case(s: &str) -> String {
    to_snake_case(s).replace('_', "-")
}

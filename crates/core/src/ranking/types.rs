//! Types for ranking service payloads.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names carrying a record's identifier.
const ISSN_FIELDS: &[&str] = &["ISSN", "issn"];
/// Field names carrying a record's venue name.
const NAME_FIELDS: &[&str] = &["Nimi", "nimi", "Name", "name"];
/// Field names carrying an explicit detail link.
const LINK_FIELDS: &[&str] = &["Link", "link"];
/// Field names carrying the opaque venue id used to build a detail link.
const ID_FIELDS: &[&str] = &["Jufo_ID", "jufo_id", "Jufo_Id"];
/// Field names carrying the level, in priority order.
const LEVEL_FIELDS: &[&str] = &["Level", "level", "Julkaisufoorumitaso", "taso"];

/// A venue quality level as assigned by the ranking authority.
///
/// Always positive. "Unavailable" is modelled as `Option::<RankLevel>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankLevel(u32);

impl RankLevel {
    /// Construct a level; zero is not a level.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Parse the positive integer at the head of a free-text level field.
    ///
    /// `"2 (old: 1)"` yields 2; `"N/A"`, `"0"` and `" 2"` yield nothing.
    pub fn parse_leading(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse::<u32>().ok().and_then(Self::new)
    }
}

impl fmt::Display for RankLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One record returned by the ranking service, search or detail endpoint.
///
/// Built leniently from JSON: each field is the first present alias,
/// with numbers accepted where strings are expected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<String>,
    /// Raw level text, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl RankRecord {
    /// Build a record from one JSON object.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            issn: first_field(obj, ISSN_FIELDS),
            name: first_field(obj, NAME_FIELDS),
            link: first_field(obj, LINK_FIELDS),
            venue_id: first_field(obj, ID_FIELDS),
            level: first_field(obj, LEVEL_FIELDS),
        }
    }

    /// The level carried by this record, if its level field parses.
    pub fn rank_level(&self) -> Option<RankLevel> {
        self.level.as_deref().and_then(RankLevel::parse_leading)
    }

    /// The detail link: the explicit link, else one built from the venue id.
    pub fn detail_link(&self, base_url: &str) -> Option<String> {
        if let Some(link) = self.link.as_ref().filter(|l| !l.trim().is_empty()) {
            return Some(link.clone());
        }
        self.venue_id
            .as_ref()
            .filter(|id| !id.trim().is_empty())
            .map(|id| {
                format!(
                    "{}/kanava/{}",
                    base_url.trim_end_matches('/'),
                    urlencoding::encode(id.trim())
                )
            })
    }
}

/// Extract the list of records from a ranking payload.
///
/// Accepts a bare array, an object wrapping the array in `results` or
/// `result`, or a single record object. Anything else is an empty list.
pub fn parse_records(payload: &Value) -> Vec<RankRecord> {
    let rows = match payload {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(obj) => match obj.get("results").or_else(|| obj.get("result")) {
            Some(Value::Array(rows)) => rows.as_slice(),
            Some(_) => return Vec::new(),
            None => {
                let record = RankRecord::from_object(obj);
                return if record == RankRecord::default() {
                    Vec::new()
                } else {
                    vec![record]
                };
            }
        },
        _ => return Vec::new(),
    };

    rows.iter()
        .filter_map(Value::as_object)
        .map(RankRecord::from_object)
        .collect()
}

fn first_field(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find_map(scalar_to_string)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // Some venues list several identifiers; the first one is the record's own.
        Value::Array(items) => items.iter().find_map(scalar_to_string),
        _ => None,
    }
}

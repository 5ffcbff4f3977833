// File: crates/strata-core/src/series.rs
// Summary: Raw input model (serde-friendly) and the cleaned series model.

use serde::Deserialize;

use crate::types::{Datum, GroupId, Key, KeyParseError, KeyType, Point, DEFAULT_GROUP};

/// Raw chart input: `{"series": [{label, id, group, values: [{key, value}]}]}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawInput {
    #[serde(default)]
    pub series: Vec<RawSeries>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawSeries {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub group: GroupId,
    /// Optional override for color assignment; defaults to the series id.
    #[serde(default)]
    pub color_key: Option<String>,
    #[serde(default)]
    pub values: Vec<RawPoint>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawPoint {
    pub key: Datum,
    pub value: Datum,
}

impl RawSeries {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            group: DEFAULT_GROUP,
            color_key: None,
            values: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = group;
        self
    }

    pub fn with_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (Datum, Datum)>,
    {
        self.values = values
            .into_iter()
            .map(|(key, value)| RawPoint { key, value })
            .collect();
        self
    }

    /// Parse this series' raw key according to `key_type`.
    pub(crate) fn parse_key(datum: &Datum, key_type: KeyType) -> Result<Key, KeyParseError> {
        match (key_type, datum) {
            (KeyType::Time, Datum::Text(s)) => Key::parse_time(s),
            (KeyType::Time, Datum::Number(n)) => Key::from_epoch_millis(*n),
            (KeyType::Number, d) => d
                .as_number()
                .map(Key::Number)
                .ok_or_else(|| KeyParseError::Number(format!("{d:?}"))),
            (KeyType::String, Datum::Text(s)) => Ok(Key::Category(s.clone())),
            (KeyType::String, Datum::Number(n)) => Ok(Key::Category(n.to_string())),
            (_, Datum::Null) => Err(KeyParseError::Null),
        }
    }
}

/// A cleaned, ordered collection of points sharing one visual encoding.
#[derive(Clone, Debug)]
pub struct Series {
    pub id: String,
    pub label: String,
    pub group: GroupId,
    pub color_key: Option<String>,
    /// Sorted by key ascending; no two points share a key.
    pub values: Vec<Point>,
}

impl Series {
    /// Key used for color assignment: declared `color_key` or the id.
    pub fn color_key(&self) -> &str {
        self.color_key.as_deref().unwrap_or(&self.id)
    }

    /// True when this series maps to the secondary value axis.
    pub fn uses_second_axis(&self) -> bool {
        self.group != DEFAULT_GROUP
    }
}

/// One series' contribution at a given key (pivot cell).
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesValue {
    pub series_id: String,
    pub value: f64,
}

//! Room records exchanged with the backend.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::result::HotelError;
use crate::selectors::Feature;

/// Room category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    /// One bed
    Single,
    /// Two people
    Double,
    /// Suite
    Suite,
}

impl RoomType {
    /// Every type
    pub const ALL: [Self; 3] = [Self::Single, Self::Double, Self::Suite];

    /// Name shown in the UI and sent to the backend
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Suite => "Suite",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = HotelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| HotelError::UnknownKey {
                kind: "room type",
                key: s.to_string(),
            })
    }
}

/// Forms post prices as strings, the API returns numbers
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("price `{text}` is not a whole number"))),
    }
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Flag(b) => Ok(b),
        Raw::Text(text) => match text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(de::Error::custom(format!("flag `{text}` is not true/false"))),
        },
    }
}

/// A room as the backend reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Backend id, absent before creation
    #[serde(
        rename = "roomid",
        alias = "roomId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub room_id: Option<u64>,
    /// Room name, e.g. "101"
    pub room_name: String,
    /// Category
    #[serde(rename = "type")]
    pub room_type: RoomType,
    /// Wheelchair accessible
    #[serde(deserialize_with = "lenient_flag")]
    pub accessible: bool,
    /// Nightly price
    #[serde(deserialize_with = "lenient_price")]
    pub room_price: u32,
    /// Amenities
    #[serde(default)]
    pub features: BTreeSet<Feature>,
    /// Free text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Room {
    /// Whether every client-supplied field equals `new`
    #[must_use]
    pub fn matches(&self, new: &NewRoom) -> bool {
        self.room_name == new.room_name
            && self.room_type == new.room_type
            && self.accessible == new.accessible
            && self.room_price == new.room_price
            && self.features == new.features
    }
}

/// Fields a client supplies when creating a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    /// Room name
    pub room_name: String,
    /// Category
    #[serde(rename = "type")]
    pub room_type: RoomType,
    /// Wheelchair accessible
    #[serde(deserialize_with = "lenient_flag")]
    pub accessible: bool,
    /// Nightly price
    #[serde(deserialize_with = "lenient_price")]
    pub room_price: u32,
    /// Amenities
    #[serde(default)]
    pub features: BTreeSet<Feature>,
}

impl NewRoom {
    /// Inaccessible room with no price or features
    #[must_use]
    pub fn new(room_name: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            room_name: room_name.into(),
            room_type,
            accessible: false,
            room_price: 0,
            features: BTreeSet::new(),
        }
    }

    /// Set accessibility
    #[must_use]
    pub const fn with_accessible(mut self, accessible: bool) -> Self {
        self.accessible = accessible;
        self
    }

    /// Set the price
    #[must_use]
    pub const fn with_price(mut self, price: u32) -> Self {
        self.room_price = price;
        self
    }

    /// Set the amenities
    #[must_use]
    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features = features.into_iter().collect();
        self
    }
}

/// Partial update; unset fields are not sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatch {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
    /// New category
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomType>,
    /// New accessibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessible: Option<bool>,
    /// New price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_price: Option<u32>,
    /// New amenity set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<BTreeSet<Feature>>,
}

impl RoomPatch {
    /// Empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the price
    #[must_use]
    pub const fn price(mut self, price: u32) -> Self {
        self.room_price = Some(price);
        self
    }

    /// Replace the amenity set
    #[must_use]
    pub fn features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features = Some(features.into_iter().collect());
        self
    }

    /// Apply the patch to a room
    pub fn apply_to(&self, room: &mut Room) {
        if let Some(name) = &self.room_name {
            room.room_name.clone_from(name);
        }
        if let Some(room_type) = self.room_type {
            room.room_type = room_type;
        }
        if let Some(accessible) = self.accessible {
            room.accessible = accessible;
        }
        if let Some(price) = self.room_price {
            room.room_price = price;
        }
        if let Some(features) = &self.features {
            room.features.clone_from(features);
        }
    }
}

/// Room name unlikely to collide with parallel runs: `666-<ms>-<4 hex>`
#[must_use]
pub fn unique_room_name() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!("666-{millis}-{}", &token[..4])
}

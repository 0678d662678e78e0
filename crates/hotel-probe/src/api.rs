//! Typed client for the backend room resource.
//!
//! Independent of any browser session. Every call checks the HTTP status
//! before decoding and reports the method, URL and body on failure.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::SuiteConfig;
use crate::navigation::resolve;
use crate::result::{HotelError, HotelResult};
use crate::room::{NewRoom, Room, RoomPatch};

/// Reply shapes for single-room calls
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoomReply {
    Envelope {
        success: bool,
        #[serde(default)]
        room: Option<Room>,
    },
    Wrapped {
        room: Room,
    },
    Bare(Room),
}

/// Reply shapes for the listing
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoomList {
    Wrapped { rooms: Vec<Room> },
    Bare(Vec<Room>),
}

impl RoomList {
    fn into_rooms(self) -> Vec<Room> {
        match self {
            Self::Wrapped { rooms } | Self::Bare(rooms) => rooms,
        }
    }
}

/// Status a call must return
#[derive(Debug, Clone, Copy)]
enum Expect {
    Exactly200,
    Success,
}

/// Room resource client
#[derive(Debug, Clone)]
pub struct RoomApi {
    client: reqwest::Client,
    collection: Url,
}

impl RoomApi {
    /// Client for the configured room collection
    ///
    /// # Errors
    ///
    /// Fails when the API address is invalid or the HTTP client cannot be built.
    pub fn new(config: &SuiteConfig) -> HotelResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.navigation_timeout())
            .build()?;
        Ok(Self::with_client(client, config.rooms_endpoint()?))
    }

    /// Client over an existing `reqwest` client
    #[must_use]
    pub const fn with_client(client: reqwest::Client, collection: Url) -> Self {
        Self { client, collection }
    }

    /// Collection URL
    #[must_use]
    pub const fn collection(&self) -> &Url {
        &self.collection
    }

    fn member(&self, id: u64) -> HotelResult<Url> {
        resolve(&self.collection, &id.to_string())
    }

    async fn call(
        &self,
        method: Method,
        url: &Url,
        body: Option<serde_json::Value>,
        expect: Expect,
    ) -> HotelResult<String> {
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(method = %method, url = %url, status = status.as_u16(), "room api call");
        let accepted = match expect {
            Expect::Exactly200 => status == StatusCode::OK,
            Expect::Success => status.is_success(),
        };
        if !accepted {
            tracing::warn!(method = %method, url = %url, status = status.as_u16(), "room api rejected call");
            return Err(HotelError::Api {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    fn decode<T: DeserializeOwned>(url: &Url, text: &str) -> HotelResult<T> {
        serde_json::from_str(text).map_err(|e| HotelError::ApiPayload {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn unsuccessful(url: &Url) -> HotelError {
        HotelError::ApiPayload {
            url: url.to_string(),
            message: "success flag was false".to_string(),
        }
    }

    /// Create a room.
    ///
    /// The backend must answer exactly 200. When it acknowledges without
    /// echoing the room, the room is looked up by name.
    ///
    /// # Errors
    ///
    /// Fails on any other status, a false success flag, or when the
    /// acknowledged room cannot be found.
    pub async fn create_room(&self, room: &NewRoom) -> HotelResult<Room> {
        let url = &self.collection;
        let text = self
            .call(
                Method::POST,
                url,
                Some(serde_json::to_value(room)?),
                Expect::Exactly200,
            )
            .await?;
        let created = match Self::decode::<RoomReply>(url, &text)? {
            RoomReply::Envelope { success: false, .. } => return Err(Self::unsuccessful(url)),
            RoomReply::Envelope {
                room: Some(created),
                ..
            }
            | RoomReply::Wrapped { room: created }
            | RoomReply::Bare(created) => created,
            RoomReply::Envelope { room: None, .. } => self
                .find_room_by_name(&room.room_name)
                .await?
                .ok_or_else(|| HotelError::ApiPayload {
                    url: url.to_string(),
                    message: format!("room `{}` acknowledged but not listed", room.room_name),
                })?,
        };
        tracing::info!(room = %created.room_name, id = ?created.room_id, "room created");
        Ok(created)
    }

    /// Every room
    ///
    /// # Errors
    ///
    /// Fails on a non-2xx status or malformed payload.
    pub async fn get_rooms(&self) -> HotelResult<Vec<Room>> {
        let url = &self.collection;
        let text = self.call(Method::GET, url, None, Expect::Success).await?;
        Ok(Self::decode::<RoomList>(url, &text)?.into_rooms())
    }

    /// One room by id
    ///
    /// # Errors
    ///
    /// Fails on a non-2xx status or malformed payload.
    pub async fn get_room_by_id(&self, id: u64) -> HotelResult<Room> {
        let url = self.member(id)?;
        let text = self.call(Method::GET, &url, None, Expect::Success).await?;
        match Self::decode::<RoomReply>(&url, &text)? {
            RoomReply::Envelope {
                success: true,
                room: Some(room),
            }
            | RoomReply::Wrapped { room }
            | RoomReply::Bare(room) => Ok(room),
            RoomReply::Envelope { .. } => Err(HotelError::ApiPayload {
                url: url.to_string(),
                message: "no room in reply".to_string(),
            }),
        }
    }

    /// Apply a partial update and return the stored room
    ///
    /// # Errors
    ///
    /// Fails on a non-2xx status, a false success flag or malformed payload.
    pub async fn update_room(&self, id: u64, patch: &RoomPatch) -> HotelResult<Room> {
        let url = self.member(id)?;
        let text = self
            .call(
                Method::PUT,
                &url,
                Some(serde_json::to_value(patch)?),
                Expect::Success,
            )
            .await?;
        tracing::info!(id, "room updated");
        if text.trim().is_empty() {
            return self.get_room_by_id(id).await;
        }
        match Self::decode::<RoomReply>(&url, &text)? {
            RoomReply::Envelope { success: false, .. } => Err(Self::unsuccessful(&url)),
            RoomReply::Envelope {
                room: Some(room), ..
            }
            | RoomReply::Wrapped { room }
            | RoomReply::Bare(room) => Ok(room),
            RoomReply::Envelope { room: None, .. } => self.get_room_by_id(id).await,
        }
    }

    /// Delete a room
    ///
    /// # Errors
    ///
    /// Fails on a non-2xx status.
    pub async fn delete_room(&self, id: u64) -> HotelResult<()> {
        let url = self.member(id)?;
        self.call(Method::DELETE, &url, None, Expect::Success)
            .await?;
        tracing::info!(id, "room deleted");
        Ok(())
    }

    /// First room with exactly this name
    ///
    /// # Errors
    ///
    /// Fails when the listing fails.
    pub async fn find_room_by_name(&self, name: &str) -> HotelResult<Option<Room>> {
        Ok(self
            .get_rooms()
            .await?
            .into_iter()
            .find(|room| room.room_name == name))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_member_url_keeps_collection_path() {
        let api = RoomApi::new(&SuiteConfig::default()).unwrap();
        assert_eq!(
            api.member(12).unwrap().as_str(),
            "http://localhost:3000/api/room-collection/12"
        );
    }

    #[test]
    fn test_reply_shapes() {
        let envelope: RoomReply = serde_json::from_str(
            r#"{"success":true,"room":{"roomName":"a","type":"Single","accessible":true,"roomPrice":1}}"#,
        )
        .unwrap();
        assert!(matches!(
            envelope,
            RoomReply::Envelope {
                success: true,
                room: Some(_)
            }
        ));
        let bare: RoomReply = serde_json::from_str(
            r#"{"roomid":2,"roomName":"a","type":"Single","accessible":true,"roomPrice":1}"#,
        )
        .unwrap();
        assert!(matches!(bare, RoomReply::Bare(_)));
        let ack: RoomReply = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(matches!(
            ack,
            RoomReply::Envelope {
                success: false,
                room: None
            }
        ));
    }

    #[test]
    fn test_list_shapes() {
        let wrapped: RoomList = serde_json::from_str(r#"{"rooms":[]}"#).unwrap();
        assert!(wrapped.into_rooms().is_empty());
        let bare: RoomList = serde_json::from_str(
            r#"[{"roomName":"a","type":"Double","accessible":false,"roomPrice":"5"}]"#,
        )
        .unwrap();
        assert_eq!(bare.into_rooms()[0].room_price, 5);
    }
}

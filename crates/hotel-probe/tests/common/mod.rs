//! In-process room backend for integration tests

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use hotel_probe::{NewRoom, Room, SuiteConfig};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// How the backend answers writes
#[derive(Debug, Clone, Copy)]
pub struct Behaviour {
    /// Status for a successful create
    pub create_status: StatusCode,
    /// Reply `{"success":true}` without the room
    pub ack_only: bool,
    /// Create answers `{"success":false}` and stores nothing
    pub rejects_create: bool,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            create_status: StatusCode::OK,
            ack_only: false,
            rejects_create: false,
        }
    }
}

/// Room table shared by the HTTP handlers and synchronous page scripts
#[derive(Debug, Clone)]
pub struct RoomStore {
    rooms: Arc<Mutex<Vec<Room>>>,
    next_id: Arc<AtomicU64>,
}

impl RoomStore {
    fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Store a room under the next id
    pub fn insert(&self, new: NewRoom) -> Room {
        let room = Room {
            room_id: Some(self.next_id.fetch_add(1, Ordering::SeqCst)),
            room_name: new.room_name,
            room_type: new.room_type,
            accessible: new.accessible,
            room_price: new.room_price,
            features: new.features,
            description: None,
            image: None,
        };
        self.rooms.lock().unwrap().push(room.clone());
        room
    }

    /// Merge the fields of `patch` into room `id`
    pub fn patch(&self, id: u64, patch: &Value) -> Result<Room, StatusCode> {
        let mut rooms = self.rooms.lock().unwrap();
        let slot = rooms
            .iter_mut()
            .find(|r| r.room_id == Some(id))
            .ok_or(StatusCode::NOT_FOUND)?;
        let mut merged = serde_json::to_value(&*slot).unwrap();
        for (key, value) in patch.as_object().ok_or(StatusCode::BAD_REQUEST)? {
            merged[key] = value.clone();
        }
        *slot = serde_json::from_value(merged).map_err(|_| StatusCode::BAD_REQUEST)?;
        Ok(slot.clone())
    }

    /// Every stored room
    pub fn all(&self) -> Vec<Room> {
        self.rooms.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone)]
struct Backend {
    store: RoomStore,
    behaviour: Behaviour,
}

async fn list(State(backend): State<Backend>) -> Json<Value> {
    Json(json!({ "rooms": backend.store.all() }))
}

async fn create(
    State(backend): State<Backend>,
    Json(new): Json<NewRoom>,
) -> (StatusCode, Json<Value>) {
    if backend.behaviour.rejects_create {
        return (StatusCode::OK, Json(json!({ "success": false })));
    }
    let room = backend.store.insert(new);
    let body = if backend.behaviour.ack_only {
        json!({ "success": true })
    } else {
        json!({ "success": true, "room": room })
    };
    (backend.behaviour.create_status, Json(body))
}

async fn fetch(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    let rooms = backend.store.rooms.lock().unwrap();
    let room = rooms
        .iter()
        .find(|r| r.room_id == Some(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "success": true, "room": room })))
}

async fn update(
    State(backend): State<Backend>,
    Path(id): Path<u64>,
    Json(patch): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let room = backend.store.patch(id, &patch)?;
    if backend.behaviour.ack_only {
        Ok(Json(json!({ "success": true })))
    } else {
        Ok(Json(json!({ "success": true, "room": room })))
    }
}

async fn remove(State(backend): State<Backend>, Path(id): Path<u64>) -> StatusCode {
    let mut rooms = backend.store.rooms.lock().unwrap();
    let before = rooms.len();
    rooms.retain(|r| r.room_id != Some(id));
    if rooms.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::ACCEPTED
    }
}

/// Running backend
#[derive(Debug)]
pub struct RoomBackend {
    pub addr: SocketAddr,
    store: RoomStore,
    task: tokio::task::JoinHandle<()>,
}

impl RoomBackend {
    pub async fn start() -> Self {
        Self::start_with(Behaviour::default()).await
    }

    pub async fn start_with(behaviour: Behaviour) -> Self {
        let backend = Backend {
            store: RoomStore::new(),
            behaviour,
        };
        let store = backend.store.clone();
        let app = Router::new()
            .route("/api/room-collection", get(list).post(create))
            .route(
                "/api/room-collection/{id}",
                get(fetch).put(update).delete(remove),
            )
            .with_state(backend);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, store, task }
    }

    /// Suite configuration pointing at this backend
    pub fn config(&self) -> SuiteConfig {
        SuiteConfig::default().with_base_url(format!("http://{}", self.addr))
    }

    /// Rooms currently stored
    pub fn rooms(&self) -> Vec<Room> {
        self.store.all()
    }

    /// Handle on the room table
    pub fn store(&self) -> RoomStore {
        self.store.clone()
    }
}

impl Drop for RoomBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

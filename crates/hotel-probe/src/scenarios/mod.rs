//! The hotel booking suite.
//!
//! Admin journeys log in through [`AdminAuth`](crate::fixture::AdminAuth)
//! unless login itself is under test. Client journeys drive the public site.
//! API journeys never open a browser. Rooms created here carry a unique name
//! and are not cleaned up.

mod admin;
mod api;
mod booking;

pub use admin::{AdminCreateRoom, AdminEditRoom, AdminLogin};
pub use api::{ApiRoundTrip, ApiUpdateConsistency, UnknownNameLookup};
pub use booking::{BookedDatesConflict, ClientBooking, FirstNameValidation};

use crate::api::RoomApi;
use crate::result::HotelResult;
use crate::room::{unique_room_name, NewRoom, Room, RoomType};
use crate::scenario::step;

/// Create a uniquely named room through the API
async fn seed_room(api: &RoomApi, room_type: RoomType, price: u32) -> HotelResult<Room> {
    let room = NewRoom::new(unique_room_name(), room_type)
        .with_accessible(true)
        .with_price(price);
    step("seed room through the API", api.create_room(&room)).await
}

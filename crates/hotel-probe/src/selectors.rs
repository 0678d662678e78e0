//! Selector and feature registry.
//!
//! The only place literal selector strings live. Components and pages ask
//! for a key and receive a [`Selector`]; the mapping is an exhaustive match
//! so an unmapped key cannot compile. String lookups (CLI, config) go through
//! [`FromStr`] and fail with [`HotelError::UnknownKey`] instead of yielding an
//! empty selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::locator::Selector;
use crate::result::HotelError;

/// Text the admin listing uses for a true boolean cell
pub const TRUTH_TOKEN: &str = "true";

/// Elements of the admin site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminSelector {
    /// Login username field
    Username,
    /// Login password field
    Password,
    /// Login submit button
    LoginButton,
    /// One row of the room listing
    RoomListing,
    /// Create form: room name input
    RoomName,
    /// Create form: type select
    RoomType,
    /// Create form: accessible select
    Accessible,
    /// Create form: price input
    RoomPrice,
    /// Create form: submit button
    CreateRoom,
    /// Row cell: room name
    RowName,
    /// Row cell: type
    RowType,
    /// Row cell: accessible flag
    RowAccessible,
    /// Row cell: price
    RowPrice,
    /// Row cell: feature details
    RowDetails,
    /// Row edit control
    RowEdit,
    /// Row delete control
    RowDelete,
    /// Edit page: enter edit mode
    EditButton,
    /// Edit page: save changes
    UpdateButton,
    /// Edit page: price input
    EditPrice,
}

impl AdminSelector {
    /// Every key, in declaration order
    pub const ALL: [Self; 19] = [
        Self::Username,
        Self::Password,
        Self::LoginButton,
        Self::RoomListing,
        Self::RoomName,
        Self::RoomType,
        Self::Accessible,
        Self::RoomPrice,
        Self::CreateRoom,
        Self::RowName,
        Self::RowType,
        Self::RowAccessible,
        Self::RowPrice,
        Self::RowDetails,
        Self::RowEdit,
        Self::RowDelete,
        Self::EditButton,
        Self::UpdateButton,
        Self::EditPrice,
    ];

    /// Stable key name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::LoginButton => "login_button",
            Self::RoomListing => "room_listing",
            Self::RoomName => "room_name",
            Self::RoomType => "room_type",
            Self::Accessible => "accessible",
            Self::RoomPrice => "room_price",
            Self::CreateRoom => "create_room",
            Self::RowName => "row_name",
            Self::RowType => "row_type",
            Self::RowAccessible => "row_accessible",
            Self::RowPrice => "row_price",
            Self::RowDetails => "row_details",
            Self::RowEdit => "row_edit",
            Self::RowDelete => "row_delete",
            Self::EditButton => "edit_button",
            Self::UpdateButton => "update_button",
            Self::EditPrice => "edit_price",
        }
    }

    /// Locator for this key
    #[must_use]
    pub fn selector(self) -> Selector {
        match self {
            Self::Username => Selector::label("Username"),
            Self::Password => Selector::label("Password"),
            Self::LoginButton => Selector::role("button", "Login"),
            Self::RoomListing => Selector::test_id("roomlisting"),
            Self::RoomName => Selector::css("#roomName"),
            Self::RoomType => Selector::css("#type"),
            Self::Accessible => Selector::css("#accessible"),
            Self::RoomPrice | Self::EditPrice => Selector::css("#roomPrice"),
            Self::CreateRoom => Selector::css("#createRoom"),
            Self::RowName => Selector::css("[id^=\"roomName\"]"),
            Self::RowType => Selector::css("[id^=\"type\"]"),
            Self::RowAccessible => Selector::css("[id^=\"accessible\"]"),
            Self::RowPrice => Selector::css("[id^=\"roomPrice\"]"),
            Self::RowDetails => Selector::css("[id^=\"details\"]"),
            Self::RowEdit => Selector::css(".roomEdit"),
            Self::RowDelete => Selector::css(".roomDelete"),
            Self::EditButton => Selector::css_with_text("button", "Edit"),
            Self::UpdateButton => Selector::css_with_text("button", "Update"),
        }
    }
}

/// Elements of the client site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientSelector {
    /// Booking section on the home page
    Booking,
    /// Rooms section on the home page
    Rooms,
    /// One room card
    RoomCard,
    /// Card title
    CardTitle,
    /// Card "Book now" link
    CardBook,
    /// Date inputs of the booking widget
    DateInput,
    /// Availability check button of the booking widget
    CheckAvailability,
    /// Booking card on the reservation page
    BookingCard,
    /// Price figures in the booking card
    TotalPrice,
    /// Opens the guest form
    ReserveButton,
    /// Availability calendar
    Calendar,
    /// Guest first name
    FirstName,
    /// Guest last name
    LastName,
    /// Guest email
    Email,
    /// Guest phone
    Phone,
    /// Submits the guest form
    ReserveNow,
    /// Dismisses the guest form
    CancelBooking,
    /// Reservation page heading
    RoomTitle,
    /// Nightly price on the reservation page
    RoomPrice,
    /// Room description paragraphs
    RoomDescription,
    /// Amenity labels
    Amenity,
    /// Validation error box
    ErrorAlert,
    /// Booking confirmation message
    BookingConfirmed,
}

impl ClientSelector {
    /// Every key, in declaration order
    pub const ALL: [Self; 23] = [
        Self::Booking,
        Self::Rooms,
        Self::RoomCard,
        Self::CardTitle,
        Self::CardBook,
        Self::DateInput,
        Self::CheckAvailability,
        Self::BookingCard,
        Self::TotalPrice,
        Self::ReserveButton,
        Self::Calendar,
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::ReserveNow,
        Self::CancelBooking,
        Self::RoomTitle,
        Self::RoomPrice,
        Self::RoomDescription,
        Self::Amenity,
        Self::ErrorAlert,
        Self::BookingConfirmed,
    ];

    /// Stable key name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Rooms => "rooms",
            Self::RoomCard => "room_card",
            Self::CardTitle => "card_title",
            Self::CardBook => "card_book",
            Self::DateInput => "date_input",
            Self::CheckAvailability => "check_availability",
            Self::BookingCard => "booking_card",
            Self::TotalPrice => "total_price",
            Self::ReserveButton => "reserve_button",
            Self::Calendar => "calendar",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::ReserveNow => "reserve_now",
            Self::CancelBooking => "cancel_booking",
            Self::RoomTitle => "room_title",
            Self::RoomPrice => "room_price",
            Self::RoomDescription => "room_description",
            Self::Amenity => "amenity",
            Self::ErrorAlert => "error_alert",
            Self::BookingConfirmed => "booking_confirmed",
        }
    }

    /// Locator for this key
    #[must_use]
    pub fn selector(self) -> Selector {
        match self {
            Self::Booking => Selector::css("#booking"),
            Self::Rooms => Selector::css("#rooms"),
            Self::RoomCard => Selector::css(".room-card"),
            Self::CardTitle => Selector::css(".card-title"),
            Self::CardBook => Selector::css("a.btn-primary"),
            Self::DateInput => Selector::css("input.form-control"),
            Self::CheckAvailability => Selector::css("button.btn-primary"),
            Self::BookingCard => Selector::css(".booking-card"),
            Self::TotalPrice => Selector::css(".fw-bold"),
            Self::ReserveButton => Selector::css("#doReservation"),
            Self::Calendar => Selector::css(".rbc-calendar"),
            Self::FirstName => Selector::css(".room-firstname"),
            Self::LastName => Selector::css(".room-lastname"),
            Self::Email => Selector::css(".room-email"),
            Self::Phone => Selector::css(".room-phone"),
            Self::ReserveNow => Selector::css_with_text("button.btn-primary", "Reserve Now"),
            Self::CancelBooking => Selector::css_with_text("button.btn-secondary", "Cancel"),
            Self::RoomTitle => Selector::css("h1.fw-bold"),
            Self::RoomPrice => Selector::css(".text-primary.fs-2"),
            Self::RoomDescription => Selector::css(".mb-4 p"),
            Self::Amenity => Selector::css(".amenity-icon + span"),
            Self::ErrorAlert => Selector::css(".alert-danger"),
            Self::BookingConfirmed => Selector::text("Booking Confirmed"),
        }
    }
}

/// Any registry key, addressed as `admin.<name>` or `client.<name>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKey {
    /// Admin site key
    Admin(AdminSelector),
    /// Client site key
    Client(ClientSelector),
}

impl SelectorKey {
    /// Every key across both sites
    pub fn all() -> impl Iterator<Item = Self> {
        AdminSelector::ALL
            .into_iter()
            .map(Self::Admin)
            .chain(ClientSelector::ALL.into_iter().map(Self::Client))
    }

    /// Locator for this key
    #[must_use]
    pub fn selector(self) -> Selector {
        match self {
            Self::Admin(key) => key.selector(),
            Self::Client(key) => key.selector(),
        }
    }
}

impl fmt::Display for SelectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin(key) => write!(f, "admin.{}", key.name()),
            Self::Client(key) => write!(f, "client.{}", key.name()),
        }
    }
}

impl FromStr for SelectorKey {
    type Err = HotelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = match s.split_once('.') {
            Some(("admin", name)) => AdminSelector::ALL
                .into_iter()
                .find(|k| k.name() == name)
                .map(Self::Admin),
            Some(("client", name)) => ClientSelector::ALL
                .into_iter()
                .find(|k| k.name() == name)
                .map(Self::Client),
            _ => None,
        };
        found.ok_or_else(|| HotelError::UnknownKey {
            kind: "selector",
            key: s.to_string(),
        })
    }
}

/// Room amenity, bound to one checkbox on the admin forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    /// Wireless internet
    WiFi,
    /// Television
    #[serde(rename = "TV")]
    Tv,
    /// Radio
    Radio,
    /// Refreshments
    Refreshments,
    /// In-room safe
    Safe,
    /// Views
    Views,
}

impl Feature {
    /// Every feature, in display order
    pub const ALL: [Self; 6] = [
        Self::WiFi,
        Self::Tv,
        Self::Radio,
        Self::Refreshments,
        Self::Safe,
        Self::Views,
    ];

    /// Name used by the backend and the UI
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WiFi => "WiFi",
            Self::Tv => "TV",
            Self::Radio => "Radio",
            Self::Refreshments => "Refreshments",
            Self::Safe => "Safe",
            Self::Views => "Views",
        }
    }

    /// Id of the checkbox that toggles this feature
    #[must_use]
    pub const fn checkbox_id(self) -> &'static str {
        match self {
            Self::WiFi => "wifiCheckbox",
            Self::Tv => "tvCheckbox",
            Self::Radio => "radioCheckbox",
            Self::Refreshments => "refreshmentsCheckbox",
            Self::Safe => "safeCheckbox",
            Self::Views => "viewsCheckbox",
        }
    }

    /// Locator for the checkbox
    #[must_use]
    pub fn checkbox(self) -> Selector {
        Selector::css(format!("#{}", self.checkbox_id()))
    }

    /// Inverse of [`Feature::checkbox_id`]
    ///
    /// # Errors
    ///
    /// Fails with [`HotelError::UnknownKey`] for unmapped ids.
    pub fn from_checkbox_id(id: &str) -> Result<Self, HotelError> {
        Self::ALL
            .into_iter()
            .find(|f| f.checkbox_id() == id)
            .ok_or_else(|| HotelError::UnknownKey {
                kind: "checkbox",
                key: id.to_string(),
            })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = HotelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| HotelError::UnknownKey {
                kind: "feature",
                key: s.to_string(),
            })
    }
}

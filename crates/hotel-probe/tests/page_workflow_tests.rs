//! Page object workflows composed through the public API on a scripted page

#![allow(clippy::unwrap_used, clippy::expect_used)]

use hotel_probe::mock::{ClickEffect, FakeElement, FakePage};
use hotel_probe::pages::{AdminRoomsPage, PageObject};
use hotel_probe::selectors::Feature;
use hotel_probe::{
    with_fixture, AdminAuth, ElementAction, FixtureState, HotelError, NewRoom, RoomType,
    SuiteConfig, Tab,
};
use std::sync::Arc;

const USERNAME: &str = "label=\"Username\"";
const PASSWORD: &str = "label=\"Password\"";
const LOGIN: &str = "role=button[name=\"Login\"]";
const LISTING: &str = "[data-testid=\"roomlisting\"]";
const ROOMS_URL: &str = "http://localhost:3000/admin/rooms";

fn admin_site(page: &FakePage) {
    page.add(USERNAME, FakeElement::visible(""));
    page.add(PASSWORD, FakeElement::visible(""));
    page.add(LOGIN, FakeElement::visible("Login"));
    page.on_click(LOGIN, ClickEffect::Navigate(ROOMS_URL.to_string()));
    page.on_click(LOGIN, ClickEffect::Hide(USERNAME.to_string()));
    for key in ["#roomName", "#type", "#accessible", "#roomPrice", "#createRoom"] {
        page.add(key, FakeElement::visible(""));
    }
    for feature in Feature::ALL {
        page.add(format!("#{}", feature.checkbox_id()), FakeElement::checkbox(false));
    }
}

fn tab(page: &Arc<FakePage>) -> Tab {
    let config = SuiteConfig::default()
        .with_credentials("admin", "password")
        .with_action_timeout_ms(80);
    Tab::new(page.clone(), Arc::new(config))
}

#[tokio::test]
async fn test_authenticated_create_room_workflow() {
    let page = Arc::new(FakePage::new());
    admin_site(&page);
    page.on_click(
        "#createRoom",
        ClickEffect::Show(format!("{LISTING} >> has-text=\"666-77\"")),
    );
    let tab = tab(&page);
    let room = NewRoom::new("666-77", RoomType::Single)
        .with_accessible(true)
        .with_price(888)
        .with_features([Feature::WiFi, Feature::Tv]);

    let mut auth = AdminAuth::new();
    with_fixture(&mut auth, &tab, |session| {
        let room = room.clone();
        async move {
            assert_eq!(session.landing_url(), ROOMS_URL);
            let rooms = session.rooms()?;
            assert!(rooms.is_current(session.landing_url()));
            rooms.create_room(&room).await?;
            rooms.wait_for_room(&room.room_name).await
        }
    })
    .await
    .unwrap();

    assert_eq!(auth.state(), FixtureState::TornDown);
    assert_eq!(page.value_of(USERNAME).as_deref(), Some("admin"));
    assert_eq!(page.value_of("#roomPrice").as_deref(), Some("888"));
    assert!(page.is_checked("#wifiCheckbox"));
    assert!(page.was_performed("#createRoom", &ElementAction::Click));
}

#[tokio::test]
async fn test_body_never_runs_without_login() {
    let page = Arc::new(FakePage::new());
    admin_site(&page);
    page.remove(LOGIN);
    let tab = tab(&page);

    let mut auth = AdminAuth::new();
    let mut body_ran = false;
    let err = with_fixture(&mut auth, &tab, |_session| {
        body_ran = true;
        async { Ok(()) }
    })
    .await
    .unwrap_err();

    assert!(!body_ran);
    assert!(matches!(err, HotelError::Fixture { .. }));
    assert_eq!(auth.state(), FixtureState::Failed);
}

#[tokio::test]
async fn test_rooms_page_reads_rendered_rows() {
    let page = Arc::new(FakePage::new());
    page.set_count(LISTING, 2);
    for (index, name) in ["101", "102"].into_iter().enumerate() {
        page.add(
            format!("{LISTING} >> nth={index} >> [id^=\"roomName\"]"),
            FakeElement::visible(name),
        );
    }
    let rooms = AdminRoomsPage::new(&tab(&page)).unwrap();

    let rows = rooms.room_rows().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].name().await.unwrap(), "102");
    assert_eq!(rooms.find_row("101").await.unwrap().unwrap().index(), 0);
}

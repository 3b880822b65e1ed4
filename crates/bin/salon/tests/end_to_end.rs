//! Drives the dealership caches against the in-memory backend, several
//! clients at once, the way the CLI does against the real API.

use std::time::Duration;

use tokio::sync::watch;

use salon_adapter_memory::{MemoryBackend, MemoryClient};
use salon_app::dealership::Dealership;
use salon_app::event_bus::InProcessEventBus;
use salon_domain::car::CarDraft;
use salon_domain::catalog::{Catalog, SortDirection, SortKey};
use salon_domain::error::SalonError;
use salon_domain::event::ChangeEvent;
use salon_domain::id::CarId;
use salon_domain::leasing::LeasingRequest;
use salon_domain::user::{Credentials, NewCustomer, Registration};

type Shop = Dealership<MemoryClient, InProcessEventBus>;

async fn start(backend: &MemoryBackend) -> (Shop, InProcessEventBus) {
    let bus = InProcessEventBus::new(64);
    let shop = Dealership::start(backend.client(), bus.clone()).await;
    (shop, bus)
}

async fn start_as(backend: &MemoryBackend, username: &str, password: &str) -> Shop {
    let (shop, _) = start(backend).await;
    shop.auth()
        .login(&Credentials::new(username, password))
        .await
        .unwrap();
    shop
}

async fn settle<T>(rx: &mut watch::Receiver<T>, done: impl FnMut(&T) -> bool) {
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(done))
        .await
        .expect("cache did not settle in time")
        .unwrap();
}

fn new_car() -> CarDraft {
    CarDraft::builder()
        .brand("Skoda")
        .model("Octavia")
        .year(2022)
        .vin("TMBJJ7NE8N0123456")
        .price(110_000.0)
        .horse_power(150)
        .build()
        .unwrap()
}

#[tokio::test]
async fn should_start_anonymous_with_public_car_list() {
    let backend = MemoryBackend::with_demo_data();
    let (shop, _) = start(&backend).await;

    assert!(shop.auth().current_user().is_none());
    assert_eq!(shop.cars().cars().len(), 4);
    assert!(shop.customers().customers().is_empty());

    let view = shop.catalog_view(&Catalog::new());
    assert!(view.owned.is_empty());
    assert_eq!(view.for_sale.len(), 4);
}

#[tokio::test]
async fn should_follow_dealer_session_with_customer_cache() {
    let backend = MemoryBackend::with_demo_data();
    let (shop, _) = start(&backend).await;
    let mut customers = shop.customers().subscribe();

    shop.auth()
        .login(&Credentials::new("dealer", "dealer"))
        .await
        .unwrap();
    settle(&mut customers, |c| c.len() == 2).await;

    shop.customers()
        .add_customer(&NewCustomer::new("ewa", "pw", "Ewa", "Lis"))
        .await
        .unwrap();
    assert_eq!(shop.customers().customers().len(), 3);

    shop.auth().logout().await.unwrap();
    settle(&mut customers, Vec::is_empty).await;
}

#[tokio::test]
async fn should_have_customer_list_once_synced_for_signed_in_dealer() {
    let backend = MemoryBackend::with_demo_data();
    let shop = start_as(&backend, "dealer", "dealer").await;
    let dealer = shop.auth().current_user().unwrap();

    tokio::time::timeout(
        Duration::from_secs(2),
        shop.customers().wait_synced_for(dealer.id),
    )
    .await
    .expect("customer cache was not synced for the dealer");

    assert_eq!(shop.customers().customers().len(), 2);
}

#[tokio::test]
async fn should_never_load_customers_for_customer_session() {
    let backend = MemoryBackend::with_demo_data();
    let shop = start_as(&backend, "ola", "ola123").await;

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(shop.customers().customers().is_empty());
    assert!(matches!(
        shop.customers()
            .add_customer(&NewCustomer::new("ewa", "pw", "Ewa", "Lis"))
            .await,
        Err(SalonError::Forbidden)
    ));
}

#[tokio::test]
async fn should_keep_car_cache_in_step_with_dealer_edits() {
    let backend = MemoryBackend::with_demo_data();
    let shop = start_as(&backend, "dealer", "dealer").await;
    let mut cars = shop.cars().subscribe();
    cars.mark_unchanged();

    let added = shop.cars().add_car(&new_car()).await.unwrap();
    assert!(cars.has_changed().unwrap());
    assert_eq!(cars.borrow_and_update().len(), 5);

    let mut edit = added.to_draft();
    edit.price = 99_000.0;
    shop.cars().update_car(added.id, &edit).await.unwrap();
    let cached = shop.cars().cached_car(added.id).unwrap();
    assert!((cached.price - 99_000.0).abs() < f64::EPSILON);

    shop.cars().delete_car(added.id).await.unwrap();
    assert!(shop.cars().cached_car(added.id).is_none());
    assert_eq!(shop.cars().cars().len(), 4);
}

#[tokio::test]
async fn should_refresh_rented_car_and_show_it_as_rented() {
    let backend = MemoryBackend::with_demo_data();
    let shop = start_as(&backend, "ola", "ola123").await;
    let id = CarId::new(1);

    shop.cars().rent_car(id).await.unwrap();

    let car = shop.cars().cached_car(id).unwrap();
    assert!(!car.is_available_for_rent);
    let view = shop.catalog_view(&Catalog::new());
    assert_eq!(view.rented.len(), 1);
    assert_eq!(view.rented[0].id, id);

    let renter = shop.cars().renter(id).await.unwrap();
    assert_eq!(renter.renter_id, shop.auth().current_user().map(|u| u.id));

    shop.cars().return_car(id).await.unwrap();
    assert!(shop.cars().cached_car(id).unwrap().is_available_for_rent);
}

#[tokio::test]
async fn should_leave_cache_untouched_when_server_rejects() {
    let backend = MemoryBackend::with_demo_data();
    let ola = start_as(&backend, "ola", "ola123").await;
    let piotr = start_as(&backend, "piotr", "piotr123").await;
    let id = CarId::new(2);

    ola.cars().rent_car(id).await.unwrap();
    let before = piotr.cars().cars();

    let result = piotr.cars().rent_car(id).await;

    assert!(matches!(result, Err(SalonError::Rejected(_))));
    assert_eq!(piotr.cars().cars(), before);

    piotr.cars().load().await.unwrap();
    assert!(piotr.cars().cached_car(id).unwrap().renter_id.is_some());
}

#[tokio::test]
async fn should_move_bought_car_from_for_sale_to_owned() {
    let backend = MemoryBackend::with_demo_data();
    let shop = start_as(&backend, "ola", "ola123").await;
    let mut catalog = Catalog::new();
    catalog.sort_by(SortKey::Price, SortDirection::Descending);

    shop.cars().buy_car(CarId::new(2)).await.unwrap();

    let view = shop.catalog_view(&catalog);
    assert_eq!(view.owned.len(), 1);
    assert_eq!(view.owned[0].brand, "BMW");
    let prices: Vec<f64> = view.for_sale.iter().map(|c| c.price).collect();
    assert_eq!(prices, vec![160_000.0, 80_000.0, 45_000.0]);
}

#[tokio::test]
async fn should_quote_leasing_without_session() {
    let backend = MemoryBackend::with_demo_data();
    let (shop, _) = start(&backend).await;

    let quote = shop
        .cars()
        .lease_car(CarId::new(3), &LeasingRequest::new(5_000.0, 24))
        .await
        .unwrap();

    assert_eq!(quote.remaining_amount, "40000.00");
    assert_eq!(quote.monthly_rate, "1666.67");
}

#[tokio::test]
async fn should_sign_in_after_registration() {
    let backend = MemoryBackend::with_demo_data();
    let (shop, _) = start(&backend).await;

    shop.auth()
        .register(&Registration::new("ewa", "pw", "Ewa", "Lis"))
        .await
        .unwrap();

    assert_eq!(
        shop.auth().current_user().map(|u| u.username),
        Some("ewa".to_string())
    );
    assert!(!shop.auth().is_dealer());
}

#[tokio::test]
async fn should_publish_session_and_car_events() {
    let backend = MemoryBackend::with_demo_data();
    let (shop, bus) = start(&backend).await;
    let mut events = bus.subscribe();

    shop.auth()
        .login(&Credentials::new("ola", "ola123"))
        .await
        .unwrap();
    shop.cars().buy_car(CarId::new(4)).await.unwrap();

    let mut kinds = Vec::new();
    while let Ok(event) = events.try_recv() {
        kinds.push(event);
    }
    assert!(matches!(kinds.first(), Some(ChangeEvent::SessionStarted { .. })));
    assert!(kinds.iter().any(|e| matches!(
        e,
        ChangeEvent::CarUpdated { car } if car.id == CarId::new(4) && car.owner_id.is_some()
    )));
}

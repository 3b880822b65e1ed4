//! Runs one CLI command against a started [`Dealership`].

use std::time::Duration;

use anyhow::Context;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use salon_app::dealership::Dealership;
use salon_app::event_bus::InProcessEventBus;
use salon_app::ports::{AuthApi, CarApi, CustomerApi, EventPublisher};
use salon_domain::car::CarDraft;
use salon_domain::catalog::{Catalog, SortDirection};
use salon_domain::id::CarId;
use salon_domain::leasing::LeasingRequest;
use salon_domain::user::NewCustomer;

use crate::cli::{CarCommand, Command, CustomerCommand};
use crate::config::Config;
use crate::output;

/// Start the caches over `api`, restore or open a session, then run
/// `command`.
pub async fn run<A>(api: A, config: &Config, command: Command) -> anyhow::Result<()>
where
    A: AuthApi + CarApi + CustomerApi + Clone + Send + Sync + 'static,
{
    let bus = InProcessEventBus::new(256);
    let shop = Dealership::start(api, bus.clone()).await;

    if !matches!(command, Command::Register(_)) && !shop.auth().is_logged_in() {
        if let Some(credentials) = config.credentials() {
            shop.auth()
                .login(&credentials)
                .await
                .with_context(|| format!("failed to sign in as {}", credentials.username))?;
        }
    }

    match command {
        Command::Whoami => match shop.auth().current_user() {
            Some(user) => println!("{}", output::user_line(&user)),
            None => println!("not signed in"),
        },
        Command::Cars { command } => cars(&shop, command).await?,
        Command::Customers { command } => customers(&shop, command, config.api.timeout()).await?,
        Command::Register(args) => {
            let outcome = shop
                .auth()
                .register(&NewCustomer::from(args))
                .await
                .context("registration failed")?;
            if let Some(message) = outcome.message {
                println!("{message}");
            }
            if let Some(user) = outcome.user {
                println!("signed in as {}", output::user_line(&user));
            }
        }
        Command::Logout => {
            shop.auth().logout().await.context("logout failed")?;
            println!("signed out");
        }
        Command::Watch { interval } => watch(&shop, &bus, interval).await?,
    }
    Ok(())
}

async fn cars<A>(shop: &Dealership<A, InProcessEventBus>, command: CarCommand) -> anyhow::Result<()>
where
    A: AuthApi + CarApi + CustomerApi,
{
    let cars = shop.cars();
    match command {
        CarCommand::List { brand, sort, desc } => {
            let mut catalog = Catalog::new();
            if let Some(brand) = brand {
                catalog.set_brand_query(brand);
            }
            if let Some(sort) = sort {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                catalog.sort_by(sort.into(), direction);
            }
            if let Some(line) = output::sort_line(&catalog) {
                println!("{line}");
            }
            let view = shop.catalog_view(&catalog);
            print!("{}", output::catalog(&view, shop.auth().is_logged_in()));
        }
        CarCommand::Show { id } => {
            let car = cars.get_car(id).await.context("failed to fetch car")?;
            println!("{}", output::car_line(&car));
        }
        CarCommand::Add(args) => {
            let car = cars
                .add_car(&CarDraft::from(args))
                .await
                .context("failed to add car")?;
            println!("added {}", output::car_line(&car));
        }
        CarCommand::Update { id, changes } => {
            let current = match cars.cached_car(id) {
                Some(car) => car,
                None => cars.get_car(id).await.context("failed to fetch car")?,
            };
            let mut draft = current.to_draft();
            changes.apply(&mut draft);
            let car = cars
                .update_car(id, &draft)
                .await
                .context("failed to update car")?;
            println!("updated {}", output::car_line(&car));
        }
        CarCommand::Delete { id } => {
            cars.delete_car(id).await.context("failed to delete car")?;
            println!("deleted car #{id}");
        }
        CarCommand::Rent { id } => {
            cars.rent_car(id).await.context("failed to rent car")?;
            report(shop, id, "rented");
        }
        CarCommand::Return { id } => {
            cars.return_car(id).await.context("failed to return car")?;
            report(shop, id, "returned");
        }
        CarCommand::Buy { id } => {
            cars.buy_car(id).await.context("failed to buy car")?;
            report(shop, id, "bought");
        }
        CarCommand::Renter { id } => {
            let renter = cars.renter(id).await.context("failed to fetch renter")?;
            match renter.renter_id {
                Some(user) => println!("car #{} is rented by user #{user}", renter.car_id),
                None => println!("car #{} is not rented", renter.car_id),
            }
        }
        CarCommand::Lease {
            id,
            down_payment,
            months,
        } => {
            let quote = cars
                .lease_car(id, &LeasingRequest::new(down_payment, months))
                .await
                .context("failed to calculate leasing")?;
            println!("{}", output::leasing(&quote));
        }
    }
    Ok(())
}

fn report<A, P>(shop: &Dealership<A, P>, id: CarId, verb: &str)
where
    A: AuthApi + CarApi + CustomerApi,
    P: EventPublisher,
{
    match shop.cars().cached_car(id) {
        Some(car) => println!("{verb} {}", output::car_line(&car)),
        None => println!("{verb} car #{id}"),
    }
}

async fn customers<A>(
    shop: &Dealership<A, InProcessEventBus>,
    command: CustomerCommand,
    wait: Duration,
) -> anyhow::Result<()>
where
    A: AuthApi + CarApi + CustomerApi,
{
    match command {
        CustomerCommand::List => {
            let user = shop
                .auth()
                .current_user()
                .context("sign in as a dealer to list customers")?;
            anyhow::ensure!(user.is_dealer, "only dealers can list customers");
            // The session follower fetches the list; wait for it instead of asking again.
            tokio::time::timeout(wait, shop.customers().wait_synced_for(user.id))
                .await
                .context("timed out waiting for the customer list")?;
            for customer in shop.customers().customers() {
                println!("{}", output::user_line(&customer));
            }
        }
        CustomerCommand::Add(args) => {
            let created = shop
                .customers()
                .add_customer(&NewCustomer::from(args))
                .await
                .context("failed to add customer")?;
            println!("created {}", output::user_line(&created.user));
        }
    }
    Ok(())
}

/// Print every change event, re-syncing the caches every `interval` seconds,
/// until Ctrl-C.
async fn watch<A>(
    shop: &Dealership<A, InProcessEventBus>,
    bus: &InProcessEventBus,
    interval: u64,
) -> anyhow::Result<()>
where
    A: AuthApi + CarApi + CustomerApi,
{
    let mut events = BroadcastStream::new(bus.subscribe());
    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!(interval, "watching for changes");
    loop {
        tokio::select! {
            res = &mut shutdown => {
                res.context("failed to listen for Ctrl-C")?;
                break;
            }
            _ = ticker.tick() => {
                anyhow::ensure!(
                    shop.is_following_session(),
                    "customer cache stopped following the session"
                );
                // Failures are logged by the services; keep watching. A customer
                // reload that outlives the session is discarded by the service.
                let _ = shop.cars().load().await;
                if shop.auth().is_dealer() {
                    let _ = shop.customers().load().await;
                }
            }
            Some(event) = events.next() => match event {
                Ok(event) => println!("{}", serde_json::to_string(&event)?),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "watch fell behind, some changes were not printed");
                }
            },
        }
    }
    Ok(())
}

//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use salon_domain::car::CarDraft;
use salon_domain::catalog::SortKey;
use salon_domain::id::CarId;
use salon_domain::user::NewCustomer;

#[derive(Debug, Parser)]
#[command(author, version, about = "Car dealership client")]
pub struct Cli {
    /// Configuration file.
    #[arg(long, short, env = "SALON_CONFIG", default_value = "salon.toml")]
    pub config: PathBuf,

    /// Use the bundled in-memory backend instead of the API.
    #[arg(long)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show who the session belongs to.
    Whoami,
    /// Browse and manage cars.
    Cars {
        #[command(subcommand)]
        command: CarCommand,
    },
    /// Manage customer accounts (dealers only).
    Customers {
        #[command(subcommand)]
        command: CustomerCommand,
    },
    /// Create an account for yourself.
    Register(AccountArgs),
    /// End the session.
    Logout,
    /// Print every cache change until interrupted.
    Watch {
        /// Seconds between re-syncs with the server.
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}

#[derive(Debug, Subcommand)]
pub enum CarCommand {
    /// List owned, rented and for-sale cars.
    List {
        /// Only show for-sale cars whose brand contains this text.
        #[arg(long)]
        brand: Option<String>,
        /// Order the for-sale cars.
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Sort descending instead of ascending.
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Show one car.
    Show { id: CarId },
    /// Add a car (dealers only).
    Add(CarArgs),
    /// Change some fields of a car (dealers only).
    Update {
        id: CarId,
        #[command(flatten)]
        changes: CarChanges,
    },
    /// Remove a car (dealers only).
    Delete { id: CarId },
    /// Rent a car.
    Rent { id: CarId },
    /// Return a rented car.
    Return { id: CarId },
    /// Buy a car.
    Buy { id: CarId },
    /// Show who rents a car.
    Renter { id: CarId },
    /// Get a leasing quote.
    Lease {
        id: CarId,
        #[arg(long)]
        down_payment: f64,
        #[arg(long)]
        months: u32,
    },
}

#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    /// List customer accounts.
    List,
    /// Create a customer account.
    Add(AccountArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Price,
    HorsePower,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Price => Self::Price,
            SortArg::HorsePower => Self::HorsePower,
        }
    }
}

#[derive(Debug, Args)]
pub struct CarArgs {
    #[arg(long)]
    pub brand: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub year: i32,
    #[arg(long)]
    pub vin: String,
    #[arg(long)]
    pub price: f64,
    #[arg(long)]
    pub horse_power: u32,
    /// Keep the car out of the rental pool.
    #[arg(long)]
    pub not_for_rent: bool,
}

impl From<CarArgs> for CarDraft {
    fn from(args: CarArgs) -> Self {
        Self {
            brand: args.brand,
            model: args.model,
            year: args.year,
            vin: args.vin,
            price: args.price,
            horse_power: args.horse_power,
            is_available_for_rent: !args.not_for_rent,
        }
    }
}

/// Fields to change on an existing car; unset fields keep their value.
#[derive(Debug, Args)]
pub struct CarChanges {
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub vin: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub horse_power: Option<u32>,
    #[arg(long)]
    pub available_for_rent: Option<bool>,
}

impl CarChanges {
    pub fn apply(self, draft: &mut CarDraft) {
        if let Some(brand) = self.brand {
            draft.brand = brand;
        }
        if let Some(model) = self.model {
            draft.model = model;
        }
        if let Some(year) = self.year {
            draft.year = year;
        }
        if let Some(vin) = self.vin {
            draft.vin = vin;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(horse_power) = self.horse_power {
            draft.horse_power = horse_power;
        }
        if let Some(available) = self.available_for_rent {
            draft.is_available_for_rent = available;
        }
    }
}

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long, env = "SALON_NEW_PASSWORD")]
    pub password: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
}

impl From<AccountArgs> for NewCustomer {
    fn from(args: AccountArgs) -> Self {
        Self::new(args.username, args.password, args.first_name, args.last_name)
    }
}

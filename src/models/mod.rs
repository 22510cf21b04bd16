// Billing API data model, as consumed by the dashboard

mod bill;
mod price;
mod resource;
mod wallet;

pub use bill::{Bill, BillItem, ComputeBillOutcome, ComputeBillRequest};
pub use price::{
    CurrencyPricing, LatestPrices, PerGbHourRate, PerHourRate, PriceCatalog, PriceHistory,
    PriceVersionEntry,
};
pub use resource::{
    Compute, ComputeState, Disk, DiskState, Event, FloatingIp, Resource, ResourceKind,
};
pub use wallet::{
    CreditRequest, Transaction, TransactionHistory, TransactionType, Wallet, WalletCreate,
    WalletSettings,
};

//! Store API: catalog, cart, orders, inventory, balance and coupons.

pub mod client;
pub mod types;

pub use client::StoreClient;

pub mod browser;
pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod parser;
pub mod poller;
pub mod scraper;
pub mod store;
pub mod storefront;

// Library for tests to access modules

pub mod api;
pub mod config;
pub mod cost;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod panels;
pub mod policy;
pub mod prices;
pub mod routes;
pub mod shell;
pub mod sidebar;
pub mod timeline;
pub mod version;
pub mod wallet;

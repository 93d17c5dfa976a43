pub mod api;
pub mod board;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod logging;
pub mod panel;
pub mod proxy;
pub mod routes;
pub mod screens;
pub mod server;
pub mod session;
pub mod ui;

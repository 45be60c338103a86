pub mod cell;
pub mod config;
pub mod context;
pub mod fetch_error;
pub mod fetcher;
pub mod loader;
pub mod palette;
pub mod schema;
pub mod section;
pub mod sheet;
pub mod view;

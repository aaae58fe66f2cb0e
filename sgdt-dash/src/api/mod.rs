//! HTTP API handlers for sgdt-dash

pub mod buildinfo;
pub mod clock;
pub mod health;
pub mod ui;
pub mod upload;

pub use buildinfo::get_build_info;
pub use clock::clock_stream;
pub use health::health_routes;
pub use ui::{serve_app_js, serve_index, serve_style_css};
pub use upload::upload_spreadsheet;

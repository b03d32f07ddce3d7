//! Browser dashboard for sentimeter.
//!
//! - [`app`]: router and server configuration
//! - [`charts`]: plotters SVG rendering
//! - [`html`]: page assembly
//! - [`routes`]: handlers (`/`, `/refresh`, `/api/dashboard`, `/health`)
//! - [`state`]: shared service handle
//! - [`error`]: handler errors and their HTTP mapping

pub mod app;
pub mod charts;
pub mod error;
pub mod html;
pub mod routes;
pub mod state;

pub use app::{create_app, ServerConfig};
pub use error::AppError;
pub use state::AppState;

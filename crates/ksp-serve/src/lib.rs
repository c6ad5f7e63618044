//! Inference service for campaign success prediction.
//!
//! # Endpoints
//!
//! | Method | Path       | Response                                        |
//! |--------|------------|-------------------------------------------------|
//! | GET    | `/`        | welcome message                                 |
//! | GET    | `/home`    | welcome message                                 |
//! | GET    | `/health`  | status plus artifact digest and metrics         |
//! | GET    | `/options` | countries and categories known to the model     |
//! | POST   | `/predict` | `"1"` (successful) or `"0"` (failed)            |
//! | POST   | `/reload`  | re-reads the artifact and swaps it in           |

mod config;
mod error;
mod routes;
mod server;
mod state;

pub use config::{DEFAULT_MODEL_PATH, ServeConfig};
pub use error::{ErrorDetail, ErrorResponse, Result, ServeError};
pub use routes::{WELCOME_MESSAGE, configure_routes};
pub use server::run;
pub use state::{LoadedModel, ModelOptions, ModelService};

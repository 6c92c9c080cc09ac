//! Gallery Server - HTTP front end for the pipe-delimited photo gallery
//!
//! Serves the paginated gallery as server-rendered HTML, exposes the same
//! render tree as JSON, and forwards "save" actions to the endpoint named in
//! the site's `config.txt`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Endpoints
//!
//! - `GET /`, `GET /index.html?page=N` - Gallery page
//! - `GET /jump?page=N` - Validated jump to a page
//! - `GET /api/page/{page}` - Render tree of a page as JSON
//! - `POST /api/save` - Forward a save envelope
//! - `GET /api/metadata` - Site and server metadata
//! - `GET /health` - Liveness probe

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;

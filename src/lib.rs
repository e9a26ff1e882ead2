//! # Gatehouse
//!
//! An identity and access gateway: a fronting proxy forwards each request's
//! method, path, and bearer token here, and the gateway answers allow or
//! deny. It owns login, token rotation, service credential exchange, and
//! the policy rules that map paths to required permissions.
//!
//! ## Features
//!
//! - **Forward-auth decisions**: One endpoint answers allow/deny for any
//!   method and path, with the denial reason mapped to an HTTP status
//! - **Path policies**: Exact, prefix, and segment-wildcard patterns with
//!   specificity-based selection
//! - **Token rotation**: Refresh tokens are single-use; reuse of a stale
//!   token revokes the whole session chain
//! - **Service credentials**: Machine clients exchange an id/secret pair
//!   for short-lived access tokens
//! - **RBAC**: Roles flatten to permission sets, cached per principal
//! - **Hot policy reload**: Decisions serve from an atomic snapshot that
//!   refreshes in the background
//!
//! ## Quick Start - Deciding Without HTTP
//!
//! ```rust,no_run
//! use gatehouse_rs::config::Config;
//! use gatehouse_rs::core::decision::AccessRequest;
//! use gatehouse_rs::server::HttpServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let server = HttpServer::new(&config).await?;
//!
//!     let record = server
//!         .state()
//!         .engine
//!         .decide(AccessRequest {
//!             method: "GET".to_string(),
//!             path: "/reports/q3".to_string(),
//!             client_addr: None,
//!             bearer: None,
//!             request_id: "req-1".to_string(),
//!         })
//!         .await;
//!
//!     println!("Outcome: {:?}", record.outcome);
//!     Ok(())
//! }
//! ```
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use gatehouse_rs::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config).await?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{GatewayError, Result};

// Export the decision surface
pub use crate::core::decision::{AccessRequest, DecisionRecord, DenyReason, Outcome};
pub use crate::core::policy::{PathPattern, Policy};

use tracing::info;

/// A minimal gateway facade: configuration in, running server out
pub struct Gateway {
    config: Config,
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");

        // Create HTTP server
        let server = server::HttpServer::new(&config).await?;

        Ok(Self { config, server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!("Starting Gatehouse");
        info!(
            "Listening on {}:{}",
            self.config.server().host,
            self.config.server().port
        );

        // Start HTTP server
        self.server.start().await?;

        Ok(())
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build information captured at compile time
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}

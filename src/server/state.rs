//! Application state shared across HTTP handlers
//!
//! This module provides the AppState struct and its implementations.

use crate::auth::AuthSystem;
use crate::config::Config;
use crate::core::decision::DecisionEngine;
use crate::core::policy::PolicyCache;
use crate::server::middleware::LoginThrottle;
use std::sync::Arc;
use std::time::Instant;

/// HTTP server state shared across handlers
///
/// This struct contains shared resources that need to be accessed across
/// multiple request handlers. All fields are wrapped in Arc for efficient
/// sharing across threads.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Authentication system
    pub auth: Arc<AuthSystem>,
    /// Access decision engine
    pub engine: Arc<DecisionEngine>,
    /// Policy snapshot cache behind the engine
    pub policies: Arc<PolicyCache>,
    /// Brute-force throttle for the credential endpoints
    pub throttle: Arc<LoginThrottle>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(
        config: Config,
        auth: Arc<AuthSystem>,
        engine: Arc<DecisionEngine>,
        policies: Arc<PolicyCache>,
        throttle: Arc<LoginThrottle>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            auth,
            engine,
            policies,
            throttle,
            started_at: Instant::now(),
        }
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Seconds since the server state was built
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

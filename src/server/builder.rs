//! Server bootstrap
//!
//! This module provides the run_server function for automatic
//! configuration loading.

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::Result;
use tracing::info;

/// Run the server with automatic configuration loading
pub async fn run_server(config_path: &str) -> Result<()> {
    info!("🚀 Starting Gatehouse");

    info!("📄 Loading configuration file: {}", config_path);

    let config = match Config::from_file(config_path).await {
        Ok(config) => {
            info!("✅ Configuration file loaded successfully");
            config
        }
        Err(e) => {
            info!(
                "⚠️  Configuration file loading failed, using default config: {}",
                e
            );
            info!("💡 Default config serves seeded demo data only; point GATEHOUSE_CONFIG at a real file for anything else");
            Config::default()
        }
    };

    // Create and start server
    let server = HttpServer::new(&config).await?;
    info!(
        "🌐 Server starting at: http://{}:{}",
        config.server().host,
        config.server().port
    );
    info!("📋 API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   GET  /health/detailed - Health with policy/throttle detail");
    info!("   GET  /version - Build information");
    info!("   POST /auth/login - User login");
    info!("   POST /auth/refresh - Refresh token rotation");
    info!("   POST /auth/logout - Revoke all sessions");
    info!("   POST /auth/validate - Access token introspection");
    info!("   POST /s2s/token - Service credential exchange");
    info!("   ANY  /v1/decide/{{path}} - Access decision");

    server.start().await
}

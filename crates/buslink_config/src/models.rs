// --- File: crates/buslink_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Stripe Config ---
// Holds non-secret Stripe config. Secret key loaded directly from env var
// STRIPE_SECRET_KEY.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    /// Currency used when a request does not name one (checkout requests must).
    pub default_currency: Option<String>,
    /// Product name shown on the gateway checkout page.
    pub product_name: Option<String>,
    /// Override for the Stripe API base URL. Tests point this at a mock server.
    pub api_base_url: Option<String>,
}

// --- Firestore Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FirestoreConfig {
    pub project_id: Option<String>,
    /// Path to the service account key file used for OAuth2 tokens.
    pub key_path: Option<String>,
    /// Override for the Firestore API base URL. Tests point this at a mock server.
    pub api_base_url: Option<String>,
}

// --- Trip Generation Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TripsConfig {
    /// Number of calendar days to expand, starting at today's local midnight.
    pub horizon_days: u32,
    /// Trips per flush. The store emits up to two writes per trip, so this
    /// must stay at or below half the store's per-request write cap.
    pub batch_size: usize,
    /// Arrival fallback when a route has no estimated duration.
    pub default_duration_mins: i64,
}

impl Default for TripsConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            batch_size: 200,
            default_duration_mins: 120,
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_stripe: bool,
    #[serde(default)]
    pub use_firestore: bool,

    pub stripe: Option<StripeConfig>,
    pub firestore: Option<FirestoreConfig>,
    #[serde(default)]
    pub trips: TripsConfig,
}

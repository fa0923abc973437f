// --- File: crates/buslink_firestore/src/auth.rs ---
//! Service-account authentication for the Firestore REST API.

use buslink_config::FirestoreConfig;
use std::{error::Error, path::Path};
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator};

/// Obtains an OAuth2 access token for the Firestore API.
///
/// Reads the service account key file named in the config and requests a
/// token with the Datastore scope (Firestore shares it).
///
/// # Errors
///
/// Fails if `key_path` is missing, the key file cannot be read, or the
/// OAuth2 exchange does not yield a token.
pub async fn get_firestore_auth_token(
    config: &FirestoreConfig,
) -> Result<String, Box<dyn Error + Send + Sync>> {
    let key_path = config
        .key_path
        .as_deref()
        .ok_or("Missing key_path in FirestoreConfig")?;

    let sa_key = read_service_account_key(Path::new(key_path)).await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    let auth_token = auth
        .token(&["https://www.googleapis.com/auth/datastore"])
        .await?;
    let token = match auth_token.token() {
        Some(token) => token,
        None => {
            return Err("No token available".into());
        }
    };

    Ok(token.to_string())
}

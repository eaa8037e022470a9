//! Service account credentials and the OAuth token exchange.

use crate::error::AppError;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use ring::signature::RsaKeyPair;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the service account key document comes from.
///
/// `Inline` holds the JSON document itself (hosted deployments without a
/// writable filesystem); `File` points at a key file on disk (local development).
#[derive(Clone)]
pub enum CredentialSource {
    Inline(String),
    File(PathBuf),
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::Inline(_) => f.write_str("Inline(<redacted>)"),
            CredentialSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl CredentialSource {
    /// Short label for logs; never includes key material.
    pub fn describe(&self) -> String {
        match self {
            CredentialSource::Inline(_) => "SERVICE_ACCOUNT_JSON".to_string(),
            CredentialSource::File(path) => format!("SERVICE_ACCOUNT_FILE ({})", path.display()),
        }
    }

    /// Reads and parses the key document. Called on every resolution, so a
    /// rotated key file is picked up without a restart.
    pub async fn load(&self) -> Result<ServiceAccount, AppError> {
        match self {
            CredentialSource::Inline(json) => ServiceAccount::try_from_str(json).map_err(|e| {
                AppError::Configuration(format!("Failed to load SERVICE_ACCOUNT_JSON: {}", e))
            }),
            CredentialSource::File(path) => {
                if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                    return Err(AppError::Configuration(format!(
                        "Service account file not found: {}",
                        path.display()
                    )));
                }
                let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
                    AppError::Configuration(format!(
                        "Failed to read service account file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                ServiceAccount::try_from_str(&contents).map_err(|e| {
                    AppError::Configuration(format!(
                        "Failed to load service account file {}: {}",
                        path.display(),
                        e
                    ))
                })
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Serialize)]
struct JwtHeader {
    alg: &'static str,
    typ: &'static str,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

impl ServiceAccount {
    pub fn try_from_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Builds the RS256-signed assertion for the jwt-bearer grant.
    pub fn signed_assertion(&self, scope: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = JwtClaims {
            iss: &self.client_email,
            scope,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
        };

        let header_b64 = BASE64_URL_SAFE_NO_PAD.encode(
            serde_json::to_string(&header)
                .map_err(|e| AppError::Configuration(format!("Failed to encode jwt header: {}", e)))?,
        );
        let claims_b64 = BASE64_URL_SAFE_NO_PAD.encode(
            serde_json::to_string(&claims)
                .map_err(|e| AppError::Configuration(format!("Failed to encode jwt claims: {}", e)))?,
        );
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let key_pair = self.key_pair()?;
        let mut signature = vec![0; key_pair.public().modulus_len()];
        key_pair
            .sign(
                &ring::signature::RSA_PKCS1_SHA256,
                &ring::rand::SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|_| AppError::Configuration("Failed to sign service account jwt".to_string()))?;

        Ok(format!("{}.{}", signing_input, BASE64_URL_SAFE_NO_PAD.encode(&signature)))
    }

    fn key_pair(&self) -> Result<RsaKeyPair, AppError> {
        let mut reader = std::io::Cursor::new(self.private_key.as_bytes());
        let item = rustls_pemfile::read_one(&mut reader).map_err(|e| {
            AppError::Configuration(format!("Invalid PEM private key in service account: {}", e))
        })?;
        match item {
            Some(rustls_pemfile::Item::Pkcs8Key(der)) => RsaKeyPair::from_pkcs8(der.secret_pkcs8_der())
                .map_err(|e| AppError::Configuration(format!("Invalid pkcs8 rsa key: {}", e))),
            Some(rustls_pemfile::Item::Pkcs1Key(der)) => RsaKeyPair::from_der(der.secret_pkcs1_der())
                .map_err(|e| AppError::Configuration(format!("Invalid pkcs1 rsa key: {}", e))),
            _ => Err(AppError::Configuration(
                "Service account private key is missing".to_string(),
            )),
        }
    }

    /// Exchanges a freshly signed assertion for a bearer token.
    pub async fn fetch_access_token(
        &self,
        http: &reqwest::Client,
        scope: &str,
    ) -> Result<AccessToken, AppError> {
        let assertion = self.signed_assertion(scope)?;
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = http.post(&self.token_uri).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteService(format!(
                "Token exchange failed with {}: {}",
                status, body
            )));
        }
        Ok(response.json::<AccessToken>().await?)
    }
}

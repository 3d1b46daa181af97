//! ViaCEP address lookup client.
//!
//! Resolves a validated CEP to a street address through the public
//! ViaCEP API. Known codes come back as a JSON document carrying the
//! address fields; codes that are well formed but unassigned come back
//! as `200 OK` with an `"erro"` marker instead of an HTTP error.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use cadastro_core::{Cep, CepError};

use crate::config::ViaCepConfig;
use crate::models::Address;

/// Errors that can occur when resolving a postal code.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The postal code failed validation before any request was made.
    #[error("invalid postal code: {0}")]
    InvalidPostalCode(#[from] CepError),

    /// The service answered but has no address for this postal code.
    #[error("no address found for postal code {0}")]
    UnknownPostalCode(Cep),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Resolves postal codes to full addresses.
#[async_trait]
pub trait PostalLookup: Send + Sync {
    /// Look up the address registered for a postal code.
    async fn lookup(&self, cep: &Cep) -> Result<Address, LookupError>;
}

/// HTTP client for the ViaCEP API.
#[derive(Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    /// Create a new ViaCEP API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ViaCepConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl PostalLookup for ViaCepClient {
    /// Fetch the address for a CEP from ViaCEP.
    ///
    /// The returned address carries the CEP that was asked for, not the
    /// formatted spelling ViaCEP echoes back, so cache rows key on what
    /// clients send.
    async fn lookup(&self, cep: &Cep) -> Result<Address, LookupError> {
        let url = format!("{}/{}/json/", self.base_url, cep.as_str());

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LookupError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ViaCepResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        if body.is_unknown() {
            return Err(LookupError::UnknownPostalCode(cep.clone()));
        }

        Ok(Address {
            postal_code: cep.clone(),
            street: body.logradouro.unwrap_or_default(),
            district: body.bairro.unwrap_or_default(),
            city: body.localidade.unwrap_or_default(),
            state: body.uf.unwrap_or_default(),
        })
    }
}

/// Response document from the ViaCEP API.
///
/// Every field is optional. Rural codes often come with an empty
/// `logradouro` or `bairro`, and unassigned codes carry only `erro`.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    erro: Option<serde_json::Value>,
    logradouro: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    uf: Option<String>,
}

impl ViaCepResponse {
    /// Whether the API flagged this code as unassigned.
    ///
    /// Older ViaCEP deployments answer `"erro": true`, newer ones
    /// `"erro": "true"`. Both mean the same thing.
    fn is_unknown(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(s)) => s == "true",
            _ => false,
        }
    }
}

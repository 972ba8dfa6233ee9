//! HTTP client for the brokerage REST API

use super::envelope::{ListEnvelope, MutateEnvelope};
use crate::config::ApiConfig;
use crate::core::RealEstateId;
use crate::core::error::{ImobError, RequestError};
use crate::core::tenant::TENANT_QUERY_PARAM;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("API rejected the request: {0}")]
    Rejected(String),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl From<ClientError> for RequestError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => match e.status() {
                Some(status) => RequestError::Http {
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None if e.is_decode() => RequestError::Decode {
                    message: e.to_string(),
                },
                None => RequestError::Transport {
                    message: e.to_string(),
                },
            },
            ClientError::Serde(e) => RequestError::Decode {
                message: e.to_string(),
            },
            ClientError::Status { status, message } => RequestError::Http { status, message },
            ClientError::Rejected(message) => RequestError::Api { message },
            ClientError::InvalidResponse(message) => RequestError::Decode { message },
            ClientError::Config(message) => RequestError::Transport { message },
        }
    }
}

impl From<ClientError> for ImobError {
    fn from(err: ClientError) -> Self {
        ImobError::Request(err.into())
    }
}

/// REST client bound to one API base URL
///
/// Every request is scoped with the `real_estate_id` query parameter.
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl RestClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header: build_auth_headers(config.token.as_deref())?,
        })
    }

    /// Client with default settings against `base_url`
    pub fn with_base_url(base_url: &str) -> Result<Self, ClientError> {
        Self::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /{resource}` with extra query parameters
    pub async fn list<T: DeserializeOwned>(
        &self,
        tenant: &RealEstateId,
        resource: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<T>, ClientError> {
        let url = self.url(resource, None);
        let request = self
            .client
            .get(url)
            .headers(self.auth_header.clone())
            .query(&[(TENANT_QUERY_PARAM, tenant.as_str())])
            .query(params);

        let envelope: ListEnvelope<T> = self.send(request).await?;
        envelope.into_items().ok_or_else(|| {
            ClientError::InvalidResponse(format!(
                "list of '{}' has neither 'data' nor 'results'",
                resource
            ))
        })
    }

    /// `GET /{resource}/{id}`, `None` on 404
    pub async fn get<T: DeserializeOwned>(
        &self,
        tenant: &RealEstateId,
        resource: &str,
        id: &Uuid,
    ) -> Result<Option<T>, ClientError> {
        let request = self
            .client
            .get(self.url(resource, Some(id)))
            .headers(self.auth_header.clone())
            .query(&[(TENANT_QUERY_PARAM, tenant.as_str())]);

        match self.send::<MutateEnvelope<T>>(request).await {
            Ok(envelope) => envelope.into_result().map_err(ClientError::Rejected),
            Err(ClientError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// `POST /{resource}`
    pub async fn create<T, B>(
        &self,
        tenant: &RealEstateId,
        resource: &str,
        body: &B,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .client
            .post(self.url(resource, None))
            .headers(self.auth_header.clone())
            .query(&[(TENANT_QUERY_PARAM, tenant.as_str())])
            .json(body);

        self.mutate(request, resource).await
    }

    /// `PUT /{resource}/{id}`
    pub async fn update<T, B>(
        &self,
        tenant: &RealEstateId,
        resource: &str,
        id: &Uuid,
        body: &B,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .client
            .put(self.url(resource, Some(id)))
            .headers(self.auth_header.clone())
            .query(&[(TENANT_QUERY_PARAM, tenant.as_str())])
            .json(body);

        self.mutate(request, resource).await
    }

    /// `DELETE /{resource}/{id}`
    pub async fn delete(
        &self,
        tenant: &RealEstateId,
        resource: &str,
        id: &Uuid,
    ) -> Result<(), ClientError> {
        let request = self
            .client
            .delete(self.url(resource, Some(id)))
            .headers(self.auth_header.clone())
            .query(&[(TENANT_QUERY_PARAM, tenant.as_str())]);

        let envelope: MutateEnvelope<serde_json::Value> = self.send(request).await?;
        envelope.into_result().map_err(ClientError::Rejected)?;
        Ok(())
    }

    async fn mutate<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<T, ClientError> {
        let envelope: MutateEnvelope<T> = self.send(request).await?;
        envelope
            .into_result()
            .map_err(ClientError::Rejected)?
            .ok_or_else(|| {
                ClientError::InvalidResponse(format!("mutation of '{}' returned no data", resource))
            })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<MutateEnvelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn url(&self, resource: &str, id: Option<&Uuid>) -> String {
        match id {
            Some(id) => format!("{}/{}/{}", self.base_url, resource, id),
            None => format!("{}/{}", self.base_url, resource),
        }
    }
}

fn build_auth_headers(token: Option<&str>) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        let value = format!("Bearer {}", token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&value).map_err(|e| ClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = RestClient::with_base_url("http://localhost:8000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.url("properties", None),
            "http://localhost:8000/api/properties"
        );
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let err = build_auth_headers(Some("bad\ntoken")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_status_maps_to_http_request_error() {
        let err: RequestError = ClientError::Status {
            status: 404,
            message: "not found".into(),
        }
        .into();
        assert!(matches!(err, RequestError::Http { status: 404, .. }));

        let err: RequestError = ClientError::Rejected("duplicado".into()).into();
        assert!(matches!(err, RequestError::Api { ref message } if message == "duplicado"));
    }
}

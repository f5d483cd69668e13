//! Authenticated App Store Connect REST client
//!
//! Four verb wrappers over the API base URL. Every request carries the same
//! bearer token, built once when the client is created.

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::auth::AuthToken;
use crate::error::{ApiFailure, ConnectError, Result};
use crate::types::{Credentials, HttpHeader};

/// Default API root
pub const API_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";

/// App Store Connect API client
#[derive(Debug, Clone)]
pub struct ConnectClient {
    /// HTTP client
    http: Client,

    /// Base URL endpoints are joined onto
    base_url: String,

    /// Bearer token for every request
    token: AuthToken,
}

impl ConnectClient {
    /// Create a client, signing a fresh token from the private key file
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let token = AuthToken::generate(credentials)?;
        Ok(Self::with_token(token))
    }

    /// Create a client around an existing token
    pub fn with_token(token: AuthToken) -> Self {
        Self {
            http: Client::new(),
            base_url: API_BASE_URL.to_string(),
            token,
        }
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn send(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Result<Response> {
        let url = self.url(endpoint);
        debug!("API request: {} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header("Authorization", self.token.bearer())
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// Decode the body when the status is one of `accepted`, else capture it as a failure
    async fn expect<T: DeserializeOwned>(response: Response, accepted: &[StatusCode]) -> Result<T> {
        let status = response.status();

        if !accepted.contains(&status) {
            let message = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "API error body: {}", message);
            return Err(ConnectError::Api(ApiFailure {
                status: status.as_u16(),
                message,
            }));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// GET, success on 200
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.send(Method::GET, endpoint, None).await?;
        Self::expect(response, &[StatusCode::OK]).await
    }

    /// POST, success on 200 or 201
    pub async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: &Value) -> Result<T> {
        let response = self.send(Method::POST, endpoint, Some(body)).await?;
        Self::expect(response, &[StatusCode::OK, StatusCode::CREATED]).await
    }

    /// PATCH, success on 200
    pub async fn patch<T: DeserializeOwned>(&self, endpoint: &str, body: &Value) -> Result<T> {
        let response = self.send(Method::PATCH, endpoint, Some(body)).await?;
        Self::expect(response, &[StatusCode::OK]).await
    }

    /// DELETE, `true` only on 204
    pub async fn delete(&self, endpoint: &str) -> Result<bool> {
        let response = self.send(Method::DELETE, endpoint, None).await?;
        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            debug!(status = status.as_u16(), "DELETE {} not applied", endpoint);
        }
        Ok(status == StatusCode::NO_CONTENT)
    }

    /// Send one part of a reserved upload to its pre-signed URL.
    ///
    /// Goes to an absolute URL with only the headers the reservation listed;
    /// the bearer token is not sent.
    pub async fn upload_part(
        &self,
        url: &str,
        headers: &[HttpHeader],
        bytes: Vec<u8>,
    ) -> Result<StatusCode> {
        debug!("Upload part: PUT {} ({} bytes)", url, bytes.len());

        let mut request = self.http.put(url).body(bytes);
        for header in headers {
            request = request.header(header.name.as_str(), header.value.as_str());
        }

        let response = request.send().await?;
        Ok(response.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{DELETE, GET, PATCH, POST, PUT};
    use httpmock::MockServer;
    use serde_json::json;

    fn client(server: &MockServer) -> ConnectClient {
        ConnectClient::with_token(AuthToken::from_static("test-token"))
            .with_base_url(server.url("/v1"))
    }

    #[test]
    fn test_url_joining() {
        let client = ConnectClient::with_token(AuthToken::from_static("t"))
            .with_base_url("https://example.com/v1/");
        assert_eq!(client.url("apps"), "https://example.com/v1/apps");
        assert_eq!(client.url("/apps"), "https://example.com/v1/apps");
    }

    #[tokio::test]
    async fn test_get_sends_auth_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/apps")
                    .header("Authorization", "Bearer test-token")
                    .header("Content-Type", "application/json");
                then.status(200).json_body(json!({"data": [{"id": "app-1"}]}));
            })
            .await;

        let value: Value = client(&server).get("apps").await.unwrap();
        assert_eq!(value["data"][0]["id"], "app-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_failure_becomes_envelope() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/apps");
                then.status(401).body("NOT_AUTHORIZED");
            })
            .await;

        let err = client(&server).get::<Value>("apps").await.unwrap_err();
        match err {
            ConnectError::Api(failure) => {
                assert_eq!(failure.status, 401);
                assert_eq!(failure.message, "NOT_AUTHORIZED");
            }
            other => panic!("expected API failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_accepts_created() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/bundleIds")
                    .json_body(json!({"data": {"type": "bundleIds"}}));
                then.status(201).json_body(json!({"data": {"id": "b-1"}}));
            })
            .await;

        let value: Value = client(&server)
            .post("bundleIds", &json!({"data": {"type": "bundleIds"}}))
            .await
            .unwrap();
        assert_eq!(value["data"]["id"], "b-1");
    }

    #[tokio::test]
    async fn test_patch_rejects_created() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PATCH).path("/v1/appScreenshots/s-1");
                then.status(201).json_body(json!({"data": {"id": "s-1"}}));
            })
            .await;

        let result = client(&server)
            .patch::<Value>("appScreenshots/s-1", &json!({}))
            .await;
        assert!(matches!(result, Err(ConnectError::Api(ref f)) if f.status == 201));
    }

    #[tokio::test]
    async fn test_delete_only_succeeds_on_no_content() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/v1/appScreenshots/gone");
                then.status(204);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/v1/appScreenshots/kept");
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = client(&server);
        assert!(client.delete("appScreenshots/gone").await.unwrap());
        assert!(!client.delete("appScreenshots/kept").await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_part_uses_listed_headers_only() {
        let server = MockServer::start_async().await;
        let authorized = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/upload/part")
                    .header_exists("Authorization");
                then.status(401);
            })
            .await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/upload/part")
                    .header("Content-Type", "image/png")
                    .body("abc");
                then.status(200);
            })
            .await;

        let headers = vec![HttpHeader {
            name: "Content-Type".to_string(),
            value: "image/png".to_string(),
        }];
        let status = client(&server)
            .upload_part(&server.url("/upload/part"), &headers, b"abc".to_vec())
            .await
            .unwrap();

        assert_eq!(status, StatusCode::OK);
        authorized.assert_hits_async(0).await;
        mock.assert_async().await;
    }
}

// Copyright (C) 2025 Tidelab Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP session shared by all resource clients.
//!
//! Binds a [`reqwest::Client`] to the platform's `{domain}/api/v1/` base,
//! applies the credential and common headers to every request, and routes
//! every response through the error interceptor so callers only ever see a
//! decoded value or a typed [`Error`](crate::Error).

use std::fmt;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::ClientConfig;
use crate::error::{Error, Result};

/// Oldest server release whose API this SDK surface targets.
const MIN_SERVER_VERSION: &str = "3.6.0";

const MIN_SERVER_VERSION_HEADER: HeaderName = HeaderName::from_static("min-server-version");
const AGENT_ID_HEADER: HeaderName = HeaderName::from_static("agent-id");

/// One configured connection to the platform.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub(crate) struct HttpSession {
    http: reqwest::Client,
    base_url: String,
    token: String,
    retries: u32,
}

impl HttpSession {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            MIN_SERVER_VERSION_HEADER,
            HeaderValue::from_static(MIN_SERVER_VERSION),
        );
        if let Some(agent_id) = &config.agent_id {
            let value = HeaderValue::from_str(agent_id)
                .map_err(|err| Error::InvalidArgument(format!("invalid agent id: {err}")))?;
            headers.insert(AGENT_ID_HEADER, value);
        }

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: format!("{}/api/v1", config.domain.trim_end_matches('/')),
            token: config.token.clone(),
            retries: config.retries,
        })
    }

    /// Full URL for a path relative to the API base.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .basic_auth(&self.token, Some(""))
    }

    /// Send with transport-level retries. Only connection and timeout
    /// failures are retried; HTTP error statuses never are.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        for attempt in 1..=self.retries {
            let Some(retryable) = request.try_clone() else {
                break;
            };
            match retryable.send().await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_connect() || err.is_timeout() => {
                    debug!(attempt, error = %err, "transport failure, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(request.send().await?)
    }

    /// Send and intercept: a non-2xx status aborts the call with a typed
    /// error carrying whatever diagnostic payload the body held.
    async fn checked(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = self.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::from_response(status, &body))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.checked(self.request(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn get_json_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path).query(query);
        let response = self.checked(request).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        let response = self.checked(request).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_empty<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path).json(body);
        self.checked(request).await?;
        Ok(())
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path).json(body);
        let response = self.checked(request).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn patch_empty_query<Q>(&self, path: &str, query: &Q) -> Result<()>
    where
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::PATCH, path).query(query);
        self.checked(request).await?;
        Ok(())
    }

    pub(crate) async fn delete_empty(&self, path: &str) -> Result<()> {
        self.checked(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    pub(crate) async fn delete_empty_json<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::DELETE, path).json(body);
        self.checked(request).await?;
        Ok(())
    }
}

impl fmt::Debug for HttpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSession")
            .field("base_url", &self.base_url)
            .field("retries", &self.retries)
            .finish_non_exhaustive()
    }
}

// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::*;
use crate::{Credential, CredentialSource};
use async_trait::async_trait;
use awscurl_core::time::parse_rfc3339;
use awscurl_core::{Context, Error, ErrorKind, ProvideCredential, Result};
use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{Method, StatusCode};
use log::debug;
use serde::Deserialize;
use std::time::Duration;

/// ImdsCredentialProvider loads the instance role credential from EC2 IMDSv2.
///
/// Three requests are made, each bounded by the configured timeout:
///
/// 1. `PUT /latest/api/token` for a session token
/// 2. `GET /latest/meta-data/iam/security-credentials/` for the role name
/// 3. `GET /latest/meta-data/iam/security-credentials/<role>` for the credential
///
/// An unreachable or silent endpoint means "not on EC2" and yields `None`. Once
/// the service answers, anything unexpected is an error.
#[derive(Debug, Clone)]
pub struct ImdsCredentialProvider {
    endpoint: String,
    timeout: Duration,
}

impl Default for ImdsCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ImdsCredentialProvider {
    /// Create a new `ImdsCredentialProvider` instance.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_IMDS_ENDPOINT.to_string(),
            timeout: DEFAULT_IMDS_TIMEOUT,
        }
    }

    /// Set the endpoint for the metadata service.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the timeout for each metadata request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one request to the metadata service.
    ///
    /// Returns `Ok(None)` when the service can't be reached in time.
    async fn send(
        &self,
        ctx: &Context,
        operation: &str,
        req: http::Request<Bytes>,
    ) -> Result<Option<String>> {
        let resp = match tokio::time::timeout(self.timeout, ctx.http_send_as_string(req)).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(err)) if err.kind() == ErrorKind::Transport => {
                debug!("instance metadata service unreachable during {operation}: {err}");
                return Ok(None);
            }
            Ok(Err(err)) => return Err(err),
            Err(_) => {
                debug!(
                    "instance metadata service timed out after {:?} during {operation}",
                    self.timeout
                );
                return Ok(None);
            }
        };

        if resp.status() != StatusCode::OK {
            return Err(Error::credentials_unavailable(format!(
                "instance metadata service returned unexpected status {}",
                resp.status()
            ))
            .with_context(format!("operation: {operation}"))
            .with_context(format!("endpoint: {}", self.endpoint)));
        }

        Ok(Some(resp.into_body()))
    }

    fn build_request(&self, method: Method, path: &str, token: Option<&str>) -> Result<http::Request<Bytes>> {
        let url = format!("{}{path}", self.endpoint);
        let mut req = http::Request::builder().method(method).uri(&url);
        req = match token {
            Some(token) => req.header(X_AWS_EC2_METADATA_TOKEN, token),
            None => req
                .header(CONTENT_LENGTH, "0")
                .header(X_AWS_EC2_METADATA_TOKEN_TTL_SECONDS, IMDS_TOKEN_TTL_SECONDS),
        };

        req.body(Bytes::new()).map_err(|e| {
            Error::config_invalid("failed to build instance metadata request")
                .with_context(format!("url: {url}"))
                .with_source(e)
        })
    }
}

#[async_trait]
impl ProvideCredential for ImdsCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let req = self.build_request(Method::PUT, "/latest/api/token", None)?;
        let Some(token) = self.send(ctx, "fetch_token", req).await? else {
            return Ok(None);
        };

        // List all credentials that node has.
        let req = self.build_request(
            Method::GET,
            "/latest/meta-data/iam/security-credentials/",
            Some(&token),
        )?;
        let Some(roles) = self.send(ctx, "list_roles", req).await? else {
            return Ok(None);
        };
        let Some(role) = roles.lines().map(str::trim).find(|v| !v.is_empty()) else {
            return Err(
                Error::credentials_unavailable("no IAM role attached to EC2 instance")
                    .with_context("hint: attach an IAM role to your EC2 instance"),
            );
        };

        // Get the credentials via role_name.
        let req = self.build_request(
            Method::GET,
            &format!("/latest/meta-data/iam/security-credentials/{role}"),
            Some(&token),
        )?;
        let Some(content) = self.send(ctx, "fetch_credentials", req).await? else {
            return Ok(None);
        };

        let resp: Ec2MetadataIamSecurityCredentials =
            serde_json::from_str(&content).map_err(|e| {
                Error::credentials_unavailable("failed to parse instance metadata credential")
                    .with_context(format!("role: {role}"))
                    .with_source(e)
            })?;
        if resp.code != "Success" {
            return Err(Error::credentials_unavailable(format!(
                "instance metadata service returned error: [{}] {}",
                resp.code, resp.message
            ))
            .with_context(format!("role: {role}")));
        }

        let expires_in = if resp.expiration.is_empty() {
            None
        } else {
            Some(parse_rfc3339(&resp.expiration)?)
        };
        debug!("loaded instance role credential for role {role}");

        Ok(Some(Credential {
            access_key_id: resp.access_key_id,
            secret_access_key: resp.secret_access_key,
            session_token: Some(resp.token).filter(|v| !v.is_empty()),
            expires_in,
            source: CredentialSource::InstanceRole,
        }))
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct Ec2MetadataIamSecurityCredentials {
    access_key_id: String,
    secret_access_key: String,
    token: String,
    expiration: String,

    code: String,
    message: String,
}

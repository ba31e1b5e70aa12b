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

//! Reqwest-based HTTP client implementation for awscurl.
//!
//! `ReqwestHttpSend` implements the `HttpSend` trait from `awscurl_core`. It is
//! used for credential resolution traffic such as the instance metadata
//! service, not for the signed request itself.
//!
//! ## Example
//!
//! ```no_run
//! use awscurl_core::Context;
//! use awscurl_http_send_reqwest::ReqwestHttpSend;
//! use reqwest::Client;
//!
//! // Metadata endpoints are link-local and must never go through a proxy.
//! let client = Client::builder().no_proxy().build().unwrap();
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! ```

use async_trait::async_trait;
use awscurl_core::{Error, HttpSend, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Request};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        debug!("sending {} {}", req.method(), req.uri());

        let req = Request::try_from(req)
            .map_err(|e| Error::config_invalid("failed to convert http request").with_source(e))?;
        let url = req.url().to_string();
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| {
                Error::transport("failed to send http request")
                    .with_context(format!("url: {url}"))
                    .with_source(e)
            })?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| {
                Error::transport("failed to read http response body")
                    .with_context(format!("url: {url}"))
                    .with_source(e)
            })?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

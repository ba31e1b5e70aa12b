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

use awscurl_core::{Error, Result};
use bytes::Bytes;
use http::StatusCode;
use log::{debug, info};
use reqwest::{Client, Proxy};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::config::TransportConfig;

/// Dispatcher sends the signed request and streams the response body out.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
}

impl Dispatcher {
    /// Build the HTTP client from transport settings.
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.max_time)
            .danger_accept_invalid_certs(config.insecure);

        if config.no_proxy {
            builder = builder.no_proxy();
        }
        if let Some(proxy) = &config.proxy {
            let proxy = Proxy::all(proxy.as_str()).map_err(|e| {
                Error::config_invalid(format!("invalid proxy {proxy:?}")).with_source(e)
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            Error::transport("failed to build http client").with_source(e)
        })?;
        Ok(Self { client })
    }

    /// Send `req` and write the response body to `out` chunk by chunk.
    ///
    /// Returns the response status. Any status is a success here; deciding
    /// what to do with 4xx and 5xx is up to the caller.
    pub async fn send<W>(&self, req: http::Request<Bytes>, out: &mut W) -> Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let req = reqwest::Request::try_from(req)
            .map_err(|e| Error::config_invalid("failed to convert http request").with_source(e))?;
        let url = req.url().to_string();
        info!("sending {} {url}", req.method());

        let mut resp = self.client.execute(req).await.map_err(|e| {
            Error::transport("failed to send http request")
                .with_context(format!("url: {url}"))
                .with_source(e)
        })?;

        let status = resp.status();
        info!("received {status} from {url}");
        debug!("response headers: {:?}", resp.headers());

        let mut written = 0;
        while let Some(chunk) = resp.chunk().await.map_err(|e| {
            Error::transport("failed to read http response body")
                .with_context(format!("url: {url}"))
                .with_source(e)
        })? {
            out.write_all(&chunk)
                .await
                .map_err(|e| Error::io("failed to write response body").with_source(e))?;
            written += chunk.len();
        }
        out.flush()
            .await
            .map_err(|e| Error::io("failed to flush response body").with_source(e))?;
        debug!("wrote {written} bytes of response body");

        Ok(status)
    }
}

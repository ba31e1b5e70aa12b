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

//! cURL with AWS Signature Version 4 request signing.
//!
//! One invocation runs one pipeline: resolve region and credentials, sign the
//! request, send it and stream the response body out.
//!
//! ## Example
//!
//! ```no_run
//! use awscurl::{default_context, run, Args, Config};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> awscurl_core::Result<()> {
//!     let args = Args::parse_from(["awscurl", "--region", "us-east-1", "https://example.com/"]);
//!     let ctx = default_context()?;
//!     let config = Config::from_args(args, &ctx)?;
//!
//!     let status = run(&config, &ctx, &mut tokio::io::stdout()).await?;
//!     println!("{status}");
//!     Ok(())
//! }
//! ```

mod args;
pub use args::Args;

mod config;
pub use config::{parse_method, parse_url, Config, TransportConfig};

mod dispatch;
pub use dispatch::Dispatcher;

mod header;
pub use header::{parse_header, parse_headers};

mod payload;
pub use payload::Payload;

use awscurl_aws_v4::{DefaultCredentialProvider, RegionResolver, RequestSigner};
use awscurl_core::time::now;
use awscurl_core::{Context, Error, OsEnv, Result, Signer};
use awscurl_file_read_tokio::TokioFileRead;
use awscurl_http_send_reqwest::ReqwestHttpSend;
use http::StatusCode;
use log::debug;
use tokio::io::AsyncWrite;

/// The context the binary runs with: local files, the process environment and
/// a direct HTTP client for the instance metadata service.
pub fn default_context() -> Result<Context> {
    // Metadata endpoints are link-local and must never go through a proxy.
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .map_err(|e| Error::transport("failed to build http client").with_source(e))?;

    Ok(Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::new(client))
        .with_env(OsEnv))
}

/// Sign and send the request described by `config`, writing the response
/// body to `out`.
///
/// Returns the response status. With `fail_on_http_error` set, a status of
/// 400 or above is returned as an error after the body has been written.
pub async fn run<W>(config: &Config, ctx: &Context, out: &mut W) -> Result<StatusCode>
where
    W: AsyncWrite + Unpin,
{
    let dispatcher = Dispatcher::new(&config.transport)?;
    let body = config.payload.load(ctx).await?;

    let region = RegionResolver::new(config.credential.clone())
        .resolve(ctx)
        .await?;
    let provider = DefaultCredentialProvider::new(&config.credential)?;
    let signer = Signer::new(
        ctx.clone(),
        provider,
        RequestSigner::new(&config.service, &region).with_time(now()),
    );

    let mut req = http::Request::builder()
        .method(config.method.clone())
        .uri(config.url.clone())
        .body(())?;
    *req.headers_mut() = config.headers.clone();
    let (mut parts, ()) = req.into_parts();

    signer.sign(&mut parts, &body).await?;
    debug!("signed request: {parts:?}");

    let status = dispatcher
        .send(http::Request::from_parts(parts, body), out)
        .await?;

    if config.fail_on_http_error && (status.is_client_error() || status.is_server_error()) {
        return Err(Error::transport(format!(
            "server returned HTTP status {status}"
        )));
    }
    Ok(status)
}

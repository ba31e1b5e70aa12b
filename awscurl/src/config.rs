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

use std::time::Duration;

use awscurl_core::{Context, Error, Result};
use http::{HeaderMap, Method, Uri};
use reqwest::Url;

use crate::args::Args;
use crate::header::parse_headers;
use crate::payload::Payload;

/// Everything one invocation needs, built once from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// The target URL.
    pub url: Uri,
    /// The request method.
    pub method: Method,
    /// Headers from `-H`, in the order given.
    pub headers: HeaderMap,
    /// The request body.
    pub payload: Payload,
    /// The service name used in the signing scope.
    pub service: String,
    /// Credential and region settings.
    pub credential: awscurl_aws_v4::Config,
    /// How the signed request is sent.
    pub transport: TransportConfig,
    /// Treat an HTTP status of 400 and above as a failure.
    pub fail_on_http_error: bool,
}

/// Settings for the HTTP client that sends the signed request.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Proxy for all schemes.
    pub proxy: Option<String>,
    /// Ignore proxies from the environment.
    pub no_proxy: bool,
    /// Limit for establishing the connection.
    pub connect_timeout: Duration,
    /// Limit for the whole request, body included.
    pub max_time: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            insecure: false,
            proxy: None,
            no_proxy: false,
            connect_timeout: Duration::from_secs(10),
            max_time: Duration::from_secs(300),
        }
    }
}

impl Config {
    /// Build the run configuration from parsed arguments.
    ///
    /// Every user input is validated here, before any network activity.
    /// Credential settings not given on the command line are completed from
    /// the environment of `ctx`.
    pub fn from_args(args: Args, ctx: &Context) -> Result<Self> {
        let url = parse_url(&args.url)?;
        let method = parse_method(&args.method)?;
        let headers = parse_headers(&args.headers)?;

        // An empty flag counts as not given, like an empty env value.
        let non_empty = |v: Option<String>| v.filter(|v| !v.is_empty());
        let credential = awscurl_aws_v4::Config {
            profile: non_empty(args.profile),
            access_key_id: non_empty(args.access_key),
            secret_access_key: non_empty(args.secret_key),
            session_token: non_empty(args.session_token),
            region: non_empty(args.region),
            ..Default::default()
        }
        .from_env(ctx);

        Ok(Self {
            url,
            method,
            headers,
            payload: Payload::parse(args.data.as_deref()),
            service: args.service,
            credential,
            transport: TransportConfig {
                insecure: args.insecure,
                proxy: args.proxy,
                no_proxy: args.no_proxy,
                connect_timeout: Duration::from_secs(args.connect_timeout),
                max_time: Duration::from_secs(args.max_time),
            },
            fail_on_http_error: args.fail,
        })
    }
}

/// Parse and normalize the target URL.
///
/// Goes through the WHATWG parser first so inputs like unescaped spaces end
/// up in the same form the transport will send.
pub fn parse_url(input: &str) -> Result<Uri> {
    let url = Url::parse(input).map_err(|e| {
        Error::config_invalid(format!("invalid url {input:?}")).with_source(e)
    })?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(Error::config_invalid(format!(
                "unsupported url scheme {scheme:?}, expected http or https"
            )))
        }
    }

    url.as_str().parse::<Uri>().map_err(|e| {
        Error::config_invalid(format!("invalid url {input:?}")).with_source(e)
    })
}

/// Parse the `-X` method. Lower-case input is accepted and upper-cased.
pub fn parse_method(input: &str) -> Result<Method> {
    Method::from_bytes(input.to_ascii_uppercase().as_bytes()).map_err(|e| {
        Error::config_invalid(format!("invalid request method {input:?}")).with_source(e)
    })
}

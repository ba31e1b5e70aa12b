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

use std::mem;

use crate::{Error, Result};
use http::uri::Authority;
use http::uri::Scheme;
use http::HeaderMap;
use http::Method;

/// Signing view of a request.
///
/// Built from `http::request::Parts` by borrowing its headers; the URI is read
/// but never rewritten, so the bytes that were signed are the bytes that go on
/// the wire.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path as it appears in the request URI (still percent-encoded).
    pub path: String,
    /// HTTP query parameters, decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing request from http::request::Parts.
    ///
    /// Headers are moved out of `parts` and must be returned with [`SigningRequest::apply`].
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = &parts.uri;
        let authority = uri.authority().cloned().ok_or_else(|| {
            Error::config_invalid("request without authority is invalid for signing")
                .with_context(format!("uri: {uri}"))
        })?;

        let path = match uri.path() {
            "" => "/".to_string(),
            v => v.to_string(),
        };
        let query = uri
            .query()
            .map(|v| {
                form_urlencoded::parse(v.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme().cloned().unwrap_or(Scheme::HTTPS),
            authority,
            path,
            query,

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Return the (possibly extended) headers to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) {
        mem::swap(&mut parts.headers, &mut self.headers);
    }

    /// Host value used for signing: the authority without default ports.
    pub fn host(&self) -> String {
        let host = self.authority.host();
        match self.authority.port_u16() {
            None => host.to_string(),
            Some(443) if self.scheme == Scheme::HTTPS => host.to_string(),
            Some(80) if self.scheme == Scheme::HTTP => host.to_string(),
            Some(port) => format!("{host}:{port}"),
        }
    }
}

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

//! AWS SigV4 signing for awscurl.
//!
//! This crate resolves credentials and region, builds the canonical request
//! and signs [`http::request::Parts`] in place.
//!
//! ## Example
//!
//! ```no_run
//! use awscurl_aws_v4::{Config, DefaultCredentialProvider, RequestSigner};
//! use awscurl_core::{Context, OsEnv, Result, Signer};
//! use awscurl_file_read_tokio::TokioFileRead;
//! use awscurl_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!     let config = Config::default().from_env(&ctx);
//!
//!     let provider = DefaultCredentialProvider::new(&config)?;
//!     let signer = RequestSigner::new("execute-api", "us-east-1");
//!     let signer = Signer::new(ctx, provider, signer);
//!
//!     let req = http::Request::get("https://example.execute-api.us-east-1.amazonaws.com/resource")
//!         .body(())?;
//!     let (mut parts, _) = req.into_parts();
//!     signer.sign(&mut parts, b"").await?;
//!     Ok(())
//! }
//! ```

pub mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::{Credential, CredentialSource};

mod region;
pub use region::RegionResolver;

mod canonical_request;
pub use canonical_request::{
    canonicalize_headers, canonicalize_query, canonicalize_uri, normalize_header_value,
    CanonicalRequest, UriEncoding,
};

mod sign_request;
pub use sign_request::{generate_signing_key, scope, string_to_sign, RequestSigner};

mod provide_credential;
pub use provide_credential::*;

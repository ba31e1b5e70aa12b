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

mod suite;

use anyhow::Result;
use awscurl_aws_v4::{Credential, CredentialSource, RequestSigner};
use awscurl_core::time::DateTime;
use awscurl_core::{Context, SignRequest};
use chrono::{TimeZone, Utc};
use http::request::Parts;
use http::Request;
use log::debug;

/// The example secret used throughout the public SigV4 test suite.
pub const SUITE_SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

/// `20150830T123600Z`, the signing time of the public SigV4 test suite.
pub fn suite_time() -> DateTime {
    Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0)
        .single()
        .expect("valid fixed time")
}

pub fn static_credential(secret: &str) -> Credential {
    Credential {
        access_key_id: "AKIDEXAMPLE".to_string(),
        secret_access_key: secret.to_string(),
        session_token: None,
        expires_in: None,
        source: CredentialSource::Explicit,
    }
}

/// Sign `req` at the suite time and return the signed parts.
pub async fn sign(
    signer: RequestSigner,
    req: Request<&'static [u8]>,
    cred: &Credential,
) -> Result<Parts> {
    let _ = env_logger::builder().is_test(true).try_init();

    let (mut parts, body) = req.into_parts();
    signer
        .with_time(suite_time())
        .sign_request(&Context::new(), &mut parts, body, Some(cred))
        .await?;
    debug!("signed request: {parts:?}");

    Ok(parts)
}

/// Extract the signature from the authorization header.
pub fn signature(parts: &Parts) -> Result<String> {
    let auth = parts.headers[http::header::AUTHORIZATION].to_str()?;
    let (_, sig) = auth
        .rsplit_once("Signature=")
        .ok_or_else(|| anyhow::anyhow!("authorization without signature: {auth}"))?;
    Ok(sig.to_string())
}

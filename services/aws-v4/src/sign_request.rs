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

use crate::canonical_request::{CanonicalRequest, UriEncoding};
use crate::constants::{
    SIGNING_ALGORITHM, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::Credential;
use async_trait::async_trait;
use awscurl_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use awscurl_core::time::{format_date, format_iso8601, now, DateTime};
use awscurl_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
    uri_encoding: UriEncoding,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new builder for AWS V4 signer.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            uri_encoding: UriEncoding::for_service(service),

            time: None,
        }
    }

    /// Specify the signing time.
    ///
    /// Without it the signer reads the clock once per request.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Override the path encoding picked from the service name.
    pub fn with_uri_encoding(mut self, encoding: UriEncoding) -> Self {
        self.uri_encoding = encoding;
        self
    }

    /// Services that require the payload hash as a header.
    fn sends_content_sha256(&self) -> bool {
        matches!(self.service.as_str(), "s3" | "glacier")
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let now = self.time.unwrap_or_else(now);

        let Some(cred) = credential else {
            return Err(Error::signing_failed("no credential to sign with"));
        };
        if cred.access_key_id.is_empty() || cred.secret_access_key.is_empty() {
            return Err(Error::signing_failed("credential has an empty access key or secret")
                .with_context(format!("source: {}", cred.source)));
        }
        if !cred.is_valid_at(now) {
            return Err(Error::signing_failed("credential is expired")
                .with_context(format!("source: {}", cred.source))
                .with_context(format!("expires_in: {:?}", cred.expires_in)));
        }

        let mut signed_req = SigningRequest::build(req)?;
        let original = signed_req.headers.clone();

        match self.sign_headers(&mut signed_req, body, cred, now) {
            Ok(()) => {
                signed_req.apply(req);
                Ok(())
            }
            Err(err) => {
                // Leave the request as it was given.
                req.headers = original;
                Err(err)
            }
        }
    }
}

impl RequestSigner {
    /// Insert the signing headers and the authorization into `signed_req`.
    fn sign_headers(
        &self,
        signed_req: &mut SigningRequest,
        body: &[u8],
        cred: &Credential,
        now: DateTime,
    ) -> Result<()> {
        // Insert HOST header if not present.
        if signed_req.headers.get(header::HOST).is_none() {
            let host = HeaderValue::from_str(&signed_req.host())?;
            signed_req.headers.insert(header::HOST, host);
        }

        signed_req
            .headers
            .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);

        // Insert X_AMZ_SECURITY_TOKEN header if security token exists.
        if let Some(token) = &cred.session_token {
            let mut value = HeaderValue::from_str(token)?;
            // Keep the token out of debug output.
            value.set_sensitive(true);

            signed_req.headers.insert(X_AMZ_SECURITY_TOKEN, value);
        }

        let payload_hash = match signed_req.headers.get(X_AMZ_CONTENT_SHA_256) {
            Some(v) => v.to_str()?.to_string(),
            None => hex_sha256(body),
        };
        if self.sends_content_sha256() && signed_req.headers.get(X_AMZ_CONTENT_SHA_256).is_none()
        {
            signed_req
                .headers
                .insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(&payload_hash)?);
        }

        let creq = CanonicalRequest::build(&signed_req, &payload_hash, self.uri_encoding)?;
        debug!("calculated canonical request: {creq}");

        let scope = scope(now, &self.region, &self.service);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(now, &scope, &creq);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "{SIGNING_ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
            cred.access_key_id,
            scope,
            creq.signed_headers(),
            signature
        ))?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        Ok(())
    }
}

/// Scope: "20220313/<region>/<service>/aws4_request"
pub fn scope(time: DateTime, region: &str, service: &str) -> String {
    format!("{}/{region}/{service}/aws4_request", format_date(time))
}

/// StringToSign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(time: DateTime, scope: &str, creq: &CanonicalRequest) -> String {
    format!(
        "{SIGNING_ALGORITHM}\n{}\n{scope}\n{}",
        format_iso8601(time),
        hex_sha256(creq.to_string().as_bytes())
    )
}

/// Derive the signing key for one day, region and service.
pub fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}

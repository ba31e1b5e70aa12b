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

//! Canonical request construction for SigV4.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use std::fmt::{self, Display, Formatter};

use awscurl_core::{Error, Result, SigningRequest};
use http::header::{AUTHORIZATION, EXPECT, USER_AGENT};
use http::HeaderMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode};

use crate::constants::{AWS_URI_ENCODE_SET, X_AMZN_TRACE_ID};

/// How the request path is encoded in the canonical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriEncoding {
    /// Percent-decode each segment, then encode it once. Used by `s3`.
    Single,
    /// Encode the path as sent, so existing escapes are encoded again.
    Double,
}

impl UriEncoding {
    /// The encoding a service expects.
    pub fn for_service(service: &str) -> Self {
        match service {
            "s3" => UriEncoding::Single,
            _ => UriEncoding::Double,
        }
    }
}

/// CanonicalRequest is the normalized form of a request that gets hashed.
///
/// It's a pure function of the request, the payload hash and the encoding
/// mode; rendering it with `Display` yields the exact string to hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    uri: String,
    query: String,
    headers: Vec<(String, String)>,
    signed_headers: String,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical request.
    ///
    /// Every header still on `req` is signed except the ones proxies and
    /// clients are known to rewrite.
    pub fn build(req: &SigningRequest, payload_hash: &str, encoding: UriEncoding) -> Result<Self> {
        let headers = canonicalize_headers(&req.headers)?;
        let signed_headers = headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        Ok(CanonicalRequest {
            method: req.method.as_str().to_string(),
            uri: canonicalize_uri(&req.path, encoding),
            query: canonicalize_query(&req.query),
            headers,
            signed_headers,
            payload_hash: payload_hash.to_string(),
        })
    }

    /// Sorted header names joined by `;`.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}:{value}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}

/// Encode the path one segment at a time.
///
/// Dot segments are kept as is and an empty path becomes `/`.
pub fn canonicalize_uri(path: &str, encoding: UriEncoding) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    path.split('/')
        .map(|segment| match encoding {
            UriEncoding::Double => utf8_percent_encode(segment, &AWS_URI_ENCODE_SET).to_string(),
            UriEncoding::Single => {
                let decoded = percent_decode_str(segment).decode_utf8_lossy();
                utf8_percent_encode(&decoded, &AWS_URI_ENCODE_SET).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Encode decoded query pairs and sort them by encoded key, then value.
pub fn canonicalize_query(query: &[(String, String)]) -> String {
    let mut pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_URI_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_URI_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Lower-cased, sorted `(name, value)` pairs of every signed header.
///
/// Values of a repeated header are joined with `,` in insertion order.
pub fn canonicalize_headers(headers: &HeaderMap) -> Result<Vec<(String, String)>> {
    let mut canonical = Vec::with_capacity(headers.keys_len());

    for name in headers.keys() {
        if is_unsigned_header(name.as_str()) {
            continue;
        }

        let mut values = Vec::new();
        for value in headers.get_all(name) {
            let value = std::str::from_utf8(value.as_bytes()).map_err(|e| {
                Error::invalid_header("header value is not valid UTF-8")
                    .with_context(format!("header: {name}"))
                    .with_source(e)
            })?;
            values.push(normalize_header_value(value));
        }

        // HeaderName is always lower-cased already.
        canonical.push((name.as_str().to_string(), values.join(",")));
    }

    canonical.sort();
    Ok(canonical)
}

/// Trim the value and collapse inner whitespace runs to a single space.
pub fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_unsigned_header(name: &str) -> bool {
    name == AUTHORIZATION.as_str()
        || name == USER_AGENT.as_str()
        || name == EXPECT.as_str()
        || name == X_AMZN_TRACE_ID
}

#[cfg(test)]
mod tests {
    use super::*;
    use awscurl_core::hash::EMPTY_STRING_SHA256;
    use awscurl_core::ErrorKind;
    use http::HeaderValue;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn signing_request(uri: &str, headers: &[(&str, &str)]) -> SigningRequest {
        let mut builder = http::Request::get(uri);
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        let (mut parts, _) = builder.body(()).expect("request must be valid").into_parts();
        SigningRequest::build(&mut parts).expect("must build")
    }

    #[test_case("", UriEncoding::Double, "/"; "empty path")]
    #[test_case("/", UriEncoding::Double, "/"; "root")]
    #[test_case("/resource", UriEncoding::Double, "/resource"; "plain")]
    #[test_case("/a%20b/c", UriEncoding::Double, "/a%2520b/c"; "double encodes escapes")]
    #[test_case("/a%20b/c", UriEncoding::Single, "/a%20b/c"; "single keeps escapes")]
    #[test_case("/a%2Fb", UriEncoding::Single, "/a%2Fb"; "single keeps encoded slash")]
    #[test_case("/./foo/../bar", UriEncoding::Double, "/./foo/../bar"; "dot segments pass through")]
    #[test_case("/foo//bar", UriEncoding::Double, "/foo//bar"; "empty segment")]
    #[test_case("/a:b@c", UriEncoding::Single, "/a%3Ab%40c"; "reserved characters")]
    #[test_case("/ü", UriEncoding::Single, "/%C3%BC"; "non ascii")]
    fn test_canonicalize_uri(path: &str, encoding: UriEncoding, expected: &str) {
        assert_eq!(canonicalize_uri(path, encoding), expected);
    }

    #[test]
    fn test_query_order_is_total() {
        let a = signing_request("https://example.com/?b=2&a=1", &[]);
        let b = signing_request("https://example.com/?a=1&b=2", &[]);

        assert_eq!(canonicalize_query(&a.query), "a=1&b=2");
        assert_eq!(canonicalize_query(&a.query), canonicalize_query(&b.query));
    }

    #[test]
    fn test_query_encoding() {
        let req = signing_request(
            "https://example.com/?Param2=value2&Param1=value1&empty&q=a+b&tilde=~&slash=a%2Fb&q=a",
            &[],
        );

        assert_eq!(
            canonicalize_query(&req.query),
            "Param1=value1&Param2=value2&empty=&q=a&q=a%20b&slash=a%2Fb&tilde=~"
        );
    }

    #[test]
    fn test_canonicalize_headers() -> anyhow::Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("example.com"));
        headers.append("x-multi", HeaderValue::from_static("  first  value "));
        headers.append("x-multi", HeaderValue::from_static("second"));
        headers.insert("x-empty", HeaderValue::from_static(""));
        headers.insert("user-agent", HeaderValue::from_static("awscurl/0.1.0"));
        headers.insert("authorization", HeaderValue::from_static("old"));
        headers.insert("expect", HeaderValue::from_static("100-continue"));
        headers.insert("x-amzn-trace-id", HeaderValue::from_static("Root=1-abc"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let canonical = canonicalize_headers(&headers)?;
        assert_eq!(
            canonical,
            vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("host".to_string(), "example.com".to_string()),
                ("x-empty".to_string(), "".to_string()),
                ("x-multi".to_string(), "first value,second".to_string()),
            ]
        );

        // Canonical output fed back in is unchanged.
        let mut again = HeaderMap::new();
        for (k, v) in &canonical {
            again.insert(
                http::HeaderName::from_bytes(k.as_bytes())?,
                HeaderValue::from_str(v)?,
            );
        }
        assert_eq!(canonicalize_headers(&again)?, canonical);
        Ok(())
    }

    #[test]
    fn test_canonicalize_headers_utf8_value() -> anyhow::Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert("x-name", HeaderValue::from_str("  café  au lait ")?);

        assert_eq!(
            canonicalize_headers(&headers)?,
            vec![("x-name".to_string(), "café au lait".to_string())]
        );
        Ok(())
    }

    #[test]
    fn test_canonicalize_headers_rejects_non_utf8() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-binary",
            HeaderValue::from_bytes(b"caf\xe9").expect("obs-text is allowed"),
        );

        let err = canonicalize_headers(&headers).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::InvalidHeader);
    }

    #[test]
    fn test_build_is_pure() -> anyhow::Result<()> {
        let req = signing_request(
            "https://example.com/prod/items?b=2&a=1",
            &[("host", "example.com"), ("x-amz-date", "20150830T123600Z")],
        );

        let a = CanonicalRequest::build(&req, EMPTY_STRING_SHA256, UriEncoding::Double)?;
        let b = CanonicalRequest::build(&req, EMPTY_STRING_SHA256, UriEncoding::Double)?;
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.signed_headers(), "host;x-amz-date");
        assert_eq!(
            a.to_string(),
            "GET\n\
             /prod/items\n\
             a=1&b=2\n\
             host:example.com\n\
             x-amz-date:20150830T123600Z\n\
             \n\
             host;x-amz-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        Ok(())
    }

    #[test]
    fn test_uri_encoding_for_service() {
        assert_eq!(UriEncoding::for_service("s3"), UriEncoding::Single);
        assert_eq!(UriEncoding::for_service("execute-api"), UriEncoding::Double);
        assert_eq!(UriEncoding::for_service("glacier"), UriEncoding::Double);
    }
}

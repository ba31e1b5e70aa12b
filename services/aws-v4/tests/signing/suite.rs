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

use super::{sign, signature, static_credential, SUITE_SECRET};
use anyhow::Result;
use awscurl_aws_v4::{RequestSigner, UriEncoding};
use awscurl_core::hash::hex_sha256;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::Request;
use pretty_assertions::assert_eq;

fn suite_signer() -> RequestSigner {
    RequestSigner::new("service", "us-east-1")
}

#[tokio::test]
async fn test_get_vanilla() -> Result<()> {
    let req = Request::get("https://example.amazonaws.com/").body(&b""[..])?;

    let parts = sign(suite_signer(), req, &static_credential(SUITE_SECRET)).await?;
    assert_eq!(
        parts.headers[AUTHORIZATION],
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
         SignedHeaders=host;x-amz-date, \
         Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
    );
    assert_eq!(parts.headers[HOST], "example.amazonaws.com");
    assert_eq!(parts.uri.to_string(), "https://example.amazonaws.com/");
    Ok(())
}

#[tokio::test]
async fn test_get_vanilla_query_order_key_case() -> Result<()> {
    let req = Request::get("https://example.amazonaws.com/?Param2=value2&Param1=value1")
        .body(&b""[..])?;

    let parts = sign(suite_signer(), req, &static_credential(SUITE_SECRET)).await?;
    assert_eq!(
        signature(&parts)?,
        "b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500"
    );
    Ok(())
}

#[tokio::test]
async fn test_post_x_www_form_urlencoded() -> Result<()> {
    let req = Request::post("https://example.amazonaws.com/")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(&b"Param1=value1"[..])?;

    let parts = sign(suite_signer(), req, &static_credential(SUITE_SECRET)).await?;
    assert!(parts.headers[AUTHORIZATION]
        .to_str()?
        .contains("SignedHeaders=content-type;host;x-amz-date,"));
    assert_eq!(
        signature(&parts)?,
        "ff11897932ad3f4e8b18135d722051e5ac45fc38421b1da7b9d196a0fe09473a"
    );
    Ok(())
}

#[tokio::test]
async fn test_get_header_value_trim() -> Result<()> {
    let req = Request::get("https://example.amazonaws.com/")
        .header("my-header1", " value1")
        .header("my-header2", " \"a   b   c\"")
        .body(&b""[..])?;

    let parts = sign(suite_signer(), req, &static_credential(SUITE_SECRET)).await?;
    assert_eq!(
        signature(&parts)?,
        "acc3ed3afb60bb290fc8d2dd0098b9911fcaa05412b367055dee359757a9c736"
    );
    Ok(())
}

#[tokio::test]
async fn test_get_header_key_duplicate() -> Result<()> {
    let req = Request::get("https://example.amazonaws.com/")
        .header("my-header1", "value2")
        .header("my-header1", "value1")
        .body(&b""[..])?;

    let parts = sign(suite_signer(), req, &static_credential(SUITE_SECRET)).await?;
    assert_eq!(
        signature(&parts)?,
        "bdec613c2a8207a05bafa9a654353e209c3710b086c46ced81798cdcf09f80c1"
    );
    Ok(())
}

#[tokio::test]
async fn test_get_utf8_single_encoded() -> Result<()> {
    let req = Request::get("https://example.amazonaws.com/%E1%88%B4").body(&b""[..])?;

    let signer = suite_signer().with_uri_encoding(UriEncoding::Single);
    let parts = sign(signer, req, &static_credential(SUITE_SECRET)).await?;
    assert_eq!(
        signature(&parts)?,
        "8318018e0b0f223aa2bbf98705b62bb787dc9c0e678f255a891fd03141be5d85"
    );
    Ok(())
}

#[tokio::test]
async fn test_get_space_double_encoded() -> Result<()> {
    let req = Request::get("https://example.amazonaws.com/example%20space/").body(&b""[..])?;

    let parts = sign(suite_signer(), req, &static_credential(SUITE_SECRET)).await?;
    assert_eq!(
        signature(&parts)?,
        "446b817944c553435b35e813c261ff4e161fff982d1bacdef1c87f6785dd1662"
    );
    Ok(())
}

#[tokio::test]
async fn test_query_plus_and_empty_value() -> Result<()> {
    let req = Request::get("https://example.amazonaws.com/?q=a+b&empty").body(&b""[..])?;

    let parts = sign(suite_signer(), req, &static_credential(SUITE_SECRET)).await?;
    assert_eq!(
        signature(&parts)?,
        "139db0e75c5b24560a0a3a3b111b8d0794526bdcdcbd45226c217411335b29fa"
    );
    Ok(())
}

#[tokio::test]
async fn test_post_json_execute_api() -> Result<()> {
    let req = Request::post("https://example.execute-api.us-east-1.amazonaws.com/prod/items?b=2&a=1")
        .header(CONTENT_TYPE, "application/json")
        .body(&br#"{"name":"widget"}"#[..])?;

    let signer = RequestSigner::new("execute-api", "us-east-1");
    let parts = sign(signer, req, &static_credential("secret")).await?;
    assert_eq!(
        signature(&parts)?,
        "c3f4581d501c5a48640e8bd4447c566b93865b25f6cfacc85766ab5e757ebf6d"
    );
    Ok(())
}

#[tokio::test]
async fn test_query_order_is_irrelevant() -> Result<()> {
    let cred = static_credential("secret");
    let signer = || RequestSigner::new("execute-api", "us-east-1");

    let a = sign(
        signer(),
        Request::get("https://example.execute-api.us-east-1.amazonaws.com/r?b=2&a=1")
            .body(&b""[..])?,
        &cred,
    )
    .await?;
    let b = sign(
        signer(),
        Request::get("https://example.execute-api.us-east-1.amazonaws.com/r?a=1&b=2")
            .body(&b""[..])?,
        &cred,
    )
    .await?;

    assert_eq!(signature(&a)?, signature(&b)?);
    Ok(())
}

#[tokio::test]
async fn test_s3_get_object() -> Result<()> {
    let req = Request::get("https://examplebucket.s3.amazonaws.com/test.txt").body(&b""[..])?;

    let signer = RequestSigner::new("s3", "us-east-1");
    let parts = sign(signer, req, &static_credential(SUITE_SECRET)).await?;
    assert_eq!(parts.headers["x-amz-content-sha256"], hex_sha256(b""));
    assert_eq!(
        parts.headers[AUTHORIZATION],
        "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/s3/aws4_request, \
         SignedHeaders=host;x-amz-content-sha256;x-amz-date, \
         Signature=bbfdf4d3c3eab24da182f8f790e0c7d8e2a20658191717a6546076effa9f5a5e"
    );
    Ok(())
}

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

use super::create_test_context;
use anyhow::Result;
use awscurl_aws_v4::constants::*;
use awscurl_aws_v4::{Config, CredentialSource, DefaultCredentialProvider, ImdsCredentialProvider};
use awscurl_core::ProvideCredential;
use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const CREDENTIAL_JSON: &str = r#"{
  "Code" : "Success",
  "LastUpdated" : "2015-08-30T12:00:00Z",
  "Type" : "AWS-HMAC",
  "AccessKeyId" : "ASIAIMDSACCESSKEY",
  "SecretAccessKey" : "imds-secret",
  "Token" : "imds-token",
  "Expiration" : "2099-01-01T00:00:00Z"
}"#;

/// Start a fake metadata service that answers with one connection per request.
async fn start_imds() -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve(stream));
        }
    });

    Ok(addr)
}

async fn serve(mut stream: TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf).to_lowercase();
    let request_line = head.lines().next().unwrap_or_default().to_string();
    let has_ttl = head.contains("x-aws-ec2-metadata-token-ttl-seconds: 21600");
    let has_token = head.contains("x-aws-ec2-metadata-token: session-token");

    let (status, body) = match request_line.as_str() {
        "put /latest/api/token http/1.1" if has_ttl => ("200 OK", "session-token"),
        "get /latest/meta-data/iam/security-credentials/ http/1.1" if has_token => {
            ("200 OK", "imds-role\n")
        }
        "get /latest/meta-data/iam/security-credentials/imds-role http/1.1" if has_token => {
            ("200 OK", CREDENTIAL_JSON)
        }
        _ => ("401 Unauthorized", ""),
    };

    let resp = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(resp.as_bytes()).await;
}

#[tokio::test]
async fn test_imds_credential_provider() -> Result<()> {
    let addr = start_imds().await?;
    let home = tempfile::tempdir()?;
    let ctx = create_test_context(home.path(), &[]);

    let cred = ImdsCredentialProvider::new()
        .with_endpoint(format!("http://{addr}"))
        .provide_credential(&ctx)
        .await?
        .expect("credential must exist");

    assert_eq!(cred.access_key_id, "ASIAIMDSACCESSKEY");
    assert_eq!(cred.secret_access_key, "imds-secret");
    assert_eq!(cred.session_token.as_deref(), Some("imds-token"));
    assert!(cred.expires_in.is_some());
    assert_eq!(cred.source, CredentialSource::InstanceRole);
    Ok(())
}

#[tokio::test]
async fn test_default_chain_falls_back_to_imds() -> Result<()> {
    let addr = start_imds().await?;
    let endpoint = format!("http://{addr}/");
    let home = tempfile::tempdir()?;
    let ctx = create_test_context(
        home.path(),
        &[(AWS_EC2_METADATA_SERVICE_ENDPOINT, endpoint.as_str())],
    );

    let config = Config::default().from_env(&ctx);
    let cred = DefaultCredentialProvider::new(&config)?
        .provide_credential(&ctx)
        .await?
        .expect("credential must exist");

    assert_eq!(cred.access_key_id, "ASIAIMDSACCESSKEY");
    assert_eq!(cred.source, CredentialSource::InstanceRole);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_imds_is_absent() -> Result<()> {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let home = tempfile::tempdir()?;
    let ctx = create_test_context(home.path(), &[]);

    let cred = ImdsCredentialProvider::new()
        .with_endpoint(format!("http://{addr}"))
        .provide_credential(&ctx)
        .await?;
    assert!(cred.is_none());
    Ok(())
}

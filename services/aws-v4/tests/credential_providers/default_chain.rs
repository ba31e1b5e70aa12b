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
use awscurl_aws_v4::{Config, CredentialSource, DefaultCredentialProvider, RegionResolver};
use awscurl_core::{Context, ErrorKind, ProvideCredential};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

/// A home directory with a `default` and a `dev` profile.
fn home() -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join(".aws"))?;
    fs::write(
        dir.path().join(".aws").join("credentials"),
        "[default]\n\
         aws_access_key_id = DEFAULT_AK\n\
         aws_secret_access_key = DEFAULT_SK\n\
         \n\
         [dev]\n\
         aws_access_key_id = DEV_AK\n\
         aws_secret_access_key = DEV_SK\n\
         aws_session_token = DEV_TOKEN\n",
    )?;
    fs::write(
        dir.path().join(".aws").join("config"),
        "[default]\n\
         region = us-west-2\n\
         \n\
         [profile dev]\n\
         region = eu-central-1\n",
    )?;
    Ok(dir)
}

const ENV_CREDS: [(&str, &str); 3] = [
    (AWS_ACCESS_KEY_ID, "ENV_AK"),
    (AWS_SECRET_ACCESS_KEY, "ENV_SK"),
    (AWS_EC2_METADATA_DISABLED, "true"),
];

async fn resolve(
    ctx: &Context,
    config: Config,
) -> awscurl_core::Result<Option<(String, CredentialSource)>> {
    let config = config.from_env(ctx);
    let cred = DefaultCredentialProvider::new(&config)?
        .provide_credential(ctx)
        .await?;
    Ok(cred.map(|c| (c.access_key_id, c.source)))
}

#[tokio::test]
async fn test_explicit_beats_everything() -> Result<()> {
    let home = home()?;
    let ctx = create_test_context(home.path(), &ENV_CREDS);

    let config = Config {
        access_key_id: Some("FLAG_AK".to_string()),
        secret_access_key: Some("FLAG_SK".to_string()),
        profile: Some("dev".to_string()),
        ..Default::default()
    };
    assert_eq!(
        resolve(&ctx, config).await?,
        Some(("FLAG_AK".to_string(), CredentialSource::Explicit))
    );
    Ok(())
}

#[tokio::test]
async fn test_named_profile_beats_env() -> Result<()> {
    let home = home()?;
    let mut envs = ENV_CREDS.to_vec();
    envs.push((AWS_PROFILE, "dev"));
    let ctx = create_test_context(home.path(), &envs);

    assert_eq!(
        resolve(&ctx, Config::default()).await?,
        Some(("DEV_AK".to_string(), CredentialSource::Profile))
    );
    Ok(())
}

#[tokio::test]
async fn test_env_beats_default_profile() -> Result<()> {
    let home = home()?;
    let ctx = create_test_context(home.path(), &ENV_CREDS);

    assert_eq!(
        resolve(&ctx, Config::default()).await?,
        Some(("ENV_AK".to_string(), CredentialSource::Environment))
    );
    Ok(())
}

#[tokio::test]
async fn test_default_profile_fallback() -> Result<()> {
    let home = home()?;
    let ctx = create_test_context(home.path(), &[(AWS_EC2_METADATA_DISABLED, "true")]);

    assert_eq!(
        resolve(&ctx, Config::default()).await?,
        Some(("DEFAULT_AK".to_string(), CredentialSource::Profile))
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_named_profile_is_an_error() -> Result<()> {
    let home = home()?;
    let ctx = create_test_context(home.path(), &ENV_CREDS);

    let config = Config {
        profile: Some("prod".to_string()),
        ..Default::default()
    };
    let err = resolve(&ctx, config)
        .await
        .expect_err("unknown profile must not fall through to env");
    assert_eq!(err.kind(), ErrorKind::CredentialsUnavailable);
    assert_eq!(err.message(), "profile prod not found");
    Ok(())
}

#[tokio::test]
async fn test_files_from_env_overrides() -> Result<()> {
    let home = home()?;
    let other = tempfile::tempdir()?;
    let credentials = other.path().join("credentials");
    fs::write(
        &credentials,
        "[default]\naws_access_key_id = OTHER_AK\naws_secret_access_key = OTHER_SK\n",
    )?;
    let credentials = credentials.to_string_lossy().to_string();
    let ctx = create_test_context(
        home.path(),
        &[
            (AWS_SHARED_CREDENTIALS_FILE, credentials.as_str()),
            (AWS_EC2_METADATA_DISABLED, "true"),
        ],
    );

    assert_eq!(
        resolve(&ctx, Config::default()).await?,
        Some(("OTHER_AK".to_string(), CredentialSource::Profile))
    );
    Ok(())
}

#[tokio::test]
async fn test_nothing_anywhere() -> Result<()> {
    let empty = tempfile::tempdir()?;
    let ctx = create_test_context(empty.path(), &[(AWS_EC2_METADATA_DISABLED, "TRUE")]);

    assert_eq!(resolve(&ctx, Config::default()).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_region_follows_selected_profile() -> Result<()> {
    let home = home()?;

    let ctx = create_test_context(home.path(), &[(AWS_PROFILE, "dev")]);
    let config = Config::default().from_env(&ctx);
    assert_eq!(RegionResolver::new(config).resolve(&ctx).await?, "eu-central-1");

    let ctx = create_test_context(home.path(), &[]);
    let config = Config::default().from_env(&ctx);
    assert_eq!(RegionResolver::new(config).resolve(&ctx).await?, "us-west-2");

    let ctx = create_test_context(home.path(), &[(AWS_DEFAULT_REGION, "ap-south-1")]);
    let config = Config::default().from_env(&ctx);
    assert_eq!(RegionResolver::new(config).resolve(&ctx).await?, "ap-south-1");
    Ok(())
}

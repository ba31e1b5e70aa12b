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

use std::collections::HashMap;

use crate::config::{config_file_section, load_ini_section};
use crate::constants::*;
use crate::{Credential, CredentialSource};
use async_trait::async_trait;
use awscurl_core::{Context, Error, ProvideCredential, Result};
use log::debug;

/// ProfileCredentialProvider loads AWS credentials from the shared profile files.
///
/// This provider loads credentials from:
/// - the `[name]` section of the credentials file (`~/.aws/credentials` by default)
/// - the `[profile name]` section of the config file (`~/.aws/config` by default,
///   `[default]` for the default profile)
///
/// The credentials file wins when both have keys. File paths are taken as
/// given; [`crate::Config::from_env`] is where `AWS_CONFIG_FILE` and
/// `AWS_SHARED_CREDENTIALS_FILE` are honored.
#[derive(Debug, Clone)]
pub struct ProfileCredentialProvider {
    profile: String,
    required: bool,
    config_file: String,
    credentials_file: String,
}

impl Default for ProfileCredentialProvider {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE)
    }
}

impl ProfileCredentialProvider {
    /// Create a new ProfileCredentialProvider for the given profile.
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            required: false,
            config_file: DEFAULT_CONFIG_FILE.to_string(),
            credentials_file: DEFAULT_CREDENTIALS_FILE.to_string(),
        }
    }

    /// Fail instead of yielding nothing when the profile has no keys.
    ///
    /// Used for profiles the user named explicitly.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the path to the config file.
    pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = path.into();
        self
    }

    /// Set the path to the credentials file.
    pub fn with_credentials_file(mut self, path: impl Into<String>) -> Self {
        self.credentials_file = path.into();
        self
    }

    fn credential_from_props(&self, props: &HashMap<String, String>) -> Option<Credential> {
        let non_empty = |key: &str| props.get(key).filter(|v| !v.is_empty()).cloned();

        match (
            non_empty("aws_access_key_id"),
            non_empty("aws_secret_access_key"),
        ) {
            (Some(ak), Some(sk)) => Some(Credential {
                access_key_id: ak,
                secret_access_key: sk,
                session_token: non_empty("aws_session_token"),
                expires_in: None,
                source: CredentialSource::Profile,
            }),
            _ => None,
        }
    }
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let profile = self.profile.as_str();
        let mut found = false;

        // Try credentials file first
        if let Some(props) = load_ini_section(ctx, &self.credentials_file, profile).await? {
            found = true;
            if let Some(cred) = self.credential_from_props(&props) {
                debug!("loaded credential for profile {profile} from credentials file");
                return Ok(Some(cred));
            }
        }

        // Then try config file
        let section = config_file_section(profile);
        if let Some(props) = load_ini_section(ctx, &self.config_file, &section).await? {
            found = true;
            if let Some(cred) = self.credential_from_props(&props) {
                debug!("loaded credential for profile {profile} from config file");
                return Ok(Some(cred));
            }
        }

        if !self.required {
            debug!("no credential found for profile {profile}");
            return Ok(None);
        }

        let message = if found {
            format!("profile {profile} has no aws_access_key_id and aws_secret_access_key")
        } else {
            format!("profile {profile} not found")
        };
        Err(Error::credentials_unavailable(message)
            .with_context(format!("credentials_file: {}", self.credentials_file))
            .with_context(format!("config_file: {}", self.config_file)))
    }
}

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

use crate::constants::*;
use crate::provide_credential::{
    EnvCredentialProvider, ImdsCredentialProvider, ProfileCredentialProvider,
    ProvideCredentialChain, StaticCredentialProvider,
};
use crate::{Config, Credential};
use async_trait::async_trait;
use awscurl_core::{Context, Error, ProvideCredential, Result};

/// DefaultCredentialProvider is a loader that will try to load credential via default chains.
///
/// Resolution order:
///
/// 1. Explicit access key and secret key from [`Config`]
/// 2. The named profile, if any (missing keys are an error)
/// 3. Environment variables
/// 4. The `default` profile, only when no profile was named
/// 5. EC2 IMDSv2, unless disabled
#[derive(Debug, Clone)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain,
}

impl DefaultCredentialProvider {
    /// Build the default chain from `config`.
    ///
    /// Fails when the explicit credentials in `config` are incomplete.
    pub fn new(config: &Config) -> Result<Self> {
        let mut chain = ProvideCredentialChain::new();

        match (
            config.access_key_id.as_deref(),
            config.secret_access_key.as_deref(),
        ) {
            (Some(ak), Some(sk)) => {
                let mut provider = StaticCredentialProvider::new(ak, sk);
                if let Some(token) = config.session_token.as_deref() {
                    provider = provider.with_session_token(token);
                }
                chain = chain.push(provider);
            }
            (Some(_), None) => {
                return Err(Error::credentials_unavailable(
                    "access key given but secret key is missing",
                ))
            }
            (None, Some(_)) => {
                return Err(Error::credentials_unavailable(
                    "secret key given but access key is missing",
                ))
            }
            (None, None) if config.session_token.is_some() => {
                return Err(Error::credentials_unavailable(
                    "session token given but access key and secret key are missing",
                ))
            }
            (None, None) => {}
        }

        let profile = |name: &str| {
            ProfileCredentialProvider::new(name)
                .with_config_file(config.config_file.clone())
                .with_credentials_file(config.credentials_file.clone())
        };

        if let Some(name) = config.profile.as_deref() {
            chain = chain.push(profile(name).with_required(true));
        }

        chain = chain.push(EnvCredentialProvider::new());

        if config.profile.is_none() {
            chain = chain.push(profile(DEFAULT_PROFILE));
        }

        if !config.ec2_metadata_disabled {
            chain = chain.push(
                ImdsCredentialProvider::new()
                    .with_endpoint(config.imds_endpoint.clone())
                    .with_timeout(config.imds_timeout),
            );
        }

        Ok(Self { chain })
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain) -> Self {
        Self { chain }
    }

    /// The chain this provider walks.
    pub fn chain(&self) -> &ProvideCredentialChain {
        &self.chain
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}

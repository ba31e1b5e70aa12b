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

use crate::provide_credential::{
    EnvCredentialProvider, ImdsCredentialProvider, ProfileCredentialProvider,
    StaticCredentialProvider,
};
use crate::Credential;
use async_trait::async_trait;
use awscurl_core::{Context, ProvideCredential, Result};
use log::debug;

/// One credential source the chain can consult.
#[derive(Debug, Clone)]
pub enum CredentialProvider {
    /// Credentials given directly by the caller.
    Static(StaticCredentialProvider),
    /// `AWS_ACCESS_KEY_ID` and friends.
    Env(EnvCredentialProvider),
    /// Shared config and credentials files.
    Profile(ProfileCredentialProvider),
    /// EC2 instance metadata service.
    Imds(ImdsCredentialProvider),
}

impl From<StaticCredentialProvider> for CredentialProvider {
    fn from(p: StaticCredentialProvider) -> Self {
        Self::Static(p)
    }
}

impl From<EnvCredentialProvider> for CredentialProvider {
    fn from(p: EnvCredentialProvider) -> Self {
        Self::Env(p)
    }
}

impl From<ProfileCredentialProvider> for CredentialProvider {
    fn from(p: ProfileCredentialProvider) -> Self {
        Self::Profile(p)
    }
}

impl From<ImdsCredentialProvider> for CredentialProvider {
    fn from(p: ImdsCredentialProvider) -> Self {
        Self::Imds(p)
    }
}

#[async_trait]
impl ProvideCredential for CredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        match self {
            Self::Static(p) => p.provide_credential(ctx).await,
            Self::Env(p) => p.provide_credential(ctx).await,
            Self::Profile(p) => p.provide_credential(ctx).await,
            Self::Imds(p) => p.provide_credential(ctx).await,
        }
    }
}

/// A chain of credential providers that are tried in order.
///
/// The first provider that yields a credential wins. A provider that fails
/// stops the chain and its error is returned as is, so a broken source is
/// never silently skipped in favor of a later one.
///
/// # Example
///
/// ```no_run
/// use awscurl_aws_v4::{EnvCredentialProvider, ProfileCredentialProvider, ProvideCredentialChain};
///
/// let chain = ProvideCredentialChain::new()
///     .push(EnvCredentialProvider::new())
///     .push(ProfileCredentialProvider::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProvideCredentialChain {
    providers: Vec<CredentialProvider>,
}

impl ProvideCredentialChain {
    /// Create a new empty credential provider chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential provider to the chain.
    pub fn push(mut self, provider: impl Into<CredentialProvider>) -> Self {
        self.providers.push(provider.into());
        self
    }

    /// Returns the number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if the chain has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Iterate the providers in the order they are tried.
    pub fn providers(&self) -> impl Iterator<Item = &CredentialProvider> {
        self.providers.iter()
    }
}

#[async_trait]
impl ProvideCredential for ProvideCredentialChain {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        for provider in &self.providers {
            debug!("trying credential provider: {provider:?}");

            if let Some(cred) = provider.provide_credential(ctx).await? {
                debug!("loaded credential from source {}", cred.source);
                return Ok(Some(cred));
            }
        }

        debug!("no credential provider yielded a credential");
        Ok(None)
    }
}

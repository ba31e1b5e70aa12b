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
use crate::{Credential, CredentialSource};
use async_trait::async_trait;
use awscurl_core::{Context, Error, ProvideCredential, Result};
use log::debug;

/// EnvCredentialProvider loads AWS credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `AWS_ACCESS_KEY_ID`: The AWS access key ID
/// - `AWS_SECRET_ACCESS_KEY`: The AWS secret access key
/// - `AWS_SESSION_TOKEN`: The AWS session token (optional)
///
/// Empty values count as unset. Setting only one half of the key pair is an
/// error rather than a reason to fall through to the next source.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let access_key_id = ctx.env_var_non_empty(AWS_ACCESS_KEY_ID);
        let secret_access_key = ctx.env_var_non_empty(AWS_SECRET_ACCESS_KEY);

        match (access_key_id, secret_access_key) {
            (Some(ak), Some(sk)) => Ok(Some(Credential {
                access_key_id: ak,
                secret_access_key: sk,
                session_token: ctx.env_var_non_empty(AWS_SESSION_TOKEN),
                expires_in: None,
                source: CredentialSource::Environment,
            })),
            (Some(_), None) => Err(Error::credentials_unavailable(format!(
                "{AWS_ACCESS_KEY_ID} is set but {AWS_SECRET_ACCESS_KEY} is missing"
            ))),
            (None, Some(_)) => Err(Error::credentials_unavailable(format!(
                "{AWS_SECRET_ACCESS_KEY} is set but {AWS_ACCESS_KEY_ID} is missing"
            ))),
            (None, None) => {
                debug!("no credential found in environment");
                Ok(None)
            }
        }
    }
}

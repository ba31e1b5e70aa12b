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

use awscurl_core::time::DateTime;
use awscurl_core::utils::Redact;
use std::fmt::{self, Debug, Display, Formatter};

/// Where a credential was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialSource {
    /// Passed on the command line.
    #[default]
    Explicit,
    /// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`.
    Environment,
    /// A section of the shared credentials or config file.
    Profile,
    /// The EC2 instance metadata service.
    InstanceRole,
}

impl Display for CredentialSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Explicit => f.write_str("explicit"),
            CredentialSource::Environment => f.write_str("environment"),
            CredentialSource::Profile => f.write_str("profile"),
            CredentialSource::InstanceRole => f.write_str("instance role"),
        }
    }
}

/// Credential that holds the access_key and secret_key.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for aws services.
    pub access_key_id: String,
    /// Secret access key for aws services.
    pub secret_access_key: String,
    /// Session token for aws services.
    pub session_token: Option<String>,
    /// Expiration time for this credential.
    pub expires_in: Option<DateTime>,
    /// Source this credential was resolved from.
    pub source: CredentialSource,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("expires_in", &self.expires_in)
            .field("source", &self.source)
            .finish()
    }
}

impl Credential {
    /// Check validity against the given instant instead of the wall clock.
    ///
    /// A credential expiring within two minutes of `at` is already invalid.
    pub fn is_valid_at(&self, at: DateTime) -> bool {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return false;
        }

        match self.expires_in {
            Some(expires_in) => expires_in > at + chrono::TimeDelta::minutes(2),
            None => true,
        }
    }
}

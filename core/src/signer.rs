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

use crate::{Context, Error, ProvideCredential, Result, SignRequest};
use log::debug;

/// Signer is the main struct used to sign the request.
///
/// It resolves a credential through its provider and hands it to the request
/// signer. `awscurl` signs exactly one request per process, so the credential
/// is resolved on every call and never cached.
#[derive(Clone, Debug)]
pub struct Signer<P, S> {
    ctx: Context,
    provider: P,
    signer: S,
}

impl<P, S> Signer<P, S>
where
    P: ProvideCredential,
    S: SignRequest<Credential = P::Credential>,
{
    /// Create a new signer.
    pub fn new(ctx: Context, provider: P, signer: S) -> Self {
        Self {
            ctx,
            provider,
            signer,
        }
    }

    /// Resolve a credential and sign the request in place.
    ///
    /// Returns [`crate::ErrorKind::CredentialsUnavailable`] when no source yields a
    /// credential.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        let credential = self
            .provider
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| {
                Error::credentials_unavailable("no credential source yielded credentials")
            })?;
        debug!("signing {} {} with resolved credential", req.method, req.uri);

        self.signer
            .sign_request(&self.ctx, req, body, Some(&credential))
            .await
    }
}

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

use awscurl_core::{Context, Error, Result};
use log::debug;

use crate::config::{config_file_section, load_ini_section};
use crate::constants::*;
use crate::Config;

/// RegionResolver picks the signing region.
///
/// Resolution order:
///
/// 1. The explicit region from [`Config::region`]
/// 2. `AWS_REGION`
/// 3. `AWS_DEFAULT_REGION`
/// 4. The `region` key of the selected profile in the config file
#[derive(Debug, Clone)]
pub struct RegionResolver {
    config: Config,
}

impl RegionResolver {
    /// Create a new region resolver.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolve the region, failing with `RegionUnavailable` if no source has one.
    pub async fn resolve(&self, ctx: &Context) -> Result<String> {
        if let Some(region) = self.config.region.as_ref().filter(|v| !v.is_empty()) {
            debug!("region resolved from explicit config: {region}");
            return Ok(region.clone());
        }

        for key in [AWS_REGION, AWS_DEFAULT_REGION] {
            if let Some(region) = ctx.env_var_non_empty(key) {
                debug!("region resolved from env {key}: {region}");
                return Ok(region);
            }
        }

        let profile = self.config.profile_name();
        let section = config_file_section(profile);
        if let Some(region) = load_ini_section(ctx, &self.config.config_file, &section)
            .await?
            .and_then(|mut props| props.remove("region"))
            .filter(|v| !v.is_empty())
        {
            debug!("region resolved from profile {profile}: {region}");
            return Ok(region);
        }

        Err(
            Error::region_unavailable("no region configured for signing")
                .with_context(format!("profile: {profile}"))
                .with_context("hint: pass --region or set AWS_REGION"),
        )
    }
}

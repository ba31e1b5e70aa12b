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
use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

use awscurl_core::utils::Redact;
use awscurl_core::{Context, Error, Result};
use ini::Ini;
use log::debug;

use crate::constants::*;

/// Config for resolving credentials and region.
///
/// Fields set by the caller always win. [`Config::from_env`] only fills in
/// what is still unset.
#[derive(Clone)]
pub struct Config {
    /// `profile` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_PROFILE`]
    ///
    /// When neither is set the `default` profile is consulted, but its absence
    /// is not an error.
    pub profile: Option<String>,
    /// Explicit access key id, usually from `--access-key`.
    pub access_key_id: Option<String>,
    /// Explicit secret access key, usually from `--secret-key`.
    pub secret_access_key: Option<String>,
    /// Explicit session token, usually from `--session-token`.
    pub session_token: Option<String>,
    /// Explicit region, usually from `--region`.
    pub region: Option<String>,
    /// `config_file` will be load from:
    ///
    /// - env value: [`AWS_CONFIG_FILE`]
    /// - default to: `~/.aws/config`
    pub config_file: String,
    /// `credentials_file` will be loaded from:
    ///
    /// - env value: [`AWS_SHARED_CREDENTIALS_FILE`]
    /// - default to: `~/.aws/credentials`
    pub credentials_file: String,
    /// `ec2_metadata_disabled` value will be loaded from:
    ///
    /// - this field
    /// - env value: [`AWS_EC2_METADATA_DISABLED`]
    pub ec2_metadata_disabled: bool,
    /// `imds_endpoint` will be loaded from:
    ///
    /// - env value: [`AWS_EC2_METADATA_SERVICE_ENDPOINT`]
    /// - default to: `http://169.254.169.254`
    pub imds_endpoint: String,
    /// Upper bound for every single instance metadata request.
    pub imds_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            region: None,
            config_file: DEFAULT_CONFIG_FILE.to_string(),
            credentials_file: DEFAULT_CREDENTIALS_FILE.to_string(),
            ec2_metadata_disabled: false,
            imds_endpoint: DEFAULT_IMDS_ENDPOINT.to_string(),
            imds_timeout: DEFAULT_IMDS_TIMEOUT,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("profile", &self.profile)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("region", &self.region)
            .field("config_file", &self.config_file)
            .field("credentials_file", &self.credentials_file)
            .field("ec2_metadata_disabled", &self.ec2_metadata_disabled)
            .field("imds_endpoint", &self.imds_endpoint)
            .field("imds_timeout", &self.imds_timeout)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Credential and region variables are not copied here; the providers and
    /// the region resolver read them when they run.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var_non_empty(AWS_CONFIG_FILE) {
            self.config_file = v;
        }
        if let Some(v) = ctx.env_var_non_empty(AWS_SHARED_CREDENTIALS_FILE) {
            self.credentials_file = v;
        }
        if self.profile.is_none() {
            self.profile = ctx.env_var_non_empty(AWS_PROFILE);
        }
        if let Some(v) = ctx.env_var(AWS_EC2_METADATA_DISABLED) {
            self.ec2_metadata_disabled |= v.eq_ignore_ascii_case("true");
        }
        if let Some(v) = ctx.env_var_non_empty(AWS_EC2_METADATA_SERVICE_ENDPOINT) {
            self.imds_endpoint = v;
        }
        self
    }

    /// The profile to read from shared files: the named one, or `default`.
    pub fn profile_name(&self) -> &str {
        self.profile.as_deref().unwrap_or(DEFAULT_PROFILE)
    }
}

/// Section name of `profile` inside the shared config file.
///
/// The config file spells named profiles as `[profile name]`, except for
/// `[default]`.
pub(crate) fn config_file_section(profile: &str) -> String {
    match profile {
        DEFAULT_PROFILE => DEFAULT_PROFILE.to_string(),
        x => format!("profile {x}"),
    }
}

/// Load one section of a shared ini file.
///
/// - Returns `Ok(None)` if the file is missing, the path can't be expanded,
///   or the section doesn't exist.
/// - Returns `Io` if the file exists but can't be read.
/// - Returns `ConfigInvalid` if the file exists but can't be parsed.
pub(crate) async fn load_ini_section(
    ctx: &Context,
    path: &str,
    section: &str,
) -> Result<Option<HashMap<String, String>>> {
    let Some(expanded_path) = ctx.expand_home_dir(path) else {
        debug!("failed to expand homedir for path: {path}");
        return Ok(None);
    };

    let content = match ctx.file_read(&expanded_path).await {
        Ok(content) => content,
        Err(err) if is_not_found(&err) => {
            debug!("{expanded_path} does not exist, treating as absent");
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    let conf = Ini::load_from_str(&String::from_utf8_lossy(&content)).map_err(|e| {
        Error::config_invalid("failed to parse profile file")
            .with_context(format!("path: {expanded_path}"))
            .with_source(e)
    })?;

    let Some(props) = conf.section(Some(section)) else {
        debug!("section [{section}] not found in {expanded_path}");
        return Ok(None);
    };

    Ok(Some(
        props
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    ))
}

fn is_not_found(err: &Error) -> bool {
    std::error::Error::source(err)
        .and_then(|source| source.downcast_ref::<std::io::Error>())
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

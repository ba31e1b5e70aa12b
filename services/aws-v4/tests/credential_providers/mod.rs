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

mod default_chain;
mod imds;

use awscurl_core::{Context, StaticEnv};
use awscurl_file_read_tokio::TokioFileRead;
use awscurl_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::collections::HashMap;
use std::path::Path;

/// A context that reads real files and talks real HTTP, with a fixed
/// environment and home directory.
pub fn create_test_context(home_dir: &Path, envs: &[(&str, &str)]) -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    let client = Client::builder()
        .no_proxy()
        .build()
        .expect("client must build");

    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::new(client))
        .with_env(StaticEnv {
            home_dir: Some(home_dir.to_path_buf()),
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
}

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

use awscurl_core::{Context, Result};
use bytes::Bytes;
use log::debug;

/// The request body as given by `-d`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    /// No `-d` at all.
    #[default]
    Empty,
    /// Literal data sent as UTF-8 bytes.
    Inline(String),
    /// `@path`, sent as the exact file bytes.
    File(String),
}

impl Payload {
    /// Interpret the raw `-d` argument.
    pub fn parse(data: Option<&str>) -> Self {
        match data {
            None => Payload::Empty,
            Some(v) => match v.strip_prefix('@') {
                Some(path) => Payload::File(path.to_string()),
                None => Payload::Inline(v.to_string()),
            },
        }
    }

    /// Load the body bytes, reading the file through `ctx` if needed.
    pub async fn load(&self, ctx: &Context) -> Result<Bytes> {
        match self {
            Payload::Empty => Ok(Bytes::new()),
            Payload::Inline(v) => Ok(Bytes::from(v.clone())),
            Payload::File(path) => {
                let content = ctx.file_read(path).await?;
                debug!("read {} bytes of payload from {path}", content.len());
                Ok(Bytes::from(content))
            }
        }
    }
}

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

use awscurl_core::{Error, Result};
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;

/// Parse one `Name: Value` header argument.
///
/// The input is split at the first `:` so values may contain more colons.
/// Name and value are trimmed.
pub fn parse_header(input: &str) -> Result<(HeaderName, HeaderValue)> {
    let Some((name, value)) = input.split_once(':') else {
        return Err(Error::invalid_header(format!(
            "invalid header {input:?}, expected \"Name: Value\""
        )));
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_header(format!(
            "invalid header {input:?}, name is empty"
        )));
    }

    let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        Error::invalid_header(format!("invalid header name {name:?}")).with_source(e)
    })?;
    let value = HeaderValue::from_str(value.trim()).map_err(|e| {
        Error::invalid_header(format!("invalid value for header {name}")).with_source(e)
    })?;

    Ok((name, value))
}

/// Parse every header argument, keeping repeated names in order.
pub fn parse_headers<I, S>(inputs: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut headers = HeaderMap::new();
    for input in inputs {
        let (name, value) = parse_header(input.as_ref())?;
        headers.append(name, value);
    }
    Ok(headers)
}

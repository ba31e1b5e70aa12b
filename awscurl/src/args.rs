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

use clap::Parser;
use log::LevelFilter;

/// cURL with AWS request signing.
///
/// Sends one HTTP request signed with AWS Signature Version 4 and writes the
/// response body to stdout.
#[derive(Parser, Debug, Clone)]
#[command(name = "awscurl", version, about, long_about = None)]
pub struct Args {
    /// URL to send the request to
    #[arg(value_name = "URL")]
    pub url: String,

    /// Custom request method to use
    #[arg(short = 'X', long = "request", value_name = "METHOD", default_value = "GET")]
    pub method: String,

    /// Data payload to send, or @file to send the file content
    #[arg(short, long, value_name = "STRING|@FILE")]
    pub data: Option<String>,

    /// Extra header to include in the request, as "Name: Value"; repeatable
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// AWS Access Key ID to use for authentication
    #[arg(long)]
    pub access_key: Option<String>,

    /// AWS Secret Access Key to use for authentication
    #[arg(long)]
    pub secret_key: Option<String>,

    /// AWS Session Token to use for authentication
    #[arg(long)]
    pub session_token: Option<String>,

    /// AWS profile to use for authentication
    #[arg(long)]
    pub profile: Option<String>,

    /// The name of the AWS service, used for signing the request
    #[arg(long, default_value = "execute-api")]
    pub service: String,

    /// AWS region to use for signing the request
    #[arg(long)]
    pub region: Option<String>,

    /// Allow insecure TLS connections
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Use the given proxy for the request
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Ignore proxy settings from the environment
    #[arg(long)]
    pub no_proxy: bool,

    /// Maximum time allowed for the connection, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub connect_timeout: u64,

    /// Maximum time allowed for the whole request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 300)]
    pub max_time: u64,

    /// Fail with a non-zero exit code on HTTP status 400 and above
    #[arg(short, long)]
    pub fail: bool,

    /// Make the output more verbose; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log level picked by the number of `-v` flags.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

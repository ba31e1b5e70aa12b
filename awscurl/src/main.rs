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

use std::process::ExitCode;

use awscurl::{default_context, run, Args, Config};
use clap::error::ErrorKind;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    tokio::select! {
        result = execute(args) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("awscurl: {}", err.report());
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("awscurl: interrupted");
            ExitCode::FAILURE
        }
    }
}

async fn execute(args: Args) -> awscurl_core::Result<()> {
    let ctx = default_context()?;
    let config = Config::from_args(args, &ctx)?;

    run(&config, &ctx, &mut tokio::io::stdout()).await?;
    Ok(())
}

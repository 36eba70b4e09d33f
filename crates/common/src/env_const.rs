// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use launch_env::{EnvError, Environment};

pub const LAUNCH_LOG: &str = "LAUNCH_LOG";

pub const LAUNCH_ENTRY_POINT: &str = "LAUNCH_ENTRY_POINT";
pub const LAUNCH_WASI: &str = "LAUNCH_WASI";

pub const SERVER_ADDRESS: &str = "SERVER_ADDRESS";
pub const LAUNCH_STATIC_DIR: &str = "LAUNCH_STATIC_DIR";
pub const LAUNCH_PAGE_TITLE: &str = "LAUNCH_PAGE_TITLE";

const DEFAULT_ENTRY_POINT: &str = "_start";
const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_STATIC_DIR: &str = "web/static";
const DEFAULT_PAGE_TITLE: &str = "DummyAI";

pub fn get_entry_point(env: &dyn Environment) -> String {
    env.get_or_else(LAUNCH_ENTRY_POINT, DEFAULT_ENTRY_POINT)
}

pub fn wasi_enabled(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(LAUNCH_WASI, true)
}

pub fn get_static_dir(env: &dyn Environment) -> String {
    env.get_or_else(LAUNCH_STATIC_DIR, DEFAULT_STATIC_DIR)
}

pub fn get_page_title(env: &dyn Environment) -> String {
    env.get_or_else(LAUNCH_PAGE_TITLE, DEFAULT_PAGE_TITLE)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl Display for ServerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// The address the server listens on, as `host:port` (IPv6 hosts in brackets).
///
/// An empty host (`:8080`) means all interfaces.
pub fn get_server_address(env: &dyn Environment) -> Result<ServerAddress, EnvError> {
    let value = env.get_or_else(SERVER_ADDRESS, DEFAULT_SERVER_ADDRESS);

    let invalid = |message: &str| EnvError::InvalidAddress {
        key: SERVER_ADDRESS,
        value: value.clone(),
        message: message.to_string(),
    };

    let (host, port) = match value.strip_prefix('[') {
        Some(rest) => rest
            .split_once("]:")
            .ok_or_else(|| invalid("missing port after bracketed host"))?,
        None => {
            let (host, port) = value
                .rsplit_once(':')
                .ok_or_else(|| invalid("missing port in address"))?;
            if host.contains(':') {
                return Err(invalid("too many colons in address"));
            }
            (host, port)
        }
    };

    let port = port
        .parse::<u16>()
        .map_err(|_| invalid("port must be a number between 0 and 65535"))?;

    let host = if host.is_empty() { "0.0.0.0" } else { host };

    Ok(ServerAddress {
        host: host.to_string(),
        port,
    })
}

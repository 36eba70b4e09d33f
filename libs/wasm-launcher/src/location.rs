// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{fmt::Display, path::PathBuf, str::FromStr};

use url::Url;

use crate::error::LocationError;

/// Where the bytes of a module come from.
///
/// Parsing never touches the file system or the network: a location that does not exist is a
/// retrieval failure, not a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLocation {
    Path(PathBuf),
    Url(Url),
}

impl FromStr for ModuleLocation {
    type Err = LocationError;

    fn from_str(location: &str) -> Result<Self, Self::Err> {
        if location.trim().is_empty() {
            return Err(LocationError::Empty);
        }

        let lowercase = location.to_ascii_lowercase();

        if lowercase.starts_with("http://") || lowercase.starts_with("https://") {
            let url = Url::parse(location)
                .map_err(|e| LocationError::InvalidUrl(location.to_string(), e))?;
            Ok(ModuleLocation::Url(url))
        } else if lowercase.starts_with("file://") {
            let url = Url::parse(location)
                .map_err(|e| LocationError::InvalidUrl(location.to_string(), e))?;
            let path = url
                .to_file_path()
                .map_err(|_| LocationError::InvalidFileUrl(location.to_string()))?;
            Ok(ModuleLocation::Path(path))
        } else {
            Ok(ModuleLocation::Path(PathBuf::from(location)))
        }
    }
}

impl From<PathBuf> for ModuleLocation {
    fn from(path: PathBuf) -> Self {
        ModuleLocation::Path(path)
    }
}

impl From<Url> for ModuleLocation {
    fn from(url: Url) -> Self {
        ModuleLocation::Url(url)
    }
}

impl Display for ModuleLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleLocation::Path(path) => write!(f, "{}", path.display()),
            ModuleLocation::Url(url) => write!(f, "{url}"),
        }
    }
}

// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{io::ErrorKind, path::Path};

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::{error::RetrievalError, location::ModuleLocation};

/// Resolves a [`ModuleLocation`] into the module's bytes.
#[async_trait]
pub trait ModuleFetcher: Send + Sync {
    async fn fetch(&self, location: &ModuleLocation) -> Result<Vec<u8>, RetrievalError>;
}

/// Reads paths from the local file system and URLs over HTTP(S).
#[derive(Default, Clone)]
pub struct DefaultFetcher {
    client: reqwest::Client,
}

impl DefaultFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_path(&self, path: &Path) -> Result<Vec<u8>, RetrievalError> {
        tokio::fs::read(path).await.map_err(|source| {
            let location = path.display().to_string();
            if source.kind() == ErrorKind::NotFound {
                RetrievalError::NotFound(location)
            } else {
                RetrievalError::Io { location, source }
            }
        })
    }

    async fn fetch_url(&self, url: &Url) -> Result<Vec<u8>, RetrievalError> {
        let response = self.client.get(url.clone()).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RetrievalError::NotFound(url.to_string())),
            status if !status.is_success() => Err(RetrievalError::Status {
                location: url.to_string(),
                status: status.as_u16(),
            }),
            _ => Ok(response.bytes().await?.to_vec()),
        }
    }
}

#[async_trait]
impl ModuleFetcher for DefaultFetcher {
    async fn fetch(&self, location: &ModuleLocation) -> Result<Vec<u8>, RetrievalError> {
        let bytes = match location {
            ModuleLocation::Path(path) => self.fetch_path(path).await,
            ModuleLocation::Url(url) => self.fetch_url(url).await,
        }?;

        debug!(len = bytes.len(), "Fetched module bytes");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Answer a single HTTP request with the given status line and body.
    async fn serve_once(status_line: &'static str, body: &'static [u8]) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }

            let head = format!(
                "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        Url::parse(&format!("http://{address}/app.wasm")).unwrap()
    }

    fn local_fetcher() -> DefaultFetcher {
        DefaultFetcher::new(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn reads_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\0asm\x01\0\0\0").unwrap();

        let location = ModuleLocation::Path(file.path().to_path_buf());
        let bytes = DefaultFetcher::default().fetch(&location).await.unwrap();

        assert_eq!(bytes, b"\0asm\x01\0\0\0");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let location = ModuleLocation::Path(dir.path().join("missing.wasm"));

        let error = DefaultFetcher::default().fetch(&location).await.unwrap_err();

        assert!(
            matches!(error, RetrievalError::NotFound(ref location) if location.ends_with("missing.wasm"))
        );
    }

    #[tokio::test]
    async fn directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let location = ModuleLocation::Path(dir.path().to_path_buf());

        let error = DefaultFetcher::default().fetch(&location).await.unwrap_err();

        assert!(matches!(error, RetrievalError::Io { .. }));
    }

    #[tokio::test]
    async fn downloads_urls() {
        let url = serve_once("200 OK", b"\0asm\x01\0\0\0").await;

        let bytes = local_fetcher()
            .fetch(&ModuleLocation::Url(url))
            .await
            .unwrap();

        assert_eq!(bytes, b"\0asm\x01\0\0\0");
    }

    #[tokio::test]
    async fn http_404_is_not_found() {
        let url = serve_once("404 Not Found", b"").await;

        let error = local_fetcher()
            .fetch(&ModuleLocation::Url(url.clone()))
            .await
            .unwrap_err();

        assert!(
            matches!(error, RetrievalError::NotFound(ref location) if *location == url.to_string())
        );
    }

    #[tokio::test]
    async fn other_failures_keep_their_status() {
        let url = serve_once("500 Internal Server Error", b"boom").await;

        let error = local_fetcher()
            .fetch(&ModuleLocation::Url(url))
            .await
            .unwrap_err();

        assert!(matches!(error, RetrievalError::Status { status: 500, .. }));
    }
}

//! HTTP dataset source
//!
//! Streams the response body instead of buffering it: full sanctions
//! exports run to hundreds of megabytes. The configured timeout bounds the
//! connection and the wait for response headers, never the body download.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;
use url::Url;

use super::lines::split_lines;
use super::{DatasetSource, LineStream};
use crate::error::SourceError;

pub struct HttpSource {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().connect_timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            timeout,
        })
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn lines(&self) -> Result<LineStream, SourceError> {
        info!(url = %self.url, "Fetching dataset");

        let request = self.client.get(self.url.clone()).send();
        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| SourceError::Timeout {
                url: self.url.to_string(),
                timeout: self.timeout,
            })??;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(split_lines(response.bytes_stream()))
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const TIMEOUT: Duration = Duration::from_millis(200);

    async fn listen() -> (TcpListener, Url) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = Url::parse(&format!("http://{}/entities.ftm.json", addr)).unwrap();
        (listener, url)
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let source = HttpSource::new(url, TIMEOUT).unwrap();
        let result = source.lines().await;
        assert!(matches!(result, Err(SourceError::Timeout { timeout, .. }) if timeout == TIMEOUT));

        server.abort();
    }

    #[tokio::test]
    async fn test_slow_body_outlives_timeout() {
        let (listener, url) = listen().await;
        let first = "{\"id\":\"E1\"}\n";
        let second = "{\"id\":\"E2\"}\n";
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                first.len() + second.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(first.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(TIMEOUT * 3).await;
            socket.write_all(second.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let source = HttpSource::new(url, TIMEOUT).unwrap();
        let lines: Vec<String> = source
            .lines()
            .await
            .unwrap()
            .map(|line| line.unwrap())
            .collect()
            .await;
        assert_eq!(lines, vec!["{\"id\":\"E1\"}", "{\"id\":\"E2\"}"]);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_reported() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            socket
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .await
                .unwrap();
        });

        let source = HttpSource::new(url, TIMEOUT).unwrap();
        let result = source.lines().await;
        assert!(matches!(result, Err(SourceError::Status { status: 404, .. })));

        server.await.unwrap();
    }
}

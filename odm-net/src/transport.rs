// odm-net/src/transport.rs
//! Single blocking fetches of a URL. No retries anywhere in here: a failed
//! call fails the request that needed it.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use odm_common::config::TransportStrategy;
use odm_common::error::{OdmError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::{debug, warn};
use url::Url;

const USER_AGENT_STRING: &str = "odm dependency materializer (Rust)";
const MAX_REDIRECTS: usize = 10;

/// Fetches the raw bytes behind a URL.
pub trait Transport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Builds the transport selected in the configuration.
pub fn transport_for(strategy: TransportStrategy) -> Result<Box<dyn Transport>> {
    debug!("Using {} transport", strategy);
    match strategy {
        TransportStrategy::Http => Ok(Box::new(HttpClientTransport::new()?)),
        TransportStrategy::Basic => Ok(Box::new(BasicTransport)),
    }
}

/// HTTP client transport.
///
/// Certificate verification is disabled so mirrors with self-signed or
/// expired certificates keep working. This is a weak default: content is
/// only as trustworthy as the network path to the upstream tree.
///
/// The body of any completed exchange is returned whatever its status code.
pub struct HttpClientTransport {
    client: Client,
}

impl HttpClientTransport {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(Option::<Duration>::None)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| OdmError::transport("<client>", format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpClientTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        validate_http_url(url)?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().map_err(|e| {
            debug!("HTTP request failed for {url}: {e}");
            OdmError::transport(url, format!("HTTP request failed: {e}"))
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("Received HTTP status: {} for {}", status, url);
        } else {
            warn!("Received HTTP status: {} for {} (body used as-is)", status, url);
        }

        let body = response
            .bytes()
            .map_err(|e| OdmError::transport(url, format!("Failed to read response body: {e}")))?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

/// Basic stream read.
///
/// `http(s)` URLs go through a default blocking GET, `file://` URLs and
/// plain filesystem paths are read from disk.
pub struct BasicTransport;

impl Transport for BasicTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if url.starts_with("http://") || url.starts_with("https://") {
            debug!("Opening stream {}", url);
            let response = reqwest::blocking::get(url)
                .map_err(|e| OdmError::transport(url, format!("Failed to open stream: {e}")))?;
            let body = response
                .bytes()
                .map_err(|e| OdmError::transport(url, format!("Failed to read stream: {e}")))?;
            return Ok(body.to_vec());
        }

        let path = local_path_for(url)?;
        debug!("Reading {}", path.display());
        fs::read(&path).map_err(|e| OdmError::transport(url, format!("Failed to open stream: {e}")))
    }
}

fn local_path_for(url: &str) -> Result<PathBuf> {
    if url.starts_with("file://") {
        return Url::parse(url)
            .ok()
            .and_then(|u| u.to_file_path().ok())
            .ok_or_else(|| OdmError::transport(url, "not a valid file URL"));
    }
    Ok(PathBuf::from(url))
}

fn validate_http_url(url: &str) -> Result<()> {
    let parsed = Url::parse(url).map_err(|e| OdmError::transport(url, format!("invalid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(OdmError::transport(
            url,
            format!("unsupported scheme '{other}' for the HTTP client transport"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Answers exactly one request on a loopback port with `status` and
    /// `body`, returning the URL to hit.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });
        (format!("http://{addr}/library/Zend/View.php"), handle)
    }

    #[test]
    fn http_client_returns_body_on_success() {
        let (url, server) = serve_once("200 OK", "<?php class Zend_View {}");
        let body = HttpClientTransport::new().unwrap().fetch(&url).unwrap();
        server.join().unwrap();
        assert_eq!(body, b"<?php class Zend_View {}");
    }

    #[test]
    fn http_client_returns_body_whatever_the_status() {
        let transport = HttpClientTransport::new().unwrap();

        let (url, server) = serve_once("404 Not Found", "404: Not Found");
        let body = transport.fetch(&url).unwrap();
        server.join().unwrap();
        assert_eq!(body, b"404: Not Found");

        let (url, server) = serve_once("500 Internal Server Error", "oops");
        let body = transport.fetch(&url).unwrap();
        server.join().unwrap();
        assert_eq!(body, b"oops");
    }

    #[test]
    fn basic_transport_returns_body_whatever_the_status() {
        let (url, server) = serve_once("404 Not Found", "404: Not Found");
        let body = BasicTransport.fetch(&url).unwrap();
        server.join().unwrap();
        assert_eq!(body, b"404: Not Found");

        let (url, server) = serve_once("500 Internal Server Error", "oops");
        let body = BasicTransport.fetch(&url).unwrap();
        server.join().unwrap();
        assert_eq!(body, b"oops");
    }

    #[test]
    fn refused_connections_are_transport_errors() {
        let url = "http://127.0.0.1:1/library/Zend.php";
        let err = HttpClientTransport::new().unwrap().fetch(url).unwrap_err();
        assert!(matches!(err, OdmError::Transport { .. }));
        let err = BasicTransport.fetch(url).unwrap_err();
        assert!(matches!(err, OdmError::Transport { .. }));
    }

    #[test]
    fn basic_transport_reads_local_paths_and_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("View.php");
        fs::write(&file, b"<?php class Zend_View {}").unwrap();

        let by_path = BasicTransport.fetch(file.to_str().unwrap()).unwrap();
        assert_eq!(by_path, b"<?php class Zend_View {}");

        let file_url = Url::from_file_path(&file).unwrap();
        let by_url = BasicTransport.fetch(file_url.as_str()).unwrap();
        assert_eq!(by_url, by_path);
    }

    #[test]
    fn basic_transport_reports_unopenable_streams() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.php");
        let err = BasicTransport.fetch(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, OdmError::Transport { .. }));
    }

    #[test]
    fn http_client_rejects_non_http_urls_without_network() {
        let transport = HttpClientTransport::new().unwrap();
        let err = transport.fetch("/srv/zf1/library/Zend.php").unwrap_err();
        assert!(matches!(err, OdmError::Transport { .. }));
        let err = transport.fetch("ftp://example.com/Zend.php").unwrap_err();
        assert!(matches!(err, OdmError::Transport { .. }));
    }
}

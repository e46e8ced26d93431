use axum::extract::{ConnectInfo, Request};
use axum::http::header::{HOST, REFERER, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use tracing::info;

// What gets logged about a request, captured before the request is consumed
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub method: String,
    /// Percent-decoded, the key for routing and rate limiting.
    pub path: String,
    pub source: Option<SocketAddr>,
    pub proto: String,
    pub host: String,
    pub referer: String,
    pub user_agent: String,
}

fn header(headers: &HeaderMap, name: HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

impl RequestMeta {
    pub fn from_request(req: &Request) -> Self {
        let headers = req.headers();
        let host = req
            .uri()
            .authority()
            .map(|a| a.to_string())
            .unwrap_or_else(|| header(headers, HOST));

        Self {
            method: req.method().to_string(),
            path: percent_decode_str(req.uri().path())
                .decode_utf8_lossy()
                .into_owned(),
            source: req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
            proto: format!("{:?}", req.version()),
            host,
            referer: header(headers, REFERER),
            user_agent: header(headers, USER_AGENT),
        }
    }

    // One record per request, the format every dispatched path shares
    pub fn log(&self, status: StatusCode, err: Option<&dyn std::fmt::Display>) {
        let source = self.source.map(|a| a.to_string()).unwrap_or_default();
        let err = err.map(|e| e.to_string()).unwrap_or_default();
        info!(
            method = %self.method,
            url = %self.path,
            status = status.as_u16(),
            source = %source,
            proto = %self.proto,
            host = %self.host,
            referer = %self.referer,
            useragent = %self.user_agent,
            err = %err,
            "request"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn captures_headers_and_peer() {
        let mut req = axum::http::Request::builder()
            .uri("/deploy?$branch=main")
            .header(HOST, "hooks.example.org")
            .header(REFERER, "https://ci.example.org/")
            .header(USER_AGENT, "curl/8.5.0")
            .body(Body::empty())
            .unwrap();
        let peer: SocketAddr = "192.0.2.7:51234".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));

        let meta = RequestMeta::from_request(&req);
        assert_eq!(meta.method, "GET");
        assert_eq!(meta.path, "/deploy");
        assert_eq!(meta.source, Some(peer));
        assert_eq!(meta.proto, "HTTP/1.1");
        assert_eq!(meta.host, "hooks.example.org");
        assert_eq!(meta.referer, "https://ci.example.org/");
        assert_eq!(meta.user_agent, "curl/8.5.0");
    }

    #[test]
    fn path_is_percent_decoded() {
        let req = axum::http::Request::builder()
            .uri("/hello%20world/%61?$x=%20")
            .body(Body::empty())
            .unwrap();
        assert_eq!(RequestMeta::from_request(&req).path, "/hello world/a");
    }

    #[test]
    fn missing_peer_and_headers() {
        let req = axum::http::Request::builder().uri("/x").body(Body::empty()).unwrap();
        let meta = RequestMeta::from_request(&req);
        assert_eq!(meta.source, None);
        assert_eq!(meta.host, "");
        assert_eq!(meta.user_agent, "");
    }
}

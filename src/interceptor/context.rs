use std::net::SocketAddr;

use axum::{
    extract::{connect_info::MockConnectInfo, ConnectInfo},
    http::request::Parts,
};

/// Host reported when neither a forwarding header nor a peer address is available.
pub const UNKNOWN_HOST: &str = "unknown";

/// Request metadata handed to the interceptor at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub client_host: String,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, client_host: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            client_host: client_host.into(),
        }
    }

    /// Builds the context from an inbound HTTP request.
    ///
    /// The path excludes the query string. The client host comes from the first
    /// entry of `client_ip_header` when it is configured and present, then from
    /// the peer address (resolved like axum's `ConnectInfo` extractor, so
    /// `MockConnectInfo` applies too), and finally falls back to [`UNKNOWN_HOST`].
    pub fn from_parts(parts: &Parts, client_ip_header: Option<&str>) -> Self {
        let forwarded = client_ip_header
            .and_then(|name| parts.headers.get(name))
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let client_host = forwarded
            .or_else(|| peer_addr(parts).map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| UNKNOWN_HOST.to_string());

        Self {
            path: parts.uri.path().to_string(),
            client_host,
        }
    }
}

fn peer_addr(parts: &Parts) -> Option<SocketAddr> {
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
        .or_else(|| {
            parts
                .extensions
                .get::<MockConnectInfo<SocketAddr>>()
                .map(|MockConnectInfo(addr)| *addr)
        })
}

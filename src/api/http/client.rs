use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{Extensions, HeaderMap, header, request::Parts},
};

use crate::app::state::AppState;

pub const UNKNOWN_IP: &str = "unknown";

/// Provenance recorded with public submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: String,
    pub user_agent: Option<String>,
}

impl FromRequestParts<AppState> for ClientInfo {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            ip_address: client_ip(&parts.headers, &parts.extensions, state.trust_proxy_headers),
            user_agent: user_agent(&parts.headers),
        })
    }
}

/// Best guess at the caller's address. Proxy headers are only honoured when
/// the deployment sits behind a proxy that sets them.
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }

        if let Some(ip) = header_str(headers, "x-real-ip")
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            return ip.to_string();
        }
    }

    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    header_str(headers, header::USER_AGENT.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn prefers_first_forwarded_address() {
        let map = headers(&[
            ("x-forwarded-for", "203.0.113.9, 10.0.0.1"),
            ("x-real-ip", "10.0.0.2"),
        ]);
        assert_eq!(client_ip(&map, &Extensions::new(), true), "203.0.113.9");
    }

    #[test]
    fn falls_back_to_real_ip_then_peer() {
        let map = headers(&[("x-real-ip", "10.0.0.2")]);
        assert_eq!(client_ip(&map, &Extensions::new(), true), "10.0.0.2");

        let mut extensions = Extensions::new();
        extensions.insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        assert_eq!(client_ip(&HeaderMap::new(), &extensions, true), "192.0.2.1");
        assert_eq!(client_ip(&HeaderMap::new(), &Extensions::new(), true), UNKNOWN_IP);
    }

    #[test]
    fn ignores_proxy_headers_when_untrusted() {
        let map = headers(&[("x-forwarded-for", "203.0.113.9")]);
        let mut extensions = Extensions::new();
        extensions.insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        assert_eq!(client_ip(&map, &extensions, false), "192.0.2.1");
    }

    #[test]
    fn reads_user_agent() {
        let map = headers(&[("user-agent", "Mozilla/5.0")]);
        assert_eq!(user_agent(&map).as_deref(), Some("Mozilla/5.0"));
        assert_eq!(user_agent(&HeaderMap::new()), None);
    }
}

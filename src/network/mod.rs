use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::runtime::Runtime;

use crate::error::{PanelError, PanelResult};

/// Shown when the local lookup fails or the echo service omits `ip`.
pub const UNKNOWN: &str = "(unknown)";
/// Shown when the HTTP call or its JSON body fails.
pub const FAILED: &str = "(failed)";
/// Shown when the build has no HTTP client.
pub const DEPENDENCY_MISSING: &str = "(dependency missing)";

/// Addresses shown in the network section. Both fields are always populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub local_address: String,
    pub public_address: String,
}

impl Default for NetworkInfo {
    fn default() -> Self {
        Self {
            local_address: UNKNOWN.to_string(),
            public_address: UNKNOWN.to_string(),
        }
    }
}

/// Source of the externally visible address.
pub trait IpEcho {
    /// `Ok(None)` means the service answered without an address.
    fn public_ip(&self) -> PanelResult<Option<String>>;
}

/// Asks a "what is my IP" JSON endpoint, one GET per call.
#[cfg(feature = "public-ip")]
pub struct HttpIpEcho {
    runtime: Arc<Runtime>,
    url: String,
    timeout: Duration,
}

#[cfg(feature = "public-ip")]
impl HttpIpEcho {
    pub fn new(runtime: Arc<Runtime>, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            runtime,
            url: url.into(),
            timeout,
        }
    }
}

#[cfg(feature = "public-ip")]
impl IpEcho for HttpIpEcho {
    fn public_ip(&self) -> PanelResult<Option<String>> {
        self.runtime.block_on(async {
            // Built per call so the connection never outlives the refresh.
            let client = reqwest::Client::builder().timeout(self.timeout).build()?;
            let body = client
                .get(&self.url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            parse_echo_body(&body)
        })
    }
}

#[cfg(feature = "public-ip")]
#[derive(serde::Deserialize)]
struct EchoBody {
    ip: Option<String>,
}

#[cfg(feature = "public-ip")]
fn parse_echo_body(body: &str) -> PanelResult<Option<String>> {
    let parsed: EchoBody = serde_json::from_str(body)?;
    Ok(parsed.ip.filter(|ip| !ip.trim().is_empty()))
}

/// Stand-in used when the crate is built without `public-ip`.
#[cfg_attr(feature = "public-ip", allow(dead_code))]
pub struct MissingIpEcho;

impl IpEcho for MissingIpEcho {
    fn public_ip(&self) -> PanelResult<Option<String>> {
        Err(PanelError::DependencyMissing("reqwest"))
    }
}

/// The echo implementation this build supports.
#[cfg(feature = "public-ip")]
pub fn default_echo(runtime: Arc<Runtime>, url: &str, timeout: Duration) -> Box<dyn IpEcho> {
    Box::new(HttpIpEcho::new(runtime, url, timeout))
}

#[cfg(not(feature = "public-ip"))]
pub fn default_echo(_runtime: Arc<Runtime>, _url: &str, _timeout: Duration) -> Box<dyn IpEcho> {
    Box::new(MissingIpEcho)
}

pub struct NetworkFetcher {
    runtime: Arc<Runtime>,
    resolve_timeout: Duration,
    echo: Box<dyn IpEcho>,
}

impl NetworkFetcher {
    pub fn new(runtime: Arc<Runtime>, resolve_timeout: Duration, echo: Box<dyn IpEcho>) -> Self {
        Self {
            runtime,
            resolve_timeout,
            echo,
        }
    }

    /// Recompute both addresses. Failures become placeholder text.
    pub fn refresh(&self) -> NetworkInfo {
        let local_address = local_display(self.local_address());

        let public_address = match self.echo.public_ip() {
            Ok(Some(ip)) => ip,
            Ok(None) => UNKNOWN.to_string(),
            Err(PanelError::DependencyMissing(name)) => {
                warn!("Public address unavailable, {} not compiled in", name);
                DEPENDENCY_MISSING.to_string()
            }
            Err(e) => {
                warn!("Public address lookup failed: {}", e);
                FAILED.to_string()
            }
        };

        debug!("Network info: local={} public={}", local_address, public_address);
        NetworkInfo {
            local_address,
            public_address,
        }
    }

    fn local_address(&self) -> PanelResult<IpAddr> {
        let host = hostname::get()?
            .into_string()
            .map_err(|_| PanelError::Resolve("hostname is not valid UTF-8".into()))?;
        self.resolve(&host)
    }

    /// Resolve `host`, preferring an IPv4 address.
    fn resolve(&self, host: &str) -> PanelResult<IpAddr> {
        let addrs: Vec<SocketAddr> = self
            .runtime
            .block_on(async {
                tokio::time::timeout(self.resolve_timeout, tokio::net::lookup_host((host, 0))).await
            })
            .map_err(|_| PanelError::Timeout {
                what: "name resolution",
                after: self.resolve_timeout,
            })?
            .map_err(|e| PanelError::Resolve(format!("{host}: {e}")))?
            .collect();

        pick_address(&addrs).ok_or_else(|| PanelError::Resolve(format!("{host}: no addresses")))
    }
}

fn local_display(lookup: PanelResult<IpAddr>) -> String {
    match lookup {
        Ok(ip) => ip.to_string(),
        Err(e) => {
            warn!("Local address lookup failed: {}", e);
            UNKNOWN.to_string()
        }
    }
}

fn pick_address(addrs: &[SocketAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .map(|a| a.ip())
}

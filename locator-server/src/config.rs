//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

use crate::lrs::LrsConfig;

/// Lookup service used when `LRS_BASE_URL` is not set.
const DEFAULT_BASE_URL: &str =
    "https://maps.udot.utah.gov/randh/rest/services/Test/MM_Stationing_Test/MapServer";

/// Address used when `LOCATOR_ADDR` is not set.
const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub lrs: LrsConfig,
    /// Serve canned responses from this directory instead of calling the service.
    pub mock_dir: Option<PathBuf>,
    pub addr: SocketAddr,
}

impl ServerConfig {
    /// Read `LRS_BASE_URL`, `LRS_OUTPUT_WKID`, `LRS_MOCK_DIR` and `LOCATOR_ADDR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = var("LRS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut lrs = LrsConfig::new(base_url);

        if let Some(wkid) = var("LRS_OUTPUT_WKID") {
            match wkid.parse() {
                Ok(wkid) => lrs = lrs.with_output_wkid(wkid),
                Err(_) => warn!(%wkid, "ignoring invalid LRS_OUTPUT_WKID"),
            }
        }

        let addr = match var("LOCATOR_ADDR") {
            Some(addr) => addr.parse().unwrap_or_else(|_| {
                warn!(%addr, "ignoring invalid LOCATOR_ADDR");
                SocketAddr::from(DEFAULT_ADDR)
            }),
            None => SocketAddr::from(DEFAULT_ADDR),
        };

        Self {
            lrs,
            mock_dir: var("LRS_MOCK_DIR").map(PathBuf::from),
            addr,
        }
    }
}

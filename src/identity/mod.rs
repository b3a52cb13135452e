//! Best-effort anonymous visitor identity.
//!
//! [`IdentityProvider`] races a [`DeviceProbe`] against a timer. Whichever
//! wins, the caller gets a non-empty id; the first answer is cached for the
//! lifetime of the provider so later calls never probe again.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub mod probe;

pub use probe::HostProbe;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Source of a device-derived visitor id. Allowed to be slow or fail.
#[async_trait]
pub trait DeviceProbe: Send + Sync {
    async fn visitor_id(&self) -> Result<String>;
}

#[derive(Debug, Clone)]
struct Resolved {
    id: String,
    fallback: bool,
}

pub struct IdentityProvider {
    probe: Arc<dyn DeviceProbe>,
    timeout: Duration,
    cached: RwLock<Option<Resolved>>,
}

impl IdentityProvider {
    pub fn new(probe: Arc<dyn DeviceProbe>, timeout: Duration) -> Self {
        Self {
            probe,
            timeout,
            cached: RwLock::new(None),
        }
    }

    pub fn host(timeout: Duration) -> Self {
        Self::new(Arc::new(HostProbe::default()), timeout)
    }

    pub async fn get_identity(&self) -> String {
        self.resolved().await.id
    }

    /// Whether this session's id is a random fallback rather than one the
    /// device probe produced. Resolves the identity if needed.
    pub async fn is_fallback(&self) -> bool {
        self.resolved().await.fallback
    }

    /// Value already resolved in this session, if any.
    pub async fn cached(&self) -> Option<String> {
        self.cached.read().await.as_ref().map(|r| r.id.clone())
    }

    async fn resolved(&self) -> Resolved {
        {
            let cached = self.cached.read().await;
            if let Some(resolved) = cached.as_ref() {
                return resolved.clone();
            }
        }

        // concurrent first callers queue here and see the winner's value
        let mut cached = self.cached.write().await;
        if let Some(resolved) = cached.as_ref() {
            return resolved.clone();
        }

        let resolved = self.resolve().await;
        *cached = Some(resolved.clone());
        resolved
    }

    async fn resolve(&self) -> Resolved {
        let timer = tokio::time::sleep(self.timeout);

        tokio::select! {
            biased;
            res = self.probe.visitor_id() => match res {
                Ok(id) if !id.trim().is_empty() => {
                    debug!("visitor id from device probe");
                    return Resolved { id, fallback: false };
                }
                Ok(_) => warn!("device probe returned an empty id, using fallback"),
                Err(e) => warn!("device probe failed: {e}"),
            },
            _ = timer => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "device probe timed out, using fallback");
            }
        }

        Resolved {
            id: fallback_identity(),
            fallback: true,
        }
    }
}

/// Random base-36 value followed by the millisecond clock in base 36.
pub fn fallback_identity() -> String {
    let random: u64 = rand::thread_rng().gen_range(36u64.pow(8)..u64::MAX);
    let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
    format!("{}{}", to_base36(random), to_base36(now))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

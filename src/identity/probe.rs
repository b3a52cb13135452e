use std::{env, path::PathBuf};

use anyhow::{bail, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::DeviceProbe;

const MACHINE_ID_PATHS: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];
const HOSTNAME_PATH: &str = "/etc/hostname";

/// Fingerprints the machine the client runs on.
///
/// The id is the first 32 hex chars of a SHA-256 over the host traits it can
/// read. Generic traits (OS, arch, CPU count, UTC offset) are mixed in but
/// never enough on their own; without at least one host-specific trait the
/// probe fails and the provider falls back to a random id.
#[derive(Debug, Clone)]
pub struct HostProbe {
    machine_id_paths: Vec<PathBuf>,
    hostname_path: PathBuf,
}

impl Default for HostProbe {
    fn default() -> Self {
        Self {
            machine_id_paths: MACHINE_ID_PATHS.iter().map(PathBuf::from).collect(),
            hostname_path: PathBuf::from(HOSTNAME_PATH),
        }
    }
}

impl HostProbe {
    pub fn with_paths(machine_id_paths: Vec<PathBuf>, hostname_path: PathBuf) -> Self {
        Self {
            machine_id_paths,
            hostname_path,
        }
    }

    async fn machine_id(&self) -> Option<String> {
        for path in &self.machine_id_paths {
            if let Ok(raw) = tokio::fs::read_to_string(path).await {
                let id = raw.trim();
                if !id.is_empty() {
                    return Some(id.to_string());
                }
            }
        }
        None
    }

    async fn hostname(&self) -> Option<String> {
        if let Some(name) = non_empty_var(&["HOSTNAME", "COMPUTERNAME"]) {
            return Some(name);
        }
        tokio::fs::read_to_string(&self.hostname_path)
            .await
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    async fn traits(&self) -> Vec<(&'static str, String)> {
        let mut traits = Vec::new();

        if let Some(id) = self.machine_id().await {
            traits.push(("machine", id));
        }
        if let Some(host) = self.hostname().await {
            traits.push(("host", host));
        }
        if let Some(user) = non_empty_var(&["USER", "USERNAME", "LOGNAME"]) {
            traits.push(("user", user));
        }

        traits
    }
}

fn non_empty_var(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn digest(traits: &[(&str, String)]) -> String {
    let mut hasher = Sha256::new();
    for (name, value) in traits {
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b"\n");
    }

    hasher.update(env::consts::OS.as_bytes());
    hasher.update(env::consts::ARCH.as_bytes());
    hasher.update(num_cpus::get().to_string().as_bytes());
    let offset = chrono::Local::now().offset().local_minus_utc();
    hasher.update(offset.to_string().as_bytes());

    let mut id = hex::encode(hasher.finalize());
    id.truncate(32);
    id
}

#[async_trait]
impl DeviceProbe for HostProbe {
    async fn visitor_id(&self) -> Result<String> {
        let traits = self.traits().await;
        if traits.is_empty() {
            bail!("no host-specific characteristics readable");
        }
        debug!(traits = traits.len(), "host probe collected traits");
        Ok(digest(&traits))
    }
}

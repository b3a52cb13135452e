//! Shareable "view as this visitor" links.

use std::{
    io::Write,
    sync::Mutex,
};

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Url;
use tracing::{info, warn};

use crate::identity::IdentityProvider;

pub const VISITOR_PARAM: &str = "asVisitor";

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}

/// Copies through the terminal with an OSC 52 escape sequence.
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        write!(out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        out.flush()?;
        Ok(())
    }
}

/// Keeps the last copied text, for callers that display it themselves.
#[derive(Default)]
pub struct MemoryClipboard {
    last: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.last.lock().ok().and_then(|l| l.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut last = self
            .last
            .lock()
            .map_err(|_| anyhow!("clipboard poisoned"))?;
        *last = Some(text.to_string());
        Ok(())
    }
}

/// `current_url` with `asVisitor` set to `visitor`; other parameters kept.
pub fn with_visitor(current_url: &str, visitor: &str) -> Result<String> {
    let mut url =
        Url::parse(current_url).with_context(|| format!("Invalid page url: {current_url}"))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != VISITOR_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(VISITOR_PARAM, visitor);

    Ok(url.to_string())
}

/// The visitor token a shared link carries, if any.
pub fn shared_visitor(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let token = url
        .query_pairs()
        .find(|(k, _)| k == VISITOR_PARAM)
        .map(|(_, v)| v.trim().to_string())?;
    (!token.is_empty()).then_some(token)
}

pub async fn build_share_url(
    identity: &IdentityProvider,
    clipboard: &dyn Clipboard,
    current_url: &str,
) -> Result<String> {
    let visitor = identity.get_identity().await;
    let link = with_visitor(current_url, &visitor)?;

    match clipboard.copy(&link) {
        Ok(()) => info!("share link copied"),
        Err(e) => warn!("could not copy share link: {e}"),
    }
    Ok(link)
}

//! One-shot status messages carried across a redirect in a signed cookie.
//!
//! A handler that finishes a state-changing request queues messages in a
//! [`Flash`] and attaches it to the redirect. The next rendered page reads
//! the cookie, shows the messages, and clears the cookie.
//!
//! Cookie value: `hex(json) "." hex(HMAC-SHA256(secret, json))`.

use axum::http::{header, HeaderMap};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const FLASH_COOKIE: &str = "clinic_flash";

const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

/// Flash errors.
#[derive(Error, Debug)]
pub enum FlashError {
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

/// Message category, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Error,
    Success,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Error => "error",
            Category::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub category: Category,
    pub text: String,
}

/// Ordered queue of status messages for the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flash {
    messages: Vec<FlashMessage>,
}

impl Flash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: Category, text: impl Into<String>) {
        self.messages.push(FlashMessage {
            category,
            text: text.into(),
        });
    }

    pub fn error(mut self, text: impl Into<String>) -> Self {
        self.push(Category::Error, text);
        self
    }

    pub fn success(mut self, text: impl Into<String>) -> Self {
        self.push(Category::Success, text);
        self
    }

    /// One error message per entry.
    pub fn errors<I>(messages: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        messages
            .into_iter()
            .fold(Self::new(), |flash, text| flash.error(text))
    }

    pub fn messages(&self) -> &[FlashMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Signs and verifies the flash cookie.
#[derive(Clone)]
pub struct FlashSigner {
    mac: HmacSha256,
}

impl FlashSigner {
    pub fn new(secret: &str) -> Result<Self, FlashError> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| FlashError::InvalidKey(e.to_string()))?;
        Ok(Self { mac })
    }

    fn signature(&self, payload: &[u8]) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac
    }

    /// Encode and sign a flash for the cookie value.
    pub fn encode(&self, flash: &Flash) -> Result<String, serde_json::Error> {
        let payload = serde_json::to_vec(flash)?;
        let tag = self.signature(&payload).finalize().into_bytes();
        Ok(format!("{}.{}", hex::encode(&payload), hex::encode(tag)))
    }

    /// Verify and decode a cookie value. Anything malformed or unsigned
    /// yields `None`.
    pub fn decode(&self, value: &str) -> Option<Flash> {
        let (payload_hex, tag_hex) = value.split_once('.')?;
        let payload = hex::decode(payload_hex).ok()?;
        let tag = hex::decode(tag_hex).ok()?;

        self.signature(&payload).verify_slice(&tag).ok()?;
        serde_json::from_slice(&payload).ok()
    }

    /// `Set-Cookie` value carrying `flash` to the next request.
    pub fn set_cookie(&self, flash: &Flash) -> Result<String, serde_json::Error> {
        Ok(format!(
            "{FLASH_COOKIE}={}; {COOKIE_ATTRIBUTES}",
            self.encode(flash)?
        ))
    }

    /// Pending messages from the request cookies, plus whether a flash
    /// cookie was present and needs clearing.
    pub fn take(&self, headers: &HeaderMap) -> (Flash, bool) {
        match cookie_value(headers, FLASH_COOKIE) {
            Some(value) => (self.decode(value).unwrap_or_default(), true),
            None => (Flash::default(), false),
        }
    }
}

/// `Set-Cookie` value that expires the flash cookie.
pub fn clear_cookie() -> String {
    format!("{FLASH_COOKIE}=; Max-Age=0; {COOKIE_ATTRIBUTES}")
}

fn cookie_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

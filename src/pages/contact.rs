use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::info;

use crate::{
    api::{ApiError, PollApi},
    model::{ContactAck, ContactRequest},
};

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern"));

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Please enter a valid email so we can reply.")]
    InvalidEmail,

    #[error("Please include a short message.")]
    EmptyMessage,

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub fn validate(
    name: Option<&str>,
    email: &str,
    message: &str,
) -> Result<ContactRequest, ContactError> {
    let email = email.trim();
    if email.is_empty() || !EMAIL.is_match(email) {
        return Err(ContactError::InvalidEmail);
    }
    if message.trim().is_empty() {
        return Err(ContactError::EmptyMessage);
    }

    Ok(ContactRequest {
        name: name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        email: email.to_string(),
        message: message.trim().to_string(),
    })
}

pub async fn submit_contact(
    api: &dyn PollApi,
    name: Option<&str>,
    email: &str,
    message: &str,
) -> Result<ContactAck, ContactError> {
    let req = validate(name, email, message)?;
    let ack = api.send_contact(&req).await?;
    info!("contact message sent");
    Ok(ack)
}

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tower_sessions::Session;

const FLASH_KEY: &str = "flash";

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: String,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: "danger".to_string(),
            message: message.into(),
        }
    }
}

/// Notices queued by earlier requests.
///
/// Extraction only reads them; they stay in the session until [`Flashes::clear`]
/// is called, so a page that fails to render shows them on the next try.
pub struct Flashes {
    session: Option<Session>,
    messages: Vec<Flash>,
}

impl Flashes {
    pub fn messages(&self) -> &[Flash] {
        &self.messages
    }

    /// Drop the notices from the session once they have been shown.
    pub async fn clear(self) -> Result<(), tower_sessions::session::Error> {
        match self.session {
            Some(session) if !self.messages.is_empty() => {
                session.remove::<Vec<Flash>>(FLASH_KEY).await?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl<S> FromRequestParts<S> for Flashes
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(session) = Session::from_request_parts(parts, state).await else {
            return Ok(Flashes {
                session: None,
                messages: Vec::new(),
            });
        };

        let messages: Vec<Flash> = session
            .get(FLASH_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();

        Ok(Flashes {
            session: Some(session),
            messages,
        })
    }
}

pub async fn push_flash(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    let mut queued: Vec<Flash> = session.get(FLASH_KEY).await?.unwrap_or_default();
    queued.push(flash);
    session.insert(FLASH_KEY, queued).await
}

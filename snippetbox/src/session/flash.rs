//! One-shot flash message.
//!
//! A handler stores a message before redirecting (post/redirect/get) and the
//! next page that renders pops it, so it is shown exactly once.
//!
//! ```rust,ignore
//! Flash::put(&session, "Snippet successfully created!").await?;
//! Ok(Redirect::to(&format!("/snippet/view/{id}")))
//! ```

use tower_sessions::Session;

use crate::error::Error;

const FLASH_SESSION_KEY: &str = "flash";

pub struct Flash;

impl Flash {
    /// Store `message`, replacing any unread one.
    pub async fn put(session: &Session, message: impl Into<String>) -> Result<(), Error> {
        session
            .insert(FLASH_SESSION_KEY, message.into())
            .await
            .map_err(|e| Error::Session(format!("Failed to write flash message: {e}")))
    }

    /// Read and remove the message; empty when there is none.
    pub async fn pop(session: &Session) -> Result<String, Error> {
        Ok(session
            .remove::<String>(FLASH_SESSION_KEY)
            .await
            .map_err(|e| Error::Session(format!("Failed to read flash message: {e}")))?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::session::MemorySessionStore;

    #[tokio::test]
    async fn test_flash_is_consumed_on_read() {
        let session = Session::new(None, Arc::new(MemorySessionStore::default()), None);

        Flash::put(&session, "Your signup was successful. Please log in.")
            .await
            .unwrap();

        assert_eq!(
            Flash::pop(&session).await.unwrap(),
            "Your signup was successful. Please log in."
        );
        assert_eq!(Flash::pop(&session).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_put_replaces_unread_message() {
        let session = Session::new(None, Arc::new(MemorySessionStore::default()), None);

        Flash::put(&session, "first").await.unwrap();
        Flash::put(&session, "second").await.unwrap();

        assert_eq!(Flash::pop(&session).await.unwrap(), "second");
    }
}

//! Session-stored admin state.

use duka_core::ProductId;
use tower_sessions::Session;

/// Session keys for admin data.
pub mod keys {
    /// Key for the id of the product open in the edit form.
    pub const EDITING_PRODUCT_ID: &str = "editing_product_id";
}

/// Read the edit form target, treating unreadable values as no target.
pub async fn editing_target(session: &Session) -> Option<ProductId> {
    match session.get::<ProductId>(keys::EDITING_PRODUCT_ID).await {
        Ok(target) => target,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read edit target from session");
            None
        }
    }
}

/// Store or clear the edit form target.
///
/// # Errors
///
/// Returns the session error if the backing store fails.
pub async fn set_editing_target(
    session: &Session,
    target: Option<&ProductId>,
) -> Result<(), tower_sessions::session::Error> {
    match target {
        Some(id) => session.insert(keys::EDITING_PRODUCT_ID, id).await,
        None => session
            .remove::<ProductId>(keys::EDITING_PRODUCT_ID)
            .await
            .map(|_| ()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_editing_target_round_trip() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert_eq!(editing_target(&session).await, None);

        let id = ProductId::new("42");
        set_editing_target(&session, Some(&id)).await.unwrap();
        assert_eq!(editing_target(&session).await, Some(id));

        set_editing_target(&session, None).await.unwrap();
        assert_eq!(editing_target(&session).await, None);
    }
}

//! Favorites and comments against the mock API.

mod common;

use common::{MockBackend, ORPHAN_FAVORITE, PREMIUM_TOKEN};
use pegasus_client::pages::{ContentPopup, FavoriteButton, ToggleOutcome};
use pegasus_client::{ClientError, ContentId, ContentKind, FavoriteId, SessionEvent};

#[tokio::test]
async fn operations_without_session_send_nothing() {
    let backend = MockBackend::start().await;
    let ctx = backend.context();
    let favorites = ctx.favorites();
    let id = ContentId::from("1");

    assert!(matches!(
        favorites.add(&id, ContentKind::Live).await,
        Err(ClientError::NotAuthenticated)
    ));
    assert!(matches!(
        favorites.check(&id, ContentKind::Live).await,
        Err(ClientError::NotAuthenticated)
    ));
    assert!(matches!(
        favorites.remove(&FavoriteId::from("100")).await,
        Err(ClientError::NotAuthenticated)
    ));
    assert!(matches!(favorites.list().await, Err(ClientError::NotAuthenticated)));
    assert!(matches!(
        ctx.comments().post(&id, ContentKind::Live, "hello").await,
        Err(ClientError::NotAuthenticated)
    ));

    assert!(backend.hits().is_empty());
}

#[tokio::test]
async fn add_check_remove_check() {
    let backend = MockBackend::start().await;
    let ctx = backend.context_with_token("A", PREMIUM_TOKEN);
    let favorites = ctx.favorites();
    let id = ContentId::from(4_i64);

    let favorite_id = favorites.add(&id, ContentKind::Highlight).await.unwrap();

    let status = favorites.check(&id, ContentKind::Highlight).await.unwrap();
    assert!(status.is_favorited);
    assert_eq!(status.favorite_id.as_ref(), Some(&favorite_id));

    // Same id under another kind is a different item.
    let other = favorites.check(&id, ContentKind::Vod).await.unwrap();
    assert!(!other.is_favorited);

    favorites.remove(&favorite_id).await.unwrap();
    let status = favorites.check(&id, ContentKind::Highlight).await.unwrap();
    assert!(!status.is_favorited);
    assert!(status.favorite_id.is_none());

    let check = &backend.hits_on("/api/favorites/check")[0];
    assert_eq!(
        check.query.as_deref(),
        Some("contentId=4&contentType=highlight")
    );
}

#[tokio::test]
async fn list_returns_records() {
    let backend = MockBackend::start().await;
    let ctx = backend.context_with_token("A", PREMIUM_TOKEN);
    let favorites = ctx.favorites();

    favorites.add(&ContentId::from("1"), ContentKind::Live).await.unwrap();
    favorites.add(&ContentId::from("2"), ContentKind::Vod).await.unwrap();

    let records = favorites.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].content_id.as_str(), "1");
    assert_eq!(records[1].kind(), Some(ContentKind::Vod));
}

#[tokio::test]
async fn toggle_flips_state() {
    let backend = MockBackend::start().await;
    let ctx = backend.context_with_token("A", PREMIUM_TOKEN);
    let favorites = ctx.favorites();
    let id = ContentId::from("1");

    let on = favorites.toggle(&id, ContentKind::Live).await.unwrap();
    assert!(on.is_favorited);
    assert_eq!(backend.favorite_count(), 1);

    let off = favorites.toggle(&id, ContentKind::Live).await.unwrap();
    assert!(!off.is_favorited);
    assert_eq!(backend.favorite_count(), 0);
}

#[tokio::test]
async fn removing_unknown_favorite_is_not_found() {
    let backend = MockBackend::start().await;
    let ctx = backend.context_with_token("A", PREMIUM_TOKEN);

    let err = ctx
        .favorites()
        .remove(&FavoriteId::from("999"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert!(ctx.session().is_authenticated());
}

#[tokio::test]
async fn stale_session_on_favorites_signs_out() {
    let backend = MockBackend::start().await;
    let ctx = backend.context_with_token("Ghost", "revoked");
    let mut events = ctx.subscribe();

    let err = ctx.favorites().list().await.unwrap_err();

    assert!(err.requires_sign_in());
    assert!(!ctx.store().is_authenticated());
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Invalidated);

    // The next call fails locally.
    assert!(matches!(
        ctx.favorites().list().await,
        Err(ClientError::NotAuthenticated)
    ));
    assert_eq!(backend.hits_on("/api/favorites").len(), 1);
}

#[tokio::test]
async fn comments_post_then_list() {
    let backend = MockBackend::start().await;
    let ctx = backend.context_with_token("A", PREMIUM_TOKEN);
    let id = ContentId::from("2");

    let posted = ctx
        .comments()
        .post(&id, ContentKind::Vod, "  What a finish  ")
        .await
        .unwrap();
    assert_eq!(posted.text, "What a finish");
    assert_eq!(posted.author(), "A");

    // Listing is public.
    let guest = backend.context();
    let comments = guest.comments().list(&id, ContentKind::Vod).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, posted.id);

    let empty = guest
        .comments()
        .list(&ContentId::from("1"), ContentKind::Live)
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn blank_comment_is_rejected_locally() {
    let backend = MockBackend::start().await;
    let ctx = backend.context_with_token("A", PREMIUM_TOKEN);

    let err = ctx
        .comments()
        .post(&ContentId::from("2"), ContentKind::Vod, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(backend.hits().is_empty());
}

#[tokio::test]
async fn toggle_refuses_to_add_when_favorited_without_id() {
    let backend = MockBackend::start().await;
    let ctx = backend.context_with_token("A", PREMIUM_TOKEN);
    let id = ContentId::from(ORPHAN_FAVORITE);

    let err = ctx.favorites().toggle(&id, ContentKind::Vod).await.unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedResponse(_)));

    let outcome = ContentPopup::new(&ctx, "index.html")
        .toggle_favorite(&id, ContentKind::Vod, FavoriteButton::Favorited)
        .await;
    assert!(matches!(
        outcome,
        ToggleOutcome::Reverted {
            button: FavoriteButton::Favorited,
            ..
        }
    ));

    assert!(
        backend
            .hits_on("/api/favorites")
            .iter()
            .all(|hit| hit.method == "GET")
    );
    assert_eq!(backend.favorite_count(), 0);
}

//! End-to-end scenarios over the service stack and an in-memory store.

use domains::{DomainError, PostRepository, UserId};
use integration_tests::{tracking_manager, Board};
use services::Resolution;

#[tokio::test]
async fn alice_posts_once_and_replay_is_rejected() {
    let board = Board::new();
    let alice = UserId::from("alice");
    let tracking = board.tracking.resolve(None, &alice).unwrap().into_tracking_id();

    let view = board.posts.list(&alice, &tracking).await.unwrap();
    assert!(view.posts.is_empty());

    let post = board
        .posts
        .create(&alice, &tracking, "hello".into(), view.one_time_token.as_str())
        .await
        .unwrap();
    assert_eq!(post.posted_by, alice);
    assert_eq!(post.tracking_cookie, tracking);

    let replay = board
        .posts
        .create(&alice, &tracking, "hello".into(), view.one_time_token.as_str())
        .await;
    assert!(matches!(replay, Err(DomainError::InvalidToken)));
    assert_eq!(board.repo.find_all_newest_first().await.unwrap().len(), 1);
}

#[tokio::test]
async fn bob_cannot_delete_with_alices_token() {
    let board = Board::new();
    let alice = UserId::from("alice");
    let bob = UserId::from("bob");
    let tracking = board.tracking.resolve(None, &alice).unwrap().into_tracking_id();

    let token = board.posts.list(&alice, &tracking).await.unwrap().one_time_token;
    let post = board.posts.create(&alice, &tracking, "mine".into(), token.as_str()).await.unwrap();

    let alice_token = board.posts.list(&alice, &tracking).await.unwrap().one_time_token;
    let res = board.posts.delete(&bob, post.id, alice_token.as_str()).await;
    assert!(matches!(res, Err(DomainError::InvalidToken)));
    assert!(board.repo.find_by_id(post.id).await.unwrap().is_some());
}

#[tokio::test]
async fn admin_deletes_someone_elses_post() {
    let board = Board::new();
    let alice = UserId::from("alice");
    let admin = UserId::from(integration_tests::ADMIN);
    let tracking = board.tracking.resolve(None, &alice).unwrap().into_tracking_id();

    let token = board.posts.list(&alice, &tracking).await.unwrap().one_time_token;
    let post = board.posts.create(&alice, &tracking, "mine".into(), token.as_str()).await.unwrap();

    let admin_tracking = board.tracking.resolve(None, &admin).unwrap().into_tracking_id();
    let admin_token = board.posts.list(&admin, &admin_tracking).await.unwrap().one_time_token;
    board.posts.delete(&admin, post.id, admin_token.as_str()).await.unwrap();
    assert!(board.repo.find_by_id(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn stale_list_view_token_is_useless() {
    let board = Board::new();
    let alice = UserId::from("alice");
    let tracking = board.tracking.resolve(None, &alice).unwrap().into_tracking_id();

    let first = board.posts.list(&alice, &tracking).await.unwrap().one_time_token;
    let second = board.posts.list(&alice, &tracking).await.unwrap().one_time_token;

    let stale = board.posts.create(&alice, &tracking, "x".into(), first.as_str()).await;
    assert!(matches!(stale, Err(DomainError::InvalidToken)));
    // The stale attempt did not burn the fresh token.
    board.posts.create(&alice, &tracking, "x".into(), second.as_str()).await.unwrap();
}

#[test]
fn tracking_cookie_survives_restart_with_same_secret() {
    let alice = UserId::from("alice");
    let cookie = tracking_manager().resolve(None, &alice).unwrap().tracking_id().to_string();

    // A fresh manager holds no state; validity is recomputed from the secret.
    let resolved = tracking_manager().resolve(Some(&cookie), &alice).unwrap();
    assert!(matches!(resolved, Resolution::Kept(_)));
}

//! 好友关系：自引用、有向对唯一、存在性校验顺序

mod common;

use arcadia_store_lib::database::repository::friendships_repository::FriendshipsRepository;
use arcadia_store_lib::entity::friendships::FriendshipStatus;
use arcadia_store_lib::StoreError;

use common::{seed_user, setup_db};

#[tokio::test]
async fn self_friendship_is_rejected_before_any_lookup() {
    let db = setup_db().await;

    // id 7 根本不存在，依然是 BadRequest 而不是 NotFound
    let err = FriendshipsRepository::create(&db, 7, 7, None).await.unwrap_err();
    assert!(matches!(err, StoreError::BadRequest(_)));

    // 表里不存在 user_id == friend_id 的行
    assert_eq!(FriendshipsRepository::count_self_rows(&db, 7).await.unwrap(), 0);
}

#[tokio::test]
async fn ordered_pair_is_unique_but_directional() {
    let db = setup_db().await;
    let a = seed_user(&db, "haru").await;
    let b = seed_user(&db, "rin").await;

    let row = FriendshipsRepository::create(&db, a.id, b.id, None).await.unwrap();
    assert_eq!(row.status, FriendshipStatus::Pending);

    // 同向重复报冲突
    let err = FriendshipsRepository::create(&db, a.id, b.id, None).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    // 反向是另一行，允许创建
    FriendshipsRepository::create(&db, b.id, a.id, Some(FriendshipStatus::Accepted))
        .await
        .unwrap();
}

#[tokio::test]
async fn both_users_must_exist() {
    let db = setup_db().await;
    let a = seed_user(&db, "haru").await;

    let err = FriendshipsRepository::create(&db, a.id, 404, None).await.unwrap_err();
    assert_eq!(err.to_string(), "user not found: 404");

    let err = FriendshipsRepository::create(&db, 404, a.id, None).await.unwrap_err();
    assert_eq!(err.to_string(), "user not found: 404");
}

#[tokio::test]
async fn status_update_and_delete() {
    let db = setup_db().await;
    let a = seed_user(&db, "haru").await;
    let b = seed_user(&db, "rin").await;
    FriendshipsRepository::create(&db, a.id, b.id, None).await.unwrap();

    let updated = FriendshipsRepository::update_status(&db, a.id, b.id, FriendshipStatus::Blocked)
        .await
        .unwrap();
    assert_eq!(updated.status, FriendshipStatus::Blocked);

    let err = FriendshipsRepository::update_status(&db, b.id, a.id, FriendshipStatus::Accepted)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));

    assert_eq!(FriendshipsRepository::delete(&db, a.id, b.id).await.unwrap(), 1);
    assert!(FriendshipsRepository::find_for_user(&db, a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_user_cascades_friendships() {
    let db = setup_db().await;
    let a = seed_user(&db, "haru").await;
    let b = seed_user(&db, "rin").await;
    FriendshipsRepository::create(&db, a.id, b.id, None).await.unwrap();
    FriendshipsRepository::create(&db, b.id, a.id, None).await.unwrap();

    use arcadia_store_lib::database::repository::users_repository::UsersRepository;
    UsersRepository::delete(&db, b.id).await.unwrap();

    // 两个方向的关系都被级联清理
    assert!(FriendshipsRepository::find_for_user(&db, a.id).await.unwrap().is_empty());
    assert!(FriendshipsRepository::find_entry(&db, b.id, a.id).await.unwrap().is_none());
}

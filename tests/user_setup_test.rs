//! createUserWithInitialSetup 聚合写入：全有或全无

mod common;

use arcadia_store_lib::database::repository::achievements_repository::AchievementsRepository;
use arcadia_store_lib::database::repository::users_repository::UsersRepository;
use arcadia_store_lib::entity::friendships::FriendshipStatus;
use arcadia_store_lib::entity::library_entries::Ownership;
use arcadia_store_lib::StoreError;

use common::{seed_game, seed_user, setup_db, user_data};

#[tokio::test]
async fn user_setup_persists_whole_aggregate() {
    let db = setup_db().await;
    let game_a = seed_game(&db, "Aurora").await;
    let game_b = seed_game(&db, "Eventide").await;
    let friend = seed_user(&db, "rin").await;
    let achievement = AchievementsRepository::create(&db, game_a.id, "First Steps".to_string(), None)
        .await
        .unwrap();

    let setup = UsersRepository::insert_with_setup(
        &db,
        user_data("haru"),
        Some(vec![game_a.id, game_b.id]),
        Some(vec![friend.id]),
        Some(vec![achievement.id]),
    )
    .await
    .expect("用户聚合创建失败");

    assert_eq!(setup.user.username, "haru");
    assert_eq!(setup.library.len(), 2);
    assert_eq!(setup.friendships.len(), 1);
    assert_eq!(setup.unlocks.len(), 1);

    // 初始条目的缺省值：愿望单 + 待确认
    assert!(setup
        .library
        .iter()
        .all(|entry| entry.ownership == Ownership::Wishlist && entry.hours_played == 0.0));
    assert_eq!(setup.friendships[0].status, FriendshipStatus::Pending);
}

#[tokio::test]
async fn optional_lists_default_to_empty() {
    let db = setup_db().await;

    let setup = UsersRepository::insert_with_setup(&db, user_data("haru"), None, None, None)
        .await
        .unwrap();

    assert!(setup.library.is_empty());
    assert!(setup.friendships.is_empty());
    assert!(setup.unlocks.is_empty());
}

#[tokio::test]
async fn missing_friend_rolls_back_user_row() {
    let db = setup_db().await;
    let game = seed_game(&db, "Aurora").await;

    let err = UsersRepository::insert_with_setup(
        &db,
        user_data("haru"),
        Some(vec![game.id]),
        Some(vec![90210]),
        None,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "user not found: 90210");
    assert!(UsersRepository::find_by_key(&db, "haru").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let db = setup_db().await;
    seed_user(&db, "haru").await;

    let err = UsersRepository::insert_with_setup(&db, user_data("haru"), None, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Conflict { .. }));
    assert_eq!(err.to_string(), "username already taken: haru");
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let db = setup_db().await;
    seed_user(&db, "haru").await;

    let mut data = user_data("haru2");
    data.email = "haru@example.com".to_string();

    let err = UsersRepository::insert(&db, data).await.unwrap_err();
    assert_eq!(err.to_string(), "email already taken: haru@example.com");
}

#[tokio::test]
async fn user_rename_excludes_own_row() {
    let db = setup_db().await;
    let user = seed_user(&db, "haru").await;
    seed_user(&db, "rin").await;

    // 改回自身用户名成功
    let mut updates = arcadia_store_lib::database::dto::UpdateUserData::default();
    updates.username = Some("haru".to_string());
    let updated = UsersRepository::update(&db, user.id, updates).await.unwrap();
    assert_eq!(updated.username, "haru");

    // 改成他人邮箱冲突
    let mut updates = arcadia_store_lib::database::dto::UpdateUserData::default();
    updates.email = Some("rin@example.com".to_string());
    let err = UsersRepository::update(&db, user.id, updates).await.unwrap_err();
    assert_eq!(err.to_string(), "email already taken: rin@example.com");
}

#[tokio::test]
async fn unlock_is_unique_per_user_and_achievement() {
    let db = setup_db().await;
    let game = seed_game(&db, "Aurora").await;
    let user = seed_user(&db, "haru").await;
    let achievement = AchievementsRepository::create(&db, game.id, "First Steps".to_string(), None)
        .await
        .unwrap();

    UsersRepository::unlock_achievement(&db, user.id, achievement.id)
        .await
        .unwrap();

    let err = UsersRepository::unlock_achievement(&db, user.id, achievement.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    // 撤销后再次撤销报 NotFound
    UsersRepository::revoke_achievement(&db, user.id, achievement.id)
        .await
        .unwrap();
    let err = UsersRepository::revoke_achievement(&db, user.id, achievement.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

//! 玩家数据：游戏库 / 评测 / 云存档的 (user, game) 对唯一性与部分更新

mod common;

use arcadia_store_lib::database::dto::{UpdateLibraryData, UpdateReviewData};
use arcadia_store_lib::database::repository::library_repository::LibraryRepository;
use arcadia_store_lib::database::repository::reviews_repository::ReviewsRepository;
use arcadia_store_lib::database::repository::saves_repository::SavesRepository;
use arcadia_store_lib::entity::library_entries::{DownloadStatus, Ownership};
use arcadia_store_lib::StoreError;

use common::{seed_game, seed_user, setup_db};

#[tokio::test]
async fn library_pair_is_unique_and_first_row_untouched() {
    let db = setup_db().await;
    let user = seed_user(&db, "haru").await;
    let game = seed_game(&db, "Aurora").await;

    let first = LibraryRepository::create(&db, user.id, game.id, Ownership::Purchased)
        .await
        .unwrap();

    let err = LibraryRepository::create(&db, user.id, game.id, Ownership::Rented)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    // 第一条原样保留
    let reread = LibraryRepository::find_entry(&db, user.id, game.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reread.id, first.id);
    assert_eq!(reread.ownership, Ownership::Purchased);
}

#[tokio::test]
async fn library_create_checks_pair_before_existence() {
    let db = setup_db().await;
    let user = seed_user(&db, "haru").await;

    // 两侧都查：游戏不存在
    let err = LibraryRepository::create(&db, user.id, 999, Ownership::Wishlist)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "game not found: 999");

    let err = LibraryRepository::create(&db, 999, 1, Ownership::Wishlist)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "user not found: 999");
}

#[tokio::test]
async fn library_partial_update_touches_only_given_fields() {
    let db = setup_db().await;
    let user = seed_user(&db, "haru").await;
    let game = seed_game(&db, "Aurora").await;
    LibraryRepository::create(&db, user.id, game.id, Ownership::Purchased)
        .await
        .unwrap();

    // 只更新游玩时长，不触碰拥有方式与下载状态
    let updated = LibraryRepository::update(
        &db,
        user.id,
        game.id,
        UpdateLibraryData {
            hours_played: Some(42.5),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.hours_played, 42.5);
    assert_eq!(updated.ownership, Ownership::Purchased);
    assert_eq!(updated.download_status, DownloadStatus::None);

    let err = LibraryRepository::update(&db, user.id, 999, UpdateLibraryData::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn review_pair_is_unique() {
    let db = setup_db().await;
    let user = seed_user(&db, "haru").await;
    let game = seed_game(&db, "Aurora").await;

    ReviewsRepository::create(&db, user.id, game.id, 5, Some("great".to_string()))
        .await
        .unwrap();

    let err = ReviewsRepository::create(&db, user.id, game.id, 1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    let reread = ReviewsRepository::find_entry(&db, user.id, game.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reread.rating, 5);
}

#[tokio::test]
async fn review_update_and_average() {
    let db = setup_db().await;
    let user_a = seed_user(&db, "haru").await;
    let user_b = seed_user(&db, "rin").await;
    let game = seed_game(&db, "Aurora").await;

    ReviewsRepository::create(&db, user_a.id, game.id, 5, None).await.unwrap();
    ReviewsRepository::create(&db, user_b.id, game.id, 2, None).await.unwrap();

    assert_eq!(
        ReviewsRepository::average_rating_for_game(&db, game.id).await.unwrap(),
        Some(3.5)
    );

    let updated = ReviewsRepository::update(
        &db,
        user_b.id,
        game.id,
        UpdateReviewData {
            rating: Some(4),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.rating, 4);

    assert_eq!(
        ReviewsRepository::average_rating_for_game(&db, game.id).await.unwrap(),
        Some(4.5)
    );

    // 没有评测的游戏返回 None
    let lonely = seed_game(&db, "Eventide").await;
    assert_eq!(
        ReviewsRepository::average_rating_for_game(&db, lonely.id).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn save_pair_is_unique_and_update_replaces_blob() {
    let db = setup_db().await;
    let user = seed_user(&db, "haru").await;
    let game = seed_game(&db, "Aurora").await;

    let created = SavesRepository::create(&db, user.id, game.id, vec![1, 2, 3])
        .await
        .unwrap();
    assert_eq!(created.data, vec![1, 2, 3]);

    let err = SavesRepository::create(&db, user.id, game.id, vec![9])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    let updated = SavesRepository::update_data(&db, user.id, game.id, vec![4, 5])
        .await
        .unwrap();
    assert_eq!(updated.data, vec![4, 5]);
    assert!(updated.last_updated >= created.last_updated);

    let err = SavesRepository::update_data(&db, user.id, 999, vec![0])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn save_requires_both_sides() {
    let db = setup_db().await;
    let user = seed_user(&db, "haru").await;

    let err = SavesRepository::create(&db, user.id, 123, vec![1]).await.unwrap_err();
    assert_eq!(err.to_string(), "game not found: 123");
}

//! 目录实体：改名语义、本体游戏约束、标签/厂商关联

mod common;

use arcadia_store_lib::database::dto::UpdateGameData;
use arcadia_store_lib::database::repository::devs_repository::DevsRepository;
use arcadia_store_lib::database::repository::games_repository::GamesRepository;
use arcadia_store_lib::database::repository::tags_repository::TagsRepository;
use arcadia_store_lib::entity::devs::DevType;
use arcadia_store_lib::StoreError;

use common::{seed_dev, seed_game, seed_tag, setup_db};

#[tokio::test]
async fn renaming_to_own_current_title_succeeds() {
    let db = setup_db().await;
    let game = seed_game(&db, "Aurora").await;

    let updated = GamesRepository::update(
        &db,
        game.id,
        UpdateGameData {
            title: Some("Aurora".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("改回当前标题不应报冲突");

    assert_eq!(updated.title, "Aurora");
}

#[tokio::test]
async fn renaming_to_taken_title_conflicts() {
    let db = setup_db().await;
    seed_game(&db, "Aurora").await;
    let other = seed_game(&db, "Eventide").await;

    let err = GamesRepository::update(
        &db,
        other.id,
        UpdateGameData {
            title: Some("Aurora".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "game title already taken: Aurora");
}

#[tokio::test]
async fn game_cannot_be_its_own_base_game() {
    let db = setup_db().await;
    let game = seed_game(&db, "Aurora").await;

    // 自身 id 是有效的游戏 id，依然必须被拒绝
    let err = GamesRepository::update(
        &db,
        game.id,
        UpdateGameData {
            base_game_id: Some(Some(game.id)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StoreError::BadRequest(_)));

    let reread = GamesRepository::find_by_id(&db, game.id).await.unwrap().unwrap();
    assert_eq!(reread.base_game_id, None);
}

#[tokio::test]
async fn base_game_update_requires_existing_target() {
    let db = setup_db().await;
    let game = seed_game(&db, "Aurora").await;
    let base = seed_game(&db, "Eventide").await;

    let err = GamesRepository::update(
        &db,
        game.id,
        UpdateGameData {
            base_game_id: Some(Some(5555)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "game not found: 5555");

    let updated = GamesRepository::update(
        &db,
        game.id,
        UpdateGameData {
            base_game_id: Some(Some(base.id)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.base_game_id, Some(base.id));

    // 显式清空不触发任何校验
    let cleared = GamesRepository::update(
        &db,
        game.id,
        UpdateGameData {
            base_game_id: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(cleared.base_game_id, None);
}

#[tokio::test]
async fn partial_update_leaves_untouched_fields_alone() {
    let db = setup_db().await;
    let game = seed_game(&db, "Aurora").await;

    let updated = GamesRepository::update(
        &db,
        game.id,
        UpdateGameData {
            price: Some(9.99),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.price, 9.99);
    assert_eq!(updated.title, "Aurora");
    assert_eq!(updated.release_date, game.release_date);
}

#[tokio::test]
async fn tag_rename_excludes_own_row() {
    let db = setup_db().await;
    let tag = seed_tag(&db, "rpg").await;
    seed_tag(&db, "strategy").await;

    // 改回自身名称成功
    let renamed = TagsRepository::rename(&db, tag.id, "rpg".to_string()).await.unwrap();
    assert_eq!(renamed.tag_name, "rpg");

    // 改成他人名称冲突
    let err = TagsRepository::rename(&db, tag.id, "strategy".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "tag name already taken: strategy");
}

#[tokio::test]
async fn dev_rename_and_type_change() {
    let db = setup_db().await;
    let dev = seed_dev(&db, "Moonlit Works").await;

    let updated = DevsRepository::update(
        &db,
        dev.id,
        Some("Moonlit Works".to_string()),
        Some(DevType::Both),
    )
    .await
    .unwrap();

    assert_eq!(updated.dev_name, "Moonlit Works");
    assert_eq!(updated.dev_type, DevType::Both);
}

#[tokio::test]
async fn tag_link_is_unique_and_checks_both_sides() {
    let db = setup_db().await;
    let game = seed_game(&db, "Aurora").await;
    let tag = seed_tag(&db, "rpg").await;

    TagsRepository::add_game_to_tag(&db, game.id, tag.id).await.unwrap();

    let err = TagsRepository::add_game_to_tag(&db, game.id, tag.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    let err = TagsRepository::add_game_to_tag(&db, 777, tag.id).await.unwrap_err();
    assert_eq!(err.to_string(), "game not found: 777");

    assert_eq!(TagsRepository::games_with_tag(&db, tag.id).await.unwrap(), vec![game.id]);

    TagsRepository::remove_game_from_tag(&db, game.id, tag.id).await.unwrap();
    let err = TagsRepository::remove_game_from_tag(&db, game.id, tag.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn dev_link_roundtrip() {
    let db = setup_db().await;
    let game = seed_game(&db, "Aurora").await;
    let dev = seed_dev(&db, "Moonlit Works").await;

    DevsRepository::add_game_to_dev(&db, game.id, dev.id).await.unwrap();
    assert_eq!(DevsRepository::games_with_dev(&db, dev.id).await.unwrap(), vec![game.id]);

    let err = DevsRepository::add_game_to_dev(&db, game.id, dev.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    DevsRepository::remove_game_from_dev(&db, game.id, dev.id).await.unwrap();
}

#[tokio::test]
async fn deleting_game_cascades_to_dependents() {
    let db = setup_db().await;
    let game = seed_game(&db, "Aurora").await;
    let tag = seed_tag(&db, "rpg").await;
    TagsRepository::add_game_to_tag(&db, game.id, tag.id).await.unwrap();

    assert_eq!(GamesRepository::delete(&db, game.id).await.unwrap(), 1);

    // 关联行被存储层级联清理
    assert!(TagsRepository::games_with_tag(&db, tag.id).await.unwrap().is_empty());
}

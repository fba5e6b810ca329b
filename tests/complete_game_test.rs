//! createCompleteGame 聚合写入：全有或全无

mod common;

use arcadia_store_lib::database::dto::{AchievementInput, NewsInput};
use arcadia_store_lib::database::repository::games_repository::GamesRepository;
use arcadia_store_lib::StoreError;

use common::{game_data, seed_dev, seed_game, seed_tag, setup_db};

fn achievements() -> Vec<AchievementInput> {
    vec![
        AchievementInput {
            title: "First Steps".to_string(),
            icon: Some("first_steps.png".to_string()),
        },
        AchievementInput {
            title: "Completionist".to_string(),
            icon: None,
        },
    ]
}

fn launch_news() -> NewsInput {
    NewsInput {
        title: "Now Available".to_string(),
        content: "The game is out.".to_string(),
        published_at: None,
    }
}

#[tokio::test]
async fn complete_game_persists_whole_aggregate() {
    let db = setup_db().await;
    let tag_a = seed_tag(&db, "rpg").await;
    let tag_b = seed_tag(&db, "open-world").await;
    let dev = seed_dev(&db, "Moonlit Works").await;

    let full = GamesRepository::insert_complete(
        &db,
        game_data("Aurora"),
        vec![tag_a.id, tag_b.id],
        vec![dev.id],
        achievements(),
        launch_news(),
    )
    .await
    .expect("聚合创建失败");

    assert_eq!(full.game.title, "Aurora");
    assert_eq!(full.achievements.len(), 2);
    assert_eq!(full.tags.len(), 2);
    assert_eq!(full.devs.len(), 1);
    assert_eq!(full.news.len(), 1);

    // 回读与事务内返回一致
    let reread = GamesRepository::find_full_by_id(&db, full.game.id)
        .await
        .unwrap()
        .expect("聚合应存在");
    assert_eq!(reread.achievements.len(), 2);
    assert_eq!(reread.tags.len(), 2);
}

#[tokio::test]
async fn missing_tag_rolls_back_everything() {
    let db = setup_db().await;
    let tag = seed_tag(&db, "rpg").await;
    let dev = seed_dev(&db, "Moonlit Works").await;

    let err = GamesRepository::insert_complete(
        &db,
        game_data("Aurora"),
        vec![tag.id, 999],
        vec![dev.id],
        achievements(),
        launch_news(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(err.to_string(), "tag not found: 999");

    // 游戏行没有落库
    assert_eq!(
        GamesRepository::count_by_title(&db, "Aurora").await.unwrap(),
        0
    );
}

#[tokio::test]
async fn missing_dev_rolls_back_everything() {
    let db = setup_db().await;
    let tag = seed_tag(&db, "rpg").await;

    let err = GamesRepository::insert_complete(
        &db,
        game_data("Aurora"),
        vec![tag.id],
        vec![424242],
        achievements(),
        launch_news(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(
        GamesRepository::count_by_title(&db, "Aurora").await.unwrap(),
        0
    );
}

#[tokio::test]
async fn duplicate_title_conflicts_and_leaves_single_row() {
    let db = setup_db().await;
    let tag = seed_tag(&db, "rpg").await;
    let dev = seed_dev(&db, "Moonlit Works").await;

    seed_game(&db, "Aurora").await;

    let err = GamesRepository::insert_complete(
        &db,
        game_data("Aurora"),
        vec![tag.id],
        vec![dev.id],
        achievements(),
        launch_news(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StoreError::Conflict { .. }));
    assert_eq!(
        GamesRepository::count_by_title(&db, "Aurora").await.unwrap(),
        1
    );
}

#[tokio::test]
async fn missing_base_game_rolls_back_everything() {
    let db = setup_db().await;
    let tag = seed_tag(&db, "rpg").await;
    let dev = seed_dev(&db, "Moonlit Works").await;

    let mut data = game_data("Aurora: Eclipse");
    data.base_game_id = Some(31337);

    let err = GamesRepository::insert_complete(
        &db,
        data,
        vec![tag.id],
        vec![dev.id],
        achievements(),
        launch_news(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "game not found: 31337");
    assert_eq!(
        GamesRepository::count_by_title(&db, "Aurora: Eclipse")
            .await
            .unwrap(),
        0
    );
}

//! 测试公共设施：内存数据库 + 常用种子数据
#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

use arcadia_store_lib::database::connection;
use arcadia_store_lib::database::dto::{InsertGameData, InsertUserData};
use arcadia_store_lib::database::repository::devs_repository::DevsRepository;
use arcadia_store_lib::database::repository::games_repository::GamesRepository;
use arcadia_store_lib::database::repository::tags_repository::TagsRepository;
use arcadia_store_lib::database::repository::users_repository::UsersRepository;
use arcadia_store_lib::entity::devs::DevType;
use arcadia_store_lib::entity::{devs, games, tags, users};

/// 建立内存数据库并跑完全部迁移
pub async fn setup_db() -> DatabaseConnection {
    let db = connection::establish_in_memory()
        .await
        .expect("连接内存数据库失败");
    Migrator::up(&db, None).await.expect("数据库迁移失败");
    db
}

pub fn game_data(title: &str) -> InsertGameData {
    InsertGameData {
        title: title.to_string(),
        description: Some("test game".to_string()),
        price: 19.99,
        release_date: Some("2025-03-14".to_string()),
        base_game_id: None,
    }
}

pub fn user_data(username: &str) -> InsertUserData {
    InsertUserData {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: "$argon2id$stub".to_string(),
        age: Some(27),
        region: Some("JP".to_string()),
    }
}

pub async fn seed_game(db: &DatabaseConnection, title: &str) -> games::Model {
    GamesRepository::insert(db, game_data(title))
        .await
        .expect("种子游戏创建失败")
}

pub async fn seed_user(db: &DatabaseConnection, username: &str) -> users::Model {
    UsersRepository::insert(db, user_data(username))
        .await
        .expect("种子用户创建失败")
}

pub async fn seed_tag(db: &DatabaseConnection, name: &str) -> tags::Model {
    TagsRepository::create(db, name.to_string())
        .await
        .expect("种子标签创建失败")
}

pub async fn seed_dev(db: &DatabaseConnection, name: &str) -> devs::Model {
    DevsRepository::create(db, name.to_string(), DevType::Developer)
        .await
        .expect("种子厂商创建失败")
}

//! 数据传输对象 (DTO)
//!
//! 插入与部分更新的结构定义。输入在上游已完成形状校验（长度 / 枚举 /
//! 范围），本层只关心跨实体不变量。
//!
//! 部分更新采用"字段更新集"：普通 `Option<T>` 表示"未提供 / 提供"，
//! 可置空字段用 `Option<Option<T>>` 区分"未提供"和"显式设为 null"。
//! 只有被触碰的字段才会触发对应的校验器。

use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::events::EventKind;
use crate::entity::library_entries::{DownloadStatus, Ownership};

/// 辅助函数：支持 Option<Option<T>> 的反序列化
/// 用于区分"未提供字段"和"显式设为 null"
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

// ==================== 游戏 ====================

/// 用于插入游戏的数据结构
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertGameData {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub release_date: Option<String>,
    /// 本体游戏 ID（DLC / 资料片），必须指向已存在的游戏
    pub base_game_id: Option<i32>,
}

/// 用于更新游戏的数据结构，所有字段可选，未提供的字段保持不变
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateGameData {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub release_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub base_game_id: Option<Option<i32>>,
}

/// createCompleteGame 的成就输入（隶属新游戏，无需携带 game_id）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AchievementInput {
    pub title: String,
    pub icon: Option<String>,
}

/// 资讯输入，published_at 缺省为当前时间
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewsInput {
    pub title: String,
    pub content: String,
    pub published_at: Option<i32>,
}

// ==================== 成就 ====================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateAchievementData {
    /// 改挂到别的游戏时重新校验目标游戏存在
    pub game_id: Option<i32>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
}

// ==================== 用户 ====================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsertUserData {
    pub username: String,
    pub email: String,
    /// 上游已完成哈希
    pub password_hash: String,
    pub age: Option<i32>,
    pub region: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserData {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub age: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub region: Option<Option<String>>,
}

// ==================== 玩家数据 ====================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateLibraryData {
    pub hours_played: Option<f64>,
    pub ownership: Option<Ownership>,
    pub download_status: Option<DownloadStatus>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateReviewData {
    pub rating: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub body: Option<Option<String>>,
}

// ==================== 运营 ====================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateEventData {
    /// 改挂到别的游戏时重新校验目标游戏存在
    pub game_id: Option<i32>,
    pub event_type: Option<EventKind>,
    pub start_date: Option<i32>,
    pub end_date: Option<i32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateNewsData {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<i32>,
}

//! 预导入模块
//!
//! 提供常用实体类型的快捷导入。

pub use super::achievements::Entity as Achievements;
pub use super::devs::Entity as Devs;
pub use super::events::Entity as Events;
pub use super::friendships::Entity as Friendships;
pub use super::game_dev_link::Entity as GameDevLink;
pub use super::game_news::Entity as GameNews;
pub use super::game_tag_link::Entity as GameTagLink;
pub use super::games::Entity as Games;
pub use super::library_entries::Entity as LibraryEntries;
pub use super::reviews::Entity as Reviews;
pub use super::saves::Entity as Saves;
pub use super::tags::Entity as Tags;
pub use super::user_achievement_link::Entity as UserAchievementLink;
pub use super::users::Entity as Users;

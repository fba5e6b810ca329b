//! 仓库模块
//!
//! 每个实体族一个仓库。带跨实体不变量的创建/更新都在单个事务内
//! 先校验再写入（见 txn.rs / validate.rs）；无不变量的读删直接走
//! 连接句柄。

pub mod achievements_repository;
pub mod devs_repository;
pub mod events_repository;
pub mod friendships_repository;
pub mod games_repository;
pub mod library_repository;
pub mod news_repository;
pub mod reviews_repository;
pub mod saves_repository;
pub mod tags_repository;
pub mod users_repository;

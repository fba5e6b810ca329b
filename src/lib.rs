//! ArcadiaStore 后端核心库
//!
//! 商店目录与玩家数据的存储层：实体定义、迁移之上的仓库层，以及
//! 聚合写入所依赖的事务上下文 / 校验器 / 错误分类。
//!
//! HTTP 路由、请求参数解析、输入形状校验与密码哈希都在上游完成，
//! 本库只接收已定型的输入，返回聚合结果或四类错误之一。

pub mod database;
pub mod entity;

pub use database::error::StoreError;
pub use database::txn::run_atomically;

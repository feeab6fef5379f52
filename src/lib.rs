//! SchoolHub：多租户学校管理后端
//!
//! 基于 Actix Web 与 SeaORM。所有租户数据行都带有 `school_id`，
//! 每个请求都按调用者在该校的成员身份进行授权。
//!
//! # 模块结构
//! - `cache`：对象缓存（Moka/Redis）
//! - `config`：分层配置
//! - `entity`：SeaORM 实体
//! - `errors`：全局错误类型
//! - `middlewares`：JWT、角色、学校成员守卫与速率限制
//! - `models`：请求、响应与领域类型
//! - `routes`：HTTP 处理函数
//! - `runtime`：启动与关闭
//! - `services`：校验、租户授权与业务规则
//! - `storage`：`Storage` trait 及其 SeaORM 实现
//! - `utils`：JWT、密码、提取器、编号与校验

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

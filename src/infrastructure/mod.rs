//! 基础设施层：配置、数据库、日志、密码哈希、内存存储

pub mod config;
pub mod database;
pub mod logger;
pub mod memory;
pub mod password;

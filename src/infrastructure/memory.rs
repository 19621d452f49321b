//! 内存存储
//!
//! 与数据库表结构一一对应，并复现外键与唯一约束，
//! 用于测试和 `memory` 存储后端。各实体的仓储 trait 实现在对应的 app 模块中。

use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::app::{category::Category, product::Product, user::User};

#[derive(Default)]
pub struct MemoryTables {
    pub(crate) categories: BTreeMap<i32, Category>,
    pub(crate) products: BTreeMap<i32, Product>,
    pub(crate) users: BTreeMap<i32, User>,
    category_seq: i32,
    product_seq: i32,
    user_seq: i32,
}

impl MemoryTables {
    pub(crate) fn next_category_id(&mut self) -> i32 {
        self.category_seq += 1;
        self.category_seq
    }

    pub(crate) fn next_product_id(&mut self) -> i32 {
        self.product_seq += 1;
        self.product_seq
    }

    pub(crate) fn next_user_id(&mut self) -> i32 {
        self.user_seq += 1;
        self.user_seq
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub(crate) tables: RwLock<MemoryTables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 占位容器注册表
//!
//! 以字符串为键管理一组纯文本 [`Container`]。注册表由渲染上下文持有，
//! 每次渲染一个实例，不存在全局单例；首次访问某个键时按默认配置创建容器。

use std::collections::HashMap;

use log::debug;

use crate::container::Container;
use crate::exception::Exception;

#[derive(Debug, Default)]
pub struct Placeholder {
    containers: HashMap<String, Container<String>>,
}

fn require_key(key: &str) -> Result<(), Exception> {
    if key.is_empty() {
        return Err(Exception::MissingRequiredKey(
            "Placeholder: missing argument. $name is required by placeholder($name)".to_string(),
        ));
    }
    Ok(())
}

impl Placeholder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出指定键的容器，不存在时创建
    pub fn get(&mut self, key: &str) -> Result<&mut Container<String>, Exception> {
        require_key(key)?;
        if !self.containers.contains_key(key) {
            debug!("创建占位容器：{}", key);
        }
        Ok(self.containers.entry(key.to_string()).or_default())
    }

    /// 以给定条目新建容器，覆盖同名的已有容器
    pub fn create_container(
        &mut self,
        key: &str,
        items: Vec<String>,
    ) -> Result<&mut Container<String>, Exception> {
        require_key(key)?;
        let slot = self.containers.entry(key.to_string()).or_default();
        *slot = Container::from_items(items);
        Ok(slot)
    }

    pub fn container_exists(&self, key: &str) -> bool {
        self.containers.contains_key(key)
    }

    pub fn delete_container(&mut self, key: &str) -> bool {
        self.containers.remove(key).is_some()
    }

    pub fn clear_containers(&mut self) {
        self.containers.clear();
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// 渲染指定键的容器；不存在的键渲染为空串且不会创建容器
    pub fn render(&self, key: &str) -> String {
        match self.containers.get(key) {
            Some(container) => container.to_string(),
            None => String::new(),
        }
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 视图助手参数与常量模块
//!
//! 该模块定义了各个 head 助手共同遵循的常量和数据结构，包括：
//! - 各类标签允许输出的属性键及其输出顺序。
//! - `<style>` 的合法媒体类型表与属性转义用的命名实体表。
//! - 条目放置方式（追加、前置、替换）的强类型枚举。

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::exception::Exception;

/// 脚本条目的默认 MIME 类型
pub const DEFAULT_SCRIPT_TYPE: &str = "text/javascript";

/// 样式表链接的默认 MIME 类型
pub const DEFAULT_STYLESHEET_TYPE: &str = "text/css";

/// 样式表链接的默认媒体类型
pub const DEFAULT_STYLESHEET_MEDIA: &str = "screen";

/// 事件属性的键前缀（`onclick`、`onload` 等），非标量值会先编码为 JSON
pub const EVENT_ATTRIBUTE_PREFIX: &str = "on";

/// 与事件属性同样处理的保留键
pub const CONSTRAINTS_ATTRIBUTE: &str = "constraints";

/// 条件注释修饰键
pub const CONDITIONAL_KEY: &str = "conditional";

/// `<link>` 允许输出的属性，数组顺序即输出顺序。`extras` 紧随 `title` 输出。
pub const LINK_ITEM_KEYS: [&str; 13] = [
    "charset",
    "href",
    "hreflang",
    "id",
    "media",
    "rel",
    "rev",
    "sizes",
    "type",
    "title",
    "itemprop",
    "crossorigin",
    "integrity",
];

/// `<meta>` 允许输出的修饰属性
pub const META_MODIFIER_KEYS: [&str; 2] = ["lang", "scheme"];

/// `<style>` 允许输出的属性
pub const STYLE_OPTIONAL_ATTRIBUTES: [&str; 4] = ["lang", "title", "media", "dir"];

lazy_static! {
    /// `<script>` 在未开启任意属性模式时允许输出的属性集合。
    pub static ref SCRIPT_OPTIONAL_ATTRIBUTES: HashSet<&'static str> = {
        [
            "charset",
            "integrity",
            "crossorigin",
            "defer",
            "async",
            "language",
            "src",
            "id",
            "nomodule",
            "referrerpolicy",
        ]
        .into_iter()
        .collect()
    };
}

lazy_static! {
    /// `<style media="...">` 接受的媒体类型。
    ///
    /// 参考标准：[HTML 4.01 Media types](https://www.w3.org/TR/html401/types.html#h-6.13)。
    pub static ref MEDIA_TYPES: HashSet<&'static str> = {
        [
            "all",
            "aural",
            "braille",
            "handheld",
            "print",
            "projection",
            "screen",
            "tty",
            "tv",
        ]
        .into_iter()
        .collect()
    };
}

lazy_static! {
    /// 属性值转义时使用命名实体输出的码位。
    pub static ref HTML_NAMED_ENTITIES: HashMap<u32, &'static str> = {
        let mut map = HashMap::new();
        map.insert(34, "quot");
        map.insert(38, "amp");
        map.insert(60, "lt");
        map.insert(62, "gt");
        map
    };
}

/// 条目写入容器的方式，同时也是捕获结束时的落地方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// 追加到末尾
    #[default]
    Append,
    /// 插入到最前，已有条目顺延
    Prepend,
    /// 清空后写入
    Set,
}

impl fmt::Display for Placement {
    /// 格式化为配置文件中使用的大写名称
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Placement::Append => write!(f, "APPEND"),
            Placement::Prepend => write!(f, "PREPEND"),
            Placement::Set => write!(f, "SET"),
        }
    }
}

impl FromStr for Placement {
    type Err = Exception;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "APPEND" => Ok(Placement::Append),
            "PREPEND" => Ok(Placement::Prepend),
            "SET" => Ok(Placement::Set),
            _ => Err(Exception::DomainViolation(format!(
                "You must use a valid attach order: 'PREPEND', 'APPEND' or 'SET', got '{}'",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_round_trip_names() {
        for p in [Placement::Append, Placement::Prepend, Placement::Set] {
            assert_eq!(p.to_string().parse::<Placement>().unwrap(), p);
        }
    }

    #[test]
    fn test_placement_lowercase() {
        assert_eq!("prepend".parse::<Placement>().unwrap(), Placement::Prepend);
    }

    #[test]
    fn test_placement_invalid() {
        match "REPLACE".parse::<Placement>() {
            Err(Exception::DomainViolation(m)) => assert!(m.contains("valid attach order")),
            other => panic!("Expected DomainViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_media_types() {
        assert!(MEDIA_TYPES.contains("screen"));
        assert!(!MEDIA_TYPES.contains("desktop"));
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了视图助手在模板渲染过程中可能抛出的各类异常情况。
//!
//! ## 设计意图
//! - **错误分类**：涵盖了条目结构错误、doctype 约束冲突、捕获重入以及缺失必需键。
//! - **同步抛出**：所有异常都在违规发生的位置立即返回，不做重试也不做默认值替换。
//! - **用户友好**：通过实现 `std::fmt::Display`，错误信息会指明应当改用哪个构造方法。

use std::fmt;

/// 视图助手在变更或渲染容器时发生的异常类型。
///
/// 该枚举作为 `Result` 的 `Err` 部分返回，交由模板执行方处理。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exception {
    /// 传入的条目不符合助手要求的结构，消息中会给出正确的构造方法。
    InvalidArgument(String),
    /// 条目的取值超出允许范围，或者与当前 doctype 冲突（例如 XHTML 下的 charset meta）。
    DomainViolation(String),
    /// 在同一个容器上嵌套调用了 `capture_start`。
    IllegalReentry(String),
    /// 调用时缺少必需的键名（例如以空名字查找占位容器）。
    MissingRequiredKey(String),
}

use Exception::*;

impl Exception {
    /// 返回异常所属的类别名称，便于日志归类。
    pub fn kind(&self) -> &'static str {
        match self {
            InvalidArgument(_) => "InvalidArgument",
            DomainViolation(_) => "DomainViolation",
            IllegalReentry(_) => "IllegalReentry",
            MissingRequiredKey(_) => "MissingRequiredKey",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            InvalidArgument(m) | DomainViolation(m) | IllegalReentry(m) | MissingRequiredKey(m) => m,
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for Exception {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contains_kind_and_message() {
        let e = IllegalReentry("Cannot nest headScript captures".to_string());
        assert_eq!(e.to_string(), "IllegalReentry: Cannot nest headScript captures");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(InvalidArgument(String::new()).kind(), "InvalidArgument");
        assert_eq!(DomainViolation(String::new()).kind(), "DomainViolation");
        assert_eq!(MissingRequiredKey(String::new()).kind(), "MissingRequiredKey");
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HeadScript 助手
//!
//! 累积外部脚本文件与内联脚本。内联源码默认包在注释保护中
//! （XHTML 下为 CDATA），属性按白名单过滤，除非显式允许任意属性。

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use log::debug;

use crate::container::{Capture, Captured};
use crate::doctype::DoctypeOracle;
use crate::escaper::Escaper;
use crate::exception::Exception;
use crate::param::{Placement, CONDITIONAL_KEY, DEFAULT_SCRIPT_TYPE, SCRIPT_OPTIONAL_ATTRIBUTES};
use crate::standalone::{Action, Standalone};
use crate::util::{indent_lines, wrap_conditional};

/// 永不输出的修饰属性
const SCRIPT_MODIFIER_KEYS: [&str; 2] = [CONDITIONAL_KEY, "noescape"];

/// 以属性名本身作为值输出的布尔属性
const SCRIPT_BOOLEAN_ATTRIBUTES: [&str; 3] = ["defer", "async", "nomodule"];

const SOURCE_INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptItem {
    File {
        src: String,
        mime_type: String,
        attributes: Vec<(String, String)>,
    },
    Script {
        source: String,
        mime_type: String,
        attributes: Vec<(String, String)>,
    },
}

impl ScriptItem {
    pub fn file(src: &str) -> Self {
        ScriptItem::File {
            src: src.to_string(),
            mime_type: DEFAULT_SCRIPT_TYPE.to_string(),
            attributes: vec![],
        }
    }

    pub fn script(source: &str) -> Self {
        ScriptItem::Script {
            source: source.to_string(),
            mime_type: DEFAULT_SCRIPT_TYPE.to_string(),
            attributes: vec![],
        }
    }

    pub fn with_type(mut self, value: &str) -> Self {
        match &mut self {
            ScriptItem::File { mime_type, .. } | ScriptItem::Script { mime_type, .. } => {
                *mime_type = value.to_string();
            }
        }
        self
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes_mut().push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes_mut()
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    fn attributes_mut(&mut self) -> &mut Vec<(String, String)> {
        match self {
            ScriptItem::File { attributes, .. } | ScriptItem::Script { attributes, .. } => attributes,
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        match self {
            ScriptItem::File { attributes, .. } | ScriptItem::Script { attributes, .. } => attributes,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            ScriptItem::File { mime_type, .. } | ScriptItem::Script { mime_type, .. } => mime_type,
        }
    }

    pub fn src(&self) -> Option<&str> {
        match self {
            ScriptItem::File { src, .. } => Some(src),
            ScriptItem::Script { .. } => None,
        }
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn is_valid(&self) -> bool {
        match self {
            ScriptItem::File { src, mime_type, .. } => !src.is_empty() && !mime_type.is_empty(),
            ScriptItem::Script { source, mime_type, .. } => !source.is_empty() && !mime_type.is_empty(),
        }
    }
}

/// 开关值：去除空白后非空且不为 `"0"` 即视为开启
fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0"
}

/// 脚本捕获开始时记录的类型与属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptHints {
    pub mime_type: String,
    pub attributes: Vec<(String, String)>,
}

pub struct HeadScript {
    base: Standalone<ScriptItem>,
    arbitrary_attributes: bool,
}

impl Deref for HeadScript {
    type Target = Standalone<ScriptItem>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for HeadScript {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl HeadScript {
    pub fn new(escaper: Rc<dyn Escaper>, doctype: Rc<dyn DoctypeOracle>) -> Self {
        let mut base = Standalone::new(escaper, doctype);
        base.set_separator("\n");
        Self {
            base,
            arbitrary_attributes: false,
        }
    }

    pub fn set_allow_arbitrary_attributes(&mut self, allow: bool) -> &mut Self {
        self.arbitrary_attributes = allow;
        self
    }

    pub fn arbitrary_attributes_allowed(&self) -> bool {
        self.arbitrary_attributes
    }

    fn dispatch(&mut self, action: Action, item: ScriptItem) -> Result<(), Exception> {
        if !item.is_valid() {
            debug!("拒绝script条目：{:?}", item);
            return Err(Exception::InvalidArgument(format!(
                "Invalid argument passed to {}(); please use one of the helper methods, {}_script() or {}_file()",
                action.name(),
                action.name(),
                action.name()
            )));
        }
        self.base.apply(action, item);
        Ok(())
    }

    pub fn append(&mut self, item: ScriptItem) -> Result<(), Exception> {
        self.dispatch(Action::Append, item)
    }

    pub fn prepend(&mut self, item: ScriptItem) -> Result<(), Exception> {
        self.dispatch(Action::Prepend, item)
    }

    pub fn set(&mut self, item: ScriptItem) -> Result<(), Exception> {
        self.dispatch(Action::Set, item)
    }

    pub fn offset_set(&mut self, index: usize, item: ScriptItem) -> Result<(), Exception> {
        self.dispatch(Action::OffsetSet(index), item)
    }

    pub fn place(&mut self, item: ScriptItem, placement: Placement) -> Result<(), Exception> {
        self.dispatch(placement.into(), item)
    }

    pub fn is_duplicate(&self, src: &str) -> bool {
        self.base.iter().any(|(_, item)| item.src() == Some(src))
    }

    /// 写入外部脚本；同一地址已存在时跳过并返回 `false`（`set` 总会替换）
    fn dispatch_file(&mut self, action: Action, item: ScriptItem) -> Result<bool, Exception> {
        if action != Action::Set {
            if let Some(src) = item.src() {
                if self.is_duplicate(src) {
                    debug!("脚本{}已存在，忽略", src);
                    return Ok(false);
                }
            }
        }
        self.dispatch(action, item)?;
        Ok(true)
    }

    pub fn append_file(&mut self, item: impl Into<ScriptItem>) -> Result<bool, Exception> {
        self.dispatch_file(Action::Append, item.into())
    }

    pub fn prepend_file(&mut self, item: impl Into<ScriptItem>) -> Result<bool, Exception> {
        self.dispatch_file(Action::Prepend, item.into())
    }

    pub fn set_file(&mut self, item: impl Into<ScriptItem>) -> Result<bool, Exception> {
        self.dispatch_file(Action::Set, item.into())
    }

    pub fn offset_set_file(&mut self, index: usize, item: impl Into<ScriptItem>) -> Result<bool, Exception> {
        self.dispatch_file(Action::OffsetSet(index), item.into())
    }

    pub fn append_script(&mut self, source: &str) -> Result<(), Exception> {
        self.append(ScriptItem::script(source))
    }

    pub fn prepend_script(&mut self, source: &str) -> Result<(), Exception> {
        self.prepend(ScriptItem::script(source))
    }

    pub fn set_script(&mut self, source: &str) -> Result<(), Exception> {
        self.set(ScriptItem::script(source))
    }

    pub fn offset_set_script(&mut self, index: usize, source: &str) -> Result<(), Exception> {
        self.offset_set(index, ScriptItem::script(source))
    }

    /// 开始捕获内联脚本，`mime_type` 缺省为 `text/javascript`
    pub fn capture_start(
        &mut self,
        mode: Placement,
        mime_type: Option<&str>,
        attributes: Vec<(String, String)>,
    ) -> Result<Capture<ScriptHints>, Exception> {
        let hints = ScriptHints {
            mime_type: mime_type.unwrap_or(DEFAULT_SCRIPT_TYPE).to_string(),
            attributes,
        };
        self.base
            .container
            .open_capture(mode, hints)
            .map_err(|_| Exception::IllegalReentry("Cannot nest headScript captures".to_string()))
    }

    pub fn capture_end(&mut self, capture: Capture<ScriptHints>) -> Result<(), Exception> {
        let Captured { mode, content, hints } = self.base.container.close_capture(capture)?;
        let item = ScriptItem::script(&content)
            .with_type(&hints.mime_type)
            .with_attributes(hints.attributes);
        self.place(item, mode)
    }

    pub fn item_to_string(&self, item: &ScriptItem) -> String {
        let mut attributes = String::new();
        if let ScriptItem::File { src, .. } = item {
            attributes.push_str(&format!(" src=\"{}\"", self.base.escape_attribute(src)));
        }
        for (key, value) in item.attributes() {
            if SCRIPT_MODIFIER_KEYS.contains(&key.as_str()) {
                continue;
            }
            if !self.arbitrary_attributes && !SCRIPT_OPTIONAL_ATTRIBUTES.contains(key.as_str()) {
                continue;
            }
            let value = if SCRIPT_BOOLEAN_ATTRIBUTES.contains(&key.as_str()) {
                key.as_str()
            } else {
                value.as_str()
            };
            attributes.push_str(&format!(" {}=\"{}\"", key, self.base.escape_attribute(value)));
        }

        let mut html = format!(
            "<script type=\"{}\"{}>",
            self.base.escape_attribute(item.mime_type()),
            attributes
        );
        if let ScriptItem::Script { source, .. } = item {
            let guard = !item.attribute("noescape").map(is_truthy).unwrap_or(false);
            let (open, close) = if self.base.doctype().is_xhtml() {
                ("//<![CDATA[", "//]]>")
            } else {
                ("//<!--", "//-->")
            };
            html.push('\n');
            if guard {
                html.push_str(SOURCE_INDENT);
                html.push_str(open);
                html.push('\n');
            }
            html.push_str(&indent_lines(source, SOURCE_INDENT));
            if guard {
                html.push('\n');
                html.push_str(SOURCE_INDENT);
                html.push_str(close);
            }
            html.push('\n');
        }
        html.push_str("</script>");

        match item.attribute(CONDITIONAL_KEY) {
            Some(condition) if !condition.is_empty() => wrap_conditional(html, condition),
            _ => html,
        }
    }

    pub fn render(&self, indent: Option<&str>) -> String {
        let items = self
            .base
            .iter()
            .map(|(_, item)| self.item_to_string(item))
            .collect();
        self.base.render_items(indent, items)
    }
}

impl From<&str> for ScriptItem {
    fn from(src: &str) -> Self {
        ScriptItem::file(src)
    }
}

impl fmt::Display for HeadScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

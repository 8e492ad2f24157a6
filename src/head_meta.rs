// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HeadMeta 助手
//!
//! 累积 `<meta>` 标签。条目是否合法取决于当前 doctype：
//! - `charset` 与 `itemprop` 只能用于 HTML5；
//! - `property` 只能用于支持 RDFa 的 doctype。
//!
//! 写入时不合法的条目直接返回错误。渲染时才发现的问题（例如 HTML5 下的
//! `scheme` 修饰，或写入之后切换了 doctype）记录一条警告，整个助手输出空串。

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use log::{debug, warn};

use crate::doctype::DoctypeOracle;
use crate::escaper::Escaper;
use crate::exception::Exception;
use crate::param::{Placement, CONDITIONAL_KEY, META_MODIFIER_KEYS};
use crate::standalone::{Action, Standalone};
use crate::util::wrap_conditional;

/// 键值型 meta 标签的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKind {
    Name,
    HttpEquiv,
    Property,
    Itemprop,
}

impl MetaKind {
    /// 标签中使用的属性名
    pub fn attribute(&self) -> &'static str {
        match self {
            MetaKind::Name => "name",
            MetaKind::HttpEquiv => "http-equiv",
            MetaKind::Property => "property",
            MetaKind::Itemprop => "itemprop",
        }
    }

    fn builder(&self) -> &'static str {
        match self {
            MetaKind::Name => "name",
            MetaKind::HttpEquiv => "http_equiv",
            MetaKind::Property => "property",
            MetaKind::Itemprop => "itemprop",
        }
    }
}

impl fmt::Display for MetaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaItem {
    Keyed {
        kind: MetaKind,
        key: String,
        content: String,
        /// `lang`、`scheme`、`conditional`，按写入顺序保存
        modifiers: Vec<(String, String)>,
    },
    Charset {
        charset: String,
    },
}

impl MetaItem {
    pub fn keyed(kind: MetaKind, key: &str, content: &str) -> Self {
        MetaItem::Keyed {
            kind,
            key: key.to_string(),
            content: content.to_string(),
            modifiers: vec![],
        }
    }

    pub fn name(key: &str, content: &str) -> Self {
        Self::keyed(MetaKind::Name, key, content)
    }

    pub fn http_equiv(key: &str, content: &str) -> Self {
        Self::keyed(MetaKind::HttpEquiv, key, content)
    }

    pub fn property(key: &str, content: &str) -> Self {
        Self::keyed(MetaKind::Property, key, content)
    }

    pub fn itemprop(key: &str, content: &str) -> Self {
        Self::keyed(MetaKind::Itemprop, key, content)
    }

    pub fn charset(charset: &str) -> Self {
        MetaItem::Charset {
            charset: charset.to_string(),
        }
    }

    /// 追加修饰属性；对 charset 条目无效
    pub fn with_modifier(mut self, key: &str, value: &str) -> Self {
        if let MetaItem::Keyed { modifiers, .. } = &mut self {
            modifiers.push((key.to_string(), value.to_string()));
        }
        self
    }

    fn modifier(&self, key: &str) -> Option<&str> {
        match self {
            MetaItem::Keyed { modifiers, .. } => modifiers
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            MetaItem::Charset { .. } => None,
        }
    }

    fn same_slot(&self, other: &MetaItem) -> bool {
        match (self, other) {
            (MetaItem::Keyed { kind: a, key: x, .. }, MetaItem::Keyed { kind: b, key: y, .. }) => {
                a == b && x == y
            }
            (MetaItem::Charset { .. }, MetaItem::Charset { .. }) => true,
            _ => false,
        }
    }
}

pub struct HeadMeta {
    base: Standalone<MetaItem>,
}

impl Deref for HeadMeta {
    type Target = Standalone<MetaItem>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for HeadMeta {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl HeadMeta {
    pub fn new(escaper: Rc<dyn Escaper>, doctype: Rc<dyn DoctypeOracle>) -> Self {
        let mut base = Standalone::new(escaper, doctype);
        base.set_separator("\n");
        Self { base }
    }

    /// 检查条目在当前 doctype 下是否合法
    fn validate(&self, action: Action, item: &MetaItem) -> Result<(), Exception> {
        let doctype = self.base.doctype();
        match item {
            MetaItem::Charset { charset } => {
                if charset.is_empty() {
                    return Err(Exception::InvalidArgument(format!(
                        "Invalid value passed to {}; please use set_charset()",
                        action.name()
                    )));
                }
                if !doctype.is_html5() {
                    return Err(Exception::DomainViolation(
                        "Meta charset is only supported by HTML5 doctypes".to_string(),
                    ));
                }
            }
            MetaItem::Keyed { kind, key, .. } => {
                if key.is_empty() {
                    return Err(Exception::InvalidArgument(format!(
                        "Invalid value passed to {}; please use {}_{}()",
                        action.name(),
                        action.name(),
                        kind.builder()
                    )));
                }
                match kind {
                    MetaKind::Itemprop if !doctype.is_html5() => {
                        return Err(Exception::DomainViolation(
                            "Meta itemprop is only supported by HTML5 doctypes".to_string(),
                        ));
                    }
                    MetaKind::Property if !doctype.is_rdfa() => {
                        return Err(Exception::DomainViolation(
                            "Meta property is only supported by RDFa doctypes".to_string(),
                        ));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, action: Action, item: MetaItem) -> Result<(), Exception> {
        if let Err(e) = self.validate(action, &item) {
            debug!("拒绝meta条目{:?}：{}", item, e);
            return Err(e);
        }
        if action == Action::Set {
            // 只替换同种类同键的条目
            self.base.container.retain(|_, existing| !existing.same_slot(&item));
            self.base.apply(Action::Append, item);
        } else {
            self.base.apply(action, item);
        }
        Ok(())
    }

    pub fn append(&mut self, item: MetaItem) -> Result<(), Exception> {
        self.dispatch(Action::Append, item)
    }

    pub fn prepend(&mut self, item: MetaItem) -> Result<(), Exception> {
        self.dispatch(Action::Prepend, item)
    }

    /// 删除同种类同键的已有条目后追加
    pub fn set(&mut self, item: MetaItem) -> Result<(), Exception> {
        self.dispatch(Action::Set, item)
    }

    pub fn offset_set(&mut self, index: usize, item: MetaItem) -> Result<(), Exception> {
        self.dispatch(Action::OffsetSet(index), item)
    }

    pub fn place(&mut self, item: MetaItem, placement: Placement) -> Result<(), Exception> {
        self.dispatch(placement.into(), item)
    }

    pub fn append_name(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.append(MetaItem::name(key, content))
    }

    pub fn prepend_name(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.prepend(MetaItem::name(key, content))
    }

    pub fn set_name(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.set(MetaItem::name(key, content))
    }

    pub fn offset_set_name(&mut self, index: usize, key: &str, content: &str) -> Result<(), Exception> {
        self.offset_set(index, MetaItem::name(key, content))
    }

    pub fn append_http_equiv(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.append(MetaItem::http_equiv(key, content))
    }

    pub fn prepend_http_equiv(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.prepend(MetaItem::http_equiv(key, content))
    }

    pub fn set_http_equiv(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.set(MetaItem::http_equiv(key, content))
    }

    pub fn offset_set_http_equiv(&mut self, index: usize, key: &str, content: &str) -> Result<(), Exception> {
        self.offset_set(index, MetaItem::http_equiv(key, content))
    }

    pub fn append_property(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.append(MetaItem::property(key, content))
    }

    pub fn prepend_property(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.prepend(MetaItem::property(key, content))
    }

    pub fn set_property(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.set(MetaItem::property(key, content))
    }

    pub fn offset_set_property(&mut self, index: usize, key: &str, content: &str) -> Result<(), Exception> {
        self.offset_set(index, MetaItem::property(key, content))
    }

    pub fn append_itemprop(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.append(MetaItem::itemprop(key, content))
    }

    pub fn prepend_itemprop(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.prepend(MetaItem::itemprop(key, content))
    }

    pub fn set_itemprop(&mut self, key: &str, content: &str) -> Result<(), Exception> {
        self.set(MetaItem::itemprop(key, content))
    }

    pub fn offset_set_itemprop(&mut self, index: usize, key: &str, content: &str) -> Result<(), Exception> {
        self.offset_set(index, MetaItem::itemprop(key, content))
    }

    /// 设置页面字符集，替换已有的 charset 条目
    pub fn set_charset(&mut self, charset: &str) -> Result<(), Exception> {
        self.set(MetaItem::charset(charset))
    }

    pub fn item_to_string(&self, item: &MetaItem) -> Result<String, Exception> {
        self.validate(Action::Append, item)?;
        let doctype = self.base.doctype();
        let markup = match item {
            MetaItem::Charset { charset } => {
                let close = if doctype.is_xhtml() { "\"/>" } else { "\">" };
                format!("<meta charset=\"{}{}", self.base.escape_attribute(charset), close)
            }
            MetaItem::Keyed {
                kind,
                key,
                content,
                modifiers,
            } => {
                let mut rendered_modifiers = String::new();
                for (name, value) in modifiers {
                    if !META_MODIFIER_KEYS.contains(&name.as_str()) {
                        continue;
                    }
                    if name == "scheme" && doctype.is_html5() {
                        return Err(Exception::InvalidArgument(
                            "Invalid modifier \"scheme\" provided; not supported by HTML5".to_string(),
                        ));
                    }
                    rendered_modifiers.push_str(&format!(
                        " {}=\"{}\"",
                        name,
                        self.base.escape_attribute(value)
                    ));
                }
                format!(
                    "<meta {}=\"{}\" content=\"{}\"{}{}",
                    kind.attribute(),
                    self.base.escape_attribute(key),
                    self.base.escape_attribute(content),
                    rendered_modifiers,
                    if doctype.is_xhtml() { " />" } else { ">" }
                )
            }
        };

        match item.modifier(CONDITIONAL_KEY) {
            Some(condition) if !condition.is_empty() => Ok(wrap_conditional(markup, condition)),
            _ => Ok(markup),
        }
    }

    pub fn render(&self, indent: Option<&str>) -> String {
        let hoist_charset = self.base.doctype().is_html5();
        let mut items = Vec::with_capacity(self.base.len());
        let mut hoisted = 0;
        for (_, item) in self.base.iter() {
            let markup = match self.item_to_string(item) {
                Ok(markup) => markup,
                Err(e) => {
                    warn!("meta标签渲染失败，输出为空：{}", e);
                    return String::new();
                }
            };
            if markup.is_empty() {
                continue;
            }
            if hoist_charset && matches!(item, MetaItem::Charset { .. }) {
                items.insert(hoisted, markup);
                hoisted += 1;
            } else {
                items.push(markup);
            }
        }
        self.base.render_items(indent, items)
    }
}

impl fmt::Display for HeadMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

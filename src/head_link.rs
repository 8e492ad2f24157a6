// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HeadLink 助手
//!
//! 累积 `<link>` 标签：样式表、备用链接、前后页以及任意自定义链接。
//! 重复的样式表地址会被静默忽略。

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use log::debug;

use crate::doctype::DoctypeOracle;
use crate::escaper::Escaper;
use crate::exception::Exception;
use crate::param::{Placement, DEFAULT_STYLESHEET_MEDIA, DEFAULT_STYLESHEET_TYPE, LINK_ITEM_KEYS};
use crate::standalone::{Action, Standalone};
use crate::util::wrap_conditional;

/// 附加属性，按写入顺序输出在 `title` 之后
pub type Extras = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub href: String,
    pub media: String,
    pub conditional: Option<String>,
    pub extras: Extras,
}

impl Stylesheet {
    pub fn new(href: &str) -> Self {
        Self {
            href: href.to_string(),
            media: DEFAULT_STYLESHEET_MEDIA.to_string(),
            conditional: None,
            extras: vec![],
        }
    }

    pub fn with_media(mut self, media: &str) -> Self {
        self.media = media.to_string();
        self
    }

    /// 多个媒体类型以逗号连接
    pub fn with_media_list(mut self, media: &[&str]) -> Self {
        self.media = media.join(",");
        self
    }

    pub fn with_conditional(mut self, condition: &str) -> Self {
        self.conditional = Some(condition.to_string());
        self
    }

    pub fn with_extra(mut self, key: &str, value: &str) -> Self {
        self.extras.push((key.to_string(), value.to_string()));
        self
    }
}

impl From<&str> for Stylesheet {
    fn from(href: &str) -> Self {
        Stylesheet::new(href)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternate {
    pub href: String,
    pub mime_type: String,
    pub title: String,
    pub extras: Extras,
}

impl Alternate {
    pub fn new(href: &str, mime_type: &str, title: &str) -> Self {
        Self {
            href: href.to_string(),
            mime_type: mime_type.to_string(),
            title: title.to_string(),
            extras: vec![],
        }
    }

    pub fn with_extra(mut self, key: &str, value: &str) -> Self {
        self.extras.push((key.to_string(), value.to_string()));
        self
    }
}

/// `<link>` 条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkItem {
    Stylesheet(Stylesheet),
    Alternate(Alternate),
    Next { href: String },
    Prev { href: String },
    /// 任意属性（例如 `rel="icon"`），只输出已知的链接属性
    Custom {
        attributes: Vec<(String, String)>,
        conditional: Option<String>,
    },
}

impl LinkItem {
    pub fn stylesheet(href: &str) -> Self {
        LinkItem::Stylesheet(Stylesheet::new(href))
    }

    pub fn alternate(href: &str, mime_type: &str, title: &str) -> Self {
        LinkItem::Alternate(Alternate::new(href, mime_type, title))
    }

    pub fn next(href: &str) -> Self {
        LinkItem::Next {
            href: href.to_string(),
        }
    }

    pub fn prev(href: &str) -> Self {
        LinkItem::Prev {
            href: href.to_string(),
        }
    }

    pub fn custom<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        LinkItem::Custom {
            attributes: attributes.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            conditional: None,
        }
    }

    /// 读取某个已知属性的值
    fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            LinkItem::Stylesheet(s) => match key {
                "href" => Some(&s.href),
                "media" => Some(&s.media),
                "rel" => Some("stylesheet"),
                "type" => Some(DEFAULT_STYLESHEET_TYPE),
                _ => None,
            },
            LinkItem::Alternate(a) => match key {
                "href" => Some(&a.href),
                "rel" => Some("alternate"),
                "type" => Some(&a.mime_type),
                "title" => Some(&a.title),
                _ => None,
            },
            LinkItem::Next { href } => match key {
                "href" => Some(href),
                "rel" => Some("next"),
                _ => None,
            },
            LinkItem::Prev { href } => match key {
                "href" => Some(href),
                "rel" => Some("prev"),
                _ => None,
            },
            LinkItem::Custom { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
        }
    }

    fn extras(&self) -> &[(String, String)] {
        match self {
            LinkItem::Stylesheet(s) => &s.extras,
            LinkItem::Alternate(a) => &a.extras,
            _ => &[],
        }
    }

    pub fn rel(&self) -> Option<&str> {
        self.attribute("rel")
    }

    pub fn href(&self) -> Option<&str> {
        self.attribute("href")
    }

    pub fn conditional(&self) -> Option<&str> {
        match self {
            LinkItem::Stylesheet(s) => s.conditional.as_deref(),
            LinkItem::Custom { conditional, .. } => conditional.as_deref(),
            _ => None,
        }
    }

    /// 按规范顺序排列的属性，附加属性紧随 `title`
    pub fn ordered_attributes(&self) -> Vec<(&str, &str)> {
        let mut attributes = Vec::new();
        for key in LINK_ITEM_KEYS {
            if let Some(value) = self.attribute(key) {
                attributes.push((key, value));
            }
            if key == "title" {
                for (k, v) in self.extras() {
                    attributes.push((k.as_str(), v.as_str()));
                }
            }
        }
        attributes
    }

    fn is_valid(&self) -> bool {
        match self {
            LinkItem::Stylesheet(_) | LinkItem::Alternate(_) | LinkItem::Next { .. } | LinkItem::Prev { .. } => true,
            LinkItem::Custom { attributes, .. } => attributes
                .iter()
                .any(|(k, _)| LINK_ITEM_KEYS.contains(&k.as_str())),
        }
    }
}

impl From<Stylesheet> for LinkItem {
    fn from(s: Stylesheet) -> Self {
        LinkItem::Stylesheet(s)
    }
}

impl From<Alternate> for LinkItem {
    fn from(a: Alternate) -> Self {
        LinkItem::Alternate(a)
    }
}

pub struct HeadLink {
    base: Standalone<LinkItem>,
}

impl Deref for HeadLink {
    type Target = Standalone<LinkItem>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for HeadLink {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl HeadLink {
    pub fn new(escaper: Rc<dyn Escaper>, doctype: Rc<dyn DoctypeOracle>) -> Self {
        let mut base = Standalone::new(escaper, doctype);
        base.set_separator("\n");
        Self { base }
    }

    fn dispatch(&mut self, action: Action, item: LinkItem) -> Result<(), Exception> {
        if !item.is_valid() {
            debug!("拒绝不含已知属性的link条目：{:?}", item);
            return Err(Exception::InvalidArgument(format!(
                "{}() expects a link item with at least one known attribute; please use one of the custom {}_stylesheet(), {}_alternate() methods",
                action.name(),
                action.name(),
                action.name()
            )));
        }
        self.base.apply(action, item);
        Ok(())
    }

    pub fn append(&mut self, item: LinkItem) -> Result<(), Exception> {
        self.dispatch(Action::Append, item)
    }

    pub fn prepend(&mut self, item: LinkItem) -> Result<(), Exception> {
        self.dispatch(Action::Prepend, item)
    }

    pub fn set(&mut self, item: LinkItem) -> Result<(), Exception> {
        self.dispatch(Action::Set, item)
    }

    pub fn offset_set(&mut self, index: usize, item: LinkItem) -> Result<(), Exception> {
        self.dispatch(Action::OffsetSet(index), item)
    }

    /// 不带方法名的调用形式
    pub fn place(&mut self, item: LinkItem, placement: Placement) -> Result<(), Exception> {
        self.dispatch(placement.into(), item)
    }

    pub fn is_duplicate_stylesheet(&self, href: &str) -> bool {
        self.base
            .iter()
            .any(|(_, item)| item.rel() == Some("stylesheet") && item.href() == Some(href))
    }

    /// 写入样式表；地址重复时不做任何事并返回 `false`
    fn dispatch_stylesheet(&mut self, action: Action, stylesheet: Stylesheet) -> Result<bool, Exception> {
        if self.is_duplicate_stylesheet(&stylesheet.href) {
            debug!("样式表{}已存在，忽略", stylesheet.href);
            return Ok(false);
        }
        self.dispatch(action, LinkItem::Stylesheet(stylesheet))?;
        Ok(true)
    }

    pub fn append_stylesheet(&mut self, stylesheet: impl Into<Stylesheet>) -> Result<bool, Exception> {
        self.dispatch_stylesheet(Action::Append, stylesheet.into())
    }

    pub fn prepend_stylesheet(&mut self, stylesheet: impl Into<Stylesheet>) -> Result<bool, Exception> {
        self.dispatch_stylesheet(Action::Prepend, stylesheet.into())
    }

    pub fn set_stylesheet(&mut self, stylesheet: impl Into<Stylesheet>) -> Result<bool, Exception> {
        self.dispatch_stylesheet(Action::Set, stylesheet.into())
    }

    pub fn offset_set_stylesheet(
        &mut self,
        index: usize,
        stylesheet: impl Into<Stylesheet>,
    ) -> Result<bool, Exception> {
        self.dispatch_stylesheet(Action::OffsetSet(index), stylesheet.into())
    }

    pub fn append_alternate(&mut self, alternate: Alternate) -> Result<(), Exception> {
        self.dispatch(Action::Append, alternate.into())
    }

    pub fn prepend_alternate(&mut self, alternate: Alternate) -> Result<(), Exception> {
        self.dispatch(Action::Prepend, alternate.into())
    }

    pub fn set_alternate(&mut self, alternate: Alternate) -> Result<(), Exception> {
        self.dispatch(Action::Set, alternate.into())
    }

    pub fn offset_set_alternate(&mut self, index: usize, alternate: Alternate) -> Result<(), Exception> {
        self.dispatch(Action::OffsetSet(index), alternate.into())
    }

    pub fn append_next(&mut self, href: &str) -> Result<(), Exception> {
        self.dispatch(Action::Append, LinkItem::next(href))
    }

    pub fn append_prev(&mut self, href: &str) -> Result<(), Exception> {
        self.dispatch(Action::Append, LinkItem::prev(href))
    }

    pub fn item_to_string(&self, item: &LinkItem) -> String {
        let attributes = item.ordered_attributes();
        if attributes.is_empty() {
            return String::new();
        }
        let mut link = String::from("<link");
        for (key, value) in attributes {
            link.push_str(&format!(" {}=\"{}\"", key, self.base.escape_attribute(value)));
        }
        link.push_str(if self.base.doctype().is_xhtml() { " />" } else { ">" });

        match item.conditional() {
            Some(condition) if !condition.is_empty() => wrap_conditional(link, condition),
            _ => link,
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

impl fmt::Display for HeadLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

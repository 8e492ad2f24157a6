// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HeadStyle 助手
//!
//! 累积内联 `<style>` 块，`media` 属性按合法媒体类型过滤。

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use log::debug;

use crate::container::{Capture, Captured};
use crate::doctype::DoctypeOracle;
use crate::escaper::Escaper;
use crate::exception::Exception;
use crate::param::{Placement, CONDITIONAL_KEY, MEDIA_TYPES, STYLE_OPTIONAL_ATTRIBUTES};
use crate::standalone::{Action, Standalone};
use crate::util::wrap_conditional;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleItem {
    pub content: String,
    pub attributes: Vec<(String, String)>,
}

impl StyleItem {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            attributes: vec![],
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes
            .extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl From<&str> for StyleItem {
    fn from(content: &str) -> Self {
        StyleItem::new(content)
    }
}

/// 去掉不合法的媒体类型；逗号分隔的列表逐项过滤
pub fn filter_media(value: &str) -> Option<String> {
    let kept: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|media| MEDIA_TYPES.contains(*media))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(","))
    }
}

pub struct HeadStyle {
    base: Standalone<StyleItem>,
}

impl Deref for HeadStyle {
    type Target = Standalone<StyleItem>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for HeadStyle {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl HeadStyle {
    pub fn new(escaper: Rc<dyn Escaper>, doctype: Rc<dyn DoctypeOracle>) -> Self {
        let mut base = Standalone::new(escaper, doctype);
        base.set_separator("\n");
        Self { base }
    }

    fn dispatch(&mut self, action: Action, item: StyleItem) -> Result<(), Exception> {
        if item.content.is_empty() {
            debug!("拒绝空的style条目");
            return Err(Exception::InvalidArgument(format!(
                "Invalid value passed to {}; please use {}_style()",
                action.name(),
                action.name()
            )));
        }
        self.base.apply(action, item);
        Ok(())
    }

    pub fn append(&mut self, item: StyleItem) -> Result<(), Exception> {
        self.dispatch(Action::Append, item)
    }

    pub fn prepend(&mut self, item: StyleItem) -> Result<(), Exception> {
        self.dispatch(Action::Prepend, item)
    }

    pub fn set(&mut self, item: StyleItem) -> Result<(), Exception> {
        self.dispatch(Action::Set, item)
    }

    pub fn offset_set(&mut self, index: usize, item: StyleItem) -> Result<(), Exception> {
        self.dispatch(Action::OffsetSet(index), item)
    }

    pub fn place(&mut self, item: StyleItem, placement: Placement) -> Result<(), Exception> {
        self.dispatch(placement.into(), item)
    }

    pub fn append_style(&mut self, item: impl Into<StyleItem>) -> Result<(), Exception> {
        self.append(item.into())
    }

    pub fn prepend_style(&mut self, item: impl Into<StyleItem>) -> Result<(), Exception> {
        self.prepend(item.into())
    }

    pub fn set_style(&mut self, item: impl Into<StyleItem>) -> Result<(), Exception> {
        self.set(item.into())
    }

    pub fn offset_set_style(&mut self, index: usize, item: impl Into<StyleItem>) -> Result<(), Exception> {
        self.offset_set(index, item.into())
    }

    pub fn capture_start(
        &mut self,
        mode: Placement,
        attributes: Vec<(String, String)>,
    ) -> Result<Capture<Vec<(String, String)>>, Exception> {
        self.base
            .container
            .open_capture(mode, attributes)
            .map_err(|_| Exception::IllegalReentry("Cannot nest headStyle captures".to_string()))
    }

    pub fn capture_end(&mut self, capture: Capture<Vec<(String, String)>>) -> Result<(), Exception> {
        let Captured { mode, content, hints } = self.base.container.close_capture(capture)?;
        self.place(StyleItem::new(&content).with_attributes(hints), mode)
    }

    pub fn item_to_string(&self, item: &StyleItem) -> String {
        let escaper = self.base.escaper();
        let mut attributes = String::new();
        for (key, value) in &item.attributes {
            if !STYLE_OPTIONAL_ATTRIBUTES.contains(&key.as_str()) {
                continue;
            }
            let value = if key == "media" {
                match filter_media(value) {
                    Some(media) => media,
                    None => continue,
                }
            } else {
                value.clone()
            };
            attributes.push_str(&format!(" {}=\"{}\"", key, escaper.escape_html(&value)));
        }

        let condition = item.attribute(CONDITIONAL_KEY).filter(|c| !c.is_empty());
        let body = if condition.is_some() {
            format!("{}\n", item.content)
        } else {
            format!("<!--\n{}\n-->\n", item.content)
        };
        let html = format!("<style type=\"text/css\"{}>\n{}</style>", attributes, body);

        match condition {
            Some(condition) => wrap_conditional(html, condition),
            None => html,
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

impl fmt::Display for HeadStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctype::Doctype;
    use crate::escaper::HtmlEscaper;

    fn helper() -> HeadStyle {
        HeadStyle::new(Rc::new(HtmlEscaper::new()), Rc::new(Doctype::Html5))
    }

    #[test]
    fn test_style_markup() {
        let mut style = helper();
        style.append_style("a { color: red; }").unwrap();
        assert_eq!(
            style.to_string(),
            "<style type=\"text/css\">\n<!--\na { color: red; }\n-->\n</style>"
        );
    }

    #[test]
    fn test_media_filtering() {
        assert_eq!(filter_media("screen"), Some("screen".to_string()));
        assert_eq!(filter_media("screen, bogus ,print"), Some("screen,print".to_string()));
        assert_eq!(filter_media("bogus"), None);
    }

    #[test]
    fn test_attributes_filtered() {
        let mut style = helper();
        style
            .append_style(
                StyleItem::new("p {}")
                    .with_attribute("media", "print,nope")
                    .with_attribute("id", "x")
                    .with_attribute("title", "Print & Co"),
            )
            .unwrap();
        assert!(style
            .to_string()
            .starts_with("<style type=\"text/css\" media=\"print\" title=\"Print &amp; Co\">\n"));
    }

    #[test]
    fn test_invalid_media_dropped() {
        let mut style = helper();
        style
            .append_style(StyleItem::new("p {}").with_attribute("media", "hologram"))
            .unwrap();
        assert!(style.to_string().starts_with("<style type=\"text/css\">\n"));
    }

    #[test]
    fn test_conditional_drops_comment_guard() {
        let mut style = helper();
        style
            .append_style(StyleItem::new("p {}").with_attribute("conditional", "lt IE 7"))
            .unwrap();
        assert_eq!(
            style.to_string(),
            "<!--[if lt IE 7]><style type=\"text/css\">\np {}\n</style><![endif]-->"
        );
    }

    #[test]
    fn test_capture_modes() {
        let mut style = helper();
        style.append_style("b {}").unwrap();
        let mut cap = style.capture_start(Placement::Prepend, vec![]).unwrap();
        cap.write_str("a {}");
        style.capture_end(cap).unwrap();
        let contents: Vec<&str> = style.iter().map(|(_, i)| i.content.as_str()).collect();
        assert_eq!(contents, vec!["a {}", "b {}"]);

        let mut cap = style
            .capture_start(Placement::Set, vec![("media".to_string(), "print".to_string())])
            .unwrap();
        cap.write_str("c {}");
        style.capture_end(cap).unwrap();
        assert_eq!(style.len(), 1);
        assert!(style.to_string().contains("media=\"print\""));
    }

    #[test]
    fn test_capture_end_on_other_helper_rejected() {
        let mut first = helper();
        let mut second = helper();
        let mut cap = first.capture_start(Placement::Append, vec![]).unwrap();
        cap.write_str("p {}");
        assert!(matches!(second.capture_end(cap), Err(Exception::InvalidArgument(_))));
        assert!(second.is_empty());
        assert!(!first.is_capturing());
        let cap = first.capture_start(Placement::Set, vec![]).unwrap();
        drop(cap);
        assert!(!first.is_capturing());
        assert!(first.is_empty());
    }

    #[test]
    fn test_nested_capture_rejected() {
        let mut style = helper();
        let _cap = style.capture_start(Placement::Append, vec![]).unwrap();
        match style.capture_start(Placement::Append, vec![]) {
            Err(Exception::IllegalReentry(m)) => assert_eq!(m, "Cannot nest headStyle captures"),
            other => panic!("Expected IllegalReentry, got {:?}", other.map(|c| c.contents().to_string())),
        }
    }

    #[test]
    fn test_empty_content_rejected() {
        let mut style = helper();
        assert!(matches!(style.append_style(""), Err(Exception::InvalidArgument(_))));
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HeadTitle 助手
//!
//! 页面标题由多个片段组成，渲染时依次经过翻译回调、分隔符连接、前后缀包装，
//! 最后整体转义。

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::doctype::DoctypeOracle;
use crate::escaper::Escaper;
use crate::exception::Exception;
use crate::param::Placement;
use crate::standalone::{Action, Standalone};

/// 标题片段的翻译回调
pub type Translator = Box<dyn Fn(&str) -> String>;

pub struct HeadTitle {
    base: Standalone<String>,
    default_attach_order: Placement,
    translator: Option<Translator>,
}

impl Deref for HeadTitle {
    type Target = Standalone<String>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl DerefMut for HeadTitle {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}

impl HeadTitle {
    pub fn new(escaper: Rc<dyn Escaper>, doctype: Rc<dyn DoctypeOracle>) -> Self {
        Self {
            base: Standalone::new(escaper, doctype),
            default_attach_order: Placement::default(),
            translator: None,
        }
    }

    pub fn set_default_attach_order(&mut self, placement: Placement) -> &mut Self {
        self.default_attach_order = placement;
        self
    }

    /// 以名称（`APPEND`、`PREPEND`、`SET`）设置默认放置方式
    pub fn set_default_attach_order_name(&mut self, name: &str) -> Result<&mut Self, Exception> {
        self.default_attach_order = name.parse()?;
        Ok(self)
    }

    pub fn default_attach_order(&self) -> Placement {
        self.default_attach_order
    }

    pub fn set_translator(&mut self, translator: Translator) -> &mut Self {
        self.translator = Some(translator);
        self
    }

    pub fn clear_translator(&mut self) -> &mut Self {
        self.translator = None;
        self
    }

    /// 写入一个标题片段。空标题被忽略；未指定放置方式时使用默认值。
    pub fn place(&mut self, title: &str, placement: Option<Placement>) -> &mut Self {
        if !title.is_empty() {
            let placement = placement.unwrap_or(self.default_attach_order);
            self.base.apply(placement.into(), title.to_string());
        }
        self
    }

    pub fn append(&mut self, title: &str) -> &mut Self {
        self.place(title, Some(Placement::Append))
    }

    pub fn prepend(&mut self, title: &str) -> &mut Self {
        self.place(title, Some(Placement::Prepend))
    }

    pub fn set(&mut self, title: &str) -> &mut Self {
        self.place(title, Some(Placement::Set))
    }

    pub fn offset_set(&mut self, index: usize, title: &str) -> &mut Self {
        self.base.apply(Action::OffsetSet(index), title.to_string());
        self
    }

    pub fn render_title(&self) -> String {
        let segments: Vec<String> = self
            .base
            .iter()
            .map(|(_, item)| match &self.translator {
                Some(translate) => translate(item),
                None => item.clone(),
            })
            .collect();
        let output = format!(
            "{}{}{}",
            self.base.prefix(),
            segments.join(self.base.separator()),
            self.base.postfix()
        );
        self.base.escape(&output)
    }

    pub fn render(&self, indent: Option<&str>) -> String {
        let indent = indent.unwrap_or(self.base.indent());
        format!("{}<title>{}</title>", indent, self.render_title())
    }
}

impl fmt::Display for HeadTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctype::Doctype;
    use crate::escaper::HtmlEscaper;

    fn helper() -> HeadTitle {
        HeadTitle::new(Rc::new(HtmlEscaper::new()), Rc::new(Doctype::Html5))
    }

    #[test]
    fn test_prefix_postfix() {
        let mut title = helper();
        title.set_prefix("Prefix: ").set_postfix(" :Postfix");
        title.place("Some Title", None);
        assert_eq!(title.render_title(), "Prefix: Some Title :Postfix");
        assert_eq!(title.to_string(), "<title>Prefix: Some Title :Postfix</title>");
    }

    #[test]
    fn test_escaping_whole_title() {
        let mut title = helper();
        title.set_prefix("<b>");
        title.append("A & B");
        assert_eq!(title.render_title(), "&lt;b&gt;A &amp; B");
        title.set_auto_escape(false);
        assert_eq!(title.render_title(), "<b>A & B");
    }

    #[test]
    fn test_separator_and_default_order() {
        let mut title = helper();
        title.set_separator(" - ");
        title.place("Page", None);
        title.set_default_attach_order(Placement::Prepend);
        title.place("Site", None);
        assert_eq!(title.render_title(), "Site - Page");
        title.set_default_attach_order(Placement::Set);
        title.place("Only", None);
        assert_eq!(title.render_title(), "Only");
    }

    #[test]
    fn test_attach_order_by_name() {
        let mut title = helper();
        title.set_default_attach_order_name("prepend").unwrap();
        assert_eq!(title.default_attach_order(), Placement::Prepend);
        assert!(matches!(
            title.set_default_attach_order_name("sideways"),
            Err(Exception::DomainViolation(_))
        ));
        assert_eq!(title.default_attach_order(), Placement::Prepend);
    }

    #[test]
    fn test_empty_title_ignored() {
        let mut title = helper();
        title.place("", Some(Placement::Set)).place("Kept", None);
        title.place("", Some(Placement::Set));
        assert_eq!(title.render_title(), "Kept");
    }

    #[test]
    fn test_translator_per_segment() {
        let mut title = helper();
        title.set_separator(" | ");
        title.append("home").append("blog");
        title.set_translator(Box::new(|s| s.to_uppercase()));
        assert_eq!(title.render_title(), "HOME | BLOG");
        title.clear_translator();
        assert_eq!(title.render_title(), "home | blog");
    }

    #[test]
    fn test_render_with_indent() {
        let mut title = helper();
        title.append("T");
        assert_eq!(title.render(Some("    ")), "    <title>T</title>");
    }
}

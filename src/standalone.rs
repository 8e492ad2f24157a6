// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # head 助手公共部分
//!
//! 每个 head 助手都持有一个 [`Container`]、一个转义器、一个 doctype 查询接口以及
//! 自动转义开关。[`Standalone`] 只对外暴露不会破坏条目合法性的操作，
//! 条目的写入由各助手在校验之后完成。

use std::rc::Rc;

use crate::container::Container;
use crate::doctype::DoctypeOracle;
use crate::escaper::Escaper;
use crate::exception::Exception;
use crate::param::Placement;
use crate::util::indent_lines;

/// 条目写入动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Append,
    Prepend,
    Set,
    OffsetSet(usize),
}

impl Action {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Action::Append => "append",
            Action::Prepend => "prepend",
            Action::Set => "set",
            Action::OffsetSet(_) => "offset_set",
        }
    }
}

impl From<Placement> for Action {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Append => Action::Append,
            Placement::Prepend => Action::Prepend,
            Placement::Set => Action::Set,
        }
    }
}

pub struct Standalone<T> {
    pub(crate) container: Container<T>,
    escaper: Rc<dyn Escaper>,
    doctype: Rc<dyn DoctypeOracle>,
    auto_escape: bool,
}

impl<T> Standalone<T> {
    pub fn new(escaper: Rc<dyn Escaper>, doctype: Rc<dyn DoctypeOracle>) -> Self {
        Self {
            container: Container::new(),
            escaper,
            doctype,
            auto_escape: true,
        }
    }

    pub fn escaper(&self) -> &dyn Escaper {
        self.escaper.as_ref()
    }

    pub fn doctype(&self) -> &dyn DoctypeOracle {
        self.doctype.as_ref()
    }

    /// 关闭后属性值原样输出（例如查询串中的 `&`），由调用方自行承担风险
    pub fn set_auto_escape(&mut self, auto_escape: bool) -> &mut Self {
        self.auto_escape = auto_escape;
        self
    }

    pub fn auto_escape(&self) -> bool {
        self.auto_escape
    }

    pub fn escape(&self, text: &str) -> String {
        if self.auto_escape {
            self.escaper.escape_html(text)
        } else {
            text.to_string()
        }
    }

    pub fn escape_attribute(&self, text: &str) -> String {
        if self.auto_escape {
            self.escaper.escape_html_attr(text)
        } else {
            text.to_string()
        }
    }

    pub fn set_separator(&mut self, separator: &str) -> &mut Self {
        self.container.set_separator(separator);
        self
    }

    pub fn separator(&self) -> &str {
        self.container.separator()
    }

    pub fn set_indent(&mut self, indent: &str) -> &mut Self {
        self.container.set_indent(indent);
        self
    }

    pub fn set_indent_width(&mut self, width: usize) -> &mut Self {
        self.container.set_indent_width(width);
        self
    }

    pub fn indent(&self) -> &str {
        self.container.indent()
    }

    pub fn set_prefix(&mut self, prefix: &str) -> &mut Self {
        self.container.set_prefix(prefix);
        self
    }

    pub fn prefix(&self) -> &str {
        self.container.prefix()
    }

    pub fn set_postfix(&mut self, postfix: &str) -> &mut Self {
        self.container.set_postfix(postfix);
        self
    }

    pub fn postfix(&self) -> &str {
        self.container.postfix()
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn keys(&self) -> Vec<usize> {
        self.container.keys()
    }

    pub fn get_value(&self) -> Option<&T> {
        self.container.get_value()
    }

    pub fn offset_get(&self, index: usize) -> Option<&T> {
        self.container.offset_get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.container.iter()
    }

    pub fn is_capturing(&self) -> bool {
        self.container.is_capturing()
    }

    pub fn offset_unset(&mut self, index: usize) -> Result<T, Exception> {
        self.container.offset_unset(index).ok_or_else(|| {
            Exception::InvalidArgument("Invalid index passed to offset_unset()".to_string())
        })
    }

    pub fn clear(&mut self) {
        self.container.clear();
    }

    /// 校验通过后执行写入动作
    pub(crate) fn apply(&mut self, action: Action, item: T) {
        match action {
            Action::Append => self.container.append(item),
            Action::Prepend => self.container.prepend(item),
            Action::Set => self.container.set(item),
            Action::OffsetSet(index) => self.container.offset_set(index, item),
        }
    }

    /// 已渲染的条目用转义后的分隔符连接，并在开头与每个换行之后插入缩进
    pub(crate) fn render_items(&self, indent: Option<&str>, items: Vec<String>) -> String {
        let indent = indent.unwrap_or(self.container.indent());
        let body = items.join(&self.escape(self.container.separator()));
        indent_lines(&body, indent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctype::Doctype;
    use crate::escaper::HtmlEscaper;

    fn standalone() -> Standalone<String> {
        Standalone::new(Rc::new(HtmlEscaper::new()), Rc::new(Doctype::Html5))
    }

    #[test]
    fn test_escape_honours_auto_escape() {
        let mut s = standalone();
        assert_eq!(s.escape("a&b"), "a&amp;b");
        assert_eq!(s.escape_attribute("a&b"), "a&amp;b");
        s.set_auto_escape(false);
        assert_eq!(s.escape("a&b"), "a&b");
        assert_eq!(s.escape_attribute("?a=1&b=2"), "?a=1&b=2");
    }

    #[test]
    fn test_apply_actions() {
        let mut s = standalone();
        s.apply(Action::Append, "b".to_string());
        s.apply(Action::Prepend, "a".to_string());
        s.apply(Action::OffsetSet(10), "z".to_string());
        assert_eq!(s.keys(), vec![0, 1, 10]);
        s.apply(Action::Set, "only".to_string());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_offset_unset_unknown_index() {
        let mut s = standalone();
        s.apply(Action::Append, "a".to_string());
        assert_eq!(s.offset_unset(0).unwrap(), "a");
        match s.offset_unset(0) {
            Err(Exception::InvalidArgument(m)) => assert!(m.contains("Invalid index")),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_render_items_indents_each_line() {
        let mut s = standalone();
        s.set_separator("\n").set_indent_width(4);
        let out = s.render_items(None, vec!["<a>".to_string(), "<b>".to_string()]);
        assert_eq!(out, "    <a>\n    <b>");
        let out = s.render_items(Some(""), vec!["<a>".to_string(), "<b>".to_string()]);
        assert_eq!(out, "<a>\n<b>");
    }

    #[test]
    fn test_action_from_placement() {
        assert_eq!(Action::from(Placement::Prepend), Action::Prepend);
        assert_eq!(Action::OffsetSet(3).name(), "offset_set");
    }
}

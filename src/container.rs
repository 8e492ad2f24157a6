// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 有序容器
//!
//! [`Container`] 是占位符与各 head 助手共用的累积缓冲区：
//! - 条目按整数下标存放，同一下标至多一个条目，写入已占用的下标会直接替换。
//! - 渲染顺序按下标升序，而不是插入时间。
//! - 捕获模式通过 [`Capture`] 写入器收集模板输出，结束时转换为一个条目。
//!   同一容器同一时刻只允许一个捕获会话。

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::exception::Exception;
use crate::param::Placement;
use crate::util::{indent_lines, whitespace};

/// 捕获会话返回给调用方的写入器。
///
/// 调用方直接向其写入文本，结束时交还给开启它的容器的 `capture_end`。
/// 写入器与容器共享同一把锁；未交还就被丢弃时锁随之释放，捕获内容作废。
#[derive(Debug)]
pub struct Capture<H> {
    buffer: String,
    mode: Placement,
    hints: Option<H>,
    lock: Rc<Cell<bool>>,
}

impl<H> Capture<H> {
    pub fn write_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn mode(&self) -> Placement {
        self.mode
    }

    pub fn hints(&self) -> Option<&H> {
        self.hints.as_ref()
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }
}

impl<H> Drop for Capture<H> {
    fn drop(&mut self) {
        self.lock.set(false);
    }
}

impl<H> fmt::Write for Capture<H> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

/// 已结束的捕获：落地方式、捕获到的文本以及开始时记录的提示信息
#[derive(Debug)]
pub struct Captured<H> {
    pub mode: Placement,
    pub content: String,
    pub hints: H,
}

#[derive(Debug)]
pub struct Container<T> {
    items: BTreeMap<usize, T>,
    separator: String,
    prefix: String,
    postfix: String,
    indent: String,
    capture_lock: Rc<Cell<bool>>,
}

/// 副本拥有自己的捕获锁，且不处于捕获状态
impl<T: Clone> Clone for Container<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            separator: self.separator.clone(),
            prefix: self.prefix.clone(),
            postfix: self.postfix.clone(),
            indent: self.indent.clone(),
            capture_lock: Rc::new(Cell::new(false)),
        }
    }
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Container<T> {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            separator: String::new(),
            prefix: String::new(),
            postfix: String::new(),
            indent: String::new(),
            capture_lock: Rc::new(Cell::new(false)),
        }
    }

    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut container = Self::new();
        for item in items {
            container.append(item);
        }
        container
    }

    /// 下一个追加位置：最大下标加一，空容器为 0；最大下标已是 `usize::MAX` 时为 `None`
    pub fn next_index(&self) -> Option<usize> {
        match self.items.keys().next_back() {
            Some(last) => last.checked_add(1),
            None => Some(0),
        }
    }

    /// 追加到末尾。下标用尽时先把已有条目按顺序重新编号为 0..n
    pub fn append(&mut self, item: T) {
        let index = match self.next_index() {
            Some(index) => index,
            None => {
                debug!("下标已达上限，重新编号{}个条目", self.items.len());
                self.renumber();
                self.items.len()
            }
        };
        self.items.insert(index, item);
    }

    fn renumber(&mut self) {
        let old = std::mem::take(&mut self.items);
        self.items = old.into_values().enumerate().collect();
    }

    /// 新条目放到 0 号位，原有条目按顺序重新编号为 1..n
    pub fn prepend(&mut self, item: T) {
        let old = std::mem::take(&mut self.items);
        self.items.insert(0, item);
        for (i, existing) in old.into_values().enumerate() {
            self.items.insert(i + 1, existing);
        }
    }

    /// 清空后只保留这一个条目
    pub fn set(&mut self, item: T) {
        self.items.clear();
        self.items.insert(0, item);
    }

    pub fn offset_set(&mut self, index: usize, item: T) {
        self.items.insert(index, item);
    }

    pub fn offset_unset(&mut self, index: usize) -> Option<T> {
        self.items.remove(&index)
    }

    pub fn offset_get(&self, index: usize) -> Option<&T> {
        self.items.get(&index)
    }

    pub fn offset_get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(&index)
    }

    pub fn offset_exists(&self, index: usize) -> bool {
        self.items.contains_key(&index)
    }

    /// 最小下标处的条目
    pub fn get_value(&self) -> Option<&T> {
        self.items.values().next()
    }

    /// 全部条目，按下标升序
    pub fn values(&self) -> Vec<&T> {
        self.items.values().collect()
    }

    pub fn keys(&self) -> Vec<usize> {
        self.items.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// 保留满足条件的条目
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize, &T) -> bool,
    {
        self.items.retain(|k, v| keep(*k, v));
    }

    pub fn set_separator(&mut self, separator: &str) -> &mut Self {
        self.separator = separator.to_string();
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn set_prefix(&mut self, prefix: &str) -> &mut Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_postfix(&mut self, postfix: &str) -> &mut Self {
        self.postfix = postfix.to_string();
        self
    }

    pub fn postfix(&self) -> &str {
        &self.postfix
    }

    pub fn set_indent(&mut self, indent: &str) -> &mut Self {
        self.indent = indent.to_string();
        self
    }

    pub fn set_indent_width(&mut self, width: usize) -> &mut Self {
        self.indent = whitespace(width);
        self
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn is_capturing(&self) -> bool {
        self.capture_lock.get()
    }

    /// 开始捕获。已有会话未结束时返回 `IllegalReentry`，原会话保持不变。
    pub fn open_capture<H>(&mut self, mode: Placement, hints: H) -> Result<Capture<H>, Exception> {
        if self.capture_lock.get() {
            debug!("拒绝嵌套捕获");
            return Err(Exception::IllegalReentry(
                "Cannot nest placeholder captures for the same placeholder".to_string(),
            ));
        }
        self.capture_lock.set(true);
        Ok(Capture {
            buffer: String::new(),
            mode,
            hints: Some(hints),
            lock: Rc::clone(&self.capture_lock),
        })
    }

    /// 结束捕获并释放锁，由调用方决定如何把文本转换为条目。
    ///
    /// 写入器必须交还给开启它的容器，否则返回 `InvalidArgument`：
    /// 本容器不受影响，写入器被丢弃，开启它的容器随之解锁。
    pub fn close_capture<H>(&mut self, mut capture: Capture<H>) -> Result<Captured<H>, Exception> {
        if !Rc::ptr_eq(&self.capture_lock, &capture.lock) {
            debug!("捕获写入器交还给了错误的容器");
            return Err(Exception::InvalidArgument(
                "capture_end() received a capture started on a different container".to_string(),
            ));
        }
        self.capture_lock.set(false);
        let hints = capture.hints.take().ok_or_else(|| {
            Exception::InvalidArgument("capture_end() received a capture that was already closed".to_string())
        })?;
        Ok(Captured {
            mode: capture.mode,
            content: std::mem::take(&mut capture.buffer),
            hints,
        })
    }

    /// 按下标顺序把条目交给 `render_item` 转换，返回 `None` 的条目被跳过；
    /// 结果用分隔符连接，加上前后缀，并在开头与每个换行之后插入缩进。
    pub fn render_with<F>(&self, indent: Option<&str>, mut render_item: F) -> String
    where
        F: FnMut(&T) -> Option<String>,
    {
        let indent = indent.unwrap_or(&self.indent);
        let items: Vec<String> = self.items.values().filter_map(|item| render_item(item)).collect();
        let body = format!("{}{}{}", self.prefix, items.join(&self.separator), self.postfix);
        indent_lines(&body, indent)
    }
}

impl<T: fmt::Display> Container<T> {
    pub fn render(&self, indent: Option<&str>) -> String {
        self.render_with(indent, |item| Some(item.to_string()))
    }
}

impl<T: fmt::Display> fmt::Display for Container<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

/// 纯文本容器（占位符）的捕获接口，捕获提示为可选的目标下标
impl Container<String> {
    pub fn capture_start(
        &mut self,
        mode: Placement,
        key: Option<usize>,
    ) -> Result<Capture<Option<usize>>, Exception> {
        self.open_capture(mode, key)
    }

    pub fn capture_end(&mut self, capture: Capture<Option<usize>>) -> Result<(), Exception> {
        let Captured { mode, content, hints } = self.close_capture(capture)?;
        match (mode, hints) {
            (Placement::Set, Some(key)) => self.offset_set(key, content),
            (Placement::Set, None) => self.set(content),
            (Placement::Prepend, Some(key)) => match self.offset_get_mut(key) {
                Some(existing) => existing.insert_str(0, &content),
                None => self.offset_set(key, content),
            },
            (Placement::Prepend, None) => self.prepend(content),
            (Placement::Append, Some(key)) => match self.offset_get_mut(key) {
                Some(existing) => existing.push_str(&content),
                None => self.offset_set(key, content),
            },
            (Placement::Append, None) => self.append(content),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_renders_by_index_not_insertion() {
        let mut c: Container<String> = Container::new();
        c.set_separator(",");
        c.offset_set(20, "c".to_string());
        c.offset_set(5, "a".to_string());
        c.offset_set(10, "b".to_string());
        assert_eq!(c.to_string(), "a,b,c");
    }

    #[test]
    fn test_append_uses_next_index() {
        let mut c: Container<String> = Container::new();
        assert_eq!(c.next_index(), Some(0));
        c.offset_set(7, "x".to_string());
        c.append("y".to_string());
        assert_eq!(c.keys(), vec![7, 8]);
    }

    #[test]
    fn test_append_after_max_index_renumbers() {
        let mut c: Container<String> = Container::new();
        c.offset_set(usize::MAX, "last".to_string());
        c.offset_set(3, "first".to_string());
        assert_eq!(c.next_index(), None);
        c.append("next".to_string());
        assert_eq!(c.keys(), vec![0, 1, 2]);
        assert_eq!(c.values(), vec!["first", "last", "next"]);
        assert_eq!(c.next_index(), Some(3));
    }

    #[test]
    fn test_offset_set_replaces_silently() {
        let mut c: Container<String> = Container::new();
        c.offset_set(3, "old".to_string());
        c.offset_set(3, "new".to_string());
        assert_eq!(c.len(), 1);
        assert_eq!(c.offset_get(3).map(String::as_str), Some("new"));
    }

    #[test]
    fn test_prepend_renumbers() {
        let mut c: Container<String> = Container::new();
        c.offset_set(4, "b".to_string());
        c.offset_set(9, "c".to_string());
        c.prepend("a".to_string());
        assert_eq!(c.keys(), vec![0, 1, 2]);
        assert_eq!(c.to_string(), "abc");
    }

    #[test]
    fn test_set_replaces_all() {
        let mut c = Container::from_items(vec!["a".to_string(), "b".to_string()]);
        c.set("z".to_string());
        assert_eq!(c.len(), 1);
        assert_eq!(c.get_value().map(String::as_str), Some("z"));
    }

    #[test]
    fn test_get_value_lowest_index() {
        let mut c: Container<String> = Container::new();
        c.offset_set(10, "late".to_string());
        c.offset_set(2, "early".to_string());
        assert_eq!(c.get_value().map(String::as_str), Some("early"));
        assert_eq!(c.values(), vec!["early", "late"]);
    }

    #[test]
    fn test_prefix_postfix_and_indent() {
        let mut c = Container::from_items(vec!["a".to_string(), "b".to_string()]);
        c.set_prefix("<ul>\n").set_postfix("\n</ul>").set_separator("\n");
        c.set_indent_width(2);
        assert_eq!(c.to_string(), "  <ul>\n  a\n  b\n  </ul>");
        assert_eq!(c.render(Some("")), "<ul>\na\nb\n</ul>");
    }

    #[test]
    fn test_capture_append() {
        let mut c: Container<String> = Container::new();
        c.append("first".to_string());
        let mut cap = c.capture_start(Placement::Append, None).unwrap();
        write!(cap, "captured {}", 1).unwrap();
        assert!(c.is_capturing());
        c.capture_end(cap).unwrap();
        assert!(!c.is_capturing());
        assert_eq!(c.values(), vec!["first", "captured 1"]);
    }

    #[test]
    fn test_capture_set_and_prepend() {
        let mut c = Container::from_items(vec!["a".to_string(), "b".to_string()]);
        let mut cap = c.capture_start(Placement::Prepend, None).unwrap();
        cap.write_str("p");
        c.capture_end(cap).unwrap();
        assert_eq!(c.to_string(), "pab");

        let mut cap = c.capture_start(Placement::Set, None).unwrap();
        cap.write_str("only");
        c.capture_end(cap).unwrap();
        assert_eq!(c.to_string(), "only");
    }

    #[test]
    fn test_capture_with_key() {
        let mut c: Container<String> = Container::new();
        c.offset_set(5, "mid".to_string());

        let mut cap = c.capture_start(Placement::Append, Some(5)).unwrap();
        cap.write_str("-end");
        c.capture_end(cap).unwrap();

        let mut cap = c.capture_start(Placement::Prepend, Some(5)).unwrap();
        cap.write_str("start-");
        c.capture_end(cap).unwrap();

        let mut cap = c.capture_start(Placement::Set, Some(1)).unwrap();
        cap.write_str("one");
        c.capture_end(cap).unwrap();

        assert_eq!(c.offset_get(5).map(String::as_str), Some("start-mid-end"));
        assert_eq!(c.keys(), vec![1, 5]);
    }

    #[test]
    fn test_nested_capture_rejected_and_first_recoverable() {
        let mut c: Container<String> = Container::new();
        let mut first = c.capture_start(Placement::Append, None).unwrap();
        match c.capture_start(Placement::Append, None) {
            Err(Exception::IllegalReentry(_)) => {}
            other => panic!("Expected IllegalReentry, got {:?}", other),
        }
        first.write_str("kept");
        c.capture_end(first).unwrap();
        assert_eq!(c.to_string(), "kept");
        assert!(c.capture_start(Placement::Append, None).is_ok());
    }

    #[test]
    fn test_capture_end_on_other_container_rejected() {
        let mut a: Container<String> = Container::new();
        let mut b: Container<String> = Container::new();
        let mut cap = a.capture_start(Placement::Append, None).unwrap();
        cap.write_str("stray");
        match b.capture_end(cap) {
            Err(Exception::InvalidArgument(_)) => {}
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
        assert!(b.is_empty());
        assert!(!a.is_capturing());
        assert!(a.is_empty());

        let mut cap = a.capture_start(Placement::Append, None).unwrap();
        cap.write_str("home");
        a.capture_end(cap).unwrap();
        assert_eq!(a.to_string(), "home");
    }

    #[test]
    fn test_dropped_capture_releases_lock() {
        let mut c: Container<String> = Container::new();
        {
            let mut cap = c.capture_start(Placement::Append, None).unwrap();
            cap.write_str("lost");
            assert!(c.is_capturing());
        }
        assert!(!c.is_capturing());
        assert!(c.is_empty());
        let cap = c.capture_start(Placement::Append, None).unwrap();
        c.capture_end(cap).unwrap();
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_clone_does_not_share_capture_lock() {
        let mut c: Container<String> = Container::new();
        let cap = c.capture_start(Placement::Append, None).unwrap();
        let mut copy = c.clone();
        assert!(!copy.is_capturing());
        assert!(copy.capture_end(cap).is_err());
        assert!(!c.is_capturing());
    }

    #[test]
    fn test_render_with_skips_none() {
        let c = Container::from_items(vec![1, 2, 3, 4]);
        let out = c.render_with(None, |n| if n % 2 == 0 { Some(n.to_string()) } else { None });
        assert_eq!(out, "24");
    }

    #[test]
    fn test_retain_and_unset() {
        let mut c = Container::from_items(vec![1, 2, 3]);
        assert_eq!(c.offset_unset(0), Some(1));
        assert_eq!(c.offset_unset(0), None);
        c.retain(|_, v| *v != 3);
        assert_eq!(c.keys(), vec![1]);
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTML 属性集合
//!
//! [`HtmlAttributesSet`] 是一个保持插入顺序的属性映射，值可以是标量、序列或空值。
//! 它只有一个渲染出口：生成以空格开头的 ` name="value"` 序列，键与值都经过转义。
//!
//! 事件类属性（`on*` 以及 `constraints`）的非标量值会先编码为紧凑 JSON，
//! 以便直接写入内联事件处理器或数据绑定属性。

use std::fmt;
use std::io;
use std::rc::Rc;

use serde::Serialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter, Serializer};
use serde_json::Value;

use crate::escaper::Escaper;
use crate::param::{CONSTRAINTS_ATTRIBUTE, EVENT_ATTRIBUTE_PREFIX};

/// 把 JSON 字符串内部的 `< > ' & "` 输出为 `\uXXXX` 形式
struct HexEscapeFormatter;

impl Formatter for HexEscapeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003C",
                '>' => "\\u003E",
                '\'' => "\\u0027",
                '&' => "\\u0026",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match char_escape {
            CharEscape::Quote => writer.write_all(b"\\u0022"),
            other => CompactFormatter.write_char_escape(writer, other),
        }
    }
}

fn encode_json(value: &Value) -> String {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, HexEscapeFormatter);
    if value.serialize(&mut serializer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

/// 标量转字符串：布尔真为 "1"，假与空值为空串
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(scalar_to_string).collect::<Vec<_>>().join(" "),
        Value::Object(map) => map.values().map(scalar_to_string).collect::<Vec<_>>().join(" "),
    }
}

/// 把任意值展开为序列，供 `add` 拼接
fn into_sequence(value: Value) -> Vec<Value> {
    match value {
        Value::Null => vec![],
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        scalar => vec![scalar],
    }
}

fn is_event_attribute(key: &str) -> bool {
    key.starts_with(EVENT_ATTRIBUTE_PREFIX) || key == CONSTRAINTS_ATTRIBUTE
}

/// 有序的 HTML 属性集合
#[derive(Clone)]
pub struct HtmlAttributesSet {
    escaper: Rc<dyn Escaper>,
    attributes: Vec<(String, Value)>,
}

impl HtmlAttributesSet {
    pub fn new<I, K, V>(escaper: Rc<dyn Escaper>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut set = Self {
            escaper,
            attributes: Vec::new(),
        };
        set.set(attributes);
        set
    }

    /// 写入单个属性，已存在的键原位覆盖
    pub fn offset_set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// 逐项覆盖写入
    pub fn set<I, K, V>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in attributes {
            self.offset_set(name, value);
        }
        self
    }

    /// 累加写入：键已存在时把新旧值都视为序列并拼接
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => {
                let mut merged = into_sequence(std::mem::take(&mut entry.1));
                merged.extend(into_sequence(value));
                entry.1 = Value::Array(merged);
            }
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// 对另一组属性逐项执行 `add`
    pub fn merge<I, K, V>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in attributes {
            self.add(name, value);
        }
        self
    }

    /// 标量时比较相等，序列时检查是否包含（严格相等）
    pub fn has_value(&self, name: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        match self.get(name) {
            Some(Value::Array(items)) => items.contains(&value),
            Some(stored) => *stored == value,
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        for (key, value) in &self.attributes {
            let key = self.escaper.escape_html(key);
            let raw = if is_event_attribute(&key) && !is_scalar(value) {
                encode_json(value)
            } else {
                scalar_to_string(value)
            };
            let value = self.escaper.escape_html_attr(&raw);
            // 只切换外层引号，不改动值本身
            let quote = if value.contains('"') { '\'' } else { '"' };
            output.push_str(&format!(" {}={}{}{}", key, quote, value, quote));
        }
        output
    }
}

impl fmt::Display for HtmlAttributesSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 转义器
//!
//! 视图助手本身不决定转义策略，而是通过 [`Escaper`] 接口把 HTML 文本转义与
//! 属性值转义委托给外部协作者。[`HtmlEscaper`] 是默认实现。

use crate::param::HTML_NAMED_ENTITIES;

/// HTML 转义协作者。
#[cfg_attr(test, mockall::automock)]
pub trait Escaper {
    /// 转义为可安全嵌入 HTML 文本节点的字符串
    fn escape_html(&self, input: &str) -> String;
    /// 转义为可安全嵌入 HTML 属性值的字符串
    fn escape_html_attr(&self, input: &str) -> String;
}

/// 默认转义器。
///
/// - 文本转义只处理 `& < > " '` 五个字符。
/// - 属性转义采用白名单：除 `[A-Za-z0-9,._-]` 之外的字符一律输出为实体。
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEscaper;

impl HtmlEscaper {
    pub fn new() -> Self {
        Self
    }
}

fn is_attr_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ',' | '.' | '-' | '_')
}

impl Escaper for HtmlEscaper {
    fn escape_html(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        for ch in input.chars() {
            match ch {
                '&' => output.push_str("&amp;"),
                '<' => output.push_str("&lt;"),
                '>' => output.push_str("&gt;"),
                '"' => output.push_str("&quot;"),
                '\'' => output.push_str("&#039;"),
                _ => output.push(ch),
            }
        }
        output
    }

    fn escape_html_attr(&self, input: &str) -> String {
        if input.is_empty() || input.bytes().all(|b| b.is_ascii_digit()) {
            return input.to_string();
        }
        let mut output = String::with_capacity(input.len() * 2);
        for ch in input.chars() {
            if is_attr_safe(ch) {
                output.push(ch);
                continue;
            }
            let ord = ch as u32;
            // 控制字符在属性值中没有合法表示
            if (ord <= 0x1f && !matches!(ch, '\t' | '\n' | '\r')) || (0x7f..=0x9f).contains(&ord) {
                output.push_str("&#xFFFD;");
            } else if let Some(name) = HTML_NAMED_ENTITIES.get(&ord) {
                output.push('&');
                output.push_str(name);
                output.push(';');
            } else if ord > 255 {
                output.push_str(&format!("&#x{:04X};", ord));
            } else {
                output.push_str(&format!("&#x{:02X};", ord));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_specials() {
        let e = HtmlEscaper::new();
        assert_eq!(
            e.escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_html_attr_whitelist() {
        let e = HtmlEscaper::new();
        assert_eq!(e.escape_html_attr("foo-bar_baz.css,x"), "foo-bar_baz.css,x");
        assert_eq!(e.escape_html_attr("text/css"), "text&#x2F;css");
        assert_eq!(e.escape_html_attr("a b"), "a&#x20;b");
    }

    #[test]
    fn test_escape_html_attr_named_entities() {
        let e = HtmlEscaper::new();
        assert_eq!(e.escape_html_attr(r#"<"&>"#), "&lt;&quot;&amp;&gt;");
    }

    #[test]
    fn test_escape_html_attr_digits_and_empty() {
        let e = HtmlEscaper::new();
        assert_eq!(e.escape_html_attr(""), "");
        assert_eq!(e.escape_html_attr("12345"), "12345");
    }

    #[test]
    fn test_escape_html_attr_control_and_unicode() {
        let e = HtmlEscaper::new();
        assert_eq!(e.escape_html_attr("\u{1}"), "&#xFFFD;");
        assert_eq!(e.escape_html_attr("\t"), "&#x09;");
        assert_eq!(e.escape_html_attr("é"), "&#xE9;");
        assert_eq!(e.escape_html_attr("中"), "&#x4E2D;");
    }
}

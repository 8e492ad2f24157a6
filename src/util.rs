// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

use lazy_static::lazy_static;
use regex::Regex;

use crate::view::View;

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"(\r\n?|\n)").unwrap();
}

/// 数字缩进转换为等宽空格
pub fn whitespace(width: usize) -> String {
    " ".repeat(width)
}

/// 在开头以及每个换行之后插入缩进
pub fn indent_lines(text: &str, indent: &str) -> String {
    if indent.is_empty() {
        return text.to_string();
    }
    let replacement = format!("${{1}}{}", indent.replace('$', "$$"));
    format!("{}{}", indent, LINE_BREAK.replace_all(text, replacement.as_str()))
}

/// IE 条件注释包装。条件去掉空格后为 `!IE` 时使用显露注释写法，
/// 让非 IE 浏览器照常解析内容。
pub fn wrap_conditional(markup: String, condition: &str) -> String {
    let inner = if condition.replace(' ', "") == "!IE" {
        format!("<!-->{}<!--", markup)
    } else {
        markup
    };
    format!("<!--[if {}]>{}<![endif]-->", condition, inner)
}

/// 把各 head 助手的输出拼装成完整页面
pub struct HtmlBuilder {
    doctype: String,
    head: String,
    body: String,
}

impl HtmlBuilder {
    pub fn from_view(view: &View, body: &str) -> Self {
        Self {
            doctype: view.doctype().to_string(),
            head: view.render_head(Some("        ")),
            body: body.to_string(),
        }
    }

    pub fn build(&self) -> String {
        format!(
            r##"{}
<!-- 本文件由viewhelper自动生成 -->
<html>
    <head>
{}
    </head>
    <body>
    {}
    </body>
</html>"##,
            self.doctype, self.head, self.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace() {
        assert_eq!(whitespace(0), "");
        assert_eq!(whitespace(4), "    ");
    }

    #[test]
    fn test_indent_lines() {
        assert_eq!(indent_lines("a\nb", "  "), "  a\n  b");
        assert_eq!(indent_lines("a\r\nb", "\t"), "\ta\r\n\tb");
        assert_eq!(indent_lines("a\nb", ""), "a\nb");
    }

    #[test]
    fn test_indent_with_dollar_sign() {
        assert_eq!(indent_lines("a\nb", "$1"), "$1a\n$1b");
    }

    #[test]
    fn test_wrap_conditional_plain() {
        assert_eq!(
            wrap_conditional("<x>".to_string(), "lt IE 7"),
            "<!--[if lt IE 7]><x><![endif]-->"
        );
    }

    #[test]
    fn test_wrap_conditional_not_ie() {
        assert_eq!(
            wrap_conditional("<x>".to_string(), "! IE"),
            "<!--[if ! IE]><!--><x><!--<![endif]-->"
        );
    }

    #[test]
    fn test_html_builder_structure() {
        let view = View::new(&crate::config::Config::new());
        let html = HtmlBuilder::from_view(&view, "<p>hi</p>").build();

        assert!(html.starts_with("<!DOCTYPE"));
        assert!(html.contains("<html>"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<head>"));
        assert!(html.contains("</head>"));
        assert!(html.contains("<body>"));
        assert!(html.contains("<p>hi</p>"));
        assert!(html.contains("<title></title>"));
    }
}

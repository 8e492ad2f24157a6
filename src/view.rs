// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 渲染上下文
//!
//! 一次页面渲染对应一个 [`View`]：它持有占位容器注册表、共享的 doctype 状态、
//! 转义器以及五个 head 助手，全部由同一份 [`Config`] 初始化。

use std::rc::Rc;

use log::debug;

use crate::config::Config;
use crate::doctype::DoctypeHelper;
use crate::escaper::{Escaper, HtmlEscaper};
use crate::head_link::HeadLink;
use crate::head_meta::HeadMeta;
use crate::head_script::HeadScript;
use crate::head_style::HeadStyle;
use crate::head_title::HeadTitle;
use crate::placeholder::Placeholder;

pub struct View {
    doctype: Rc<DoctypeHelper>,
    escaper: Rc<dyn Escaper>,
    placeholder: Placeholder,
    head_link: HeadLink,
    head_meta: HeadMeta,
    head_script: HeadScript,
    head_style: HeadStyle,
    head_title: HeadTitle,
}

impl View {
    pub fn new(config: &Config) -> Self {
        Self::with_escaper(config, Rc::new(HtmlEscaper::new()))
    }

    pub fn with_escaper(config: &Config, escaper: Rc<dyn Escaper>) -> Self {
        let doctype = Rc::new(DoctypeHelper::new(config.doctype()));
        debug!("创建渲染上下文，doctype：{}", doctype.doctype());

        let mut head_link = HeadLink::new(escaper.clone(), doctype.clone());
        let mut head_meta = HeadMeta::new(escaper.clone(), doctype.clone());
        let mut head_script = HeadScript::new(escaper.clone(), doctype.clone());
        let mut head_style = HeadStyle::new(escaper.clone(), doctype.clone());
        let mut head_title = HeadTitle::new(escaper.clone(), doctype.clone());

        head_link
            .set_auto_escape(config.auto_escape())
            .set_indent_width(config.indent())
            .set_separator(config.separator());
        head_meta
            .set_auto_escape(config.auto_escape())
            .set_indent_width(config.indent())
            .set_separator(config.separator());
        head_script
            .set_auto_escape(config.auto_escape())
            .set_indent_width(config.indent())
            .set_separator(config.separator());
        head_style
            .set_auto_escape(config.auto_escape())
            .set_indent_width(config.indent())
            .set_separator(config.separator());
        head_script.set_allow_arbitrary_attributes(config.allow_arbitrary_script_attributes());

        head_title
            .set_auto_escape(config.auto_escape())
            .set_indent_width(config.indent())
            .set_separator(config.title_separator())
            .set_prefix(config.title_prefix())
            .set_postfix(config.title_postfix());
        head_title.set_default_attach_order(config.title_default_attach_order());

        Self {
            doctype,
            escaper,
            placeholder: Placeholder::new(),
            head_link,
            head_meta,
            head_script,
            head_style,
            head_title,
        }
    }

    pub fn doctype(&self) -> &DoctypeHelper {
        &self.doctype
    }

    pub fn escaper(&self) -> &dyn Escaper {
        self.escaper.as_ref()
    }

    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    pub fn placeholder_mut(&mut self) -> &mut Placeholder {
        &mut self.placeholder
    }

    pub fn head_link(&mut self) -> &mut HeadLink {
        &mut self.head_link
    }

    pub fn head_meta(&mut self) -> &mut HeadMeta {
        &mut self.head_meta
    }

    pub fn head_script(&mut self) -> &mut HeadScript {
        &mut self.head_script
    }

    pub fn head_style(&mut self) -> &mut HeadStyle {
        &mut self.head_style
    }

    pub fn head_title(&mut self) -> &mut HeadTitle {
        &mut self.head_title
    }

    /// 依次渲染 title、meta、link、style、script，空输出被跳过，每段一行
    pub fn render_head(&self, indent: Option<&str>) -> String {
        let sections = [
            self.head_title.render(indent),
            self.head_meta.render(indent),
            self.head_link.render(indent),
            self.head_style.render(indent),
            self.head_script.render(indent),
        ];
        sections
            .into_iter()
            .filter(|section| !section.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

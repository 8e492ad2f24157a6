// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 页面预览程序
//!
//! 读取 `config/development.toml` 中的 `[page]` 表，填充各 head 助手，
//! 并把拼装好的完整页面打印到标准输出。

use log::{error, info, warn};

use viewhelper::{Config, HtmlBuilder, View};

const LOG_CONFIG: &str = "config/log4rs.yaml";
const PAGE_CONFIG: &str = "config/development.toml";

fn main() {
    // 1. 初始化日志系统
    if let Err(e) = log4rs::init_file(LOG_CONFIG, Default::default()) {
        eprintln!("无法载入日志配置{}：{}", LOG_CONFIG, e);
    }

    // 2. 载入配置，文件缺失时使用默认配置
    let config = match Config::from_toml(PAGE_CONFIG) {
        Ok(config) => {
            info!("配置文件已载入");
            config
        }
        Err(e) => {
            warn!("无法读取{}：{}，使用默认配置", PAGE_CONFIG, e);
            Config::new()
        }
    };
    info!("doctype: {}", config.doctype());

    // 3. 按 [page] 表填充渲染上下文
    let mut view = View::new(&config);
    if let Some(page) = config.page() {
        for title in &page.title {
            view.head_title().place(title, None);
        }
        if let Some(charset) = &page.charset {
            if let Err(e) = view.head_meta().set_charset(charset) {
                error!("charset设置失败：{}", e);
            }
        }
        for (name, content) in &page.meta {
            if let Err(e) = view.head_meta().append_name(name, content) {
                error!("meta {}写入失败：{}", name, e);
            }
        }
        for href in &page.stylesheets {
            if let Err(e) = view.head_link().append_stylesheet(href.as_str()) {
                error!("样式表{}写入失败：{}", href, e);
            }
        }
        for src in &page.scripts {
            if let Err(e) = view.head_script().append_file(src.as_str()) {
                error!("脚本{}写入失败：{}", src, e);
            }
        }
    } else {
        warn!("配置中没有[page]表，输出空白页面");
    }

    // 4. 输出页面
    let body = view.placeholder().render("content");
    println!("{}", HtmlBuilder::from_view(&view, &body).build());
}

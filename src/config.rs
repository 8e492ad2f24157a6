use serde_derive::Deserialize;
use serde_derive::Serialize;

use log::{error, warn};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::prelude::*;

use crate::doctype::Doctype;
use crate::param::Placement;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_doctype")]
    doctype: String,
    #[serde(default = "default_auto_escape")]
    auto_escape: bool,
    #[serde(default)]
    indent: usize,
    #[serde(default = "default_separator")]
    separator: String,
    #[serde(default)]
    title_separator: String,
    #[serde(default)]
    title_prefix: String,
    #[serde(default)]
    title_postfix: String,
    #[serde(default = "default_attach_order")]
    title_default_attach_order: String,
    #[serde(default)]
    allow_arbitrary_script_attributes: bool,
    #[serde(default)]
    page: Option<PageConfig>,
}

/// 预览程序使用的页面内容
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PageConfig {
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub charset: Option<String>,
    #[serde(default)]
    pub stylesheets: Vec<String>,
    #[serde(default)]
    pub scripts: Vec<String>,
    /// `<meta name="键" content="值">`
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

fn default_doctype() -> String {
    Doctype::default().name().to_string()
}

fn default_auto_escape() -> bool {
    true
}

fn default_separator() -> String {
    "\n".to_string()
}

fn default_attach_order() -> String {
    Placement::default().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            doctype: default_doctype(),
            auto_escape: default_auto_escape(),
            indent: 0,
            separator: default_separator(),
            title_separator: String::new(),
            title_prefix: String::new(),
            title_postfix: String::new(),
            title_default_attach_order: default_attach_order(),
            allow_arbitrary_script_attributes: false,
            page: None,
        }
    }

    /// 解析失败时记录错误并使用默认配置
    pub fn from_toml_str(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => config,
            Err(e) => {
                error!("无法成功从配置文件构建配置对象，使用默认配置：{}", e);
                Config::new()
            }
        }
    }

    pub fn from_toml(filename: &str) -> std::io::Result<Self> {
        let mut file = File::open(filename)?;
        let mut str_val = String::new();
        file.read_to_string(&mut str_val)?;
        Ok(Self::from_toml_str(&str_val))
    }
}

impl Config {
    /// 无法识别的名称回退为默认 doctype
    pub fn doctype(&self) -> Doctype {
        match self.doctype.parse() {
            Ok(doctype) => doctype,
            Err(_) => {
                warn!("无法识别的doctype：{}，使用默认值{}", self.doctype, Doctype::default());
                Doctype::default()
            }
        }
    }

    pub fn auto_escape(&self) -> bool {
        self.auto_escape
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn title_separator(&self) -> &str {
        &self.title_separator
    }

    pub fn title_prefix(&self) -> &str {
        &self.title_prefix
    }

    pub fn title_postfix(&self) -> &str {
        &self.title_postfix
    }

    /// 无法识别的名称回退为 `APPEND`
    pub fn title_default_attach_order(&self) -> Placement {
        match self.title_default_attach_order.parse() {
            Ok(placement) => placement,
            Err(e) => {
                warn!("{}，使用默认值{}", e, Placement::default());
                Placement::default()
            }
        }
    }

    pub fn allow_arbitrary_script_attributes(&self) -> bool {
        self.allow_arbitrary_script_attributes
    }

    pub fn page(&self) -> Option<&PageConfig> {
        self.page.as_ref()
    }
}

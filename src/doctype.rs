// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Doctype 协作者
//!
//! head 助手在变更时判断条目是否合法、在渲染时选择 `>` 还是 `/>` 闭合，
//! 都依赖当前页面的 doctype。该模块提供 doctype 枚举本身以及只读查询接口
//! [`DoctypeOracle`]；[`DoctypeHelper`] 是渲染上下文中共享的可切换实现。

use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::exception::Exception;

/// 支持的文档类型声明
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Doctype {
    Xhtml11,
    Xhtml1Strict,
    Xhtml1Transitional,
    Xhtml1Frameset,
    Xhtml1Rdfa,
    Xhtml1Rdfa11,
    XhtmlBasic1,
    Xhtml5,
    Html4Strict,
    #[default]
    Html4Loose,
    Html4Frameset,
    Html5,
}

impl Doctype {
    pub const ALL: [Doctype; 12] = [
        Doctype::Xhtml11,
        Doctype::Xhtml1Strict,
        Doctype::Xhtml1Transitional,
        Doctype::Xhtml1Frameset,
        Doctype::Xhtml1Rdfa,
        Doctype::Xhtml1Rdfa11,
        Doctype::XhtmlBasic1,
        Doctype::Xhtml5,
        Doctype::Html4Strict,
        Doctype::Html4Loose,
        Doctype::Html4Frameset,
        Doctype::Html5,
    ];

    /// 配置文件中使用的名称
    pub fn name(&self) -> &'static str {
        match self {
            Doctype::Xhtml11 => "XHTML11",
            Doctype::Xhtml1Strict => "XHTML1_STRICT",
            Doctype::Xhtml1Transitional => "XHTML1_TRANSITIONAL",
            Doctype::Xhtml1Frameset => "XHTML1_FRAMESET",
            Doctype::Xhtml1Rdfa => "XHTML1_RDFA",
            Doctype::Xhtml1Rdfa11 => "XHTML1_RDFA11",
            Doctype::XhtmlBasic1 => "XHTML_BASIC1",
            Doctype::Xhtml5 => "XHTML5",
            Doctype::Html4Strict => "HTML4_STRICT",
            Doctype::Html4Loose => "HTML4_LOOSE",
            Doctype::Html4Frameset => "HTML4_FRAMESET",
            Doctype::Html5 => "HTML5",
        }
    }

    /// 输出到页面顶部的 `<!DOCTYPE ...>` 声明
    pub fn declaration(&self) -> &'static str {
        match self {
            Doctype::Xhtml11 => r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">"#,
            Doctype::Xhtml1Strict => r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#,
            Doctype::Xhtml1Transitional => r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#,
            Doctype::Xhtml1Frameset => r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Frameset//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd">"#,
            Doctype::Xhtml1Rdfa => r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML+RDFa 1.0//EN" "http://www.w3.org/MarkUp/DTD/xhtml-rdfa-1.dtd">"#,
            Doctype::Xhtml1Rdfa11 => r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML+RDFa 1.1//EN" "http://www.w3.org/MarkUp/DTD/xhtml-rdfa-2.dtd">"#,
            Doctype::XhtmlBasic1 => r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML Basic 1.0//EN" "http://www.w3.org/TR/xhtml-basic/xhtml-basic10.dtd">"#,
            Doctype::Html4Strict => r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
            Doctype::Html4Loose => r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#,
            Doctype::Html4Frameset => r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Frameset//EN" "http://www.w3.org/TR/html4/frameset.dtd">"#,
            Doctype::Xhtml5 | Doctype::Html5 => "<!DOCTYPE html>",
        }
    }

    pub fn is_xhtml(&self) -> bool {
        self.name().contains("XHTML")
    }

    pub fn is_html5(&self) -> bool {
        self.declaration() == "<!DOCTYPE html>"
    }

    /// HTML5 同样接受 RDFa 属性
    pub fn is_rdfa(&self) -> bool {
        self.is_html5() || self.name().contains("RDFA")
    }
}

impl fmt::Display for Doctype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Doctype {
    type Err = Exception;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Doctype::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| Exception::DomainViolation(format!("Unknown doctype '{}'", s)))
    }
}

/// head 助手查询 doctype 的只读接口
pub trait DoctypeOracle {
    fn is_xhtml(&self) -> bool;
    fn is_html5(&self) -> bool;
    fn is_rdfa(&self) -> bool;
}

impl DoctypeOracle for Doctype {
    fn is_xhtml(&self) -> bool {
        Doctype::is_xhtml(self)
    }

    fn is_html5(&self) -> bool {
        Doctype::is_html5(self)
    }

    fn is_rdfa(&self) -> bool {
        Doctype::is_rdfa(self)
    }
}

/// 渲染上下文持有的 doctype 状态，可在渲染中途切换。
#[derive(Debug, Default)]
pub struct DoctypeHelper {
    current: Cell<Doctype>,
}

impl DoctypeHelper {
    pub fn new(doctype: Doctype) -> Self {
        Self {
            current: Cell::new(doctype),
        }
    }

    /// 按名称构造，未知名称回退到默认 doctype
    pub fn from_name(name: &str) -> Self {
        match name.parse::<Doctype>() {
            Ok(d) => Self::new(d),
            Err(_) => {
                warn!("未知的doctype：{}，使用默认值{}", name, Doctype::default());
                Self::default()
            }
        }
    }

    pub fn doctype(&self) -> Doctype {
        self.current.get()
    }

    pub fn set_doctype(&self, doctype: Doctype) {
        self.current.set(doctype);
    }
}

impl DoctypeOracle for DoctypeHelper {
    fn is_xhtml(&self) -> bool {
        self.doctype().is_xhtml()
    }

    fn is_html5(&self) -> bool {
        self.doctype().is_html5()
    }

    fn is_rdfa(&self) -> bool {
        self.doctype().is_rdfa()
    }
}

impl fmt::Display for DoctypeHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.doctype().declaration())
    }
}

pub mod attributes;
pub mod config;
pub mod container;
pub mod doctype;
pub mod escaper;
pub mod exception;
pub mod head_link;
pub mod head_meta;
pub mod head_script;
pub mod head_style;
pub mod head_title;
pub mod param;
pub mod placeholder;
pub mod standalone;
pub mod util;
pub mod view;

pub use attributes::HtmlAttributesSet;
pub use config::Config;
pub use container::{Capture, Container};
pub use doctype::{Doctype, DoctypeHelper, DoctypeOracle};
pub use escaper::{Escaper, HtmlEscaper};
pub use exception::Exception;
pub use head_link::{Alternate, HeadLink, LinkItem, Stylesheet};
pub use head_meta::{HeadMeta, MetaItem, MetaKind};
pub use head_script::{HeadScript, ScriptItem};
pub use head_style::{HeadStyle, StyleItem};
pub use head_title::HeadTitle;
pub use param::Placement;
pub use placeholder::Placeholder;
pub use util::HtmlBuilder;
pub use view::View;

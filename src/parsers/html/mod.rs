//! HTML解析和处理模块
//!
//! - `dom`: 基础DOM操作（解析、属性、class、父节点）
//! - `content`: 元素文本与内部HTML的读写
//! - `selector`: 基于 `selectors` 的 CSS 选择器匹配
//! - `serializer`: 序列化功能

pub mod content;
pub mod dom;
pub mod selector;
pub mod serializer;

pub use content::{
    first_child_text, inner_html, inner_text, set_first_child_text, set_inner_html,
    set_text_content, text_content,
};
pub use dom::{
    find_element_by_id, get_body, get_charset, get_child_node_by_name, get_node_attr,
    get_node_name, get_parent_node, has_class, html_to_dom, set_class, set_node_attr,
};
pub use selector::{select_all, SelectorList};
pub use serializer::serialize_document;

//! # 解析器模块
//!
//! 页面 HTML 的解析、DOM 操作、选择器匹配与序列化。
//!
//! # 模块组织
//!
//! - `html` - HTML文档解析、DOM操作、文本读写、选择器

pub mod html;

// Re-export commonly used items for convenience
pub use html::{html_to_dom, select_all, serialize_document, SelectorList};

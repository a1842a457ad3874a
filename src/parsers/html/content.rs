//! 元素文本内容的读取与替换
//!
//! 提供与浏览器 `textContent`、`innerText`、`innerHTML` 相对应的读写操作，
//! 以及只替换第一个子节点文本的操作（用于带图标的 FAQ 问题）。

use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use super::dom::{
    append_child, create_text_node, get_body, get_node_name, remove_children,
    set_text_node_contents,
};

/// 内容不会作为文本渲染的元素
const NON_RENDERED_ELEMENTS: &[&str] = &["script", "style", "template", "noscript", "head"];

/// 渲染文本中另起一行的块级元素
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tr", "ul",
];

/// 所有后代文本节点的拼接结果（`textContent`）
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, buf: &mut String) {
    match &node.data {
        NodeData::Text { contents } => buf.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in node.children.borrow().iter() {
                collect_text(child, buf);
            }
        }
        _ => {}
    }
}

/// 近似浏览器渲染后的文本（`innerText`）
///
/// 跳过 script、style 等不渲染的内容，`<br>` 转为换行，块级元素前后各加换行。
pub fn inner_text(node: &Handle) -> String {
    let mut text = String::new();
    for child in node.children.borrow().iter() {
        collect_rendered_text(child, &mut text);
    }
    text
}

fn collect_rendered_text(node: &Handle, buf: &mut String) {
    match &node.data {
        NodeData::Text { contents } => buf.push_str(&contents.borrow()),
        NodeData::Element { .. } => {
            let name = get_node_name(node).unwrap_or_default();

            if NON_RENDERED_ELEMENTS.contains(&name) {
                return;
            }
            if name == "br" {
                buf.push('\n');
                return;
            }

            let is_block = BLOCK_ELEMENTS.contains(&name);
            if is_block {
                buf.push('\n');
            }
            for child in node.children.borrow().iter() {
                collect_rendered_text(child, buf);
            }
            if is_block {
                buf.push('\n');
            }
        }
        _ => {}
    }
}

/// 元素子节点序列化后的 HTML（`innerHTML`）
pub fn inner_html(node: &Handle) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let serializable: SerializableHandle = node.clone().into();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };

    if let Err(e) = serialize(&mut buf, &serializable, opts) {
        tracing::warn!("无法序列化元素内容，改用纯文本: {}", e);
        return text_content(node);
    }

    String::from_utf8_lossy(&buf).to_string()
}

/// 用单个文本节点替换元素的全部子节点
pub fn set_text_content(node: &Handle, text: &str) {
    remove_children(node);

    if !text.is_empty() {
        append_child(node, create_text_node(text));
    }
}

/// 解析 HTML 片段并替换元素的全部子节点
pub fn set_inner_html(node: &Handle, html: &str) {
    remove_children(node);

    let fragment = match parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
    {
        Ok(dom) => dom,
        Err(e) => {
            tracing::warn!("无法解析 HTML 片段，按纯文本写入: {}", e);
            append_child(node, create_text_node(html));
            return;
        }
    };

    if let Some(body) = get_body(&fragment.document) {
        let children: Vec<Handle> = body.children.borrow_mut().drain(..).collect();
        for child in children {
            append_child(node, child);
        }
    }
}

/// 第一个子节点的文本（`childNodes[0].textContent`）
pub fn first_child_text(node: &Handle) -> Option<String> {
    let first = node.children.borrow().first().cloned()?;

    match &first.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        NodeData::Element { .. } => Some(text_content(&first)),
        _ => None,
    }
}

/// 只替换第一个子节点的文本，保留其后的兄弟节点
pub fn set_first_child_text(node: &Handle, text: &str) {
    let first = node.children.borrow().first().cloned();

    match first {
        Some(first) => {
            if !set_text_node_contents(&first, text) && matches!(first.data, NodeData::Element { .. }) {
                set_text_content(&first, text);
            }
        }
        None => append_child(node, create_text_node(text)),
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, StrTendril, TendrilSink};
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};

use crate::core::DocumentError;

/// 按给定的字符集标签解码字节并解析为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> Result<RcDom, DocumentError> {
    let s: String = if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        string.to_string()
    } else {
        String::from_utf8_lossy(data).to_string()
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .map_err(|e| DocumentError::new(&format!("unable to parse document: {}", e)))
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    let matching_children = children.iter().find(|child| match child.data {
        NodeData::Element { ref name, .. } => &*name.local == node_name,
        _ => false,
    });
    matching_children.cloned()
}

/// 获取 `<body>` 元素
pub fn get_body(document: &Handle) -> Option<Handle> {
    get_child_node_by_name(document, "html").and_then(|html| get_child_node_by_name(&html, "body"))
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

/// 获取父节点
///
/// 父节点链接存放在 `Cell` 中，读取时需要先取出再放回。
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let weak = child.parent.take();
    let parent = weak.as_ref().and_then(|node| node.upgrade());
    child.parent.set(weak);
    parent
}

/// 设置节点属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let mut i = 0;
        let mut found_existing_attr: bool = false;

        while i < attrs_mut.len() {
            if &attrs_mut[i].name.local == attr_name {
                found_existing_attr = true;

                if let Some(attr_value) = attr_value.clone() {
                    let _ = &attrs_mut[i].value.clear();
                    let _ = &attrs_mut[i].value.push_slice(attr_value.as_str());
                } else {
                    // Remove attr completely if attr_value is not defined
                    attrs_mut.remove(i);
                    continue;
                }
            }

            i += 1;
        }

        if !found_existing_attr {
            // Add new attribute (since originally the target node didn't have it)
            if let Some(attr_value) = attr_value {
                let name = LocalName::from(attr_name);

                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), name),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    };
}

/// 获取元素的 class 列表
pub fn get_node_classes(node: &Handle) -> Vec<String> {
    get_node_attr(node, "class")
        .map(|value| value.split_ascii_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &Handle, class_name: &str) -> bool {
    get_node_attr(node, "class")
        .map(|value| value.split_ascii_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

/// 添加或移除 class（与 `classList.toggle(name, force)` 相同）
pub fn set_class(node: &Handle, class_name: &str, present: bool) {
    let mut classes = get_node_classes(node);
    let exists = classes.iter().any(|c| c == class_name);

    if present == exists {
        return;
    }

    if present {
        classes.push(class_name.to_string());
    } else {
        classes.retain(|c| c != class_name);
    }

    if classes.is_empty() {
        set_node_attr(node, "class", None);
    } else {
        set_node_attr(node, "class", Some(classes.join(" ")));
    }
}

/// 按文档顺序查找第一个 id 匹配的元素
pub fn find_element_by_id(root: &Handle, id: &str) -> Option<Handle> {
    if is_element(root) && get_node_attr(root, "id").as_deref() == Some(id) {
        return Some(root.clone());
    }

    for child in root.children.borrow().iter() {
        if let Some(found) = find_element_by_id(child, id) {
            return Some(found);
        }
    }

    None
}

/// 读取 `<meta charset>` 或 `<meta http-equiv="content-type">` 声明的字符集
pub fn get_charset(document: &Handle) -> Option<String> {
    if let Some(meta) = find_first(document, &|node| {
        get_node_name(node) == Some("meta") && get_node_attr(node, "charset").is_some()
    }) {
        return get_node_attr(&meta, "charset");
    }

    let meta = find_first(document, &|node| {
        get_node_name(node) == Some("meta")
            && get_node_attr(node, "http-equiv")
                .map(|v| v.eq_ignore_ascii_case("content-type"))
                .unwrap_or(false)
    })?;
    let content = get_node_attr(&meta, "content")?;
    // 参数名不区分大小写
    let start = content.to_ascii_lowercase().find("charset=")? + "charset=".len();
    let charset = content[start..].split(';').next().unwrap_or_default();

    Some(charset.trim().trim_matches(['"', '\'']).to_string())
}

fn find_first(node: &Handle, predicate: &dyn Fn(&Handle) -> bool) -> Option<Handle> {
    if predicate(node) {
        return Some(node.clone());
    }

    for child in node.children.borrow().iter() {
        if let Some(found) = find_first(child, predicate) {
            return Some(found);
        }
    }

    None
}

/// 创建一个游离的文本节点
pub fn create_text_node(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    })
}

/// 把 `child` 追加到 `parent` 末尾，并更新其父节点链接
pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// 移除并释放 `node` 的全部子节点
pub fn remove_children(node: &Handle) {
    let children: Vec<Handle> = node.children.borrow_mut().drain(..).collect();

    for child in children {
        child.parent.set(None);
    }
}

/// 原地替换文本节点的内容
pub fn set_text_node_contents(node: &Handle, text: &str) -> bool {
    if let NodeData::Text { contents } = &node.data {
        let mut contents = contents.borrow_mut();
        contents.clear();
        contents.push_slice(text);
        true
    } else {
        false
    }
}

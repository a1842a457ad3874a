//! CSS 选择器
//!
//! 选择器组配置中的 CSS 选择器由 `selectors` 解析和匹配，这里只负责把
//! `RcDom` 的节点包装成 `selectors::Element`。伪类（`:hover` 等）和伪元素
//! 不受支持；树结构伪类（`:first-child`、`:not(...)`、`:is(...)` 等）可以使用。

use std::fmt;

use cssparser::{Parser as CssParser, ParserInput, ToCss};
use html5ever::{namespace_url, ns, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData};
use precomputed_hash::PrecomputedHash;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::matching::{
    self, ElementSelectorFlags, MatchingContext, MatchingForInvalidation, MatchingMode,
    NeedsSelectorFlags, QuirksMode, SelectorCaches,
};
use selectors::parser::{self, ParseRelative, SelectorParseErrorKind};
use selectors::{Element, OpaqueElement};

use super::dom::{get_node_attr, get_parent_node};
use crate::translation::error::{TranslationError, TranslationResult};

/// 解析后的选择器列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    selectors: parser::SelectorList<DomSelectors>,
}

impl SelectorList {
    /// 解析逗号分隔的选择器列表
    pub fn parse(source: &str) -> TranslationResult<Self> {
        let mut input = ParserInput::new(source);
        let mut parser = CssParser::new(&mut input);

        let selectors = parser::SelectorList::parse(&DomSelectorParser, &mut parser, ParseRelative::No)
            .map_err(|e| {
                TranslationError::SelectorError(format!(
                    "'{}' (第 {} 行第 {} 列): {:?}",
                    source, e.location.line, e.location.column, e.kind
                ))
            })?;

        Ok(Self {
            source: source.to_string(),
            selectors,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, node: &Handle) -> bool {
        let mut caches = SelectorCaches::default();
        self.matches_with_caches(node, &mut caches)
    }

    fn matches_with_caches(&self, node: &Handle, caches: &mut SelectorCaches) -> bool {
        if !matches!(node.data, NodeData::Element { .. }) {
            return false;
        }

        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );

        matching::matches_selector_list(&self.selectors, &DomElement(node.clone()), &mut context)
    }
}

/// 以文档顺序返回匹配的全部元素（每个元素至多一次），等同于 `querySelectorAll`
pub fn select_all(root: &Handle, selectors: &SelectorList) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut caches = SelectorCaches::default();
    collect_matches(root, selectors, &mut caches, &mut found);
    found
}

fn collect_matches(
    node: &Handle,
    selectors: &SelectorList,
    caches: &mut SelectorCaches,
    found: &mut Vec<Handle>,
) {
    if selectors.matches_with_caches(node, caches) {
        found.push(node.clone());
    }

    for child in node.children.borrow().iter() {
        collect_matches(child, selectors, caches, found);
    }
}

#[derive(Debug, Clone, Copy)]
struct DomSelectorParser;

impl<'i> parser::Parser<'i> for DomSelectorParser {
    type Impl = DomSelectors;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_is_and_where(&self) -> bool {
        true
    }
}

/// `selectors` 的类型参数集合，不含任何伪类和伪元素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomSelectors;

impl parser::SelectorImpl for DomSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssLocalName;
    type LocalName = CssLocalName;
    type NamespaceUrl = Namespace;
    type NamespacePrefix = CssLocalName;
    type BorrowedNamespaceUrl = Namespace;
    type BorrowedLocalName = CssLocalName;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssString(String);

impl<'a> From<&'a str> for CssString {
    fn from(value: &'a str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssString {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        cssparser::serialize_string(&self.0, dest)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CssLocalName(LocalName);

impl<'a> From<&'a str> for CssLocalName {
    fn from(value: &'a str) -> Self {
        Self(LocalName::from(value))
    }
}

impl ToCss for CssLocalName {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.0)
    }
}

impl PrecomputedHash for CssLocalName {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonTSPseudoClass {}

impl parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = DomSelectors;

    fn is_active_or_hover(&self) -> bool {
        false
    }

    fn is_user_action_state(&self) -> bool {
        false
    }
}

impl ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoElement {}

impl parser::PseudoElement for PseudoElement {
    type Impl = DomSelectors;
}

impl ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

/// 供 `selectors` 匹配使用的元素句柄
#[derive(Clone)]
struct DomElement(Handle);

impl fmt::Debug for DomElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "<{}>", name.local),
            None => f.write_str("<?>"),
        }
    }
}

impl DomElement {
    fn name(&self) -> Option<&QualName> {
        match &self.0.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    fn wrap(node: &Handle) -> Option<Self> {
        match node.data {
            NodeData::Element { .. } => Some(Self(node.clone())),
            _ => None,
        }
    }

    /// 父节点的子节点列表和自身所在位置
    fn siblings(&self) -> Option<(Vec<Handle>, usize)> {
        let parent = get_parent_node(&self.0)?;
        let children: Vec<Handle> = parent.children.borrow().clone();
        let index = children.iter().position(|child| std::rc::Rc::ptr_eq(child, &self.0))?;
        Some((children, index))
    }
}

impl Element for DomElement {
    type Impl = DomSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new::<Node>(&self.0)
    }

    fn parent_element(&self) -> Option<Self> {
        get_parent_node(&self.0).as_ref().and_then(Self::wrap)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let (children, index) = self.siblings()?;
        children[..index].iter().rev().find_map(Self::wrap)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let (children, index) = self.siblings()?;
        children[index + 1..].iter().find_map(Self::wrap)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.0.children.borrow().iter().find_map(Self::wrap)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        self.name().map(|name| name.ns == ns!(html)).unwrap_or(false)
    }

    fn has_local_name(&self, local_name: &CssLocalName) -> bool {
        self.name().map(|name| name.local == local_name.0).unwrap_or(false)
    }

    fn has_namespace(&self, ns: &Namespace) -> bool {
        self.name().map(|name| name.ns == *ns).unwrap_or(false)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        match (self.name(), other.name()) {
            (Some(a), Some(b)) => a.local == b.local && a.ns == b.ns,
            _ => false,
        }
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&Namespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        match &self.0.data {
            NodeData::Element { attrs, .. } => attrs.borrow().iter().any(|attr| {
                !matches!(*ns, NamespaceConstraint::Specific(url) if *url != attr.name.ns)
                    && attr.name.local == local_name.0
                    && operation.eval_str(&attr.value)
            }),
            _ => false,
        }
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<DomSelectors>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<DomSelectors>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(
            self.name().map(|name| &*name.local),
            Some("a") | Some("area") | Some("link")
        ) && get_node_attr(&self.0, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        get_node_attr(&self.0, "id")
            .map(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
            .unwrap_or(false)
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        get_node_attr(&self.0, "class")
            .map(|value| {
                value
                    .split_ascii_whitespace()
                    .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
            })
            .unwrap_or(false)
    }

    fn has_custom_state(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self.0.children.borrow().iter().any(|child| match &child.data {
            NodeData::Element { .. } => true,
            NodeData::Text { contents } => !contents.borrow().is_empty(),
            _ => false,
        })
    }

    fn is_root(&self) -> bool {
        get_parent_node(&self.0)
            .map(|parent| matches!(parent.data, NodeData::Document))
            .unwrap_or(false)
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::content::text_content;
    use crate::parsers::html::dom::html_to_dom;

    const PAGE: &str = r#"<html><body>
        <nav><ul><li><a href="/">Home</a></li><li><a href="https://api.example.com">API</a></li></ul></nav>
        <section class="steps-container">
            <h2>1️⃣ Upload Your Image or PDF</h2>
            <p>Click the <strong>Upload</strong> button.</p>
            <p>Then wait.</p>
        </section>
        <div class="fimg"><h2>Icon</h2></div>
        <span class="fimg">skip</span>
        <span class="icon">+</span>
        <span id="file-name" data-state="empty">No file chosen</span>
    </body></html>"#;

    fn texts(selector: &str) -> Vec<String> {
        let dom = html_to_dom(PAGE.as_bytes(), "utf-8").unwrap();
        let list = SelectorList::parse(selector).unwrap();
        select_all(&dom.document, &list)
            .iter()
            .map(|node| text_content(node).trim().to_string())
            .collect()
    }

    #[test]
    fn test_descendant_and_class() {
        assert_eq!(texts("nav ul li a"), vec!["Home", "API"]);
        assert_eq!(texts(".steps-container p").len(), 2);
        assert_eq!(texts(".fimg h2"), vec!["Icon"]);
    }

    #[test]
    fn test_negation() {
        assert_eq!(texts("span:not(.fimg)"), vec!["+", "No file chosen"]);
        assert_eq!(texts("span:not(.fimg, .icon)"), vec!["No file chosen"]);
    }

    #[test]
    fn test_id_and_attributes() {
        assert_eq!(texts("#file-name"), vec!["No file chosen"]);
        assert_eq!(texts("span[data-state]"), vec!["No file chosen"]);
        assert_eq!(texts("span[data-state=\"empty\"]"), vec!["No file chosen"]);
        assert!(texts("span[data-state=full]").is_empty());
        assert_eq!(texts("a[href^=\"/\"]"), vec!["Home"]);
    }

    #[test]
    fn test_combinators() {
        assert_eq!(texts("section > h2").len(), 1);
        assert!(texts("body > h2").is_empty());
        assert_eq!(texts("h2 + p"), vec!["Click the Upload button."]);
        assert_eq!(texts("h2 ~ p").len(), 2);
    }

    #[test]
    fn test_structural_pseudo_classes() {
        assert_eq!(texts("li:first-child a"), vec!["Home"]);
        assert_eq!(texts(".steps-container p:last-child"), vec!["Then wait."]);
        assert_eq!(texts("nav li:is(:last-child) a"), vec!["API"]);
    }

    #[test]
    fn test_selector_list_is_deduplicated_in_document_order() {
        let found = texts("p, .steps-container p, h2");
        assert_eq!(found.len(), 4);
        assert_eq!(found[0], "1️⃣ Upload Your Image or PDF");
        assert_eq!(found[1], "Click the Upload button.");
        assert_eq!(found[2], "Then wait.");
        assert_eq!(found[3], "Icon");
    }

    #[test]
    fn test_invalid_selectors() {
        for selector in ["", "p,", "> p", "p > > q", "p:hover", "p::before", "p[", "h1,,h2"] {
            assert!(SelectorList::parse(selector).is_err(), "{:?} should be rejected", selector);
        }
    }
}

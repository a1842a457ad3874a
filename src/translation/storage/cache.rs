//! 原文缓存
//!
//! 以元素身份为键记录元素第一次被访问时的规范化原文。条目持有元素的弱引用，
//! 元素被释放后条目即失效，`purge_detached` 负责清理。

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use markup5ever_rcdom::{Handle, Node};

use crate::translation::groups::ExtractionMode;
use crate::translation::normalize::normalize;

/// 缓存条目
#[derive(Debug, Clone)]
pub struct CachedOriginal {
    node: Weak<Node>,
    /// 规范化后的原文
    pub text: String,
    /// 首次提取时使用的方式
    pub mode: ExtractionMode,
}

impl CachedOriginal {
    fn is_alive(&self) -> bool {
        self.node.strong_count() > 0
    }
}

/// 缓存统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub purged: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }
}

/// 元素 → 原文 的弱关联
#[derive(Debug, Default)]
pub struct OriginalTextCache {
    entries: HashMap<*const Node, CachedOriginal>,
    stats: CacheStats,
}

impl OriginalTextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回元素的原文；首次访问时按 `mode` 提取、规范化并记录
    ///
    /// 记录之后始终返回同一段文本，与元素当前显示的内容无关。
    pub fn original_text(&mut self, element: &Handle, mode: ExtractionMode) -> &CachedOriginal {
        self.stats.total_requests += 1;
        let key = Rc::as_ptr(element);

        // 节点已释放的条目属于恰好复用了同一地址的旧元素
        let reusable = self
            .entries
            .get(&key)
            .map(|entry| entry.node.ptr_eq(&Rc::downgrade(element)) && entry.is_alive())
            .unwrap_or(false);

        if reusable {
            self.stats.cache_hits += 1;
        } else {
            self.stats.cache_misses += 1;
            let entry = CachedOriginal {
                node: Rc::downgrade(element),
                text: normalize(&mode.extract(element)),
                mode,
            };
            self.entries.insert(key, entry);
        }

        &self.entries[&key]
    }

    /// 查看元素的原文（不会创建条目）
    pub fn get(&self, element: &Handle) -> Option<&str> {
        self.entries
            .get(&Rc::as_ptr(element))
            .filter(|entry| entry.is_alive() && entry.node.ptr_eq(&Rc::downgrade(element)))
            .map(|entry| entry.text.as_str())
    }

    /// 以新的源文本替换元素的原文
    ///
    /// 只用于程序自身写入的文本，不能用于译文。
    pub fn replace_original(&mut self, element: &Handle, source_text: &str, mode: ExtractionMode) {
        self.entries.insert(
            Rc::as_ptr(element),
            CachedOriginal {
                node: Rc::downgrade(element),
                text: normalize(source_text),
                mode,
            },
        );
    }

    /// 清除已被释放元素的条目，返回清除数量
    pub fn purge_detached(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_alive());
        let purged = before - self.entries.len();
        self.stats.purged += purged as u64;
        purged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

//! 存储层：元素原文缓存与持久化偏好

pub mod cache;
pub mod preference;

pub use cache::{CacheStats, CachedOriginal, OriginalTextCache};
pub use preference::{LanguagePreference, MemoryPreferenceStore, PreferenceStore, RedbPreferenceStore};

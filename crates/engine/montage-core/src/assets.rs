//! Asset resolution and the host-owned resource pool.
//!
//! Tracks store raw slot inputs. Before evaluation each input is resolved into a [`SlotValue`]
//! by an [`AssetResolver`] supplied by the host. Decoded media (textures, video decoders) live
//! in a [`ResourcePool`] keyed by URL; templates only see it through [`MediaLookup`].

use hashbrown::HashMap;
use indexmap::IndexMap;
use log::{debug, warn};
use montage_api_core::props::to_number;
use montage_api_core::{AssetDescriptor, AssetKind, Color, DataTable, ResolvedAssets, SlotValue};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::PoolConfig;
use crate::scheduler::Track;
use crate::template::{SlotDefinition, SlotType, TemplateDescriptor};

/// Resolves one stored slot input into a value templates can consume.
pub trait AssetResolver {
    fn resolve(&self, slot: &SlotDefinition, stored: &JsonValue) -> Option<SlotValue>;
}

/// Decodes literal inputs (text, numbers, colors, tables, inline asset descriptors).
#[derive(Clone, Copy, Debug, Default)]
pub struct LiteralResolver;

impl AssetResolver for LiteralResolver {
    fn resolve(&self, slot: &SlotDefinition, stored: &JsonValue) -> Option<SlotValue> {
        match slot.slot_type {
            SlotType::Text => match stored {
                JsonValue::String(s) => Some(SlotValue::Text(s.clone())),
                JsonValue::Number(n) => Some(SlotValue::Text(n.to_string())),
                _ => None,
            },
            SlotType::Number => to_number(stored).map(SlotValue::Number),
            SlotType::Color => Color::from_json(stored).ok().map(SlotValue::Color),
            SlotType::DataTable => DataTable::from_json(stored).map(SlotValue::Table),
            SlotType::File => serde_json::from_value::<AssetDescriptor>(stored.clone())
                .ok()
                .map(SlotValue::Asset),
        }
    }
}

/// Resolves file slots from a host-supplied id → descriptor map, falling back to literals.
#[derive(Clone, Debug, Default)]
pub struct MapResolver {
    assets: HashMap<String, AssetDescriptor>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, asset: AssetDescriptor) -> Self {
        self.insert(asset);
        self
    }

    pub fn insert(&mut self, asset: AssetDescriptor) {
        self.assets.insert(asset.id.clone(), asset);
    }

    pub fn get(&self, id: &str) -> Option<&AssetDescriptor> {
        self.assets.get(id)
    }
}

impl AssetResolver for MapResolver {
    fn resolve(&self, slot: &SlotDefinition, stored: &JsonValue) -> Option<SlotValue> {
        if let JsonValue::String(id) = stored {
            if let Some(asset) = self.assets.get(id) {
                let accepted = match slot.slot_type {
                    SlotType::File => true,
                    SlotType::Text => asset.kind == AssetKind::Text,
                    _ => false,
                };
                if accepted {
                    return Some(SlotValue::Asset(asset.clone()));
                }
            } else if slot.slot_type == SlotType::File {
                warn!("slot '{}' references unknown asset '{id}'", slot.id);
                return None;
            }
        }
        LiteralResolver.resolve(slot, stored)
    }
}

/// Resolve every declared slot of `descriptor` from the track's stored inputs.
/// Inputs that cannot be resolved are left out of the map.
pub fn resolve_slots(
    descriptor: &TemplateDescriptor,
    track: &Track,
    resolver: &dyn AssetResolver,
) -> ResolvedAssets {
    let mut out = ResolvedAssets::new();
    for slot in &descriptor.slots {
        let Some(stored) = track.slots.get(slot.id).filter(|v| !v.is_null()) else {
            continue;
        };
        match resolver.resolve(slot, stored) {
            Some(value) => {
                out.insert(slot.id.to_string(), value);
            }
            None => debug!("track {:?}: slot '{}' did not resolve", track.id, slot.id),
        }
    }
    out
}

/// Intrinsic properties of a decoded image or video.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub width: u32,
    pub height: u32,
    /// 1 for still images.
    pub frame_count: u32,
}

impl MediaInfo {
    pub fn image(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_count: 1,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Looping playback frame for a local animation frame.
    pub fn loop_frame(&self, frame: u32) -> u32 {
        frame % self.frame_count.max(1)
    }
}

/// Read-only view of resolved media for templates.
pub trait MediaLookup {
    fn media_info(&self, locator: &str) -> Option<MediaInfo>;
}

/// Host without decoded media: every lookup misses and templates use fallbacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMedia;

impl MediaLookup for NoMedia {
    fn media_info(&self, _locator: &str) -> Option<MediaInfo> {
        None
    }
}

#[derive(Debug)]
struct PoolEntry<H> {
    handle: H,
    refs: u32,
    last_used: u64,
}

/// URL-keyed, reference-counted handles. Entries are created lazily on first acquire and
/// are only evicted by [`ResourcePool::sweep`], never while a sequence is playing.
#[derive(Debug)]
pub struct ResourcePool<H> {
    entries: IndexMap<String, PoolEntry<H>>,
    clock: u64,
    config: PoolConfig,
}

impl<H> Default for ResourcePool<H> {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl<H> ResourcePool<H> {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            entries: IndexMap::new(),
            clock: 0,
            config,
        }
    }

    /// Take a reference to the handle for `url`, creating it with `create` if absent.
    pub fn acquire(&mut self, url: &str, create: impl FnOnce(&str) -> H) -> &H {
        self.clock += 1;
        let clock = self.clock;
        let entry = self
            .entries
            .entry(url.to_string())
            .or_insert_with(|| PoolEntry {
                handle: create(url),
                refs: 0,
                last_used: clock,
            });
        entry.refs += 1;
        entry.last_used = clock;
        &entry.handle
    }

    /// Drop one reference. Returns false for unknown urls or entries that were already idle.
    pub fn release(&mut self, url: &str) -> bool {
        match self.entries.get_mut(url) {
            Some(entry) if entry.refs > 0 => {
                entry.refs -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, url: &str) -> Option<&H> {
        self.entries.get(url).map(|e| &e.handle)
    }

    pub fn ref_count(&self, url: &str) -> u32 {
        self.entries.get(url).map(|e| e.refs).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evict idle entries beyond the configured idle capacity, least recently used first.
    /// Returns the evicted handles so the host can tear them down.
    pub fn sweep(&mut self) -> Vec<(String, H)> {
        let mut idle: Vec<(u64, String)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.refs == 0)
            .map(|(url, e)| (e.last_used, url.clone()))
            .collect();
        let excess = idle.len().saturating_sub(self.config.idle_capacity);
        if excess == 0 {
            return Vec::new();
        }
        idle.sort();
        let mut evicted = Vec::with_capacity(excess);
        for (_, url) in idle.into_iter().take(excess) {
            if let Some(entry) = self.entries.shift_remove(&url) {
                debug!("resource pool evicting '{url}'");
                evicted.push((url, entry.handle));
            }
        }
        evicted
    }
}

impl MediaLookup for ResourcePool<MediaInfo> {
    fn media_info(&self, locator: &str) -> Option<MediaInfo> {
        self.get(locator).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slot(id: &'static str, slot_type: SlotType) -> SlotDefinition {
        SlotDefinition::new(id, slot_type)
    }

    #[test]
    fn literals_resolve_per_slot_type() {
        let r = LiteralResolver;
        assert_eq!(
            r.resolve(&slot("n", SlotType::Number), &json!("42")),
            Some(SlotValue::Number(42.0))
        );
        assert!(r.resolve(&slot("c", SlotType::Color), &json!("#00ff00")).is_some());
        assert!(r.resolve(&slot("f", SlotType::File), &json!("upload-1")).is_none());
    }

    #[test]
    fn map_resolver_prefers_known_assets() {
        let r = MapResolver::new()
            .with_asset(AssetDescriptor::image("img1", "https://cdn/img1.png"))
            .with_asset(AssetDescriptor::text("copy", "Hello"));
        let file = r.resolve(&slot("media", SlotType::File), &json!("img1"));
        assert_eq!(
            file.as_ref().and_then(SlotValue::as_asset).map(|a| a.kind),
            Some(AssetKind::Image)
        );
        let text = r.resolve(&slot("title", SlotType::Text), &json!("copy"));
        assert_eq!(text.as_ref().and_then(SlotValue::as_text), Some("Hello"));
        // Plain strings in text slots stay literal.
        let literal = r.resolve(&slot("title", SlotType::Text), &json!("img1"));
        assert_eq!(literal, Some(SlotValue::Text("img1".into())));
        assert!(r.resolve(&slot("media", SlotType::File), &json!("missing")).is_none());
    }

    #[test]
    fn pool_counts_references_and_sweeps_lru() {
        let mut pool: ResourcePool<u32> = ResourcePool::new(PoolConfig { idle_capacity: 1 });
        let mut created = 0;
        for url in ["a", "b", "c"] {
            pool.acquire(url, |_| {
                created += 1;
                created
            });
        }
        assert_eq!(*pool.acquire("a", |_| 99), 1);
        assert_eq!(pool.ref_count("a"), 2);

        assert!(pool.release("b"));
        assert!(pool.release("c"));
        assert!(!pool.release("c"));
        assert!(!pool.release("zzz"));

        let evicted = pool.sweep();
        assert_eq!(evicted, vec![("b".to_string(), 2)]);
        assert!(pool.get("a").is_some());
        assert!(pool.get("c").is_some());
        assert!(pool.sweep().is_empty());
    }

    #[test]
    fn media_info_loops_video_frames() {
        let info = MediaInfo {
            width: 1280,
            height: 720,
            frame_count: 48,
        };
        assert_eq!(info.loop_frame(50), 2);
        assert_eq!(MediaInfo::image(10, 10).loop_frame(7), 0);
    }
}

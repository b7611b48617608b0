use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::config::connect::CacheConfig;

/// `(peer, seq) -> msgId` 的索引, 用于解析只带 seq 的引用
///
/// 容量满时淘汰最早写入的记录, 设置了 ttl 时过期的记录视为不存在.
/// 每个连接持有一份, 重连后重建.
#[derive(Debug)]
pub struct SequenceIndex {
    entries: HashMap<String, Entry>,
    order: VecDeque<(String, u64)>,
    generation: u64,
    capacity: usize,
    ttl: Option<Duration>,
}

#[derive(Debug)]
struct Entry {
    msg_id: String,
    inserted: Instant,
    generation: u64,
}

impl SequenceIndex {
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            generation: 0,
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, config.ttl.filter(|&t| t > 0).map(Duration::from_secs))
    }

    fn key(peer: &str, seq: &str) -> String {
        format!("{peer}/{seq}")
    }

    pub fn put(&mut self, peer: &str, seq: &str, msg_id: &str) {
        let key = Self::key(peer, seq);
        let now = Instant::now();
        self.generation += 1;

        self.entries.insert(
            key.clone(),
            Entry {
                msg_id: msg_id.to_owned(),
                inserted: now,
                generation: self.generation,
            },
        );
        self.order.push_back((key, self.generation));

        self.evict(now);
    }

    pub fn get(&self, peer: &str, seq: &str) -> Option<&str> {
        let entry = self.entries.get(&Self::key(peer, seq))?;

        if let Some(ttl) = self.ttl {
            if entry.inserted.elapsed() > ttl {
                return None;
            }
        }

        Some(&entry.msg_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.generation = 0;
    }

    fn evict(&mut self, now: Instant) {
        while let Some((key, generation)) = self.order.front() {
            // 被覆盖过的 key 在队列里有多条记录, 只有最新的一条对应 map 中的值
            if let Some(entry) = self.entries.get(key) {
                if entry.generation == *generation {
                    let expired = self
                        .ttl
                        .map_or(false, |ttl| now.duration_since(entry.inserted) > ttl);

                    if !expired && self.entries.len() <= self.capacity {
                        break;
                    }

                    self.entries.remove(key);
                }
            }
            self.order.pop_front();
        }

        if self.order.len() > self.capacity * 2 {
            let entries = &self.entries;
            self.order.retain(|(key, generation)| {
                entries
                    .get(key)
                    .map_or(false, |entry| entry.generation == *generation)
            });
        }
    }
}

impl Default for SequenceIndex {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

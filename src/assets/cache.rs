use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Bounded cache of loaded assets. When full, the oldest insertion is
/// evicted first.
#[derive(Debug)]
pub struct AssetCache<K, V> {
    cache: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K, V> AssetCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        AssetCache {
            cache: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.cache.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains_key(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.cache.insert(key.clone(), value).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.cache.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

use std::collections::HashSet;

use crc32fast::Hasher;

/// Stable id seed for a page, derived from its key (slug or path) using CRC32
pub fn page_seed(page_key: &str) -> String {
    let mut buff = String::from(page_key);
    if !page_key.starts_with("page://") {
        buff = format!("page://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for new blocks within a page
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
    reserved: HashSet<String>,
}

impl IdGenerator {
    pub fn new(page_key: &str) -> Self {
        Self::from_seed(page_seed(page_key))
    }

    pub fn from_seed(seed: String) -> Self {
        Self {
            seed,
            count: 0,
            reserved: HashSet::new(),
        }
    }

    /// Never hand out any of `ids` (typically the ids already in a document)
    pub fn with_reserved(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.reserved.extend(ids);
        self
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> String {
        loop {
            self.count += 1;
            let id = format!("{}-{}", self.seed, self.count);
            if !self.reserved.contains(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

//! Chunked, copy-on-write storage for tree entries.
//!
//! Entries live in fixed-size chunks behind `Arc`s. Cloning an arena clones
//! the chunk pointers only; writing to an entry copies just the chunk it sits
//! in. A tree derived from an old one by incremental re-parse therefore shares
//! every chunk it never touched with its predecessor.

use std::sync::Arc;

const CHUNK_LEN: usize = 256;

#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    chunks: Vec<Arc<Vec<T>>>,
    len: usize,
}

impl<T: Clone> Arena<T> {
    pub(crate) fn new() -> Self {
        Self {
            chunks: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Appends `value` and returns its index.
    pub(crate) fn push(&mut self, value: T) -> u32 {
        let index = self.len as u32;
        match self.chunks.last_mut() {
            Some(chunk) if chunk.len() < CHUNK_LEN => Arc::make_mut(chunk).push(value),
            _ => {
                let mut chunk = Vec::with_capacity(CHUNK_LEN);
                chunk.push(value);
                self.chunks.push(Arc::new(chunk));
            }
        }
        self.len += 1;
        index
    }

    pub(crate) fn get(&self, index: u32) -> &T {
        let index = index as usize;
        &self.chunks[index / CHUNK_LEN][index % CHUNK_LEN]
    }

    pub(crate) fn set(&mut self, index: u32, value: T) {
        let index = index as usize;
        Arc::make_mut(&mut self.chunks[index / CHUNK_LEN])[index % CHUNK_LEN] = value;
    }

    /// Whether the entry at `index` lives in storage shared with `other`.
    pub(crate) fn shares_entry(&self, other: &Self, index: u32) -> bool {
        let chunk = index as usize / CHUNK_LEN;
        match (self.chunks.get(chunk), other.chunks.get(chunk)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

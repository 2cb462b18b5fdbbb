//! Memory accountant.
//!
//! Every byte the pipeline allocates — lexeme storage, AST nodes, symbol
//! names — flows through one accountant so a single ceiling governs the
//! whole run. Rather than wrapping raw pointers (which would need `unsafe`
//! to scan a real linked list of headers) each live allocation gets an
//! opaque [`AllocId`] handle into a slab, the same arena-indexed-by-integer-
//! handle pattern the AST arena uses.

use crate::error::{AllocId, MemoryError, MemoryResult};

/// Bytes charged per allocation on top of the requested size, standing in
/// for the `{ size, next }` header the source prefixes every block with.
const HEADER_OVERHEAD: usize = 2 * std::mem::size_of::<usize>();

struct Block {
    /// `None` once freed; the slot is then eligible for reuse.
    size: Option<usize>,
}

/// Outcome of a successful `alloc`/`realloc`: the handle, plus a warning
/// message if this call crossed the 90% watermark. Callers decide whether
/// and how to surface the warning (the accountant itself never prints).
#[derive(Debug)]
pub struct AllocOutcome {
    pub id: AllocId,
    pub warning: Option<String>,
}

pub struct MemoryAccountant {
    limit: usize,
    current_usage: usize,
    peak_usage: usize,
    blocks: Vec<Block>,
    free_list: Vec<u32>,
    /// True while usage has been at or above 90% without dropping back
    /// below it; used to emit the warning only on the crossing transition.
    above_watermark: bool,
}

impl MemoryAccountant {
    /// `limit == 0` means unbounded: the ceiling check is skipped entirely.
    pub fn init(limit: usize) -> Self {
        Self {
            limit,
            current_usage: 0,
            peak_usage: 0,
            blocks: Vec::new(),
            free_list: Vec::new(),
            above_watermark: false,
        }
    }

    pub fn current_usage(&self) -> usize {
        self.current_usage
    }

    pub fn max_usage(&self) -> usize {
        self.limit
    }

    pub fn peak_usage(&self) -> usize {
        self.peak_usage
    }

    fn charge(&mut self, total: usize) -> MemoryResult<()> {
        if self.limit > 0 && self.current_usage + total > self.limit {
            return Err(MemoryError::Exhausted {
                requested: total,
                current: self.current_usage,
                limit: self.limit,
            });
        }
        self.current_usage += total;
        self.peak_usage = self.peak_usage.max(self.current_usage);
        Ok(())
    }

    fn watermark_warning(&mut self) -> Option<String> {
        if self.limit == 0 {
            return None;
        }
        let ratio = self.current_usage as f64 / self.limit as f64;
        if ratio >= 0.9 {
            if !self.above_watermark {
                self.above_watermark = true;
                return Some(format!(
                    "Alerta: uso de memória entre 90% e 99% ({}/{} bytes)",
                    self.current_usage, self.limit
                ));
            }
        } else {
            self.above_watermark = false;
        }
        None
    }

    pub fn alloc(&mut self, size: usize) -> MemoryResult<AllocOutcome> {
        let total = size + HEADER_OVERHEAD;
        self.charge(total)?;

        let id = if let Some(reused) = self.free_list.pop() {
            self.blocks[reused as usize].size = Some(size);
            reused
        } else {
            let idx = self.blocks.len() as u32;
            self.blocks.push(Block { size: Some(size) });
            idx
        };

        Ok(AllocOutcome {
            id: AllocId(id),
            warning: self.watermark_warning(),
        })
    }

    /// `realloc(None, n)` behaves like `alloc(n)`. Shrinking never fails the
    /// ceiling check; only the growing delta is checked against the limit.
    pub fn realloc(&mut self, handle: Option<AllocId>, new_size: usize) -> MemoryResult<AllocOutcome> {
        let Some(AllocId(idx)) = handle else {
            return self.alloc(new_size);
        };

        let block = self
            .blocks
            .get_mut(idx as usize)
            .ok_or(MemoryError::InvalidHandle(AllocId(idx)))?;
        let old_size = block.size.ok_or(MemoryError::InvalidHandle(AllocId(idx)))?;

        if new_size <= old_size {
            let freed = old_size - new_size;
            self.current_usage -= freed;
        } else {
            let delta = new_size - old_size;
            self.charge(delta)?;
        }

        self.blocks[idx as usize].size = Some(new_size);
        Ok(AllocOutcome {
            id: AllocId(idx),
            warning: self.watermark_warning(),
        })
    }

    pub fn free(&mut self, handle: AllocId) -> MemoryResult<()> {
        let AllocId(idx) = handle;
        let block = self
            .blocks
            .get_mut(idx as usize)
            .ok_or(MemoryError::InvalidHandle(handle))?;
        let size = block.size.take().ok_or(MemoryError::InvalidHandle(handle))?;
        self.current_usage -= size + HEADER_OVERHEAD;
        self.free_list.push(idx);
        Ok(())
    }

    /// Frees every live block and zeroes the running tally. Peak usage is
    /// left untouched: it records the high-water mark of the whole run,
    /// not just what's live right now. Must be the last operation on this
    /// accountant before it's dropped; calling `alloc` afterwards is legal
    /// but starts a fresh accounting epoch with the same peak.
    pub fn cleanup(&mut self) {
        self.blocks.clear();
        self.free_list.clear();
        self.current_usage = 0;
        self.above_watermark = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_tracks_current_and_peak() {
        let mut acc = MemoryAccountant::init(0);
        let a = acc.alloc(100).unwrap().id;
        assert_eq!(acc.current_usage(), 100 + HEADER_OVERHEAD);
        acc.free(a).unwrap();
        assert_eq!(acc.current_usage(), 0);
        assert_eq!(acc.peak_usage(), 100 + HEADER_OVERHEAD);
    }

    #[test]
    fn exhausted_when_over_limit() {
        let mut acc = MemoryAccountant::init(32);
        let err = acc.alloc(64).unwrap_err();
        assert!(matches!(err, MemoryError::Exhausted { .. }));
    }

    #[test]
    fn warns_once_per_watermark_crossing() {
        let mut acc = MemoryAccountant::init(100);
        let first = acc.alloc(85).unwrap();
        assert!(first.warning.is_some());
        let second = acc.alloc(1).unwrap();
        assert!(second.warning.is_none());
    }

    #[test]
    fn shrinking_realloc_never_fails_ceiling() {
        let mut acc = MemoryAccountant::init(0);
        let a = acc.alloc(1000).unwrap().id;
        acc.realloc(Some(a), 10).unwrap();
        assert_eq!(acc.current_usage(), 10 + HEADER_OVERHEAD);
    }

    #[test]
    fn cleanup_zeroes_current_but_keeps_peak() {
        let mut acc = MemoryAccountant::init(0);
        acc.alloc(500).unwrap();
        acc.cleanup();
        assert_eq!(acc.current_usage(), 0);
        assert_eq!(acc.peak_usage(), 500 + HEADER_OVERHEAD);
    }

    #[test]
    fn realloc_none_is_alloc() {
        let mut acc = MemoryAccountant::init(0);
        let outcome = acc.realloc(None, 16).unwrap();
        assert_eq!(acc.current_usage(), 16 + HEADER_OVERHEAD);
        assert_eq!(outcome.id, AllocId(0));
    }
}

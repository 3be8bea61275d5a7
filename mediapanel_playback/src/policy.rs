use std::sync::atomic::{AtomicU32, Ordering};

/// Playback closer than this to the end starts over when resumed.
pub const TIME_REMAINING_BEFORE_RESTART_MS: u64 = 1_000;

pub fn should_restart(position_ms: u64, duration_ms: u64) -> bool {
    position_ms.saturating_add(TIME_REMAINING_BEFORE_RESTART_MS) > duration_ms
}

/// Index of the last track in `group`, which in adaptive streams is the
/// highest quality one. 0 if the group does not exist or is empty.
pub fn last_track_index(group_lengths: &[usize], group: usize) -> usize {
    match group_lengths.get(group) {
        Some(&len) if len > 0 => len - 1,
        Some(_) => 0,
        None => {
            tracing::warn!(
                "Track group {} out of range ({} groups)",
                group,
                group_lengths.len()
            );
            0
        }
    }
}

/// Hands out ids to tag player log lines with.
#[derive(Debug, Default)]
pub struct LogIdAllocator {
    next: AtomicU32,
}

impl LogIdAllocator {
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(0),
        }
    }

    pub fn next_id(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Uses `id` when given; only allocates otherwise.
    pub fn resolve(&self, id: Option<u32>) -> u32 {
        id.unwrap_or_else(|| self.next_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_near_end() {
        assert!(!should_restart(0, 60_000));
        assert!(!should_restart(59_000, 60_000));
        assert!(should_restart(59_001, 60_000));
        assert!(should_restart(60_000, 60_000));
        // Unknown or tiny durations always restart.
        assert!(should_restart(0, 0));
        assert!(should_restart(u64::MAX, 60_000));
        assert!(!should_restart(u64::MAX - 2_000, u64::MAX));
    }

    #[test]
    fn last_track() {
        assert_eq!(last_track_index(&[3, 5], 1), 4);
        assert_eq!(last_track_index(&[3, 0], 1), 0);
        assert_eq!(last_track_index(&[3], 4), 0);
    }

    #[test]
    fn explicit_ids_do_not_advance_counter() {
        let ids = LogIdAllocator::new();
        assert_eq!(ids.resolve(None), 0);
        assert_eq!(ids.resolve(Some(42)), 42);
        assert_eq!(ids.resolve(None), 1);
    }

    #[test]
    fn concurrent_allocation_is_unique() {
        let ids = LogIdAllocator::new();
        let mut all: Vec<u32> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..100).map(|_| ids.next_id()).collect::<Vec<_>>()))
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 400);
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Key = (u64, u64);

/// Per-`(guild_id, user_id)` async mutexes so read-modify-write sequences
/// on one record never interleave. Entries are dropped once nobody holds
/// or waits on them.
#[derive(Clone, Debug, Default)]
pub(crate) struct KeyLocks {
    slots: Arc<Mutex<HashMap<Key, Arc<AsyncMutex<()>>>>>,
}

pub(crate) struct KeyGuard {
    key: Key,
    guard: Option<OwnedMutexGuard<()>>,
    locks: KeyLocks,
}

impl KeyLocks {
    pub(crate) async fn lock(&self, guild_id: u64, user_id: u64) -> KeyGuard {
        let key = (guild_id, user_id);
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key).or_default())
        };

        KeyGuard {
            key,
            guard: Some(slot.lock_owned().await),
            locks: self.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut slots = self
            .locks
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slots
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::KeyLocks;

    #[tokio::test]
    async fn idle_keys_are_evicted() {
        let locks = KeyLocks::default();
        {
            let _guard = locks.lock(1, 2).await;
            assert_eq!(locks.tracked(), 1);
        }
        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn same_key_is_serialized() {
        let locks = KeyLocks::default();
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let inside = Arc::clone(&inside);
            let peak = Arc::clone(&peak);
            tasks.spawn(async move {
                let _guard = locks.lock(7, 7).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            });
        }
        while tasks.join_next().await.is_some() {}

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(locks.tracked(), 0);
    }
}

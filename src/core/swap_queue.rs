use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A thread-safe batch queue whose contents are exchanged wholesale.
///
/// `SwapQueue` is the handoff point between the simulation thread and the render
/// thread. Producers build a whole batch locally and hand it over in one short
/// critical section; consumers take everything that has accumulated the same way.
/// The lock is never held while items are built or consumed, only while two
/// `Vec` headers are exchanged (or, when both sides are non-empty, while the
/// incoming batch is appended).
///
/// Cloning a `SwapQueue` clones the handle, not the contents: every clone refers
/// to the same underlying queue.
///
/// # Ordering
/// Items pushed by one producer are drained in the order they were pushed.
/// No order is defined between batches of different producers beyond "whoever
/// took the lock first comes first".
///
/// # Examples
///
/// ```
/// use toroidal_voxel_world::core::SwapQueue;
///
/// let queue = SwapQueue::new();
/// queue.push_batch(vec![1, 2]);
/// queue.push_batch(vec![3, 4]);
///
/// assert_eq!(queue.drain(), vec![1, 2, 3, 4]);
/// assert!(queue.drain().is_empty());
/// ```
pub struct SwapQueue<T: Send> {
    pub items: Arc<Mutex<Vec<T>>>,
}

impl<T: Send> SwapQueue<T> {
    /// Creates a new, empty queue.
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Locks the queue contents.
    ///
    /// A panic on another thread while the lock was held cannot leave the `Vec`
    /// half-updated (every mutation is a single swap or append), so a poisoned
    /// lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hands a batch to the queue.
    ///
    /// If the queue is empty the batch is swapped in without copying. Otherwise
    /// the batch is appended after the items already waiting, so nothing that
    /// another producer pushed is lost.
    pub fn push_batch(&self, mut batch: Vec<T>) {
        if batch.is_empty() {
            return;
        }
        let mut items = self.lock();
        if items.is_empty() {
            std::mem::swap(&mut *items, &mut batch);
        } else {
            items.append(&mut batch);
        }
    }

    /// Pushes a single item.
    pub fn push(&self, item: T) {
        self.lock().push(item);
    }

    /// Exchanges the queue contents with `batch`.
    ///
    /// After the call `batch` holds everything that was queued and the queue holds
    /// what `batch` held before. Consumers typically pass an empty, reused `Vec`
    /// so its allocation travels back and forth between the two threads.
    pub fn swap(&self, batch: &mut Vec<T>) {
        std::mem::swap(&mut *self.lock(), batch);
    }

    /// Takes everything currently queued. Returns an empty `Vec` (and does not
    /// wait) when nothing is queued.
    pub fn drain(&self) -> Vec<T> {
        let mut drained = Vec::new();
        self.swap(&mut drained);
        drained
    }

    /// Number of items currently waiting.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no items are waiting.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T: Send> Default for SwapQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> Clone for SwapQueue<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

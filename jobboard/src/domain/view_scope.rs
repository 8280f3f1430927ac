//! Mount tracking for views that load data asynchronously.
//!
//! A view creates a [`ViewScope`] when it mounts and calls
//! [`ViewScope::unmount`] on teardown. Loads awaited through
//! [`ViewScope::deliver`] resolve to `None` once the view is gone, so a late
//! result never reaches a consumer that no longer exists.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use super::Subscription;

/// Lifetime of one mounted view. Clones share the same lifetime.
#[derive(Debug, Clone)]
pub struct ViewScope {
    mounted: Arc<watch::Sender<bool>>,
    subscriptions: Arc<Mutex<Vec<Subscription>>>,
}

impl ViewScope {
    /// A scope for a view that has just mounted.
    pub fn mount() -> Self {
        let (mounted, _) = watch::channel(true);
        Self {
            mounted: Arc::new(mounted),
            subscriptions: Arc::default(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        *self.mounted.borrow()
    }

    /// Tear the view down: pending deliveries resolve to `None` and retained
    /// session subscriptions are dropped.
    pub fn unmount(&self) {
        self.mounted.send_replace(false);
        let retained = std::mem::take(
            &mut *self
                .subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        drop(retained);
    }

    /// Keep a session subscription alive until the view unmounts.
    ///
    /// Retaining on an unmounted scope drops the subscription immediately.
    pub fn retain(&self, subscription: Subscription) {
        if self.is_mounted() {
            self.subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(subscription);
        }
    }

    /// Await `load` on behalf of the view.
    ///
    /// Returns `None`, discarding the output, when the view unmounts before
    /// or while the load runs. An unmount abandons the load future.
    ///
    /// # Examples
    /// ```
    /// use jobboard::domain::ViewScope;
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
    /// let scope = ViewScope::mount();
    /// assert_eq!(scope.deliver(async { 42 }).await, Some(42));
    ///
    /// scope.unmount();
    /// assert_eq!(scope.deliver(async { 42 }).await, None);
    /// # });
    /// ```
    pub async fn deliver<F>(&self, load: F) -> Option<F::Output>
    where
        F: Future,
    {
        if !self.is_mounted() {
            debug!("load skipped: view already unmounted");
            return None;
        }
        let mut unmounted = self.mounted.subscribe();
        tokio::select! {
            output = load => {
                if self.is_mounted() {
                    Some(output)
                } else {
                    debug!("load result discarded: view unmounted");
                    None
                }
            }
            _ = unmounted.wait_for(|mounted| !*mounted) => {
                debug!("load abandoned: view unmounted");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn delivers_while_mounted() {
        let scope = ViewScope::mount();
        assert_eq!(scope.deliver(async { "jobs" }).await, Some("jobs"));
    }

    #[tokio::test]
    async fn unmount_during_load_discards_result() {
        let scope = ViewScope::mount();
        let (tx, rx) = oneshot::channel::<Vec<u32>>();
        let applied = Arc::new(AtomicUsize::new(0));

        let pending = tokio::spawn({
            let scope = scope.clone();
            let applied = Arc::clone(&applied);
            async move {
                if let Some(rows) = scope.deliver(rx).await {
                    applied.fetch_add(rows.map(|r| r.len()).unwrap_or_default(), Ordering::SeqCst);
                }
            }
        });
        tokio::task::yield_now().await;

        scope.unmount();
        let _ = tx.send(vec![1, 2, 3]);
        pending.await.expect("task joins");

        assert_eq!(applied.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn clones_share_one_lifetime() {
        let scope = ViewScope::mount();
        let other = scope.clone();
        other.unmount();
        assert!(!scope.is_mounted());
        assert_eq!(scope.deliver(async { 1 }).await, None);
    }
}

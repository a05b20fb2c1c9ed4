//! Toast notifications with automatic dismissal.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ragchat_core::toast::{Toast, ToastKind, ToastQueue};
use tokio::sync::watch;
use tokio::task::AbortHandle;

/// Owns the visible toasts and one timer per toast.
///
/// Each toast is dismissed after its duration. Renderers observe changes via
/// [`ToastCenter::subscribe`]. Dropping the center aborts every pending timer.
pub struct ToastCenter {
    queue: Arc<watch::Sender<ToastQueue>>,
    timers: Arc<Mutex<HashMap<String, AbortHandle>>>,
}

impl ToastCenter {
    pub fn new(default_duration: Duration) -> Self {
        let (queue, _) = watch::channel(ToastQueue::new(default_duration));
        Self {
            queue: Arc::new(queue),
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Shows a toast and schedules its dismissal.
    ///
    /// Outside a Tokio runtime the toast stays until dismissed explicitly.
    pub fn show(
        &self,
        kind: ToastKind,
        title: impl Into<String>,
        message: Option<String>,
        duration: Option<Duration>,
    ) -> Toast {
        let toast = self.queue.borrow().create(kind, title, message, duration);
        self.queue.send_modify(|queue| queue.insert(toast.clone()));

        tracing::debug!("[Toast] {:?}: {}", toast.kind, toast.title);
        self.schedule_dismiss(&toast);
        toast
    }

    pub fn success(&self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.show(ToastKind::Success, title, message, None)
    }

    pub fn error(&self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.show(ToastKind::Error, title, message, None)
    }

    pub fn warning(&self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.show(ToastKind::Warning, title, message, None)
    }

    pub fn info(&self, title: impl Into<String>, message: Option<String>) -> Toast {
        self.show(ToastKind::Info, title, message, None)
    }

    /// Removes a toast before its timer fires.
    pub fn dismiss(&self, id: &str) {
        if let Ok(mut timers) = self.timers.lock() {
            if let Some(timer) = timers.remove(id) {
                timer.abort();
            }
        }
        self.queue.send_if_modified(|queue| {
            let before = queue.toasts().len();
            queue.dismiss(id);
            queue.toasts().len() != before
        });
    }

    /// Currently visible toasts, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.queue.borrow().toasts().to_vec()
    }

    pub fn subscribe(&self) -> watch::Receiver<ToastQueue> {
        self.queue.subscribe()
    }

    fn schedule_dismiss(&self, toast: &Toast) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("[Toast] No runtime, toast {} will not auto-dismiss", toast.id);
            return;
        };
        let Ok(mut timers) = self.timers.lock() else {
            return;
        };

        let id = toast.id.clone();
        let duration = toast.duration;
        let queue = Arc::clone(&self.queue);
        let task_timers = Arc::clone(&self.timers);
        let task = handle.spawn(async move {
            tokio::time::sleep(duration).await;
            queue.send_modify(|queue| queue.dismiss(&id));
            if let Ok(mut timers) = task_timers.lock() {
                timers.remove(&id);
            }
        });
        // Inserted while the map is locked, so the task's removal always comes after.
        timers.insert(toast.id.clone(), task.abort_handle());
    }
}

impl Drop for ToastCenter {
    fn drop(&mut self) {
        if let Ok(mut timers) = self.timers.lock() {
            for (_, timer) in timers.drain() {
                timer.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toast_auto_dismisses() {
        let center = ToastCenter::new(Duration::from_millis(5000));
        center.success("Conversation loaded", None);
        assert_eq!(center.toasts().len(), 1);

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(center.toasts().len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(center.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_duration() {
        let center = ToastCenter::new(Duration::from_millis(5000));
        center.show(ToastKind::Info, "Quick", None, Some(Duration::from_millis(100)));
        center.error("Slow", Some("details".to_string()));

        tokio::time::sleep(Duration::from_millis(150)).await;
        let remaining = center.toasts();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Slow");
        assert_eq!(remaining[0].kind, ToastKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismiss_cancels_timer() {
        let center = ToastCenter::new(Duration::from_millis(5000));
        let toast = center.warning("Heads up", None);
        center.dismiss(&toast.id);

        assert!(center.toasts().is_empty());
        assert!(center.timers.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_changes() {
        let center = ToastCenter::new(Duration::from_millis(1000));
        let mut rx = center.subscribe();
        center.info("Hello", None);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().toasts().len(), 1);

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_timers() {
        let center = ToastCenter::new(Duration::from_millis(1000));
        let rx = center.subscribe();
        center.info("Bye", None);
        drop(center);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        // The timer never fired, so the last published state still holds the toast.
        assert_eq!(rx.borrow().toasts().len(), 1);
    }

    #[test]
    fn test_without_runtime_toast_stays() {
        let center = ToastCenter::new(Duration::from_millis(10));
        center.success("Saved", None);
        assert_eq!(center.toasts().len(), 1);
    }
}

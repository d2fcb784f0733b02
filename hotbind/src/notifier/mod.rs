//! 快捷键变更通知
//!
//! 按名称发布/订阅。订阅表使用 `ArcSwap` 写时复制：发布时取快照，
//! 投递过程中新增的订阅者不会收到本次通知。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;

use crate::names::Name;

/// 变更处理函数
pub type ChangeHandler = Arc<dyn Fn(&Name) + Send + Sync>;

#[derive(Clone)]
struct Subscriber {
    id: u64,
    handler: ChangeHandler,
}

type SubscriberTable = HashMap<Name, Vec<Subscriber>>;

struct NotifierInner {
    next_id: AtomicU64,
    subscribers: ArcSwap<SubscriberTable>,
}

impl NotifierInner {
    fn remove(&self, name: &Name, id: u64) {
        self.subscribers.rcu(|table| {
            let mut table = SubscriberTable::clone(table);
            if let Some(list) = table.get_mut(name) {
                list.retain(|s| s.id != id);
                if list.is_empty() {
                    table.remove(name);
                }
            }
            table
        });
    }
}

/// 变更通知中心
#[derive(Clone)]
pub struct ChangeNotifier {
    inner: Arc<NotifierInner>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                next_id: AtomicU64::new(1),
                subscribers: ArcSwap::from_pointee(SubscriberTable::new()),
            }),
        }
    }

    /// 订阅名称的绑定变更
    ///
    /// 返回的 [`Subscription`] 被释放时自动取消订阅。
    pub fn subscribe<F>(&self, name: &Name, handler: F) -> Subscription
    where
        F: Fn(&Name) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let subscriber = Subscriber {
            id,
            handler: Arc::new(handler),
        };

        self.inner.subscribers.rcu(|table| {
            let mut table = SubscriberTable::clone(table);
            table
                .entry(name.clone())
                .or_default()
                .push(subscriber.clone());
            table
        });
        tracing::debug!(name = %name, id, "Shortcut change subscriber added");

        Subscription {
            id,
            name: name.clone(),
            notifier: Some(Arc::downgrade(&self.inner)),
        }
    }

    /// 通知名称的全部当前订阅者
    pub fn publish(&self, name: &Name) {
        let snapshot = self.inner.subscribers.load_full();
        let Some(subscribers) = snapshot.get(name) else {
            return;
        };
        tracing::debug!(name = %name, count = subscribers.len(), "Publishing shortcut change");
        for subscriber in subscribers {
            (subscriber.handler)(name);
        }
    }

    pub fn subscriber_count(&self, name: &Name) -> usize {
        self.inner
            .subscribers
            .load()
            .get(name)
            .map_or(0, Vec::len)
    }

    /// 移除全部订阅
    pub fn clear(&self) {
        self.inner.subscribers.store(Arc::new(SubscriberTable::new()));
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// 订阅凭证
#[must_use = "the subscription is cancelled when this value is dropped"]
pub struct Subscription {
    id: u64,
    name: Name,
    notifier: Option<Weak<NotifierInner>>,
}

impl Subscription {
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// 取消订阅，可重复调用
    pub fn dispose(&mut self) {
        if let Some(inner) = self.notifier.take().and_then(|weak| weak.upgrade()) {
            inner.remove(&self.name, self.id);
            tracing::debug!(name = %self.name, id = self.id, "Shortcut change subscriber removed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.notifier.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    fn counting(notifier: &ChangeNotifier, name: &Name) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let clone = Arc::clone(&count);
        let subscription = notifier.subscribe(name, move |_| {
            clone.fetch_add(1, Ordering::SeqCst);
        });
        (count, subscription)
    }

    #[test]
    fn test_publish_reaches_only_matching_name() {
        let notifier = ChangeNotifier::new();
        let a = Name::new("a", None);
        let b = Name::new("b", None);

        let (count_a, _sub_a) = counting(&notifier, &a);
        let (count_b, _sub_b) = counting(&notifier, &b);

        notifier.publish(&a);
        notifier.publish(&a);

        assert_eq!(count_a.load(Ordering::SeqCst), 2);
        assert_eq!(count_b.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let notifier = ChangeNotifier::new();
        let name = Name::new("a", None);
        let (count, mut subscription) = counting(&notifier, &name);

        subscription.dispose();
        subscription.dispose();
        assert!(!subscription.is_active());
        assert_eq!(notifier.subscriber_count(&name), 0);

        notifier.publish(&name);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let notifier = ChangeNotifier::new();
        let name = Name::new("a", None);
        {
            let (_count, _subscription) = counting(&notifier, &name);
            assert_eq!(notifier.subscriber_count(&name), 1);
        }
        assert_eq!(notifier.subscriber_count(&name), 0);
    }

    #[test]
    fn test_subscriber_added_during_publish_is_not_notified() {
        let notifier = ChangeNotifier::new();
        let name = Name::new("a", None);
        let late_calls = Arc::new(AtomicUsize::new(0));
        let late_subscriptions: Arc<Mutex<Vec<Subscription>>> = Arc::default();

        let _outer = {
            let notifier = notifier.clone();
            let late_calls = Arc::clone(&late_calls);
            let late_subscriptions = Arc::clone(&late_subscriptions);
            notifier.clone().subscribe(&name, move |name| {
                let late_calls = Arc::clone(&late_calls);
                let subscription = notifier.subscribe(name, move |_| {
                    late_calls.fetch_add(1, Ordering::SeqCst);
                });
                late_subscriptions.lock().unwrap().push(subscription);
            })
        };

        notifier.publish(&name);
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.subscriber_count(&name), 2);

        notifier.publish(&name);
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_outlives_notifier() {
        let notifier = ChangeNotifier::new();
        let name = Name::new("a", None);
        let (_count, mut subscription) = counting(&notifier, &name);
        drop(notifier);
        subscription.dispose();
        assert!(!subscription.is_active());
    }
}

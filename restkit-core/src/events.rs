use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::RwLock;

type Handler = Arc<
    dyn Fn(Arc<dyn Any + Send + Sync>) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync,
>;

/// In-process event bus with typed pub/sub.
///
/// Events are dispatched by `TypeId`: subscribers register for a concrete
/// event type and receive an `Arc<E>` whenever that type is emitted. This is
/// the cross-cutting publication service feature modules import from the
/// events module.
///
/// `EventBus` is `Clone` and can be shared across tasks.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<TypeId, Vec<Handler>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events of type `E`.
    ///
    /// The handler receives `Arc<E>` and is called for every `emit()` of
    /// that type.
    pub async fn subscribe<E, F, Fut>(&self, handler: F)
    where
        E: Send + Sync + 'static,
        F: Fn(Arc<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let type_id = TypeId::of::<E>();
        let handler: Handler = Arc::new(move |any| {
            let event = any.downcast::<E>().expect("event type mismatch");
            Box::pin(handler(event))
        });
        let mut handlers = self.handlers.write().await;
        handlers.entry(type_id).or_default().push(handler);
    }

    /// Emit an event, spawning all subscribers as concurrent tasks.
    ///
    /// Returns after the handlers have been spawned, not completed.
    pub async fn emit<E: Send + Sync + 'static>(&self, event: E) {
        let type_id = TypeId::of::<E>();
        let event = Arc::new(event) as Arc<dyn Any + Send + Sync>;
        let handlers = self.handlers.read().await;
        if let Some(subs) = handlers.get(&type_id) {
            for handler in subs {
                let h = handler.clone();
                let e = event.clone();
                tokio::spawn(async move {
                    h(e).await;
                });
            }
        }
    }

    /// Emit an event and wait for all subscribers to complete.
    pub async fn emit_and_wait<E: Send + Sync + 'static>(&self, event: E) {
        let type_id = TypeId::of::<E>();
        let event = Arc::new(event) as Arc<dyn Any + Send + Sync>;
        let handlers = self.handlers.read().await;
        if let Some(subs) = handlers.get(&type_id) {
            let mut tasks = Vec::new();
            for handler in subs {
                let h = handler.clone();
                let e = event.clone();
                tasks.push(tokio::spawn(async move {
                    h(e).await;
                }));
            }
            for task in tasks {
                let _ = task.await;
            }
        }
    }

    /// Number of subscribers currently registered for event type `E`.
    pub async fn subscriber_count<E: Send + Sync + 'static>(&self) -> usize {
        self.handlers
            .read()
            .await
            .get(&TypeId::of::<E>())
            .map(|subs| subs.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct Ping {
        value: u32,
    }

    #[tokio::test]
    async fn emit_reaches_all_subscribers() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicU32::new(0));

        for _ in 0..2 {
            let seen = seen.clone();
            bus.subscribe::<Ping, _, _>(move |event| {
                let seen = seen.clone();
                async move {
                    seen.fetch_add(event.value, Ordering::SeqCst);
                }
            })
            .await;
        }

        bus.emit_and_wait(Ping { value: 3 }).await;
        assert_eq!(seen.load(Ordering::SeqCst), 6);
        assert_eq!(bus.subscriber_count::<Ping>().await, 2);
    }

    #[tokio::test]
    async fn emit_without_subscribers_is_a_noop() {
        let bus = EventBus::new();
        bus.emit(Ping { value: 1 }).await;
        assert_eq!(bus.subscriber_count::<Ping>().await, 0);
    }
}

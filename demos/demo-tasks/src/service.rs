use std::any::{type_name, TypeId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use restkit::crud::{CrudError, CrudService};
use restkit::{Bean, BeanContext, EventBus};

use crate::models::{CreateTask, Task, TaskCreatedEvent, TaskFilter, UpdateTask};

#[derive(Default)]
struct Store {
    tasks: BTreeMap<u64, Task>,
    next_id: u64,
    // One level deep: the controller never nests begin calls.
    snapshot: Option<(BTreeMap<u64, Task>, u64)>,
}

/// In-memory task store with snapshot-based transactions.
///
/// `begin` captures the store, `commit` discards the snapshot, and
/// `rollback` restores it, so a failed operation leaves no partial writes.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<Mutex<Store>>,
    events: EventBus,
}

impl TaskService {
    pub fn new(events: EventBus) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store {
                next_id: 1,
                ..Default::default()
            })),
            events,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().tasks.is_empty()
    }
}

impl Bean for TaskService {
    fn dependencies() -> Vec<(TypeId, &'static str)> {
        vec![(TypeId::of::<EventBus>(), type_name::<EventBus>())]
    }

    fn build(ctx: &BeanContext) -> Self {
        Self::new(ctx.get::<EventBus>())
    }
}

impl CrudService for TaskService {
    type Entity = Task;
    type Id = u64;
    type Filter = TaskFilter;
    type Create = CreateTask;
    type Update = UpdateTask;

    async fn find(&self, filter: TaskFilter) -> Result<Vec<Task>, CrudError> {
        let store = self.lock();
        Ok(store
            .tasks
            .values()
            .filter(|t| filter.done.is_none_or(|done| t.done == done))
            .filter(|t| {
                filter
                    .q
                    .as_deref()
                    .is_none_or(|q| t.title.contains(q))
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &u64) -> Result<Option<Task>, CrudError> {
        Ok(self.lock().tasks.get(id).cloned())
    }

    async fn create(&self, params: CreateTask) -> Result<Task, CrudError> {
        let task = {
            let mut store = self.lock();
            let id = store.next_id;
            store.next_id += 1;
            let task = Task {
                id,
                title: params.title,
                done: params.done,
            };
            store.tasks.insert(id, task.clone());
            task
        };
        self.events
            .emit(TaskCreatedEvent {
                id: task.id,
                title: task.title.clone(),
            })
            .await;
        Ok(task)
    }

    async fn update(&self, id: &u64, params: UpdateTask) -> Result<Task, CrudError> {
        let mut store = self.lock();
        match store.tasks.get_mut(id) {
            Some(task) => {
                task.title = params.title;
                task.done = params.done;
                Ok(task.clone())
            }
            None => Err(CrudError::NotFound(format!("task {id}"))),
        }
    }

    async fn delete(&self, id: &u64) -> Result<bool, CrudError> {
        Ok(self.lock().tasks.remove(id).is_some())
    }

    async fn begin(&self) -> Result<(), CrudError> {
        let mut store = self.lock();
        let snapshot = (store.tasks.clone(), store.next_id);
        store.snapshot = Some(snapshot);
        Ok(())
    }

    async fn commit(&self) -> Result<(), CrudError> {
        self.lock().snapshot = None;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), CrudError> {
        let mut store = self.lock();
        if let Some((tasks, next_id)) = store.snapshot.take() {
            store.tasks = tasks;
            store.next_id = next_id;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TaskService {
        TaskService::new(EventBus::new())
    }

    #[tokio::test]
    async fn rollback_restores_the_snapshot() {
        let svc = service();
        svc.begin().await.unwrap();
        svc.create(CreateTask {
            title: "write docs".into(),
            done: false,
        })
        .await
        .unwrap();
        assert_eq!(svc.len(), 1);

        svc.rollback().await.unwrap();
        assert!(svc.is_empty());

        // Ids are restored too, so the next create reuses the slot.
        svc.begin().await.unwrap();
        let task = svc
            .create(CreateTask {
                title: "again".into(),
                done: false,
            })
            .await
            .unwrap();
        svc.commit().await.unwrap();
        assert_eq!(task.id, 1);
    }

    #[tokio::test]
    async fn filters_compose() {
        let svc = service();
        svc.begin().await.unwrap();
        for (title, done) in [("buy milk", false), ("buy stamps", true), ("ship crate", true)] {
            svc.create(CreateTask {
                title: title.into(),
                done,
            })
            .await
            .unwrap();
        }
        svc.commit().await.unwrap();

        let done = svc
            .find(TaskFilter {
                done: Some(true),
                q: Some("buy".into()),
            })
            .await
            .unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "buy stamps");
    }

    #[tokio::test]
    async fn create_publishes_an_event() {
        let events = EventBus::new();
        let seen = Arc::new(std::sync::atomic::AtomicU64::new(0));
        let seen_in_handler = seen.clone();
        events
            .subscribe::<TaskCreatedEvent, _, _>(move |event| {
                let seen = seen_in_handler.clone();
                async move {
                    seen.store(event.id, std::sync::atomic::Ordering::SeqCst);
                }
            })
            .await;

        let svc = TaskService::new(events.clone());
        svc.begin().await.unwrap();
        svc.create(CreateTask {
            title: "emit".into(),
            done: false,
        })
        .await
        .unwrap();
        svc.commit().await.unwrap();

        events.emit_and_wait(TaskCreatedEvent { id: 99, title: "flush".into() }).await;
        assert!(seen.load(std::sync::atomic::Ordering::SeqCst) > 0);
    }
}

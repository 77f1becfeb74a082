use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use api::error::ApiError;
use api::remote::{InMemoryCourseApi, ProgressRecord, ProgressStore};
use api::session::{MemorySessionStore, SessionStore};
use curso_core::model::{ChapterId, Session};
use services::ProgressService;

fn signed_in() -> Arc<dyn SessionStore> {
    Arc::new(MemorySessionStore::with_session(
        Session::new("tok-1", None).unwrap(),
    ))
}

fn id(n: u64) -> ChapterId {
    ChapterId::new(n)
}

/// Progress store whose mutations block until the test acknowledges them,
/// so response arrival order can be controlled explicitly.
#[derive(Default)]
struct ManualAckStore {
    initially_completed: Vec<ChapterId>,
    pending: Mutex<VecDeque<(ChapterId, oneshot::Sender<Result<(), ApiError>>)>>,
}

impl ManualAckStore {
    fn with_completed(ids: Vec<ChapterId>) -> Self {
        Self {
            initially_completed: ids,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    fn pending_len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    fn ack_oldest(&self) {
        let (_, tx) = self
            .pending
            .lock()
            .unwrap()
            .pop_front()
            .expect("a pending mutation to acknowledge");
        tx.send(Ok(())).expect("receiver still waiting");
    }

    fn ack_newest(&self) {
        let (_, tx) = self
            .pending
            .lock()
            .unwrap()
            .pop_back()
            .expect("a pending mutation to acknowledge");
        tx.send(Ok(())).expect("receiver still waiting");
    }

    async fn enqueue(&self, chapter: ChapterId) -> Result<(), ApiError> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back((chapter, tx));
        rx.await.expect("test acknowledges every mutation")
    }
}

#[async_trait]
impl ProgressStore for ManualAckStore {
    async fn fetch_progress(&self) -> Result<Vec<ProgressRecord>, ApiError> {
        Ok(self
            .initially_completed
            .iter()
            .map(|&chapter_id| ProgressRecord {
                chapter_id,
                is_completed: true,
            })
            .collect())
    }

    async fn mark_watched(&self, chapter: ChapterId) -> Result<(), ApiError> {
        self.enqueue(chapter).await
    }

    async fn remove_progress(&self, chapter: ChapterId) -> Result<(), ApiError> {
        self.enqueue(chapter).await
    }
}

async fn wait_for_pending(store: &ManualAckStore, count: usize) {
    for _ in 0..1000 {
        if store.pending_len() == count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("pending mutations never reached {count}");
}

#[tokio::test]
async fn reverse_ack_order_keeps_call_order_state() {
    let store = Arc::new(ManualAckStore::with_completed(vec![id(2)]));
    let service = Arc::new(ProgressService::new(
        Arc::clone(&store) as Arc<dyn ProgressStore>,
        signed_in(),
    ));
    service.load_progress().await.unwrap();
    assert!(service.is_completed(id(2)));

    // unmark(2) then mark(2); the mark's acknowledgment arrives first.
    let svc = Arc::clone(&service);
    let unmark = tokio::spawn(async move { svc.unmark_completed(id(2)).await });
    wait_for_pending(&store, 1).await;

    let svc = Arc::clone(&service);
    let mark = tokio::spawn(async move { svc.mark_completed(id(2)).await });
    wait_for_pending(&store, 2).await;

    store.ack_newest();
    mark.await.unwrap().unwrap();
    assert!(service.is_completed(id(2)));

    store.ack_oldest();
    unmark.await.unwrap().unwrap();

    // The later action wins even though its response arrived first.
    assert!(service.is_completed(id(2)));
}

#[tokio::test]
async fn duplicate_in_flight_marks_converge_to_single_membership() {
    let store = Arc::new(ManualAckStore::default());
    let service = Arc::new(ProgressService::new(
        Arc::clone(&store) as Arc<dyn ProgressStore>,
        signed_in(),
    ));

    let svc = Arc::clone(&service);
    let first = tokio::spawn(async move { svc.mark_completed(id(3)).await });
    wait_for_pending(&store, 1).await;

    let svc = Arc::clone(&service);
    let second = tokio::spawn(async move { svc.mark_completed(id(3)).await });
    wait_for_pending(&store, 2).await;

    store.ack_newest();
    second.await.unwrap().unwrap();
    store.ack_oldest();
    first.await.unwrap().unwrap();

    let snapshot = service.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.contains(id(3)));
}

#[tokio::test]
async fn load_projects_only_completed_records() {
    let backend = Arc::new(InMemoryCourseApi::new());
    backend.set_completed([id(2), id(5)]);
    // A row flagged isCompleted=false must not show up in the set.
    backend.remove_progress(id(7)).await.unwrap();

    let service = ProgressService::new(Arc::clone(&backend) as Arc<dyn ProgressStore>, signed_in());
    let set = service.load_progress().await.unwrap();

    assert!(set.contains(id(2)));
    assert!(set.contains(id(5)));
    assert!(!set.contains(id(7)));
}

#[tokio::test]
async fn remount_reload_replaces_stale_membership() {
    let backend = Arc::new(InMemoryCourseApi::new());
    backend.set_completed([id(1)]);

    let service = ProgressService::new(Arc::clone(&backend) as Arc<dyn ProgressStore>, signed_in());
    service.load_progress().await.unwrap();
    assert!(service.is_completed(id(1)));

    // Server-side state moved on; the next load must not merge.
    backend.remove_progress(id(1)).await.unwrap();
    backend.set_completed([id(4)]);
    let set = service.load_progress().await.unwrap();

    assert!(!set.contains(id(1)));
    assert!(set.contains(id(4)));
}

//! Concurrency tests for the keyed scope store.
//!
//! Many admins reassigning the same moderator at once must still leave
//! exactly one row, and readers running alongside must only ever observe
//! a complete row that one of the writers submitted.

use modscope_store::{MemoryScopeStore, ScopeStore};
use modscope_types::{EntityId, Scope, UserId};
use std::sync::Arc;

fn candidate_scopes() -> Vec<Scope> {
    vec![
        Scope::All,
        Scope::State {
            state: "Kerala".into(),
        },
        Scope::City {
            state: "Maharashtra".into(),
            city: "Mumbai".into(),
        },
        Scope::Entity {
            entity_id: EntityId::new("org-1"),
        },
    ]
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reassignment_leaves_one_submitted_row() {
    let store = Arc::new(MemoryScopeStore::new());
    let moderator = UserId::new("mod-1");
    let candidates = candidate_scopes();

    let mut writers = Vec::new();
    for round in 0..64 {
        let store = Arc::clone(&store);
        let moderator = moderator.clone();
        let scope = candidates[round % candidates.len()].clone();
        writers.push(tokio::spawn(async move {
            store
                .replace(&moderator, scope, Some(UserId::new(format!("admin-{round}"))))
                .await
                .unwrap();
        }));
    }

    let mut readers = Vec::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        let moderator = moderator.clone();
        let candidates = candidates.clone();
        readers.push(tokio::spawn(async move {
            for _ in 0..32 {
                if let Some(row) = store.get(&moderator).await.unwrap() {
                    assert!(candidates.contains(&row.scope));
                    assert_eq!(row.created_by, row.updated_by);
                }
                tokio::task::yield_now().await;
            }
        }));
    }

    for handle in writers.into_iter().chain(readers) {
        handle.await.unwrap();
    }

    assert_eq!(store.len(), 1);
    let row = store.get(&moderator).await.unwrap().unwrap();
    assert!(candidates.contains(&row.scope));
}

#[tokio::test]
async fn moderators_do_not_share_rows() {
    let store = MemoryScopeStore::new();
    let a = UserId::new("mod-a");
    let b = UserId::new("mod-b");

    store.replace(&a, Scope::All, None).await.unwrap();
    store
        .replace(
            &b,
            Scope::State {
                state: "Delhi".into(),
            },
            None,
        )
        .await
        .unwrap();
    store.remove(&a).await.unwrap();

    assert!(store.get(&a).await.unwrap().is_none());
    assert_eq!(
        store.get(&b).await.unwrap().unwrap().scope.state(),
        Some("Delhi")
    );
}

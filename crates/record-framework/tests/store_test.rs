use chrono::{DateTime, Utc};
use record_framework::{
    FrameworkError, ListFilter, PageRequest, RecordEntity, RecordStore, Sort, StoreClient,
};
use serde::Serialize;
use std::cmp::Ordering;

// --- Test Entity ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct MemberId(u64);

impl From<u64> for MemberId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<MemberId> for u64 {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Member {
    id: u64,
    name: String,
    email: String,
    club: String,
    joined_at: DateTime<Utc>,
}

#[derive(Debug)]
struct MemberCreate {
    name: String,
    email: String,
    club: String,
}

#[derive(Debug, Default)]
struct MemberUpdate {
    name: Option<String>,
    email: Option<String>,
}

impl RecordEntity for Member {
    const KIND: &'static str = "member";
    type Id = MemberId;
    type Create = MemberCreate;
    type Update = MemberUpdate;
    type Snapshot = Member;

    fn from_create_params(id: MemberId, params: MemberCreate, now: DateTime<Utc>) -> Self {
        Self {
            id: id.0,
            name: params.name,
            email: params.email,
            club: params.club,
            joined_at: now,
        }
    }

    fn id(&self) -> MemberId {
        MemberId(self.id)
    }

    fn identifying_field(&self) -> &str {
        &self.email
    }

    fn normalize_key(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    fn apply_update(&mut self, update: MemberUpdate, _now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        Some(&self.club)
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["id", "name", "email"]
    }

    fn compare_by(&self, other: &Self, field: &str) -> Option<Ordering> {
        match field {
            "email" => Some(self.email.cmp(&other.email)),
            "id" => Some(self.id.cmp(&other.id)),
            "name" => Some(self.name.cmp(&other.name)),
            _ => None,
        }
    }

    fn snapshot(&self) -> Member {
        self.clone()
    }
}

fn member(name: &str, email: &str, club: &str) -> MemberCreate {
    MemberCreate {
        name: name.into(),
        email: email.into(),
        club: club.into(),
    }
}

fn spawn_store() -> StoreClient<Member> {
    let (store, client) = RecordStore::<Member>::new(16);
    tokio::spawn(store.run());
    client
}

// --- Tests ---

#[tokio::test]
async fn test_insert_get_and_key_lookup() {
    let client = spawn_store();

    let ana = client
        .insert(member("Ana", "ana@school.edu", "chess"))
        .await
        .unwrap();
    assert_eq!(ana.id, 1);

    let fetched = client.get(MemberId(1)).await.unwrap().unwrap();
    assert_eq!(fetched, ana);

    // Key lookups normalize the same way the index does.
    let by_key = client.get_by_key("  ANA@School.edu ").await.unwrap();
    assert_eq!(by_key.map(|m| m.id), Some(1));
    assert!(client.exists_by_key("ana@SCHOOL.EDU").await.unwrap());
    assert!(!client.exists_by_key("bob@school.edu").await.unwrap());
    assert!(client.get(MemberId(99)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_insert_rejects_duplicate_key() {
    let client = spawn_store();
    client
        .insert(member("Ana", "ana@school.edu", "chess"))
        .await
        .unwrap();

    let result = client
        .insert(member("Other Ana", "ANA@school.edu", "music"))
        .await;

    assert_eq!(
        result,
        Err(FrameworkError::UniqueViolation {
            kind: "member",
            key: "ana@school.edu".into()
        })
    );

    // A rejected insert does not burn an id.
    let bob = client
        .insert(member("Bob", "bob@school.edu", "chess"))
        .await
        .unwrap();
    assert_eq!(bob.id, 2);
}

#[tokio::test]
async fn test_update_moves_index_and_rejects_taken_key() {
    let client = spawn_store();
    let ana = client
        .insert(member("Ana", "ana@school.edu", "chess"))
        .await
        .unwrap();
    let bob = client
        .insert(member("Bob", "bob@school.edu", "chess"))
        .await
        .unwrap();

    let taken = client
        .update(
            bob.id(),
            MemberUpdate {
                email: Some("Ana@School.edu".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(taken, Err(FrameworkError::UniqueViolation { .. })));
    let unchanged = client.get(bob.id()).await.unwrap().unwrap();
    assert_eq!(unchanged.email, "bob@school.edu");

    // Re-submitting your own key in another case is not a conflict.
    let same = client
        .update(
            ana.id(),
            MemberUpdate {
                email: Some("ANA@school.edu".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.email, "ANA@school.edu");

    client
        .update(
            bob.id(),
            MemberUpdate {
                email: Some("robert@school.edu".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!client.exists_by_key("bob@school.edu").await.unwrap());
    assert!(client.exists_by_key("robert@school.edu").await.unwrap());

    let missing = client
        .update(MemberId(42), MemberUpdate::default())
        .await;
    assert!(matches!(missing, Err(FrameworkError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_frees_key_and_never_reuses_id() {
    let client = spawn_store();
    let ana = client
        .insert(member("Ana", "ana@school.edu", "chess"))
        .await
        .unwrap();

    client.delete(ana.id()).await.unwrap();
    assert!(!client.exists(ana.id()).await.unwrap());
    assert_eq!(
        client.delete(ana.id()).await,
        Err(FrameworkError::NotFound {
            kind: "member",
            id: "1".into()
        })
    );

    let again = client
        .insert(member("Ana", "ana@school.edu", "chess"))
        .await
        .unwrap();
    assert_eq!(again.id, 2);
}

#[tokio::test]
async fn test_list_filters_sorts_and_pages() {
    let client = spawn_store();
    for (name, email, club) in [
        ("Carla Souza", "carla@school.edu", "chess"),
        ("Ana Lima", "ana@school.edu", "music"),
        ("Bruno Souza", "bruno@school.edu", "Chess"),
        ("Diego Alves", "diego@school.edu", "chess"),
    ] {
        client.insert(member(name, email, club)).await.unwrap();
    }

    let souzas = client
        .list(ListFilter::NameContains("SOUZA".into()), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(souzas.total_elements, 2);
    assert_eq!(souzas.items[0].name, "Carla Souza");

    let chess = client
        .list(
            ListFilter::Category("chess".into()),
            PageRequest::new(0, 2).sorted_by(Sort::asc("name")),
        )
        .await
        .unwrap();
    assert_eq!(chess.total_elements, 3);
    assert_eq!(chess.total_pages, 2);
    let names: Vec<_> = chess.items.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Bruno Souza", "Carla Souza"]);

    let by_email_desc = client
        .list(
            ListFilter::All,
            PageRequest::new(0, 10).sorted_by(Sort::desc("email")),
        )
        .await
        .unwrap();
    assert_eq!(by_email_desc.items[0].email, "diego@school.edu");

    let none = client
        .list(ListFilter::NameContains("zzz".into()), PageRequest::default())
        .await
        .unwrap();
    assert!(none.is_empty());
    assert_eq!(none.total_pages, 0);
}

#[tokio::test]
async fn test_list_rejects_unknown_sort_field() {
    let client = spawn_store();
    let result = client
        .list(
            ListFilter::All,
            PageRequest::default().sorted_by(Sort::asc("club")),
        )
        .await;
    assert!(matches!(result, Err(FrameworkError::InvalidQuery(_))));
}

#[tokio::test]
async fn test_concurrent_inserts_with_same_key() {
    let client = spawn_store();

    let mut handles = vec![];
    for i in 0..10 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .insert(member(&format!("Racer {i}"), "race@school.edu", "track"))
                .await
        }));
    }

    let mut winners = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(FrameworkError::UniqueViolation { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 9);
}

#[tokio::test]
async fn test_store_stops_when_clients_dropped() {
    let (store, client) = RecordStore::<Member>::new(4);
    let handle = tokio::spawn(store.run());
    client
        .insert(member("Ana", "ana@school.edu", "chess"))
        .await
        .unwrap();
    drop(client);
    handle.await.unwrap();
}

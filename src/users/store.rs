//! Application store for the users table.
//!
//! Flow Overview:
//! 1) The caller opens a dialog and fills the draft (or loads it with
//!    [`Store::edit_person`]).
//! 2) A mutating operation validates the draft, calls the API, then reconciles
//!    the cached list with a full reload.
//! 3) On success the draft is blanked and the dialog closed; on failure the
//!    previous state is kept and the error is logged.
//!
//! Operations report success as `bool`. Transport failures never escape the
//! store.
//!
//! The state lock is never held across a request, so operations may overlap.
//! The cached list then reflects whichever reconcile finished last.

use crate::{
    api::{ApiClient, TransportError},
    users::{
        client,
        types::{DialogMode, Draft, User},
        validate::{validate_form, ValidationError},
    },
};
use scopeguard::defer;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};

/// Everything the front-end renders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct State {
    pub draft: Draft,
    pub users: Vec<User>,
    pub editing_id: Option<i64>,
    pub dialog: Option<DialogMode>,
    pub validation_errors: Vec<ValidationError>,
}

impl State {
    /// Blanks the draft and forgets validation errors and the editing id.
    pub fn reset_form(&mut self) {
        self.draft = Draft::default();
        self.validation_errors.clear();
        self.editing_id = None;
    }

    /// Validates the draft, stores the errors and reports whether it is valid.
    pub fn validate_draft(&mut self) -> bool {
        self.validation_errors = validate_form(&self.draft.name, &self.draft.age);
        self.validation_errors.is_empty()
    }

    /// Loads the cached record `id` into the draft.
    ///
    /// Leaves the state untouched and returns `false` if no such record is cached.
    pub fn load_draft(&mut self, id: i64) -> bool {
        let Some(user) = self.users.iter().find(|user| user.id == Some(id)) else {
            return false;
        };

        self.draft = Draft::from(user);
        self.editing_id = Some(id);
        self.validation_errors.clear();
        true
    }

    /// Successful end of a mutation: blank form, no dialog.
    fn finish(&mut self) {
        self.reset_form();
        self.dialog = None;
    }
}

/// Owns the [`State`] and the API client and orchestrates
/// validate, request, reconcile, reset.
#[derive(Debug)]
pub struct Store {
    api: ApiClient,
    state: Mutex<State>,
    in_flight: AtomicUsize,
}

impl Store {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Mutex::new(State::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> State {
        self.state.lock().await.clone()
    }

    /// True while at least one fetch or mutation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn open_dialog(&self, mode: DialogMode) {
        self.state.lock().await.dialog = Some(mode);
    }

    /// Replaces the draft with form input.
    pub async fn set_draft(&self, name: impl Into<String>, age: impl Into<String>) {
        self.state.lock().await.draft = Draft::new(name, age);
    }

    pub async fn reset_form(&self) {
        self.state.lock().await.reset_form();
    }

    /// Abandons the current dialog.
    pub async fn cancel(&self) {
        self.state.lock().await.finish();
    }

    pub async fn validate_draft(&self) -> bool {
        self.state.lock().await.validate_draft()
    }

    /// Loads the cached record `id` into the draft for editing.
    ///
    /// An unknown id is logged and leaves draft and dialog untouched.
    pub async fn edit_person(&self, id: i64) -> bool {
        let loaded = self.state.lock().await.load_draft(id);
        if !loaded {
            warn!("User {id} is not in the cached list");
        }
        loaded
    }

    /// Validates the draft and creates it server-side.
    #[instrument(skip(self))]
    pub async fn add_person(&self) -> bool {
        let Some(user) = self.validated_draft().await else {
            return false;
        };

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        defer! {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        if let Err(err) = client::create_user(&self.api, &user).await {
            error!(status = ?err.status(), "Failed to add user: {err}");
            return false;
        }

        self.reconcile_then_finish("add").await
    }

    /// Validates the draft and writes it over the record being edited.
    #[instrument(skip(self))]
    pub async fn update_person(&self) -> bool {
        let (id, user) = {
            let mut state = self.state.lock().await;
            if !state.validate_draft() {
                return false;
            }
            let Some(id) = state.editing_id else {
                warn!("No user selected for update");
                return false;
            };
            let Some(user) = state.draft.to_user(Some(id)) else {
                return false;
            };
            (id, user)
        };

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        defer! {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        if let Err(err) = client::update_user(&self.api, &user).await {
            error!(status = ?err.status(), "Failed to update user {id}: {err}");
            return false;
        }

        self.reconcile_then_finish("update").await
    }

    /// Deletes record `id` server-side.
    #[instrument(skip(self))]
    pub async fn delete_person(&self, id: i64) -> bool {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        defer! {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        if let Err(err) = client::delete_user(&self.api, id).await {
            error!(status = ?err.status(), "Failed to delete user {id}: {err}");
            return false;
        }

        self.reconcile_then_finish("delete").await
    }

    /// Replaces the cached list with the server's current list.
    ///
    /// On failure the previous cache is kept.
    #[instrument(skip(self))]
    pub async fn get_data_list(&self) -> bool {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        defer! {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        match self.reconcile().await {
            Ok(()) => true,
            Err(err) => {
                error!(status = ?err.status(), "Failed to fetch users: {err}");
                false
            }
        }
    }

    /// Validates the draft and builds the unsaved record to send.
    async fn validated_draft(&self) -> Option<User> {
        let mut state = self.state.lock().await;
        if !state.validate_draft() {
            debug!("Draft rejected: {:?}", state.validation_errors);
            return None;
        }
        state.draft.to_user(None)
    }

    async fn reconcile(&self) -> Result<(), TransportError> {
        let users = client::list_users(&self.api).await?;
        debug!("Reconciled {} users", users.len());
        self.state.lock().await.users = users;
        Ok(())
    }

    async fn reconcile_then_finish(&self, operation: &str) -> bool {
        if let Err(err) = self.reconcile().await {
            error!(status = ?err.status(), "Failed to reload users after {operation}: {err}");
            return false;
        }

        self.state.lock().await.finish();
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        api::ApiConfig,
        users::{types::Age, validate::Field},
    };
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn store_for(server: &MockServer) -> Store {
        Store::new(ApiClient::new(&ApiConfig::new(&server.uri()).unwrap()).unwrap())
    }

    fn user(id: i64, name: &str, age: i64) -> User {
        User {
            id: Some(id),
            name: name.to_string(),
            age: Age::Years(age),
        }
    }

    async fn mount_list(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[test]
    fn load_draft_unknown_id_changes_nothing() {
        let mut state = State {
            users: vec![user(1, "Alice", 30)],
            dialog: Some(DialogMode::Update),
            draft: Draft::new("typed", "1"),
            ..State::default()
        };
        let before = state.clone();

        assert!(!state.load_draft(2));
        assert_eq!(state, before);
    }

    #[test]
    fn load_draft_copies_record_and_clears_errors() {
        let mut state = State {
            users: vec![user(1, "Alice", 30)],
            ..State::default()
        };
        state.validate_draft();
        assert_eq!(state.validation_errors.len(), 2);

        assert!(state.load_draft(1));
        assert_eq!(state.draft, Draft::new("Alice", "30"));
        assert_eq!(state.editing_id, Some(1));
        assert!(state.validation_errors.is_empty());
    }

    #[test]
    fn reset_form_keeps_cache_and_dialog() {
        let mut state = State {
            users: vec![user(1, "Alice", 30)],
            editing_id: Some(1),
            dialog: Some(DialogMode::Update),
            draft: Draft::new("Alice", "30"),
            ..State::default()
        };

        state.reset_form();
        assert!(state.draft.is_blank());
        assert_eq!(state.editing_id, None);
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.dialog, Some(DialogMode::Update));
    }

    #[tokio::test]
    async fn store_reset_form_blanks_draft_only() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;
        mount_list(&server, json!([{ "id": 1, "name": "Alice", "age": 30 }])).await;

        let store = store_for(&server);
        assert!(store.get_data_list().await);
        assert!(store.edit_person(1).await);
        store.open_dialog(DialogMode::Update).await;
        store.set_draft("A", "").await;
        assert!(!store.validate_draft().await);

        store.reset_form().await;

        let state = store.snapshot().await;
        assert!(state.draft.is_blank());
        assert!(state.validation_errors.is_empty());
        assert_eq!(state.editing_id, None);
        assert_eq!(state.dialog, Some(DialogMode::Update));
        assert_eq!(state.users, vec![user(1, "Alice", 30)]);
    }

    #[tokio::test]
    async fn get_data_list_replaces_cache() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;
        mount_list(
            &server,
            json!([{ "id": 1, "name": "Alice", "age": 30 }, { "id": 2, "name": "Bob", "age": 40 }]),
        )
        .await;

        let store = store_for(&server);
        assert!(store.get_data_list().await);
        assert!(!store.is_loading());

        let state = store.snapshot().await;
        assert_eq!(state.users, vec![user(1, "Alice", 30), user(2, "Bob", 40)]);
    }

    #[tokio::test]
    async fn get_data_list_failure_keeps_previous_cache() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Alice", "age": 30 }
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(store.get_data_list().await);
        assert!(!store.get_data_list().await);
        assert!(!store.is_loading());
        assert_eq!(store.snapshot().await.users, vec![user(1, "Alice", 30)]);
    }

    #[tokio::test]
    async fn add_person_invalid_draft_sends_nothing() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        mount_list(&server, json!([{ "id": 1, "name": "Alice", "age": 30 }])).await;

        let store = store_for(&server);
        assert!(store.get_data_list().await);
        store.open_dialog(DialogMode::Add).await;
        store.set_draft("A", "abc").await;

        assert!(!store.add_person().await);
        assert!(!store.is_loading());

        let state = store.snapshot().await;
        assert_eq!(state.dialog, Some(DialogMode::Add));
        assert_eq!(state.users, vec![user(1, "Alice", 30)]);
        assert_eq!(state.draft, Draft::new("A", "abc"));
        let fields: Vec<Field> = state.validation_errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::Name, Field::Age]);
    }

    #[tokio::test]
    async fn add_person_creates_reconciles_and_resets() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user"))
            .and(body_json(json!({ "name": "Alice", "age": 30 })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "id": 1, "name": "Alice", "age": 30 })),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, json!([{ "id": 1, "name": "Alice", "age": 30 }])).await;

        let store = store_for(&server);
        store.open_dialog(DialogMode::Add).await;
        store.set_draft("Alice", "30").await;

        assert!(store.add_person().await);
        assert!(!store.is_loading());

        let state = store.snapshot().await;
        assert!(state.draft.is_blank());
        assert_eq!(state.dialog, None);
        assert_eq!(state.users, vec![user(1, "Alice", 30)]);
        assert!(state.validation_errors.is_empty());
    }

    #[tokio::test]
    async fn add_person_transport_failure_keeps_draft() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let store = store_for(&server);
        store.open_dialog(DialogMode::Add).await;
        store.set_draft("Alice", "30").await;

        assert!(!store.add_person().await);
        assert!(!store.is_loading());

        let state = store.snapshot().await;
        assert_eq!(state.draft, Draft::new("Alice", "30"));
        assert_eq!(state.dialog, Some(DialogMode::Add));
    }

    #[tokio::test]
    async fn add_person_reconcile_failure_reports_failure() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1, "name": "Alice", "age": 30 })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = store_for(&server);
        store.open_dialog(DialogMode::Add).await;
        store.set_draft("Alice", "30").await;

        assert!(!store.add_person().await);
        assert!(!store.is_loading());

        let state = store.snapshot().await;
        assert_eq!(state.draft, Draft::new("Alice", "30"));
        assert!(state.users.is_empty());
    }

    #[tokio::test]
    async fn edit_person_unknown_id_leaves_state() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;
        mount_list(&server, json!([{ "id": 1, "name": "Alice", "age": 30 }])).await;

        let store = store_for(&server);
        assert!(store.get_data_list().await);
        store.set_draft("typed", "5").await;
        let before = store.snapshot().await;

        assert!(!store.edit_person(42).await);
        assert_eq!(store.snapshot().await, before);
    }

    #[tokio::test]
    async fn update_person_merges_editing_id() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 4, "name": "Alice", "age": 30 }
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/user"))
            .and(body_json(json!({ "id": 4, "name": "Alicia", "age": 31 })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": 4, "name": "Alicia", "age": 31 })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 4, "name": "Alicia", "age": 31 }
            ])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(store.get_data_list().await);
        assert!(store.edit_person(4).await);
        store.open_dialog(DialogMode::Update).await;
        store.set_draft("Alicia", "31").await;

        assert!(store.update_person().await);
        assert!(!store.is_loading());

        let state = store.snapshot().await;
        assert_eq!(state.users, vec![user(4, "Alicia", 31)]);
        assert_eq!(state.editing_id, None);
        assert_eq!(state.dialog, None);
        assert!(state.draft.is_blank());
    }

    #[tokio::test]
    async fn update_person_requires_editing_id() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = store_for(&server);
        store.open_dialog(DialogMode::Update).await;
        store.set_draft("Alice", "30").await;

        assert!(!store.update_person().await);
        let state = store.snapshot().await;
        assert_eq!(state.dialog, Some(DialogMode::Update));
        assert_eq!(state.draft, Draft::new("Alice", "30"));
    }

    #[tokio::test]
    async fn delete_person_reconciles_and_closes_dialog() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/user"))
            .and(body_json(json!({ "id": 2 })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        mount_list(&server, json!([{ "id": 1, "name": "Alice", "age": 30 }])).await;

        let store = store_for(&server);
        store.open_dialog(DialogMode::Delete).await;

        assert!(store.delete_person(2).await);
        assert!(!store.is_loading());

        let state = store.snapshot().await;
        assert_eq!(state.dialog, None);
        assert_eq!(state.users, vec![user(1, "Alice", 30)]);
    }

    #[tokio::test]
    async fn delete_person_failure_keeps_dialog() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/user"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = store_for(&server);
        store.open_dialog(DialogMode::Delete).await;

        assert!(!store.delete_person(2).await);
        assert!(!store.is_loading());
        assert_eq!(store.snapshot().await.dialog, Some(DialogMode::Delete));
    }

    #[tokio::test]
    async fn cancel_clears_draft_and_dialog() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;
        let store = store_for(&server);
        store.open_dialog(DialogMode::Add).await;
        store.set_draft("", "").await;
        assert!(!store.validate_draft().await);

        store.cancel().await;
        let state = store.snapshot().await;
        assert_eq!(state.dialog, None);
        assert!(state.draft.is_blank());
        assert!(state.validation_errors.is_empty());
    }

    #[tokio::test]
    async fn loading_is_set_while_request_is_in_flight() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(std::time::Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let store = store_for(&server);
        let observed = async {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            store.is_loading()
        };

        let (fetched, loading_mid_flight) = tokio::join!(store.get_data_list(), observed);
        assert!(fetched);
        assert!(loading_mid_flight);
        assert!(!store.is_loading());
    }
}

// JobBoard - app/store.rs
//
// Local profile store: the registered user records plus the current
// session, persisted to key-value storage after every mutation.
//
// Design principles:
// - The store is an explicitly constructed value over an injected storage
//   backend; there is no global instance.
// - Every mutation is all-or-nothing: the change is made in memory, the
//   full state is written (`authUsers`, then `currentUser`), and on a write
//   failure the in-memory change is rolled back before the error is
//   returned.
// - After every mutation the session holds a fresh copy of its backing
//   record, so the two never diverge.
// - The store only touches `authUsers` and `currentUser`. Any other key
//   in the same storage belongs to a collaborator and is ignored.
// - Malformed stored state is discarded with a warning (start fresh), the
//   same way an unreadable session file is.

use crate::core::ids::IdGenerator;
use crate::core::model::{
    insert_unique, remove_id, JobAlert, NewJobAlert, Profile, ProfileUpdate, Role, Session, User,
};
use crate::core::password::{self, Hasher};
use crate::platform::storage::{read_json, write_json, KeyValueStorage};
use crate::util::constants::{KEY_AUTH_USERS, KEY_CURRENT_USER, MAX_EMAIL_LEN, MIN_PASSWORD_LEN};
use crate::util::error::{StorageError, StoreError};
use chrono::Utc;
use regex::Regex;
use std::sync::OnceLock;

/// Loose shape check: something@something.tld, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// User records and the signed-in session over a `KeyValueStorage`.
#[derive(Debug)]
pub struct ProfileStore<S: KeyValueStorage> {
    storage: S,
    hasher: Hasher,
    users: Vec<User>,
    current: Option<Session>,
    ids: IdGenerator,
}

impl<S: KeyValueStorage> ProfileStore<S> {
    /// Rehydrate from `storage` with the default password hasher.
    pub fn open(storage: S) -> Result<Self, StoreError> {
        Self::open_with_hasher(storage, Hasher::default())
    }

    /// Rehydrate from `storage`, hashing new passwords with `hasher`.
    ///
    /// Missing keys mean a first run. Malformed values are logged and
    /// discarded. A session whose user no longer exists is dropped; a
    /// session that exists is refreshed from its record. Only I/O failures
    /// are returned as errors.
    pub fn open_with_hasher(storage: S, hasher: Hasher) -> Result<Self, StoreError> {
        let users: Vec<User> = discard_malformed(read_json(&storage, KEY_AUTH_USERS))?
            .unwrap_or_default();
        let stored_session: Option<Session> =
            discard_malformed(read_json(&storage, KEY_CURRENT_USER))?;

        let current = stored_session.and_then(|mut session| {
            match users.iter().find(|u| u.id == session.user_id()) {
                Some(record) => {
                    session.user = record.clone();
                    Some(session)
                }
                None => {
                    tracing::warn!(
                        user_id = session.user_id(),
                        "Stored session refers to an unknown user; discarding it"
                    );
                    None
                }
            }
        });

        let floor = users
            .iter()
            .flat_map(|u| std::iter::once(u.id).chain(u.job_alerts.iter().map(|a| a.id)))
            .max()
            .unwrap_or(0);

        tracing::debug!(
            users = users.len(),
            authenticated = current.is_some(),
            "Profile store loaded"
        );

        Ok(Self {
            storage,
            hasher,
            users,
            current,
            ids: IdGenerator::starting_after(floor),
        })
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    /// Create a new account with an empty profile. Does not log in.
    ///
    /// The email is stored exactly as given and must look like an address
    /// (no surrounding whitespace); the password must not be empty.
    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        role: Role,
        full_name: &str,
    ) -> Result<User, StoreError> {
        if email.len() > MAX_EMAIL_LEN || !is_valid_email(email) {
            return Err(StoreError::InvalidInput {
                field: "email",
                reason: "not a valid email address",
            });
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StoreError::InvalidInput {
                field: "password",
                reason: "must not be empty",
            });
        }
        if self.users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateUser {
                email: email.to_string(),
            });
        }

        let password_hash = self.hasher.hash(password)?;
        let now = Utc::now();
        let mut ids = self.ids.clone();
        let user = User::new(
            ids.next_at(now),
            email.to_string(),
            password_hash,
            role,
            full_name.trim().to_string(),
            now,
        );

        self.users.push(user.clone());
        if let Err(e) = self.persist() {
            self.users.pop();
            return Err(e.into());
        }
        self.ids = ids;

        tracing::info!(user_id = user.id, role = role.as_str(), "User registered");
        Ok(user)
    }

    /// Start a session for the account matching `email` and `password`
    /// exactly.
    ///
    /// A record still holding a legacy plaintext password is upgraded to a
    /// hash as part of the same write.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Session, StoreError> {
        let idx = self
            .users
            .iter()
            .position(|u| u.email == email)
            .ok_or(StoreError::InvalidCredentials)?;

        if !self.hasher.verify(password, &self.users[idx].password_hash)? {
            tracing::debug!("Login rejected");
            return Err(StoreError::InvalidCredentials);
        }

        let upgraded_hash = if password::is_hashed(&self.users[idx].password_hash) {
            None
        } else {
            Some(self.hasher.hash(password)?)
        };
        let upgraded = upgraded_hash.is_some();

        let previous_record = self.users[idx].clone();
        let previous_session = self.current.take();
        if let Some(hash) = upgraded_hash {
            self.users[idx].password_hash = hash;
        }

        let session = Session {
            user: self.users[idx].clone(),
            last_login: Utc::now(),
        };
        self.current = Some(session.clone());

        if let Err(e) = self.persist() {
            self.users[idx] = previous_record;
            self.current = previous_session;
            return Err(e.into());
        }

        if upgraded {
            tracing::info!(user_id = session.user_id(), "Legacy plaintext password upgraded");
        }
        tracing::info!(user_id = session.user_id(), "User logged in");
        Ok(session)
    }

    /// End the current session. Logging out while logged out is a no-op
    /// apart from rewriting storage.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        let previous = self.current.take();
        if let Err(e) = self.persist() {
            self.current = previous;
            return Err(e.into());
        }
        if let Some(session) = previous {
            tracing::info!(user_id = session.user_id(), "User logged out");
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Current-user mutations
    // -------------------------------------------------------------------------

    /// Merge `update` into the current user's profile.
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> Result<Session, StoreError> {
        self.update_current(|user| {
            update.apply_to(&mut user.profile);
            if let Some(ref name) = update.full_name {
                user.full_name = name.trim().to_string();
            }
            ((), !update.is_empty())
        })?;
        tracing::debug!("Profile updated");
        self.current.clone().ok_or(StoreError::NotAuthenticated)
    }

    /// Bookmark a job. Saving an already saved job changes nothing.
    pub fn save_job(&mut self, job_id: u64) -> Result<(), StoreError> {
        let added = self.update_current(|user| {
            let added = insert_unique(&mut user.saved_jobs, job_id);
            (added, added)
        })?;
        tracing::debug!(job_id, added, "Save job");
        Ok(())
    }

    /// Drop a bookmark. Removing a job that was never saved changes nothing.
    pub fn remove_saved_job(&mut self, job_id: u64) -> Result<(), StoreError> {
        let removed = self.update_current(|user| {
            let removed = remove_id(&mut user.saved_jobs, job_id);
            (removed, removed)
        })?;
        tracing::debug!(job_id, removed, "Remove saved job");
        Ok(())
    }

    /// Record an application. Applying twice changes nothing.
    pub fn apply_for_job(&mut self, job_id: u64) -> Result<(), StoreError> {
        let added = self.update_current(|user| {
            let added = insert_unique(&mut user.applied_jobs, job_id);
            (added, added)
        })?;
        tracing::debug!(job_id, added, "Apply for job");
        Ok(())
    }

    /// Append an alert with a fresh id and creation time.
    pub fn add_job_alert(&mut self, alert: NewJobAlert) -> Result<JobAlert, StoreError> {
        let now = Utc::now();
        let mut ids = self.ids.clone();
        let created = JobAlert {
            id: ids.next_at(now),
            title: alert.title,
            location: alert.location,
            daily: alert.daily,
            created_at: now,
        };

        let pushed = created.clone();
        self.update_current(move |user| {
            user.job_alerts.push(pushed);
            ((), true)
        })?;
        self.ids = ids;

        tracing::debug!(alert_id = created.id, "Job alert added");
        Ok(created)
    }

    /// Remove the alert with `alert_id`, if present.
    pub fn remove_job_alert(&mut self, alert_id: u64) -> Result<(), StoreError> {
        let removed = self.update_current(|user| {
            let before = user.job_alerts.len();
            user.job_alerts.retain(|a| a.id != alert_id);
            let removed = user.job_alerts.len() != before;
            (removed, removed)
        })?;
        tracing::debug!(alert_id, removed, "Remove job alert");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Saved job ids in the order they were saved. Empty when logged out.
    pub fn saved_jobs(&self) -> &[u64] {
        self.current
            .as_ref()
            .map_or(&[], |s| s.user.saved_jobs.as_slice())
    }

    /// Applied job ids in application order. Empty when logged out.
    pub fn applied_jobs(&self) -> &[u64] {
        self.current
            .as_ref()
            .map_or(&[], |s| s.user.applied_jobs.as_slice())
    }

    /// Alerts in creation order. Empty when logged out.
    pub fn job_alerts(&self) -> &[JobAlert] {
        self.current
            .as_ref()
            .map_or(&[], |s| s.user.job_alerts.as_slice())
    }

    /// The signed-in user's profile. `None` when logged out.
    pub fn profile(&self) -> Option<&Profile> {
        self.current.as_ref().map(|s| &s.user.profile)
    }

    /// Every registered record, in registration order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Backing storage, for collaborators sharing it.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Run `f` on the current user's record. `f` returns its result and
    /// whether it changed the record; unchanged records are not rewritten.
    fn update_current<T>(
        &mut self,
        f: impl FnOnce(&mut User) -> (T, bool),
    ) -> Result<T, StoreError> {
        let id = self
            .current
            .as_ref()
            .map(Session::user_id)
            .ok_or(StoreError::NotAuthenticated)?;
        let idx = self
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::UserNotFound { id })?;

        let previous_record = self.users[idx].clone();
        let (out, changed) = f(&mut self.users[idx]);
        if !changed {
            return Ok(out);
        }

        let previous_session = self.current.clone();
        if let Some(session) = self.current.as_mut() {
            session.user = self.users[idx].clone();
        }

        if let Err(e) = self.persist() {
            self.users[idx] = previous_record;
            self.current = previous_session;
            return Err(e.into());
        }
        Ok(out)
    }

    /// Full-state overwrite of both store keys.
    fn persist(&self) -> Result<(), StorageError> {
        write_json(&self.storage, KEY_AUTH_USERS, &self.users)?;
        match self.current {
            Some(ref session) => write_json(&self.storage, KEY_CURRENT_USER, session),
            None => self.storage.remove_item(KEY_CURRENT_USER),
        }
    }
}

/// Treat a malformed stored value like a missing one.
fn discard_malformed<T>(
    result: Result<Option<T>, StorageError>,
) -> Result<Option<T>, StorageError> {
    match result {
        Err(StorageError::Json { key, source }) => {
            tracing::warn!(key = %key, error = %source, "Stored value is malformed; starting fresh");
            Ok(None)
        }
        other => other,
    }
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::password::HashParams;
    use crate::platform::storage::MemoryStorage;
    use crate::util::error::PasswordError;
    use std::cell::Cell;

    fn cheap_hasher() -> Hasher {
        Hasher::with_params(HashParams::new(1024, 1, 1, None).unwrap())
    }

    fn open(storage: MemoryStorage) -> ProfileStore<MemoryStorage> {
        ProfileStore::open_with_hasher(storage, cheap_hasher()).unwrap()
    }

    /// Store with "a@x.com" / "p" registered and logged in.
    fn logged_in() -> (ProfileStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let mut store = open(storage.clone());
        store
            .register("a@x.com", "p", Role::JobSeeker, "A")
            .unwrap();
        store.login("a@x.com", "p").unwrap();
        (store, storage)
    }

    /// Storage whose writes can be switched off to exercise rollback.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: Cell<bool>,
    }

    impl KeyValueStorage for FlakyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.get() {
                return Err(StorageError::Io {
                    path: key.into(),
                    operation: "write",
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            if self.fail_writes.get() {
                return Err(StorageError::Io {
                    path: key.into(),
                    operation: "remove",
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn test_register_creates_empty_record() {
        let storage = MemoryStorage::new();
        let mut store = open(storage.clone());
        let user = store
            .register("a@x.com", "p", Role::Employer, "Acme Recruiting")
            .unwrap();

        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.role, Role::Employer);
        assert_eq!(user.full_name, "Acme Recruiting");
        assert_eq!(user.profile, Profile::default());
        assert!(user.saved_jobs.is_empty() && user.applied_jobs.is_empty());
        assert!(user.job_alerts.is_empty());
        assert_ne!(user.password_hash, "p");
        assert!(!store.is_authenticated());
        assert!(storage.contains_key(KEY_AUTH_USERS));
    }

    #[test]
    fn test_duplicate_email_is_rejected() {
        let mut store = open(MemoryStorage::new());
        store.register("a@x.com", "p", Role::JobSeeker, "A").unwrap();
        let err = store
            .register("a@x.com", "other", Role::Employer, "B")
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUser { .. }));
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_register_rejects_malformed_email_and_empty_password() {
        let mut store = open(MemoryStorage::new());
        assert!(matches!(
            store.register("not-an-email", "p", Role::JobSeeker, ""),
            Err(StoreError::InvalidInput { field: "email", .. })
        ));
        assert!(matches!(
            store.register(" a@x.com ", "p", Role::JobSeeker, ""),
            Err(StoreError::InvalidInput { field: "email", .. })
        ));
        assert!(matches!(
            store.register("a@x.com", "", Role::JobSeeker, ""),
            Err(StoreError::InvalidInput { field: "password", .. })
        ));
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn test_user_ids_are_unique() {
        let mut store = open(MemoryStorage::new());
        let a = store.register("a@x.com", "p", Role::JobSeeker, "").unwrap();
        let b = store.register("b@x.com", "p", Role::JobSeeker, "").unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn test_login_with_correct_password() {
        let (store, storage) = logged_in();
        assert!(store.is_authenticated());
        let session = store.current_user().unwrap();
        assert_eq!(session.email(), "a@x.com");
        assert!(session.last_login >= session.user.created_at);
        assert!(storage.contains_key(KEY_CURRENT_USER));
    }

    #[test]
    fn test_login_with_wrong_password_leaves_session_unset() {
        let mut store = open(MemoryStorage::new());
        store.register("a@x.com", "p", Role::JobSeeker, "A").unwrap();
        assert!(matches!(
            store.login("a@x.com", "wrong"),
            Err(StoreError::InvalidCredentials)
        ));
        assert!(matches!(
            store.login("nobody@x.com", "p"),
            Err(StoreError::InvalidCredentials)
        ));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_login_matches_email_exactly() {
        let mut store = open(MemoryStorage::new());
        store.register("a@x.com", "p", Role::JobSeeker, "A").unwrap();
        assert!(matches!(
            store.login("  a@x.com ", "p"),
            Err(StoreError::InvalidCredentials)
        ));
        assert!(matches!(
            store.login("A@x.com", "p"),
            Err(StoreError::InvalidCredentials)
        ));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_login_over_corrupt_hash_reports_password_error() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                KEY_AUTH_USERS,
                r#"[{"id":1,"email":"a@x.com","passwordHash":"$argon2id$v=19$m=abc$",
                    "role":"job-seeker","createdAt":"2024-01-01T00:00:00Z"}]"#,
            )
            .unwrap();
        let mut store = open(storage);
        assert!(matches!(
            store.login("a@x.com", "p"),
            Err(StoreError::Password(PasswordError::MalformedHash { .. }))
        ));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_failed_legacy_login_keeps_previous_session() {
        let storage = FlakyStorage::default();
        storage
            .inner
            .set_item(
                KEY_AUTH_USERS,
                r#"[{"id":1,"email":"old@x.com","password":"secret",
                    "role":"job-seeker","createdAt":"2024-01-01T00:00:00Z"}]"#,
            )
            .unwrap();
        let mut store = ProfileStore::open_with_hasher(&storage, cheap_hasher()).unwrap();
        store.register("a@x.com", "p", Role::JobSeeker, "A").unwrap();
        let before = store.login("a@x.com", "p").unwrap();

        storage.fail_writes.set(true);
        assert!(matches!(
            store.login("old@x.com", "secret"),
            Err(StoreError::Storage(_))
        ));
        assert_eq!(store.current_user(), Some(&before));
        assert_eq!(store.users()[0].password_hash, "secret");
    }

    #[test]
    fn test_save_job_is_idempotent() {
        let (mut store, _) = logged_in();
        store.save_job(42).unwrap();
        store.save_job(42).unwrap();
        assert_eq!(store.saved_jobs(), &[42]);
    }

    #[test]
    fn test_remove_unsaved_job_is_noop() {
        let (mut store, _) = logged_in();
        store.save_job(7).unwrap();
        store.remove_saved_job(42).unwrap();
        assert_eq!(store.saved_jobs(), &[7]);
    }

    #[test]
    fn test_apply_for_job_is_idempotent() {
        let (mut store, _) = logged_in();
        store.apply_for_job(3).unwrap();
        store.apply_for_job(5).unwrap();
        store.apply_for_job(3).unwrap();
        assert_eq!(store.applied_jobs(), &[3, 5]);
    }

    #[test]
    fn test_session_mirrors_record_after_mutations() {
        let (mut store, _) = logged_in();
        store.save_job(1).unwrap();
        store.apply_for_job(2).unwrap();
        store
            .add_job_alert(NewJobAlert {
                title: "Rust".to_string(),
                location: "Berlin".to_string(),
                daily: true,
            })
            .unwrap();
        store
            .update_profile(&ProfileUpdate {
                title: Some("Engineer".to_string()),
                ..Default::default()
            })
            .unwrap();

        let session = store.current_user().unwrap();
        let record = store
            .users()
            .iter()
            .find(|u| u.id == session.user_id())
            .unwrap();
        assert_eq!(&session.user, record);
    }

    #[test]
    fn test_update_profile_merges_fields() {
        let (mut store, _) = logged_in();
        store
            .update_profile(&ProfileUpdate {
                title: Some("Engineer".to_string()),
                bio: Some("Hello".to_string()),
                skills: Some(vec!["Rust".to_string(), "SQL".to_string()]),
                ..Default::default()
            })
            .unwrap();
        let session = store
            .update_profile(&ProfileUpdate {
                full_name: Some("Ada".to_string()),
                bio: Some("Updated".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(session.user.full_name, "Ada");
        let profile = store.profile().unwrap();
        assert_eq!(profile.title, "Engineer");
        assert_eq!(profile.bio, "Updated");
        assert_eq!(profile.skills.len(), 2);
    }

    #[test]
    fn test_job_alerts_add_and_remove() {
        let (mut store, _) = logged_in();
        let first = store
            .add_job_alert(NewJobAlert {
                title: "Designer".to_string(),
                location: "Lisbon".to_string(),
                daily: false,
            })
            .unwrap();
        let second = store
            .add_job_alert(NewJobAlert {
                title: "Engineer".to_string(),
                location: "Remote".to_string(),
                daily: true,
            })
            .unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.job_alerts().len(), 2);

        store.remove_job_alert(first.id).unwrap();
        store.remove_job_alert(first.id).unwrap();
        assert_eq!(store.job_alerts(), &[second]);
    }

    #[test]
    fn test_logout_blocks_authenticated_operations() {
        let (mut store, storage) = logged_in();
        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert!(!storage.contains_key(KEY_CURRENT_USER));

        assert!(matches!(store.save_job(1), Err(StoreError::NotAuthenticated)));
        assert!(matches!(store.remove_saved_job(1), Err(StoreError::NotAuthenticated)));
        assert!(matches!(store.apply_for_job(1), Err(StoreError::NotAuthenticated)));
        assert!(matches!(
            store.update_profile(&ProfileUpdate::default()),
            Err(StoreError::NotAuthenticated)
        ));
        assert!(matches!(
            store.add_job_alert(NewJobAlert {
                title: "x".to_string(),
                location: "y".to_string(),
                daily: false,
            }),
            Err(StoreError::NotAuthenticated)
        ));
        assert!(matches!(store.remove_job_alert(1), Err(StoreError::NotAuthenticated)));

        assert!(store.saved_jobs().is_empty());
        assert!(store.applied_jobs().is_empty());
        assert!(store.job_alerts().is_empty());
        assert!(store.profile().is_none());
    }

    #[test]
    fn test_reload_reproduces_users_and_session() {
        let (mut store, storage) = logged_in();
        store.save_job(9).unwrap();
        store.register("b@x.com", "q", Role::Employer, "B").unwrap();

        let reloaded = open(storage.clone());
        assert_eq!(reloaded.users(), store.users());
        assert_eq!(reloaded.current_user(), store.current_user());

        store.logout().unwrap();
        let reloaded = open(storage);
        assert_eq!(reloaded.users(), store.users());
        assert!(reloaded.current_user().is_none());
    }

    #[test]
    fn test_register_login_save_remove_scenario() {
        let mut store = open(MemoryStorage::new());
        store.register("a@x.com", "p", Role::JobSeeker, "A").unwrap();
        let session = store.login("a@x.com", "p").unwrap();
        assert_eq!(session.email(), "a@x.com");
        store.save_job(42).unwrap();
        assert_eq!(store.saved_jobs(), &[42]);
        store.remove_saved_job(42).unwrap();
        assert!(store.saved_jobs().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let storage = FlakyStorage::default();
        let mut store = ProfileStore::open_with_hasher(&storage, cheap_hasher()).unwrap();
        store.register("a@x.com", "p", Role::JobSeeker, "A").unwrap();
        store.login("a@x.com", "p").unwrap();
        store.save_job(1).unwrap();

        storage.fail_writes.set(true);
        assert!(matches!(store.save_job(2), Err(StoreError::Storage(_))));
        assert!(matches!(
            store.register("b@x.com", "p", Role::JobSeeker, "B"),
            Err(StoreError::Storage(_))
        ));
        assert!(matches!(store.logout(), Err(StoreError::Storage(_))));

        assert_eq!(store.saved_jobs(), &[1]);
        assert_eq!(store.user_count(), 1);
        assert!(store.is_authenticated());
        assert_eq!(store.users()[0].saved_jobs, vec![1]);

        // The store stays usable once storage recovers.
        storage.fail_writes.set(false);
        store.save_job(2).unwrap();
        assert_eq!(store.saved_jobs(), &[1, 2]);
    }

    #[test]
    fn test_legacy_plaintext_record_is_upgraded_on_login() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                KEY_AUTH_USERS,
                r#"[{"id":1700000000000,"email":"old@x.com","password":"secret",
                    "role":"job-seeker","fullName":"Old","createdAt":"2024-01-01T00:00:00Z",
                    "profile":{"title":"","bio":"","skills":[],"experience":[]},
                    "savedJobs":[3],"appliedJobs":[],"jobAlerts":[]}]"#,
            )
            .unwrap();

        let mut store = open(storage.clone());
        assert!(matches!(
            store.login("old@x.com", "wrong"),
            Err(StoreError::InvalidCredentials)
        ));
        store.login("old@x.com", "secret").unwrap();
        assert_eq!(store.saved_jobs(), &[3]);

        let stored = &store.users()[0].password_hash;
        assert!(password::is_hashed(stored));

        let mut reloaded = open(storage);
        reloaded.logout().unwrap();
        reloaded.login("old@x.com", "secret").unwrap();
    }

    #[test]
    fn test_malformed_storage_starts_fresh() {
        let storage = MemoryStorage::new();
        storage.set_item(KEY_AUTH_USERS, "not json").unwrap();
        storage.set_item(KEY_CURRENT_USER, "{").unwrap();
        let store = open(storage);
        assert_eq!(store.user_count(), 0);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_orphaned_session_is_discarded() {
        let (store, storage) = logged_in();
        let session = store.current_user().unwrap().clone();
        storage.set_item(KEY_AUTH_USERS, "[]").unwrap();
        write_json(&storage, KEY_CURRENT_USER, &session).unwrap();

        let reloaded = open(storage);
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn test_store_ignores_collaborator_keys() {
        let storage = MemoryStorage::new();
        storage.set_item("darkMode", "true").unwrap();
        storage.set_item("selectedJob", "{\"id\":1}").unwrap();
        let mut store = open(storage.clone());
        store.register("a@x.com", "p", Role::JobSeeker, "A").unwrap();
        assert_eq!(storage.get_item("darkMode").unwrap().as_deref(), Some("true"));
        assert!(storage.contains_key("selectedJob"));
    }

    #[test]
    fn test_alert_ids_stay_ahead_of_stored_ids() {
        let (mut store, storage) = logged_in();
        let alert = store
            .add_job_alert(NewJobAlert {
                title: "x".to_string(),
                location: "y".to_string(),
                daily: false,
            })
            .unwrap();

        let mut reloaded = open(storage);
        let next = reloaded
            .add_job_alert(NewJobAlert {
                title: "z".to_string(),
                location: "w".to_string(),
                daily: false,
            })
            .unwrap();
        assert!(next.id > alert.id);
    }
}

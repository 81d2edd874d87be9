// JobBoard - app/dashboard.rs
//
// Read-only summary of the signed-in account: who they are, and the saved
// and applied listings resolved against the catalogue.

use crate::app::board::JobBoard;
use crate::app::store::ProfileStore;
use crate::core::jobs::Job;
use crate::core::model::{Profile, Role};
use crate::platform::storage::KeyValueStorage;

/// Everything the dashboard shows for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary<'a> {
    pub email: &'a str,
    pub full_name: &'a str,
    pub role: Role,
    pub profile: &'a Profile,

    /// Saved listings still in the catalogue, in save order.
    pub saved: Vec<&'a Job>,

    /// Applied-to listings still in the catalogue, in application order.
    pub applied: Vec<&'a Job>,

    pub alert_count: usize,
}

impl<'a> DashboardSummary<'a> {
    /// Summary for the signed-in user; `None` when nobody is signed in.
    ///
    /// Ids that no longer resolve to a listing are skipped.
    pub fn build<S, T>(store: &'a ProfileStore<S>, board: &'a JobBoard<T>) -> Option<Self>
    where
        S: KeyValueStorage,
        T: KeyValueStorage,
    {
        let session = store.current_user()?;
        let resolve = |ids: &[u64]| -> Vec<&'a Job> {
            ids.iter().filter_map(|&id| board.find(id)).collect()
        };

        let saved = resolve(store.saved_jobs());
        let applied = resolve(store.applied_jobs());
        let unresolved = store.saved_jobs().len() + store.applied_jobs().len()
            - saved.len()
            - applied.len();
        if unresolved > 0 {
            tracing::debug!(unresolved, "Dashboard skipped ids missing from the catalogue");
        }

        Some(Self {
            email: session.email(),
            full_name: &session.user.full_name,
            role: session.role(),
            profile: &session.user.profile,
            saved,
            applied,
            alert_count: store.job_alerts().len(),
        })
    }

    /// True for employer accounts, which get the posting tools.
    pub fn can_post_jobs(&self) -> bool {
        self.role == Role::Employer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::NewJobAlert;
    use crate::core::password::{HashParams, Hasher};
    use crate::platform::storage::MemoryStorage;

    #[test]
    fn test_summary_requires_login() {
        let storage = MemoryStorage::new();
        let store = ProfileStore::open(storage.clone()).unwrap();
        let board = JobBoard::open(storage).unwrap();
        assert!(DashboardSummary::build(&store, &board).is_none());
    }

    #[test]
    fn test_summary_resolves_listings() {
        let storage = MemoryStorage::new();
        let hasher = Hasher::with_params(HashParams::new(1024, 1, 1, None).unwrap());
        let mut store = ProfileStore::open_with_hasher(storage.clone(), hasher).unwrap();
        let board = JobBoard::open(storage).unwrap();

        store.register("a@x.com", "p", Role::JobSeeker, "Ada").unwrap();
        store.login("a@x.com", "p").unwrap();
        let first = board.jobs()[0].id;
        let second = board.jobs()[1].id;
        store.save_job(second).unwrap();
        store.save_job(9_999).unwrap();
        store.save_job(first).unwrap();
        store.apply_for_job(first).unwrap();
        store
            .add_job_alert(NewJobAlert {
                title: "Designer".to_string(),
                location: "Remote".to_string(),
                daily: true,
            })
            .unwrap();

        let summary = DashboardSummary::build(&store, &board).unwrap();
        assert_eq!(summary.email, "a@x.com");
        assert_eq!(summary.full_name, "Ada");
        assert!(!summary.can_post_jobs());
        assert_eq!(
            summary.saved.iter().map(|j| j.id).collect::<Vec<_>>(),
            vec![second, first]
        );
        assert_eq!(summary.applied.len(), 1);
        assert_eq!(summary.alert_count, 1);
    }
}

// JobBoard - app/board.rs
//
// The job catalogue and its auxiliary keys: the listings themselves
// (`jobsDatabase`), the listing opened for detail view (`selectedJob`), and
// the search terms carried from the home page to the listings page
// (`searchJob`, `searchLocation`).
//
// The built-in sample catalogue is embedded in the binary and used until an
// employer posts a listing, at which point the whole catalogue is written
// to storage and read from there on.

use crate::core::jobs::{self, Job, JobQuery, NewJob};
use crate::core::model::{Role, Session};
use crate::platform::storage::{read_json, write_json, KeyValueStorage};
use crate::util::constants::{
    KEY_JOBS_DATABASE, KEY_SEARCH_JOB, KEY_SEARCH_LOCATION, KEY_SELECTED_JOB,
};
use crate::util::error::{JobError, StorageError};

/// Sample listings shipped with the binary.
const BUILTIN_JOBS: &str = include_str!("../../data/jobs.json");

/// Parse the embedded sample catalogue.
pub fn builtin_jobs() -> Result<Vec<Job>, StorageError> {
    serde_json::from_str(BUILTIN_JOBS).map_err(|source| StorageError::Json {
        key: KEY_JOBS_DATABASE.to_string(),
        source,
    })
}

/// Search terms remembered between the home page and the listings page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerms {
    pub job: String,
    pub location: String,
}

/// Job listings over a `KeyValueStorage`.
#[derive(Debug)]
pub struct JobBoard<S: KeyValueStorage> {
    storage: S,
    jobs: Vec<Job>,
}

impl<S: KeyValueStorage> JobBoard<S> {
    /// Load the stored catalogue, or the built-in one when none is stored
    /// or the stored one is malformed.
    pub fn open(storage: S) -> Result<Self, JobError> {
        let stored: Option<Vec<Job>> = match read_json(&storage, KEY_JOBS_DATABASE) {
            Ok(jobs) => jobs,
            Err(StorageError::Json { source, .. }) => {
                tracing::warn!(error = %source, "Stored catalogue is malformed; using built-in listings");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let jobs = match stored {
            Some(jobs) => {
                tracing::debug!(count = jobs.len(), "Loaded stored catalogue");
                jobs
            }
            None => {
                let jobs = builtin_jobs()?;
                tracing::debug!(count = jobs.len(), "Loaded built-in catalogue");
                jobs
            }
        };

        Ok(Self { storage, jobs })
    }

    /// Every listing in catalogue order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn find(&self, id: u64) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Listings matching `query`, in the order it asks for.
    pub fn search(&self, query: &JobQuery) -> Vec<&Job> {
        let results = jobs::search(&self.jobs, query);
        tracing::debug!(
            total = self.jobs.len(),
            matched = results.len(),
            sort = ?query.sort,
            "Catalogue searched"
        );
        results
    }

    // -------------------------------------------------------------------------
    // Search terms
    // -------------------------------------------------------------------------

    /// Remember search terms for the next listings view.
    pub fn remember_search(&self, job: &str, location: &str) -> Result<(), JobError> {
        write_json(&self.storage, KEY_SEARCH_JOB, job.trim())?;
        write_json(&self.storage, KEY_SEARCH_LOCATION, location.trim())?;
        Ok(())
    }

    /// Read and forget the remembered search terms. `None` when nothing was
    /// remembered.
    pub fn take_search(&self) -> Result<Option<SearchTerms>, JobError> {
        let job: Option<String> = read_term(&self.storage, KEY_SEARCH_JOB)?;
        let location: Option<String> = read_term(&self.storage, KEY_SEARCH_LOCATION)?;
        if job.is_none() && location.is_none() {
            return Ok(None);
        }
        self.clear_search()?;
        Ok(Some(SearchTerms {
            job: job.unwrap_or_default(),
            location: location.unwrap_or_default(),
        }))
    }

    pub fn clear_search(&self) -> Result<(), JobError> {
        self.storage.remove_item(KEY_SEARCH_JOB)?;
        self.storage.remove_item(KEY_SEARCH_LOCATION)?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Remember listing `id` as the one opened for detail view.
    pub fn select(&self, id: u64) -> Result<&Job, JobError> {
        let job = self.find(id).ok_or(JobError::NotFound { id })?;
        write_json(&self.storage, KEY_SELECTED_JOB, job)?;
        tracing::debug!(job_id = id, "Job selected");
        Ok(job)
    }

    /// The listing last passed to `select`, as it was at that time.
    pub fn selected(&self) -> Result<Option<Job>, JobError> {
        match read_json(&self.storage, KEY_SELECTED_JOB) {
            Ok(job) => Ok(job),
            Err(StorageError::Json { source, .. }) => {
                tracing::warn!(error = %source, "Stored selection is malformed; ignoring it");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    // -------------------------------------------------------------------------
    // Posting
    // -------------------------------------------------------------------------

    /// Publish a listing on behalf of `poster`, who must be an employer.
    pub fn post_job(&mut self, new_job: NewJob, poster: &Session) -> Result<Job, JobError> {
        if poster.role() != Role::Employer {
            return Err(JobError::NotEmployer);
        }

        let id = self
            .jobs
            .iter()
            .map(|j| j.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(JobError::IdsExhausted)?;
        let job = new_job.into_job(id)?;

        self.jobs.push(job.clone());
        if let Err(e) = write_json(&self.storage, KEY_JOBS_DATABASE, &self.jobs) {
            self.jobs.pop();
            return Err(e.into());
        }

        tracing::info!(job_id = id, poster = poster.user_id(), "Job posted");
        Ok(job)
    }
}

/// A search term, treating a malformed value as absent.
fn read_term<S: KeyValueStorage>(storage: &S, key: &str) -> Result<Option<String>, StorageError> {
    match read_json(storage, key) {
        Err(StorageError::Json { .. }) => Ok(None),
        other => other,
    }
}

// =============================================================================
// Unit tests
// =============================================================================

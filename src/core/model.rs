// JobBoard - core/model.rs
//
// Core data model types for accounts and sessions. Pure data definitions
// with no I/O and no storage dependencies.
//
// Field names serialise as camelCase so stored JSON keeps the shape the
// web front end reads (`fullName`, `savedJobs`, `lastLogin`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// Account type chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    JobSeeker,
    Employer,
}

impl Role {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Role::JobSeeker => "Job Seeker",
            Role::Employer => "Employer",
        }
    }

    /// Wire name, as stored in JSON and accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "job-seeker",
            Role::Employer => "employer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "job-seeker" | "jobseeker" | "seeker" => Ok(Role::JobSeeker),
            "employer" => Ok(Role::Employer),
            other => Err(format!(
                "unknown role '{other}' (expected 'job-seeker' or 'employer')"
            )),
        }
    }
}

// =============================================================================
// Profile
// =============================================================================

/// One line of work history on a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    /// Free-form period, e.g. "2019 - 2023".
    pub period: String,
    pub description: String,
}

/// Editable profile sub-record of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub title: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
}

/// Partial profile update. `None` fields keep their current value;
/// `Some` fields replace it.
///
/// `full_name` lives on the user record rather than the profile, but the
/// profile form edits it together with the profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<ExperienceEntry>>,
}

impl ProfileUpdate {
    /// True when no field would change anything.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.title.is_none()
            && self.bio.is_none()
            && self.skills.is_none()
            && self.experience.is_none()
    }

    /// Merge the profile fields into `profile`, new values winning.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(ref title) = self.title {
            profile.title = title.clone();
        }
        if let Some(ref bio) = self.bio {
            profile.bio = bio.clone();
        }
        if let Some(ref skills) = self.skills {
            profile.skills = skills.clone();
        }
        if let Some(ref experience) = self.experience {
            profile.experience = experience.clone();
        }
    }
}

// =============================================================================
// Job alerts
// =============================================================================

/// A saved search the user wants to be notified about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAlert {
    pub id: u64,
    pub title: String,
    pub location: String,
    /// Daily digest (true) or immediate notification (false).
    #[serde(default)]
    pub daily: bool,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied part of a new alert; id and timestamp are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobAlert {
    pub title: String,
    pub location: String,
    pub daily: bool,
}

// =============================================================================
// User record and session
// =============================================================================

/// A registered account.
///
/// `password_hash` is read from either `passwordHash` or the legacy
/// `password` key so records written before hashing was introduced still
/// load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(alias = "password")]
    pub password_hash: String,
    pub role: Role,
    #[serde(default)]
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub saved_jobs: Vec<u64>,
    #[serde(default)]
    pub applied_jobs: Vec<u64>,
    #[serde(default)]
    pub job_alerts: Vec<JobAlert>,
}

impl User {
    /// Fresh record with an empty profile, no saved/applied jobs and no alerts.
    pub fn new(
        id: u64,
        email: String,
        password_hash: String,
        role: Role,
        full_name: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            role,
            full_name,
            created_at,
            profile: Profile::default(),
            saved_jobs: Vec::new(),
            applied_jobs: Vec::new(),
            job_alerts: Vec::new(),
        }
    }
}

/// The signed-in user: a denormalised copy of the record plus the time of
/// the login that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(flatten)]
    pub user: User,
    pub last_login: DateTime<Utc>,
}

impl Session {
    /// Identifier of the record this session mirrors.
    pub fn user_id(&self) -> u64 {
        self.user.id
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}

// =============================================================================
// Id sets
// =============================================================================

/// Insert `id` unless already present. Returns true when the set changed.
pub fn insert_unique(ids: &mut Vec<u64>, id: u64) -> bool {
    if ids.contains(&id) {
        false
    } else {
        ids.push(id);
        true
    }
}

/// Remove every occurrence of `id`. Returns true when the set changed.
pub fn remove_id(ids: &mut Vec<u64>, id: u64) -> bool {
    let before = ids.len();
    ids.retain(|&existing| existing != id);
    ids.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            1_700_000_000_000,
            "a@x.com".to_string(),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            Role::JobSeeker,
            "A".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_role_serialises_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Role::JobSeeker).unwrap(),
            "\"job-seeker\""
        );
        assert_eq!(serde_json::to_string(&Role::Employer).unwrap(), "\"employer\"");
        assert_eq!("job-seeker".parse::<Role>().unwrap(), Role::JobSeeker);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_json_uses_camel_case_keys() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("fullName").is_some());
        assert!(json.get("savedJobs").is_some());
        assert!(json.get("appliedJobs").is_some());
        assert!(json.get("jobAlerts").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("passwordHash").is_some());
    }

    /// Records written by the browser version carry `password` and may
    /// omit list fields entirely.
    #[test]
    fn test_user_reads_legacy_record_shape() {
        let legacy = r#"{
            "id": 1712345678901,
            "email": "old@x.com",
            "password": "secret",
            "role": "employer",
            "createdAt": "2024-04-05T10:00:00.000Z",
            "profile": {"title": "", "bio": "", "skills": [], "experience": []}
        }"#;
        let user: User = serde_json::from_str(legacy).unwrap();
        assert_eq!(user.password_hash, "secret");
        assert_eq!(user.role, Role::Employer);
        assert!(user.full_name.is_empty());
        assert!(user.saved_jobs.is_empty());
        assert!(user.job_alerts.is_empty());
    }

    #[test]
    fn test_session_flattens_user_fields() {
        let session = Session {
            user: sample_user(),
            last_login: Utc::now(),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert!(json.get("lastLogin").is_some());
        assert!(json.get("user").is_none());

        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_profile_update_merges_present_fields_only() {
        let mut profile = Profile {
            title: "Engineer".to_string(),
            bio: "Builds things".to_string(),
            skills: vec!["Rust".to_string()],
            experience: Vec::new(),
        };
        let update = ProfileUpdate {
            bio: Some("Builds reliable things".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut profile);

        assert_eq!(profile.title, "Engineer");
        assert_eq!(profile.bio, "Builds reliable things");
        assert_eq!(profile.skills, vec!["Rust".to_string()]);
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_id_set_helpers_keep_ids_unique() {
        let mut ids = Vec::new();
        assert!(insert_unique(&mut ids, 42));
        assert!(!insert_unique(&mut ids, 42));
        assert!(insert_unique(&mut ids, 7));
        assert_eq!(ids, vec![42, 7]);

        assert!(remove_id(&mut ids, 42));
        assert!(!remove_id(&mut ids, 42));
        assert_eq!(ids, vec![7]);
    }
}

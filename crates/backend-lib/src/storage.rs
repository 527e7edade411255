// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage collaborators: user accounts and per-owner tasks.
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{fs as tokio_fs, sync::Mutex};
use warden_common::{Task, UpdateTask, UserProfile};

/// Stored account, including the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    /// Normalised (trimmed, lowercase) email
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Trait for account storage backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account; fails with `Conflict` when the email is taken
    async fn insert_user(&self, user: UserRecord) -> Result<(), AppError>;

    /// Look up an account by normalised email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Look up an account by id
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, AppError>;
}

fn email_taken(email: &str) -> AppError {
    AppError::Conflict(format!("email {email} is already registered"))
}

/// Process-local account store
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    by_id: Arc<DashMap<String, UserRecord>>,
    id_by_email: Arc<DashMap<String, String>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert_user(&self, user: UserRecord) -> Result<(), AppError> {
        match self.id_by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(email_taken(&user.email)),
            Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
                self.by_id.insert(user.id.clone(), user);
                Ok(())
            },
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let Some(id) = self.id_by_email.get(email).map(|id| id.clone()) else {
            return Ok(None);
        };
        Ok(self.by_id.get(&id).map(|user| user.clone()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.by_id.get(id).map(|user| user.clone()))
    }
}

/// Flat-file account store: one JSON document per user under `<root>/users/`
#[derive(Clone)]
pub struct FlatFileUserStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileUserStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join("users"))?;
        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    fn user_path(&self, id: &str) -> PathBuf {
        self.users_dir().join(format!("{id}.json"))
    }

    async fn scan_for_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let mut entries = tokio_fs::read_dir(self.users_dir()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let content = tokio_fs::read_to_string(&path).await?;
            let user: UserRecord = serde_json::from_str(&content)?;
            if user.email == email {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }
}

/// Ids become file names, so only the characters we generate are accepted
fn is_safe_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn insert_user(&self, user: UserRecord) -> Result<(), AppError> {
        if !is_safe_id(&user.id) {
            return Err(AppError::InvalidInput("malformed user id".to_string()));
        }

        // uniqueness check and write must not interleave with another insert
        let _guard = self.write_lock.lock().await;
        if self.scan_for_email(&user.email).await?.is_some() {
            return Err(email_taken(&user.email));
        }

        let path = self.user_path(&user.id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&user)?;
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        self.scan_for_email(email).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, AppError> {
        if !is_safe_id(id) {
            return Ok(None);
        }
        let path = self.user_path(id);
        if !tokio_fs::try_exists(&path).await? {
            return Ok(None);
        }
        let content = tokio_fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

/// In-memory tasks, partitioned by owner id
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Arc<DashMap<String, BTreeMap<String, Task>>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, task: Task) -> Task {
        self.tasks
            .entry(task.owner_id.clone())
            .or_default()
            .insert(task.id.clone(), task.clone());
        task
    }

    pub fn list(&self, owner_id: &str) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .get(owner_id)
            .map(|owned| owned.values().cloned().collect())
            .unwrap_or_default();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        tasks
    }

    pub fn get(&self, owner_id: &str, task_id: &str) -> Option<Task> {
        self.tasks
            .get(owner_id)
            .and_then(|owned| owned.get(task_id).cloned())
    }

    /// Apply `update`; returns `None` when the owner has no such task
    pub fn update(
        &self,
        owner_id: &str,
        task_id: &str,
        update: UpdateTask,
        now: DateTime<Utc>,
    ) -> Option<Task> {
        let mut owned = self.tasks.get_mut(owner_id)?;
        let task = owned.get_mut(task_id)?;
        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = Some(description);
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        task.updated_at = now;
        Some(task.clone())
    }

    /// Flip the completion flag
    pub fn toggle_complete(
        &self,
        owner_id: &str,
        task_id: &str,
        now: DateTime<Utc>,
    ) -> Option<Task> {
        let mut owned = self.tasks.get_mut(owner_id)?;
        let task = owned.get_mut(task_id)?;
        task.completed = !task.completed;
        task.updated_at = now;
        Some(task.clone())
    }

    pub fn remove(&self, owner_id: &str, task_id: &str) -> Option<Task> {
        self.tasks
            .get_mut(owner_id)
            .and_then(|mut owned| owned.remove(task_id))
    }
}

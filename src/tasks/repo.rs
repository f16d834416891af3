use anyhow::Context;

use crate::error::Result;
use crate::store::Store;
use crate::tasks::types::Task;

/// Each user's tasks live under their own key, the whole sequence rewritten
/// on every mutation.
pub fn tasks_key(email: &str) -> String {
    format!("tasks_{email}")
}

/// An absent key is an empty sequence, not an error.
pub fn load_tasks(store: &dyn Store, email: &str) -> Result<Vec<Task>> {
    match store.get(&tasks_key(email))? {
        Some(raw) => Ok(serde_json::from_str(&raw).context("parse tasks blob")?),
        None => Ok(Vec::new()),
    }
}

pub fn save_tasks(store: &mut dyn Store, email: &str, tasks: &[Task]) -> Result<()> {
    let raw = serde_json::to_string(tasks).context("serialize tasks blob")?;
    store.put(&tasks_key(email), &raw)
}

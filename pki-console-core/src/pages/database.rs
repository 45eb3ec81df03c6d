//! Key-store database page.
//!
//! Layers activation exclusivity and the settings reference on top of the
//! generic page. Listing is always paired with a current-database fetch so
//! the active flag on the fresh list is correct; the pair runs as one
//! guarded refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use pki_console_client::{Command, Payload};

use crate::dispatcher::CommandDispatcher;
use crate::error::{CoreError, CoreResult};
use crate::pages::page::{PageMode, PageResource, ResourcePage};
use crate::types::Database;

impl PageResource for Database {
    const KIND: &'static str = "database";

    fn name(&self) -> &str {
        &self.name
    }

    fn draft() -> Self {
        Self::draft()
    }

    fn list_command() -> Command {
        Command::ListDatabases
    }

    fn create_command(&self) -> Command {
        Command::CreateDatabase {
            name: self.name.clone(),
            description: self.description.clone(),
            home: self.home.clone(),
        }
    }

    fn remove_command(name: &str) -> Command {
        Command::RemoveDatabase {
            name: name.to_string(),
        }
    }

    fn wipe_command() -> Command {
        Command::WipeDatabases
    }

    fn from_payload(payload: Payload) -> Option<Vec<Self>> {
        match payload {
            Payload::Databases(entries) => Some(entries.into_iter().map(Into::into).collect()),
            _ => None,
        }
    }
}

/// Clears the refreshing flag however the refresh settles.
struct RefreshGuard<'a>(&'a AtomicBool);

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Database page with activation orchestration.
pub struct DatabasePage {
    page: ResourcePage<Database>,
    settings: RwLock<Option<Database>>,
    refreshing: AtomicBool,
}

impl DatabasePage {
    /// Create an empty page.
    #[must_use]
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            page: ResourcePage::new(dispatcher),
            settings: RwLock::new(None),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Current UI mode.
    pub async fn mode(&self) -> PageMode {
        self.page.mode().await
    }

    /// Snapshot of the local list.
    pub async fn items(&self) -> Vec<Database> {
        self.page.items().await
    }

    /// Snapshot of the pending draft.
    pub async fn draft(&self) -> Option<Database> {
        self.page.draft().await
    }

    /// Edit the pending draft in place.
    pub async fn update_draft(&self, edit: impl FnOnce(&mut Database)) {
        self.page.update_draft(edit).await;
    }

    /// Flip the create form.
    pub async fn toggle_create(&self) {
        self.page.toggle_create().await;
    }

    /// Flip the wipe confirmation.
    pub async fn toggle_wipe(&self) {
        self.page.toggle_wipe().await;
    }

    /// Force `Table` mode. The settings reference is data, not UI state,
    /// and survives navigation.
    pub async fn reset(&self) {
        self.page.reset().await;
    }

    /// Submit the pending draft.
    pub async fn create(&self) -> CoreResult<()> {
        self.page.create().await
    }

    /// Remove one database by name; forgets the settings reference when it
    /// pointed at the removed entry.
    pub async fn remove(&self, name: &str) -> CoreResult<()> {
        self.page.remove(name).await?;

        let mut settings = self.settings.write().await;
        if settings.as_ref().is_some_and(|db| db.name == name) {
            *settings = None;
        }
        Ok(())
    }

    /// Remove every database.
    pub async fn wipe(&self) -> CoreResult<()> {
        self.page.wipe().await?;
        *self.settings.write().await = None;
        Ok(())
    }

    /// The active database, if one is set.
    pub async fn settings(&self) -> Option<Database> {
        self.settings.read().await.clone()
    }

    /// Atomic refresh: fetch the list, then resolve the active database and
    /// flag it on the fresh entries. A refresh arriving while one is in
    /// flight is rejected with [`CoreError::RefreshInProgress`] rather than
    /// interleaved.
    pub async fn refresh(&self) -> CoreResult<()> {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CoreError::RefreshInProgress);
        }
        let _guard = RefreshGuard(&self.refreshing);

        self.page.list().await?;

        let payload = self
            .page
            .dispatcher()
            .execute(Command::CurrentDatabase)
            .await?;
        let Payload::Name(current) = payload else {
            return Err(CoreError::UnexpectedPayload { action: "GetDB" });
        };

        let mut active = None;
        self.page
            .mutate_items(|items| {
                for db in items.iter_mut() {
                    db.is_active = !current.is_empty() && db.name == current;
                    if db.is_active {
                        active = Some(db.clone());
                    }
                }
            })
            .await;
        *self.settings.write().await = active;
        Ok(())
    }

    /// Switch the active database. Local flags only flip after the daemon
    /// confirms; a failed switch leaves the previous database active.
    pub async fn activate(&self, name: &str) -> CoreResult<()> {
        self.page
            .dispatcher()
            .execute(Command::SwitchDatabase {
                name: name.to_string(),
            })
            .await?;
        log::info!("active database switched to `{name}`");

        let mut chosen = None;
        self.page
            .mutate_items(|items| {
                for db in items.iter_mut() {
                    db.is_active = db.name == name;
                    if db.is_active {
                        chosen = Some(db.clone());
                    }
                }
            })
            .await;
        *self.settings.write().await = chosen;
        Ok(())
    }

    /// Persist edits to the active database's description and home.
    pub async fn update_settings(&self, description: &str, home: &str) -> CoreResult<()> {
        let name = self
            .settings
            .read()
            .await
            .as_ref()
            .map(|db| db.name.clone())
            .ok_or(CoreError::NoActiveDatabase)?;

        self.page
            .dispatcher()
            .execute(Command::UpdateDatabase {
                name: name.clone(),
                description: description.to_string(),
                home: home.to_string(),
            })
            .await?;

        self.page
            .mutate_items(|items| {
                if let Some(db) = items.iter_mut().find(|db| db.name == name) {
                    db.description = description.to_string();
                    db.home = home.to_string();
                }
            })
            .await;
        let mut settings = self.settings.write().await;
        if let Some(db) = settings.as_mut() {
            db.description = description.to_string();
            db.home = home.to_string();
        }
        Ok(())
    }
}

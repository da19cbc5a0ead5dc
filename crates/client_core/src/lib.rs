//! Client core for the disk administration backend: session state, the
//! navigation state machine, and the command/response protocol over the
//! single text channel. Rendering frontends stay outside this crate and
//! drive [`AdminClient`] through its async API.

use std::{path::Path, sync::Arc};

use shared::{
    domain::{DirectoryEntry, DiskDescriptor, EntryKind, PartitionDescriptor},
    error::ClientError,
    protocol::{Command, LOGIN_SUCCESS_MARKER},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod browser;
pub mod gateway;
pub mod navigation;
pub mod script;

pub use gateway::{
    execute_lossy, CommandGateway, HttpCommandGateway, MissingCommandGateway, TransportError,
};
pub use navigation::{NavigationContext, NavigationState, View};

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::Transport(err.message)
    }
}

/// The authenticated session. Existence of a value means authenticated;
/// exactly one is live at a time and a new login replaces it atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub partition_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreview {
    pub path: String,
    pub contents: String,
}

/// State change notifications for frontends.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    SessionOpened {
        username: String,
        partition_id: String,
    },
    SessionClosed,
    ViewChanged(View),
    /// Sample data was substituted for an uninterpretable transcript.
    SampleDataSubstituted {
        command: String,
    },
}

/// Folder navigation refreshes the listing; file navigation yields a
/// preview and leaves the path untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseOutcome {
    Listing(Vec<DirectoryEntry>),
    Preview(FilePreview),
}

#[derive(Debug, Clone)]
pub struct AdminClientOptions {
    /// Substitute fixed sample data when a structured transcript cannot be
    /// interpreted (demo/offline mode). The real error is logged either way.
    pub sample_fallback: bool,
}

impl Default for AdminClientOptions {
    fn default() -> Self {
        Self {
            sample_fallback: true,
        }
    }
}

/// Read-only snapshot of client state for rendering.
#[derive(Debug, Clone)]
pub struct UiSnapshot {
    pub view: View,
    pub login_modal_open: bool,
    pub session: Option<Session>,
    pub selected_disk: Option<DiskDescriptor>,
    pub current_partition_id: String,
    pub current_path: String,
    pub command_buffer: String,
    pub transcript: String,
    pub listing: Vec<DirectoryEntry>,
    pub preview: Option<FilePreview>,
}

struct ClientState {
    session: Option<Session>,
    nav: NavigationState,
    command_buffer: String,
    transcript: String,
    listing: Vec<DirectoryEntry>,
    preview: Option<FilePreview>,
}

impl ClientState {
    fn new() -> Self {
        Self {
            session: None,
            nav: NavigationState::default(),
            command_buffer: String::new(),
            transcript: String::new(),
            listing: Vec::new(),
            preview: None,
        }
    }
}

pub struct AdminClient {
    gateway: Arc<dyn CommandGateway>,
    sample_fallback: bool,
    inner: Mutex<ClientState>,
    events: broadcast::Sender<ClientEvent>,
}

impl AdminClient {
    pub fn new(gateway: Arc<dyn CommandGateway>) -> Arc<Self> {
        Self::with_options(gateway, AdminClientOptions::default())
    }

    pub fn with_options(gateway: Arc<dyn CommandGateway>, options: AdminClientOptions) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            gateway,
            sample_fallback: options.sample_fallback,
            inner: Mutex::new(ClientState::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }

    pub async fn snapshot(&self) -> UiSnapshot {
        let state = self.inner.lock().await;
        UiSnapshot {
            view: state.nav.view,
            login_modal_open: state.nav.login_modal_open,
            session: state.session.clone(),
            selected_disk: state.nav.context.selected_disk.clone(),
            current_partition_id: state.nav.context.current_partition_id.clone(),
            current_path: state.nav.context.current_path(),
            command_buffer: state.command_buffer.clone(),
            transcript: state.transcript.clone(),
            listing: state.listing.clone(),
            preview: state.preview.clone(),
        }
    }

    pub async fn session(&self) -> Option<Session> {
        self.inner.lock().await.session.clone()
    }

    pub async fn open_login_modal(&self) {
        self.inner.lock().await.nav.open_login_modal();
    }

    pub async fn close_login_modal(&self) {
        self.inner.lock().await.nav.close_login_modal();
    }

    /// Authenticate against the collaborator. Empty fields are rejected
    /// locally; otherwise exactly one login command is submitted and the
    /// transcript is checked for the session marker.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        partition_id: &str,
    ) -> Result<String, ClientError> {
        if username.is_empty() || password.is_empty() || partition_id.is_empty() {
            return Err(ClientError::Validation(
                "Por favor, completa todos los campos".into(),
            ));
        }

        let command = Command::Login {
            username: username.to_string(),
            password: password.to_string(),
            partition_id: partition_id.to_string(),
        }
        .render();
        let transcript = self.gateway.execute(&command).await?;

        if !transcript.contains(LOGIN_SUCCESS_MARKER) {
            return Err(ClientError::Auth {
                transcript: if transcript.is_empty() {
                    "Error al iniciar sesión".to_string()
                } else {
                    transcript
                },
            });
        }

        {
            let mut state = self.inner.lock().await;
            state.session = Some(Session {
                username: username.to_string(),
                partition_id: partition_id.to_string(),
            });
            state.nav.close_login_modal();
            state.transcript = transcript.clone();
        }
        info!(username, partition_id, "session established");
        self.emit(ClientEvent::SessionOpened {
            username: username.to_string(),
            partition_id: partition_id.to_string(),
        });
        Ok(transcript)
    }

    /// Submit the logout command and clear local state unconditionally.
    /// Logout is always locally successful: the session, navigation context
    /// and view reset even when the remote call fails; the returned line is
    /// the transcript (or the transport error rendered as text) for display.
    pub async fn logout(&self) -> String {
        let line = execute_lossy(self.gateway.as_ref(), &Command::Logout.render()).await;
        {
            let mut state = self.inner.lock().await;
            state.session = None;
            state.nav.force_terminal();
            state.command_buffer.clear();
            state.listing.clear();
            state.preview = None;
            state.transcript = line.clone();
        }
        info!("session cleared");
        self.emit(ClientEvent::SessionClosed);
        self.emit(ClientEvent::ViewChanged(View::Terminal));
        line
    }

    /// Free-form execution of a command or newline-separated script. The
    /// transcript (or error text) becomes the terminal output state.
    pub async fn run_commands(&self, text: &str) -> String {
        let line = execute_lossy(self.gateway.as_ref(), text).await;
        self.inner.lock().await.transcript = line.clone();
        line
    }

    /// Execute whatever is currently in the command buffer.
    pub async fn execute_buffer(&self) -> String {
        let buffer = self.inner.lock().await.command_buffer.clone();
        self.run_commands(&buffer).await
    }

    pub async fn set_command_buffer(&self, text: impl Into<String>) {
        self.inner.lock().await.command_buffer = text.into();
    }

    /// Load a `.smia` script file into the command buffer.
    pub async fn load_script(&self, path: &Path) -> Result<(), ClientError> {
        let text = script::load_script(path)?;
        self.set_command_buffer(text).await;
        Ok(())
    }

    /// Terminal -> DiskSelector; requires an authenticated session. Disks
    /// are fetched fresh on every entry, never cached across views.
    pub async fn browse_disks(&self) -> Result<Vec<DiskDescriptor>, ClientError> {
        {
            let mut state = self.inner.lock().await;
            let authenticated = state.session.is_some();
            if !state.nav.browse_disks(authenticated) {
                return Err(ClientError::Validation(
                    "log in from the terminal before browsing disks".into(),
                ));
            }
        }
        self.emit(ClientEvent::ViewChanged(View::DiskSelector));
        let command = Command::DiskInfo.render();
        let transcript = self.gateway.execute(&command).await?;
        self.interpret(&command, &transcript, browser::sample_disks)
    }

    /// DiskSelector -> PartitionSelector, fetching the chosen disk's
    /// partitions.
    pub async fn select_disk(
        &self,
        disk: DiskDescriptor,
    ) -> Result<Vec<PartitionDescriptor>, ClientError> {
        let disk_path = disk.path.clone();
        {
            let mut state = self.inner.lock().await;
            if !state.nav.select_disk(disk) {
                return Err(ClientError::Validation(
                    "disk selection is only available from the disk selector".into(),
                ));
            }
        }
        self.emit(ClientEvent::ViewChanged(View::PartitionSelector));
        let command = Command::PartitionInfo { disk_path }.render();
        let transcript = self.gateway.execute(&command).await?;
        self.interpret(&command, &transcript, browser::sample_partitions)
    }

    /// PartitionSelector -> FileSystemBrowser: binds the partition id,
    /// resets the path to root and loads the root listing. The bound id may
    /// differ from the session's partition id; that divergence is intended.
    pub async fn select_partition(
        &self,
        partition_id: &str,
    ) -> Result<Vec<DirectoryEntry>, ClientError> {
        {
            let mut state = self.inner.lock().await;
            if !state.nav.select_partition(partition_id) {
                return Err(ClientError::Validation(
                    "partition selection is only available from the partition selector".into(),
                ));
            }
        }
        self.emit(ClientEvent::ViewChanged(View::FileSystemBrowser));
        self.refresh_listing().await
    }

    /// Enter a folder or preview a file.
    pub async fn navigate_into(&self, entry: &DirectoryEntry) -> Result<BrowseOutcome, ClientError> {
        match entry.kind {
            EntryKind::Folder => {
                {
                    let mut state = self.inner.lock().await;
                    if !state.nav.enter_folder(&entry.name) {
                        return Err(ClientError::Validation(
                            "folder navigation is only available in the file system browser".into(),
                        ));
                    }
                }
                self.refresh_listing().await.map(BrowseOutcome::Listing)
            }
            EntryKind::File => {
                let path = {
                    let state = self.inner.lock().await;
                    state.nav.context.child_path(&entry.name)
                };
                self.read_file(&path).await.map(BrowseOutcome::Preview)
            }
        }
    }

    /// Pop one path segment and refresh; a no-op at root (the current
    /// listing is returned unchanged).
    pub async fn navigate_up(&self) -> Result<Vec<DirectoryEntry>, ClientError> {
        {
            let mut state = self.inner.lock().await;
            if !state.nav.navigate_up() {
                return Ok(state.listing.clone());
            }
        }
        self.refresh_listing().await
    }

    /// Read a file through `cat` and keep it as the active preview. The raw
    /// transcript is returned verbatim; an empty transcript is a valid
    /// empty file.
    pub async fn read_file(&self, path: &str) -> Result<FilePreview, ClientError> {
        let command = Command::Cat {
            file_path: path.to_string(),
        }
        .render();
        let contents = self.gateway.execute(&command).await?;
        let preview = FilePreview {
            path: path.to_string(),
            contents,
        };
        self.inner.lock().await.preview = Some(preview.clone());
        Ok(preview)
    }

    pub async fn close_preview(&self) {
        self.inner.lock().await.preview = None;
    }

    /// One step back through the selector chain. Returns the resulting view.
    pub async fn back(&self) -> View {
        let view = {
            let mut state = self.inner.lock().await;
            state.nav.back();
            state.nav.view
        };
        self.emit(ClientEvent::ViewChanged(view));
        view
    }

    pub async fn back_to_terminal(&self) -> View {
        {
            let mut state = self.inner.lock().await;
            state.nav.back_to_terminal();
        }
        self.emit(ClientEvent::ViewChanged(View::Terminal));
        View::Terminal
    }

    /// Fetch the listing for the current `(path, partition)` context. The
    /// navigation epoch is captured when the command is issued; if the
    /// context moved before the response resolved, the stale result is
    /// discarded instead of clobbering the newer state.
    async fn refresh_listing(&self) -> Result<Vec<DirectoryEntry>, ClientError> {
        let (epoch, command) = {
            let state = self.inner.lock().await;
            let command = Command::List {
                path: state.nav.context.current_path(),
                partition_id: state.nav.context.current_partition_id.clone(),
            }
            .render();
            (state.nav.epoch(), command)
        };

        let transcript = self.gateway.execute(&command).await?;
        let listing = self.interpret(&command, &transcript, browser::sample_directory)?;

        let mut state = self.inner.lock().await;
        if state.nav.epoch() != epoch {
            warn!(command, "discarding stale directory listing");
            return Ok(state.listing.clone());
        }
        state.listing = listing.clone();
        Ok(listing)
    }

    fn interpret<T: serde::de::DeserializeOwned>(
        &self,
        command: &str,
        transcript: &str,
        sample: fn() -> Vec<T>,
    ) -> Result<Vec<T>, ClientError> {
        match browser::interpret_or_sample(command, transcript, self.sample_fallback, sample)? {
            browser::Listing::Structured(entries) => Ok(entries),
            browser::Listing::Sample(entries) => {
                self.emit(ClientEvent::SampleDataSubstituted {
                    command: command.to_string(),
                });
                Ok(entries)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

//! View state machine and navigation context.
//!
//! Transitions are explicit functions over a plain state value, so the whole
//! machine is testable without I/O. Every mutation that changes what a
//! directory listing would mean bumps an epoch counter; in-flight listing
//! results carry the epoch they were issued under and are discarded when it
//! no longer matches (stale responses never clobber newer context).

use shared::domain::DiskDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Terminal,
    DiskSelector,
    PartitionSelector,
    FileSystemBrowser,
}

/// Selection context bound by navigation. The partition id here is
/// deliberately independent from the session's: the operator may browse a
/// different partition than the one used to authenticate.
#[derive(Debug, Clone, Default)]
pub struct NavigationContext {
    pub selected_disk: Option<DiskDescriptor>,
    pub current_partition_id: String,
    segments: Vec<String>,
}

impl NavigationContext {
    /// Current path rendered rooted at `/`.
    pub fn current_path(&self) -> String {
        if self.segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.segments.join("/"))
        }
    }

    pub fn at_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path of a child entry of the current directory.
    pub fn child_path(&self, name: &str) -> String {
        if self.segments.is_empty() {
            format!("/{name}")
        } else {
            format!("{}/{name}", self.current_path())
        }
    }

    fn push_segment(&mut self, name: &str) {
        self.segments.push(name.to_string());
    }

    fn pop_segment(&mut self) -> bool {
        self.segments.pop().is_some()
    }

    fn clear(&mut self) {
        self.selected_disk = None;
        self.current_partition_id.clear();
        self.segments.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    pub view: View,
    pub login_modal_open: bool,
    pub context: NavigationContext,
    epoch: u64,
}

impl NavigationState {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn bump(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub fn open_login_modal(&mut self) {
        self.login_modal_open = true;
    }

    pub fn close_login_modal(&mut self) {
        self.login_modal_open = false;
    }

    /// Terminal -> DiskSelector. Reachable only when authenticated; the
    /// caller passes its session check in.
    pub fn browse_disks(&mut self, authenticated: bool) -> bool {
        if self.view != View::Terminal || !authenticated {
            return false;
        }
        self.view = View::DiskSelector;
        true
    }

    /// DiskSelector -> PartitionSelector, binding the chosen disk.
    pub fn select_disk(&mut self, disk: DiskDescriptor) -> bool {
        if self.view != View::DiskSelector {
            return false;
        }
        self.context.selected_disk = Some(disk);
        self.view = View::PartitionSelector;
        true
    }

    /// PartitionSelector -> FileSystemBrowser, binding the partition id and
    /// resetting the path to root.
    pub fn select_partition(&mut self, partition_id: &str) -> bool {
        if self.view != View::PartitionSelector {
            return false;
        }
        self.context.current_partition_id = partition_id.to_string();
        self.context.segments.clear();
        self.view = View::FileSystemBrowser;
        self.bump();
        true
    }

    /// One step back: FileSystemBrowser -> PartitionSelector ->
    /// DiskSelector -> Terminal. No-op at Terminal.
    pub fn back(&mut self) -> bool {
        let target = match self.view {
            View::Terminal => return false,
            View::DiskSelector => View::Terminal,
            View::PartitionSelector => View::DiskSelector,
            View::FileSystemBrowser => View::PartitionSelector,
        };
        if self.view == View::FileSystemBrowser {
            self.bump();
        }
        self.view = target;
        true
    }

    pub fn back_to_terminal(&mut self) {
        if self.view == View::FileSystemBrowser {
            self.bump();
        }
        self.view = View::Terminal;
    }

    /// Forced return to Terminal on logout: clears all bound context.
    pub fn force_terminal(&mut self) {
        self.view = View::Terminal;
        self.login_modal_open = false;
        self.context.clear();
        self.bump();
    }

    /// Append a folder name to the current path.
    pub fn enter_folder(&mut self, name: &str) -> bool {
        if self.view != View::FileSystemBrowser {
            return false;
        }
        self.context.push_segment(name);
        self.bump();
        true
    }

    /// Pop the last path segment; no-op at root.
    pub fn navigate_up(&mut self) -> bool {
        if self.view != View::FileSystemBrowser || !self.context.pop_segment() {
            return false;
        }
        self.bump();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::Fit;

    fn sample_disk() -> DiskDescriptor {
        DiskDescriptor {
            path: "/home/disk1.mia".into(),
            capacity: "20MB".into(),
            fit: Fit::FF,
            mounted: vec!["291A".into()],
        }
    }

    fn browser_state() -> NavigationState {
        let mut nav = NavigationState::default();
        assert!(nav.browse_disks(true));
        assert!(nav.select_disk(sample_disk()));
        assert!(nav.select_partition("291A"));
        nav
    }

    #[test]
    fn disk_browse_requires_authentication() {
        let mut nav = NavigationState::default();
        assert!(!nav.browse_disks(false));
        assert_eq!(nav.view, View::Terminal);
        assert!(nav.browse_disks(true));
        assert_eq!(nav.view, View::DiskSelector);
    }

    #[test]
    fn selecting_partition_resets_path_to_root() {
        let mut nav = browser_state();
        assert!(nav.enter_folder("docs"));
        nav.back();
        assert!(nav.select_partition("292A"));
        assert_eq!(nav.context.current_path(), "/");
        assert_eq!(nav.context.current_partition_id, "292A");
    }

    #[test]
    fn folder_navigation_builds_root_relative_paths() {
        let mut nav = browser_state();
        assert!(nav.enter_folder("docs"));
        assert_eq!(nav.context.current_path(), "/docs");
        assert!(nav.enter_folder("x"));
        assert_eq!(nav.context.current_path(), "/docs/x");
        assert_eq!(nav.context.child_path("y"), "/docs/x/y");
    }

    #[test]
    fn navigate_up_at_root_is_a_no_op() {
        let mut nav = browser_state();
        let epoch = nav.epoch();
        assert!(!nav.navigate_up());
        assert_eq!(nav.context.current_path(), "/");
        assert_eq!(nav.epoch(), epoch);
    }

    #[test]
    fn back_walks_the_selector_chain() {
        let mut nav = browser_state();
        assert!(nav.back());
        assert_eq!(nav.view, View::PartitionSelector);
        assert!(nav.back());
        assert_eq!(nav.view, View::DiskSelector);
        assert!(nav.back());
        assert_eq!(nav.view, View::Terminal);
        assert!(!nav.back());
    }

    #[test]
    fn force_terminal_clears_bound_context() {
        let mut nav = browser_state();
        nav.enter_folder("docs");
        nav.force_terminal();
        assert_eq!(nav.view, View::Terminal);
        assert!(nav.context.selected_disk.is_none());
        assert!(nav.context.current_partition_id.is_empty());
        assert_eq!(nav.context.current_path(), "/");
    }

    #[test]
    fn context_mutations_bump_the_epoch() {
        let mut nav = browser_state();
        let start = nav.epoch();
        nav.enter_folder("docs");
        assert_eq!(nav.epoch(), start + 1);
        nav.navigate_up();
        assert_eq!(nav.epoch(), start + 2);
    }
}

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
}

impl FileEntry {
    pub fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Read-only view of one directory. `entries` is `None` until the listing
/// has been delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBrowser {
    pub path: PathBuf,
    pub entries: Option<Vec<FileEntry>>,
    pub selected: usize,
}

impl FileBrowser {
    pub fn loading(path: PathBuf) -> Self {
        Self {
            path,
            entries: None,
            selected: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.entries.is_none()
    }

    pub fn set_entries(&mut self, entries: Vec<FileEntry>) {
        self.entries = Some(entries);
        self.selected = 0;
    }

    pub fn entries(&self) -> &[FileEntry] {
        self.entries.as_deref().unwrap_or(&[])
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.entries().get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.entries().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }
}

/// Lists `path` with directories first, each group sorted by name.
pub async fn list_directory(path: &Path) -> io::Result<Vec<FileEntry>> {
    let mut reader = tokio::fs::read_dir(path).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let is_dir = entry
            .file_type()
            .await
            .map(|file_type| file_type.is_dir())
            .unwrap_or(false);
        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }
    entries.sort_by(compare_entries);
    Ok(entries)
}

fn compare_entries(a: &FileEntry, b: &FileEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

//! File browser ("Recents") model.
//!
//! Files and organizations are plain data seeded from [`crate::mock`];
//! there is no server behind them. Recency is tracked as whole days since
//! the last edit, which is all the browser UI displays.

use crate::model::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    Team,
}

/// An entry in the Recents listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    pub id: String,
    pub title: String,
    /// Emoji thumbnail shown on the file card.
    pub thumbnail: String,
    pub last_edited_days_ago: u32,
    /// Owning organization, by name.
    pub organization: String,
    pub kind: FileKind,
    pub status: FileStatus,
}

impl FileItem {
    /// Human label for the card footer: "Edited today" / "Edited 3 days ago".
    pub fn edited_label(&self) -> String {
        match self.last_edited_days_ago {
            0 => "Edited today".to_string(),
            1 => "Edited 1 day ago".to_string(),
            n => format!("Edited {n} days ago"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub plan: Plan,
}

/// A page of an open file. Each page owns its own layer tree.
#[derive(Debug, Clone)]
pub struct Page {
    pub id: String,
    pub name: String,
    pub document: Document,
}

/// An open editor file: metadata plus its pages.
#[derive(Debug, Clone)]
pub struct EditorFile {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub status: FileStatus,
    pub pages: Vec<Page>,
    pub current_page_id: String,
}

impl EditorFile {
    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.page(&self.current_page_id)
    }
}

/// Filter a listing by organization name. `None` means all organizations.
pub fn filter_by_organization<'a>(files: &'a [FileItem], org: Option<&str>) -> Vec<&'a FileItem> {
    files
        .iter()
        .filter(|f| org.is_none_or(|o| f.organization == o))
        .collect()
}

/// Sort a listing most-recently-edited first. Stable, so same-day files
/// keep their seeded order.
pub fn sort_by_recency(files: &mut [FileItem]) {
    files.sort_by_key(|f| f.last_edited_days_ago);
}

/// Look up a file by id.
pub fn find_file<'a>(files: &'a [FileItem], id: &str) -> Option<&'a FileItem> {
    files.iter().find(|f| f.id == id)
}

//! File-backed store of saved diagram views.
//!
//! The store is loaded once and written back after every mutation. A
//! mutation only reaches memory once the file has been replaced.

use anyhow::{Context, Result};
use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{Diagram, DisplaySettings, ErdView, ViewData};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("View not found: {0}")]
    NotFound(String),
    #[error("View name must not be empty")]
    EmptyName,
}

/// Saved views and the file they persist to
#[derive(Debug)]
pub struct ViewStore {
    path: PathBuf,
    views: Vec<ErdView>,
}

impl ViewStore {
    /// Load views from `path`; a missing file is an empty store
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let views = if path.exists() {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read views file: {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid views file: {}", path.display()))?
        } else {
            Vec::new()
        };

        debug!(path = %path.display(), count = views.len(), "loaded views");
        Ok(Self { path, views })
    }

    /// Write all views back to disk
    pub fn save(&self) -> Result<()> {
        write_views(&self.path, &self.views)
    }

    fn commit(&mut self, views: Vec<ErdView>) -> Result<()> {
        write_views(&self.path, &views)?;
        self.views = views;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn views(&self) -> &[ErdView] {
        &self.views
    }

    pub fn get(&self, id: &str) -> Option<&ErdView> {
        self.views.iter().find(|v| v.id == id)
    }

    /// Create an empty view
    pub fn create(&mut self, name: &str) -> Result<&ErdView> {
        self.create_from_diagram(name, "", &Diagram::default())
    }

    /// Create a view holding a copy of `diagram`
    pub fn create_from_diagram(
        &mut self,
        name: &str,
        description: &str,
        diagram: &Diagram,
    ) -> Result<&ErdView> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ViewError::EmptyName.into());
        }

        let now = Utc::now().timestamp_millis();
        let view = ErdView {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
            starred: false,
            settings: diagram.settings.unwrap_or_default(),
            data: ViewData {
                nodes: diagram.nodes.clone(),
                edges: diagram.edges.clone(),
                hide_prefix: Vec::new(),
                filter: String::new(),
            },
        };

        let mut views = self.views.clone();
        views.push(view);
        self.commit(views)?;

        let created = &self.views[self.views.len() - 1];
        info!(id = %created.id, name = %created.name, "created view");
        Ok(created)
    }

    /// Replace a view by id, bumping its update time
    pub fn update(&mut self, mut view: ErdView) -> Result<()> {
        let mut views = self.views.clone();
        let slot = views
            .iter_mut()
            .find(|v| v.id == view.id)
            .ok_or_else(|| ViewError::NotFound(view.id.clone()))?;

        view.updated_at = Utc::now().timestamp_millis().max(slot.updated_at);
        *slot = view;
        self.commit(views)
    }

    /// Remove a view by id
    pub fn delete(&mut self, id: &str) -> Result<ErdView> {
        let index = self
            .views
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| ViewError::NotFound(id.to_string()))?;

        let mut views = self.views.clone();
        let removed = views.remove(index);
        self.commit(views)?;

        info!(id = %removed.id, name = %removed.name, "deleted view");
        Ok(removed)
    }

    /// Flip the starred flag; returns the new value
    pub fn toggle_star(&mut self, id: &str) -> Result<bool> {
        let mut view = self
            .get(id)
            .cloned()
            .ok_or_else(|| ViewError::NotFound(id.to_string()))?;
        view.starred = !view.starred;
        let starred = view.starred;
        self.update(view)?;
        Ok(starred)
    }
}

/// Replace the views file by writing a sibling temp file and renaming it over
fn write_views(path: &Path, views: &[ErdView]) -> Result<()> {
    let output = serde_json::to_string_pretty(views).context("Failed to serialize views")?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create views file in: {}", dir.display()))?;
    file.write_all(output.as_bytes())
        .context("Failed to write views file")?;
    file.flush().context("Failed to flush views file")?;
    file.persist(path)
        .with_context(|| format!("Failed to replace views file: {}", path.display()))?;
    Ok(())
}

/// Diagram shown by a view, with its settings attached
pub fn to_diagram(view: &ErdView) -> Diagram {
    let settings: DisplaySettings = view.settings;
    Diagram {
        nodes: view.data.nodes.clone(),
        edges: view.data.edges.clone(),
        settings: Some(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, Position, RelationshipEdge, TableNode};
    use tempfile::tempdir;

    fn diagram() -> Diagram {
        Diagram::new(
            vec![TableNode::new(
                "users",
                Position::new(1.0, 2.0),
                vec![Column::new("id", "int")],
            )],
            vec![RelationshipEdge::between("users", "users")],
        )
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = ViewStore::load(dir.path().join("views.json")).unwrap();
        assert!(store.views().is_empty());
    }

    #[test]
    fn mutations_are_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("views.json");

        let mut store = ViewStore::load(&path).unwrap();
        let id = store
            .create_from_diagram("Billing", "invoices and accounts", &diagram())
            .unwrap()
            .id
            .clone();
        store.create("Scratch").unwrap();

        let reloaded = ViewStore::load(&path).unwrap();
        assert_eq!(reloaded.views().len(), 2);
        let view = reloaded.get(&id).unwrap();
        assert_eq!(view.name, "Billing");
        assert_eq!(view.data.nodes, diagram().nodes);
        assert_eq!(view.settings, DisplaySettings::default());
    }

    #[test]
    fn update_replaces_and_bumps_timestamp() {
        let dir = tempdir().unwrap();
        let mut store = ViewStore::load(dir.path().join("views.json")).unwrap();
        let mut view = store.create("Draft").unwrap().clone();
        let created_at = view.created_at;

        view.description = "edited".to_string();
        view.data.filter = "user".to_string();
        store.update(view.clone()).unwrap();

        let stored = store.get(&view.id).unwrap();
        assert_eq!(stored.description, "edited");
        assert_eq!(stored.data.filter, "user");
        assert!(stored.updated_at >= created_at);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let dir = tempdir().unwrap();
        let mut store = ViewStore::load(dir.path().join("views.json")).unwrap();
        assert!(store.delete("nope").is_err());
        assert!(store.toggle_star("nope").is_err());

        let mut view = store.create("A").unwrap().clone();
        view.id = "other".to_string();
        let err = store.update(view).unwrap_err();
        assert!(err.to_string().contains("View not found"));
    }

    #[test]
    fn delete_and_star() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("views.json");
        let mut store = ViewStore::load(&path).unwrap();
        let id = store.create("A").unwrap().id.clone();

        assert!(store.toggle_star(&id).unwrap());
        assert!(ViewStore::load(&path).unwrap().get(&id).unwrap().starred);
        assert!(!store.toggle_star(&id).unwrap());

        let removed = store.delete(&id).unwrap();
        assert_eq!(removed.name, "A");
        assert!(ViewStore::load(&path).unwrap().views().is_empty());
    }

    #[test]
    fn empty_name_is_rejected() {
        let dir = tempdir().unwrap();
        let mut store = ViewStore::load(dir.path().join("views.json")).unwrap();
        assert!(store.create("   ").is_err());
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let dir = tempdir().unwrap();
        let mut store = ViewStore::load(dir.path().join("missing_dir").join("views.json")).unwrap();

        assert!(store.create("A").is_err());
        assert!(store.views().is_empty());
    }

    #[test]
    fn failed_delete_and_update_keep_views() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("store");
        std::fs::create_dir(&sub).unwrap();
        let mut store = ViewStore::load(sub.join("views.json")).unwrap();
        let mut view = store.create("A").unwrap().clone();

        std::fs::remove_dir_all(&sub).unwrap();

        assert!(store.delete(&view.id).is_err());
        assert_eq!(store.views().len(), 1);

        view.description = "edited".to_string();
        assert!(store.update(view.clone()).is_err());
        assert_eq!(store.get(&view.id).unwrap().description, "");

        assert!(store.toggle_star(&view.id).is_err());
        assert!(!store.get(&view.id).unwrap().starred);
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("views.json");
        std::fs::write(&path, "[]").unwrap();

        let mut store = ViewStore::load(&path).unwrap();
        store.create("A").unwrap();
        store.create("B").unwrap();

        let names: Vec<_> = ViewStore::load(&path)
            .unwrap()
            .views()
            .iter()
            .map(|v| v.name.clone())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn to_diagram_carries_settings() {
        let dir = tempdir().unwrap();
        let mut store = ViewStore::load(dir.path().join("views.json")).unwrap();
        let settings = DisplaySettings {
            hide_meta_fields: true,
            ..DisplaySettings::default()
        };
        let view = store
            .create_from_diagram("V", "", &diagram().with_settings(settings))
            .unwrap();
        let diagram = to_diagram(view);
        assert_eq!(diagram.settings, Some(settings));
        assert_eq!(diagram.edges.len(), 1);
    }
}

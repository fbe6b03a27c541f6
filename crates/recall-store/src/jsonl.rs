//! File-backed graph store using newline-delimited JSON.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use recall_core::KnowledgeGraph;

use crate::record::{encode_graph, Record};
use crate::{GraphStore, StoreError};

/// Distinguishes concurrent saves within one process.
static SAVE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Newline-delimited JSON store backed by a single file.
///
/// ```text
/// {root}/
///   memory.json         <- one record per line
///   .memory.json.{pid}.{seq}.tmp   <- only while a save is in flight
/// ```
///
/// Saves go to a sibling temporary file which is then renamed over the
/// target, so an interrupted write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonlGraphStore {
    path: PathBuf,
}

impl JsonlGraphStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "memory.json".to_string());
        let seq = SAVE_SEQ.fetch_add(1, Ordering::Relaxed);
        self.path.with_file_name(format!(
            ".{}.{}.{}.tmp",
            file_name,
            std::process::id(),
            seq
        ))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl GraphStore for JsonlGraphStore {
    async fn load(&self) -> Result<KnowledgeGraph, StoreError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Store file absent, starting empty");
                return Ok(KnowledgeGraph::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        parse_graph(&self.path, &data)
    }

    async fn save(&self, graph: &KnowledgeGraph) -> Result<(), StoreError> {
        let contents = encode_graph(graph)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path();
        if let Err(e) = write_synced(&temp, contents.as_bytes()).await {
            let _ = fs::remove_file(&temp).await;
            return Err(self.io_error(e));
        }
        if let Err(e) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(self.io_error(e));
        }

        tracing::debug!(
            path = %self.path.display(),
            entities = graph.entities.len(),
            relations = graph.relations.len(),
            "Graph saved"
        );

        Ok(())
    }
}

/// Distribute the records of a store file into a graph, in file order.
fn parse_graph(path: &Path, data: &str) -> Result<KnowledgeGraph, StoreError> {
    let mut graph = KnowledgeGraph::default();

    for (idx, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: Record =
            serde_json::from_str(line).map_err(|source| StoreError::MalformedLine {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;

        match record {
            Record::Entity(entity) => graph.entities.push(entity),
            Record::Relation(relation) => graph.relations.push(relation),
            Record::Unknown => {
                tracing::debug!(line = idx + 1, "Skipping record with unrecognized type");
            }
        }
    }

    Ok(graph)
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::{Entity, Relation};

    fn sample_graph() -> KnowledgeGraph {
        KnowledgeGraph {
            entities: vec![
                Entity::new("Alice", "person", &["likes tea"]),
                Entity::new("Bob", "person", &[]),
            ],
            relations: vec![Relation::new("Alice", "Bob", "knows")],
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty_graph() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlGraphStore::new(dir.path().join("memory.json"));

        let graph = store.load().await.unwrap();
        assert!(graph.is_empty());
    }

    #[tokio::test]
    async fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlGraphStore::new(dir.path().join("memory.json"));
        let graph = sample_graph();

        store.save(&graph).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, graph);
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlGraphStore::new(dir.path().join("memory.json"));

        store.save(&sample_graph()).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["memory.json".to_string()]);
    }

    #[test]
    fn temp_paths_differ_between_stores_on_one_file() {
        let a = JsonlGraphStore::new("/data/memory.json");
        let b = JsonlGraphStore::new("/data/memory.json");
        assert_ne!(a.temp_path(), b.temp_path());
        assert_ne!(a.temp_path(), a.temp_path());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_from_separate_stores_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = JsonlGraphStore::new(&path);
            handles.push(tokio::spawn(async move {
                let graph = KnowledgeGraph {
                    entities: vec![Entity::new(&format!("e{i}"), "node", &[])],
                    relations: vec![],
                };
                store.save(&graph).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Last rename wins; the file is one complete graph with no leftovers.
        let loaded = JsonlGraphStore::new(&path).load().await.unwrap();
        assert_eq!(loaded.entities.len(), 1);
        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["memory.json".to_string()]);
    }

    #[tokio::test]
    async fn save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlGraphStore::new(dir.path().join("nested/deeper/memory.json"));

        store.save(&sample_graph()).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlGraphStore::new(dir.path().join("memory.json"));

        store.save(&sample_graph()).await.unwrap();
        store.save(&KnowledgeGraph::default()).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.is_empty());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(
            &path,
            "\n{\"type\":\"entity\",\"name\":\"Alice\",\"entityType\":\"person\",\"observations\":[]}\n   \n\
             {\"type\":\"relation\",\"from\":\"Alice\",\"to\":\"Bob\",\"relationType\":\"knows\"}",
        )
        .unwrap();

        let graph = JsonlGraphStore::new(&path).load().await.unwrap();
        assert_eq!(graph.entities.len(), 1);
        assert_eq!(graph.relations.len(), 1);
    }

    #[tokio::test]
    async fn unknown_record_types_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(
            &path,
            "{\"type\":\"note\",\"body\":\"x\"}\n\
             {\"type\":\"entity\",\"name\":\"Alice\",\"entityType\":\"person\",\"observations\":[]}\n",
        )
        .unwrap();

        let graph = JsonlGraphStore::new(&path).load().await.unwrap();
        assert_eq!(graph.entities.len(), 1);
        assert!(graph.relations.is_empty());
    }

    #[tokio::test]
    async fn malformed_line_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(
            &path,
            "{\"type\":\"entity\",\"name\":\"Alice\",\"entityType\":\"person\",\"observations\":[]}\n\
             {not json\n",
        )
        .unwrap();

        let result = JsonlGraphStore::new(&path).load().await;
        assert!(matches!(
            result,
            Err(StoreError::MalformedLine { line: 2, .. })
        ));
    }

    #[tokio::test]
    async fn unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file.
        let result = JsonlGraphStore::new(dir.path()).load().await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}

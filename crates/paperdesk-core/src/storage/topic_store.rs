use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::{PaperdeskError, Result};
use crate::models::{PaperRecord, StoredPaper};

/// File name of the bucket inside each topic directory.
pub const BUCKET_FILE: &str = "papers_info.json";

/// Paper id → stored projection, in the order the search returned them.
pub type TopicBucket = IndexMap<String, StoredPaper>;

/// Lower-cases a topic and replaces spaces and path separators with underscores.
///
/// Rejects keys that would not be a single directory name under the store root.
pub fn normalize_topic_key(topic: &str) -> Result<String> {
    let key = topic.trim().to_lowercase().replace([' ', '/', '\\'], "_");
    if key.is_empty() || key == "." || key == ".." {
        return Err(PaperdeskError::InvalidTopic(topic.to_string()));
    }
    Ok(key)
}

/// `quantum_computing` → `Quantum Computing`.
pub fn display_name(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One directory per normalized topic, one JSON bucket per directory.
#[derive(Debug, Clone)]
pub struct TopicStore {
    root: PathBuf,
}

impl TopicStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bucket_path(&self, key: &str) -> PathBuf {
        self.root.join(key).join(BUCKET_FILE)
    }

    /// Overwrites the bucket for `topic` with `records`.
    pub fn save(&self, topic: &str, records: &[PaperRecord]) -> Result<PathBuf> {
        let key = normalize_topic_key(topic)?;
        let dir = self.root.join(&key);
        fs::create_dir_all(&dir)?;

        let bucket: TopicBucket = records
            .iter()
            .map(|record| (record.id.clone(), record.to_stored()))
            .collect();

        let path = dir.join(BUCKET_FILE);
        let json = serde_json::to_string_pretty(&bucket)?;
        fs::write(&path, json)?;

        info!(topic = %key, papers = bucket.len(), "saved topic bucket");
        Ok(path)
    }

    /// Loads the bucket for `topic`, or `None` if it was never saved.
    pub fn load_topic(&self, topic: &str) -> Result<Option<TopicBucket>> {
        let key = normalize_topic_key(topic)?;
        let path = self.bucket_path(&key);
        if !path.is_file() {
            return Ok(None);
        }
        load_bucket(&path).map(Some)
    }

    /// Saved papers of `topic` lifted back into records, in saved order.
    pub fn load_records(&self, topic: &str) -> Result<Option<Vec<PaperRecord>>> {
        Ok(self.load_topic(topic)?.map(|bucket| {
            bucket
                .into_iter()
                .map(|(id, paper)| paper.into_record(id))
                .collect()
        }))
    }

    /// Topic keys with a bucket file on disk, sorted by name.
    pub fn list_topics(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut topics = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if !entry.path().join(BUCKET_FILE).is_file() {
                continue;
            }
            topics.push(entry.file_name().to_string_lossy().to_string());
        }
        topics.sort();
        Ok(topics)
    }

    /// Scans every bucket in `list_topics` order; the first bucket holding
    /// `paper_id` wins.
    pub fn find_by_id(&self, paper_id: &str) -> Result<Option<StoredPaper>> {
        for key in self.list_topics()? {
            let path = self.bucket_path(&key);
            let mut bucket = match load_bucket(&path) {
                Ok(bucket) => bucket,
                Err(e) => {
                    warn!("skipping unreadable bucket {}: {e}", path.display());
                    continue;
                }
            };
            if let Some(paper) = bucket.shift_remove(paper_id) {
                debug!(topic = %key, paper_id, "found paper");
                return Ok(Some(paper));
            }
        }
        Ok(None)
    }
}

fn load_bucket(path: &Path) -> Result<TopicBucket> {
    let contents = fs::read_to_string(path)?;
    let bucket: TopicBucket = serde_json::from_str(&contents)?;
    Ok(bucket)
}

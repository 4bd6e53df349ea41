use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::{PatientRecord, RecordStore, RecordStoreFuture};

/// One pretty-printed JSON file per record, `record_{id}.json`, under a single directory.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    dir: PathBuf,
}

impl FileRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, record_id: Uuid) -> PathBuf {
        self.dir.join(format!("record_{record_id}.json"))
    }
}

impl RecordStore for FileRecordStore {
    fn save<'a>(&'a self, record: &'a PatientRecord) -> RecordStoreFuture<'a, ()> {
        Box::pin(async move {
            let body = serde_json::to_vec_pretty(record)?;
            tokio::fs::create_dir_all(&self.dir).await?;

            let path = self.path_for(record.record_id);
            let staging = path.with_extension("json.tmp");
            tokio::fs::write(&staging, &body).await?;
            tokio::fs::rename(&staging, &path).await?;

            debug!(record_id = %record.record_id, bytes = body.len(), "saved patient record");
            Ok(())
        })
    }

    fn load<'a>(&'a self, record_id: Uuid) -> RecordStoreFuture<'a, Option<PatientRecord>> {
        Box::pin(async move {
            let body = match tokio::fs::read(self.path_for(record_id)).await {
                Ok(body) => body,
                Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(err.into()),
            };
            Ok(Some(serde_json::from_slice(&body)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::FileRecordStore;
    use crate::models::{PatientProfile, Session};
    use crate::records::{PatientRecord, RecordStore};

    fn scratch_dir() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("record-store-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn saves_and_loads_records_by_id() {
        let dir = scratch_dir();
        let store = FileRecordStore::new(&dir);
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            patient: PatientProfile {
                name: Some("Ana".to_string()),
                ..PatientProfile::default()
            },
            turns: Vec::new(),
            created_at: now,
            last_active_at: now,
        };
        let record = PatientRecord::new(
            session.patient.clone(),
            Some(&session),
            None,
            None,
            "Dr. Smith",
            now,
        );

        store.save(&record).await.expect("record saves");
        let file = dir.join(format!("record_{}.json", record.record_id));
        assert!(file.exists());

        let loaded = store
            .load(record.record_id)
            .await
            .expect("record loads")
            .expect("record exists");
        assert_eq!(loaded.record_id, record.record_id);
        assert_eq!(loaded.patient.display_name(), "Ana");

        assert!(store.load(Uuid::new_v4()).await.expect("lookup works").is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }
}

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::RecordStore;
use crate::dto::resume_dto::RegisterResumePayload;
use crate::error::{Error, Result};
use crate::models::resume::{Resume, ALLOWED_CONTENT_TYPES};
use crate::utils::time;

/// Keeps references to résumé files held by the blob store.
#[derive(Clone)]
pub struct ResumeService {
    store: Arc<dyn RecordStore>,
}

impl ResumeService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn register(&self, owner_id: Uuid, payload: RegisterResumePayload) -> Result<Resume> {
        if !ALLOWED_CONTENT_TYPES.contains(&payload.content_type.as_str()) {
            return Err(Error::BadRequest(format!(
                "Content type {} is not allowed",
                payload.content_type
            )));
        }
        let resume = Resume {
            id: Uuid::new_v4(),
            owner_id,
            file_name: payload.file_name.trim().to_string(),
            content_type: payload.content_type,
            file_size: payload.file_size,
            storage_url: payload.storage_url,
            uploaded_at: time::now(),
        };
        self.store.insert_resume(&resume).await
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Resume>> {
        self.store.list_resumes(owner_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Resume>> {
        self.store.list_all_resumes().await
    }

    /// The résumé, if it exists and belongs to `owner_id`.
    pub async fn resolve(&self, resume_id: Uuid, owner_id: Uuid) -> Result<Option<Resume>> {
        let resume = self.store.get_resume(resume_id).await?;
        Ok(resume.filter(|r| r.owner_id == owner_id))
    }

    pub async fn delete(&self, resume_id: Uuid, owner_id: Uuid) -> Result<()> {
        let resume = self
            .store
            .get_resume(resume_id)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".into()))?;
        if resume.owner_id != owner_id {
            return Err(Error::Forbidden(
                "Not authorized to delete this resume".into(),
            ));
        }
        self.store.delete_resume(resume_id).await?;
        Ok(())
    }

    /// Administrative delete, no ownership check. Applications that used the
    /// résumé keep their row with the reference cleared.
    pub async fn remove(&self, resume_id: Uuid) -> Result<()> {
        if !self.store.delete_resume(resume_id).await? {
            return Err(Error::NotFound("Resume not found".into()));
        }
        info!(%resume_id, "Resume removed by admin");
        Ok(())
    }
}

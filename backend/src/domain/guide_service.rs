use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::storage::guides::GuideRecord;
use crate::storage::DbConnection;
use shared::{CreateGuideRequest, Guide, GuideListResponse, GuideResponse, UpdateGuideRequest};

/// Service for downloadable PDF guide metadata. The files themselves sit in
/// the guides directory and are served statically; this service only tracks
/// titles and filenames.
#[derive(Clone)]
pub struct GuideService {
    db: DbConnection,
}

impl GuideService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Register a guide
    pub async fn create_guide(&self, request: CreateGuideRequest) -> ApiResult<GuideResponse> {
        info!("Creating guide: title={}", request.title);

        let title = validate_title(&request.title)?;
        let filename = validate_filename(&request.filename)?;

        let record = GuideRecord {
            id: Uuid::new_v4().to_string(),
            title,
            description: request.description,
            filename,
            created_at: Utc::now().to_rfc3339(),
        };

        self.db.store_guide(&record).await?;
        info!("Created guide {} ({})", record.id, record.title);

        Ok(GuideResponse {
            guide: to_guide(record),
            success_message: "Guide created successfully".to_string(),
        })
    }

    /// Get a guide by ID
    pub async fn get_guide(&self, guide_id: &str) -> ApiResult<Guide> {
        self.db
            .get_guide(guide_id)
            .await?
            .map(to_guide)
            .ok_or(ApiError::GuideNotFound)
    }

    /// List all guides
    pub async fn list_guides(&self) -> ApiResult<GuideListResponse> {
        let guides = self.db.list_guides().await?.into_iter().map(to_guide).collect();
        Ok(GuideListResponse { guides })
    }

    /// Update guide metadata; only provided fields change
    pub async fn update_guide(
        &self,
        guide_id: &str,
        request: UpdateGuideRequest,
    ) -> ApiResult<GuideResponse> {
        info!("Updating guide: {}", guide_id);

        let mut record = self
            .db
            .get_guide(guide_id)
            .await?
            .ok_or(ApiError::GuideNotFound)?;

        if let Some(title) = request.title {
            record.title = validate_title(&title)?;
        }
        record.description =
            super::merge_optional_text(request.description, record.description.take());
        if let Some(filename) = request.filename {
            record.filename = validate_filename(&filename)?;
        }

        if !self.db.update_guide(&record).await? {
            return Err(ApiError::GuideNotFound);
        }

        Ok(GuideResponse {
            guide: to_guide(record),
            success_message: "Guide updated successfully".to_string(),
        })
    }

    /// Remove guide metadata (the file on disk is left alone)
    pub async fn delete_guide(&self, guide_id: &str) -> ApiResult<()> {
        info!("Deleting guide: {}", guide_id);

        if !self.db.delete_guide(guide_id).await? {
            return Err(ApiError::GuideNotFound);
        }
        Ok(())
    }
}

fn to_guide(record: GuideRecord) -> Guide {
    let url = format!("/guides/{}", record.filename);
    Guide {
        id: record.id,
        title: record.title,
        description: record.description,
        filename: record.filename,
        url,
        created_at: record.created_at,
    }
}

fn validate_title(title: &str) -> ApiResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }
    Ok(title.to_string())
}

/// Filenames must be plain PDF names; they are joined onto the guides
/// directory by the static file service.
fn validate_filename(filename: &str) -> ApiResult<String> {
    let filename = filename.trim();
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(ApiError::Validation("invalid guide filename".to_string()));
    }
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(ApiError::Validation("guide must be a .pdf file".to_string()));
    }
    Ok(filename.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> GuideService {
        let db = DbConnection::init_test().await.expect("init test db");
        GuideService::new(db)
    }

    #[tokio::test]
    async fn create_derives_download_url() {
        let service = setup().await;

        let created = service
            .create_guide(CreateGuideRequest {
                title: "Beginner Program".to_string(),
                description: None,
                filename: "beginner-program.pdf".to_string(),
            })
            .await
            .expect("create");

        assert_eq!(created.guide.url, "/guides/beginner-program.pdf");
    }

    #[tokio::test]
    async fn rejects_traversal_and_non_pdf_filenames() {
        let service = setup().await;

        for bad in ["../secrets.pdf", "a/b.pdf", "notes.txt", ""] {
            let err = service
                .create_guide(CreateGuideRequest {
                    title: "Bad".to_string(),
                    description: None,
                    filename: bad.to_string(),
                })
                .await
                .expect_err("must reject");
            assert!(matches!(err, ApiError::Validation(_)), "filename: {bad}");
        }
    }

    #[tokio::test]
    async fn blank_description_clears_it() {
        let service = setup().await;
        let created = service
            .create_guide(CreateGuideRequest {
                title: "Mobility".to_string(),
                description: Some("Daily routine".to_string()),
                filename: "mobility.pdf".to_string(),
            })
            .await
            .expect("create");

        let updated = service
            .update_guide(
                &created.guide.id,
                UpdateGuideRequest {
                    description: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.guide.description, None);
        assert_eq!(updated.guide.title, "Mobility");
    }

    #[tokio::test]
    async fn update_and_delete() {
        let service = setup().await;
        let created = service
            .create_guide(CreateGuideRequest {
                title: "Cutting Guide".to_string(),
                description: None,
                filename: "cutting.pdf".to_string(),
            })
            .await
            .expect("create");

        let updated = service
            .update_guide(
                &created.guide.id,
                UpdateGuideRequest {
                    title: Some("Fat Loss Guide".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.guide.title, "Fat Loss Guide");
        assert_eq!(updated.guide.filename, "cutting.pdf");

        service.delete_guide(&created.guide.id).await.expect("delete");
        assert!(matches!(
            service.get_guide(&created.guide.id).await,
            Err(ApiError::GuideNotFound)
        ));
    }
}

use std::sync::Arc;

use models::product::Model;
use tracing::{debug, info, instrument, warn};

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};
use crate::product::domain::ProductSubmission;
use crate::product::form::ProductForm;
use crate::product::repository::ProductRepository;
use crate::product::IMAGE_AREA;
use crate::storage::ImageStore;

/// Application service owning both halves of a product: its row and its image file.
///
/// Files are written before rows and removed again if the row write fails;
/// a replaced image is only deleted once the row points at its successor.
pub struct ProductService<R: ProductRepository, S: ImageStore> {
    repo: Arc<R>,
    images: Arc<S>,
    max_image_bytes: u64,
}

impl<R: ProductRepository, S: ImageStore> ProductService<R, S> {
    pub fn new(repo: Arc<R>, images: Arc<S>, max_image_bytes: u64) -> Self {
        Self { repo, images, max_image_bytes }
    }

    pub fn max_image_kb(&self) -> u64 { self.max_image_bytes / 1024 }

    pub async fn list(&self, pagination: Pagination) -> Result<Page<Model>, ServiceError> {
        self.repo.list(pagination).await
    }

    pub async fn get(&self, id: i32) -> Result<Model, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("product"))
    }

    pub fn create_form(&self) -> ProductForm { ProductForm::create(self.max_image_kb()) }

    /// Current attributes of a product laid out as its edit form.
    pub async fn edit_form(&self, id: i32) -> Result<ProductForm, ServiceError> {
        let existing = self.get(id).await?;
        Ok(ProductForm::edit(&existing, self.max_image_kb()))
    }

    #[instrument(skip(self, submission))]
    pub async fn create(&self, submission: ProductSubmission) -> Result<Model, ServiceError> {
        let valid = submission.validate(true, self.max_image_bytes)?;
        let Some((kind, bytes)) = valid.image else {
            return Err(ServiceError::Storage("validated submission lost its image".into()));
        };

        let path = self.images.store(IMAGE_AREA, kind, &bytes).await?;
        match self.repo.create(valid.fields, path.clone()).await {
            Ok(created) => {
                info!(id = created.id, image = %created.image, "product created");
                Ok(created)
            }
            Err(e) => {
                self.discard(&path).await;
                Err(e)
            }
        }
    }

    #[instrument(skip(self, submission))]
    pub async fn update(&self, id: i32, submission: ProductSubmission) -> Result<Model, ServiceError> {
        let existing = self.get(id).await?;
        let valid = submission.validate(false, self.max_image_bytes)?;

        let replacement = match valid.image {
            Some((kind, bytes)) => Some(self.images.store(IMAGE_AREA, kind, &bytes).await?),
            None => None,
        };

        let updated = match self.repo.update(id, valid.fields, replacement.clone()).await {
            Ok(m) => m,
            Err(e) => {
                if let Some(path) = &replacement {
                    self.discard(path).await;
                }
                return Err(e);
            }
        };

        if replacement.is_some() {
            // The row already references the new file; a failure here only leaves an orphan.
            match self.images.remove(&existing.image).await {
                Ok(true) => debug!(id, old = %existing.image, "previous image removed"),
                Ok(false) => warn!(id, old = %existing.image, "previous image was already missing"),
                Err(e) => warn!(id, old = %existing.image, error = %e, "failed to remove previous image"),
            }
        }
        info!(id, image = %updated.image, replaced_image = replacement.is_some(), "product updated");
        Ok(updated)
    }

    /// Remove the image file, then the row. Returns the row as it was.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<Model, ServiceError> {
        let existing = self.get(id).await?;
        if !self.images.remove(&existing.image).await? {
            warn!(id, image = %existing.image, "image file already missing");
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("product"));
        }
        info!(id, "product deleted");
        Ok(existing)
    }

    /// Best-effort cleanup of a file whose row write failed.
    async fn discard(&self, path: &str) {
        if let Err(e) = self.images.remove(path).await {
            warn!(path, error = %e, "failed to discard staged image");
        }
    }
}

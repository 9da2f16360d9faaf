//! Data-access actions behind the admin forms.
//!
//! Each action validates its input, performs its remote calls, and on success
//! revalidates the routes that display the changed entity.
//!
//! Database and storage are not transactional. The actions order their calls
//! so that a partial failure leaves an orphaned object rather than a row
//! pointing at a missing one:
//!
//! - **create/update**: upload, then write the row. If the row write fails the
//!   fresh upload is removed again. On update the replaced image is removed
//!   only after the row write succeeds.
//! - **delete**: read the row, delete it, then remove its image. Image removal
//!   failures are logged and never reported.
//!
//! Orphans that survive a crash can be found with `pfv-cli storage orphans`.

pub mod gallery;
pub mod products;
pub mod testimonials;
pub mod upload;

use premium_food_core::Record;
use thiserror::Error;

use crate::backend::{BackendError, Caller, Database, ObjectStorage, Repository};
use crate::cache::PageCache;
use crate::forms::ImageInput;
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Errors returned from actions. Both variants display a message fit for
/// the admin's toast.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Input rejected before any remote call.
    #[error("{0}")]
    Validation(String),

    /// Backend call failed; displays the provider's message.
    #[error(transparent)]
    Remote(#[from] BackendError),
}

/// An entity managed from an admin screen.
pub trait Entity: Record {
    /// Admin list route for this entity.
    const ADMIN_PATH: &'static str;
    /// Public routes that display this entity.
    const PUBLIC_PATHS: &'static [&'static str];
    /// Whether a new record must have an image.
    const IMAGE_REQUIRED: bool;
}

/// Everything an action needs: backend handles, the page cache, and the
/// identity the calls are made as.
pub struct ActionContext<'a> {
    pub database: &'a dyn Database,
    pub storage: &'a dyn ObjectStorage,
    pub pages: &'a PageCache,
    pub caller: Caller,
}

impl<'a> ActionContext<'a> {
    /// Context acting as the signed-in admin.
    #[must_use]
    pub fn new(state: &'a AppState, admin: &CurrentAdmin) -> Self {
        Self {
            database: state.database(),
            storage: state.storage(),
            pages: state.pages(),
            caller: admin.caller(),
        }
    }

    fn repository<R: Record>(&self) -> Repository<'_, R> {
        Repository::new(self.database, &self.caller)
    }

    async fn revalidate<E: Entity>(&self) {
        self.pages.revalidate_path(E::ADMIN_PATH).await;
        for path in E::PUBLIC_PATHS {
            self.pages.revalidate_path(path).await;
        }
    }
}

/// Full, unfiltered list for an admin screen, newest first.
///
/// # Errors
///
/// Returns the backend error if the read fails.
pub async fn list<E: Entity>(ctx: &ActionContext<'_>) -> Result<Vec<E>, ActionError> {
    Ok(ctx.repository::<E>().list().await?)
}

/// Image URL chosen for a save, plus the object uploaded for it, if any.
struct ResolvedImage {
    url: Option<String>,
    uploaded: Option<String>,
}

/// Turn the form's image input into the URL to store.
///
/// The requirement check runs before anything is uploaded.
async fn resolve_image<E: Entity>(
    ctx: &ActionContext<'_>,
    image: ImageInput,
    existing: Option<String>,
) -> Result<ResolvedImage, ActionError> {
    match image {
        ImageInput::Upload(file) => {
            let stored = upload::upload_image(ctx.storage, &ctx.caller, E::BUCKET, file).await?;
            Ok(ResolvedImage {
                url: Some(stored.public_url),
                uploaded: Some(stored.path),
            })
        }
        ImageInput::Url(url) => Ok(ResolvedImage {
            url: Some(url),
            uploaded: None,
        }),
        ImageInput::Unchanged if existing.is_none() && E::IMAGE_REQUIRED => {
            Err(ActionError::Validation(format!(
                "Image file is required for new {}s.",
                E::NOUN
            )))
        }
        ImageInput::Unchanged => Ok(ResolvedImage {
            url: existing,
            uploaded: None,
        }),
    }
}

/// Insert a record whose fields are built around the resolved image URL.
async fn create<E, F>(
    ctx: &ActionContext<'_>,
    image: ImageInput,
    build: F,
) -> Result<E, ActionError>
where
    E: Entity,
    F: FnOnce(Option<String>) -> E::Fields + Send,
{
    let image = resolve_image::<E>(ctx, image, None).await?;
    let fields = build(image.url);

    match ctx.repository::<E>().insert(&fields).await {
        Ok(record) => {
            tracing::info!(table = E::TABLE, id = %record.id(), "Created record");
            ctx.revalidate::<E>().await;
            Ok(record)
        }
        Err(e) => {
            if let Some(path) = image.uploaded {
                upload::discard_object(ctx.storage, &ctx.caller, E::BUCKET, &path).await;
            }
            Err(e.into())
        }
    }
}

/// Overwrite a record, keeping its image unless a new one was given.
async fn update<E, F>(
    ctx: &ActionContext<'_>,
    id: E::Id,
    image: ImageInput,
    build: F,
) -> Result<E, ActionError>
where
    E: Entity,
    F: FnOnce(Option<String>) -> E::Fields + Send,
{
    let repository = ctx.repository::<E>();
    let previous = repository.get(id).await?.image_url().map(str::to_owned);
    let image = resolve_image::<E>(ctx, image, previous.clone()).await?;
    let fields = build(image.url.clone());

    let record = match repository.update(id, &fields).await {
        Ok(record) => record,
        Err(e) => {
            if let Some(path) = image.uploaded {
                upload::discard_object(ctx.storage, &ctx.caller, E::BUCKET, &path).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(table = E::TABLE, id = %id, "Updated record");
    if let Some(old) = previous.filter(|old| image.url.as_deref() != Some(old.as_str())) {
        upload::discard_url(ctx.storage, &ctx.caller, E::BUCKET, &old).await;
    }
    ctx.revalidate::<E>().await;
    Ok(record)
}

/// Delete a record and, best-effort, its stored image.
async fn delete<E: Entity>(ctx: &ActionContext<'_>, id: E::Id) -> Result<(), ActionError> {
    let repository = ctx.repository::<E>();
    let record = repository.get(id).await?;
    repository.delete(id).await?;
    tracing::info!(table = E::TABLE, id = %id, "Deleted record");

    if let Some(url) = record.image_url() {
        upload::discard_url(ctx.storage, &ctx.caller, E::BUCKET, url).await;
    }
    ctx.revalidate::<E>().await;
    Ok(())
}

/// Reject the form unless every named field is filled in.
fn require_fields(fields: &[(&str, &str)]) -> Result<(), ActionError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(label, _)| *label)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ActionError::Validation(format!(
            "Please fill in: {}.",
            missing.join(", ")
        )))
    }
}

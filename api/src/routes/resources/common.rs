use axum::{body::Bytes, extract::Multipart};
use db::models::resource::Model as ResourceModel;
use serde::Serialize;
use serde_json::Value;
use services::resource::ResourceForm;
use std::io;
use util::paths::{ensure_parent_dir, resolve_stored, resource_image_relative};

/// Largest accepted image upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Public view of a resource.
#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: i64,
    pub title: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub city: String,
    pub image_url: String,
    pub services: Value,
    pub dynamic_data: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ResourceModel> for ResourceResponse {
    fn from(resource: ResourceModel) -> Self {
        Self {
            image_url: image_url(resource.id),
            id: resource.id,
            title: resource.title,
            address: resource.address,
            phone: resource.phone,
            website: resource.website,
            city: resource.city,
            services: resource.services,
            dynamic_data: resource.dynamic_data,
            created_at: resource.created_at.to_rfc3339(),
            updated_at: resource.updated_at.to_rfc3339(),
        }
    }
}

/// Where clients fetch the image of resource `id`.
pub fn image_url(id: i64) -> String {
    format!("/api/resources/{id}/image")
}

/// A validated image upload.
#[derive(Debug)]
pub struct UploadedImage {
    pub bytes: Bytes,
    pub extension: &'static str,
}

/// Reads the text fields of a resource form and its optional `image` file.
///
/// An `image` part with no content counts as absent. Unknown fields are ignored.
/// Errors are client errors and carry the message to return.
pub async fn read_resource_form(
    mut multipart: Multipart,
) -> Result<(ResourceForm, Option<UploadedImage>), String> {
    let mut form = ResourceForm::default();
    let mut image = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(format!("Invalid multipart body: {e}")),
        };

        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| format!("Invalid multipart body: {e}"))?;

            if bytes.is_empty() {
                continue;
            }
            if bytes.len() > MAX_IMAGE_BYTES {
                return Err("Image too large. Maximum size is 5 MB".into());
            }

            let extension = content_type
                .as_deref()
                .and_then(|ct| {
                    ALLOWED_IMAGE_TYPES
                        .iter()
                        .find(|(mime, _)| *mime == ct)
                        .map(|(_, ext)| *ext)
                })
                .ok_or_else(|| "File type not supported".to_string())?;

            image = Some(UploadedImage { bytes, extension });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| format!("Invalid multipart body: {e}"))?;
        form.set(&name, value);
    }

    Ok((form, image))
}

/// Writes `image` under the storage root and returns its stored relative path.
pub async fn store_image(image: &UploadedImage) -> io::Result<String> {
    let filename = format!("{}.{}", uuid::Uuid::new_v4(), image.extension);
    let relative = resource_image_relative(&filename);
    let path = resolve_stored(&relative);

    ensure_parent_dir(&path)?;
    tokio::fs::write(&path, &image.bytes).await?;

    Ok(relative)
}

/// Deletes a stored image. Failures are logged, not returned.
pub async fn remove_image(relative: &str) {
    if let Err(e) = tokio::fs::remove_file(resolve_stored(relative)).await {
        tracing::warn!(error = %e, path = relative, "failed to remove resource image");
    }
}

//! HTTP client for the `/api/contact` endpoints

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::ClientError;

const USER_AGENT: &str = concat!("contact-manager/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A contact as the client holds it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredContact {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    /// Locally resolved image, set by an edit before the server path is known
    #[serde(skip)]
    pub image_preview: Option<String>,
}

impl StoredContact {
    /// What a view should display: the local preview if any, else the stored path
    pub fn image_source(&self) -> Option<&str> {
        self.image_preview.as_deref().or(self.image.as_deref())
    }
}

/// An image picked locally and not uploaded yet
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedImage {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let content_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        };

        Ok(Self {
            file_name,
            content_type: content_type.to_string(),
            bytes,
        })
    }

    /// `data:` URI usable as an image source without a round trip
    pub fn preview(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Editable form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub facebook: String,
    pub instagram: String,
    pub favorite: bool,
    pub image: Option<SelectedImage>,
}

impl ContactForm {
    fn to_multipart(&self, id: Option<i32>) -> Result<Form, ClientError> {
        let mut form = Form::new()
            .text("name", self.name.clone())
            .text("phone", self.phone.clone())
            .text("email", self.email.clone())
            .text("address", self.address.clone())
            .text("facebook", self.facebook.clone())
            .text("instagram", self.instagram.clone())
            .text("favorite", self.favorite.to_string());

        if let Some(id) = id {
            form = form.text("id", id.to_string());
        }

        if let Some(image) = &self.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }

        Ok(form)
    }
}

#[derive(Deserialize)]
struct ContactList {
    contacts: Vec<StoredContact>,
}

#[derive(Deserialize)]
struct UpdateResult {
    updated: u64,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/api/contact{}", self.base_url, suffix)
    }

    pub async fn list(&self) -> Result<Vec<StoredContact>, ClientError> {
        let response = check(self.http.get(self.url("")).send().await?).await?;
        let list: ContactList = response.json().await?;
        Ok(list.contacts)
    }

    pub async fn create(&self, form: &ContactForm) -> Result<StoredContact, ClientError> {
        let response = self
            .http
            .post(self.url(""))
            .multipart(form.to_multipart(None)?)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Returns the number of rows the server updated
    pub async fn update(&self, id: i32, form: &ContactForm) -> Result<u64, ClientError> {
        let response = self
            .http
            .put(self.url(""))
            .multipart(form.to_multipart(Some(id))?)
            .send()
            .await?;

        let result: UpdateResult = check(response).await?.json().await?;
        Ok(result.updated)
    }

    /// Issue the delete and hand back the raw status without judging it
    pub async fn delete(&self, id: i32) -> Result<reqwest::StatusCode, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/{}", id)))
            .send()
            .await?;

        Ok(response.status())
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<serde_json::Value>().await {
        Ok(body) => body["error"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => status.to_string(),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_data_uri() {
        let image = SelectedImage {
            file_name: "dot.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(image.preview(), "data:image/png;base64,AQID");
    }

    #[test]
    fn image_source_prefers_preview() {
        let mut contact: StoredContact = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "A",
            "phone": "1",
            "email": "a@x.com",
            "address": "Addr",
            "image": "/uploads/1_a.png",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(!contact.favorite);
        assert_eq!(contact.image_source(), Some("/uploads/1_a.png"));

        contact.image_preview = Some("data:image/png;base64,AA==".into());
        assert_eq!(contact.image_source(), Some("data:image/png;base64,AA=="));
    }

    #[tokio::test]
    async fn from_path_guesses_content_type() {
        let path = std::env::temp_dir().join(format!("{}.JPG", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"jpeg").unwrap();

        let image = SelectedImage::from_path(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.bytes, b"jpeg");
        assert!(image.file_name.ends_with(".JPG"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5001/").unwrap();
        assert_eq!(client.url("/4"), "http://localhost:5001/api/contact/4");
    }
}

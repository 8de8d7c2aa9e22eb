//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, which is the concrete implementation
//! of the `CatalogService` port from the `core` crate. It speaks the StudySync
//! REST API using `reqwest` and maps HTTP status classes onto the classified
//! `PortError` taxonomy.

use crate::config::Config;
use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use studysync_client_core::domain::{CourseFields, MediaRef, ModuleFields};
use studysync_client_core::ports::{CatalogService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP adapter that implements the `CatalogService` port.
#[derive(Clone)]
pub struct HttpCatalogAdapter {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpCatalogAdapter {
    /// Creates a new `HttpCatalogAdapter` from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

//=========================================================================================
// "Impure" Wire Format Structs
//=========================================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseRequestDto<'a> {
    title: &'a str,
    description: &'a str,
    price: f64,
    category: &'a str,
    level: &'a str,
    thumbnail: &'a str,
    is_published: bool,
}

impl<'a> CourseRequestDto<'a> {
    fn from_domain(fields: &'a CourseFields, publish: bool) -> Self {
        Self {
            title: &fields.title,
            description: &fields.description,
            price: fields.price,
            category: &fields.category,
            level: &fields.level,
            thumbnail: media_url(&fields.thumbnail),
            is_published: publish,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModuleRequestDto<'a> {
    title: &'a str,
    content: &'a str,
    video_url: &'a str,
    notes_url: &'a str,
}

impl<'a> ModuleRequestDto<'a> {
    fn from_domain(fields: &'a ModuleFields) -> Self {
        Self {
            title: &fields.title,
            content: &fields.content,
            video_url: media_url(&fields.video),
            notes_url: media_url(&fields.notes),
        }
    }
}

// The backend validates URL fields as optional-but-http; it expects an empty
// string rather than null when no media is attached.
fn media_url(media: &Option<MediaRef>) -> &str {
    media.as_ref().map(MediaRef::url).unwrap_or("")
}

#[derive(Deserialize)]
struct CreatedDto {
    id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponseDto {
    file_url: String,
}

#[derive(Deserialize)]
struct CourseSummaryDto {
    id: i64,
}

/// The backend's error envelope; only the human-readable message is consumed.
#[derive(Deserialize)]
struct ApiErrorDto {
    message: Option<String>,
}

//=========================================================================================
// Error Classification
//=========================================================================================

fn classify_status(status: StatusCode, message: String) -> PortError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            PortError::Validation(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized,
        _ => PortError::Transient(message),
    }
}

fn transport(err: reqwest::Error) -> PortError {
    PortError::Transient(err.to_string())
}

/// Turns a non-success response into a classified `PortError`, pulling the
/// message out of the backend's error envelope when one is present.
async fn check(response: reqwest::Response) -> PortResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ApiErrorDto>()
        .await
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| status.to_string());
    Err(classify_status(status, message))
}

//=========================================================================================
// CatalogService Implementation
//=========================================================================================

#[async_trait]
impl CatalogService for HttpCatalogAdapter {
    async fn create_course(&self, fields: &CourseFields, publish: bool) -> PortResult<i64> {
        let response = self
            .request(Method::POST, "/courses")
            .json(&CourseRequestDto::from_domain(fields, publish))
            .send()
            .await
            .map_err(transport)?;
        let created: CreatedDto = check(response).await?.json().await.map_err(transport)?;
        Ok(created.id)
    }

    async fn update_course(
        &self,
        course_id: i64,
        fields: &CourseFields,
        publish: bool,
    ) -> PortResult<()> {
        let response = self
            .request(Method::PUT, &format!("/courses/{}", course_id))
            .json(&CourseRequestDto::from_domain(fields, publish))
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    async fn create_module(&self, course_id: i64, fields: &ModuleFields) -> PortResult<i64> {
        let response = self
            .request(Method::POST, &format!("/courses/{}/modules", course_id))
            .json(&ModuleRequestDto::from_domain(fields))
            .send()
            .await
            .map_err(transport)?;
        let created: CreatedDto = check(response).await?.json().await.map_err(transport)?;
        Ok(created.id)
    }

    async fn update_module(
        &self,
        course_id: i64,
        module_id: i64,
        fields: &ModuleFields,
    ) -> PortResult<()> {
        let response = self
            .request(
                Method::PUT,
                &format!("/courses/{}/modules/{}", course_id, module_id),
            )
            .json(&ModuleRequestDto::from_domain(fields))
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    async fn delete_module(&self, course_id: i64, module_id: i64) -> PortResult<()> {
        let response = self
            .request(
                Method::DELETE,
                &format!("/courses/{}/modules/{}", course_id, module_id),
            )
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    async fn store_file(&self, file_name: &str, bytes: Vec<u8>) -> PortResult<String> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .request(Method::POST, "/files/upload")
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let uploaded: UploadResponseDto =
            check(response).await?.json().await.map_err(transport)?;
        Ok(uploaded.file_url)
    }

    async fn add_to_wishlist(&self, course_id: i64) -> PortResult<()> {
        let response = self
            .request(Method::POST, &format!("/wishlist/{}", course_id))
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    async fn remove_from_wishlist(&self, course_id: i64) -> PortResult<()> {
        let response = self
            .request(Method::DELETE, &format!("/wishlist/{}", course_id))
            .send()
            .await
            .map_err(transport)?;
        check(response).await?;
        Ok(())
    }

    async fn get_wishlist(&self) -> PortResult<Vec<i64>> {
        let response = self
            .request(Method::GET, "/wishlist")
            .send()
            .await
            .map_err(transport)?;
        let courses: Vec<CourseSummaryDto> =
            check(response).await?.json().await.map_err(transport)?;
        Ok(courses.into_iter().map(|course| course.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_statuses_map_to_validation_errors() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::CONFLICT,
            StatusCode::UNPROCESSABLE_ENTITY,
        ] {
            let err = classify_status(status, "title: Title is required".to_string());
            assert!(matches!(err, PortError::Validation(_)), "{status}");
        }
    }

    #[test]
    fn auth_statuses_map_to_unauthorized() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = classify_status(status, "denied".to_string());
            assert!(matches!(err, PortError::Unauthorized), "{status}");
        }
    }

    #[test]
    fn server_errors_map_to_transient() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let err = classify_status(status, "boom".to_string());
            assert!(matches!(err, PortError::Transient(_)), "{status}");
        }
    }

    #[test]
    fn course_request_uses_camel_case_wire_names() {
        let fields = CourseFields {
            title: "Advanced React Patterns".to_string(),
            description: "Hooks and beyond".to_string(),
            price: 49.99,
            category: "Development".to_string(),
            level: "Advanced".to_string(),
            thumbnail: Some(MediaRef::Uploaded("https://cdn/thumb.png".to_string())),
        };
        let value = serde_json::to_value(CourseRequestDto::from_domain(&fields, true)).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Advanced React Patterns",
                "description": "Hooks and beyond",
                "price": 49.99,
                "category": "Development",
                "level": "Advanced",
                "thumbnail": "https://cdn/thumb.png",
                "isPublished": true,
            })
        );
    }

    #[test]
    fn module_request_sends_empty_strings_for_missing_media() {
        let fields = ModuleFields {
            title: "Intro".to_string(),
            content: "Welcome".to_string(),
            video: None,
            notes: None,
        };
        let value = serde_json::to_value(ModuleRequestDto::from_domain(&fields)).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Intro",
                "content": "Welcome",
                "videoUrl": "",
                "notesUrl": "",
            })
        );
    }
}

// src/api/client.rs
//! Pure HTTP client wrapper for the Notion API.
//!
//! A thin layer over reqwest that handles authentication headers and
//! request/response plumbing, with no parsing or business logic.

use crate::error::AppError;
use crate::types::ApiKey;
use reqwest::{header, Client, Response};
use serde::Serialize;

const NOTION_VERSION: &str = "2022-06-28";
const API_BASE_URL: &str = "https://api.notion.com/v1";

/// A thin wrapper around a reqwest `Client` for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self { client })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", API_BASE_URL, endpoint);
        log::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        Ok(response)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with status and URL metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

/// Backend access for the recipe manager
///
/// Every controller talks to the REST backend through one [`ApiClient`]. The
/// client only knows how to frame requests and decode JSON; the actual I/O
/// goes through a [`Transport`], so tests can swap the network for an
/// in-memory backend.
///
/// # Architecture
///
/// - `client` - `ApiClient`, request/response types and `ApiError`
/// - `http` - `HttpTransport`, the reqwest-backed transport
///
/// # Usage
///
/// ```rust,no_run
/// use recipe_manager::api::{ApiClient, HttpTransport};
/// use recipe_manager::types::Recipe;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), recipe_manager::api::ApiError> {
/// let api = ApiClient::new(Arc::new(HttpTransport::new()), "http://localhost:5000");
/// let recipes: Vec<Recipe> = api.get("/api/recipes").await?;
/// # Ok(())
/// # }
/// ```
mod client;
mod http;

pub use client::{
    ApiClient, ApiError, ApiRequest, ApiResponse, ApiResult, Download, Method, RequestOptions,
    Transport, filename_from_disposition, with_query,
};
pub use http::HttpTransport;

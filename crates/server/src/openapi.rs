use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaTypeDoc { Image, Video }

/// Listing fields accepted on create/update. None are enforced server-side;
/// on update only the supplied keys change.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInputDoc {
    pub title: String,
    pub category: String,
    pub display_category: Option<String>,
    pub description: String,
    pub duration: Option<String>,
    pub original_price: f64,
    pub discounted_price: f64,
    pub professionals: Option<Vec<String>>,
    pub includes: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    pub image: Option<String>,
    pub media_type: Option<MediaTypeDoc>,
    pub rating: Option<f64>,
    pub reviews: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(Serialize, ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::services::list_services,
        crate::routes::services::list_by_display_category,
        crate::routes::services::get_service,
        crate::routes::services::create_service,
        crate::routes::services::update_service,
        crate::routes::services::delete_service,
    ),
    components(
        schemas(
            HealthResponse,
            MediaTypeDoc,
            ServiceInputDoc,
            MessageDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "services")
    )
)]
pub struct ApiDoc;

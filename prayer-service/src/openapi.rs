use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use common::models::{CurrentTime, GeocodeResult, PrayerDataResult};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::geocode,
        handlers::prayer_times,
        handlers::prayer_data,
    ),
    components(schemas(
        GeocodeResult,
        PrayerDataResult,
        CurrentTime,
    )),
    tags(
        (name = "geocode", description = "City geocoding"),
        (name = "prayer-times", description = "Islamic prayer times with caching"),
    ),
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

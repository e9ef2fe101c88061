use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Examples API",
        version = "0.1.0",
        description = "CRUD API for example records backed by PostgreSQL"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/examples", api = domain_examples::ApiDoc)
    )
)]
pub struct ApiDoc;

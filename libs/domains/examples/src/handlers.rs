use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppJson, AppQuery, IdPath,
    errors::handlers::method_not_allowed,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ExampleResult;
use crate::models::{Example, ExampleRequest, ExampleResponse, ListQuery, MessageResponse};
use crate::repository::ExampleRepository;
use crate::service::ExampleService;

pub const TAG: &str = "examples";

/// OpenAPI documentation for the Examples API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_examples,
        create_example,
        get_example,
        update_example,
        delete_example,
    ),
    components(
        schemas(Example, ExampleRequest, ExampleResponse, MessageResponse),
        responses(BadRequestResponse, NotFoundResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Example record management")
    )
)]
pub struct ApiDoc;

/// Create the examples router. Paths are relative to where it is nested.
pub fn router<R: ExampleRepository + 'static>(service: ExampleService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_examples).post(create_example))
        .route(
            "/{id}",
            get(get_example).put(update_example).delete(delete_example),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(shared_service)
}

/// List examples by ascending id
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "A page of examples", body = ExampleResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_examples<R: ExampleRepository>(
    State(service): State<Arc<ExampleService<R>>>,
    AppQuery(query): AppQuery<ListQuery>,
) -> ExampleResult<Json<ExampleResponse>> {
    let data = service.get_all_examples(query.limit, query.offset).await?;
    Ok(Json(ExampleResponse { data }))
}

/// Create a new example
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = ExampleRequest,
    responses(
        (status = 201, description = "Example created", body = Example),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_example<R: ExampleRepository>(
    State(service): State<Arc<ExampleService<R>>>,
    AppJson(input): AppJson<ExampleRequest>,
) -> ExampleResult<impl IntoResponse> {
    let example = service.create_example(input).await?;
    Ok((StatusCode::CREATED, Json(example)))
}

/// Get an example by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Example ID")
    ),
    responses(
        (status = 200, description = "Example found", body = Example),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_example<R: ExampleRepository>(
    State(service): State<Arc<ExampleService<R>>>,
    IdPath(id): IdPath,
) -> ExampleResult<Json<Example>> {
    let example = service.get_example_by_id(id).await?;
    Ok(Json(example))
}

/// Replace every mutable field of an example
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Example ID")
    ),
    request_body = ExampleRequest,
    responses(
        (status = 200, description = "Example updated", body = Example),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_example<R: ExampleRepository>(
    State(service): State<Arc<ExampleService<R>>>,
    IdPath(id): IdPath,
    AppJson(input): AppJson<ExampleRequest>,
) -> ExampleResult<Json<Example>> {
    let example = service.update_example(id, input).await?;
    Ok(Json(example))
}

/// Delete an example
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Example ID")
    ),
    responses(
        (status = 200, description = "Example deleted", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_example<R: ExampleRepository>(
    State(service): State<Arc<ExampleService<R>>>,
    IdPath(id): IdPath,
) -> ExampleResult<Json<MessageResponse>> {
    service.delete_example(id).await?;
    Ok(Json(MessageResponse::new("Example deleted successfully")))
}

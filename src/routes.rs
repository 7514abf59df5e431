use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use serde::{Deserialize, Serialize};

use crate::create_timestamp;
use crate::engine::Executor;

#[derive(Serialize, Deserialize, Debug)]
pub struct ExecuteRequest {
    pub language: String,
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ExecuteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub languages: Vec<String>,
    pub timestamp: String,
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ExecuteResponse {
        output: None,
        error: Some("Invalid JSON request".to_string()),
    });
    InternalError::from_response(err, response).into()
}

#[post("/execute")]
pub async fn post_execute_handler(
    executor: web::Data<Executor>,
    body: web::Json<ExecuteRequest>,
) -> impl Responder {
    let ExecuteRequest { language, code } = body.into_inner();

    if language.is_empty() || code.is_empty() {
        return HttpResponse::BadRequest().json(ExecuteResponse {
            output: None,
            error: Some("Language and code are required".to_string()),
        });
    }

    match executor.execute(&language, &code).await {
        Ok(output) => HttpResponse::Ok().json(ExecuteResponse {
            output: Some(output),
            error: None,
        }),
        Err(e) => {
            log::info!("execution of {language} submission failed: {e}");
            HttpResponse::UnprocessableEntity().json(ExecuteResponse {
                output: e.captured_output(),
                error: Some(e.to_string()),
            })
        }
    }
}

#[get("/health")]
pub async fn get_health_handler(executor: web::Data<Executor>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        languages: executor
            .languages()
            .into_iter()
            .map(str::to_string)
            .collect(),
        timestamp: create_timestamp(),
    })
}

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use ragx_core::DEFAULT_TOP_K;
use serde::Deserialize;
use std::sync::Arc;

use crate::AnswerService;

const INDEX_PAGE: &str = include_str!("../static/index.html");

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    top_k: Option<usize>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(service: Arc<AnswerService>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(service.clone()))
                .configure(routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register the front end routes. Expects `web::Data<Arc<AnswerService>>`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_page))
        .route("/health", web::get().to(health))
        .route("/api/ask", web::post().to(ask))
        .route("/api/search", web::post().to(search));
}

async fn index_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_PAGE)
}

async fn health(service: web::Data<Arc<AnswerService>>) -> ActixResult<HttpResponse> {
    let store = service.store();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "documents": store.len(),
        "dimension": store.dim(),
        "distance": format!("{:?}", store.distance()),
        "model": service.config().model,
    })))
}

async fn ask(
    service: web::Data<Arc<AnswerService>>,
    req: web::Json<AskRequest>,
) -> ActixResult<HttpResponse> {
    if req.question.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Question must not be empty"
        })));
    }

    let answer = service.answer(&req.question).await;
    Ok(HttpResponse::Ok().json(answer))
}

async fn search(
    service: web::Data<Arc<AnswerService>>,
    req: web::Json<SearchRequest>,
) -> ActixResult<HttpResponse> {
    let top_k = req.top_k.unwrap_or(DEFAULT_TOP_K);
    match service.store().search_scored(&req.query, top_k) {
        Ok(hits) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": hits
        }))),
        Err(e) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        }))),
    }
}

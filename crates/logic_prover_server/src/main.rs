use actix_web::{middleware, web, App, HttpResponse, HttpServer, Responder};
use log::info;
use serde::Deserialize;

mod prover;

const DEFAULT_ADDR: &str = "127.0.0.1:7000";

#[derive(Deserialize)]
struct SolveForm {
    premises: String,
    conclusion: String,
    params: Option<String>,
}

#[derive(Deserialize)]
struct ValidateForm {
    premises: String,
    conclusion: String,
    proof: String,
}

async fn index() -> impl Responder {
    HttpResponse::Ok().body(
        "Logic Prover API Server

Available endpoints:
prover",
    )
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let addr = std::env::var("LOGIC_PROVER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    info!("Listening on {}", addr);

    HttpServer::new(|| {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(middleware::DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")))
            .route("/", web::get().to(index))
            .route("/prover", web::get().to(prover::prover))
            .route("/prover/solve", web::post().to(prover::solve))
            .route("/prover/validate", web::post().to(prover::validate))
    })
    .bind(addr)?
    .run()
    .await
}

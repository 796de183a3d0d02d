use std::io;
use std::path::PathBuf;

use actix_web::{App, HttpResponse, HttpServer, Responder, delete, get, put, web};
use clap::Parser;
use serde::Deserialize;
use tracing::{error, info};

use markov_store_core::{DocumentStore, MarkovModel, MarkovResult, MemoryStore};

mod config;

use config::ServerConfig;

/// Default number of generations / words returned by the least-common endpoints.
const DEFAULT_LIMIT: usize = 1;

/// Largest `limit` accepted by the least-common endpoints.
const MAX_LIMIT: usize = 100;

/// Query parameters of the text insertion / deletion endpoints.
#[derive(Deserialize)]
struct TextParams {
	tag: Option<String>,
}

/// Query parameters of the generation endpoints.
#[derive(Deserialize)]
struct GenerateParams {
	start: Option<String>,
	end: Option<String>,
	mid: Option<String>,
	tag: Option<String>,
}

/// Query parameters of the least-common endpoints.
#[derive(Deserialize)]
struct LeastCommonParams {
	text: Option<String>,
	limit: Option<usize>,
	tag: Option<String>,
}

impl LeastCommonParams {
	/// Requested limit, `DEFAULT_LIMIT` when unset.
	///
	/// # Errors
	/// Returns an error if the limit exceeds `MAX_LIMIT`.
	fn limit(&self) -> Result<usize, String> {
		match self.limit.unwrap_or(DEFAULT_LIMIT) {
			limit if limit > MAX_LIMIT => Err(format!("Limit must be <= {MAX_LIMIT}")),
			limit => Ok(limit),
		}
	}
}

struct SharedData {
	model: MarkovModel<MemoryStore>,
	snapshot: Option<PathBuf>,
}

impl SharedData {
	/// Builds the model, restoring the snapshot when one is configured.
	fn from_config(config: &ServerConfig) -> MarkovResult<Self> {
		let store = match &config.snapshot {
			Some(path) => MemoryStore::open(path)?,
			None => MemoryStore::new(),
		};
		Ok(Self {
			model: MarkovModel::with_config(store, config.markov_config()?),
			snapshot: config.snapshot.clone(),
		})
	}
}

/// Empty query values mean "not set".
fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|s| !s.is_empty())
}

/// Maps a generation result to a response: 200 with the text, 404 when
/// nothing matched.
fn generated(result: MarkovResult<Option<String>>) -> HttpResponse {
	match result {
		Ok(Some(text)) => HttpResponse::Ok().body(text),
		Ok(None) => HttpResponse::NotFound().body("No matching triple"),
		Err(e) => {
			error!("Generation failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP PUT endpoint `/v1/text`
///
/// Inserts the request body, optionally under `tag`.
#[put("/v1/text")]
async fn put_text(data: web::Data<SharedData>, query: web::Query<TextParams>, body: String) -> impl Responder {
	match data.model.insert_text(&body, non_empty(&query.tag)) {
		Ok(count) => HttpResponse::Ok().body(format!("{count} triples inserted")),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP DELETE endpoint `/v1/text`
///
/// Removes the request body, optionally under `tag`.
#[delete("/v1/text")]
async fn delete_text(data: web::Data<SharedData>, query: web::Query<TextParams>, body: String) -> impl Responder {
	match data.model.delete_text(&body, non_empty(&query.tag)) {
		Ok(count) => HttpResponse::Ok().body(format!("{count} triples deleted")),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a text starting with `start` (start of text by default).
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let start = query.start.as_deref().unwrap_or("");
	generated(data.model.generate_forwards(start, non_empty(&query.tag), &mut rand::rng()))
}

/// HTTP GET endpoint `/v1/generate/backwards`
///
/// Generates a text ending with `end` (end of text by default).
#[get("/v1/generate/backwards")]
async fn get_generated_backwards(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let end = query.end.as_deref().unwrap_or("");
	generated(data.model.generate_backwards(end, non_empty(&query.tag), &mut rand::rng()))
}

/// HTTP GET endpoint `/v1/generate/mid`
///
/// Generates a text around the word `mid`.
#[get("/v1/generate/mid")]
async fn get_generated_mid(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let mid = match non_empty(&query.mid) {
		Some(mid) => mid,
		None => return HttpResponse::BadRequest().body("Missing or empty mid word"),
	};
	generated(data.model.generate_from_mid(mid, non_empty(&query.tag), &mut rand::rng()))
}

/// HTTP GET endpoint `/v1/least_common`
///
/// Returns the rarest words of `text`, one per line.
#[get("/v1/least_common")]
async fn get_least_common(data: web::Data<SharedData>, query: web::Query<LeastCommonParams>) -> impl Responder {
	let text = query.text.as_deref().unwrap_or("");
	let limit = match query.limit() {
		Ok(limit) => limit,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};
	match data.model.least_common_words(text, limit) {
		Ok(words) => HttpResponse::Ok().body(words.join("\n")),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/generate/least_common`
///
/// Generates up to `limit` texts seeded by the rarest words of `text`,
/// one per line.
#[get("/v1/generate/least_common")]
async fn get_generated_least_common(data: web::Data<SharedData>, query: web::Query<LeastCommonParams>) -> impl Responder {
	let text = query.text.as_deref().unwrap_or("");
	let limit = match query.limit() {
		Ok(limit) => limit,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};
	let mut rng = rand::rng();

	let generations = match data.model.generate_multiple_from_least_common(text, limit, non_empty(&query.tag), &mut rng) {
		Ok(generations) => generations,
		Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
	};

	match generations.collect::<MarkovResult<Vec<String>>>() {
		Ok(texts) => HttpResponse::Ok().body(texts.join("\n")),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<SharedData>) -> impl Responder {
	match data.model.store().stats() {
		Ok(stats) => HttpResponse::Ok().body(format!("words: {}\ntriples: {}", stats.words, stats.triples)),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP PUT endpoint `/v1/save`
///
/// Writes the store to the configured snapshot file.
#[put("/v1/save")]
async fn put_save(data: web::Data<SharedData>) -> impl Responder {
	let Some(path) = &data.snapshot else {
		return HttpResponse::BadRequest().body("No snapshot file configured");
	};
	match data.model.store().save(path) {
		Ok(()) => HttpResponse::Ok().body("Snapshot saved"),
		Err(e) => {
			error!("Snapshot failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(put_text)
		.service(delete_text)
		.service(get_generated_backwards)
		.service(get_generated_mid)
		.service(get_generated_least_common)
		.service(get_generated)
		.service(get_least_common)
		.service(get_stats)
		.service(put_save);
}

/// Main entry point for the server.
///
/// Builds the model (restoring the snapshot if configured) and starts an
/// Actix-web HTTP server. The store is internally synchronized, so the
/// model is shared without an extra lock.
#[actix_web::main]
async fn main() -> io::Result<()> {
	tracing_subscriber::fmt::init();

	let config = ServerConfig::parse();
	let shared_data = SharedData::from_config(&config).map_err(|e| {
		error!("Failed to initialize the model: {e}");
		io::Error::other(e.to_string())
	})?;
	let shared_data = web::Data::new(shared_data);

	info!("Listening on {}:{}", config.host, config.port);
	HttpServer::new(move || App::new().app_data(shared_data.clone()).configure(routes))
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use actix_web::http::StatusCode;
	use actix_web::test;
	use markov_store_core::Triple;

	use super::*;

	fn shared() -> web::Data<SharedData> {
		web::Data::new(SharedData { model: MarkovModel::new(MemoryStore::new()), snapshot: None })
	}

	#[actix_web::test]
	async fn insert_generate_delete() {
		let app = test::init_service(App::new().app_data(shared()).configure(routes)).await;

		let req = test::TestRequest::put().uri("/v1/text?tag=greeting").set_payload("hi there").to_request();
		assert!(test::call_service(&app, req).await.status().is_success());

		let req = test::TestRequest::get().uri("/v1/generate?tag=greeting").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "hi there");

		let req = test::TestRequest::get().uri("/v1/generate/backwards?end=there").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "hi there");

		let req = test::TestRequest::get().uri("/v1/generate/mid?mid=there").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "hi there");

		let req = test::TestRequest::delete().uri("/v1/text?tag=greeting").set_payload("hi there").to_request();
		assert!(test::call_service(&app, req).await.status().is_success());

		let req = test::TestRequest::get().uri("/v1/generate").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
	}

	#[actix_web::test]
	async fn least_common_endpoints() {
		let data = shared();
		data.model.insert_text("the cat", None).unwrap();
		data.model.insert_text("the dog", None).unwrap();
		let app = test::init_service(App::new().app_data(data).configure(routes)).await;

		let req = test::TestRequest::get().uri("/v1/least_common?text=the%20cat&limit=2").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "cat\nthe");

		let req = test::TestRequest::get().uri("/v1/generate/least_common?text=cat&limit=1").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "the cat");

		let req = test::TestRequest::get().uri("/v1/stats").to_request();
		assert_eq!(test::call_and_read_body(&app, req).await, "words: 3\ntriples: 4");
	}

	#[actix_web::test]
	async fn bad_requests() {
		let app = test::init_service(App::new().app_data(shared()).configure(routes)).await;

		let req = test::TestRequest::get().uri("/v1/generate/mid").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::put().uri("/v1/save").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn least_common_limit_is_capped() {
		let app = test::init_service(App::new().app_data(shared()).configure(routes)).await;

		let req = test::TestRequest::get().uri("/v1/generate/least_common?limit=1000000").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		let req = test::TestRequest::get().uri("/v1/least_common?text=a&limit=101").to_request();
		assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

		// Within the cap an empty store simply yields nothing
		let uri = format!("/v1/generate/least_common?limit={MAX_LIMIT}");
		let req = test::TestRequest::get().uri(&uri).to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);
		assert_eq!(test::read_body(resp).await, "");
	}

	#[actix_web::test]
	async fn text_endpoints_only_read_the_tag() {
		let data = shared();
		let app = test::init_service(App::new().app_data(data.clone()).configure(routes)).await;

		let req = test::TestRequest::put().uri("/v1/text?tag=t&start=ignored").set_payload("red fox").to_request();
		assert!(test::call_service(&app, req).await.status().is_success());

		let stored = data.model.store().get_triple(&Triple::new("red", " ", "fox", "", "")).unwrap().unwrap();
		assert_eq!(stored.tag_count("t"), Some(1));
	}
}

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type HitCounter = Arc<Mutex<HashMap<String, usize>>>;

/// A local server answering every method, counting requests per path
pub struct TestServer {
    pub base_url: String,
    hits: HitCounter,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits
            .lock()
            .expect("hit counter poisoned")
            .get(path)
            .copied()
            .unwrap_or(0)
    }
}

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Widget Shop</title>
  <meta name="description" content="Widgets for everyone">
</head>
<body>
  <h1>Widgets</h1>
  <h2>Blue widgets</h2>
  <p>Widgets widgets gadgets.</p>
  <a href="/ok">ok</a>
  <a href="/not-found">missing</a>
  <a href="/ok">ok again</a>
  <a href="http://127.0.0.1:1/unreachable">down</a>
  <img src="/widget.png" alt="widget photo">
</body>
</html>"#;

const ABOUT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>About</title></head>
<body>
  <h1>About us</h1>
  <a href="/ok">home</a>
</body>
</html>"#;

#[allow(dead_code)]
pub async fn start_test_server() -> TestServer {
    let hits: HitCounter = Arc::default();
    let data = web::Data::new(hits.clone());

    let http_server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .default_service(web::to(handle))
    })
    .workers(2)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let base_url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    TestServer { base_url, hits }
}

async fn handle(req: HttpRequest, hits: web::Data<HitCounter>) -> HttpResponse {
    let path = req.path().to_string();
    *hits
        .lock()
        .expect("hit counter poisoned")
        .entry(path.clone())
        .or_insert(0) += 1;

    match path.as_str() {
        "/not-found" => HttpResponse::NotFound().body("Not Found"),
        "/server-error" => HttpResponse::InternalServerError().body("Error"),
        "/redirect" => HttpResponse::Found()
            .append_header(("Location", "/ok"))
            .finish(),
        "/slow" => {
            actix_web::rt::time::sleep(Duration::from_secs(3)).await;
            HttpResponse::Ok().body("finally")
        }
        "/pages/home.html" => html(HOME_PAGE),
        "/pages/about.html" => html(ABOUT_PAGE),
        p if p.starts_with("/pages/") => HttpResponse::NotFound().body("No such page"),
        _ => HttpResponse::Ok().body("OK"),
    }
}

fn html(body: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

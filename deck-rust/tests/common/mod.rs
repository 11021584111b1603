#![allow(dead_code)]

use axum::{body::Bytes, extract::State, http::StatusCode, http::Uri, Json, Router};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::{net::TcpListener, sync::oneshot};

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Default)]
struct Routes {
    responses: HashMap<String, (StatusCode, Value)>,
    bodies: Vec<(String, Value)>,
}

/// A provider endpoint on a random local port answering each path with a
/// fixed JSON response.
pub struct ProviderStub {
    url: String,
    routes: Arc<Mutex<Routes>>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

fn lock(routes: &Mutex<Routes>) -> MutexGuard<'_, Routes> {
    routes.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ProviderStub {
    pub async fn start() -> Result<Self, BoxedError> {
        let routes = Arc::new(Mutex::new(Routes::default()));
        let app = Router::new()
            .fallback(answer)
            .with_state(routes.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}", listener.local_addr()?);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(err) = server.await {
                eprintln!("provider stub error: {err}");
            }
        });

        Ok(Self {
            url,
            routes,
            shutdown: Some(shutdown_tx),
            handle,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn respond(&self, path: &str, status: StatusCode, body: Value) -> &Self {
        lock(&self.routes)
            .responses
            .insert(path.to_string(), (status, body));
        self
    }

    /// JSON bodies received on `path`, in arrival order.
    pub fn bodies(&self, path: &str) -> Vec<Value> {
        lock(&self.routes)
            .bodies
            .iter()
            .filter(|(received, _)| received == path)
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub async fn stop(self) -> Result<(), BoxedError> {
        if let Some(tx) = self.shutdown {
            let _ = tx.send(());
        }
        self.handle
            .await
            .map_err(|err| format!("Failed to join provider stub: {err}"))?;
        Ok(())
    }
}

async fn answer(
    State(routes): State<Arc<Mutex<Routes>>>,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let path = uri.path().to_string();
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let mut routes = lock(&routes);
    routes.bodies.push((path.clone(), body));
    let (status, body) = routes.responses.get(&path).cloned().unwrap_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            json!({ "error": format!("no stubbed response for {path}") }),
        )
    });
    (status, Json(body))
}

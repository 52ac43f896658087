//! Servidor web Axum que expone el núcleo de decisión como endpoints JSON.
//!
//! Los handlers no contienen lógica: deserializan, llaman una función del
//! núcleo y serializan el resultado. Los motores se construyen una sola vez
//! al arrancar y se comparten entre peticiones.

use anexos_core::{
    normalize, DocumentClassifier, InvoiceExamClassifier, NormalizeMode, PersonVerifier,
};
use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Estado compartido de la aplicación
struct AppState {
    clasificador: DocumentClassifier,
    facturas: InvoiceExamClassifier,
    verificador: PersonVerifier,
}

#[derive(Deserialize)]
struct TextoRequest {
    texto: String,
}

#[derive(Deserialize)]
struct VerificarPersonaRequest {
    nombre: String,
    documento: String,
    texto_evaluar: String,
}

#[derive(Serialize)]
struct LimpiarTextoResponse {
    texto_limpio: String,
    longitud: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let state = Arc::new(AppState {
        clasificador: DocumentClassifier::new(),
        facturas: InvoiceExamClassifier::new(),
        verificador: PersonVerifier::new(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/clasificar-documento", post(clasificar_documento_handler))
        .route("/clasificar-factura", post(clasificar_factura_handler))
        .route("/verificar-persona", post(verificar_persona_handler))
        .route("/limpiar-texto", post(limpiar_texto_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Servicio de anexos escuchando en http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}

/// Sonda de vida del servicio
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Clasifica el texto OCR de un documento
async fn clasificar_documento_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextoRequest>,
) -> impl IntoResponse {
    let resultado = state.clasificador.classify(&req.texto);
    info!(
        "documento clasificado como {} ({} caracteres de entrada)",
        resultado.clasificacion.label(),
        req.texto.chars().count()
    );
    Json(resultado)
}

/// Determina si una factura incluye exámenes
async fn clasificar_factura_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextoRequest>,
) -> impl IntoResponse {
    let resultado = state.facturas.classify_invoice(&req.texto);
    info!(
        "factura clasificada: examenesFacturados={} via {}",
        resultado.examenes_facturados.code(),
        resultado.decision_source.label()
    );
    Json(resultado)
}

/// Verifica que el texto evaluado corresponda a la persona declarada
async fn verificar_persona_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerificarPersonaRequest>,
) -> impl IntoResponse {
    let resultado = state
        .verificador
        .verify(&req.nombre, &req.documento, &req.texto_evaluar);
    info!("persona verificada: score={}", resultado.score);
    Json(resultado)
}

/// Limpia un texto con el modo permisivo del normalizador
async fn limpiar_texto_handler(Json(req): Json<TextoRequest>) -> impl IntoResponse {
    let texto_limpio = normalize(&req.texto, NormalizeMode::Lenient).into_inner();
    let longitud = texto_limpio.chars().count();
    Json(LimpiarTextoResponse {
        texto_limpio,
        longitud,
    })
}

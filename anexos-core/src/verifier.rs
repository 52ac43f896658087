//! # Verificador de Personas — Puntaje Nombre + Documento
//!
//! Decide si el texto de un anexo pertenece a la persona que el radicador
//! dice. No responde sí o no: responde un puntaje 0-100 con su evidencia,
//! y el consumidor aplica su umbral (60 en el flujo de radicación).
//!
//! ## Esquema de Puntaje
//!
//! - **Nombre (0 a 80)**: los 80 puntos se reparten en partes iguales entre
//!   los tokens útiles del nombre (sin partículas como "de" o "la", sin
//!   tokens de un solo carácter). Cada token suma su fracción únicamente con
//!   coincidencia exacta de palabra; la suma se redondea una sola vez, al
//!   final.
//! - **Documento (0, 15 o 20)**: 20 puntos si el número completo aparece en
//!   el texto (comparando solo dígitos contra solo dígitos), 15 si no
//!   aparece completo pero sí sus primeros 6 dígitos.
//! - **Penalización (0 o -20)**: -20 cuando el documento no aportó puntos.
//!   Un nombre perfecto sin documento queda en 60, justo en el umbral y
//!   nunca encima.
//!
//! La comparación usa el modo estricto del [normalizador](crate::normalizer):
//! "José" y "JOSE" son la misma palabra. No hay tolerancia difusa en el
//! puntaje: [`fuzzy_ratio`] existe como primitiva para una futura tolerancia
//! a errores de OCR, pero el cotejo vigente exige igualdad exacta.
//!
//! ## Ejemplo de Uso
//!
//! ```rust
//! use anexos_core::verifier::PersonVerifier;
//!
//! let verificador = PersonVerifier::new();
//! let r = verificador.verify(
//!     "Juan Pérez",
//!     "123.456.789",
//!     "paciente JUAN PEREZ, cc 123456789",
//! );
//! assert_eq!(r.score, 100);
//! assert_eq!(r.componentes.nombre, 80);
//! assert_eq!(r.componentes.documento, 20);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::normalizer::{normalize, NormalizeMode};
use crate::tables;

/// Deja únicamente los dígitos ASCII de la cadena.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Tokeniza un texto en palabras `[a-z0-9]+`, aplicando antes la
/// normalización estricta. Conserva duplicados y el orden de aparición.
pub fn tokenize_words(s: &str) -> Vec<String> {
    normalize(s, NormalizeMode::Strict)
        .as_str()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Similaridad difusa entre dos cadenas, de 0.0 a 1.0. Primitiva reservada
/// para tolerar errores leves de OCR; el puntaje de nombre vigente exige
/// coincidencia exacta y no la consulta.
pub fn fuzzy_ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Tipo de coincidencia de documento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Apareció el número completo.
    Full,
    /// Aparecieron los primeros seis dígitos.
    First6,
}

/// Resultado del cotejo del número de documento contra el texto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMatch {
    /// Puntos obtenidos: 20, 15 o 0.
    pub puntos: i32,
    /// Tipo de coincidencia; `None` si el número no apareció.
    pub coincidencia: Option<MatchKind>,
    /// Fragmento numérico encontrado (el número completo o sus primeros 6
    /// dígitos).
    pub numero_encontrado: Option<String>,
    /// Posición donde inicia la coincidencia, como índice dentro de la
    /// secuencia de dígitos del texto.
    pub pos: Vec<usize>,
}

impl DocumentMatch {
    fn sin_coincidencia() -> Self {
        DocumentMatch {
            puntos: 0,
            coincidencia: None,
            numero_encontrado: None,
            pos: Vec::new(),
        }
    }
}

/// Coteja el número de documento contra el texto evaluado.
///
/// Ambos lados se reducen a solo dígitos antes de buscar:
/// - 20 puntos si aparece el número completo;
/// - 15 puntos si no aparece completo pero sí sus primeros 6 dígitos (solo
///   cuando el documento tiene al menos 6);
/// - 0 puntos en cualquier otro caso, incluido un documento sin dígitos.
///
/// La coincidencia completa se evalúa primero aunque el fragmento de 6
/// aparezca antes en el texto. La penalización por documento ausente no se
/// aplica aquí sino en [`PersonVerifier::verify`].
pub fn score_document(documento: &str, texto: &str) -> DocumentMatch {
    let objetivo = digits_only(documento);
    let digitos_texto = digits_only(texto);

    if objetivo.is_empty() {
        return DocumentMatch::sin_coincidencia();
    }

    if let Some(i) = digitos_texto.find(&objetivo) {
        return DocumentMatch {
            puntos: 20,
            coincidencia: Some(MatchKind::Full),
            numero_encontrado: Some(objetivo),
            pos: vec![i],
        };
    }

    if objetivo.len() >= 6 {
        let primeros6 = &objetivo[..6];
        if let Some(j) = digitos_texto.find(primeros6) {
            return DocumentMatch {
                puntos: 15,
                coincidencia: Some(MatchKind::First6),
                numero_encontrado: Some(primeros6.to_string()),
                pos: vec![j],
            };
        }
    }

    DocumentMatch::sin_coincidencia()
}

/// Penalización por documento ausente: -20 si el cotejo de documento quedó
/// en cero, 0 en cualquier otro caso.
pub fn document_penalty(doc_match: &DocumentMatch) -> i32 {
    if doc_match.puntos == 0 {
        -20
    } else {
        0
    }
}

/// Resolución de un token del nombre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Coincidencia exacta de palabra.
    Exacto,
    /// El token no aparece en el texto.
    NoEncontrado,
}

/// Detalle del cotejo de un token del nombre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenDetail {
    /// Token del nombre que se buscó.
    pub token: String,
    /// Palabra del texto con la que coincidió; `None` si no se encontró.
    #[serde(rename = "match")]
    pub coincidencia: Option<String>,
    /// Cómo se resolvió el token.
    pub tipo: MatchType,
}

/// Resultado del cotejo del nombre contra el texto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameMatch {
    /// Puntos obtenidos: 0 a 80.
    pub puntos: i32,
    /// Tokens del nombre que aparecieron en el texto.
    pub tokens_encontrados: Vec<String>,
    /// Tokens del nombre que no aparecieron.
    pub tokens_fallidos: Vec<String>,
    /// Detalle token por token, en el orden del nombre.
    pub detalles: Vec<TokenDetail>,
}

/// Desglose de los componentes del puntaje.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreComponents {
    /// Puntos por documento: 0, 15 o 20.
    pub documento: i32,
    /// Puntos por nombre: 0 a 80.
    pub nombre: i32,
    /// Penalización por documento ausente: -20 o 0.
    pub penalizacion_documento: i32,
}

/// Resultado completo de la verificación de una persona.
///
/// Además del puntaje final expone el desglose y la evidencia de cada
/// componente, para que quien consuma el servicio audite la decisión sin
/// re-ejecutarla. `tokens_encontrados` y `documento_encontrado` repiten en
/// el nivel superior lo que ya está en la evidencia, porque son los dos
/// campos que el flujo de radicación lee siempre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonScore {
    /// Puntaje final, siempre entre 0 y 100.
    pub score: i32,
    /// Desglose por componente, antes del recorte al rango.
    pub componentes: ScoreComponents,
    /// Evidencia del cotejo de documento.
    pub doc_match: DocumentMatch,
    /// Evidencia del cotejo de nombre.
    pub nombre_match: NameMatch,
    /// Tokens del nombre encontrados en el texto.
    pub tokens_encontrados: Vec<String>,
    /// Número (o fragmento) de documento encontrado, si alguno.
    pub documento_encontrado: Option<String>,
}

/// Motor de verificación de personas.
///
/// La verificación es pura y no guarda estado entre llamadas; el motor
/// existe como tipo para fijar su configuración (las partículas excluidas
/// del nombre) en la construcción.
#[derive(Debug, Clone)]
pub struct PersonVerifier {
    stopwords: &'static [&'static str],
}

impl PersonVerifier {
    /// Crea el verificador con las partículas de producción.
    pub fn new() -> Self {
        Self {
            stopwords: tables::STOPWORDS_NOMBRE,
        }
    }

    /// Verificador con partículas propias, para otras convenciones de
    /// nombre.
    pub fn with_stopwords(stopwords: &'static [&'static str]) -> Self {
        Self { stopwords }
    }

    /// Coteja los tokens útiles del nombre contra las palabras del texto.
    ///
    /// Los 80 puntos del componente se reparten en partes iguales entre los
    /// tokens útiles del nombre; cada uno suma su fracción solo con
    /// coincidencia exacta de palabra. La suma fraccional se redondea al
    /// entero más cercano una única vez, al final. Un nombre sin tokens
    /// útiles vale 0 y no produce detalle alguno.
    pub fn score_nombre(&self, nombre: &str, texto: &str) -> NameMatch {
        let tokens: Vec<String> = tokenize_words(nombre)
            .into_iter()
            .filter(|t| !self.stopwords.contains(&t.as_str()) && t.len() >= 2)
            .collect();

        if tokens.is_empty() {
            return NameMatch {
                puntos: 0,
                tokens_encontrados: Vec::new(),
                tokens_fallidos: Vec::new(),
                detalles: Vec::new(),
            };
        }

        let palabras: HashSet<String> = tokenize_words(texto).into_iter().collect();
        let por_token = 80.0 / tokens.len() as f64;

        let mut encontrados = Vec::new();
        let mut fallidos = Vec::new();
        let mut detalles = Vec::new();
        let mut puntos = 0.0;

        for token in tokens {
            if palabras.contains(&token) {
                puntos += por_token;
                encontrados.push(token.clone());
                detalles.push(TokenDetail {
                    coincidencia: Some(token.clone()),
                    token,
                    tipo: MatchType::Exacto,
                });
            } else {
                fallidos.push(token.clone());
                detalles.push(TokenDetail {
                    token,
                    coincidencia: None,
                    tipo: MatchType::NoEncontrado,
                });
            }
        }

        NameMatch {
            puntos: puntos.round() as i32,
            tokens_encontrados: encontrados,
            tokens_fallidos: fallidos,
            detalles,
        }
    }

    /// Calcula el puntaje 0-100 de una persona contra el texto de un anexo.
    ///
    /// `score = nombre (0-80) + documento (0/15/20) + penalización (0/-20)`,
    /// recortado al rango 0-100. Acepta el texto crudo: cada componente
    /// normaliza lo que necesita.
    pub fn verify(&self, nombre: &str, documento: &str, texto: &str) -> PersonScore {
        let doc_match = score_document(documento, texto);
        let nombre_match = self.score_nombre(nombre, texto);
        let penalizacion = document_penalty(&doc_match);

        let total = (nombre_match.puntos + doc_match.puntos + penalizacion).clamp(0, 100);

        PersonScore {
            score: total,
            componentes: ScoreComponents {
                documento: doc_match.puntos,
                nombre: nombre_match.puntos,
                penalizacion_documento: penalizacion,
            },
            tokens_encontrados: nombre_match.tokens_encontrados.clone(),
            documento_encontrado: doc_match.numero_encontrado.clone(),
            doc_match,
            nombre_match,
        }
    }
}

impl Default for PersonVerifier {
    fn default() -> Self {
        Self::new()
    }
}

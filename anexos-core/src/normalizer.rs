//! # Normalizador de Texto OCR
//!
//! Responsable de convertir el texto crudo que entrega el OCR en una forma
//! canónica sobre la cual las reglas pueden operar de manera estable. El
//! texto de OCR llega con mayúsculas arbitrarias, saltos de línea,
//! tabulaciones y signos de puntuación que no aportan a la clasificación.
//!
//! ## Modos de Normalización
//!
//! - **Lenient**: minúsculas, colapso de espacios y descarte de todo lo que
//!   no sea alfanumérico, conservando las letras propias del español
//!   (á é í ó ú ñ ü). Es el modo de los clasificadores de documentos y de
//!   facturas, y el de la utilidad de limpieza expuesta por el servicio.
//! - **Strict**: además elimina los acentos (descomposición NFD y descarte
//!   de las marcas combinantes) y reduce el alfabeto a `[a-z0-9]` más
//!   espacios. Es el modo del verificador de personas, donde "José" y
//!   "jose" deben comparar igual.
//!
//! Ambos modos son **idempotentes**: normalizar un texto ya normalizado lo
//! deja intacto. Eso permite encadenar etapas sin llevar la cuenta de
//! cuántas veces pasó el texto por aquí.
//!
//! ## Ejemplo de Uso
//!
//! ```rust
//! use anexos_core::normalizer::{normalize, NormalizeMode};
//!
//! let crudo = "  José  MARÍA\n\tGarcía: 123-456  ";
//!
//! let suave = normalize(crudo, NormalizeMode::Lenient);
//! assert_eq!(suave.as_str(), "josé maría garcía 123456");
//!
//! let estricto = normalize(crudo, NormalizeMode::Strict);
//! assert_eq!(estricto.as_str(), "jose maria garcia 123456");
//! ```

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Letras del español fuera del rango ASCII que el modo permisivo conserva.
/// Cualquier otro carácter no alfanumérico y no-espacio se descarta.
const LETRAS_EXTENDIDAS: &[char] = &['á', 'é', 'í', 'ó', 'ú', 'ñ', 'ü'];

/// Modos de normalización disponibles.
///
/// Los clasificadores por reglas necesitan conservar los acentos porque sus
/// tablas enumeran ambas grafías de cada palabra; el verificador de personas
/// necesita eliminarlos para que la comparación de nombres no dependa de la
/// ortografía del OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMode {
    /// **Permisivo**: minúsculas, colapso de espacios en blanco (incluye
    /// `\n` y `\t`) y descarte de todo carácter que no sea alfanumérico
    /// ASCII, letra española acentuada o espacio.
    Lenient,
    /// **Estricto**: lo anterior más descomposición Unicode NFD y descarte
    /// de marcas combinantes, dejando únicamente `[a-z0-9]` y espacios.
    Strict,
}

impl Default for NormalizeMode {
    fn default() -> Self {
        NormalizeMode::Lenient
    }
}

/// Texto ya normalizado, junto con el modo que lo produjo.
///
/// El envoltorio evita mezclar texto crudo con texto normalizado en las
/// firmas de los motores: una función que recibe `NormalizedText` puede
/// asumir minúsculas y espacios colapsados sin volver a normalizar.
/// En JSON viaja como la cadena interna, sin estructura adicional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedText {
    text: String,
    #[serde(skip)]
    mode: NormalizeMode,
}

impl NormalizedText {
    /// Vista del texto normalizado.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume el envoltorio y entrega la `String` interna.
    pub fn into_inner(self) -> String {
        self.text
    }

    /// Modo con el que se produjo este texto.
    pub fn mode(&self) -> NormalizeMode {
        self.mode
    }

    /// Longitud en bytes del texto normalizado.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// `true` si no quedó ningún carácter tras la normalización.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Búsqueda de subcadena sobre el texto normalizado.
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

impl std::fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Normaliza un texto con el modo permisivo.
pub fn normalize_lenient(text: &str) -> NormalizedText {
    normalize(text, NormalizeMode::Lenient)
}

/// Normaliza un texto con el modo estricto.
pub fn normalize_strict(text: &str) -> NormalizedText {
    normalize(text, NormalizeMode::Strict)
}

/// Normaliza un texto con el modo especificado.
///
/// Nunca falla: la entrada vacía, el puro espacio en blanco o el texto
/// compuesto solo de símbolos producen una cadena vacía.
pub fn normalize(text: &str, mode: NormalizeMode) -> NormalizedText {
    let lowered = text.to_lowercase();

    let filtered: String = match mode {
        NormalizeMode::Lenient => lowered
            .chars()
            .filter(|c| {
                c.is_ascii_alphanumeric() || c.is_whitespace() || LETRAS_EXTENDIDAS.contains(c)
            })
            .collect(),
        NormalizeMode::Strict => lowered
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
            .collect(),
    };

    NormalizedText {
        text: collapse_spaces(&filtered),
        mode,
    }
}

/// Colapsa toda secuencia de espacios en blanco a un único espacio ASCII y
/// recorta los extremos. Se aplica después del descarte de símbolos, así un
/// separador rodeado de espacios (`"a - b"`) colapsa a `"a b"` y no deja
/// espacio doble.
fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! # Clasificador de Documentos — Reglas por Prioridad
//!
//! Clasifica el texto OCR de cada página de un paquete de anexos en una de
//! las categorías conocidas. El motor evalúa una lista ordenada de reglas y
//! la primera que coincide decide: una autorización que además menciona
//! "consulta externa" sigue siendo autorización, porque esa regla va antes.
//!
//! ## Estados Terminales
//!
//! No toda página cae en una categoría. Dos estados cierran el contrato:
//!
//! - `REVISAR_CON_LLM`: ninguna regla coincidió; el texto (ya normalizado)
//!   debe pasar al revisor de respaldo.
//! - `VACIO`: el OCR no entregó nada; no hay texto que clasificar ni que
//!   enviar a revisión.
//!
//! El estado vacío se resuelve antes de evaluar regla alguna: distinguir
//! "página en blanco" de "página que no entendimos" evita gastar una
//! llamada al LLM en un texto sin contenido.
//!
//! ## Ejemplo de Uso
//!
//! ```rust
//! use anexos_core::classifier::{Classification, DocumentClassifier};
//!
//! let motor = DocumentClassifier::new();
//!
//! let r = motor.classify("AUTORIZACIÓN DE SERVICIOS DE SALUD No. 123");
//! assert_eq!(r.clasificacion.label(), "autorizacion");
//!
//! let r = motor.classify("recibo de caja menor");
//! assert_eq!(r.clasificacion, Classification::NeedsReview);
//! ```

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalizer::{normalize, NormalizeMode, NormalizedText};
use crate::tables::{self, KeywordTable};

/// Categorías de documento que las reglas saben reconocer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    /// Autorización de servicios emitida por el asegurador.
    Autorizacion,
    /// Formato de recibido firmado por el usuario.
    SoporteDeRecibido,
    /// Orden médica: formulación, remisión o plan de manejo.
    OrdenMedica,
}

impl DocumentCategory {
    /// Etiqueta estable de la categoría en el contrato JSON.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::Autorizacion => "autorizacion",
            DocumentCategory::SoporteDeRecibido => "soporte_de_recibido",
            DocumentCategory::OrdenMedica => "orden_medica",
        }
    }
}

/// Resultado de clasificar: una categoría concreta o uno de los dos estados
/// terminales. Los estados no son categorías y ningún consumidor debería
/// tratarlos como tales; por eso son variantes propias y no centinelas
/// dentro de [`DocumentCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Una regla coincidió: el documento pertenece a esta categoría.
    Category(DocumentCategory),
    /// Ninguna regla coincidió: el texto pasa a revisión.
    NeedsReview,
    /// El texto llegó vacío: no hay nada que clasificar.
    Empty,
}

impl Classification {
    /// Etiqueta estable en el contrato JSON. Las categorías usan su nombre
    /// en minúsculas; los estados terminales, centinelas en mayúsculas.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Category(categoria) => categoria.label(),
            Classification::NeedsReview => "REVISAR_CON_LLM",
            Classification::Empty => "VACIO",
        }
    }

    /// ¿La decisión requiere pasar el texto al revisor de respaldo?
    pub fn needs_review(&self) -> bool {
        matches!(self, Classification::NeedsReview)
    }
}

impl Serialize for Classification {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Decisión final sobre un documento, junto con el texto que viaja con ella.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// La decisión del motor.
    pub clasificacion: Classification,
    /// Texto que acompaña la decisión: el OCR original cuando una regla
    /// coincidió (el consumidor decide si lo re-procesa), el texto ya
    /// normalizado cuando va a revisión, vacío cuando no había nada.
    pub texto: String,
}

/// Una regla de clasificación: tabla de palabras clave sobre el texto
/// normalizado y, opcionalmente, un patrón sobre el texto crudo. La regla
/// coincide si cualquiera de los dos mecanismos coincide.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    /// Nombre de la regla, para trazabilidad.
    pub name: &'static str,
    /// Tabla evaluada sobre el texto normalizado.
    pub keywords: KeywordTable,
    /// Patrón adicional evaluado sobre el texto crudo, donde la
    /// capitalización original todavía aporta señal.
    pub raw_pattern: Option<&'static Regex>,
    /// Categoría que la regla asigna cuando coincide.
    pub category: DocumentCategory,
}

impl ClassificationRule {
    fn applies(&self, normalizado: &NormalizedText, crudo: &str) -> bool {
        if self.keywords.matches(normalizado.as_str()) {
            return true;
        }
        match self.raw_pattern {
            Some(pattern) => pattern.is_match(crudo),
            None => false,
        }
    }
}

/// Motor de clasificación de documentos.
///
/// Mantiene la lista ordenada de reglas. Se construye una sola vez al
/// arrancar el proceso y se comparte por referencia: las reglas son
/// configuración inmutable, no estado.
#[derive(Debug, Clone)]
pub struct DocumentClassifier {
    rules: Vec<ClassificationRule>,
}

impl DocumentClassifier {
    /// Crea el clasificador con las reglas de producción, en orden de
    /// prioridad: autorización, soporte de recibido, orden médica.
    pub fn new() -> Self {
        Self {
            rules: vec![
                ClassificationRule {
                    name: "autorizacion",
                    keywords: tables::AUTORIZACION,
                    raw_pattern: None,
                    category: DocumentCategory::Autorizacion,
                },
                ClassificationRule {
                    name: "soporte_de_recibido",
                    keywords: tables::SOPORTE_RECIBIDO,
                    raw_pattern: None,
                    category: DocumentCategory::SoporteDeRecibido,
                },
                ClassificationRule {
                    name: "orden_medica",
                    keywords: tables::ORDEN_MEDICA,
                    raw_pattern: Some(tables::codigo_medico()),
                    category: DocumentCategory::OrdenMedica,
                },
            ],
        }
    }

    /// Crea un clasificador con reglas propias. El orden de la lista es el
    /// orden de evaluación.
    pub fn with_rules(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    /// Reglas activas, en orden de evaluación.
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Clasifica el texto OCR de un documento.
    ///
    /// El texto vacío (o puro espacio en blanco) se resuelve como
    /// [`Classification::Empty`] antes de evaluar regla alguna. Para el
    /// resto, el texto se normaliza una única vez y todas las reglas leen
    /// esa misma forma; el patrón de códigos lee el crudo.
    pub fn classify(&self, texto_ocr: &str) -> ClassificationResult {
        if texto_ocr.trim().is_empty() {
            return ClassificationResult {
                clasificacion: Classification::Empty,
                texto: String::new(),
            };
        }

        let normalizado = normalize(texto_ocr, NormalizeMode::Lenient);

        for rule in &self.rules {
            if rule.applies(&normalizado, texto_ocr) {
                return ClassificationResult {
                    clasificacion: Classification::Category(rule.category),
                    texto: texto_ocr.to_string(),
                };
            }
        }

        ClassificationResult {
            clasificacion: Classification::NeedsReview,
            texto: normalizado.into_inner(),
        }
    }

    /// Clasifica las páginas de un paquete en paralelo.
    ///
    /// Los anexos llegan como un texto por página; cada página se clasifica
    /// de forma independiente y el resultado conserva el orden de entrada.
    pub fn classify_pages<S>(&self, paginas: &[S]) -> Vec<ClassificationResult>
    where
        S: AsRef<str> + Sync,
    {
        paginas
            .par_iter()
            .map(|pagina| self.classify(pagina.as_ref()))
            .collect()
    }
}

impl Default for DocumentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motor() -> DocumentClassifier {
        DocumentClassifier::new()
    }

    #[test]
    fn test_autorizacion_con_y_sin_tilde() {
        let r = motor().classify("AUTORIZACIÓN DE SERVICIOS DE SALUD");
        assert_eq!(
            r.clasificacion,
            Classification::Category(DocumentCategory::Autorizacion)
        );

        let r = motor().classify("se anexa autorizacion vigente");
        assert_eq!(
            r.clasificacion,
            Classification::Category(DocumentCategory::Autorizacion)
        );
    }

    #[test]
    fn test_soporte_de_recibido() {
        let r = motor().classify("FORMATO DE RECIBIDO USUARIO\nFirma: ______");
        assert_eq!(
            r.clasificacion,
            Classification::Category(DocumentCategory::SoporteDeRecibido)
        );

        let r = motor().classify("certifico que recibí a satisfaccion los servicios");
        assert_eq!(
            r.clasificacion,
            Classification::Category(DocumentCategory::SoporteDeRecibido)
        );
    }

    #[test]
    fn test_orden_medica_por_vocabulario() {
        let r = motor().classify("PLAN DE MANEJO: control en 30 dias");
        assert_eq!(
            r.clasificacion,
            Classification::Category(DocumentCategory::OrdenMedica)
        );
    }

    #[test]
    fn test_orden_medica_por_codigo_en_texto_crudo() {
        // Sin vocabulario de orden: decide el patrón de códigos sobre el crudo
        let r = motor().classify("ver codigo AB12 del paciente");
        assert_eq!(
            r.clasificacion,
            Classification::Category(DocumentCategory::OrdenMedica)
        );

        // El patrón no distingue mayúsculas
        let r = motor().classify("pendiente codigo z990 para control interno");
        assert_eq!(
            r.clasificacion,
            Classification::Category(DocumentCategory::OrdenMedica)
        );
    }

    #[test]
    fn test_prioridad_de_reglas() {
        // Vocabulario de orden médica presente, pero la autorización va primero
        let r = motor().classify("autorizacion para consulta externa con diagnostico J45");
        assert_eq!(
            r.clasificacion,
            Classification::Category(DocumentCategory::Autorizacion)
        );

        // Soporte de recibido antes que orden médica
        let r = motor().classify("formato de recibido usuario para consulta externa");
        assert_eq!(
            r.clasificacion,
            Classification::Category(DocumentCategory::SoporteDeRecibido)
        );
    }

    #[test]
    fn test_categoria_devuelve_texto_crudo() {
        let crudo = "  AUTORIZACIÓN   No. 123  ";
        let r = motor().classify(crudo);
        assert_eq!(r.clasificacion.label(), "autorizacion");
        assert_eq!(r.texto, crudo);
    }

    #[test]
    fn test_revision_devuelve_texto_normalizado() {
        let r = motor().classify("  Recibo de CAJA   No. 001  ");
        assert_eq!(r.clasificacion, Classification::NeedsReview);
        assert_eq!(r.clasificacion.label(), "REVISAR_CON_LLM");
        assert!(r.clasificacion.needs_review());
        assert_eq!(r.texto, "recibo de caja no 001");
    }

    #[test]
    fn test_vacio_antes_que_toda_regla() {
        for vacio in ["", "   ", "\n\t  \n"] {
            let r = motor().classify(vacio);
            assert_eq!(r.clasificacion, Classification::Empty);
            assert_eq!(r.clasificacion.label(), "VACIO");
            assert!(r.texto.is_empty());
        }
    }

    #[test]
    fn test_solo_simbolos_va_a_revision() {
        // No está vacío, pero tras normalizar no queda nada: revisión con
        // payload vacío
        let r = motor().classify("??? *** !!!");
        assert_eq!(r.clasificacion, Classification::NeedsReview);
        assert_eq!(r.texto, "");
    }

    #[test]
    fn test_classify_pages_conserva_el_orden() {
        let paginas = vec![
            "AUTORIZACION DE SERVICIOS".to_string(),
            "".to_string(),
            "plan de manejo del paciente".to_string(),
            "recibo de caja".to_string(),
        ];
        let resultados = motor().classify_pages(&paginas);
        let etiquetas: Vec<&str> = resultados
            .iter()
            .map(|r| r.clasificacion.label())
            .collect();
        assert_eq!(
            etiquetas,
            vec!["autorizacion", "VACIO", "orden_medica", "REVISAR_CON_LLM"]
        );
    }

    #[test]
    fn test_reglas_propias_en_orden() {
        const SALUDOS: KeywordTable = KeywordTable {
            name: "saludos",
            version: 1,
            entries: &["hola"],
        };
        let propio = DocumentClassifier::with_rules(vec![ClassificationRule {
            name: "saludos",
            keywords: SALUDOS,
            raw_pattern: None,
            category: DocumentCategory::Autorizacion,
        }]);

        assert_eq!(propio.rules().len(), 1);
        assert_eq!(propio.classify("hola mundo").clasificacion.label(), "autorizacion");
        // El vocabulario de producción ya no existe en este motor
        assert_eq!(
            propio.classify("orden medica").clasificacion,
            Classification::NeedsReview
        );
    }

    #[test]
    fn test_serializacion_del_resultado() {
        let r = motor().classify("autorizacion de servicios");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["clasificacion"], "autorizacion");
        assert_eq!(json["texto"], "autorizacion de servicios");

        let r = motor().classify("");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["clasificacion"], "VACIO");
    }
}

//! # anexos-core — Clasificación de Anexos Médicos y Verificación de Personas
//!
//! Este crate implementa el núcleo de decisión de un sistema de radicación de
//! cuentas médicas. Los anexos de cada cuenta llegan como texto OCR, una
//! página por documento, y el núcleo decide solo con reglas: qué es cada
//! documento, si una factura incluye exámenes y si el paquete pertenece a la
//! persona que el radicador dice. Lo que las reglas no alcanzan a decidir se
//! marca explícitamente para un revisor de respaldo, nunca se adivina.
//!
//! ## Arquitectura del Sistema
//!
//! El dato fluye y se transforma paso a paso:
//!
//! 1. **Entrada**: texto crudo de OCR (String).
//! 2. **Normalización** ([`normalizer`]): minúsculas, espacios colapsados y
//!    alfabeto reducido, en dos modos (permisivo y estricto).
//! 3. **Decisión**:
//!    * **Documentos** ([`classifier`]): lista ordenada de reglas; la
//!      primera que coincide asigna la categoría.
//!    * **Facturas** ([`invoice`]): veredicto tri-estado sobre exámenes
//!      facturados, con la rama de decisión trazable.
//!    * **Personas** ([`verifier`]): puntaje 0-100 de nombre + documento,
//!      con desglose auditable.
//! 4. **Salida**: resultados serializables con la etiqueta, el puntaje y la
//!    evidencia de cada decisión.
//!
//! Todo lo que los motores saben del dominio vive en [`tables`] como datos
//! con nombre y versión: el motor recorre el vocabulario, no lo conoce.
//!
//! ## Ejemplo de Uso
//!
//! ```rust
//! use anexos_core::{DocumentClassifier, InvoiceExamClassifier, PersonVerifier};
//!
//! // Los motores se construyen una vez y se reutilizan
//! let clasificador = DocumentClassifier::new();
//! let facturas = InvoiceExamClassifier::new();
//! let verificador = PersonVerifier::new();
//!
//! let r = clasificador.classify("AUTORIZACIÓN DE SERVICIOS DE SALUD");
//! assert_eq!(r.clasificacion.label(), "autorizacion");
//!
//! let r = facturas.classify_invoice("item: hemograma completo");
//! assert_eq!(r.examenes_facturados.code(), 1);
//!
//! let r = verificador.verify("juan perez", "123456789", "juan perez cc 123456789");
//! assert_eq!(r.score, 100);
//! ```
//!
//! ## Módulos Principales
//!
//! - [`normalizer`]: canonicalización del texto OCR.
//! - [`tables`]: vocabulario del dominio como datos versionados.
//! - [`classifier`]: clasificación de documentos por prioridad de reglas.
//! - [`invoice`]: detección de exámenes facturados.
//! - [`verifier`]: verificación de identidad por puntaje.

pub mod classifier;
pub mod invoice;
pub mod normalizer;
pub mod tables;
pub mod verifier;

pub use classifier::{
    Classification, ClassificationResult, ClassificationRule, DocumentCategory, DocumentClassifier,
};
pub use invoice::{DecisionSource, ExamPresence, InvoiceClassification, InvoiceExamClassifier};
pub use normalizer::{normalize, NormalizeMode, NormalizedText};
pub use verifier::{PersonScore, PersonVerifier};

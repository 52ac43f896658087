//! # Clasificador de Facturas — Exámenes Facturados
//!
//! Responde una sola pregunta sobre el texto de una factura: ¿incluye ítems
//! de exámenes médicos? La respuesta es tri-estado (sí, no, o las reglas no
//! alcanzan a decidir) y cada respuesta lleva la rama que la produjo, para
//! poder auditar la decisión sin re-ejecutarla.
//!
//! ## Orden de Evaluación
//!
//! 1. El encabezado "procedimientos diagnostico" confirma exámenes por sí
//!    solo, aunque "consultas" aparezca en el mismo texto.
//! 2. Con palabras clave de examen presentes, "consultas" en el mismo texto
//!    inclina la factura hacia NO exámenes; sin "consultas", hay exámenes.
//! 3. "consultas" sin palabra alguna de examen: no hay exámenes.
//! 4. Nada de lo anterior: indeterminado, pasa a revisión.
//!
//! El estado indeterminado nunca se confunde con el negativo: en el contrato
//! JSON viajan como `-1` y `0` respectivamente.

use serde::Serialize;

use crate::normalizer::{normalize, NormalizeMode};
use crate::tables::{self, KeywordTable};

/// Presencia de exámenes en una factura.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamPresence {
    /// La factura incluye ítems de exámenes.
    HasExams,
    /// La factura no incluye exámenes (ítems de consulta).
    NoExams,
    /// Las reglas no alcanzan a decidir.
    Inconclusive,
}

impl ExamPresence {
    /// Código numérico del contrato JSON: `1`, `0` o `-1`.
    pub fn code(&self) -> i8 {
        match self {
            ExamPresence::HasExams => 1,
            ExamPresence::NoExams => 0,
            ExamPresence::Inconclusive => -1,
        }
    }
}

impl Serialize for ExamPresence {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.code())
    }
}

/// Rama de reglas que tomó la decisión.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    /// Apareció el encabezado "procedimientos diagnostico".
    ProcedimientosDiagnostico,
    /// Apareció una palabra clave de examen, sin "consultas" de por medio.
    PalabrasClaveExamen,
    /// Había palabras de examen pero "consultas" inclinó la decisión.
    ConsultasSobreExamen,
    /// Solo apareció "consultas".
    SoloConsultas,
    /// Ninguna regla coincidió.
    RevisarConLlm,
}

impl DecisionSource {
    /// Etiqueta estable de la rama en el contrato JSON.
    pub fn label(&self) -> &'static str {
        match self {
            DecisionSource::ProcedimientosDiagnostico => "rules_procedimientos_diagnostico",
            DecisionSource::PalabrasClaveExamen => "rules_palabras_clave_examen",
            DecisionSource::ConsultasSobreExamen => "rules_consultas_sobre_exam_keywords",
            DecisionSource::SoloConsultas => "rules_solo_consultas",
            DecisionSource::RevisarConLlm => "REVISAR_CON_LLM",
        }
    }
}

impl Serialize for DecisionSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Clasificación de una factura, con la forma normalizada del texto sobre la
/// que se evaluaron las reglas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceClassification {
    /// Veredicto tri-estado (en JSON viaja como `1`, `0` o `-1`).
    #[serde(rename = "examenesFacturados")]
    pub examenes_facturados: ExamPresence,
    /// Rama que decidió.
    pub decision_source: DecisionSource,
    /// Texto normalizado que vieron las reglas; es también el que recibiría
    /// el revisor cuando el veredicto es indeterminado.
    pub texto_limpio: String,
}

/// Motor de clasificación de facturas.
#[derive(Debug, Clone)]
pub struct InvoiceExamClassifier {
    examenes: KeywordTable,
}

impl InvoiceExamClassifier {
    /// Crea el motor con la tabla de exámenes de producción.
    pub fn new() -> Self {
        Self {
            examenes: tables::EXAMENES,
        }
    }

    /// Motor con una tabla de exámenes propia.
    pub fn with_table(examenes: KeywordTable) -> Self {
        Self { examenes }
    }

    /// Clasifica el texto de una factura. La primera rama que aplica decide;
    /// el texto vacío cae hasta la rama indeterminada.
    pub fn classify_invoice(&self, texto_factura: &str) -> InvoiceClassification {
        let texto_limpio = normalize(texto_factura, NormalizeMode::Lenient).into_inner();

        if texto_limpio.contains(tables::PROCEDIMIENTOS_DIAGNOSTICO) {
            return InvoiceClassification {
                examenes_facturados: ExamPresence::HasExams,
                decision_source: DecisionSource::ProcedimientosDiagnostico,
                texto_limpio,
            };
        }

        if self.examenes.matches(&texto_limpio) {
            if texto_limpio.contains(tables::CONSULTAS) {
                return InvoiceClassification {
                    examenes_facturados: ExamPresence::NoExams,
                    decision_source: DecisionSource::ConsultasSobreExamen,
                    texto_limpio,
                };
            }
            return InvoiceClassification {
                examenes_facturados: ExamPresence::HasExams,
                decision_source: DecisionSource::PalabrasClaveExamen,
                texto_limpio,
            };
        }

        if texto_limpio.contains(tables::CONSULTAS) {
            return InvoiceClassification {
                examenes_facturados: ExamPresence::NoExams,
                decision_source: DecisionSource::SoloConsultas,
                texto_limpio,
            };
        }

        InvoiceClassification {
            examenes_facturados: ExamPresence::Inconclusive,
            decision_source: DecisionSource::RevisarConLlm,
            texto_limpio,
        }
    }
}

impl Default for InvoiceExamClassifier {
    fn default() -> Self {
        Self::new()
    }
}

//! # Tablas de Reglas — Vocabulario del Dominio
//!
//! Todo lo que los motores saben del dominio vive aquí como datos: tablas de
//! palabras clave con nombre y versión, las partículas de nombres compuestos
//! y el patrón de códigos de procedimiento. Los motores recorren las tablas
//! sin conocer su contenido, así una actualización de vocabulario es un
//! cambio de datos revisable y no un cambio de lógica.
//!
//! ## Convenciones
//!
//! - Las entradas están en minúsculas y en la forma exacta que produce el
//!   modo permisivo del [normalizador](crate::normalizer): de otro modo
//!   jamás coincidirían con un texto normalizado.
//! - Las grafías con y sin tilde se enumeran por separado ("remisión" y
//!   "remision"): el OCR entrega cualquiera de las dos.
//! - La versión de cada tabla sube cuando cambian sus entradas, para poder
//!   auditar con qué vocabulario se tomó una decisión.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Una tabla de palabras clave con nombre y versión.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordTable {
    /// Identificador estable de la tabla (ej: "autorizacion").
    pub name: &'static str,
    /// Versión del contenido.
    pub version: u32,
    /// Entradas en minúsculas, tal como las produce el modo permisivo.
    pub entries: &'static [&'static str],
}

impl KeywordTable {
    /// ¿Alguna entrada de la tabla aparece como subcadena del texto?
    pub fn matches(&self, texto: &str) -> bool {
        self.entries.iter().any(|clave| texto.contains(clave))
    }

    /// Primera entrada (en el orden de la tabla) que aparece en el texto.
    pub fn first_match(&self, texto: &str) -> Option<&'static str> {
        self.entries.iter().copied().find(|clave| texto.contains(clave))
    }
}

/// Palabras clave de una autorización de servicios.
pub const AUTORIZACION: KeywordTable = KeywordTable {
    name: "autorizacion",
    version: 1,
    entries: &["autorización", "autorizacion"],
};

/// Frases del formato de recibido que firma el usuario al recibir el
/// servicio. Son frases completas y no palabras sueltas: "recibido" a secas
/// aparece en demasiados documentos.
pub const SOPORTE_RECIBIDO: KeywordTable = KeywordTable {
    name: "soporte_de_recibido",
    version: 1,
    entries: &[
        "formato de recibido usuario",
        "certifico que recibí a satisfaccion",
        "certifico que recibi a satisfaccion",
    ],
};

/// Vocabulario característico de una orden médica: formulación, remisión,
/// plan de manejo y afines.
pub const ORDEN_MEDICA: KeywordTable = KeywordTable {
    name: "orden_medica",
    version: 1,
    entries: &[
        "orden médica",
        "orden medica",
        "plan de manejo",
        "consulta externa",
        "diagnóstico",
        "diagnostico",
        "observaciones",
        "cita de control",
        "consulta especializada",
        "formulación",
        "formulacion",
        "remisión",
        "remision",
    ],
};

/// Exámenes médicos que suelen aparecer como ítems de factura: imágenes
/// diagnósticas, paneles de laboratorio y procedimientos.
pub const EXAMENES: KeywordTable = KeywordTable {
    name: "examenes",
    version: 1,
    entries: &[
        "radiografia",
        "radiografía",
        "rayos x",
        "ecografia",
        "ecografía",
        "ultrasonido",
        "tomografia",
        "tomografía",
        "tac",
        "resonancia magnetica",
        "resonancia magnética",
        "rmn",
        "mamografia",
        "mamografía",
        "hemoglobina",
        "hematocrito",
        "cuadro hematico",
        "hemograma",
        "glicemia",
        "glucosa",
        "hemoglobina glicosilada",
        "colesterol",
        "trigliceridos",
        "triglicéridos",
        "perfil lipidico",
        "perfil lipídico",
        "parcial de orina",
        "uroanalisis",
        "uroanálisis",
        "creatinina",
        "bun",
        "nitrogeno ureico",
        "cultivo",
        "antibiograma",
        "biopsia",
        "electrocardiograma",
        "ekg",
        "electroencefalograma",
        "eeg",
        "prueba de esfuerzo",
        "doppler",
        "endoscopia",
        "colonoscopia",
        "antigeno prostatico",
        "antígeno prostático",
        "psa",
        "microalbuminuria",
        "potasio",
        "sodio",
        "electrolitos",
        "electrólitos",
    ],
};

/// Encabezado de sección que por sí solo confirma exámenes facturados.
pub const PROCEDIMIENTOS_DIAGNOSTICO: &str = "procedimientos diagnostico";

/// Palabra que señala ítems de consulta (no exámenes) en una factura.
pub const CONSULTAS: &str = "consultas";

/// Partículas de nombres compuestos que no aportan identidad y quedan fuera
/// del puntaje de nombre. Incluye las variantes portuguesas frecuentes en
/// apellidos de la región.
pub const STOPWORDS_NOMBRE: &[&str] =
    &["de", "del", "la", "las", "los", "y", "da", "das", "do", "dos"];

/// Patrón de códigos de procedimiento y diagnóstico tal como aparecen en las
/// órdenes médicas: una letra seguida de 2 a 6 dígitos (ej: "J45", "M170"),
/// o dos o tres letras seguidas de 1 a 4 dígitos (ej: "AB12"). Se evalúa
/// sobre el texto crudo sin distinguir mayúsculas: la capitalización del OCR
/// no es confiable.
static CODIGO_MEDICO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([A-Z][0-9]{2,6}|[A-Z]{2,3}[0-9]{1,4})\b")
        .expect("patrón de códigos médicos inválido")
});

/// Patrón compilado de códigos médicos. La compilación ocurre una sola vez,
/// en el primer uso.
pub fn codigo_medico() -> &'static Regex {
    &CODIGO_MEDICO
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const TODAS: [KeywordTable; 4] = [AUTORIZACION, SOPORTE_RECIBIDO, ORDEN_MEDICA, EXAMENES];

    #[test]
    fn test_entradas_en_minusculas() {
        for tabla in TODAS {
            for clave in tabla.entries {
                assert_eq!(
                    *clave,
                    clave.to_lowercase(),
                    "la tabla {} tiene una entrada con mayúsculas",
                    tabla.name
                );
            }
        }
    }

    #[test]
    fn test_sin_entradas_vacias_ni_duplicadas() {
        for tabla in TODAS {
            let mut vistas = HashSet::new();
            for clave in tabla.entries {
                assert!(!clave.trim().is_empty(), "entrada vacía en {}", tabla.name);
                assert!(
                    vistas.insert(*clave),
                    "entrada duplicada en {}: {}",
                    tabla.name,
                    clave
                );
            }
        }
    }

    #[test]
    fn test_entradas_estables_bajo_normalizacion_permisiva() {
        use crate::normalizer::{normalize, NormalizeMode};
        for tabla in TODAS {
            for clave in tabla.entries {
                let n = normalize(clave, NormalizeMode::Lenient);
                assert_eq!(n.as_str(), *clave, "clave inestable en {}", tabla.name);
            }
        }
    }

    #[test]
    fn test_matches_y_first_match() {
        assert!(AUTORIZACION.matches("se adjunta autorización del servicio"));
        assert!(!AUTORIZACION.matches("orden de laboratorio"));
        assert_eq!(
            ORDEN_MEDICA.first_match("remision a consulta externa"),
            Some("consulta externa")
        );
        assert_eq!(ORDEN_MEDICA.first_match("recibo de caja"), None);
    }

    #[test]
    fn test_codigo_medico_formas_tipicas() {
        let re = codigo_medico();
        // Letra + dígitos (códigos CIE-10 abreviados)
        assert!(re.is_match("diagnóstico J45 confirmado"));
        // Dos letras + dígitos
        assert!(re.is_match("ver codigo AB12 del paciente"));
        // Sin distinción de mayúsculas
        assert!(re.is_match("pendiente codigo z990 interno"));
    }

    #[test]
    fn test_codigo_medico_no_dispara_en_texto_comun() {
        let re = codigo_medico();
        assert!(!re.is_match("paciente estable sin novedades"));
        // Un solo dígito tras la letra no alcanza el mínimo
        assert!(!re.is_match("sala A1"));
        // Dígitos sueltos tampoco
        assert!(!re.is_match("factura 1234567"));
    }
}

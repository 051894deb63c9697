//! Built-in course used when no content server is configured.

use conjugator_core::model::{Course, DataSourceId};

use super::document::parse_course;
use crate::error::ContentError;

/// Data source id the sample course is published under.
pub const SAMPLE_DATA_SOURCE: &str = "sample";

const SAMPLE_COURSE: &str = r#"{
    "name": "Conjugator Sample",
    "levels": [
        {
            "title": "Nivel Fácil (presente)",
            "description": "Algunos verbos fáciles en tiempo presente",
            "color": "00AEEF",
            "challenges": [
                { "verb": "comer", "forms": ["como", "comes", "come", "comemos", "coméis", "comen"] },
                { "verb": "beber", "forms": ["bebo", "bebes", "bebe", "bebemos", "bebéis", "beben"] },
                { "verb": "andar", "forms": ["ando", "andas", "anda", "andamos", "andáis", "andan"] }
            ]
        },
        {
            "title": "Go-go verbs (presente)",
            "description": "Más difíciles",
            "color": "009900",
            "challenges": [
                { "verb": "tener", "forms": ["tengo", "tienes", "tiene", "tenemos", "tenéis", "tienen"] },
                { "verb": "poner", "forms": ["pongo", "pones", "pone", "ponemos", "ponéis", "ponen"] }
            ]
        },
        {
            "title": "Nivel Fácil (pretérito)",
            "description": "Un poco difícil",
            "lives": "sudden_death",
            "challenges": [
                { "verb": "hablar", "forms": ["hablé", "hablaste", "habló", "hablamos", "hablasteis", "hablaron"] },
                { "verb": "vivir", "forms": ["viví", "viviste", "vivió", "vivimos", "vivieron"] }
            ]
        }
    ]
}"#;

/// # Errors
///
/// Returns `ContentError` if the bundled document no longer parses.
pub fn sample_course() -> Result<Course, ContentError> {
    let id = DataSourceId::new(SAMPLE_DATA_SOURCE)?;
    parse_course(&id, SAMPLE_COURSE)
}

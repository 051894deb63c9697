use serde::{Deserialize, Serialize};
use std::fmt;

/// Grammatical person a conjugated verb form belongs to.
///
/// Declaration order is the canonical order used for choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    Yo,
    Tu,
    El,
    Nosotros,
    Vosotros,
    Ellos,
}

impl Form {
    /// All six persons in canonical order.
    pub const ALL: [Form; 6] = [
        Form::Yo,
        Form::Tu,
        Form::El,
        Form::Nosotros,
        Form::Vosotros,
        Form::Ellos,
    ];

    /// The five persons used by challenges that omit `vosotros`.
    pub const WITHOUT_VOSOTROS: [Form; 5] = [
        Form::Yo,
        Form::Tu,
        Form::El,
        Form::Nosotros,
        Form::Ellos,
    ];

    /// Display title of the pronoun(s).
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Form::Yo => "Yo",
            Form::Tu => "Tú",
            Form::El => "Él/Ella/Usted",
            Form::Nosotros => "Nosotros",
            Form::Vosotros => "Vosotros",
            Form::Ellos => "Ellos",
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_form_order_skips_only_vosotros() {
        let filtered: Vec<Form> = Form::ALL
            .into_iter()
            .filter(|form| *form != Form::Vosotros)
            .collect();
        assert_eq!(filtered, Form::WITHOUT_VOSOTROS);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Form::Vosotros).unwrap();
        assert_eq!(json, "\"vosotros\"");
        let parsed: Form = serde_json::from_str("\"tu\"").unwrap();
        assert_eq!(parsed, Form::Tu);
    }
}

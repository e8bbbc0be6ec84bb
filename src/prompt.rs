// prompt.rs
// Builds the system instruction the language model sees. The emotion-tag
// sentence is load-bearing: interpret.rs relies on replies opening with a
// bracketed tag, so it stays in the instruction no matter the persona.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub name: String,
    pub flavor: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Poppet".to_string(),
            flavor: "a cheerful animated companion".to_string(),
        }
    }
}

impl Persona {
    pub fn system_instruction(&self) -> String {
        format!(
            "Your name is {}. You are {}. Every time you respond, you MUST start \
             your message with an emotion tag like [HAPPY], [SAD], [ANGRY], or \
             [SURPRISED]. Keep your answers short.",
            self.name, self.flavor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_names_the_persona_and_demands_tags() {
        let p = Persona { name: "Juniper".into(), flavor: "a dry-witted librarian".into() };
        let s = p.system_instruction();
        assert!(s.contains("Juniper"));
        assert!(s.contains("dry-witted librarian"));
        assert!(s.contains("[HAPPY]"), "the tag contract must be spelled out");
    }
}

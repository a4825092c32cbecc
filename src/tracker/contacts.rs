use serde::{Deserialize, Serialize};

use super::ToolInputError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub number: String,
}

impl EmergencyContact {
    pub fn new(name: &str, number: &str) -> Result<Self, ToolInputError> {
        let (name, number) = (name.trim(), number.trim());
        if name.is_empty() || number.is_empty() {
            return Err(ToolInputError::MissingContactField);
        }

        Ok(Self {
            name: name.to_string(),
            number: number.to_string(),
        })
    }

    /// Parses `<name...> <number>`, the number being the last word.
    pub fn parse(args: &str) -> Result<Self, ToolInputError> {
        let args = args.trim();
        match args.rsplit_once(char::is_whitespace) {
            Some((name, number)) => Self::new(name, number),
            None => Err(ToolInputError::MissingContactField),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactBook(Vec<EmergencyContact>);

impl ContactBook {
    pub fn push(&mut self, contact: EmergencyContact) {
        self.0.push(contact);
    }

    pub fn remove(&mut self, index: usize) -> Option<EmergencyContact> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    pub fn entries(&self) -> &[EmergencyContact] {
        &self.0
    }
}

use serde::{Deserialize, Serialize};

/// Favourite article ids in the order they were added.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<String>);

impl Favorites {
    /// Adds `id` if absent, removes it otherwise. Returns whether it is now a favourite.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.0.iter().position(|favorite| favorite == id) {
            Some(index) => {
                self.0.remove(index);
                false
            }
            None => {
                self.0.push(id.to_string());
                true
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|favorite| favorite == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }
}

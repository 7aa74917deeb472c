/// Backend-issued session id, adopted once and reused for every later exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSlot {
    id: Option<String>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.id.is_some()
    }

    /// Adopts `candidate` when no id is held yet. First write wins.
    ///
    /// Returns `true` only when the slot was empty and took the value.
    pub fn adopt(&mut self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return false;
        }

        match self.id.as_deref() {
            None => {
                tracing::debug!(session_id = candidate, "adopted backend session id");
                self.id = Some(candidate.to_owned());
                true
            }
            Some(current) => {
                if current != candidate {
                    tracing::debug!(
                        current,
                        ignored = candidate,
                        "backend echoed a different session id; keeping the first"
                    );
                }
                false
            }
        }
    }
}

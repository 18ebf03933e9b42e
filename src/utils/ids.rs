//! Secuencia de identificadores para entidades en memoria

/// Identificador numérico de entidad
pub type EntityId = u64;

/// Generador monótono de identificadores
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: EntityId,
}

impl IdSequence {
    pub fn starting_at(first: EntityId) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let mut ids = IdSequence::starting_at(100);
        assert_eq!(ids.next_id(), 100);
        assert_eq!(ids.next_id(), 101);
        assert_eq!(IdSequence::default().next_id(), 1);
    }
}

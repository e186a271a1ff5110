//! Conversion between store rows and domain notes.

use crate::model::note::Note;
use crate::store::NoteEntity;

/// Stateless field-copying mapper between [`NoteEntity`] and [`Note`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteMapper;

impl NoteMapper {
    pub fn to_domain(&self, entity: NoteEntity) -> Note {
        Note {
            id: entity.id,
            title: entity.title,
            content: entity.content,
            timestamp: entity.timestamp,
        }
    }

    pub fn to_entity(&self, note: &Note) -> NoteEntity {
        NoteEntity {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            timestamp: note.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NoteMapper;
    use crate::model::note::Note;
    use crate::store::NoteEntity;

    #[test]
    fn domain_note_survives_entity_round_trip() {
        let mapper = NoteMapper;
        let note = Note::with_id(7, "Groceries", "Milk, eggs", 1_700_000_000_000);
        assert_eq!(mapper.to_domain(mapper.to_entity(&note)), note);
    }

    #[test]
    fn entity_survives_domain_round_trip() {
        let mapper = NoteMapper;
        let entity = NoteEntity {
            id: 0,
            title: "draft".to_string(),
            content: String::new(),
            timestamp: -1,
        };
        assert_eq!(mapper.to_entity(&mapper.to_domain(entity.clone())), entity);
    }
}

//! Instance note use-cases.
//!
//! # Responsibility
//! - Attach, edit and delete free-text notes on one instance.
//!
//! # Invariants
//! - Note text is stored trimmed and is never blank.
//! - Only the author or an administrator may edit or delete a note; anyone
//!   else gets `MutationOutcome::Refused` with nothing changed.
//! - Editing refreshes `addedAt`.

use crate::model::actor::Actor;
use crate::model::part::{Note, NoteId};
use crate::service::task_service::{MutationOutcome, TaskStateStore, TaskStoreError};
use log::info;
use uuid::Uuid;

impl TaskStateStore<'_> {
    /// Attaches a note authored by `actor`. Returns the new note id.
    pub fn add_note(
        &mut self,
        part_id: &str,
        assembly_id: &str,
        instance_id: u32,
        text: &str,
        actor: &Actor,
    ) -> Result<NoteId, TaskStoreError> {
        let text = normalize_note_text(text)?;
        let now = (self.clock)();
        let instance = self.instance_mut(part_id, assembly_id, instance_id)?;

        let note = Note {
            id: Uuid::new_v4().to_string(),
            added_by: actor.display_name(),
            added_at: now,
            string_value: text,
        };
        let note_id = note.id.clone();
        instance.notes.push(note);
        info!(
            "event=note_added module=service part={} assembly={} instance={} note={}",
            part_id, assembly_id, instance_id, note_id
        );
        Ok(note_id)
    }

    /// Replaces a note's text.
    pub fn edit_note(
        &mut self,
        part_id: &str,
        assembly_id: &str,
        instance_id: u32,
        note_id: &str,
        text: &str,
        actor: &Actor,
    ) -> Result<MutationOutcome, TaskStoreError> {
        let text = normalize_note_text(text)?;
        let now = (self.clock)();
        let instance = self.instance_mut(part_id, assembly_id, instance_id)?;
        let note = instance
            .notes
            .iter_mut()
            .find(|note| note.id == note_id)
            .ok_or_else(|| TaskStoreError::NoteNotFound(note_id.to_string()))?;

        if !actor.may_modify(&note.added_by) {
            info!(
                "event=note_edit_refused module=service note={} actor={}",
                note_id,
                actor.display_name()
            );
            return Ok(MutationOutcome::Refused);
        }
        note.string_value = text;
        note.added_at = now;
        info!("event=note_edited module=service note={note_id}");
        Ok(MutationOutcome::Applied)
    }

    /// Removes a note.
    pub fn delete_note(
        &mut self,
        part_id: &str,
        assembly_id: &str,
        instance_id: u32,
        note_id: &str,
        actor: &Actor,
    ) -> Result<MutationOutcome, TaskStoreError> {
        let instance = self.instance_mut(part_id, assembly_id, instance_id)?;
        let position = instance
            .notes
            .iter()
            .position(|note| note.id == note_id)
            .ok_or_else(|| TaskStoreError::NoteNotFound(note_id.to_string()))?;

        if !actor.may_modify(&instance.notes[position].added_by) {
            info!(
                "event=note_delete_refused module=service note={} actor={}",
                note_id,
                actor.display_name()
            );
            return Ok(MutationOutcome::Refused);
        }
        instance.notes.remove(position);
        info!("event=note_deleted module=service note={note_id}");
        Ok(MutationOutcome::Applied)
    }
}

fn normalize_note_text(text: &str) -> Result<String, TaskStoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskStoreError::EmptyNote);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::normalize_note_text;
    use crate::service::task_service::TaskStoreError;

    #[test]
    fn note_text_is_trimmed_and_never_blank() {
        assert_eq!(normalize_note_text("  weld seam cracked \n").unwrap(), "weld seam cracked");
        assert_eq!(normalize_note_text(" \t ").unwrap_err(), TaskStoreError::EmptyNote);
    }
}

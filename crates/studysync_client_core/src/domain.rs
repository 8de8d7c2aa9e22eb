//! crates/studysync_client_core/src/domain.rs
//!
//! Defines the pure, core data structures for the authoring workflow.
//! These structs are independent of any transport or serialization format
//! and perform no I/O themselves.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// A media reference attached to a course or module.
///
/// Either a raw URL the author typed in, or the URL handed back by a prior
/// file upload. The server treats both the same; the distinction only
/// matters to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRef {
    External(String),
    Uploaded(String),
}

impl MediaRef {
    pub fn url(&self) -> &str {
        match self {
            MediaRef::External(url) | MediaRef::Uploaded(url) => url,
        }
    }
}

/// Mutable attributes of a course draft.
#[derive(Debug, Clone, Default)]
pub struct CourseFields {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub level: String,
    pub thumbnail: Option<MediaRef>,
}

/// Mutable attributes of a single module draft.
#[derive(Debug, Clone, Default)]
pub struct ModuleFields {
    pub title: String,
    pub content: String,
    pub video: Option<MediaRef>,
    pub notes: Option<MediaRef>,
}

/// One module unit inside an authoring session.
///
/// `local_key` is assigned once at creation and never reused after removal;
/// it is the handle UI lists and the step ledger key off. Remote persistence
/// state lives in the session's [`StepLedger`], not here.
#[derive(Debug, Clone)]
pub struct ModuleDraft {
    pub local_key: Uuid,
    pub fields: ModuleFields,
}

impl ModuleDraft {
    pub fn new(fields: ModuleFields) -> Self {
        Self {
            local_key: Uuid::new_v4(),
            fields,
        }
    }
}

//=========================================================================================
// StepLedger
//=========================================================================================

#[derive(Debug, Clone)]
struct ModuleEntry {
    remote_id: i64,
    dirty: bool,
}

/// In-memory record of which authoring steps have completed and with what
/// server-assigned identifiers. Pure data structure, no I/O.
///
/// A module is persisted iff it has an entry with `dirty == false`. Since an
/// entry always carries a remote id, "persisted implies a remote id exists"
/// holds by construction rather than by convention.
#[derive(Debug, Clone, Default)]
pub struct StepLedger {
    course_id: Option<i64>,
    modules: HashMap<Uuid, ModuleEntry>,
}

impl StepLedger {
    /// The server id of the course, once its create call has succeeded.
    pub fn course_id(&self) -> Option<i64> {
        self.course_id
    }

    /// Records the server id of the created course.
    ///
    /// The id never reverts for the lifetime of the session: there is
    /// intentionally no way to clear it again.
    pub fn record_course_created(&mut self, course_id: i64) {
        debug_assert!(self.course_id.is_none(), "course id recorded twice");
        self.course_id = Some(course_id);
    }

    /// Records that a module's current fields have reached the server,
    /// via either a create or an update call.
    pub fn record_module_persisted(&mut self, local_key: Uuid, remote_id: i64) {
        self.modules.insert(
            local_key,
            ModuleEntry {
                remote_id,
                dirty: false,
            },
        );
    }

    /// Flags a previously persisted module as edited, so the next commit
    /// re-sends its fields. No effect on modules never persisted.
    pub fn mark_dirty(&mut self, local_key: Uuid) {
        if let Some(entry) = self.modules.get_mut(&local_key) {
            entry.dirty = true;
        }
    }

    /// Drops all record of a module, e.g. after its remote delete succeeded.
    pub fn remove(&mut self, local_key: Uuid) {
        self.modules.remove(&local_key);
    }

    pub fn remote_id(&self, local_key: Uuid) -> Option<i64> {
        self.modules.get(&local_key).map(|entry| entry.remote_id)
    }

    /// True iff the module's current field values are known to be on the
    /// server. The next commit skips persisted modules entirely.
    pub fn is_persisted(&self, local_key: Uuid) -> bool {
        self.modules
            .get(&local_key)
            .map(|entry| !entry.dirty)
            .unwrap_or(false)
    }
}

//=========================================================================================
// AuthoringSession
//=========================================================================================

/// A client-side draft of one course plus its ordered modules, pending full
/// persistence.
///
/// The module list order is the authored lesson order and is preserved
/// through commits and retries. A session lives only in memory: navigating
/// away or reloading discards un-submitted work by design.
#[derive(Debug, Clone)]
pub struct AuthoringSession {
    pub course_fields: CourseFields,
    modules: Vec<ModuleDraft>,
    ledger: StepLedger,
    pub created_at: DateTime<Utc>,
}

impl AuthoringSession {
    pub fn new(course_fields: CourseFields) -> Self {
        Self {
            course_fields,
            modules: Vec::new(),
            ledger: StepLedger::default(),
            created_at: Utc::now(),
        }
    }

    /// Appends a new module draft and returns its local key.
    pub fn add_module(&mut self, fields: ModuleFields) -> Uuid {
        let draft = ModuleDraft::new(fields);
        let local_key = draft.local_key;
        self.modules.push(draft);
        local_key
    }

    /// Replaces a module's fields. A previously persisted module becomes
    /// dirty again, so the next commit re-submits it as an update.
    pub fn update_module(&mut self, local_key: Uuid, fields: ModuleFields) -> bool {
        let Some(draft) = self
            .modules
            .iter_mut()
            .find(|draft| draft.local_key == local_key)
        else {
            return false;
        };
        draft.fields = fields;
        self.ledger.mark_dirty(local_key);
        true
    }

    /// Moves a module to a new position in the authored order.
    pub fn move_module(&mut self, local_key: Uuid, to_index: usize) -> bool {
        let Some(from) = self
            .modules
            .iter()
            .position(|draft| draft.local_key == local_key)
        else {
            return false;
        };
        let draft = self.modules.remove(from);
        let to_index = to_index.min(self.modules.len());
        self.modules.insert(to_index, draft);
        true
    }

    /// Removes a module draft and its ledger entry. This is a pure local
    /// mutation; deleting an already-persisted module on the server is the
    /// orchestrator's job and must happen first.
    pub fn remove_module_local(&mut self, local_key: Uuid) -> Option<ModuleDraft> {
        let index = self
            .modules
            .iter()
            .position(|draft| draft.local_key == local_key)?;
        self.ledger.remove(local_key);
        Some(self.modules.remove(index))
    }

    pub fn modules(&self) -> &[ModuleDraft] {
        &self.modules
    }

    pub fn ledger(&self) -> &StepLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut StepLedger {
        &mut self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(title: &str) -> ModuleFields {
        ModuleFields {
            title: title.to_string(),
            ..ModuleFields::default()
        }
    }

    #[test]
    fn new_module_is_not_persisted() {
        let mut session = AuthoringSession::new(CourseFields::default());
        let key = session.add_module(module("intro"));
        assert!(!session.ledger().is_persisted(key));
        assert_eq!(session.ledger().remote_id(key), None);
    }

    #[test]
    fn persisted_module_has_remote_id() {
        let mut session = AuthoringSession::new(CourseFields::default());
        let key = session.add_module(module("intro"));
        session.ledger_mut().record_module_persisted(key, 42);
        assert!(session.ledger().is_persisted(key));
        assert_eq!(session.ledger().remote_id(key), Some(42));
    }

    #[test]
    fn editing_a_persisted_module_marks_it_dirty() {
        let mut session = AuthoringSession::new(CourseFields::default());
        let key = session.add_module(module("intro"));
        session.ledger_mut().record_module_persisted(key, 42);

        assert!(session.update_module(key, module("intro, revised")));
        assert!(!session.ledger().is_persisted(key));
        // The remote id survives the edit, so the retry is an update.
        assert_eq!(session.ledger().remote_id(key), Some(42));
    }

    #[test]
    fn removing_a_module_drops_its_ledger_entry() {
        let mut session = AuthoringSession::new(CourseFields::default());
        let key = session.add_module(module("intro"));
        session.ledger_mut().record_module_persisted(key, 42);

        let removed = session.remove_module_local(key);
        assert_eq!(removed.unwrap().local_key, key);
        assert_eq!(session.ledger().remote_id(key), None);
        assert!(session.modules().is_empty());
    }

    #[test]
    fn move_module_changes_authored_order() {
        let mut session = AuthoringSession::new(CourseFields::default());
        let first = session.add_module(module("one"));
        let second = session.add_module(module("two"));
        let third = session.add_module(module("three"));

        assert!(session.move_module(third, 0));
        let order: Vec<Uuid> = session.modules().iter().map(|m| m.local_key).collect();
        assert_eq!(order, vec![third, first, second]);
    }

    #[test]
    fn update_of_unknown_module_is_rejected() {
        let mut session = AuthoringSession::new(CourseFields::default());
        assert!(!session.update_module(Uuid::new_v4(), module("ghost")));
    }
}

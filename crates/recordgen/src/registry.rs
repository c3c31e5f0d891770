//! Registry for boundary emitters.

use crate::traits::Emitter;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Global registry of emitters.
static EMITTERS: RwLock<Vec<&'static dyn Emitter>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom emitter.
///
/// Built-in emitters are registered automatically on first use. A custom
/// emitter registered under a built-in name is shadowed by the built-in.
pub fn register_emitter(emitter: &'static dyn Emitter) {
    init_builtin();
    EMITTERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(emitter);
}

/// Initialize built-in emitters (called automatically on first use).
fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        #[allow(unused_mut, unused_variables)]
        let mut emitters = EMITTERS.write().unwrap_or_else(PoisonError::into_inner);

        #[cfg(feature = "backend-java")]
        {
            emitters.push(&crate::output::java::JAVA_EMITTER);
        }

        #[cfg(feature = "backend-json")]
        {
            emitters.push(&crate::output::json::JSON_EMITTER);
        }
    });
}

/// Get an emitter by name.
pub fn get_emitter(name: &str) -> Option<&'static dyn Emitter> {
    init_builtin();
    EMITTERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .find(|e| e.name() == name)
        .copied()
}

/// List all registered emitters.
pub fn emitters() -> Vec<&'static dyn Emitter> {
    init_builtin();
    EMITTERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// List all registered emitter names.
pub fn emitter_names() -> Vec<&'static str> {
    init_builtin();
    EMITTERS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .map(|e| e.name())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmitError;
    use crate::ir::RecordModel;
    use crate::schema::SchemaGraph;
    use crate::traits::{EmitOptions, SourceFile};

    struct NullEmitter;

    impl Emitter for NullEmitter {
        fn name(&self) -> &'static str {
            "null"
        }
        fn language(&self) -> &'static str {
            "none"
        }
        fn extension(&self) -> &'static str {
            "txt"
        }
        fn emit(
            &self,
            _graph: &SchemaGraph,
            _model: &RecordModel,
            _options: &EmitOptions,
        ) -> Result<Vec<SourceFile>, EmitError> {
            Ok(Vec::new())
        }
    }

    static NULL_EMITTER: NullEmitter = NullEmitter;

    #[test]
    fn builtins_are_listed() {
        let names = emitter_names();
        assert_eq!(names.contains(&"java"), cfg!(feature = "backend-java"));
        assert_eq!(names.contains(&"json"), cfg!(feature = "backend-json"));
    }

    #[test]
    fn custom_emitters_register() {
        register_emitter(&NULL_EMITTER);
        let emitter = get_emitter("null").unwrap();
        assert_eq!(emitter.extension(), "txt");
        assert!(get_emitter("cobol").is_none());
    }
}

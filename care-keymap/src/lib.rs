//! Keyboard-shortcut dispatcher: loads scoped bindings from JSON and resolves a key chord
//! against an expanded shortcut context.

mod chord;

use std::collections::{HashMap, HashSet};

use care_core::{CareError, ContextExpander, ExpandedContext, ShortcutConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

pub use chord::{KeyChord, Modifiers};

/// Errors raised while building a keymap.
#[derive(Debug, thiserror::Error)]
pub enum KeymapError {
    #[error("Invalid keymap JSON: {0}")]
    Parse(String),
    #[error("Empty key chord")]
    EmptyChord,
    #[error("Key chord {0:?} has no key")]
    MissingKey(String),
    #[error("Key chord {0:?} names more than one key")]
    MultipleKeys(String),
    #[error("Binding for {action:?} has an empty scope")]
    EmptyScope { action: String },
    #[error(transparent)]
    Config(#[from] CareError),
}

/// On-disk keymap document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeymapFile {
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
}

/// A binding as written in the keymap document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BindingSpec {
    pub scope: String,
    pub keys: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Binding {
    chord: KeyChord,
    action: String,
    description: Option<String>,
}

/// Outcome of a successful lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resolution {
    pub action: String,
    pub scope: String,
}

/// A binding reachable from a context, for help overlays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveBinding {
    pub scope: String,
    pub keys: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Scoped bindings plus the expander used to interpret context strings.
#[derive(Debug, Clone)]
pub struct Keymap {
    expander: ContextExpander,
    global_scope: String,
    scopes: HashMap<String, Vec<Binding>>,
}

impl Keymap {
    pub fn new(config: &ShortcutConfig) -> Result<Self, KeymapError> {
        Ok(Self {
            expander: ContextExpander::from_config(config)?,
            global_scope: config.global_scope.trim().to_string(),
            scopes: HashMap::new(),
        })
    }

    /// Build a keymap from a JSON document.
    pub fn from_json_str(json: &str, config: &ShortcutConfig) -> Result<Self, KeymapError> {
        let file: KeymapFile =
            serde_json::from_str(json).map_err(|err| KeymapError::Parse(err.to_string()))?;
        Self::from_file(file, config)
    }

    pub fn from_file(file: KeymapFile, config: &ShortcutConfig) -> Result<Self, KeymapError> {
        let mut keymap = Self::new(config)?;
        for spec in file.bindings {
            keymap.insert(spec)?;
        }
        debug!(
            scopes = keymap.scopes.len(),
            bindings = keymap.len(),
            "loaded keymap"
        );
        Ok(keymap)
    }

    /// Add a binding. A later binding for the same scope and chord replaces the earlier one.
    pub fn insert(&mut self, spec: BindingSpec) -> Result<(), KeymapError> {
        let chord = KeyChord::parse(&spec.keys)?;
        let scope = self.canonical_scope(&spec.scope).ok_or_else(|| {
            KeymapError::EmptyScope {
                action: spec.action.clone(),
            }
        })?;

        let binding = Binding {
            chord,
            action: spec.action,
            description: spec.description,
        };

        let entries = self.scopes.entry(scope.clone()).or_default();
        match entries.iter_mut().find(|existing| existing.chord == binding.chord) {
            Some(existing) => {
                warn!(
                    scope = %scope,
                    keys = %binding.chord,
                    previous = %existing.action,
                    action = %binding.action,
                    "binding overrides an earlier one"
                );
                *existing = binding;
            }
            None => entries.push(binding),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.scopes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn expand(&self, context_key: &str) -> ExpandedContext {
        self.expander.expand(context_key)
    }

    /// Find the action bound to `chord` in `context_key`, most specific scope first,
    /// falling back to the global scope.
    pub fn resolve(&self, context_key: &str, chord: &KeyChord) -> Option<Resolution> {
        let expanded = self.expand(context_key);
        trace!(context_key, keys = %chord, ?expanded, "resolving shortcut");

        for scope in self.lookup_order(&expanded) {
            let hit = self
                .scopes
                .get(scope)
                .and_then(|bindings| bindings.iter().find(|b| &b.chord == chord));
            if let Some(binding) = hit {
                trace!(scope, action = %binding.action, "shortcut matched");
                return Some(Resolution {
                    action: binding.action.clone(),
                    scope: scope.to_string(),
                });
            }
        }

        trace!(context_key, keys = %chord, "no binding");
        None
    }

    /// Every binding reachable in `context_key`; chords shadowed by a more specific
    /// scope appear only once.
    pub fn active_bindings(&self, context_key: &str) -> Vec<ActiveBinding> {
        let expanded = self.expand(context_key);
        let mut seen: HashSet<&KeyChord> = HashSet::new();
        let mut active = Vec::new();

        for scope in self.lookup_order(&expanded) {
            let Some(bindings) = self.scopes.get(scope) else {
                continue;
            };
            for binding in bindings {
                if seen.insert(&binding.chord) {
                    active.push(ActiveBinding {
                        scope: scope.to_string(),
                        keys: binding.chord.to_string(),
                        action: binding.action.clone(),
                        description: binding.description.clone(),
                    });
                }
            }
        }

        active
    }

    fn lookup_order<'a>(&'a self, expanded: &'a ExpandedContext) -> Vec<&'a str> {
        let mut order: Vec<&str> = expanded.most_specific_first().collect();
        if !self.global_scope.is_empty() && !expanded.contains(&self.global_scope) {
            order.push(&self.global_scope);
        }
        order
    }

    fn canonical_scope(&self, raw: &str) -> Option<String> {
        if raw.trim() == self.global_scope && !self.global_scope.is_empty() {
            return Some(self.global_scope.clone());
        }
        self.expander.scope_path(raw).map(|path| path.to_string())
    }
}

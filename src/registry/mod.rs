//! Command host: markup-driven commands over a state document.
//!
//! A script is an element tree whose root's children are command elements.
//! Each element name maps to a `CommandFactory`; factories turn markup into
//! runnable `Command` values at load time, so attribute mistakes surface
//! before any command executes. Commands then run in document order against
//! one shared `ScriptContext`.

mod compare;

pub use compare::{CompareCommand, CompareCommandFactory};

use indexmap::IndexMap;

use crate::config::CompareOptions;
use crate::error::{DocDiffError, Result};
use crate::model::{Element, SchemaCatalog};

/// Shared state one script run threads through its commands.
#[derive(Debug, Clone)]
pub struct ScriptContext {
    /// Document state commands read and write
    pub state: Element,
    /// Loaded schema catalog; empty when no catalog file was given
    pub catalog: SchemaCatalog,
    /// Engine defaults taken from configuration
    pub defaults: CompareOptions,
}

impl ScriptContext {
    /// Create a context over a state document with an empty catalog and
    /// default engine options.
    pub fn new(state: Element) -> Self {
        Self {
            state,
            catalog: SchemaCatalog::default(),
            defaults: CompareOptions::default(),
        }
    }

    /// Attach a schema catalog.
    pub fn with_catalog(mut self, catalog: SchemaCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Attach engine defaults.
    pub fn with_defaults(mut self, defaults: CompareOptions) -> Self {
        self.defaults = defaults;
        self
    }
}

/// A runnable command constructed from script markup.
pub trait Command: Send + Sync {
    /// The command's element name.
    fn name(&self) -> &str;

    /// Execute against the shared context.
    fn run(&self, ctx: &mut ScriptContext) -> Result<()>;
}

/// Builds commands from markup elements.
pub trait CommandFactory: Send + Sync {
    /// Construct a command from its markup element.
    ///
    /// All attribute validation happens here, not at run time.
    fn create(&self, markup: &Element) -> Result<Box<dyn Command>>;

    /// Element names this factory serves.
    fn command_element_names(&self) -> &'static [&'static str];
}

/// Maps command element names to their factories.
pub struct CommandRegistry {
    factories: Vec<Box<dyn CommandFactory>>,
    by_name: IndexMap<&'static str, usize>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            by_name: IndexMap::new(),
        }
    }

    /// Create a registry with every built-in command registered.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CompareCommandFactory));
        registry
    }

    /// Register a factory under every element name it serves.
    pub fn register(&mut self, factory: Box<dyn CommandFactory>) {
        let idx = self.factories.len();
        for name in factory.command_element_names() {
            self.by_name.insert(name, idx);
        }
        self.factories.push(factory);
    }

    /// Element names with a registered factory.
    pub fn known_commands(&self) -> Vec<&'static str> {
        self.by_name.keys().copied().collect()
    }

    /// Construct the command for one markup element.
    pub fn create(&self, markup: &Element) -> Result<Box<dyn Command>> {
        match self.by_name.get(markup.tag.as_str()) {
            Some(idx) => self.factories[*idx].create(markup),
            None => Err(DocDiffError::validation(format!(
                "unknown command element <{}>; known commands: {}",
                markup.tag,
                self.known_commands().join(", ")
            ))),
        }
    }

    /// Construct every command of a script, in document order.
    ///
    /// Fails on the first unknown element or invalid attribute, before
    /// anything has run.
    pub fn load_script(&self, script_root: &Element) -> Result<Vec<Box<dyn Command>>> {
        script_root
            .children
            .iter()
            .map(|markup| self.create(markup))
            .collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

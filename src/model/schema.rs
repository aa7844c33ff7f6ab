//! Schema catalog: modules, descriptor bindings and mapset enumerations.
//!
//! A catalog file (YAML or JSON) holds named modules. Each module maps
//! element locations to type descriptors (`bindings`) and type descriptors
//! to code→label enumerations (`mapsets`). Binding keys starting with `/`
//! match the element's route from the root (ordinals ignored); all other
//! keys match a bare tag name. A route binding wins over a tag binding.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DocDiffError, Result, SchemaErrorKind};

use super::Element;

/// A schema-scoped enumeration of (code, label) pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapset {
    pub entries: IndexMap<String, String>,
}

impl Mapset {
    /// Look up the display label for a raw code
    #[must_use]
    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One named schema module: the unit a compare invocation references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaModule {
    pub name: String,
    /// Element location (tag or `/`-prefixed route) → descriptor name
    #[serde(default)]
    pub bindings: IndexMap<String, String>,
    /// Descriptor name → mapset
    #[serde(default)]
    pub mapsets: IndexMap<String, Mapset>,
}

impl SchemaModule {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Mapset attached to a type descriptor, if any
    #[must_use]
    pub fn mapset_for(&self, descriptor: &str) -> Option<&Mapset> {
        self.mapsets.get(descriptor)
    }

    /// Walk a tree and set `descriptor` wherever a binding matches.
    ///
    /// Applied to owned, freshly loaded documents before comparison; the
    /// engine itself never mutates its inputs.
    pub fn bind(&self, root: &mut Element) {
        let route = format!("/{}", root.tag);
        self.bind_walk(root, &route);
    }

    fn bind_walk(&self, el: &mut Element, route: &str) {
        if let Some(descriptor) = self
            .bindings
            .get(route)
            .or_else(|| self.bindings.get(&el.tag))
        {
            el.descriptor = Some(descriptor.clone());
        }
        for child in &mut el.children {
            let child_route = format!("{route}/{}", child.tag);
            self.bind_walk(child, &child_route);
        }
    }
}

/// A named collection of schema modules loaded from a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    #[serde(default)]
    pub modules: Vec<SchemaModule>,
}

impl SchemaCatalog {
    /// Parse a catalog from YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            DocDiffError::schema(
                "parsing catalog",
                SchemaErrorKind::InvalidCatalog(e.to_string()),
            )
        })
    }

    /// Parse a catalog from JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            DocDiffError::schema(
                "parsing catalog",
                SchemaErrorKind::InvalidCatalog(e.to_string()),
            )
        })
    }

    /// Resolve a module by name.
    ///
    /// An unknown name is fatal and surfaces before any comparison work.
    pub fn get(&self, name: &str) -> Result<&SchemaModule> {
        self.modules
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| DocDiffError::module_not_found(name))
    }
}

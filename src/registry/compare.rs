//! The compare command: diff two resolved elements into a destination.

use tracing::debug;

use crate::annotate::DisplayStyle;
use crate::compare::{CompareEngine, RequestContext};
use crate::error::{DocDiffError, ErrorContext, Result};
use crate::model::Element;
use crate::registry::{Command, CommandFactory, ScriptContext};
use crate::select::{select_one, select_one_mut};

/// The new side's version label: written literally, or read from the text
/// of an element under the context-two element when given as a path.
#[derive(Debug, Clone, PartialEq)]
enum VersionRef {
    Literal(String),
    Path(String),
}

impl VersionRef {
    fn parse(raw: &str) -> Self {
        if raw.starts_with('/') || raw.starts_with("./") {
            Self::Path(raw.to_string())
        } else {
            Self::Literal(raw.to_string())
        }
    }

    fn resolve(&self, scope: &Element) -> Result<String> {
        match self {
            Self::Literal(label) => Ok(label.clone()),
            Self::Path(path) => {
                let el = select_one(scope, path)
                    .with_context(|| format!("resolving version-two path '{path}'"))?;
                Ok(el.text.clone().unwrap_or_default())
            }
        }
    }
}

/// Compare two versions of an element and replace the destination's content
/// with the annotated result.
///
/// Markup attributes:
/// - `context-one`, `context-two`, `context-out` (required) selector paths
///   for the old element, the new element, and the destination
/// - `version-two` (required) label for the new side, literal or path
/// - `version-one` accepted for compatibility, ignored
/// - `schema-module` (optional) module name in the loaded catalog
/// - `display-style` (optional) `legacy` or `hint`, default `legacy`
/// - `materialise-mapsets` (optional) boolean, default `false`
#[derive(Debug, Clone)]
pub struct CompareCommand {
    context_one: String,
    context_two: String,
    context_out: String,
    version_two: VersionRef,
    schema_module: Option<String>,
    display_style: DisplayStyle,
    materialise_mapsets: bool,
}

impl CompareCommand {
    pub const ELEMENT_NAME: &'static str = "compare";

    /// Construct from a markup element, validating every attribute.
    pub fn from_markup(markup: &Element) -> Result<Self> {
        let required = |name: &str| -> Result<String> {
            markup.attr(name).map(str::to_string).ok_or_else(|| {
                DocDiffError::validation(format!(
                    "<{}> requires the '{name}' attribute",
                    Self::ELEMENT_NAME
                ))
            })
        };

        let context_one = required("context-one")?;
        let context_two = required("context-two")?;
        let context_out = required("context-out")?;
        let version_two = VersionRef::parse(&required("version-two")?);
        // version-one is part of the historical markup surface; the old
        // side's label never appears in the output.
        let schema_module = markup.attr("schema-module").map(str::to_string);

        let display_style = match markup.attr("display-style") {
            Some(raw) => DisplayStyle::parse(raw).ok_or_else(|| {
                DocDiffError::validation(format!(
                    "invalid display-style '{raw}'; expected 'legacy' or 'hint'"
                ))
            })?,
            None => DisplayStyle::default(),
        };
        let materialise_mapsets = match markup.attr("materialise-mapsets") {
            Some(raw) => parse_bool(raw).ok_or_else(|| {
                DocDiffError::validation(format!(
                    "invalid materialise-mapsets '{raw}'; expected a boolean"
                ))
            })?,
            None => false,
        };

        Ok(Self {
            context_one,
            context_two,
            context_out,
            version_two,
            schema_module,
            display_style,
            materialise_mapsets,
        })
    }
}

impl Command for CompareCommand {
    fn name(&self) -> &str {
        Self::ELEMENT_NAME
    }

    fn run(&self, ctx: &mut ScriptContext) -> Result<()> {
        let module = match &self.schema_module {
            Some(name) => Some(ctx.catalog.get(name)?),
            None => None,
        };

        let old = select_one(&ctx.state, &self.context_one)
            .with_context(|| format!("resolving context-one '{}'", self.context_one))?;
        let new = select_one(&ctx.state, &self.context_two)
            .with_context(|| format!("resolving context-two '{}'", self.context_two))?;
        let label = self.version_two.resolve(new)?;

        let engine = CompareEngine::new(self.display_style)
            .with_identity_attribute(&ctx.defaults.identity_attribute);
        let request = RequestContext::new(Self::ELEMENT_NAME);
        let result = engine.compare_elements(
            &request,
            old,
            new,
            &label,
            module,
            self.materialise_mapsets,
        )?;

        debug!(
            context_out = self.context_out.as_str(),
            changes = result.summary.has_changes(),
            "writing comparison result"
        );

        let out = select_one_mut(&mut ctx.state, &self.context_out)
            .with_context(|| format!("resolving context-out '{}'", self.context_out))?;
        out.children.clear();
        out.text = None;
        out.add_child(result.root);
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Factory for `<compare>` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareCommandFactory;

impl CommandFactory for CompareCommandFactory {
    fn create(&self, markup: &Element) -> Result<Box<dyn Command>> {
        Ok(Box::new(CompareCommand::from_markup(markup)?))
    }

    fn command_element_names(&self) -> &'static [&'static str] {
        &[CompareCommand::ELEMENT_NAME]
    }
}

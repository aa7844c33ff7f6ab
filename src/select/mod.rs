//! Minimal path selector over element trees.
//!
//! Stands in for the host system's path-query component: `/order/items/item[2]`
//! addresses elements from the root, `./status` (or a bare `status`) addresses
//! children of a given element, ordinals are 1-based within a same-tag group,
//! and a step without an ordinal matches every member of the group. The
//! comparison engine never calls this module; the command host and the CLI do.

use crate::error::{DocDiffError, ResolveErrorKind, Result};
use crate::model::Element;

#[derive(Debug, Clone, PartialEq)]
struct PathStep {
    tag: String,
    ordinal: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
struct ParsedPath {
    absolute: bool,
    steps: Vec<PathStep>,
}

/// All elements matching a path, in document order.
pub fn select_all<'a>(root: &'a Element, path: &str) -> Result<Vec<&'a Element>> {
    let routes = resolve_routes(root, path)?;
    Ok(routes.iter().map(|route| walk(root, route)).collect())
}

/// The single element a path must resolve to.
///
/// Zero matches or more than one match are resolution errors naming the path.
pub fn select_one<'a>(root: &'a Element, path: &str) -> Result<&'a Element> {
    let routes = resolve_routes(root, path)?;
    let route = require_single(path, &routes)?;
    Ok(walk(root, route))
}

/// Mutable form of [`select_one`], used when a destination element's content
/// is about to be replaced.
pub fn select_one_mut<'a>(root: &'a mut Element, path: &str) -> Result<&'a mut Element> {
    let routes = resolve_routes(root, path)?;
    let route = require_single(path, &routes)?.clone();
    let mut current = root;
    for idx in route {
        current = &mut current.children[idx];
    }
    Ok(current)
}

fn require_single<'r>(path: &str, routes: &'r [Vec<usize>]) -> Result<&'r Vec<usize>> {
    match routes.len() {
        1 => Ok(&routes[0]),
        0 => Err(DocDiffError::resolve(
            "selecting element",
            ResolveErrorKind::NotFound {
                path: path.to_string(),
            },
        )),
        count => Err(DocDiffError::resolve(
            "selecting element",
            ResolveErrorKind::NotSingular {
                path: path.to_string(),
                count,
            },
        )),
    }
}

/// Resolve a path to child-index routes from the root, one per match.
fn resolve_routes(root: &Element, path: &str) -> Result<Vec<Vec<usize>>> {
    let parsed = parse_path(path)?;
    let mut steps = parsed.steps.as_slice();

    let mut current: Vec<Vec<usize>> = Vec::new();
    if parsed.absolute {
        // The first step names the root element itself.
        let first = &steps[0];
        steps = &steps[1..];
        if root.tag == first.tag && first.ordinal.unwrap_or(1) == 1 {
            current.push(Vec::new());
        }
    } else {
        current.push(Vec::new());
    }

    for step in steps {
        let mut next = Vec::new();
        for route in &current {
            let el = walk(root, route);
            let mut seen = 0usize;
            for (idx, child) in el.children.iter().enumerate() {
                if child.tag != step.tag {
                    continue;
                }
                seen += 1;
                let keep = match step.ordinal {
                    Some(wanted) => wanted == seen,
                    None => true,
                };
                if keep {
                    let mut extended = route.clone();
                    extended.push(idx);
                    next.push(extended);
                }
            }
        }
        current = next;
    }
    Ok(current)
}

fn walk<'a>(root: &'a Element, route: &[usize]) -> &'a Element {
    let mut el = root;
    for &idx in route {
        el = &el.children[idx];
    }
    el
}

fn parse_path(path: &str) -> Result<ParsedPath> {
    let invalid = |reason: &str| {
        DocDiffError::resolve(
            "parsing path",
            ResolveErrorKind::InvalidPath {
                path: path.to_string(),
                reason: reason.to_string(),
            },
        )
    };

    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty path"));
    }
    if trimmed == "." {
        return Ok(ParsedPath {
            absolute: false,
            steps: Vec::new(),
        });
    }

    let (absolute, rest) = if let Some(rest) = trimmed.strip_prefix("./") {
        (false, rest)
    } else if let Some(rest) = trimmed.strip_prefix('/') {
        (true, rest)
    } else {
        (false, trimmed)
    };
    if rest.is_empty() {
        return Err(invalid("missing element name"));
    }

    let mut steps = Vec::new();
    for segment in rest.split('/') {
        if segment.is_empty() {
            return Err(invalid("empty path segment"));
        }
        let (tag, ordinal) = match segment.find('[') {
            Some(open) => {
                let closed = segment
                    .strip_suffix(']')
                    .ok_or_else(|| invalid("unterminated ordinal"))?;
                let ordinal: usize = closed[open + 1..]
                    .parse()
                    .map_err(|_| invalid("ordinal is not a number"))?;
                if ordinal == 0 {
                    return Err(invalid("ordinals are 1-based"));
                }
                (&segment[..open], Some(ordinal))
            }
            None => (segment, None),
        };
        if tag.is_empty() {
            return Err(invalid("missing element name before ordinal"));
        }
        steps.push(PathStep {
            tag: tag.to_string(),
            ordinal,
        });
    }
    Ok(ParsedPath { absolute, steps })
}

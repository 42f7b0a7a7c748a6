//! Construction of score trees from dynamic key-value data.
//!
//! Trees are usually assembled in code, but scoring setups are often kept
//! in data files. This module accepts TOML documents (or any already parsed
//! `toml::Value`) of the following shape:
//!
//! ```toml
//! colorized = false          # optional, default true
//! weight_tolerance = 1e-9    # optional
//!
//! [[items]]
//! name = "Track 1"
//! weight = 1
//!
//!   [[items.items]]
//!   name = "Top speed (m/s)"
//!   weight = 1.0
//!   range = [0, 100]
//!   value = 48.12            # optional, default 0
//!   inverse = false          # optional, default false
//! ```
//!
//! A table holding `items` is an area, a table holding `range` is a score.
//! Every type violation in the document is reported at once; value checks
//! (weight sums, zero-span ranges) run once the shape is right and are
//! likewise accumulated.

use crate::builders::{AreaBuilder, NodeBuilder, ScoreBuilder, ScoreTreeBuilder};
use crate::core::{ScoreNode, ScoreTree};
use crate::errors::{Result, ScoreTreeError};
use crate::validation::FieldPath;
use toml::{Table, Value};
use tracing::debug;

/// Parse a TOML document into a validated tree.
///
/// ```
/// use scoretree::definition::tree_from_toml_str;
///
/// let tree = tree_from_toml_str(r#"
///     colorized = false
///
///     [[items]]
///     name = "speed"
///     weight = 1
///     range = [0, 10]
///     value = 5
/// "#)?;
/// assert_eq!(tree.to_string(), "Speed (100.00%): 50.00%");
/// # Ok::<(), scoretree::ScoreTreeError>(())
/// ```
pub fn tree_from_toml_str(source: &str) -> Result<ScoreTree> {
    let table = toml::from_str::<Table>(source).map_err(|e| {
        ScoreTreeError::value(
            &FieldPath::root(),
            "definition is not a valid TOML document",
            "TOML document",
            e.message().to_string(),
        )
    })?;
    tree_from_value(&Value::Table(table))
}

/// Build a tree from a table with an `items` array.
pub fn tree_from_value(value: &Value) -> Result<ScoreTree> {
    let mut errors = Vec::new();
    let builder = tree_builder(value, &mut errors);

    match (builder, ScoreTreeError::from_violations(errors)) {
        (_, Some(error)) => Err(error),
        (Some(builder), None) => builder.build(),
        (None, None) => Err(type_error(&FieldPath::root(), "table", value)),
    }
}

/// Build a single score or area from a table.
pub fn node_from_value(value: &Value) -> Result<ScoreNode> {
    let mut errors = Vec::new();
    let builder = node_builder(value, &FieldPath::root(), &mut errors);

    match (builder, ScoreTreeError::from_violations(errors)) {
        (_, Some(error)) => Err(error),
        (Some(NodeBuilder::Score(score)), None) => score.build().map(ScoreNode::Score),
        (Some(NodeBuilder::Area(area)), None) => area.build().map(ScoreNode::Area),
        (Some(NodeBuilder::Node(node)), None) => Ok(node),
        (None, None) => Err(type_error(&FieldPath::root(), "Score or ScoreArea table", value)),
    }
}

fn tree_builder(value: &Value, errors: &mut Vec<ScoreTreeError>) -> Option<ScoreTreeBuilder> {
    let root = FieldPath::root();
    let Some(table) = value.as_table() else {
        errors.push(type_error(&root, "table", value));
        return None;
    };

    let mut builder = ScoreTreeBuilder::new();
    if let Some(colorized) = optional(table, "colorized", &root, errors, Value::as_bool, "boolean") {
        builder = builder.colorized(colorized);
    }
    if let Some(tolerance) = optional(table, "weight_tolerance", &root, errors, as_number, "number") {
        builder = builder.tolerance(tolerance);
    }

    let items = children(table, &root, errors)?;
    debug!(items = items.len(), "Score tree definition parsed");
    Some(builder.items(items))
}

fn node_builder(
    value: &Value,
    path: &FieldPath,
    errors: &mut Vec<ScoreTreeError>,
) -> Option<NodeBuilder> {
    let Some(table) = value.as_table() else {
        errors.push(type_error(path, "Score or ScoreArea table", value));
        return None;
    };

    if table.contains_key("items") {
        area_builder(table, path, errors).map(NodeBuilder::Area)
    } else if table.contains_key("range") {
        score_builder(table, path, errors).map(NodeBuilder::Score)
    } else {
        errors.push(ScoreTreeError::type_mismatch(
            path,
            "Score or ScoreArea table",
            "table without items or range",
        ));
        None
    }
}

fn area_builder(
    table: &Table,
    path: &FieldPath,
    errors: &mut Vec<ScoreTreeError>,
) -> Option<AreaBuilder> {
    let name = required(table, "name", path, errors, Value::as_str, "string");
    let weight = required(table, "weight", path, errors, as_number, "number");
    let items = children(table, path, errors);

    Some(AreaBuilder::new(name?).weight(weight?).items(items?))
}

fn score_builder(
    table: &Table,
    path: &FieldPath,
    errors: &mut Vec<ScoreTreeError>,
) -> Option<ScoreBuilder> {
    let name = required(table, "name", path, errors, Value::as_str, "string");
    let weight = required(table, "weight", path, errors, as_number, "number");
    let range = table
        .get("range")
        .and_then(|value| range_bounds(value, &path.push("range"), errors));
    let value = optional(table, "value", path, errors, as_number, "number");
    let inverse = optional(table, "inverse", path, errors, Value::as_bool, "boolean");

    Some(
        ScoreBuilder::new(name?)
            .weight(weight?)
            .range(range?.0, range?.1)
            .value(value.unwrap_or(0.0))
            .inverse(inverse.unwrap_or(false)),
    )
}

/// The `items` array of an area or tree; every child is inspected even
/// after a bad one.
fn children(
    table: &Table,
    path: &FieldPath,
    errors: &mut Vec<ScoreTreeError>,
) -> Option<Vec<NodeBuilder>> {
    let field = path.push("items");
    let Some(value) = table.get("items") else {
        errors.push(ScoreTreeError::type_mismatch(&field, "array", "nothing"));
        return None;
    };
    let Some(items) = value.as_array() else {
        errors.push(type_error(&field, "array", value));
        return None;
    };

    let built: Vec<Option<NodeBuilder>> = items
        .iter()
        .enumerate()
        .map(|(index, item)| node_builder(item, &item_path(path, index), errors))
        .collect();
    built.into_iter().collect()
}

fn range_bounds(
    value: &Value,
    field: &FieldPath,
    errors: &mut Vec<ScoreTreeError>,
) -> Option<(f64, f64)> {
    let Some(bounds) = value.as_array() else {
        errors.push(type_error(field, "array", value));
        return None;
    };
    if bounds.len() != 2 {
        errors.push(ScoreTreeError::value(
            field,
            "range must hold exactly two bounds",
            "2",
            bounds.len().to_string(),
        ));
        return None;
    }

    let min = number_at(&bounds[0], &field.push("min"), errors);
    let max = number_at(&bounds[1], &field.push("max"), errors);
    Some((min?, max?))
}

fn number_at(value: &Value, field: &FieldPath, errors: &mut Vec<ScoreTreeError>) -> Option<f64> {
    let number = as_number(value);
    if number.is_none() {
        errors.push(type_error(field, "number", value));
    }
    number
}

fn required<'a, T>(
    table: &'a Table,
    key: &str,
    path: &FieldPath,
    errors: &mut Vec<ScoreTreeError>,
    extract: impl Fn(&'a Value) -> Option<T>,
    expected: &str,
) -> Option<T> {
    let field = path.push(key);
    match table.get(key) {
        Some(value) => extract_or_report(value, &field, errors, extract, expected),
        None => {
            errors.push(ScoreTreeError::type_mismatch(&field, expected, "nothing"));
            None
        }
    }
}

fn optional<'a, T>(
    table: &'a Table,
    key: &str,
    path: &FieldPath,
    errors: &mut Vec<ScoreTreeError>,
    extract: impl Fn(&'a Value) -> Option<T>,
    expected: &str,
) -> Option<T> {
    let value = table.get(key)?;
    extract_or_report(value, &path.push(key), errors, extract, expected)
}

fn extract_or_report<'a, T>(
    value: &'a Value,
    field: &FieldPath,
    errors: &mut Vec<ScoreTreeError>,
    extract: impl Fn(&'a Value) -> Option<T>,
    expected: &str,
) -> Option<T> {
    let extracted = extract(value);
    if extracted.is_none() {
        errors.push(type_error(field, expected, value));
    }
    extracted
}

/// Integers are accepted wherever reals are expected.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Float(number) => Some(*number),
        Value::Integer(number) => Some(*number as f64),
        _ => None,
    }
}

fn item_path(parent: &FieldPath, index: usize) -> FieldPath {
    parent.push(format!("items[{}]", index))
}

fn type_error(field: &FieldPath, expected: &str, value: &Value) -> ScoreTreeError {
    ScoreTreeError::type_mismatch(field, expected, value.type_str())
}

//! Threading decoded values into a parameter tree.
//!
//! [`insert`] walks a [`KeyPath`] from the root map, creating containers as
//! the path asks for them:
//!
//! - `Name(k)` needs a map and descends into `map[k]`.
//! - `Anonymous` needs a list. At the end of the path it appends the value.
//!   Before another `Anonymous` it appends a fresh list. Before `Name(k)` it
//!   either continues the last row (a map element) or starts a new one.
//! - At the end of the path, a scalar slot is overwritten (last write wins)
//!   but a container slot is a conflict.
//!
//! A row is continued while the named segments that follow can still be
//! placed in it without overwriting anything. So
//! `users[][id]=1&users[][name]=ross&users[][id]=2` produces two rows: the
//! second `id` would collide with the first one.

use crate::error::ParamsError;
use crate::path::{KeyPath, PathSegment};
use crate::value::{Map, Value};

const MAP: &str = "map";
const LIST: &str = "list";
const SCALAR: &str = "scalar";

/// Insert `value` at `path` inside `root`.
///
/// On error the tree may hold part of the insertion; callers discard it.
pub fn insert(root: &mut Map, path: &KeyPath, value: Value) -> Result<(), ParamsError> {
    let inserter = Inserter { key: path.raw() };
    let segments = path.segments();
    match segments.split_first() {
        Some((PathSegment::Name(name), rest)) => inserter.assign(root, name, rest, value),
        _ => Err(ParamsError::BadParams {
            key: path.raw().to_string(),
        }),
    }
}

struct Inserter<'k> {
    key: &'k str,
}

impl Inserter<'_> {
    fn conflict(&self, expected: &'static str, found: &Value) -> ParamsError {
        ParamsError::TypeConflict {
            key: self.key.to_string(),
            expected,
            found: found.kind_name(),
        }
    }

    /// Place the remainder of a path under `map[name]`.
    fn assign(
        &self,
        map: &mut Map,
        name: &str,
        rest: &[PathSegment],
        value: Value,
    ) -> Result<(), ParamsError> {
        let Some((next, after)) = rest.split_first() else {
            return match map.get_mut(name) {
                Some(existing) if existing.is_container() => Err(self.conflict(SCALAR, existing)),
                Some(existing) => {
                    *existing = value;
                    Ok(())
                }
                None => {
                    map.insert(name.to_string(), value);
                    Ok(())
                }
            };
        };

        let node = map
            .entry(name.to_string())
            .or_insert_with(|| empty_container(next));
        self.descend(node, next, after, value)
    }

    /// Apply `segment` to `node`, which must already hold the matching kind.
    fn descend(
        &self,
        node: &mut Value,
        segment: &PathSegment,
        rest: &[PathSegment],
        value: Value,
    ) -> Result<(), ParamsError> {
        match (segment, node) {
            (PathSegment::Name(name), Value::Map(map)) => self.assign(map, name, rest, value),
            (PathSegment::Anonymous, Value::List(items)) => self.push(items, rest, value),
            (PathSegment::Name(_), other) => Err(self.conflict(MAP, other)),
            (PathSegment::Anonymous, other) => Err(self.conflict(LIST, other)),
        }
    }

    /// Handle the segments after an `Anonymous` marker.
    fn push(&self, items: &mut Vec<Value>, rest: &[PathSegment], value: Value) -> Result<(), ParamsError> {
        let Some((next, after)) = rest.split_first() else {
            items.push(value);
            return Ok(());
        };

        let new_element = match next {
            PathSegment::Anonymous => true,
            PathSegment::Name(_) => !self.continues_row(items, rest)?,
        };
        if new_element {
            items.push(empty_container(next));
        }
        let last = items.len() - 1;
        self.descend(&mut items[last], next, after, value)
    }

    /// Decide whether the named run at the head of `rest` still fits into the
    /// last row of `items`.
    ///
    /// The run is looked up inside the row. Reaching an absent key means the
    /// row has room; reaching the end of the run means the path is already
    /// taken and a new row starts. A first key holding a non-map also starts a
    /// new row, but a non-map met deeper while the run continues is a conflict.
    fn continues_row(&self, items: &[Value], rest: &[PathSegment]) -> Result<bool, ParamsError> {
        let Some(last) = items.last() else {
            return Ok(false);
        };
        let Value::Map(row) = last else {
            return Err(self.conflict(MAP, last));
        };

        let mut names = rest.iter().map_while(PathSegment::name);
        let Some(first) = names.next() else {
            return Ok(false);
        };
        let mut found = match row.get(first) {
            None => return Ok(true),
            Some(found @ Value::Map(_)) => found,
            Some(_) => return Ok(false),
        };

        for name in names {
            let Value::Map(map) = found else {
                return Err(self.conflict(MAP, found));
            };
            match map.get(name) {
                None => return Ok(true),
                Some(next) => found = next,
            }
        }

        Ok(false)
    }
}

fn empty_container(next: &PathSegment) -> Value {
    match next {
        PathSegment::Name(_) => Value::Map(Map::new()),
        PathSegment::Anonymous => Value::List(Vec::new()),
    }
}

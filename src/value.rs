use indexmap::IndexMap;

/// An ordered key → value mapping. Iteration follows first insertion.
pub type Map = IndexMap<String, Value>;

/// A node of a reconstructed parameter tree.
///
/// The root of every parse result is a [`Map`]. Below it, each node keeps the
/// kind it was first given: a path that needs a `Map` where a `List` exists
/// (or the other way round) is rejected as a type conflict.
///
/// # Examples
///
/// ```
/// use paramtree::{Map, Value, parse_query, ParseOptions};
///
/// let params = parse_query("names[]=ross&names[]=chandler&age", &ParseOptions::default()).unwrap();
///
/// assert_eq!(
///     params["names"],
///     Value::List(vec![Value::from("ross"), Value::from("chandler")])
/// );
/// assert_eq!(params["age"], Value::Null);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A key that appeared without `=`
    Null,

    /// A decoded leaf string
    Scalar(String),

    /// Values appended through `[]`, in append order
    List(Vec<Value>),

    /// Values addressed through `[name]`, in first-occurrence order
    Map(Map),

    /// An uploaded file streamed to a caller-owned sink
    File(FileRef),
}

/// Identifies one stored upload inside the [`SinkFactory`](crate::multipart::SinkFactory)
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileHandle(pub u64);

/// Leaf recorded for a multipart file part.
///
/// The tree only holds the reference. The bytes stay with the sink factory
/// and are resolved through [`FileRef::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// The `filename` from `Content-Disposition` (possibly empty)
    pub filename: String,
    /// The part's `Content-Type`, if it sent one
    pub content_type: Option<String>,
    /// Number of body bytes written to the sink
    pub size: u64,
    pub handle: FileHandle,
}

impl Value {
    /// Kind name used in type-conflict errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Scalar(_) => "scalar",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::File(_) => "file",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            Value::File(file) => Some(file),
            _ => None,
        }
    }

    /// Look up `key` when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

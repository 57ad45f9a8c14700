//! Insert oplog definition.
//!
//! Most oplog information comes from here:
//! https://github.com/mongodb/mongo/blob/master/src/mongo/db/repl/oplog_entry.idl
//!
//! Useful fields:
//! op: The operation type. (enum Optype)
//! ns: The namespace on which to apply the operation. (String)
//! o: The operation applied. (Document)
//!
//! For `op` field, the definition of OpType:
//! "c": Command
//! "i": Insert
//! "u": Update
//! "d": Delete
//! "n": Noop
//!
//! Only "i" can be translated, other fields of an oplog entry (`ts`, `v`, `wall`, ...) are ignored.

use bson::document::ValueAccessError;
use bson::{Bson, Document};
use serde_json::Value;
use std::fmt;

use crate::literal::SqlLiteral;
use crate::{Result, TranslateError, INSERT_OP, NAMESPACE_KEY, OBJ_KEY, OP_KEY};

/// collection namespace.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CollNs<'a> {
    /// database name.
    db_name: &'a str,
    /// collection name.
    coll_name: &'a str,
}

impl<'a> CollNs<'a> {
    /// construct a namespace from `db_name` and `coll_name`.
    pub fn new(db_name: &'a str, coll_name: &'a str) -> Self {
        CollNs { db_name, coll_name }
    }

    /// Parse oplog namespace `ns`, which is `<database>.<collection>`.
    ///
    /// It's split on the first `.`, so collection name itself can contains `.`.
    ///
    /// # Example
    /// ```
    /// use oplog2sql::oplog::CollNs;
    /// assert_eq!(CollNs::parse("local.oplog.rs").unwrap(), CollNs::new("local", "oplog.rs"));
    /// assert!(CollNs::parse("test").is_err());
    /// ```
    pub fn parse(ns: &'a str) -> Result<Self> {
        match ns.split_once('.') {
            Some((db_name, coll_name)) if !db_name.is_empty() && !coll_name.is_empty() => {
                Ok(CollNs::new(db_name, coll_name))
            }
            _ => Err(TranslateError::NamespaceFormat { ns: ns.to_string() }),
        }
    }

    /// get database name.
    pub fn db_name(&self) -> &'a str {
        self.db_name
    }

    /// get collection name.
    pub fn coll_name(&self) -> &'a str {
        self.coll_name
    }
}

impl fmt::Display for CollNs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.db_name, self.coll_name)
    }
}

/// Structured insert oplog, borrows from the parsed oplog entry.
///
/// Use [InsertOplog::from_value] or [InsertOplog::from_doc] to create it,
/// and then use [to_sql](InsertOplog::to_sql) to get the relative sql statement.
#[derive(Debug, PartialEq)]
pub struct InsertOplog<'a> {
    ns: CollNs<'a>,
    /// document fields, in the order of the source document.
    fields: Vec<(&'a str, SqlLiteral<'a>)>,
}

impl<'a> InsertOplog<'a> {
    /// Parse a json oplog entry.
    ///
    /// # Example
    /// ```
    /// use oplog2sql::oplog::{CollNs, InsertOplog};
    /// use serde_json::json;
    /// let entry = json!({"op": "i", "ns": "a.b", "o": {"x": 1}});
    /// let oplog = InsertOplog::from_value(&entry).unwrap();
    /// assert_eq!(oplog.ns(), CollNs::new("a", "b"));
    /// assert_eq!(oplog.to_sql(), "INSERT INTO a.b (x) VALUES (1);");
    /// ```
    pub fn from_value(entry: &'a Value) -> Result<Self> {
        let entry = entry
            .as_object()
            .ok_or_else(|| TranslateError::schema("", "oplog entry should be an object"))?;

        match entry.get(OP_KEY) {
            None => return Err(missing(OP_KEY)),
            Some(Value::String(op)) if op == INSERT_OP => {}
            Some(Value::String(op)) => return Err(unsupported_op(op)),
            Some(other) => return Err(unsupported_op(&other.to_string())),
        }

        let ns = match entry.get(NAMESPACE_KEY) {
            None => return Err(missing(NAMESPACE_KEY)),
            Some(Value::String(ns)) => CollNs::parse(ns)?,
            Some(_) => return Err(TranslateError::schema(NAMESPACE_KEY, "should be a string")),
        };

        let obj = match entry.get(OBJ_KEY) {
            None => return Err(missing(OBJ_KEY)),
            Some(Value::Object(obj)) => obj,
            Some(_) => return Err(TranslateError::schema(OBJ_KEY, "should be an object")),
        };
        let fields = obj
            .iter()
            .map(|(name, value)| {
                SqlLiteral::from_json(name, value).map(|literal| (name.as_str(), literal))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(InsertOplog { ns, fields })
    }

    /// Parse a bson oplog entry, just like what is saved in `local.oplog.rs`.
    pub fn from_doc(doc: &'a Document) -> Result<Self> {
        match doc.get(OP_KEY) {
            None => return Err(missing(OP_KEY)),
            Some(Bson::String(op)) if op == INSERT_OP => {}
            Some(Bson::String(op)) => return Err(unsupported_op(op)),
            Some(other) => return Err(unsupported_op(&other.to_string())),
        }

        let ns = doc
            .get_str(NAMESPACE_KEY)
            .map_err(|e| access_error(NAMESPACE_KEY, e, "should be a string"))?;
        let ns = CollNs::parse(ns)?;

        let obj = doc
            .get_document(OBJ_KEY)
            .map_err(|e| access_error(OBJ_KEY, e, "should be a document"))?;
        let fields = obj
            .iter()
            .map(|(name, value)| {
                SqlLiteral::from_bson(name, value).map(|literal| (name.as_str(), literal))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(InsertOplog { ns, fields })
    }

    /// get target namespace.
    pub fn ns(&self) -> CollNs<'a> {
        self.ns
    }

    /// get document fields and their literals.
    pub fn fields(&self) -> &[(&'a str, SqlLiteral<'a>)] {
        &self.fields
    }

    /// Make the sql insert statement.
    ///
    /// Columns and values keep the document field order, and no trailing newline is added.
    pub fn to_sql(&self) -> String {
        let columns = self
            .fields
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ");
        let values = self
            .fields
            .iter()
            .map(|(_, literal)| literal.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT INTO {} ({}) VALUES ({});", self.ns, columns, values)
    }
}

fn missing(field: &str) -> TranslateError {
    TranslateError::schema(field, "is missing")
}

fn unsupported_op(op: &str) -> TranslateError {
    TranslateError::UnsupportedOperation { op: op.to_string() }
}

fn access_error(field: &str, err: ValueAccessError, unexpected: &str) -> TranslateError {
    match err {
        ValueAccessError::NotPresent => missing(field),
        _ => TranslateError::schema(field, unexpected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde_json::json;

    #[test]
    fn test_coll_ns_parse() {
        assert_eq!(CollNs::parse("test.student").unwrap(), CollNs::new("test", "student"));
        let ns = CollNs::parse("a.b.c").unwrap();
        assert_eq!(ns, CollNs::new("a", "b.c"));
        assert_eq!(ns.db_name(), "a");
        assert_eq!(ns.coll_name(), "b.c");
        assert_eq!(ns.to_string(), "a.b.c");
    }

    #[test]
    fn test_coll_ns_parse_invalid() {
        for ns in ["test", "", ".", "test.", ".student"] {
            match CollNs::parse(ns) {
                Err(TranslateError::NamespaceFormat { ns: raw }) => assert_eq!(raw, ns),
                other => panic!("expect namespace format error for {:?}, get {:?}", ns, other),
            }
        }
    }

    #[test]
    fn test_insert_oplog_from_value() {
        let entry = json!({"op": "i", "ns": "test.student", "o": {"b": "x", "a": 2, "c": true}});
        let oplog = InsertOplog::from_value(&entry).unwrap();

        assert_eq!(oplog.ns(), CollNs::new("test", "student"));
        assert_eq!(
            oplog.fields(),
            &[
                ("b", SqlLiteral::Str("x")),
                ("a", SqlLiteral::Number("2".to_string())),
                ("c", SqlLiteral::Bool(true)),
            ]
        );
    }

    #[test]
    fn test_insert_oplog_from_value_non_object_entry() {
        let entry = json!(["op", "i"]);
        assert!(matches!(
            InsertOplog::from_value(&entry),
            Err(TranslateError::Schema { .. })
        ));
    }

    #[test]
    fn test_insert_oplog_from_value_non_string_op() {
        let entry = json!({"op": 1, "ns": "a.b", "o": {}});
        match InsertOplog::from_value(&entry) {
            Err(TranslateError::UnsupportedOperation { op }) => assert_eq!(op, "1"),
            other => panic!("expect unsupported operation error, get {:?}", other),
        }
    }

    #[test]
    fn test_insert_oplog_from_value_non_string_ns() {
        let entry = json!({"op": "i", "ns": 3, "o": {}});
        match InsertOplog::from_value(&entry) {
            Err(TranslateError::Schema { field, .. }) => assert_eq!(field, "ns"),
            other => panic!("expect schema error, get {:?}", other),
        }
    }

    #[test]
    fn test_insert_oplog_from_doc_ignores_extra_keys() {
        let doc = doc! {
            "ts": bson::Timestamp { time: 10, increment: 1 },
            "v": 2,
            "op": "i",
            "ns": "test.student",
            "o": {"name": "neil", "roll_no": 53},
        };
        let oplog = InsertOplog::from_doc(&doc).unwrap();
        assert_eq!(
            oplog.to_sql(),
            "INSERT INTO test.student (name, roll_no) VALUES ('neil', 53);"
        );
    }

    #[test]
    fn test_insert_oplog_from_doc_missing_and_wrong_type() {
        let no_ns = doc! {"op": "i", "o": {}};
        match InsertOplog::from_doc(&no_ns) {
            Err(TranslateError::Schema { field, reason }) => {
                assert_eq!(field, "ns");
                assert_eq!(reason, "is missing");
            }
            other => panic!("expect schema error, get {:?}", other),
        }

        let bad_obj = doc! {"op": "i", "ns": "a.b", "o": "x"};
        match InsertOplog::from_doc(&bad_obj) {
            Err(TranslateError::Schema { field, .. }) => assert_eq!(field, "o"),
            other => panic!("expect schema error, get {:?}", other),
        }
    }

    #[test]
    fn test_to_sql_empty_document() {
        let entry = json!({"op": "i", "ns": "test.student", "o": {}});
        let oplog = InsertOplog::from_value(&entry).unwrap();
        assert_eq!(oplog.to_sql(), "INSERT INTO test.student () VALUES ();");
    }
}

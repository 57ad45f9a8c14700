use bson::Document;
use serde_json::Value;
use tracing::debug;

use crate::oplog::InsertOplog;
use crate::{EmptyDocument, Result, TranslateConf, TranslateError, OBJ_KEY};

/// Translate one insert oplog into sql insert statement.
///
/// It holds no state between calls, so it can be shared by as many threads as you like.
#[derive(Debug, Default, Clone, Copy)]
pub struct Translator {
    conf: TranslateConf,
}

impl Translator {
    /// create a new translator from given `conf`.
    pub fn new(conf: TranslateConf) -> Self {
        Translator { conf }
    }

    /// Translate oplog json text.
    ///
    /// # Example
    /// ```
    /// use oplog2sql::{Translator, TranslateError};
    /// let translator = Translator::default();
    /// let result = translator.translate(r#"{"op": "u", "ns": "test.student", "o": {}}"#);
    /// assert!(matches!(result, Err(TranslateError::UnsupportedOperation { .. })));
    /// ```
    pub fn translate(&self, oplog_json: &str) -> Result<String> {
        let entry: Value = serde_json::from_str(oplog_json)?;
        self.translate_value(&entry)
    }

    /// Translate oplog json bytes, bytes which are not utf-8 fail as [TranslateError::Parse].
    pub fn translate_slice(&self, oplog_json: &[u8]) -> Result<String> {
        let entry: Value = serde_json::from_slice(oplog_json)?;
        self.translate_value(&entry)
    }

    /// Translate oplog which is already parsed as json value.
    pub fn translate_value(&self, entry: &Value) -> Result<String> {
        self.make_sql(InsertOplog::from_value(entry)?)
    }

    /// Translate bson oplog document.
    pub fn translate_doc(&self, doc: &Document) -> Result<String> {
        self.make_sql(InsertOplog::from_doc(doc)?)
    }

    fn make_sql(&self, oplog: InsertOplog) -> Result<String> {
        if oplog.fields().is_empty() && self.conf.get_empty_document() == EmptyDocument::Reject {
            return Err(TranslateError::schema(OBJ_KEY, "document has no fields"));
        }
        let sql = oplog.to_sql();
        debug!(ns = %oplog.ns(), columns = oplog.fields().len(), "Translate insert oplog complete.");
        Ok(sql)
    }
}

/// Translate oplog json text with default configuration.
pub fn translate(oplog_json: &str) -> Result<String> {
    Translator::default().translate(oplog_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_translate_empty_document_emit() {
        let sql = translate(r#"{"op": "i", "ns": "test.student", "o": {}}"#).unwrap();
        assert_eq!(sql, "INSERT INTO test.student () VALUES ();");
    }

    #[test]
    fn test_translate_empty_document_reject() {
        let translator = Translator::new(TranslateConf::new(EmptyDocument::Reject));
        let result = translator.translate(r#"{"op": "i", "ns": "test.student", "o": {}}"#);
        match result {
            Err(TranslateError::Schema { field, .. }) => assert_eq!(field, "o"),
            other => panic!("expect schema error, get {:?}", other),
        }

        let result = translator.translate_doc(&doc! {"op": "i", "ns": "test.student", "o": {}});
        assert!(matches!(result, Err(TranslateError::Schema { .. })));
    }

    #[test]
    fn test_reject_policy_keeps_non_empty_document() {
        let translator = Translator::new(TranslateConf::new(EmptyDocument::Reject));
        let sql = translator
            .translate(r#"{"op": "i", "ns": "a.b", "o": {"x": "y"}}"#)
            .unwrap();
        assert_eq!(sql, "INSERT INTO a.b (x) VALUES ('y');");
    }

    #[test]
    fn test_translate_invalid_json() {
        assert!(matches!(
            translate(r#"{"op": "i", "ns": "#),
            Err(TranslateError::Parse(_))
        ));
        assert!(matches!(translate(""), Err(TranslateError::Parse(_))));
    }

    #[test]
    fn test_translate_slice() {
        let translator = Translator::default();
        let sql = translator
            .translate_slice(br#"{"op": "i", "ns": "a.b", "o": {"name": "O'Neil"}}"#)
            .unwrap();
        assert_eq!(sql, "INSERT INTO a.b (name) VALUES ('O''Neil');");

        assert!(matches!(
            translator.translate_slice(b"\xff\xfe garbage"),
            Err(TranslateError::Parse(_))
        ));
        assert!(matches!(
            translator.translate_slice(b"{\"op\": \"i\", \"ns\": \"a.b\", \"o\": {\"x\": \"\xff\"}}"),
            Err(TranslateError::Parse(_))
        ));
    }

    #[test]
    fn test_translate_value_and_doc_agree() {
        let entry = serde_json::json!({"op": "i", "ns": "test.student", "o": {"name": "x", "n": 1, "ok": true}});
        let doc = doc! {"op": "i", "ns": "test.student", "o": {"name": "x", "n": 1, "ok": true}};
        let translator = Translator::default();
        assert_eq!(
            translator.translate_value(&entry).unwrap(),
            translator.translate_doc(&doc).unwrap()
        );
    }
}

// Query builders: core adapter filter types → MongoDB BSON documents.

use bazaar_core::db::adapter::{Connector, FindManyQuery, Operator, SortDirection, WhereClause};
use mongodb::bson::{doc, Bson, Document};

/// Convert a clause list into a MongoDB filter, folding consecutive
/// OR-connected clauses into `$or` groups.
pub fn build_filter(clauses: &[WhereClause]) -> Document {
    if clauses.is_empty() {
        return doc! {};
    }

    let mut and_conditions: Vec<Document> = Vec::new();
    let mut or_group: Vec<Document> = Vec::new();
    let mut in_or = false;

    for clause in clauses {
        let field_filter = clause_to_doc(clause);

        if in_or {
            or_group.push(field_filter);
        } else {
            and_conditions.push(field_filter);
        }

        if matches!(clause.connector, Some(Connector::Or)) {
            if !in_or {
                if let Some(last) = and_conditions.pop() {
                    or_group.push(last);
                }
                in_or = true;
            }
        } else if in_or {
            and_conditions.push(doc! { "$or": or_group.clone() });
            or_group.clear();
            in_or = false;
        }
    }

    if !or_group.is_empty() {
        and_conditions.push(doc! { "$or": or_group });
    }

    if and_conditions.len() == 1 {
        and_conditions.into_iter().next().unwrap_or_default()
    } else if and_conditions.is_empty() {
        doc! {}
    } else {
        doc! { "$and": and_conditions }
    }
}

fn clause_to_doc(clause: &WhereClause) -> Document {
    let field = if clause.field == "id" { "_id" } else { &clause.field };
    let value = json_to_bson(&clause.value);

    match clause.operator {
        Operator::Eq => doc! { field: value },
        Operator::Ne => doc! { field: { "$ne": value } },
        Operator::Lt => doc! { field: { "$lt": value } },
        Operator::Lte => doc! { field: { "$lte": value } },
        Operator::Gt => doc! { field: { "$gt": value } },
        Operator::Gte => doc! { field: { "$gte": value } },
        Operator::In => {
            if let Bson::Array(arr) = value {
                doc! { field: { "$in": arr } }
            } else {
                doc! { field: { "$in": [value] } }
            }
        }
    }
}

pub fn json_to_bson(v: &serde_json::Value) -> Bson {
    match v {
        serde_json::Value::Null => Bson::Null,
        serde_json::Value::Bool(b) => Bson::Boolean(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Bson::Int64(i)
            } else if let Some(f) = n.as_f64() {
                Bson::Double(f)
            } else {
                Bson::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Bson::String(s.clone()),
        serde_json::Value::Array(arr) => Bson::Array(arr.iter().map(json_to_bson).collect()),
        serde_json::Value::Object(map) => {
            let mut doc = Document::new();
            for (k, v) in map {
                doc.insert(k.clone(), json_to_bson(v));
            }
            Bson::Document(doc)
        }
    }
}

pub fn bson_to_json(b: &Bson) -> serde_json::Value {
    match b {
        Bson::Null => serde_json::Value::Null,
        Bson::Boolean(b) => serde_json::json!(*b),
        Bson::Int32(i) => serde_json::json!(*i),
        Bson::Int64(i) => serde_json::json!(*i),
        Bson::Double(f) => serde_json::json!(*f),
        Bson::String(s) => serde_json::json!(s),
        Bson::ObjectId(oid) => serde_json::json!(oid.to_hex()),
        Bson::Array(arr) => serde_json::Value::Array(arr.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => doc_to_json(doc),
        Bson::DateTime(dt) => serde_json::json!(dt.timestamp_millis()),
        _ => serde_json::Value::Null,
    }
}

/// Convert a stored document back to the adapter's JSON form (`_id` → `id`).
pub fn doc_to_json(doc: &Document) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (k, v) in doc {
        let key = if k == "_id" { "id".to_string() } else { k.clone() };
        map.insert(key, bson_to_json(v));
    }
    serde_json::Value::Object(map)
}

/// Build an insert document (`id` → `_id`).
pub fn build_insert_doc(data: &serde_json::Value) -> Document {
    let mut doc = Document::new();
    if let Some(obj) = data.as_object() {
        for (k, v) in obj {
            let key = if k == "id" { "_id".to_string() } else { k.clone() };
            doc.insert(key, json_to_bson(v));
        }
    }
    doc
}

/// Build a `$set` update document.
pub fn build_update_doc(data: &serde_json::Value) -> Document {
    let mut set = Document::new();
    if let Some(obj) = data.as_object() {
        for (k, v) in obj {
            let key = if k == "id" { "_id".to_string() } else { k.clone() };
            set.insert(key, json_to_bson(v));
        }
    }
    doc! { "$set": set }
}

pub fn build_sort(query: &FindManyQuery) -> Option<Document> {
    query.sort_by.as_ref().map(|sort| {
        let direction = match sort.direction {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        };
        let field = if sort.field == "id" {
            "_id".to_string()
        } else {
            sort.field.clone()
        };
        doc! { field: direction }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter() {
        assert_eq!(build_filter(&[]), doc! {});
    }

    #[test]
    fn eq_filter_and_id_mapping() {
        assert_eq!(
            build_filter(&[WhereClause::eq("email", "a@b.com")]),
            doc! { "email": "a@b.com" }
        );
        assert_eq!(build_filter(&[WhereClause::eq("id", "u1")]), doc! { "_id": "u1" });
    }

    #[test]
    fn or_group_folds_into_dollar_or() {
        let filter = build_filter(&[
            WhereClause::eq("email", "a@b.com").or(),
            WhereClause::eq("phone", "111"),
        ]);
        assert_eq!(
            filter,
            doc! { "$or": [ { "email": "a@b.com" }, { "phone": "111" } ] }
        );
    }

    #[test]
    fn range_filter() {
        let filter = build_filter(&[WhereClause::lt("planValidUntil", "2026-01-01T00:00:00Z")]);
        assert_eq!(
            filter,
            doc! { "planValidUntil": { "$lt": "2026-01-01T00:00:00Z" } }
        );
    }

    #[test]
    fn insert_and_update_docs_map_id() {
        let data = serde_json::json!({"id": "o1", "totalPrice": "100.00"});
        let insert = build_insert_doc(&data);
        assert!(insert.contains_key("_id"));
        assert!(!insert.contains_key("id"));

        let update = build_update_doc(&serde_json::json!({"paymentStatus": "Paid"}));
        assert!(update.contains_key("$set"));
    }

    #[test]
    fn doc_round_trip_restores_id() {
        let doc = doc! { "_id": "o1", "stock": 4i64 };
        let json = doc_to_json(&doc);
        assert_eq!(json["id"], "o1");
        assert_eq!(json["stock"], 4);
        assert!(json.get("_id").is_none());
    }
}

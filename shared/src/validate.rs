//! Shape checks for server payloads.
//!
//! Every repository response goes through here before anything downstream
//! sees it. Fields are checked one by one so the error can name the field
//! that broke.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::entity::{Comment, Post};
use crate::error::ValidationError;

type Object = Map<String, Value>;

pub fn post(value: &Value) -> Result<Post, ValidationError> {
    let obj = object(value, "post")?;
    Ok(Post {
        id: string(obj, "id")?,
        title: string(obj, "title")?,
        content: string(obj, "content")?,
        name: string(obj, "name")?,
        avatar: string(obj, "avatar")?,
        created_at: date(obj, "createdAt")?,
    })
}

pub fn comment(value: &Value) -> Result<Comment, ValidationError> {
    let obj = object(value, "comment")?;
    Ok(Comment {
        id: string(obj, "id")?,
        content: string(obj, "content")?,
        name: string(obj, "name")?,
        avatar: string(obj, "avatar")?,
        parent_id: nullable_string(obj, "parentId")?,
        created_at: date(obj, "createdAt")?,
    })
}

pub fn posts(value: &Value) -> Result<Vec<Post>, ValidationError> {
    list(value, "posts", post)
}

pub fn comments(value: &Value) -> Result<Vec<Comment>, ValidationError> {
    list(value, "comments", comment)
}

/// Parse the date shapes backends commonly emit. Naive values are read as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn list<T>(
    value: &Value,
    entity: &'static str,
    item: fn(&Value) -> Result<T, ValidationError>,
) -> Result<Vec<T>, ValidationError> {
    let items = value
        .as_array()
        .ok_or(ValidationError::NotAnArray { entity })?;
    items
        .iter()
        .enumerate()
        .map(|(index, v)| {
            item(v).map_err(|e| ValidationError::InItem {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

fn object<'a>(value: &'a Value, entity: &'static str) -> Result<&'a Object, ValidationError> {
    value
        .as_object()
        .ok_or(ValidationError::NotAnObject { entity })
}

fn field<'a>(obj: &'a Object, field: &'static str) -> Result<&'a Value, ValidationError> {
    obj.get(field)
        .ok_or(ValidationError::MissingField { field })
}

fn string(obj: &Object, name: &'static str) -> Result<String, ValidationError> {
    field(obj, name)?
        .as_str()
        .map(str::to_owned)
        .ok_or(ValidationError::InvalidType {
            field: name,
            expected: "a string",
        })
}

fn nullable_string(obj: &Object, name: &'static str) -> Result<Option<String>, ValidationError> {
    match field(obj, name)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(ValidationError::InvalidType {
            field: name,
            expected: "a string or null",
        }),
    }
}

fn date(obj: &Object, name: &'static str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = field(obj, name)?
        .as_str()
        .ok_or(ValidationError::InvalidType {
            field: name,
            expected: "a date string",
        })?;
    parse_date(raw).ok_or_else(|| ValidationError::InvalidDate {
        field: name,
        value: raw.to_owned(),
    })
}

//! Typed, bounds-checked access to a command's positional parameters.
//!
//! Every accessor returns `Result<_, ParamError>` so formatting rules can
//! use `?` and the dispatcher decides what a failure looks like on screen.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("parameter {0} missing")]
    Missing(usize),
    #[error("parameter {index} is not {expected}")]
    WrongType { index: usize, expected: &'static str },
    #[error("field `{0}` missing")]
    MissingField(&'static str),
    #[error("value {value} out of range for {what}")]
    OutOfRange { what: &'static str, value: i64 },
    #[error("malformed move step: {0}")]
    MalformedStep(String),
}

#[derive(Debug, Clone, Copy)]
pub struct Params<'a>(&'a [Value]);

impl<'a> Params<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self(values)
    }

    pub fn value(&self, index: usize) -> Result<&'a Value, ParamError> {
        self.0.get(index).ok_or(ParamError::Missing(index))
    }

    /// Integers; whole floats are accepted since some exporters write `1.0`.
    pub fn int(&self, index: usize) -> Result<i64, ParamError> {
        let v = self.value(index)?;
        v.as_i64()
            .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or(ParamError::WrongType {
                index,
                expected: "an integer",
            })
    }

    pub fn str(&self, index: usize) -> Result<&'a str, ParamError> {
        self.value(index)?.as_str().ok_or(ParamError::WrongType {
            index,
            expected: "a string",
        })
    }

    pub fn array(&self, index: usize) -> Result<&'a [Value], ParamError> {
        self.value(index)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or(ParamError::WrongType {
                index,
                expected: "an array",
            })
    }

    pub fn object(&self, index: usize) -> Result<&'a Value, ParamError> {
        let v = self.value(index)?;
        if v.is_object() {
            Ok(v)
        } else {
            Err(ParamError::WrongType {
                index,
                expected: "an object",
            })
        }
    }

    /// Integer that may be absent; a present value of the wrong type is still an error.
    pub fn opt_int(&self, index: usize) -> Result<Option<i64>, ParamError> {
        match self.0.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.int(index).map(Some),
        }
    }
}

/// Read an integer field of a nested object (audio files, tones, routes).
pub fn field_int(obj: &Value, name: &'static str) -> Result<i64, ParamError> {
    let v = obj.get(name).ok_or(ParamError::MissingField(name))?;
    v.as_i64()
        .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .ok_or(ParamError::MissingField(name))
}

pub fn field_str<'a>(obj: &'a Value, name: &'static str) -> Result<&'a str, ParamError> {
    obj.get(name)
        .and_then(Value::as_str)
        .ok_or(ParamError::MissingField(name))
}

pub fn field_bool(obj: &Value, name: &'static str) -> Result<bool, ParamError> {
    obj.get(name)
        .and_then(Value::as_bool)
        .ok_or(ParamError::MissingField(name))
}

/// Pick a label from a fixed table by an integer selector.
pub fn pick(table: &[&'static str], what: &'static str, value: i64) -> Result<&'static str, ParamError> {
    usize::try_from(value)
        .ok()
        .and_then(|i| table.get(i).copied())
        .ok_or(ParamError::OutOfRange { what, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors_check_bounds_and_types() {
        let raw = vec![json!(5), json!("hi"), json!(true), json!([1, 2]), json!(2.0)];
        let p = Params::new(&raw);

        assert_eq!(p.int(0), Ok(5));
        assert_eq!(p.int(4), Ok(2));
        assert_eq!(p.str(1), Ok("hi"));
        assert_eq!(p.array(3).map(|a| a.len()), Ok(2));

        assert_eq!(p.int(9), Err(ParamError::Missing(9)));
        assert!(matches!(p.int(1), Err(ParamError::WrongType { index: 1, .. })));
        assert!(p.str(0).is_err());
        assert_eq!(p.opt_int(7), Ok(None));
    }

    #[test]
    fn nested_fields_reject_fractions_like_positional_ones() {
        let obj = json!({"volume": 80.0, "pitch": 1.7});
        assert_eq!(field_int(&obj, "volume"), Ok(80));
        assert_eq!(field_int(&obj, "pitch"), Err(ParamError::MissingField("pitch")));
        let raw = vec![json!(1.7)];
        assert!(Params::new(&raw).int(0).is_err());
    }

    #[test]
    fn pick_rejects_out_of_range() {
        let t = ["a", "b"];
        assert_eq!(pick(&t, "thing", 1), Ok("b"));
        assert!(pick(&t, "thing", 2).is_err());
        assert!(pick(&t, "thing", -1).is_err());
    }
}

//! Directive value parser
//!
//! Recursive descent that turns the tokens of one directive into a JSON value
//! tree. Structure is inferred from token adjacency:
//!
//! ```text
//! key value              scalar
//! key key2 value         nested object along the path
//! key { ... }            object built from the block's lines
//! key [ a b c ]          array of scalars
//! =key <json>            raw JSON document
//! +key ...               append to an array (++key nests one level deeper)
//! ```
//!
//! The previous value at a key is moved into the call that writes it, and the
//! call hands back the value to install, so repeated lines can extend objects
//! and arrays while conflicting writes are rejected.

use crate::parser::dispenser::Dispenser;
use crate::parser::error::{Closed, DirectiveResult, ErrorKind};
use crate::parser::key::Key;
use serde_json::{Map, Value};

/// Parser state: just the cursor, the tree lives on the call stack
pub struct ValueParser<'a> {
    d: &'a mut Dispenser,
}

impl<'a> ValueParser<'a> {
    pub fn new(d: &'a mut Dispenser) -> Self {
        Self { d }
    }

    /// Parse the value for `key` starting at the current token.
    ///
    /// `existing` is whatever was recorded at this key before.
    pub fn parse_value(&mut self, key: &Key, existing: Option<Value>) -> DirectiveResult<Value> {
        tracing::trace!("Parsing `{}` at line {}", key.name, self.d.line());

        let curr = if key.raw {
            // ..path =key <json>
            self.parse_json(key)?
        } else if self.d.is_open_brace() {
            // ..path key { ... }
            if !key.is_append() {
                let obj = self.object_for(key, existing)?;
                return self.parse_block(key, obj).map(Value::Object);
            }
            Value::Object(self.parse_block(key, Map::new())?)
        } else if self.d.is_open_bracket() {
            // ..path key [ ... ]
            self.parse_array(key)?
        } else if self.d.has_next_on_line() {
            // ..path key key2 ..rest
            if !key.is_append() {
                let mut obj = self.object_for(key, existing)?;
                self.parse_entry(&mut obj)?;
                return Ok(Value::Object(obj));
            }
            let mut obj = Map::new();
            self.parse_entry(&mut obj)?;
            Value::Object(obj)
        } else {
            // ..path key value
            self.d.scalar_val()
        };

        self.append_or_assign(key, curr, existing)
    }

    /// Parse one `key ..rest` entry and install it in `obj`
    pub fn parse_entry(&mut self, obj: &mut Map<String, Value>) -> DirectiveResult<()> {
        let key = self.parse_key()?;
        // Taking the slot instead of removing it keeps the key's position
        let existing = obj.get_mut(&key.name).map(std::mem::take);
        let value = self.parse_value(&key, existing)?;
        obj.insert(key.name, value);
        Ok(())
    }

    /// Decompose the current token into a key and step onto its value
    pub fn parse_key(&mut self) -> DirectiveResult<Key> {
        let key = Key::parse(self.d.val());
        if !self.d.next_on_current_line() {
            return Err(self.d.err(ErrorKind::MissingValue { key: key.name }));
        }
        Ok(key)
    }

    fn parse_json(&mut self, key: &Key) -> DirectiveResult<Value> {
        let value = serde_json::from_str(self.d.val()).map_err(|reason| {
            self.d.err(ErrorKind::InvalidJson {
                key: key.name.clone(),
                reason,
            })
        })?;
        self.ensure_line_end(key, Closed::Json)?;
        Ok(value)
    }

    fn parse_block(
        &mut self,
        key: &Key,
        mut obj: Map<String, Value>,
    ) -> DirectiveResult<Map<String, Value>> {
        loop {
            if !self.d.next() {
                return Err(self.d.err(ErrorKind::Unclosed {
                    key: key.name.clone(),
                    open: '{',
                }));
            }
            if self.d.is_close_brace() {
                break;
            }
            self.parse_entry(&mut obj)?;
        }
        self.ensure_line_end(key, Closed::Braces)?;
        Ok(obj)
    }

    fn parse_array(&mut self, key: &Key) -> DirectiveResult<Value> {
        let items = self.collect_array(key)?;
        self.ensure_line_end(key, Closed::Brackets)?;
        Ok(Value::Array(items))
    }

    fn collect_array(&mut self, key: &Key) -> DirectiveResult<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            if !self.d.next() || self.d.is_close_brace() {
                return Err(self.d.err(ErrorKind::Unclosed {
                    key: key.name.clone(),
                    open: '[',
                }));
            }
            if self.d.is_close_bracket() {
                return Ok(items);
            }
            if self.d.is_open_bracket() {
                items.push(Value::Array(self.collect_array(key)?));
            } else {
                items.push(self.d.scalar_val());
            }
        }
    }

    /// Nothing may follow a closed construct on its line
    fn ensure_line_end(&mut self, key: &Key, after: Closed) -> DirectiveResult<()> {
        if self.d.next_on_current_line() {
            return Err(self.d.err(ErrorKind::UnexpectedTrailingArgs {
                key: key.name.clone(),
                after,
            }));
        }
        Ok(())
    }

    fn object_for(&self, key: &Key, existing: Option<Value>) -> DirectiveResult<Map<String, Value>> {
        match existing {
            None => Ok(Map::new()),
            Some(Value::Object(obj)) => Ok(obj),
            Some(_) => Err(self.d.err(ErrorKind::NotAnObject {
                key: key.name.clone(),
            })),
        }
    }

    fn append_or_assign(
        &self,
        key: &Key,
        curr: Value,
        existing: Option<Value>,
    ) -> DirectiveResult<Value> {
        if key.is_append() {
            let mut arr = match existing {
                None => Vec::new(),
                Some(Value::Array(arr)) => arr,
                Some(_) => {
                    return Err(self.d.err(ErrorKind::NotAnArray {
                        key: key.name.clone(),
                    }));
                }
            };
            let curr = (1..key.plus).fold(curr, |v, _| Value::Array(vec![v]));
            arr.push(curr);
            Ok(Value::Array(arr))
        } else if existing.is_some() {
            Err(self.d.err(ErrorKind::DuplicateKey {
                key: key.name.clone(),
            }))
        } else {
            Ok(curr)
        }
    }
}

/// Parse everything from the first token as the value of an anonymous key.
///
/// Returns `Null` for an empty stream.
pub fn parse_body(d: &mut Dispenser) -> DirectiveResult<Value> {
    if !d.next() {
        return Ok(Value::Null);
    }
    ValueParser::new(d).parse_value(&Key::default(), None)
}

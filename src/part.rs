use std::fmt;
use std::io::{self, Read, Cursor};
use std::collections::btree_map::{self, BTreeMap};

/// The header fields of a single part.
///
/// Field names are matched ASCII case-insensitive but stored (and later
/// written) with the spelling used the first time a field was added.
/// Each field can have multiple values, which keep the order in which
/// they where added.
///
/// Fields are iterated (and encoded) in lexicographic order of their
/// names, _not_ in insertion order.
///
/// Neither names nor values are validated or escaped in any way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: BTreeMap<String, Vec<String>>
}

impl Headers {

    pub fn new() -> Self {
        Default::default()
    }

    /// the stored spelling of the field matching `name`
    fn stored_name(&self, name: &str) -> Option<&String> {
        self.fields.keys()
            .find(|stored| stored.eq_ignore_ascii_case(name))
    }

    /// adds a value to the field `name`, keeping already existing values
    pub fn add<N, V>(&mut self, name: N, value: V)
        where N: Into<String>, V: Into<String>
    {
        let name = name.into();
        let key = self.stored_name(&name).cloned().unwrap_or(name);
        self.fields.entry(key)
            .or_insert_with(Vec::new)
            .push(value.into());
    }

    /// sets `value` as the only value of field `name`
    pub fn set<N, V>(&mut self, name: N, value: V)
        where N: Into<String>, V: Into<String>
    {
        let name = name.into();
        let key = self.stored_name(&name).cloned().unwrap_or(name);
        self.fields.insert(key, vec![value.into()]);
    }

    /// the first value of field `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(|value| &**value)
    }

    /// all values of field `name`, empty if there is no such field
    pub fn get_all(&self, name: &str) -> &[String] {
        self.stored_name(name)
            .and_then(|key| self.fields.get(key))
            .map(|values| &**values)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stored_name(name).is_some()
    }

    /// removes the field `name` returning its values
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let key = self.stored_name(name).cloned()?;
        self.fields.remove(&key)
    }

    /// number of fields (not values)
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// iterates over all fields in lexicographic order of the field names
    pub fn iter(&self) -> btree_map::Iter<String, Vec<String>> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


pub type BoxBody = Box<dyn Read + Send>;

/// A single part of a multipart body.
///
/// The body is any byte source, it is read until it signals
/// end of input (`Ok(0)`) and then dropped.
pub struct Part {
    headers: Headers,
    body: BoxBody
}

impl Part {

    /// create a part without any header fields
    pub fn new<R>(body: R) -> Self
        where R: Read + Send + 'static
    {
        Part::with_headers(Headers::new(), body)
    }

    pub fn with_headers<R>(headers: Headers, body: R) -> Self
        where R: Read + Send + 'static
    {
        Part { headers, body: Box::new(body) }
    }

    /// create a part with a in-memory body
    pub fn from_bytes<B>(data: B) -> Self
        where B: Into<Vec<u8>>
    {
        Part::new(Cursor::new(data.into()))
    }

    /// create a part with an empty body
    pub fn empty() -> Self {
        Part::new(io::empty())
    }

    /// create a simple form field part
    ///
    /// Sets `Content-Disposition: form-data; name="<name>"`, the name
    /// is not escaped.
    pub fn form_field<V>(name: &str, value: V) -> Self
        where V: Into<Vec<u8>>
    {
        Part::from_bytes(value)
            .with_header("Content-Disposition", format!("form-data; name=\"{}\"", name))
    }

    /// create a file upload part
    ///
    /// Sets `Content-Disposition: form-data; name="<name>"; filename="<file_name>"`
    /// and a `Content-Type` of `application/octet-stream`, which can be
    /// overwritten using `headers_mut().set(..)`.
    pub fn form_file<R>(name: &str, file_name: &str, body: R) -> Self
        where R: Read + Send + 'static
    {
        Part::new(body)
            .with_header("Content-Disposition",
                format!("form-data; name=\"{}\"; filename=\"{}\"", name, file_name))
            .with_header("Content-Type", "application/octet-stream")
    }

    /// adds a header value, see `Headers::add`
    pub fn with_header<N, V>(mut self, name: N, value: V) -> Self
        where N: Into<String>, V: Into<String>
    {
        self.headers.add(name, value);
        self
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn into_parts(self) -> (Headers, BoxBody) {
        (self.headers, self.body)
    }
}

impl fmt::Debug for Part {
    fn fmt(&self, fter: &mut fmt::Formatter) -> fmt::Result {
        fter.debug_struct("Part")
            .field("headers", &self.headers)
            .field("body", &"<dyn Read>")
            .finish()
    }
}

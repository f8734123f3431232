use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::File;
use std::marker::PhantomData;
use std::rc::Rc;
use std::str::FromStr;

use crate::api::binding::{BindError, Binding};
use crate::prelude::Collectable;

/// A binding that parses a single value via [`FromStr`].
///
/// Covers floating-point, integer, and string destinations; the primitive
/// `FromStr` implementations only succeed when the entire token is consumed.
/// On failure the destination is left unchanged.
pub struct Value<'a, T> {
    variable: Rc<RefCell<&'a mut T>>,
}

impl<'a, T> Value<'a, T> {
    /// Create a value binding.
    pub fn new(variable: &'a mut T) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
        }
    }
}

impl<'a, T> Binding for Value<'a, T>
where
    T: FromStr,
{
    fn takes_value(&self) -> bool {
        true
    }

    fn matched(&mut self) {
        // Do nothing.
    }

    fn convert(&mut self, token: &str) -> Result<(), BindError> {
        let value = T::from_str(token).map_err(|_| BindError::InvalidToken {
            token: token.to_string(),
            type_name: std::any::type_name::<T>(),
        })?;
        **self.variable.borrow_mut() = value;
        Ok(())
    }
}

/// A binding for a no-argument option; sets the destination to `true` when matched.
pub struct Flag<'a> {
    variable: Rc<RefCell<&'a mut bool>>,
}

impl<'a> Flag<'a> {
    /// Create a flag binding.
    pub fn new(variable: &'a mut bool) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
        }
    }
}

impl<'a> Binding for Flag<'a> {
    fn takes_value(&self) -> bool {
        false
    }

    fn matched(&mut self) {
        **self.variable.borrow_mut() = true;
    }

    fn convert(&mut self, _token: &str) -> Result<(), BindError> {
        unreachable!("internal error - must not convert on a Flag");
    }
}

/// A binding that opens the named path for reading.
///
/// On success the destination holds the open handle; on failure it remains in its
/// previous (typically unopened) state.
pub struct FileHandle<'a> {
    variable: Rc<RefCell<&'a mut Option<File>>>,
}

impl<'a> FileHandle<'a> {
    /// Create a file handle binding.
    pub fn new(variable: &'a mut Option<File>) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
        }
    }
}

impl<'a> Binding for FileHandle<'a> {
    fn takes_value(&self) -> bool {
        true
    }

    fn matched(&mut self) {
        // Do nothing.
    }

    fn convert(&mut self, token: &str) -> Result<(), BindError> {
        let file = File::open(token).map_err(|error| BindError::FileOpen {
            path: token.to_string(),
            message: error.to_string(),
        })?;
        self.variable.borrow_mut().replace(file);
        Ok(())
    }
}

/// A binding identical to [`FileHandle`], but which also records the original path
/// string alongside the handle.
pub struct NamedFile<'a> {
    variable: Rc<RefCell<&'a mut Option<(File, String)>>>,
}

impl<'a> NamedFile<'a> {
    /// Create a named file binding.
    pub fn new(variable: &'a mut Option<(File, String)>) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
        }
    }
}

impl<'a> Binding for NamedFile<'a> {
    fn takes_value(&self) -> bool {
        true
    }

    fn matched(&mut self) {
        // Do nothing.
    }

    fn convert(&mut self, token: &str) -> Result<(), BindError> {
        let file = File::open(token).map_err(|error| BindError::FileOpen {
            path: token.to_string(),
            message: error.to_string(),
        })?;
        self.variable
            .borrow_mut()
            .replace((file, token.to_string()));
        Ok(())
    }
}

/// A binding that splits the raw token on commas and converts each element in order.
///
/// Elements are appended as they convert; the first element failure aborts the
/// conversion, leaving the destination with the partial prefix.
pub struct List<'a, C, T>
where
    C: 'a + Collectable<T>,
{
    variable: Rc<RefCell<&'a mut C>>,
    _phantom: PhantomData<T>,
}

impl<'a, C, T> List<'a, C, T>
where
    C: 'a + Collectable<T>,
{
    /// Create a list binding.
    pub fn new(variable: &'a mut C) -> Self {
        Self {
            variable: Rc::new(RefCell::new(variable)),
            _phantom: PhantomData,
        }
    }
}

impl<'a, C, T> Binding for List<'a, C, T>
where
    T: FromStr,
    C: 'a + Collectable<T>,
{
    fn takes_value(&self) -> bool {
        true
    }

    fn matched(&mut self) {
        // Do nothing.
    }

    fn convert(&mut self, token: &str) -> Result<(), BindError> {
        for part in token.split(',') {
            let value = T::from_str(part).map_err(|_| BindError::InvalidToken {
                token: part.to_string(),
                type_name: std::any::type_name::<T>(),
            })?;
            (**self.variable.borrow_mut()).add(value);
        }
        Ok(())
    }
}

/// A binding around a caller-supplied conversion function.
pub struct Custom<F> {
    action: F,
}

impl<F> Custom<F>
where
    F: FnMut(&str) -> Result<(), BindError>,
{
    /// Create a custom binding.
    pub fn new(action: F) -> Self {
        Self { action }
    }
}

impl<F> Binding for Custom<F>
where
    F: FnMut(&str) -> Result<(), BindError>,
{
    fn takes_value(&self) -> bool {
        true
    }

    fn matched(&mut self) {
        // Do nothing.
    }

    fn convert(&mut self, token: &str) -> Result<(), BindError> {
        (self.action)(token)
    }
}

// The convenience path for `OptionParser::add_check`.
pub(crate) struct Check<'a> {
    predicate: Box<dyn Fn(&str) -> bool + 'a>,
}

impl<'a> Check<'a> {
    pub(crate) fn new(predicate: impl Fn(&str) -> bool + 'a) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl<'a> Binding for Check<'a> {
    fn takes_value(&self) -> bool {
        true
    }

    fn matched(&mut self) {
        // Do nothing.
    }

    fn convert(&mut self, token: &str) -> Result<(), BindError> {
        if (self.predicate)(token) {
            Ok(())
        } else {
            Err(BindError::Rejected {
                token: token.to_string(),
            })
        }
    }
}

impl<T> Collectable<T> for Vec<T> {
    fn add(&mut self, item: T) {
        self.push(item);
    }
}

impl<T: Eq + std::hash::Hash> Collectable<T> for HashSet<T> {
    fn add(&mut self, item: T) {
        self.insert(item);
    }
}

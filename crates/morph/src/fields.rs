//! Field mapping: writing flat, named string values into tagged struct fields.
//!
//! A [`Mapper`] is a small configuration value selecting which tag group of a
//! destination type it reads. Three independent instances — form, path, and
//! query — are injected into the adapter; each can be disabled or pointed at
//! a different group. The destination type declares its tagged fields by
//! implementing [`Bind`], normally through `#[derive(Bind)]`.

use crate::error::FieldError;
use std::fmt;
use std::str::FromStr;

/// Tag group a mapper reads from a [`Bind`] destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagGroup {
    /// Keys declared with `#[bind(form = "...")]`.
    Form,
    /// Keys declared with `#[bind(path = "...")]`.
    Path,
    /// Keys declared with `#[bind(query = "...")]`.
    Query,
}

impl fmt::Display for TagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form => write!(f, "form"),
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// A type whose tagged fields can be written from flat string values.
///
/// Implemented through `#[derive(Bind)]`; the derive generates a static key
/// table per tag group plus a field setter. Unknown keys are a no-op so a
/// mapper can offer every incoming name without filtering first.
///
/// ```rust
/// use morph::{Bind as _, FieldError, TagGroup};
///
/// #[derive(Default)]
/// struct Login {
///     username: String,
///     password: String,
/// }
///
/// // Hand-rolled impl; `#[derive(Bind)]` generates the same shape.
/// impl morph::Bind for Login {
///     fn keys(group: TagGroup) -> &'static [&'static str] {
///         match group {
///             TagGroup::Form => &["username", "password"],
///             TagGroup::Path | TagGroup::Query => &[],
///         }
///     }
///
///     fn set_field(
///         &mut self,
///         group: TagGroup,
///         key: &str,
///         values: &[&str],
///     ) -> Result<(), FieldError> {
///         match (group, key) {
///             (TagGroup::Form, "username") => morph::Field::put(&mut self.username, "username", values),
///             (TagGroup::Form, "password") => morph::Field::put(&mut self.password, "password", values),
///             _ => Ok(()),
///         }
///     }
/// }
///
/// assert_eq!(<Login as morph::Bind>::keys(TagGroup::Form).len(), 2);
/// ```
pub trait Bind: Default {
    /// Keys this type exposes for the given tag group, in declaration order.
    fn keys(group: TagGroup) -> &'static [&'static str];

    /// Writes `values` into the field tagged `key` in `group`.
    ///
    /// Unknown keys return `Ok(())` without touching the destination.
    fn set_field(
        &mut self,
        group: TagGroup,
        key: &str,
        values: &[&str],
    ) -> Result<(), FieldError>;
}

/// Field-mapper configuration for one binding source.
///
/// A `Mapper` is a plain value; the adapter holds one per source for the
/// lifetime of a registered route rather than consulting process-wide
/// globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapper {
    group: TagGroup,
}

impl Mapper {
    /// Creates a mapper reading the given tag group.
    #[must_use]
    pub const fn new(group: TagGroup) -> Self {
        Self { group }
    }

    /// Default mapper for form bodies.
    #[must_use]
    pub const fn form() -> Self {
        Self::new(TagGroup::Form)
    }

    /// Default mapper for path parameters.
    #[must_use]
    pub const fn path() -> Self {
        Self::new(TagGroup::Path)
    }

    /// Default mapper for query strings.
    #[must_use]
    pub const fn query() -> Self {
        Self::new(TagGroup::Query)
    }

    /// The tag group this mapper reads.
    #[must_use]
    pub const fn group(self) -> TagGroup {
        self.group
    }

    /// Keys the destination type exposes to this mapper.
    ///
    /// Consulted once, at plan time, to decide whether a parameter is
    /// eligible for this source at all.
    #[must_use]
    pub fn keys<T: Bind>(self) -> &'static [&'static str] {
        T::keys(self.group)
    }

    /// Starts a write-through session into `dest`.
    pub fn bind<T: Bind>(self, dest: &mut T) -> FieldBinder<'_, T> {
        FieldBinder {
            group: self.group,
            dest,
        }
    }
}

/// The trio of injectable mapper instances held by the adapter.
///
/// Each source can be disabled independently; a disabled source is never
/// consulted at plan time, so no argument becomes eligible for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapperSet {
    /// Mapper for form bodies, or `None` to disable form binding.
    pub form: Option<Mapper>,
    /// Mapper for path parameters, or `None` to disable path binding.
    pub path: Option<Mapper>,
    /// Mapper for query strings, or `None` to disable query binding.
    pub query: Option<Mapper>,
}

impl Default for MapperSet {
    fn default() -> Self {
        Self {
            form: Some(Mapper::form()),
            path: Some(Mapper::path()),
            query: Some(Mapper::query()),
        }
    }
}

impl MapperSet {
    /// A set with every source disabled.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            form: None,
            path: None,
            query: None,
        }
    }
}

/// Write-through handle produced by [`Mapper::bind`].
///
/// Unknown keys are no-ops; per-field coercion failures are tolerated and
/// logged rather than failing the request.
#[derive(Debug)]
pub struct FieldBinder<'a, T: Bind> {
    group: TagGroup,
    dest: &'a mut T,
}

impl<T: Bind> FieldBinder<'_, T> {
    /// Offers `values` to the field tagged `key`.
    pub fn set(&mut self, key: &str, values: &[&str]) {
        if let Err(err) = self.dest.set_field(self.group, key, values) {
            tracing::debug!(group = %self.group, key, %err, "field coercion failed, value skipped");
        }
    }
}

/// A scalar field kind parseable from a single raw string.
pub trait FieldParse: Sized {
    /// Parses one raw value.
    fn parse_field(raw: &str) -> Result<Self, String>;
}

macro_rules! field_parse_impls {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldParse for $ty {
                fn parse_field(raw: &str) -> Result<Self, String> {
                    <$ty as FromStr>::from_str(raw).map_err(|err| err.to_string())
                }
            }
        )*
    };
}

field_parse_impls!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String,
);

/// Assignment strategy for one destination field.
///
/// Scalars take the last offered value (later occurrences win), `Vec<T>`
/// collects every value, `Option<T>` wraps the last value.
pub trait Field {
    /// Writes `values` into `self`; `field` names the destination for
    /// diagnostics.
    fn put(&mut self, field: &'static str, values: &[&str]) -> Result<(), FieldError>;
}

macro_rules! scalar_field_impls {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Field for $ty {
                fn put(&mut self, field: &'static str, values: &[&str]) -> Result<(), FieldError> {
                    let Some(raw) = values.last() else {
                        return Ok(());
                    };
                    *self = <$ty as FieldParse>::parse_field(raw)
                        .map_err(|message| FieldError::Coerce { field, message })?;
                    Ok(())
                }
            }
        )*
    };
}

scalar_field_impls!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String,
);

impl<T: FieldParse> Field for Vec<T> {
    fn put(&mut self, field: &'static str, values: &[&str]) -> Result<(), FieldError> {
        let parsed = values
            .iter()
            .map(|raw| T::parse_field(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|message| FieldError::Coerce { field, message })?;
        *self = parsed;
        Ok(())
    }
}

impl<T: FieldParse> Field for Option<T> {
    fn put(&mut self, field: &'static str, values: &[&str]) -> Result<(), FieldError> {
        let Some(raw) = values.last() else {
            return Ok(());
        };
        *self = Some(
            T::parse_field(raw).map_err(|message| FieldError::Coerce { field, message })?,
        );
        Ok(())
    }
}

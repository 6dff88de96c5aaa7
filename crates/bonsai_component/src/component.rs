//! Core [`Component`] trait and the dynamically-typed [`ComponentValue`].
//!
//! Components are stored by **name** on each entity. The stored value is a
//! [`ComponentValue`], a closed tagged variant with one case per
//! [`ComponentKind`]. Rust types opt into the store by implementing
//! [`Component`], which converts to and from the matching variant.
//!
//! Typed reads go through [`Component::try_from_value`], which fails with
//! [`ComponentError::KindMismatch`] instead of silently producing a wrong
//! value when a name holds a different kind than the caller expected.

use bonsai_math::DVec2;
use serde::{Deserialize, Serialize};

use crate::kinds::{Collider, Marker, Position, Size, Solid, SolidExclude, Velocity};

/// The kind of value a component holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Position,
    Velocity,
    Size,
    Collider,
    Solid,
    SolidExclude,
    Marker,
    Flag,
    Number,
    Text,
    Vector,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A component value as held by the component store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentValue {
    Position(Position),
    Velocity(Velocity),
    Size(Size),
    Collider(Collider),
    Solid,
    SolidExclude(SolidExclude),
    /// Presence-only tag (e.g. `persistent`, or a group name consulted by
    /// `solidexclude`).
    Marker,
    Flag(bool),
    Number(f64),
    Text(String),
    Vector(DVec2),
}

impl ComponentValue {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Position(_) => ComponentKind::Position,
            Self::Velocity(_) => ComponentKind::Velocity,
            Self::Size(_) => ComponentKind::Size,
            Self::Collider(_) => ComponentKind::Collider,
            Self::Solid => ComponentKind::Solid,
            Self::SolidExclude(_) => ComponentKind::SolidExclude,
            Self::Marker => ComponentKind::Marker,
            Self::Flag(_) => ComponentKind::Flag,
            Self::Number(_) => ComponentKind::Number,
            Self::Text(_) => ComponentKind::Text,
            Self::Vector(_) => ComponentKind::Vector,
        }
    }
}

/// Errors raised by typed component access.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComponentError {
    /// The named component exists but holds a different kind.
    #[error("component '{name}' holds {found}, expected {expected}")]
    KindMismatch {
        name: String,
        expected: ComponentKind,
        found: ComponentKind,
    },
}

/// The core component trait.
///
/// Every Rust type that can be attached to an entity implements this trait.
/// Components must be `Send + Sync` so the store can be shared across the
/// parallel physics tasks.
///
/// # Examples
///
/// ```rust
/// use bonsai_component::{Component, ComponentKind, Position};
///
/// let value = Position::new(1.0, 2.0).into_value();
/// assert_eq!(value.kind(), ComponentKind::Position);
/// assert_eq!(Position::type_name(), "position");
/// ```
pub trait Component: Clone + Send + Sync + 'static {
    /// The kind this type is stored as.
    const KIND: ComponentKind;

    /// The conventional component name for this type (e.g. `"position"`).
    fn type_name() -> &'static str;

    /// Wrap `self` in a [`ComponentValue`].
    fn into_value(self) -> ComponentValue;

    /// Extract `Self` from a value of the matching kind.
    fn from_value(value: &ComponentValue) -> Option<Self>;

    /// Extract `Self`, failing with a typed error on kind mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::KindMismatch`] when `value` is not of
    /// [`Component::KIND`].
    fn try_from_value(name: &str, value: &ComponentValue) -> Result<Self, ComponentError> {
        Self::from_value(value).ok_or_else(|| ComponentError::KindMismatch {
            name: name.to_string(),
            expected: Self::KIND,
            found: value.kind(),
        })
    }
}

macro_rules! impl_component {
    ($ty:ty, $kind:ident, $name:literal, |$v:ident| $into:expr, $pat:pat => $from:expr) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn type_name() -> &'static str {
                $name
            }

            fn into_value(self) -> ComponentValue {
                let $v = self;
                $into
            }

            fn from_value(value: &ComponentValue) -> Option<Self> {
                match value {
                    $pat => Some($from),
                    _ => None,
                }
            }
        }

        impl From<$ty> for ComponentValue {
            fn from(value: $ty) -> Self {
                value.into_value()
            }
        }
    };
}

impl_component!(Position, Position, "position", |v| ComponentValue::Position(v), ComponentValue::Position(p) => *p);
impl_component!(Velocity, Velocity, "velocity", |v| ComponentValue::Velocity(v), ComponentValue::Velocity(p) => *p);
impl_component!(Size, Size, "size", |v| ComponentValue::Size(v), ComponentValue::Size(s) => *s);
impl_component!(Collider, Collider, "collider", |v| ComponentValue::Collider(v), ComponentValue::Collider(c) => c.clone());
impl_component!(Solid, Solid, "solid", |_v| ComponentValue::Solid, ComponentValue::Solid => Solid);
impl_component!(SolidExclude, SolidExclude, "solidexclude", |v| ComponentValue::SolidExclude(v), ComponentValue::SolidExclude(s) => s.clone());
impl_component!(Marker, Marker, "marker", |_v| ComponentValue::Marker, ComponentValue::Marker => Marker);
impl_component!(bool, Flag, "flag", |v| ComponentValue::Flag(v), ComponentValue::Flag(b) => *b);
impl_component!(f64, Number, "number", |v| ComponentValue::Number(v), ComponentValue::Number(n) => *n);
impl_component!(String, Text, "text", |v| ComponentValue::Text(v), ComponentValue::Text(s) => s.clone());
impl_component!(DVec2, Vector, "vector", |v| ComponentValue::Vector(v), ComponentValue::Vector(d) => *d);

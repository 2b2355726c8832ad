use std::any::Any;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;

/// An owned, type-erased value carried by a message.
///
/// A payload has exactly one owner at a time. Sending moves it into the
/// target inbox; the queue drops it right after the handler returns, so
/// handlers only ever see it by reference and must copy what they keep.
#[repr(transparent)]
pub struct Payload {
  inner: Option<Box<dyn Any + Send>>,
}

impl Payload {
  /// Creates a payload owning `value`.
  #[inline]
  pub fn new<T>(value: T) -> Self
  where
    T: Any + Send,
  {
    Self {
      inner: Some(Box::new(value)),
    }
  }

  /// Creates a payload carrying no data.
  #[inline]
  pub const fn empty() -> Self {
    Self { inner: None }
  }

  /// Returns `true` if the payload carries no data.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.inner.is_none()
  }

  /// Returns `true` if the payload holds a `T`.
  #[inline]
  pub fn is<T>(&self) -> bool
  where
    T: Any,
  {
    self.inner.as_deref().is_some_and(|inner| inner.is::<T>())
  }

  /// Returns a reference to the contained `T`, if that is its type.
  #[inline]
  pub fn downcast_ref<T>(&self) -> Option<&T>
  where
    T: Any,
  {
    self.inner.as_deref()?.downcast_ref()
  }

  /// Moves the contained `T` out, returning the payload unchanged on a
  /// type mismatch.
  #[inline]
  pub fn downcast<T>(self) -> std::result::Result<Box<T>, Self>
  where
    T: Any,
  {
    match self.inner {
      Some(inner) => inner.downcast::<T>().map_err(|inner| Self { inner: Some(inner) }),
      None => Err(Self::empty()),
    }
  }
}

impl Debug for Payload {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    if self.is_empty() {
      f.write_str("Payload(<empty>)")
    } else {
      f.write_str("Payload(..)")
    }
  }
}

impl Default for Payload {
  #[inline]
  fn default() -> Self {
    Self::empty()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

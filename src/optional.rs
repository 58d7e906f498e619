// https://en.cppreference.com/w/cpp/utility/optional.html
// Hand-rolled std::optional: raw storage for one T plus a flag saying whether it's live.

use std::{
    any::type_name,
    fmt::{ Debug, Display },
    mem::MaybeUninit,
    ops::{ Deref, DerefMut }
};
use crate::error::BadOptionalAccess;

/// Zero or one `T`, stored inline.
///
/// Laid out like `alignas(T) char data_[sizeof(T)]; bool is_initialized_;`. The storage is never
/// touched as a `T` while `on` is false, so an empty `Optional<T>` never builds or drops a `T`.
#[repr(C)]
pub struct Optional<T> {
    value: MaybeUninit<T>,
    on: bool
}

static_assertions::assert_eq_size!(Optional<u8>, [u8; 2]);
static_assertions::assert_eq_size!(Optional<u64>, [u64; 2]);
static_assertions::assert_eq_size!(Optional<[u16; 3]>, [u16; 4]);
static_assertions::assert_eq_align!(Optional<u64>, u64);

impl<T> Optional<T> {
    pub const fn new() -> Self {
        Self { value: MaybeUninit::uninit(), on: false }
    }

    pub fn some(value: T) -> Self {
        let mut new = Self::new();
        new.construct(value);
        new
    }

    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::some(v),
            None => Self::new()
        }
    }

    pub fn has_value(&self) -> bool { self.on }

    // storage must be empty here, otherwise the old value leaks
    fn construct(&mut self, value: T) -> &mut T {
        debug_assert!(!self.on, "Constructing over a live value");
        tracing::trace!(ty = type_name::<T>(), "optional engaged");
        let slot = self.value.write(value);
        self.on = true;
        slot
    }

    /// Drops the contained value, if there is one. Calling this on an empty `Optional` does nothing.
    pub fn reset(&mut self) {
        if self.on {
            // flag goes first so a panicking Drop can't get the value dropped twice
            self.on = false;
            tracing::trace!(ty = type_name::<T>(), "optional disengaged");
            unsafe { self.value.assume_init_drop() };
        }
    }

    fn bad_access() -> BadOptionalAccess {
        tracing::debug!(ty = type_name::<T>(), "checked access on an empty optional");
        BadOptionalAccess
    }
}

// Access
impl<T> Optional<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self.on {
            true => Some(unsafe { self.value.assume_init_ref() }),
            false => None
        }
    }

    pub fn as_option_mut(&mut self) -> Option<&mut T> {
        match self.on {
            true => Some(unsafe { self.value.assume_init_mut() }),
            false => None
        }
    }

    /// Checked access. Fails with [`BadOptionalAccess`] when empty.
    pub fn value(&self) -> Result<&T, BadOptionalAccess> {
        self.as_option().ok_or_else(Self::bad_access)
    }

    pub fn value_mut(&mut self) -> Result<&mut T, BadOptionalAccess> {
        self.as_option_mut().ok_or_else(Self::bad_access)
    }

    /// Reference into storage with no occupancy check.
    ///
    /// # Safety
    /// The `Optional` must hold a value (`has_value()` returns true).
    pub unsafe fn get_unchecked(&self) -> &T {
        self.value.assume_init_ref()
    }

    /// # Safety
    /// The `Optional` must hold a value (`has_value()` returns true).
    pub unsafe fn get_unchecked_mut(&mut self) -> &mut T {
        self.value.assume_init_mut()
    }

    // Pointer into storage, same as operator->. Only valid to dereference while engaged.
    pub fn as_ptr(&self) -> *const T { self.value.as_ptr() }
    pub fn as_mut_ptr(&mut self) -> *mut T { self.value.as_mut_ptr() }
}

// Mutation
impl<T> Optional<T> {
    /// Stores `value`. An empty `Optional` constructs it in storage; a full one assigns it over
    /// the live value instead of dropping and rebuilding.
    pub fn assign(&mut self, value: T) -> &mut T {
        match self.on {
            true => {
                let slot = unsafe { self.value.assume_init_mut() };
                *slot = value;
                slot
            },
            false => self.construct(value)
        }
    }

    /// Takes over the state of `rhs`, consuming it.
    ///
    /// | self \ rhs | empty | full |
    /// |---|---|---|
    /// | empty | nothing | construct from rhs's value |
    /// | full | reset | assign rhs's value into the live value |
    pub fn assign_optional(&mut self, rhs: Self) {
        match (self.on, rhs.into_option()) {
            (false, None) => {},
            (false, Some(v)) => { self.construct(v); },
            (true, None) => self.reset(),
            (true, Some(v)) => unsafe { *self.value.assume_init_mut() = v }
        }
    }

    /// Destroys the current value (if any), then builds the new one from `f`.
    /// If `f` panics the `Optional` is left empty.
    pub fn emplace_with<F>(&mut self, f: F) -> &mut T
    where F: FnOnce() -> T
    {
        self.reset();
        self.construct(f())
    }

    pub fn emplace(&mut self, value: T) -> &mut T {
        self.emplace_with(|| value)
    }

    /// Moves the value out and leaves this `Optional` empty.
    pub fn take(&mut self) -> Option<T> {
        match self.on {
            true => {
                self.on = false;
                tracing::trace!(ty = type_name::<T>(), "optional disengaged");
                Some(unsafe { self.value.assume_init_read() })
            },
            false => None
        }
    }

    pub fn replace(&mut self, value: T) -> Option<T> {
        let old = self.take();
        self.construct(value);
        old
    }

    pub fn into_option(mut self) -> Option<T> {
        self.take()
    }

    pub fn into_value(self) -> Result<T, BadOptionalAccess> {
        self.into_option().ok_or_else(Self::bad_access)
    }
}

impl<T> Optional<T>
where T: Clone
{
    /// Copy-assigns `value`, reusing the live value through `Clone::clone_from` when there is one.
    pub fn assign_ref(&mut self, value: &T) -> &mut T {
        match self.on {
            true => {
                let slot = unsafe { self.value.assume_init_mut() };
                slot.clone_from(value);
                slot
            },
            false => self.construct(value.clone())
        }
    }

    /// Copy assignment. Same as [`Clone::clone_from`].
    pub fn assign_from(&mut self, rhs: &Self) {
        self.clone_from(rhs)
    }
}

// Moving out of a C++ object leaves a valid but hollow object behind, so these keep `src`
// engaged and leave `T::default()` in it. Use `take` to empty the source instead.
impl<T> Optional<T>
where T: Default
{
    pub fn move_from(src: &mut Self) -> Self {
        match src.as_option_mut() {
            Some(v) => Self::some(std::mem::take(v)),
            None => Self::new()
        }
    }

    /// Move assignment. Follows the same table as [`Optional::assign_optional`], but `rhs`
    /// keeps its engaged flag.
    pub fn assign_move_from(&mut self, rhs: &mut Self) {
        match (self.on, rhs.as_option_mut()) {
            (false, None) => {},
            (false, Some(v)) => { self.construct(std::mem::take(v)); },
            (true, None) => self.reset(),
            (true, Some(v)) => unsafe { *self.value.assume_init_mut() = std::mem::take(v) }
        }
    }
}

impl<T> Drop for Optional<T> {
    fn drop(&mut self) {
        self.reset()
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for Optional<T>
where T: Clone
{
    fn clone(&self) -> Self {
        match self.as_option() {
            Some(v) => Self::some(v.clone()),
            None => Self::new()
        }
    }

    fn clone_from(&mut self, source: &Self) {
        match (self.on, source.as_option()) {
            (false, None) => {},
            (false, Some(v)) => { self.construct(v.clone()); },
            (true, None) => self.reset(),
            (true, Some(v)) => unsafe { self.value.assume_init_mut().clone_from(v) }
        }
    }
}

// operator* here is checked: safe Rust can't hand out a reference to uninitialized storage.
// get_unchecked is the unchecked version.
impl<T> Deref for Optional<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        assert!(self.on, "{}", BadOptionalAccess);
        unsafe { self.get_unchecked() }
    }
}

impl<T> DerefMut for Optional<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        assert!(self.on, "{}", BadOptionalAccess);
        unsafe { self.get_unchecked_mut() }
    }
}

impl<T> From<T> for Optional<T> {
    fn from(value: T) -> Self { Self::some(value) }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self { Self::from_option(value) }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self { value.into_option() }
}

impl<T> Debug for Optional<T>
where T: Debug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_option() {
            Some(v) => write!(f, "Some({:?})", v),
            None => write!(f, "None"),
        }
    }
}

impl<T> Display for Optional<T>
where T: Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_option() {
            Some(v) => write!(f, "Some({})", v),
            None => write!(f, "None"),
        }
    }
}

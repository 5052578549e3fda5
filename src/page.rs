//! The page
//!
//! Every element the form controller touches, gathered in one context object.
//! Elements behave like their HTML counterparts, including constraint
//! validation, so a host only has to feed them values and show their state.

use core::fmt;
use std::cell::Cell;
use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::NaiveDateTime;
use chrono::Timelike;
use url::Url;

use crate::bounds;
use crate::bounds::ExpiryBounds;
use crate::bounds::format_datetime_local;
use crate::bounds::parse_datetime_local;
use crate::presenter::LinkRow;

/// Shows a message to the user, blocking in a browser
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Why a field fails its constraints
///
/// Matches the flags of a browser `ValidityState`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    /// Required field is empty
    ValueMissing,

    /// Value is not of the input type, like a URL without a scheme
    TypeMismatch,

    /// Value can not be converted, like a malformed date
    BadInput,

    /// Value is before `min`
    RangeUnderflow,

    /// Value is after `max`
    RangeOverflow,

    /// Value is off the one minute step counted from `min`
    StepMismatch,
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            Validity::ValueMissing => "Please fill out this field",
            Validity::TypeMismatch => "Please enter a URL",
            Validity::BadInput => "Please enter a valid date and time",
            Validity::RangeUnderflow => "Value is before the earliest allowed expiry",
            Validity::RangeOverflow => "Value is after the latest allowed expiry",
            Validity::StepMismatch => "Please enter a whole minute",
        };

        f.write_str(message)
    }
}

/// `<input type="url" required>`
#[derive(Debug, Default)]
pub struct UrlInput {
    value: RefCell<String>,
}

impl UrlInput {
    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    /// Set the value, surrounding whitespace is stripped like a browser does
    pub fn set_value(&self, value: &str) {
        *self.value.borrow_mut() = value.trim().to_string();
    }

    /// Required, and has to be an absolute URL
    pub fn check_validity(&self) -> Result<(), Validity> {
        let value = self.value.borrow();

        if value.is_empty() {
            return Err(Validity::ValueMissing);
        }

        Url::parse(&value)
            .map(|_| ())
            .map_err(|_| Validity::TypeMismatch)
    }
}

/// `<input type="datetime-local" required min=".." max="..">`
#[derive(Debug, Default)]
pub struct ExpiryInput {
    value: RefCell<String>,
    min: Cell<Option<NaiveDateTime>>,
    max: Cell<Option<NaiveDateTime>>,
}

impl ExpiryInput {
    /// Write bounds into `min`, `max` and the initial value
    pub fn apply_bounds(&self, bounds: &ExpiryBounds) {
        self.min.set(Some(bounds.min));
        self.max.set(Some(bounds.max));
        self.set_value(&format_datetime_local(&bounds.default));
    }

    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    pub fn set_value(&self, value: &str) {
        *self.value.borrow_mut() = value.trim().to_string();
    }

    pub fn min(&self) -> Option<String> {
        self.min.get().as_ref().map(format_datetime_local)
    }

    pub fn max(&self) -> Option<String> {
        self.max.get().as_ref().map(format_datetime_local)
    }

    fn value_as_datetime(&self) -> Option<NaiveDateTime> {
        parse_datetime_local(&self.value.borrow())
    }

    /// Milliseconds since the Unix epoch
    ///
    /// Like a browser, the wall-clock value is read as UTC
    pub fn value_as_number(&self) -> Option<i64> {
        self.value_as_datetime()
            .map(|value| value.and_utc().timestamp_millis())
    }

    /// Required, a valid date and time, within `min` and `max`, on a whole
    /// minute (the default 60 second step, `min` is on a whole minute too)
    pub fn check_validity(&self) -> Result<(), Validity> {
        if self.value.borrow().is_empty() {
            return Err(Validity::ValueMissing);
        }

        let value = self.value_as_datetime().ok_or(Validity::BadInput)?;

        if self.min.get().is_some_and(|min| value < min) {
            return Err(Validity::RangeUnderflow);
        }

        if self.max.get().is_some_and(|max| value > max) {
            return Err(Validity::RangeOverflow);
        }

        if value.second() != 0 || value.nanosecond() != 0 {
            return Err(Validity::StepMismatch);
        }

        Ok(())
    }
}

/// The submit button, disabled while a link is being created
#[derive(Debug, Default)]
pub struct SubmitControl {
    disabled: Cell<bool>,
}

impl SubmitControl {
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Disable the control until the returned lock is dropped
    pub fn lock(&self) -> SubmitLock<'_> {
        self.disabled.set(true);

        SubmitLock { control: self }
    }
}

/// Keeps the submit control disabled while alive
///
/// Dropping it always enables the control again, whichever way the
/// submission ended.
#[must_use]
pub struct SubmitLock<'a> {
    control: &'a SubmitControl,
}

impl Drop for SubmitLock<'_> {
    fn drop(&mut self) {
        self.control.disabled.set(false);
    }
}

/// The list of created links, most recent first
#[derive(Debug, Default)]
pub struct LinkList {
    rows: RefCell<VecDeque<LinkRow>>,
}

impl LinkList {
    pub fn prepend(&self, row: LinkRow) {
        self.rows.borrow_mut().push_front(row);
    }

    pub fn rows(&self) -> Vec<LinkRow> {
        self.rows.borrow().iter().cloned().collect()
    }
}

/// The form page
pub struct Page<N> {
    /// Origin the short links are served from
    pub origin: Url,

    pub destination: UrlInput,
    pub expiry: ExpiryInput,
    pub submit: SubmitControl,
    pub list: LinkList,
    pub notifier: N,
}

impl<N> Page<N>
where
    N: Notifier,
{
    /// Load the page
    ///
    /// The expiry bounds are computed here, once, so the expiry field has
    /// its constraints before anyone can touch it
    pub fn load(origin: Url, notifier: N, now: NaiveDateTime) -> Result<Self, bounds::Error> {
        let bounds = bounds::compute_bounds(now)?;

        let expiry = ExpiryInput::default();
        expiry.apply_bounds(&bounds);

        tracing::debug!(
            "Expiry bounds: {} to {}, defaulting to {}",
            bounds.min,
            bounds.max,
            bounds.default
        );

        Ok(Self {
            origin,
            destination: UrlInput::default(),
            expiry,
            submit: SubmitControl::default(),
            list: LinkList::default(),
            notifier,
        })
    }
}

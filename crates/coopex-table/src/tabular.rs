//! Row access for the table pipeline

use coopex_record::{Record, Value};

/// Anything the table can read cells from
pub trait Tabular {
    /// Cell value of `field`, `None` when the row has no such field
    fn cell(&self, field: &str) -> Option<&Value>;
}

impl Tabular for Record {
    #[inline]
    fn cell(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl<T: Tabular + ?Sized> Tabular for &T {
    #[inline]
    fn cell(&self, field: &str) -> Option<&Value> {
        (**self).cell(field)
    }
}

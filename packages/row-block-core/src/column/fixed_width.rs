//! Fixed-width primitive column.

use std::any::Any;
use std::fmt;
use std::mem::{size_of, size_of_val};
use std::sync::Arc;

use super::{Column, ColumnRef};
use crate::error::{BlockError, Result};
use crate::shared_array::{compact_array, same_optional, SharedArray};
use crate::validation::{
    check_array_range, check_readable_position, check_valid_positions, check_valid_region,
};

/// Primitive value storable in a [`FixedWidthColumn`].
pub trait FixedWidth: Copy + Default + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Encoding tag of columns holding this type.
    const ENCODING: &'static str;
}

impl FixedWidth for i32 {
    const ENCODING: &'static str = "INT_ARRAY";
}

impl FixedWidth for i64 {
    const ENCODING: &'static str = "LONG_ARRAY";
}

impl FixedWidth for f64 {
    const ENCODING: &'static str = "DOUBLE_ARRAY";
}

impl FixedWidth for bool {
    const ENCODING: &'static str = "BYTE_ARRAY";
}

/// Column of fixed-width values with an optional null mask.
///
/// Positions are shifted by `offset_base` so that regions can share the
/// value and null arrays of the column they were cut from.
#[derive(Debug, Clone)]
pub struct FixedWidthColumn<T: FixedWidth> {
    offset_base: usize,
    position_count: usize,
    values: SharedArray<T>,
    value_is_null: Option<SharedArray<bool>>,
}

impl<T: FixedWidth> FixedWidthColumn<T> {
    /// Value plus null flag.
    const BYTES_PER_POSITION: u64 = (size_of::<T>() + size_of::<bool>()) as u64;

    /// Creates a column from values and an optional null mask of the same length.
    ///
    /// Values at null positions are kept but never read.
    pub fn new(values: Vec<T>, value_is_null: Option<Vec<bool>>) -> Result<Self> {
        if let Some(mask) = &value_is_null {
            if mask.len() != values.len() {
                return Err(BlockError::InvalidNullMask {
                    required: values.len(),
                    actual: mask.len(),
                });
            }
        }
        let value_is_null = value_is_null.filter(|mask| mask.contains(&true));
        Ok(Self {
            offset_base: 0,
            position_count: values.len(),
            values: values.into(),
            value_is_null: value_is_null.map(SharedArray::from),
        })
    }

    /// Creates a column without nulls.
    pub fn from_values(values: Vec<T>) -> Self {
        Self {
            offset_base: 0,
            position_count: values.len(),
            values: values.into(),
            value_is_null: None,
        }
    }

    /// Creates a column from optional values, `None` being null.
    pub fn from_options<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
    {
        let (values, value_is_null): (Vec<T>, Vec<bool>) = values
            .into_iter()
            .map(|value| (value.unwrap_or_default(), value.is_none()))
            .unzip();
        let has_null = value_is_null.contains(&true);
        Self {
            offset_base: 0,
            position_count: values.len(),
            values: values.into(),
            value_is_null: has_null.then(|| value_is_null.into()),
        }
    }

    /// Returns the value at `position`, or `None` if it is null.
    pub fn get(&self, position: usize) -> Result<Option<T>> {
        check_readable_position(self.position_count, position)?;
        if self.is_null_unchecked(position) {
            return Ok(None);
        }
        Ok(Some(self.values[position + self.offset_base]))
    }

    /// Returns all visible values, `None` marking nulls.
    pub fn to_options(&self) -> Vec<Option<T>> {
        (0..self.position_count)
            .map(|position| {
                (!self.is_null_unchecked(position)).then(|| self.values[position + self.offset_base])
            })
            .collect()
    }

    fn is_null_unchecked(&self, position: usize) -> bool {
        self.value_is_null
            .as_ref()
            .is_some_and(|mask| mask[position + self.offset_base])
    }
}

impl<T: FixedWidth> Column for FixedWidthColumn<T> {
    fn position_count(&self) -> usize {
        self.position_count
    }

    fn is_null(&self, position: usize) -> Result<bool> {
        check_readable_position(self.position_count, position)?;
        Ok(self.is_null_unchecked(position))
    }

    fn may_have_null(&self) -> bool {
        self.value_is_null.is_some()
    }

    fn region(self: Arc<Self>, position: usize, length: usize) -> Result<ColumnRef> {
        check_valid_region(self.position_count, position, length)?;
        if position == 0 && length == self.position_count {
            return Ok(self);
        }
        Ok(Arc::new(Self {
            offset_base: self.offset_base + position,
            position_count: length,
            values: self.values.clone(),
            value_is_null: self.value_is_null.clone(),
        }))
    }

    fn copy_region(self: Arc<Self>, position: usize, length: usize) -> Result<ColumnRef> {
        check_valid_region(self.position_count, position, length)?;
        let start = position + self.offset_base;
        let values = compact_array(&self.values, start, length);
        let value_is_null = self
            .value_is_null
            .as_ref()
            .map(|mask| compact_array(mask, start, length));

        if SharedArray::ptr_eq(&values, &self.values)
            && same_optional(value_is_null.as_ref(), self.value_is_null.as_ref())
        {
            return Ok(self);
        }
        Ok(Arc::new(Self {
            offset_base: 0,
            position_count: length,
            values,
            value_is_null,
        }))
    }

    fn copy_positions(&self, positions: &[usize], offset: usize, length: usize) -> Result<ColumnRef> {
        check_array_range(positions.len(), offset, length)?;
        let positions = &positions[offset..offset + length];
        for &position in positions {
            check_readable_position(self.position_count, position)?;
        }

        let values: Vec<T> = positions
            .iter()
            .map(|&position| self.values[position + self.offset_base])
            .collect();
        let value_is_null = self.value_is_null.as_ref().and_then(|_| {
            let mask: Vec<bool> = positions
                .iter()
                .map(|&position| self.is_null_unchecked(position))
                .collect();
            mask.contains(&true).then(|| SharedArray::from(mask))
        });

        Ok(Arc::new(Self {
            offset_base: 0,
            position_count: length,
            values: values.into(),
            value_is_null,
        }))
    }

    fn region_size_in_bytes(&self, position: usize, length: usize) -> Result<u64> {
        check_valid_region(self.position_count, position, length)?;
        Ok(Self::BYTES_PER_POSITION * length as u64)
    }

    fn positions_size_in_bytes(&self, mask: &[bool]) -> Result<u64> {
        check_valid_positions(mask, self.position_count)?;
        let selected = mask.iter().filter(|&&selected| selected).count();
        Ok(Self::BYTES_PER_POSITION * selected as u64)
    }

    fn estimated_data_size(&self, position: usize) -> Result<u64> {
        check_readable_position(self.position_count, position)?;
        if self.is_null_unchecked(position) {
            return Ok(0);
        }
        Ok(size_of::<T>() as u64)
    }

    fn size_in_bytes(&self) -> u64 {
        Self::BYTES_PER_POSITION * self.position_count as u64
    }

    fn retained_size_in_bytes(&self) -> u64 {
        size_of_val(self) as u64
            + self.values.retained_size_in_bytes()
            + self
                .value_is_null
                .as_ref()
                .map_or(0, SharedArray::retained_size_in_bytes)
    }

    fn encoding_name(&self) -> &'static str {
        T::ENCODING
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

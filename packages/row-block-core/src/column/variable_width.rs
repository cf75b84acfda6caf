//! Variable-width binary column.

use std::any::Any;
use std::borrow::Cow;
use std::mem::{size_of, size_of_val};
use std::sync::Arc;

use super::{Column, ColumnRef};
use crate::error::Result;
use crate::shared_array::{compact_array, compact_offsets, same_optional, SharedArray};
use crate::validation::{
    check_array_range, check_readable_position, check_valid_positions, check_valid_region,
};

const ENCODING: &str = "VARIABLE_WIDTH";

/// Offset slot plus null flag.
const OVERHEAD_PER_POSITION: u64 = (size_of::<usize>() + size_of::<bool>()) as u64;

/// Column of byte strings stored back to back in one slab.
///
/// Value `i` spans `slab[offsets[i + offset_base]..offsets[i + offset_base + 1]]`.
/// Null values have an empty span.
#[derive(Debug, Clone)]
pub struct VariableWidthColumn {
    offset_base: usize,
    position_count: usize,
    slab: SharedArray<u8>,
    offsets: SharedArray<usize>,
    value_is_null: Option<SharedArray<bool>>,
}

impl VariableWidthColumn {
    /// Creates a column from optional byte strings, `None` being null.
    pub fn from_bytes<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a [u8]>>,
    {
        let mut slab = Vec::new();
        let mut offsets = vec![0];
        let mut value_is_null = Vec::new();
        for value in values {
            if let Some(bytes) = value {
                slab.extend_from_slice(bytes);
            }
            offsets.push(slab.len());
            value_is_null.push(value.is_none());
        }
        Self::from_parts(slab, offsets, value_is_null)
    }

    /// Creates a column from optional strings, `None` being null.
    pub fn from_strs<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        Self::from_bytes(values.into_iter().map(|value| value.map(str::as_bytes)))
    }

    fn from_parts(slab: Vec<u8>, offsets: Vec<usize>, value_is_null: Vec<bool>) -> Self {
        let has_null = value_is_null.contains(&true);
        Self {
            offset_base: 0,
            position_count: offsets.len() - 1,
            slab: slab.into(),
            offsets: offsets.into(),
            value_is_null: has_null.then(|| value_is_null.into()),
        }
    }

    /// Returns the bytes at `position`, or `None` if the value is null.
    pub fn get_bytes(&self, position: usize) -> Result<Option<&[u8]>> {
        check_readable_position(self.position_count, position)?;
        if self.is_null_unchecked(position) {
            return Ok(None);
        }
        Ok(Some(self.bytes_unchecked(position)))
    }

    /// Returns the value at `position` as text, replacing invalid UTF-8.
    pub fn get_str(&self, position: usize) -> Result<Option<Cow<'_, str>>> {
        Ok(self.get_bytes(position)?.map(String::from_utf8_lossy))
    }

    fn bytes_unchecked(&self, position: usize) -> &[u8] {
        let index = position + self.offset_base;
        &self.slab[self.offsets[index]..self.offsets[index + 1]]
    }

    fn is_null_unchecked(&self, position: usize) -> bool {
        self.value_is_null
            .as_ref()
            .is_some_and(|mask| mask[position + self.offset_base])
    }

    fn value_length(&self, position: usize) -> u64 {
        let index = position + self.offset_base;
        (self.offsets[index + 1] - self.offsets[index]) as u64
    }
}

impl Column for VariableWidthColumn {
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
            slab: self.slab.clone(),
            offsets: self.offsets.clone(),
            value_is_null: self.value_is_null.clone(),
        }))
    }

    fn copy_region(self: Arc<Self>, position: usize, length: usize) -> Result<ColumnRef> {
        check_valid_region(self.position_count, position, length)?;
        let start = position + self.offset_base;
        let slab_start = self.offsets[start];
        let slab_end = self.offsets[start + length];

        let offsets = compact_offsets(&self.offsets, start, length);
        let slab = compact_array(&self.slab, slab_start, slab_end - slab_start);
        let value_is_null = self
            .value_is_null
            .as_ref()
            .map(|mask| compact_array(mask, start, length));

        if SharedArray::ptr_eq(&offsets, &self.offsets)
            && SharedArray::ptr_eq(&slab, &self.slab)
            && same_optional(value_is_null.as_ref(), self.value_is_null.as_ref())
        {
            return Ok(self);
        }
        Ok(Arc::new(Self {
            offset_base: 0,
            position_count: length,
            slab,
            offsets,
            value_is_null,
        }))
    }

    fn copy_positions(&self, positions: &[usize], offset: usize, length: usize) -> Result<ColumnRef> {
        check_array_range(positions.len(), offset, length)?;
        let positions = &positions[offset..offset + length];
        for &position in positions {
            check_readable_position(self.position_count, position)?;
        }

        let mut slab = Vec::new();
        let mut offsets = Vec::with_capacity(length + 1);
        let mut value_is_null = Vec::with_capacity(length);
        offsets.push(0);
        for &position in positions {
            slab.extend_from_slice(self.bytes_unchecked(position));
            offsets.push(slab.len());
            value_is_null.push(self.is_null_unchecked(position));
        }
        Ok(Arc::new(Self::from_parts(slab, offsets, value_is_null)))
    }

    fn region_size_in_bytes(&self, position: usize, length: usize) -> Result<u64> {
        check_valid_region(self.position_count, position, length)?;
        let start = position + self.offset_base;
        let data = self.offsets[start + length] - self.offsets[start];
        Ok(data as u64 + OVERHEAD_PER_POSITION * length as u64)
    }

    fn positions_size_in_bytes(&self, mask: &[bool]) -> Result<u64> {
        check_valid_positions(mask, self.position_count)?;
        Ok(mask
            .iter()
            .enumerate()
            .filter(|&(_, &selected)| selected)
            .map(|(position, _)| self.value_length(position) + OVERHEAD_PER_POSITION)
            .sum())
    }

    fn estimated_data_size(&self, position: usize) -> Result<u64> {
        check_readable_position(self.position_count, position)?;
        if self.is_null_unchecked(position) {
            return Ok(0);
        }
        Ok(self.value_length(position))
    }

    fn size_in_bytes(&self) -> u64 {
        let data = self.offsets[self.offset_base + self.position_count] - self.offsets[self.offset_base];
        data as u64 + OVERHEAD_PER_POSITION * self.position_count as u64
    }

    fn retained_size_in_bytes(&self) -> u64 {
        size_of_val(self) as u64
            + self.slab.retained_size_in_bytes()
            + self.offsets.retained_size_in_bytes()
            + self
                .value_is_null
                .as_ref()
                .map_or(0, SharedArray::retained_size_in_bytes)
    }

    fn encoding_name(&self) -> &'static str {
        ENCODING
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//! Scan routines over byte images addressed by offset tables.
//!
//! 1-D scans take one byte offset per value. 2-D scans take the byte offset
//! of every row plus the offsets of the values within a row, and are an
//! outer loop of 1-D scans over the rows.

use karma_ds::data::PacketRef;
use karma_ds::{foreach_occurrence, DsError, NameLookup, Occurrence, PacketDescriptor, Target};
use karma_types::ElementType;
use tracing::debug;

use crate::convert::{for_each_pair, BlockConverter};
use crate::{ComplexConversion, Extremes, Histogram, Result, ScanConfig, Stats};

/// Runs scans under one [`ScanConfig`].
#[derive(Copy, Clone, Debug, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    fn converter(&self, ty: ElementType, conv: ComplexConversion) -> Result<BlockConverter> {
        BlockConverter::new(ty, conv, self.config.block_size, self.config.too_big)
    }

    /// Widen `acc` to cover every unblanked value at `offsets`.
    ///
    /// Under [`ComplexConversion::Envelope`] each magnitude contributes both
    /// itself and its negation.
    pub fn find_1d_extremes(
        &self,
        data: &[u8],
        ty: ElementType,
        offsets: &[usize],
        conv: ComplexConversion,
        acc: &mut Extremes,
    ) -> Result<()> {
        let mut converter = self.converter(ty, conv)?;
        let envelope = converter.envelope();
        converter.for_each(data, offsets, &mut |value| add_extreme(acc, value, envelope));
        Ok(())
    }

    /// [`find_1d_extremes`](Self::find_1d_extremes) over each row starting
    /// at `row_offsets`.
    pub fn find_2d_extremes(
        &self,
        data: &[u8],
        ty: ElementType,
        row_offsets: &[usize],
        col_offsets: &[usize],
        conv: ComplexConversion,
        acc: &mut Extremes,
    ) -> Result<()> {
        let mut converter = self.converter(ty, conv)?;
        let envelope = converter.envelope();
        for &row in row_offsets {
            converter.for_each(&data[row..], col_offsets, &mut |value| {
                add_extreme(acc, value, envelope)
            });
        }
        Ok(())
    }

    /// Extremes of `count` values spaced `stride` bytes apart from the
    /// start of `data`.
    pub fn find_contiguous_extremes(
        &self,
        data: &[u8],
        ty: ElementType,
        stride: usize,
        count: usize,
        conv: ComplexConversion,
        acc: &mut Extremes,
    ) -> Result<()> {
        let mut converter = self.converter(ty, conv)?;
        let envelope = converter.envelope();
        converter.for_each_strided(data, stride, count, &mut |value| {
            add_extreme(acc, value, envelope)
        });
        Ok(())
    }

    pub fn find_1d_histogram(
        &self,
        data: &[u8],
        ty: ElementType,
        offsets: &[usize],
        conv: ComplexConversion,
        histogram: &mut Histogram,
    ) -> Result<()> {
        let mut converter = self.converter(ty, conv)?;
        converter.for_each(data, offsets, &mut |value| histogram.add(value));
        Ok(())
    }

    pub fn find_2d_histogram(
        &self,
        data: &[u8],
        ty: ElementType,
        row_offsets: &[usize],
        col_offsets: &[usize],
        conv: ComplexConversion,
        histogram: &mut Histogram,
    ) -> Result<()> {
        let mut converter = self.converter(ty, conv)?;
        for &row in row_offsets {
            converter.for_each(&data[row..], col_offsets, &mut |value| histogram.add(value));
        }
        Ok(())
    }

    /// Add the real and imaginary parts of every unblanked value to `sum`.
    pub fn find_1d_sum(
        &self,
        data: &[u8],
        ty: ElementType,
        offsets: &[usize],
        sum: &mut [f64; 2],
    ) -> Result<()> {
        for_each_pair(ty, data, offsets, self.config.too_big, &mut |[re, im]| {
            sum[0] += re;
            sum[1] += im;
        })
    }

    pub fn find_2d_sum(
        &self,
        data: &[u8],
        ty: ElementType,
        row_offsets: &[usize],
        col_offsets: &[usize],
        sum: &mut [f64; 2],
    ) -> Result<()> {
        for &row in row_offsets {
            self.find_1d_sum(&data[row..], ty, col_offsets, sum)?;
        }
        Ok(())
    }

    pub fn find_1d_stats(
        &self,
        data: &[u8],
        ty: ElementType,
        offsets: &[usize],
        conv: ComplexConversion,
        stats: &mut Stats,
    ) -> Result<()> {
        let mut converter = self.converter(ty, conv)?;
        converter.for_each(data, offsets, &mut |value| stats.add(value));
        Ok(())
    }

    pub fn find_2d_stats(
        &self,
        data: &[u8],
        ty: ElementType,
        row_offsets: &[usize],
        col_offsets: &[usize],
        conv: ComplexConversion,
        stats: &mut Stats,
    ) -> Result<()> {
        let mut converter = self.converter(ty, conv)?;
        for &row in row_offsets {
            converter.for_each(&data[row..], col_offsets, &mut |value| stats.add(value));
        }
        Ok(())
    }

    /// Extremes of the element called `name` wherever it occurs below
    /// `packet`: in the packet itself, in every cell of an array, or in
    /// every entry of a list (contiguous block and fragment chain).
    ///
    /// Fails if `name` does not resolve to exactly one numeric element.
    pub fn find_element_extremes(
        &self,
        desc: &PacketDescriptor,
        packet: PacketRef<'_>,
        name: &str,
        conv: ComplexConversion,
        acc: &mut Extremes,
    ) -> Result<()> {
        if let NameLookup::Dimension { .. } = desc.find_name(name) {
            return Err(DsError::NotAnElement(name.to_owned()).into());
        }
        let mut occurrences = Vec::new();
        foreach_occurrence(desc, packet, name, true, |occurrence| {
            occurrences.push(occurrence);
            true
        })?;
        debug!(name, occurrences = occurrences.len(), "element extremes");

        let not_numeric = || DsError::NotNumeric(name.to_owned());
        for occurrence in occurrences {
            match occurrence {
                Occurrence::Element { packet: pdesc, data, index } => {
                    let offset = pdesc.element_offset(index).ok_or_else(not_numeric)?;
                    let ty = pdesc.element_type(index);
                    self.find_1d_extremes(data.bytes(), ty, &[offset], conv, acc)?;
                }
                Occurrence::Array {
                    array,
                    data,
                    target: Target::Element(index),
                } => {
                    let pdesc = array.packet();
                    let offset = pdesc.element_offset(index).ok_or_else(not_numeric)?;
                    let size = pdesc.packet_size();
                    let offsets: Vec<usize> = array
                        .logical_offsets()
                        .into_iter()
                        .map(|cell| cell * size + offset)
                        .collect();
                    let ty = pdesc.element_type(index);
                    self.find_1d_extremes(data.bytes(), ty, &offsets, conv, acc)?;
                }
                Occurrence::List { packet: pdesc, list, index } => {
                    let offset = pdesc.element_offset(index).ok_or_else(not_numeric)?;
                    let ty = pdesc.element_type(index);
                    let size = pdesc.packet_size();
                    let offsets: Vec<usize> =
                        (0..list.contiguous_len()).map(|i| i * size + offset).collect();
                    self.find_1d_extremes(list.contiguous().bytes(), ty, &offsets, conv, acc)?;
                    for id in list.fragment_ids() {
                        if let Some(entry) = list.entry(id) {
                            self.find_1d_extremes(entry.bytes(), ty, &[offset], conv, acc)?;
                        }
                    }
                }
                // Element names never yield dimension runs or dimension targets.
                Occurrence::Array {
                    target: Target::Dimension(_),
                    ..
                }
                | Occurrence::Dimension { .. } => {}
            }
        }
        Ok(())
    }
}

#[inline]
fn add_extreme(acc: &mut Extremes, value: f64, envelope: bool) {
    acc.add(value);
    if envelope {
        acc.add(-value);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]

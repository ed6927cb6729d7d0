use karma_types::{write_value, ElementType, TOO_BIG};
use pretty_assertions::assert_eq;

use super::{for_each_pair, BlockConverter};
use crate::{ComplexConversion, ScanError};

fn image(ty: ElementType, values: &[[f64; 2]]) -> Vec<u8> {
    let size = ty.size();
    let mut bytes = vec![0; values.len() * size];
    for (chunk, &value) in bytes.chunks_mut(size).zip(values) {
        assert!(write_value(ty, chunk, value));
    }
    bytes
}

fn offsets(ty: ElementType, count: usize) -> Vec<usize> {
    (0..count).map(|i| i * ty.size()).collect()
}

fn block_converter(
    ty: ElementType,
    conversion: ComplexConversion,
    block_size: usize,
) -> BlockConverter {
    BlockConverter::new(ty, conversion, block_size, TOO_BIG).unwrap()
}

fn collect(converter: &mut BlockConverter, data: &[u8], offsets: &[usize]) -> Vec<f64> {
    let mut out = Vec::new();
    converter.for_each(data, offsets, &mut |v| out.push(v));
    out
}

#[test]
fn real_values_read_in_offset_order() {
    let data = image(ElementType::I16, &[[3.0, 0.0], [-7.0, 0.0], [12.0, 0.0]]);
    let mut converter = block_converter(ElementType::I16, ComplexConversion::Real, 1024);
    assert_eq!(collect(&mut converter, &data, &[4, 0, 2]), vec![12.0, 3.0, -7.0]);
}

#[test]
fn results_do_not_depend_on_block_boundaries() {
    let values: Vec<[f64; 2]> = (0..10).map(|i| [f64::from(i), 0.0]).collect();
    let data = image(ElementType::F64, &values);
    let offs = offsets(ElementType::F64, 10);
    for block_size in [1, 3, 4, 10, 64] {
        let mut converter = block_converter(ElementType::F64, ComplexConversion::Real, block_size);
        let expected: Vec<f64> = (0..10).map(f64::from).collect();
        assert_eq!(
            collect(&mut converter, &data, &offs),
            expected,
            "block size {block_size}"
        );
    }
}

#[test]
fn zero_block_size_still_converts() {
    let data = image(ElementType::U8, &[[1.0, 0.0], [2.0, 0.0]]);
    let mut converter = block_converter(ElementType::U8, ComplexConversion::Real, 0);
    assert_eq!(collect(&mut converter, &data, &[0, 1]), vec![1.0, 2.0]);
}

#[test]
fn blanked_and_nan_values_are_skipped() {
    let data = image(
        ElementType::F32,
        &[[1.0, 0.0], [1e31, 0.0], [f64::NAN, 0.0], [-4.0, 0.0]],
    );
    let offs = offsets(ElementType::F32, 4);
    let mut converter = block_converter(ElementType::F32, ComplexConversion::Real, 2);
    assert_eq!(collect(&mut converter, &data, &offs), vec![1.0, -4.0]);
}

#[test]
fn custom_threshold_blanks_lower_values() {
    let data = image(ElementType::I32, &[[5.0, 0.0], [100.0, 0.0], [99.0, 0.0]]);
    let offs = offsets(ElementType::I32, 3);
    let mut converter =
        BlockConverter::new(ElementType::I32, ComplexConversion::Real, 8, 100.0).unwrap();
    assert_eq!(collect(&mut converter, &data, &offs), vec![5.0, 99.0]);
}

#[test]
fn complex_reductions() {
    let data = image(ElementType::CF64, &[[3.0, 4.0], [0.0, -2.0]]);
    let offs = offsets(ElementType::CF64, 2);
    let cases = [
        (ComplexConversion::Real, vec![3.0, 0.0]),
        (ComplexConversion::Imaginary, vec![4.0, -2.0]),
        (ComplexConversion::Magnitude, vec![5.0, 2.0]),
        (ComplexConversion::Envelope, vec![5.0, 2.0]),
        (ComplexConversion::SquaredMagnitude, vec![25.0, 4.0]),
        (
            ComplexConversion::Phase,
            vec![4f64.atan2(3.0).to_degrees(), (-2f64).atan2(0.0).to_degrees()],
        ),
    ];
    for (conversion, expected) in cases {
        let mut converter = block_converter(ElementType::CF64, conversion, 16);
        assert_eq!(collect(&mut converter, &data, &offs), expected, "{conversion:?}");
    }
}

#[test]
fn envelope_flag_only_for_complex_types() {
    let complex = block_converter(ElementType::CI16, ComplexConversion::Envelope, 16);
    let real = block_converter(ElementType::I16, ComplexConversion::Envelope, 16);
    assert!(complex.envelope());
    assert!(!real.envelope());
}

#[test]
fn real_types_ignore_the_conversion() {
    let data = image(ElementType::F64, &[[-2.0, 0.0]]);
    let mut converter = block_converter(ElementType::F64, ComplexConversion::Phase, 16);
    assert_eq!(collect(&mut converter, &data, &[0]), vec![-2.0]);
}

#[test]
fn continuous_phase_is_rejected() {
    for ty in [ElementType::CF32, ElementType::F32] {
        let result = BlockConverter::new(ty, ComplexConversion::ContinuousPhase, 16, TOO_BIG);
        assert_eq!(result.err(), Some(ScanError::ContinuousPhaseUnimplemented));
    }
}

#[test]
fn non_numeric_types_are_rejected() {
    let result = BlockConverter::new(ElementType::VString, ComplexConversion::Real, 16, TOO_BIG);
    assert_eq!(result.err(), Some(ScanError::NotNumeric(ElementType::VString)));
}

#[test]
fn strided_reads_skip_padding() {
    // f32 values every 8 bytes, garbage in between
    let mut data = vec![0xFF; 8 * 5];
    for i in 0..5u8 {
        let value = [f64::from(i) * 1.5, 0.0];
        assert!(write_value(ElementType::F32, &mut data[usize::from(i) * 8..], value));
    }
    let mut converter = block_converter(ElementType::F32, ComplexConversion::Real, 2);
    let mut out = Vec::new();
    converter.for_each_strided(&data, 8, 5, &mut |v| out.push(v));
    assert_eq!(out, vec![0.0, 1.5, 3.0, 4.5, 6.0]);
}

#[test]
fn pairs_are_blanked_on_the_real_part() {
    let data = image(ElementType::CF64, &[[1.0, 2.0], [1e30, 0.0], [0.0, 1e30]]);
    let offs = offsets(ElementType::CF64, 3);
    let mut out = Vec::new();
    for_each_pair(ElementType::CF64, &data, &offs, TOO_BIG, &mut |p| out.push(p)).unwrap();
    assert_eq!(out, vec![[1.0, 2.0], [0.0, 1e30]]);
}

#[test]
fn blanked_complex_samples_are_skipped_under_every_reduction() {
    // the second sample is blanked by its real part, its imaginary part is ordinary
    let data = image(ElementType::CF32, &[[1.0, 2.0], [TOO_BIG, 50.0], [f64::NAN, 3.0]]);
    let offs = offsets(ElementType::CF32, 3);
    let cases = [
        (ComplexConversion::Real, vec![1.0]),
        (ComplexConversion::Imaginary, vec![2.0]),
        (ComplexConversion::Magnitude, vec![1f64.hypot(2.0)]),
        (ComplexConversion::SquaredMagnitude, vec![5.0]),
        (ComplexConversion::Phase, vec![2f64.atan2(1.0).to_degrees()]),
    ];
    for (conversion, expected) in cases {
        let mut converter = block_converter(ElementType::CF32, conversion, 2);
        assert_eq!(collect(&mut converter, &data, &offs), expected, "{conversion:?}");
    }

    let mut pairs = Vec::new();
    for_each_pair(ElementType::CF32, &data, &offs, TOO_BIG, &mut |p| pairs.push(p)).unwrap();
    assert_eq!(pairs, vec![[1.0, 2.0]]);
}

#[test]
fn phase_of_a_lone_blanked_sample_yields_nothing() {
    let data = image(ElementType::CF32, &[[TOO_BIG, 50.0]]);
    let mut converter = block_converter(ElementType::CF32, ComplexConversion::Phase, 16);
    assert_eq!(collect(&mut converter, &data, &[0]), Vec::<f64>::new());
}

#[test]
fn strided_reads_cross_block_boundaries_and_skip_blanks() {
    let values: Vec<[f64; 2]> = (0..7)
        .map(|i| if i % 3 == 1 { [TOO_BIG, 1.0] } else { [f64::from(i), 1.0] })
        .collect();
    let data = image(ElementType::CF64, &values);
    let stride = ElementType::CF64.size();
    for block_size in [1, 2, 3, 7, 100] {
        let mut converter =
            block_converter(ElementType::CF64, ComplexConversion::Imaginary, block_size);
        let mut out = Vec::new();
        converter.for_each_strided(&data, stride, 7, &mut |v| out.push(v));
        assert_eq!(out, vec![1.0; 5], "block size {block_size}");
    }
}

#[test]
fn strided_read_of_nothing_touches_no_bytes() {
    let mut converter = block_converter(ElementType::F64, ComplexConversion::Real, 4);
    let mut out = Vec::new();
    converter.for_each_strided(&[], 8, 0, &mut |v| out.push(v));
    assert!(out.is_empty());
}

#[test]
fn pairs_reject_strings() {
    let result = for_each_pair(ElementType::FString, &[], &[], TOO_BIG, &mut |_| {});
    assert_eq!(result, Err(ScanError::NotNumeric(ElementType::FString)));
}

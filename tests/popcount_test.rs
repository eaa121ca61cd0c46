use popcount_kernel::{
    count_bits, count_bits_permissive, count_bits_strict, AllowList, Input, Item, KernelConfig,
    NdArray, PopcountError, SignedPromotion, Strategy, SupportedWidth,
};

const COMMON_MESSAGE: &str = "xs must be a 1-D np.ndarray(np.uint8|np.uint64)";
const SCALAR_MESSAGE: &str = "xs must be a 1-D uint array (a scalar variable passed?)";

fn configs() -> Vec<KernelConfig> {
    vec![
        KernelConfig::default(),
        KernelConfig::default().with_strategy(Strategy::Table),
    ]
}

fn strict(input: &Input) -> Vec<u8> {
    count_bits_strict(Some(input), &KernelConfig::default())
        .unwrap()
        .into_vec()
}

fn permissive(input: &Input) -> Vec<u8> {
    count_bits_permissive(Some(input), &KernelConfig::default())
        .unwrap()
        .into_vec()
}

#[test]
fn test_some_values_uint8() {
    let xs = Input::from(NdArray::from_vec(vec![0u8, 1, 2, 3, 6, 7, 254, 255]));
    for config in configs() {
        let counts = count_bits_strict(Some(&xs), &config).unwrap();
        assert_eq!(counts.width(), SupportedWidth::W8);
        assert_eq!(counts.as_slice(), &[0, 1, 1, 2, 2, 3, 7, 8]);
        let counts = count_bits_permissive(Some(&xs), &config).unwrap();
        assert_eq!(counts.as_slice(), &[0, 1, 1, 2, 2, 3, 7, 8]);
    }
}

#[test]
fn test_some_values_uint64() {
    let xs = Input::from(NdArray::from_vec(vec![
        0u64,
        1,
        0xfe,
        0xff,
        0x100,
        0x101,
        0xfffe,
        0xffff,
        0x10000,
        0x10001,
        0xfffffffe,
        0xffffffff,
        0x100000000,
        0x100000001,
        0x3c3c3c3c3c3c3c3c,
        0xc3c3c3c3c3c3c3c3,
        0xffffffffffffffff,
    ]));
    let expected = [0, 1, 7, 8, 1, 2, 15, 16, 1, 2, 31, 32, 1, 2, 32, 32, 64];
    for config in configs() {
        let counts = count_bits_strict(Some(&xs), &config).unwrap();
        assert_eq!(counts.width(), SupportedWidth::W64);
        assert_eq!(counts.as_slice(), &expected);
    }
}

#[test]
fn test_full_values_uint8() {
    let values: Vec<u8> = (0..=255u8).cycle().take(256 * 16).collect();
    let expected: Vec<u8> = values.iter().map(|v| v.count_ones() as u8).collect();
    let xs = Input::from(NdArray::from_vec(values));
    for config in configs() {
        let counts = count_bits_strict(Some(&xs), &config).unwrap();
        assert_eq!(counts.as_slice(), expected.as_slice());
    }
}

#[test]
fn test_64bits_uint() {
    let mut value = 0u64;
    for count in 0..=64u8 {
        let xs = Input::from(NdArray::from_vec(vec![value]));
        for config in configs() {
            let counts = count_bits_strict(Some(&xs), &config).unwrap();
            assert_eq!(counts.as_slice(), &[count], "value {value:#x}");
        }
        if count < 64 {
            value |= 1 << count;
        }
    }
}

#[test]
fn test_empty_array_any_dtype() {
    let inputs = [
        NdArray::from_vec(Vec::<u8>::new()),
        NdArray::from_vec(Vec::<u16>::new()),
        NdArray::from_vec(Vec::<i32>::new()),
        NdArray::from_vec(Vec::<f64>::new()),
        NdArray::from_vec(Vec::<String>::new()),
    ];
    for array in inputs {
        let xs = Input::from(array);
        let counts = count_bits_strict(Some(&xs), &KernelConfig::default()).unwrap();
        assert!(counts.is_empty());
        assert_eq!(counts.width(), SupportedWidth::W8);
        assert!(count_bits_permissive(Some(&xs), &KernelConfig::default())
            .unwrap()
            .is_empty());
    }
    let empty = Input::sequence(Vec::<i64>::new());
    assert!(count_bits_permissive(Some(&empty), &KernelConfig::default())
        .unwrap()
        .is_empty());
}

#[test]
fn test_invalid_dimension() {
    let xs = Input::from(NdArray::with_shape(vec![2, 2], vec![1u8, 2, 3, 4]).unwrap());
    for result in [
        count_bits_strict(Some(&xs), &KernelConfig::default()),
        count_bits_permissive(Some(&xs), &KernelConfig::default()),
    ] {
        let err = result.unwrap_err();
        assert!(matches!(err, PopcountError::TypeMismatch { .. }));
        assert_eq!(err.to_string(), COMMON_MESSAGE);
    }

    let nested = Input::sequence(vec![vec![1i64, 2], vec![3, 4]]);
    let err = count_bits_permissive(Some(&nested), &KernelConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), COMMON_MESSAGE);
}

#[test]
fn test_empty_multi_dimensional_any_dtype() {
    let inputs = [
        NdArray::with_shape(vec![0, 3], Vec::<u8>::new()).unwrap(),
        NdArray::with_shape(vec![0, 3], Vec::<String>::new()).unwrap(),
        NdArray::with_shape(vec![3, 0], Vec::<String>::new()).unwrap(),
    ];
    for array in inputs {
        let xs = Input::from(array);
        let err = count_bits_permissive(Some(&xs), &KernelConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), COMMON_MESSAGE);
        let err = count_bits_strict(Some(&xs), &KernelConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), COMMON_MESSAGE);
    }
}

#[test]
fn test_invalid_element_type() {
    let xs = Input::from(NdArray::from_vec(vec![1u16, 2]));
    let err = count_bits(&xs).unwrap_err();
    assert_eq!(err.to_string(), COMMON_MESSAGE);

    let list = Input::sequence(vec![1i64, 2]);
    let err = count_bits(&list).unwrap_err();
    assert_eq!(err.to_string(), COMMON_MESSAGE);
}

#[test]
fn test_uint32_allow_list() {
    let config = KernelConfig::default().with_allow_list(AllowList::Uint8Uint32);
    let xs = Input::from(NdArray::from_vec(vec![0x7fffffffu32, 0x80000000, 0xffffffff]));
    let counts = count_bits_strict(Some(&xs), &config).unwrap();
    assert_eq!(counts.as_slice(), &[31, 1, 32]);
    assert_eq!(counts.width(), SupportedWidth::W32);

    let wide = Input::from(NdArray::from_vec(vec![1u64]));
    let err = count_bits_strict(Some(&wide), &config).unwrap_err();
    assert_eq!(err.to_string(), "xs must be a 1-D np.ndarray(np.uint8|np.uint32)");
}

#[test]
fn test_scalar_input() {
    let scalar = Input::Scalar(Item::Int(1));
    let zero_dim = Input::from(NdArray::scalar(vec![1u64]).unwrap());
    for xs in [&scalar, &zero_dim] {
        for result in [
            count_bits_strict(Some(xs), &KernelConfig::default()),
            count_bits_permissive(Some(xs), &KernelConfig::default()),
        ] {
            let err = result.unwrap_err();
            assert_eq!(err, PopcountError::ScalarNotArray);
            assert_eq!(err.to_string(), SCALAR_MESSAGE);
        }
    }
}

#[test]
fn test_missing_argument() {
    let err = count_bits_strict(None, &KernelConfig::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "popcount_strict() missing required argument 'xs' (pos 1)"
    );
    let err = count_bits_permissive(None, &KernelConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        PopcountError::MissingArgument { function: "popcount", argument: "xs" }
    ));
}

#[test]
fn test_convertible_element_type() {
    let list = Input::sequence(vec![1i64, 3, 7]);
    let counts = count_bits_permissive(Some(&list), &KernelConfig::default()).unwrap();
    assert_eq!(counts.as_slice(), &[1, 2, 3]);
    assert_eq!(counts.width(), SupportedWidth::W64);

    let values = [0x7fffu16, 0x8000, 0xffff];
    assert_eq!(permissive(&Input::from(NdArray::from_vec(values.to_vec()))), vec![15, 1, 16]);
    assert_eq!(permissive(&Input::sequence(values.to_vec())), vec![15, 1, 16]);

    let values = [0x7fffffffu32, 0x80000000, 0xffffffff];
    assert_eq!(permissive(&Input::from(NdArray::from_vec(values.to_vec()))), vec![31, 1, 32]);
    assert_eq!(permissive(&Input::sequence(values.to_vec())), vec![31, 1, 32]);
}

#[test]
fn test_lossy_conversion_before_call() {
    let values = [0x7ffffffcu32, 0x80000003, 0xfffffffe];
    let truncated: Vec<u8> = values.iter().map(|&v| v as u8).collect();
    assert_eq!(permissive(&Input::from(NdArray::from_vec(truncated))), vec![6, 2, 7]);
    assert_eq!(permissive(&Input::sequence(values.to_vec())), vec![29, 3, 31]);
}

#[test]
fn test_not_convertible_element_type() {
    let list = Input::Sequence(vec![Item::Int(1), Item::from("str")]);
    let err = count_bits_permissive(Some(&list), &KernelConfig::default()).unwrap_err();
    assert!(matches!(err, PopcountError::Conversion { index: 1, .. }));

    let too_wide = Input::Sequence(vec![Item::Int(1 << 64)]);
    assert!(matches!(
        count_bits_permissive(Some(&too_wide), &KernelConfig::default()),
        Err(PopcountError::Conversion { index: 0, .. })
    ));

    let fraction = Input::from(NdArray::from_vec(vec![1.0f64, 2.5]));
    assert!(matches!(
        count_bits_permissive(Some(&fraction), &KernelConfig::default()),
        Err(PopcountError::Conversion { index: 1, .. })
    ));

    let text = Input::from(NdArray::from_vec(vec!["a".to_string()]));
    assert!(matches!(
        count_bits_permissive(Some(&text), &KernelConfig::default()),
        Err(PopcountError::Conversion { .. })
    ));
}

#[test]
fn test_negative_integer_sign_extended() {
    let arg8 = Input::from(NdArray::from_vec(vec![-1i8, -2]));
    let arg16 = Input::from(NdArray::from_vec(vec![-4i16, -8]));
    let arg32 = Input::from(NdArray::from_vec(vec![-16i32, -32]));
    assert_eq!(permissive(&arg8), vec![64, 63]);
    assert_eq!(permissive(&arg16), vec![62, 61]);
    assert_eq!(permissive(&arg32), vec![60, 59]);
    assert_eq!(permissive(&Input::sequence(vec![-1i64])), vec![64]);

    for xs in [&arg8, &arg16, &arg32] {
        let err = count_bits_strict(Some(xs), &KernelConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), COMMON_MESSAGE);
    }
}

#[test]
fn test_negative_integer_native_width() {
    let config = KernelConfig::default().with_signed_promotion(SignedPromotion::NativeWidth);
    let arg8 = Input::from(NdArray::from_vec(vec![-1i8, -2]));
    let counts = count_bits_permissive(Some(&arg8), &config).unwrap();
    assert_eq!(counts.as_slice(), &[8, 7]);
    assert_eq!(counts.width(), SupportedWidth::W8);

    let arg16 = Input::from(NdArray::from_vec(vec![-4i16]));
    let counts = count_bits_permissive(Some(&arg16), &config).unwrap();
    assert_eq!(counts.as_slice(), &[14]);
    assert_eq!(counts.width(), SupportedWidth::W16);

    let arg64 = Input::from(NdArray::from_vec(vec![-1i64]));
    assert_eq!(count_bits_permissive(Some(&arg64), &config).unwrap().as_slice(), &[64]);
}

#[test]
fn test_bool_and_integral_float_arrays() {
    let flags = Input::from(NdArray::from_vec(vec![true, false]));
    assert_eq!(permissive(&flags), vec![1, 0]);
    let floats = Input::from(NdArray::from_vec(vec![255.0f32, -1.0]));
    assert_eq!(permissive(&floats), vec![8, 64]);
}

#[test]
fn test_repeat_calls_agree() {
    let xs = Input::from(NdArray::from_vec(vec![3u8, 5, 7]));
    assert_eq!(strict(&xs), strict(&xs));
    let bad = Input::from(NdArray::from_vec(vec![3i8]));
    assert_eq!(count_bits(&bad), count_bits(&bad));
}

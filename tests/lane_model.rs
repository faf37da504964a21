// tests/lane_model.rs
// Vector, mask and shuffle behavior observed through the public API.

use ferrous_lanes::lanes::{
    BinaryOp, CompareOp, DoubleVector256, ElementKind, ExceptionalIndex, FloatVector128, Halffloat,
    IntVector128, IntVector256, LaneMask, LongVector512, ReductionOp, Shuffle, Species, TernaryOp,
    TestOp, UnaryOp, Vector, VectorShape,
};
use ferrous_lanes::LaneError;
use proptest::prelude::*;

// Every lanewise binary operator a 32-bit integer lane supports.
const INT_OPS: [BinaryOp; 17] = [
    BinaryOp::Add,
    BinaryOp::Sub,
    BinaryOp::Mul,
    BinaryOp::Div,
    BinaryOp::Min,
    BinaryOp::Max,
    BinaryOp::And,
    BinaryOp::Or,
    BinaryOp::Xor,
    BinaryOp::AndNot,
    BinaryOp::Lshl,
    BinaryOp::Ashr,
    BinaryOp::Lshr,
    BinaryOp::Rol,
    BinaryOp::Ror,
    BinaryOp::CompressBits,
    BinaryOp::ExpandBits,
];

fn scalar_int_op(op: BinaryOp, a: i32, b: i32) -> Option<i32> {
    let count = (b as u32) & 31;
    Some(match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return None;
            }
            a.wrapping_div(b)
        }
        BinaryOp::Min => a.min(b),
        BinaryOp::Max => a.max(b),
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        BinaryOp::AndNot => a & !b,
        BinaryOp::Lshl => a << count,
        BinaryOp::Ashr => a >> count,
        BinaryOp::Lshr => ((a as u32) >> count) as i32,
        BinaryOp::Rol => a.rotate_left(count),
        BinaryOp::Ror => a.rotate_right(count),
        BinaryOp::CompressBits => ferrous_lanes::core::compress_u32(a as u32, b as u32) as i32,
        BinaryOp::ExpandBits => ferrous_lanes::core::expand_u32(a as u32, b as u32) as i32,
    })
}

proptest! {
    #[test]
    fn lanewise_matches_scalar_loop(
        a in prop::array::uniform8(any::<i32>()),
        b in prop::array::uniform8(any::<i32>()),
        op_index in 0usize..INT_OPS.len(),
    ) {
        let op = INT_OPS[op_index];
        let va = IntVector256::from_lanes(a);
        let vb = IntVector256::from_lanes(b);
        let expected: Option<Vec<i32>> = (0..8).map(|i| scalar_int_op(op, a[i], b[i])).collect();
        match (va.lanewise(op, &vb), expected) {
            (Ok(v), Some(e)) => prop_assert_eq!(v.to_array().to_vec(), e),
            (Err(LaneError::DivisionByZero { lane }), None) => prop_assert_eq!(b[lane], 0),
            (got, want) => prop_assert!(false, "{:?} vs {:?}", got, want),
        }
    }

    #[test]
    fn masked_lanewise_keeps_unset_lanes(
        a in prop::array::uniform4(any::<i32>()),
        b in prop::array::uniform4(any::<i32>()),
        bits in 0u64..16,
    ) {
        let mask = LaneMask::<i32, 4>::from_long(bits);
        let r = IntVector128::from_lanes(a)
            .lanewise_masked(BinaryOp::Xor, &IntVector128::from_lanes(b), &mask)
            .unwrap();
        for i in 0..4 {
            let want = if bits >> i & 1 == 1 { a[i] ^ b[i] } else { a[i] };
            prop_assert_eq!(r.lane(i).unwrap(), want);
        }
    }

    #[test]
    fn vector_compress_then_expand(
        a in prop::array::uniform8(any::<i32>()),
        bits in 0u64..256,
    ) {
        let v = IntVector256::from_lanes(a);
        let mask = LaneMask::<i32, 8>::from_long(bits);
        let packed = v.compress(&mask);
        let kept: Vec<i32> = (0..8).filter(|&i| bits >> i & 1 == 1).map(|i| a[i]).collect();
        prop_assert_eq!(&packed.to_array()[..kept.len()], &kept[..]);
        prop_assert!(packed.to_array()[kept.len()..].iter().all(|&x| x == 0));
        prop_assert_eq!(packed.expand(&mask), v.blend(&IntVector256::zero(), &mask.not()));
        prop_assert_eq!(mask.compress().true_count(), mask.true_count());
    }

    #[test]
    fn integer_reductions_match_fold(a in prop::array::uniform8(any::<i64>())) {
        let v = LongVector512::from_lanes(a);
        prop_assert_eq!(v.reduce_lanes(ReductionOp::Add).unwrap(), a.iter().fold(0i64, |s, &x| s.wrapping_add(x)));
        prop_assert_eq!(v.reduce_lanes(ReductionOp::Mul).unwrap(), a.iter().fold(1i64, |s, &x| s.wrapping_mul(x)));
        prop_assert_eq!(v.reduce_lanes(ReductionOp::Or).unwrap(), a.iter().fold(0i64, |s, &x| s | x));
        prop_assert_eq!(v.reduce_lanes(ReductionOp::And).unwrap(), a.iter().fold(-1i64, |s, &x| s & x));
        prop_assert_eq!(v.reduce_lanes(ReductionOp::Min).unwrap(), *a.iter().min().unwrap());
    }

    #[test]
    fn shuffle_composition(
        a in prop::array::uniform4(any::<i32>()),
        s1 in prop::array::uniform4(-4i64..8),
        s2 in prop::array::uniform4(-4i64..8),
    ) {
        let v = IntVector128::from_lanes(a);
        let first = Shuffle::<i32, 4>::from_values(&s1).unwrap();
        let second = Shuffle::<i32, 4>::from_values(&s2).unwrap();
        let sequential = v.rearrange(&first).unwrap().rearrange(&second).unwrap();
        let composed = v.rearrange(&first.rearrange(&second).unwrap()).unwrap();
        prop_assert_eq!(sequential, composed);
    }
}

#[test]
fn test_species_registry() {
    for species in Species::all() {
        assert_eq!(species.lane_count() * species.element_bits(), species.vector_bits());
    }
    let s = IntVector256::species();
    assert!(std::ptr::eq(s, Species::of(ElementKind::Int, VectorShape::S256)));
    assert_eq!(s.lane_count(), 8);
    assert_eq!(Species::for_lane_count(ElementKind::Long, 8).unwrap().shape(), VectorShape::S512);
    assert!(matches!(
        Species::for_lane_count(ElementKind::Long, 3),
        Err(LaneError::InvalidArgument(_))
    ));
    assert_eq!(s.loop_bound(21), 16);
}

#[test]
fn test_memory_bounds() {
    let data: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let v = DoubleVector256::from_array(&data, 6).unwrap();
    assert_eq!(v.to_array(), [6.0, 7.0, 8.0, 9.0]);
    assert_eq!(
        DoubleVector256::from_array(&data, 7),
        Err(LaneError::OutOfBounds { index: 7, length: 10 })
    );
    assert!(v.lane(4).is_err());
    assert!(v.with_lane(4, 0.0).is_err());

    let tail = LaneMask::<f64, 4>::index_in_range(8, 10);
    let w = DoubleVector256::from_array_masked(&data, 8, &tail).unwrap();
    assert_eq!(w.to_array(), [8.0, 9.0, 0.0, 0.0]);
    let mut out = vec![-1.0; 10];
    w.into_array_masked(&mut out, 8, &tail).unwrap();
    assert_eq!(&out[8..], &[8.0, 9.0]);
}

#[test]
fn test_float_lanes() {
    let v = FloatVector128::from_lanes([1.0, -0.0, f32::NAN, f32::INFINITY]);
    assert_eq!(v.test(TestOp::IsNan).unwrap().to_long().unwrap(), 0b0100);
    assert_eq!(v.test(TestOp::IsFinite).unwrap().to_long().unwrap(), 0b0011);
    assert_eq!(v.test(TestOp::IsNegative).unwrap().to_long().unwrap(), 0b0010);
    assert!(matches!(
        v.lanewise(BinaryOp::And, &v),
        Err(LaneError::UnsupportedOperation(_))
    ));
    assert!(matches!(
        v.compare(CompareOp::UnsignedLt, &v),
        Err(LaneError::UnsupportedOperation(_))
    ));

    let fma = FloatVector128::broadcast(2.0)
        .lanewise_ternary(TernaryOp::Fma, &FloatVector128::broadcast(3.0), &FloatVector128::broadcast(1.0))
        .unwrap();
    assert_eq!(fma.to_array(), [7.0; 4]);
    let sqrt = FloatVector128::broadcast(16.0).lanewise_unary(UnaryOp::Sqrt).unwrap();
    assert_eq!(sqrt.reduce_lanes(ReductionOp::Add).unwrap(), 16.0);
}

#[test]
fn test_halffloat_lanes() {
    let one = Halffloat::ONE;
    let v = Vector::<Halffloat, 8>::broadcast(one);
    let sum = v.reduce_lanes(ReductionOp::Add).unwrap();
    assert_eq!(sum.to_f32(), 8.0);
    let big = Vector::<Halffloat, 8>::broadcast(Halffloat::MAX_VALUE);
    let overflow = big.lanewise(BinaryOp::Add, &big).unwrap();
    assert!(overflow.lane(0).unwrap().is_infinite());
}

#[test]
fn test_mask_queries() {
    let m = LaneMask::<i32, 8>::from_values(&[false, true, false, true, true, false, false, false]).unwrap();
    assert_eq!(m.true_count(), 3);
    assert_eq!(m.first_true(), Some(1));
    assert_eq!(m.last_true(), Some(4));
    assert!(m.any_true() && !m.all_true());
    assert_eq!(m.to_long().unwrap(), 0b1_1010);
    assert_eq!(LaneMask::<i32, 8>::none().first_true(), None);
    assert!(m.cast::<f32, 8>().is_ok());
    assert!(matches!(m.cast::<i64, 4>(), Err(LaneError::InvalidArgument(_))));
    assert!(LaneMask::<i32, 8>::from_values(&[true; 4]).is_err());
}

#[test]
fn test_rearrange_exceptional_policies() {
    let v = IntVector128::from_lanes([10, 20, 30, 40]);
    let s = Shuffle::<i32, 4>::from_values(&[5, -1, 2, 0]).unwrap();
    assert_eq!(s.policy(), ExceptionalIndex::Wrap);
    assert_eq!(v.rearrange(&s).unwrap().to_array(), [20, 40, 30, 10]);
    assert_eq!(
        v.rearrange(&s.with_policy(ExceptionalIndex::Zero)).unwrap().to_array(),
        [0, 0, 30, 10]
    );
    assert_eq!(
        v.rearrange(&s.with_policy(ExceptionalIndex::Clamp)).unwrap().to_array(),
        [40, 10, 30, 10]
    );
    assert!(matches!(
        v.rearrange(&s.with_policy(ExceptionalIndex::Fail)),
        Err(LaneError::OutOfBounds { index: 5, length: 4 })
    ));
    let mask = LaneMask::<i32, 4>::from_long(0b1100);
    assert_eq!(
        v.rearrange_masked(&s.with_policy(ExceptionalIndex::Fail), &mask).unwrap().to_array(),
        [0, 0, 30, 10]
    );
}

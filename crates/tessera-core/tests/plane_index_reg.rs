//! Plane index regression test
//!
//! Checks stack-number conversion against the frame-major, slice, channel
//! layout, inverse conversion, clamping, and the axis named on errors.

use tessera_core::{Dimensions, Error, PlaneIndex};
use tessera_test::RegParams;

#[test]
fn plane_index_reg() {
    let mut rp = RegParams::new("plane_index");

    let dims = Dimensions::new(3, 4, 2).expect("dims");
    rp.compare_values(24.0, dims.plane_count() as f64, 0.0);

    // t*C*Z + z*C + c + 1
    for t in 0..2 {
        for z in 0..4 {
            for c in 0..3 {
                let number = PlaneIndex::new(z, c, t)
                    .to_stack_number(&dims)
                    .expect("in range");
                let expected = t * 3 * 4 + z * 3 + c + 1;
                rp.compare_values(expected as f64, number as f64, 0.0);
                let back = PlaneIndex::from_stack_number(number, &dims).expect("inverse");
                rp.compare_values(1.0, (back == PlaneIndex::new(z, c, t)) as u8 as f64, 0.0);
            }
        }
    }

    // Stack order iteration matches stack numbers
    let ordered = dims
        .indices()
        .enumerate()
        .all(|(i, idx)| idx.to_stack_number(&dims).ok() == Some(i + 1));
    rp.compare_values(1.0, ordered as u8 as f64, 0.0);

    // Errors name the offending axis
    for (index, axis) in [
        (PlaneIndex::new(0, 3, 0), "channel"),
        (PlaneIndex::new(4, 0, 0), "slice"),
        (PlaneIndex::new(0, 0, 2), "frame"),
    ] {
        let err = index.to_stack_number(&dims).unwrap_err();
        let named = matches!(err, Error::PlaneIndexOutOfRange { axis: a, .. } if a == axis);
        rp.compare_values(1.0, named as u8 as f64, 0.0);
        eprintln!("  {}: {}", index, err);
    }

    let safe = PlaneIndex::new(10, 10, 10).clamp_to(&dims);
    rp.compare_values(1.0, (safe == PlaneIndex::new(3, 2, 1)) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "plane_index regression test failed");
}

//! Raster plumbing regression test
//!
//! Exercises crop/paste, sample-type coercion, plane-map merging and
//! plane-count adjustment on synthetic rasters.

use std::collections::BTreeMap;

use tessera_core::{
    Calibration, Dimensions, PlaneIndex, Raster, Rect, SampleType, consensus_sample_type,
};
use tessera_test::{RegParams, gradient_plane, gradient_raster};

#[test]
fn raster_crop_paste_reg() {
    let mut rp = RegParams::new("raster_crop_paste");

    let dims = Dimensions::new(2, 2, 1).expect("dims");
    let src = gradient_raster(40, 30, SampleType::Gray16, dims).expect("gradient");
    rp.show("source", &src);

    // Crop then paste back into a blank copy restores the cropped region
    let rect = Rect::new(5, 7, 20, 10).expect("rect");
    let cropped = src.crop(&rect).expect("crop");
    rp.compare_values(20.0, cropped.width() as f64, 0.0);
    rp.compare_values(10.0, cropped.height() as f64, 0.0);
    rp.compare_values(4.0, cropped.plane_count() as f64, 0.0);

    let mut canvas = src.create_template(40, 30).expect("template").to_mut();
    canvas.insert(&cropped, 5, 7).expect("insert");
    let canvas: Raster = canvas.into();
    let again = canvas.crop(&rect).expect("crop again");
    rp.compare_rasters(&cropped, &again);

    // Outside the pasted rectangle the canvas stayed zero
    let corner = canvas.planes()[3].get_value(0, 0).unwrap_or(-1.0);
    rp.compare_values(0.0, corner as f64, 0.0);

    assert!(rp.cleanup(), "raster_crop_paste regression test failed");
}

#[test]
fn raster_convert_reg() {
    let mut rp = RegParams::new("raster_convert");

    let src = gradient_raster(16, 16, SampleType::Gray8, Dimensions::SINGLE).expect("gradient");
    let mut m = src.to_mut();
    m.set_calibration(Some(Calibration::isotropic(0.25, "um")));
    let src: Raster = m.into();

    // Promotions are exact and keep calibration
    for target in [SampleType::Gray16, SampleType::Gray32] {
        let up = src.convert_to(target, true).expect("promote");
        let down = up.convert_to(SampleType::Gray8, false).expect("demote");
        rp.compare_rasters(&src, &down);
        let cal = up.calibration().map(|c| c.pixel_width).unwrap_or(0.0);
        rp.compare_values(0.25, cal, 0.0);
    }

    // Scaled 16 -> 8 stretches the value range
    let wide = gradient_raster(64, 64, SampleType::Gray16, Dimensions::SINGLE).expect("gradient");
    let (lo, hi) = wide.value_range();
    let narrow = wide.convert_to(SampleType::Gray8, true).expect("scale");
    let (nlo, nhi) = narrow.value_range();
    eprintln!("  16-bit range {}..{} -> {}..{}", lo, hi, nlo, nhi);
    rp.compare_values(0.0, nlo as f64, 0.0);
    rp.compare_values(255.0, nhi as f64, 0.0);

    // RGB wins the consensus, otherwise the widest type
    let mixed = [SampleType::Gray16, SampleType::Gray8];
    rp.compare_values(
        16.0,
        consensus_sample_type(mixed).map_or(0, |t| t.bit_depth()) as f64,
        0.0,
    );
    let with_rgb = [SampleType::Gray32, SampleType::Rgb];
    rp.compare_values(
        24.0,
        consensus_sample_type(with_rgb).map_or(0, |t| t.bit_depth()) as f64,
        0.0,
    );

    assert!(rp.cleanup(), "raster_convert regression test failed");
}

#[test]
fn raster_slices_reg() {
    let mut rp = RegParams::new("raster_slices");

    // Discontinuous slice numbers collapse to a dense stack
    let mut map = BTreeMap::new();
    for (i, z) in [2usize, 5, 9].into_iter().enumerate() {
        let plane = gradient_plane(8, 8, SampleType::Gray8, i as u32).expect("plane");
        map.insert(PlaneIndex::new(z, 0, 0), plane);
    }
    let merged = Raster::from_plane_map(map, false).expect("merge");
    rp.compare_values(3.0, merged.dimensions().slices as f64, 0.0);
    let expected = gradient_plane(8, 8, SampleType::Gray8, 2).expect("plane");
    let last = merged.plane(PlaneIndex::new(2, 0, 0)).expect("last plane");
    rp.compare_values(1.0, last.equals(&expected) as u8 as f64, 0.0);

    // Grow with copies, then shrink back
    let grown = merged
        .ensure_dimensions(Dimensions::new(2, 3, 1).expect("dims"), true)
        .expect("grow");
    rp.compare_values(6.0, grown.plane_count() as f64, 0.0);
    let copied = grown.plane(PlaneIndex::new(2, 1, 0)).expect("copied plane");
    rp.compare_values(1.0, copied.equals(&expected) as u8 as f64, 0.0);
    let shrunk = grown
        .ensure_dimensions(merged.dimensions(), false)
        .expect("shrink");
    rp.compare_rasters(&merged, &shrunk);

    assert!(rp.cleanup(), "raster_slices regression test failed");
}

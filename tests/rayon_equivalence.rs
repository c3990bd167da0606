#![cfg(feature = "rayon")]

use shiftdiff::kernel::rayon::response_map_par;
use shiftdiff::kernel::scalar::{CcorrScalar, ZnccScalar};
use shiftdiff::template::{CcorrPlan, ZnccPlan};
use shiftdiff::{Backend, ImageView, Kernel, MatchConfig, Roi, ShiftFinder};

fn make_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 11) ^ (y * 3) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

#[test]
fn parallel_response_matches_sequential() {
    let data = make_image(90, 70);
    let image = ImageView::from_slice(&data, 90, 70).unwrap();
    let tpl = image.roi(30, 20, 16, 12).unwrap();

    let ccorr = CcorrPlan::from_view(tpl).unwrap();
    let seq = CcorrScalar::response_map(image, &ccorr, 0.0).unwrap();
    let par = response_map_par::<CcorrScalar>(image, &ccorr, 0.0).unwrap();
    assert_eq!(seq.scores(), par.scores());

    let zncc = ZnccPlan::from_view(tpl).unwrap();
    let seq = ZnccScalar::response_map(image, &zncc, 1e-8).unwrap();
    let par = response_map_par::<ZnccScalar>(image, &zncc, 1e-8).unwrap();
    assert_eq!(seq.scores(), par.scores());
}

#[test]
fn parallel_finder_matches_sequential() {
    let data = make_image(90, 70);
    let image = ImageView::from_slice(&data, 90, 70).unwrap();

    let base = MatchConfig {
        backend: Backend::Direct,
        ..MatchConfig::default()
    };
    let seq = ShiftFinder::new(base.clone())
        .locate(image, image, Roi::new(30, 20, 16, 12))
        .unwrap();
    let par = ShiftFinder::new(MatchConfig {
        parallel: true,
        ..base
    })
    .locate(image, image, Roi::new(30, 20, 16, 12))
    .unwrap();
    assert_eq!(seq, par);
    assert_eq!((par.shift.dx, par.shift.dy), (0, 0));
}

use shiftdiff::template::{CcorrPlan, ZnccPlan};
use shiftdiff::{ImageView, OwnedImage, Roi, Shift, ShiftDiffError, Template};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        ShiftDiffError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        ShiftDiffError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        ShiftDiffError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, ShiftDiffError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_roi_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();
    assert_eq!(view.stride(), 4);
    assert_eq!(view.as_slice(), data.as_slice());

    let roi = view.roi(1, 1, 2, 2).unwrap();
    assert_eq!(roi.width(), 2);
    assert_eq!(roi.height(), 2);
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0).unwrap(), &[5u8, 6u8]);
    assert_eq!(roi.row(1).unwrap(), &[9u8, 10u8]);
    assert_eq!(roi.get(0, 0).copied(), Some(5u8));
    assert!(roi.get(2, 0).is_none());

    let err = view.roi(3, 3, 2, 2).err().unwrap();
    assert_eq!(
        err,
        ShiftDiffError::RoiOutOfBounds {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 4,
        }
    );
}

#[test]
fn crop_rejects_region_past_the_edge() {
    let img = OwnedImage::filled(1400, 1000, 0).unwrap();
    let err = img.view().crop(Roi::new(300, 200, 1200, 900)).err().unwrap();
    assert_eq!(
        err,
        ShiftDiffError::RoiOutOfBounds {
            x: 300,
            y: 200,
            width: 1200,
            height: 900,
            img_width: 1400,
            img_height: 1000,
        }
    );
}

#[test]
fn template_remembers_its_origin() {
    let data: Vec<u8> = (0u8..30).collect();
    let view = ImageView::from_slice(&data, 6, 5).unwrap();
    let tpl = Template::cut(view, Roi::new(2, 1, 3, 2)).unwrap();
    assert_eq!(tpl.origin(), (2, 1));
    assert_eq!((tpl.width(), tpl.height()), (3, 2));
    assert_eq!(tpl.view().row(1).unwrap(), &[14u8, 15, 16]);
    assert_eq!(Shift::between(tpl.origin(), (5, 0)), Shift { dx: -3, dy: 1 });
}

#[test]
fn template_plans_match_known_stats() {
    let tpl = Template::new(vec![0u8, 1, 2, 3], 2, 2).unwrap();

    let ccorr = CcorrPlan::from_view(tpl.view()).unwrap();
    assert_eq!((ccorr.width(), ccorr.height()), (2, 2));
    assert_eq!(ccorr.energy(), 14.0);

    let zncc = ZnccPlan::from_view(tpl.view()).unwrap();
    assert!((zncc.mean() - 1.5).abs() < 1e-12);
    assert!((zncc.var_t() - 5.0).abs() < 1e-12);
}

#[test]
fn template_plans_reject_degenerate_templates() {
    let flat = Template::new(vec![5u8; 4], 2, 2).unwrap();
    let err = ZnccPlan::from_view(flat.view()).err().unwrap();
    assert_eq!(
        err,
        ShiftDiffError::DegenerateTemplate {
            reason: "zero variance",
        }
    );
    assert!(CcorrPlan::from_view(flat.view()).is_ok());

    let black = Template::new(vec![0u8; 4], 2, 2).unwrap();
    assert!(CcorrPlan::from_view(black.view()).is_err());
}

use cellstats_core::channel::ChannelRole;
use cellstats_core::frame::GrayFrame;
use cellstats_core::overlay::{label_color, render_overlay, render_segmentation};
use ndarray::{array, Array2};

fn painted(role: ChannelRole) -> [u8; 3] {
    let base = GrayFrame::new(Array2::from_elem((3, 3), 90));
    let mut labels = Array2::<u32>::zeros((3, 3));
    labels[[1, 1]] = 1;
    let color = role.policy().unwrap().overlay_color;
    let out = render_overlay(&base, &labels, color);
    assert_eq!(out.red.data[[0, 0]], 90);
    [out.red.data[[1, 1]], out.green.data[[1, 1]], out.blue.data[[1, 1]]]
}

#[test]
fn test_overlay_only_touches_labelled_pixels() {
    let base = GrayFrame::new(array![[10, 20], [30, 40]]);
    let labels = array![[0, 1], [0, 0]];
    let out = render_overlay(&base, &labels, [0, 255, 0]);
    assert_eq!(out.red.data, array![[10, 0], [30, 40]]);
    assert_eq!(out.green.data, array![[10, 255], [30, 40]]);
    assert_eq!(out.blue.data, array![[10, 0], [30, 40]]);
}

#[test]
fn test_role_overlay_colours() {
    assert_eq!(painted(ChannelRole::Brightfield), [0, 255, 0]);
    assert_eq!(painted(ChannelRole::Red), [255, 0, 0]);
    assert_eq!(painted(ChannelRole::Green), [0, 255, 255]);
    assert_eq!(painted(ChannelRole::Blue), [0, 0, 255]);
    assert_eq!(painted(ChannelRole::Yellow), [0, 0, 255]);
    assert!(ChannelRole::Skip.policy().is_none());
}

#[test]
fn test_segmentation_background_stays_black() {
    let labels = array![[0, 2], [1, 0]];
    let out = render_segmentation(&labels);
    assert_eq!(out.red.data[[0, 0]], 0);
    assert_eq!(out.green.data[[0, 0]], 0);
    assert_eq!(out.blue.data[[0, 0]], 0);
    assert_ne!(label_color(1), label_color(2));
    assert_eq!(
        [out.red.data[[1, 0]], out.green.data[[1, 0]], out.blue.data[[1, 0]]],
        label_color(1)
    );
}

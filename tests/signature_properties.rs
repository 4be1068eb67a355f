#![cfg(feature = "raster")]

use signum::backends::raster::RasterCanvas;
use signum::backends::recording::{DrawOp, RecordingCanvas};
use signum::api::{LineCap, LineJoin};
use signum::{ClientRect, InputEvent, Point, SignatureConfig, SignaturePad, ThemeMode, TouchPoint};

type Raster = SignaturePad<RasterCanvas>;

fn raster_pad() -> Raster {
    raster_pad_with(SignatureConfig::default())
}

fn raster_pad_with(config: SignatureConfig) -> Raster {
    let canvas = RasterCanvas::new(config.backing_width(), config.backing_height()).unwrap();
    let mut pad = SignaturePad::new(config);
    pad.mount(canvas).unwrap();
    pad
}

fn draw<C: signum::api::CanvasRenderingContext2D>(pad: &mut SignaturePad<C>, pts: &[(f64, f64)]) {
    assert!(pad.begin_stroke(Point::new(pts[0].0, pts[0].1)));
    for &(x, y) in &pts[1..] {
        pad.extend_stroke(Point::new(x, y)).unwrap();
    }
    assert!(pad.end_stroke());
}

fn strokes() -> Vec<Vec<(f64, f64)>> {
    vec![
        vec![(40.0, 300.0), (120.0, 180.0), (200.0, 320.0), (260.0, 150.0)],
        vec![(300.0, 200.0), (480.0, 210.0)],
        vec![(520.0, 120.0), (600.0, 330.0), (700.0, 90.0), (820.0, 310.0), (960.0, 200.0)],
        vec![(100.0, 360.0), (900.0, 355.0)],
    ]
}

fn pixels(pad: &Raster) -> Vec<u8> {
    pad.canvas().unwrap().pixels().to_vec()
}

#[test]
fn undo_matches_never_having_drawn_the_stroke() {
    let all = strokes();

    let mut undone = raster_pad();
    for s in &all {
        draw(&mut undone, s);
    }
    assert!(undone.undo().unwrap());

    let mut reference = raster_pad();
    for s in &all[..all.len() - 1] {
        draw(&mut reference, s);
    }

    assert_eq!(pixels(&undone), pixels(&reference));
}

fn assert_undo_matches_reference(config: SignatureConfig) {
    let all = strokes();

    let mut undone = raster_pad_with(config.clone());
    for s in &all {
        draw(&mut undone, s);
    }
    assert!(undone.undo().unwrap());

    let mut reference = raster_pad_with(config);
    for s in &all[..all.len() - 1] {
        draw(&mut reference, s);
    }

    let (a, b) = (pixels(&undone), pixels(&reference));
    let differing = a.chunks(4).zip(b.chunks(4)).filter(|(x, y)| x != y).count();
    assert_eq!(differing, 0);
}

#[test]
fn undo_matches_reference_with_butt_caps_and_round_joins() {
    assert_undo_matches_reference(SignatureConfig {
        line_width: 9.0,
        line_cap: LineCap::Butt,
        line_join: LineJoin::Round,
        ..SignatureConfig::default()
    });
}

#[test]
fn undo_matches_reference_with_square_caps_and_bevel_joins() {
    assert_undo_matches_reference(SignatureConfig {
        line_width: 7.0,
        line_cap: LineCap::Square,
        line_join: LineJoin::Bevel,
        ..SignatureConfig::default()
    });
}

#[test]
fn undo_matches_reference_with_translucent_ink() {
    let mut config = SignatureConfig::default();
    config.palette.light = "#00000080".into();
    config.validate().unwrap();
    assert_undo_matches_reference(config);
}

#[test]
fn overlapping_strokes_replay_in_historical_order() {
    let run = |undo: bool| {
        let mut pad = raster_pad();
        pad.set_stroke_color("#ff0000").unwrap();
        draw(&mut pad, &[(100.0, 200.0), (900.0, 200.0)]);
        pad.set_stroke_color("#0000ff").unwrap();
        draw(&mut pad, &[(500.0, 50.0), (500.0, 350.0)]);
        if undo {
            pad.set_stroke_color("#00ff00").unwrap();
            draw(&mut pad, &[(10.0, 10.0), (20.0, 20.0)]);
            pad.undo().unwrap();
        }
        pad
    };

    let replayed = run(true);
    assert_eq!(pixels(&replayed), pixels(&run(false)));
    // the later blue stroke sits on top at the crossing
    assert_eq!(
        replayed.canvas().unwrap().pixel(500, 200),
        Some([0, 0, 255, 255])
    );
}

#[test]
fn undo_k_times_leaves_n_minus_k() {
    let mut pad = raster_pad();
    for s in strokes() {
        draw(&mut pad, &s);
    }
    let n = pad.history().len();
    for k in 1..=n {
        assert!(pad.undo().unwrap());
        assert_eq!(pad.history().len(), n - k);
    }
    assert!(pad.is_empty());
    assert!(pad.canvas().unwrap().is_blank());

    assert!(!pad.undo().unwrap());
    assert_eq!(pad.history().len(), 0);
}

#[test]
fn clear_twice_stays_empty() {
    let mut pad = raster_pad();
    draw(&mut pad, &strokes()[0]);
    pad.clear().unwrap();
    assert!(pad.is_empty());
    assert!(pad.canvas().unwrap().is_blank());
    pad.clear().unwrap();
    assert!(pad.is_empty());
    assert!(pad.canvas().unwrap().is_blank());
}

#[test]
fn export_is_none_until_something_is_drawn() {
    let mut pad = raster_pad();
    pad.clear().unwrap();
    assert_eq!(pad.export_signature().unwrap(), None);

    draw(&mut pad, &strokes()[1]);
    let url = pad.export_signature().unwrap().unwrap();
    assert!(url.starts_with("data:image/png;base64,"));
    assert!(url.len() > "data:image/png;base64,".len());

    pad.clear().unwrap();
    assert_eq!(pad.export_signature().unwrap(), None);

    let image = signum::api::ImageData {
        width: 4,
        height: 1,
        data: vec![0, 0, 0, 255].repeat(4),
    };
    assert!(pad.attach_image(&image).unwrap());
    assert!(pad.export_signature().unwrap().is_some());
}

#[test]
fn unmounted_pad_exports_nothing() {
    let pad: Raster = SignaturePad::new(SignatureConfig::default());
    assert_eq!(pad.export_signature().unwrap(), None);
}

#[test]
fn pointer_coordinates_scale_to_backing_store() {
    let config = SignatureConfig::default();
    let mut pad = SignaturePad::new(config.clone());
    pad.mount(RecordingCanvas::new(1000, 400)).unwrap();
    pad.set_layout(ClientRect::new(0.0, 0.0, 500.0, 200.0));

    assert_eq!(pad.map_client_point(0.0, 0.0), Point::new(0.0, 0.0));
    assert_eq!(pad.map_client_point(250.0, 100.0), Point::new(500.0, 200.0));

    pad.handle_event(&InputEvent::TouchStart {
        touches: vec![TouchPoint {
            client_x: 0.0,
            client_y: 0.0,
        }],
    })
    .unwrap();
    pad.handle_event(&InputEvent::TouchMove {
        touches: vec![TouchPoint {
            client_x: 250.0,
            client_y: 100.0,
        }],
    })
    .unwrap();
    pad.handle_event(&InputEvent::TouchEnd).unwrap();
    assert_eq!(
        pad.history().last().unwrap().points(),
        &[Point::new(0.0, 0.0), Point::new(500.0, 200.0)]
    );
}

#[test]
fn wide_image_is_fit_to_width_and_centered() {
    let mut pad = SignaturePad::new(SignatureConfig::default());
    pad.mount(RecordingCanvas::new(1000, 400)).unwrap();
    let image = signum::api::ImageData::new(400, 100);
    assert!(pad.attach_image(&image).unwrap());

    let ops = pad.canvas().unwrap().ops_since_clear();
    assert_eq!(
        ops,
        &[DrawOp::DrawImageScaled {
            source_width: 400,
            source_height: 100,
            dx: 0.0,
            dy: 75.0,
            dw: 1000.0,
            dh: 250.0,
        }]
    );
}

#[test]
fn attached_image_pixels_are_letterboxed() {
    let mut pad = raster_pad();
    let image = signum::api::ImageData {
        width: 4,
        height: 1,
        data: vec![0, 0, 0, 255].repeat(4),
    };
    pad.attach_image(&image).unwrap();
    let canvas = pad.canvas().unwrap();
    // 4:1 into 1000x400 leaves 75px bands above and below a 250px image
    assert_eq!(canvas.pixel(500, 74), Some([0, 0, 0, 0]));
    assert_eq!(canvas.pixel(500, 75), Some([0, 0, 0, 255]));
    assert_eq!(canvas.pixel(500, 324), Some([0, 0, 0, 255]));
    assert_eq!(canvas.pixel(500, 325), Some([0, 0, 0, 0]));
}

#[test]
fn pointer_down_after_attach_stays_idle() {
    let mut pad = raster_pad();
    pad.attach_image(&signum::api::ImageData::new(10, 10)).unwrap();

    let started = pad
        .handle_event(&InputEvent::MouseDown {
            client_x: 10.0,
            client_y: 10.0,
        })
        .unwrap();
    assert!(!started);
    assert!(!pad.is_drawing());
    pad.handle_event(&InputEvent::MouseMove {
        client_x: 50.0,
        client_y: 50.0,
    })
    .unwrap();
    pad.handle_event(&InputEvent::MouseUp).unwrap();
    assert!(pad.history().is_empty());
}

#[test]
fn dark_theme_inks_white() {
    let mut pad = raster_pad();
    pad.set_theme(ThemeMode::resolve(Some("dark"), false)).unwrap();
    draw(&mut pad, &[(100.0, 100.0), (200.0, 100.0)]);
    assert_eq!(
        pad.canvas().unwrap().pixel(150, 100),
        Some([255, 255, 255, 255])
    );
}

#[tokio::test]
async fn attaches_image_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.png");

    let mut source = RasterCanvas::new(20, 40).unwrap();
    {
        use signum::api::CanvasDrawImage;
        let ink = signum::api::ImageData {
            width: 1,
            height: 1,
            data: vec![10, 20, 30, 255],
        };
        source.draw_image_scaled(&ink, 0.0, 0.0, 20.0, 40.0).unwrap();
    }
    use signum::api::CanvasExport;
    std::fs::write(&path, source.to_png_bytes().unwrap()).unwrap();

    let mut pad = raster_pad();
    assert!(pad.attach_image_file(&path).await.unwrap());
    assert!(pad.has_image());
    // 1:2 into 1000x400 is pillarboxed to 200px wide starting at x=400
    let canvas = pad.canvas().unwrap();
    assert_eq!(canvas.pixel(399, 200), Some([0, 0, 0, 0]));
    assert_eq!(canvas.pixel(400, 200), Some([10, 20, 30, 255]));
    assert_eq!(canvas.pixel(599, 200), Some([10, 20, 30, 255]));
    assert_eq!(canvas.pixel(600, 200), Some([0, 0, 0, 0]));
}

use std::f64::consts::PI;

use tri3d_core::raster::{project_triangle, signed_area};
use tri3d_core::{
    build_mesh, render, render_with_depth, LightMode, RenderParams, Rgb, RotationMatrix,
    ShapeKind, Viewport,
};

/// Inclusive bounds `(x0, y0, x1, y1)` of every non-background pixel.
fn lit_bounds(frame: &tri3d_core::FrameBuffer) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (y, row) in frame.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            if *px == [0, 0, 0] {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}

#[test]
fn cube_silhouette_is_centered_200px_square() {
    let mesh = build_mesh(ShapeKind::Cube, Rgb::from_rgb8(255, 255, 255));
    let frame = render(&mesh, &RenderParams::new(0.0, 0.0, 800, 600, LightMode::Flat));

    let (x0, y0, x1, y1) = lit_bounds(&frame).expect("cube should cover some pixels");
    assert_eq!((x0 + x1) / 2, 400);
    assert_eq!((y0 + y1) / 2, 300);
    assert_eq!(x1 - x0, 200);
    assert_eq!(y1 - y0, 200);

    // Only the front face is visible, head-on
    assert_eq!(frame.pixel(400, 300), [255, 255, 255]);
    assert_eq!(frame.pixel(301, 399), [255, 255, 255]);
}

#[test]
fn cube_front_face_wins_depth() {
    let mesh = build_mesh(ShapeKind::Cube, Rgb::WHITE);
    let (_, depth) = render_with_depth(&mesh, &RenderParams::new(0.0, 0.0, 800, 600, LightMode::Flat));
    assert_eq!(depth.get(400, 300), 100.0);
    assert_eq!(depth.get(10, 10), f64::NEG_INFINITY);
}

#[test]
fn triangle_winding_flips_at_half_turn() {
    let mesh = build_mesh(ShapeKind::Triangle, Rgb::WHITE);
    let corners = mesh.corners(&mesh.triangles()[0]);
    let viewport = Viewport::new(800, 600);

    let front = signed_area(&project_triangle(&corners, &RotationMatrix::orientation(0.0, 0.0), &viewport));
    let back = signed_area(&project_triangle(&corners, &RotationMatrix::orientation(PI, 0.0), &viewport));
    assert!(front * back < 0.0, "front = {front}, back = {back}");

    // The mirrored triangle still rasterizes
    let frame = render(&mesh, &RenderParams::new(PI, 0.0, 800, 600, LightMode::Flat));
    assert_ne!(frame.pixel(400, 366), [0, 0, 0]);
}

#[test]
fn sphere_silhouette_is_round() {
    let mesh = build_mesh(ShapeKind::Icosphere { levels: 4 }, Rgb::WHITE);
    let radius = 30000f64.sqrt();
    for (heading, pitch) in [(0.0, 0.0), (1.0, 0.5), (2.5, -1.2)] {
        let frame = render(&mesh, &RenderParams::new(heading, pitch, 500, 500, LightMode::directional()));
        let (x0, y0, x1, y1) = lit_bounds(&frame).unwrap();
        // Facets sit inside the circumscribed sphere
        assert!(x1 - x0 <= (2.0 * radius) as u32 + 1);
        assert!(y1 - y0 <= (2.0 * radius) as u32 + 1);
        assert!(x1 - x0 >= (1.9 * radius) as u32);
        assert!(y1 - y0 >= (1.9 * radius) as u32);
    }
}

#[test]
fn color_is_carried_into_pixels() {
    let orange = "#ff8800".parse::<Rgb>().unwrap();
    let mesh = build_mesh("square".parse().unwrap(), orange);
    let frame = render(&mesh, &RenderParams::new(0.0, 0.0, 300, 300, LightMode::Flat));
    assert_eq!(frame.pixel(150, 150), [0xff, 0x88, 0x00]);

    let rgba = frame.to_rgba8();
    let idx = (150 * 300 + 150) * 4;
    assert_eq!(&rgba[idx..idx + 4], &[0xff, 0x88, 0x00, 0xff]);
}

#[test]
fn pixels_outside_viewport_are_clipped() {
    // A 200px cube in a 120x80 viewport covers it entirely without panicking
    let mesh = build_mesh(ShapeKind::Cube, Rgb::WHITE);
    let frame = render(&mesh, &RenderParams::new(0.3, 0.2, 120, 80, LightMode::Flat));
    assert_eq!(frame.pixels().len(), 120 * 80);
    assert!(frame.pixels().iter().all(|p| *p != [0, 0, 0]));
}

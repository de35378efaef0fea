//! Property-based tests for rasterizer invariants using the `proptest` crate.

use proptest::prelude::*;

use nalgebra::Point3;
use tri3d_core::raster::{barycentric, is_inside, project_triangle, signed_area};
use tri3d_core::shapes::{icosphere, icosphere_radius};
use tri3d_core::{render, render_with_depth, shade, LightMode, MeshBuilder, RenderParams, Rgb};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary screen-space point inside a 200x200 viewport, with some depth.
fn arb_screen_point() -> impl Strategy<Value = Point3<f64>> {
    (0.0f64..200.0, 0.0f64..200.0, -100.0f64..100.0).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

fn arb_color() -> impl Strategy<Value = Rgb> {
    (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(r, g, b)| Rgb::new(r, g, b))
}

fn arb_heading() -> impl Strategy<Value = f64> {
    0.0..std::f64::consts::TAU
}

fn arb_pitch() -> impl Strategy<Value = f64> {
    -std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2
}

fn arb_light() -> impl Strategy<Value = LightMode> {
    prop_oneof![Just(LightMode::Flat), Just(LightMode::directional())]
}

const TOL: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Mesh construction
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    #[test]
    fn icosphere_has_four_times_four_to_the_k_triangles(levels in 0u32..6) {
        let mesh = icosphere(Rgb::WHITE, levels);
        prop_assert_eq!(mesh.len(), 4 * 4usize.pow(levels));
    }

    #[test]
    fn icosphere_vertices_sit_on_radius(levels in 0u32..6) {
        let radius = icosphere_radius();
        let mesh = icosphere(Rgb::WHITE, levels);
        for v in mesh.vertices() {
            let rel = (v.coords.norm() - radius).abs() / radius;
            prop_assert!(rel < TOL, "vertex {:?} off by {}", v, rel);
        }
    }
}

// ---------------------------------------------------------------------------
// Barycentric coordinates
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn inside_weights_sum_to_one(
        a in arb_screen_point(),
        b in arb_screen_point(),
        c in arb_screen_point(),
        x in 0u32..200,
        y in 0u32..200,
    ) {
        let v = [a, b, c];
        prop_assume!(signed_area(&v).abs() > 1.0);
        if let Some(w) = barycentric(x as f64, y as f64, &v) {
            if is_inside(&w) {
                let sum: f64 = w.iter().sum();
                prop_assert!((sum - 1.0).abs() < 1e-6, "weights {:?} sum to {}", w, sum);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Shading
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn full_intensity_is_identity(color in arb_color()) {
        let s = shade(color, 1.0);
        prop_assert!((s.r - color.r).abs() < TOL);
        prop_assert!((s.g - color.g).abs() < TOL);
        prop_assert!((s.b - color.b).abs() < TOL);
    }

    #[test]
    fn zero_intensity_is_black(color in arb_color()) {
        prop_assert_eq!(shade(color, 0.0), Rgb::BLACK);
    }

    #[test]
    fn shading_stays_in_range(color in arb_color(), s in -2.0f64..4.0) {
        let out = shade(color, s);
        for c in [out.r, out.g, out.b] {
            prop_assert!((0.0..=1.0).contains(&c));
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn rendering_is_idempotent(heading in arb_heading(), pitch in arb_pitch(), light in arb_light()) {
        let mesh = icosphere(Rgb::from_rgb8(40, 180, 90), 2);
        let params = RenderParams::new(heading, pitch, 160, 120, light);
        prop_assert_eq!(render(&mesh, &params), render(&mesh, &params));
    }

    #[test]
    fn nearest_triangle_wins(
        z_red in -100.0f64..100.0,
        z_green in -100.0f64..100.0,
        red_first in any::<bool>(),
    ) {
        prop_assume!((z_red - z_green).abs() > 1e-6);

        let mut bld = MeshBuilder::new();
        let mut push = |z: f64, color: Rgb| {
            let a = bld.push_vertex(-30.0, -30.0, z);
            let b = bld.push_vertex(30.0, -20.0, z);
            let c = bld.push_vertex(0.0, 30.0, z);
            bld.push_triangle([a, b, c], color);
        };
        let (red, green) = (Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 1.0, 0.0));
        if red_first {
            push(z_red, red);
            push(z_green, green);
        } else {
            push(z_green, green);
            push(z_red, red);
        }

        let (frame, depth) = render_with_depth(&bld.build(), &RenderParams::new(0.0, 0.0, 100, 100, LightMode::Flat));
        let expected = if z_red > z_green { [255, 0, 0] } else { [0, 255, 0] };
        prop_assert_eq!(frame.pixel(50, 50), expected);
        prop_assert!((depth.get(50, 50) - z_red.max(z_green)).abs() < 1e-9);
    }

    #[test]
    fn depth_buffer_holds_nearest_covering_surface(heading in arb_heading(), pitch in arb_pitch()) {
        let mesh = icosphere(Rgb::WHITE, 3);
        let params = RenderParams::new(heading, pitch, 400, 400, LightMode::directional());
        let (frame, depth) = render_with_depth(&mesh, &params);

        let rotation = params.orientation.matrix();
        let screen: Vec<[Point3<f64>; 3]> = mesh
            .triangles()
            .iter()
            .map(|t| project_triangle(&mesh.corners(t), &rotation, &params.viewport))
            .collect();

        // Sparse grid; the sphere's silhouette sits well inside 400x400
        for y in (0..400).step_by(5) {
            for x in (0..400).step_by(5) {
                let nearest = screen
                    .iter()
                    .filter_map(|v| {
                        let w = barycentric(x as f64, y as f64, v)?;
                        is_inside(&w).then(|| w[0] * v[0].z + w[1] * v[1].z + w[2] * v[2].z)
                    })
                    .fold(f64::NEG_INFINITY, f64::max);

                let z = depth.get(x, y);
                if nearest == f64::NEG_INFINITY {
                    prop_assert_eq!(z, f64::NEG_INFINITY, "pixel ({}, {})", x, y);
                    prop_assert_eq!(frame.pixel(x, y), [0, 0, 0]);
                } else {
                    prop_assert!((z - nearest).abs() < 1e-9, "pixel ({}, {}): {} vs {}", x, y, z, nearest);
                    prop_assert_ne!(frame.pixel(x, y), [0, 0, 0]);
                }
            }
        }
    }
}

#[cfg(feature = "parallel")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn parallel_bands_match_serial(
        heading in arb_heading(),
        pitch in arb_pitch(),
        light in arb_light(),
        band_rows in 1u32..40,
    ) {
        use tri3d_core::Rasterizer;

        let mesh = icosphere(Rgb::from_rgb8(255, 200, 10), 3);
        let params = RenderParams::new(heading, pitch, 211, 157, light);
        let serial = Rasterizer::serial().render_with_depth(&mesh, &params);
        let parallel = Rasterizer::parallel().with_band_rows(band_rows).render_with_depth(&mesh, &params);
        prop_assert_eq!(serial, parallel);
    }
}

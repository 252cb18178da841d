//! Tests for level coloring.

use renderer::gradient::{color_for, interpolate_color, Color, LinearGradient};

// ============================================================================
// interpolate_color tests
// ============================================================================

#[test]
fn test_interpolate_color_endpoints() {
    let c1 = Color::new(0, 0, 0, 255);
    let c2 = Color::new(255, 255, 255, 255);
    assert_eq!(interpolate_color(c1, c2, 0.0), c1);
    assert_eq!(interpolate_color(c1, c2, 1.0), c2);
}

#[test]
fn test_interpolate_color_truncates() {
    let mid = interpolate_color(Color::BLUE, Color::RED, 0.5);
    assert_eq!(mid, Color::rgb(127, 0, 127));
}

#[test]
fn test_interpolate_color_clamps_t() {
    assert_eq!(interpolate_color(Color::BLUE, Color::RED, -1.0), Color::BLUE);
    assert_eq!(interpolate_color(Color::BLUE, Color::RED, 2.0), Color::RED);
}

// ============================================================================
// color_for tests
// ============================================================================

#[test]
fn test_color_for_extremes() {
    assert_eq!(color_for(5.0, 5.0, 45.0), Color::BLUE);
    assert_eq!(color_for(45.0, 5.0, 45.0), Color::RED);
}

#[test]
fn test_color_for_midpoint() {
    let c = color_for(25.0, 5.0, 45.0);
    assert_eq!((c.r, c.g, c.b, c.a), (127, 0, 127, 255));
}

#[test]
fn test_color_for_is_monotonic() {
    let levels: Vec<f64> = (0..=10).map(|i| i as f64 * 10.0).collect();
    let colors: Vec<Color> = levels.iter().map(|&l| color_for(l, 0.0, 100.0)).collect();
    for pair in colors.windows(2) {
        assert!(pair[1].r >= pair[0].r);
        assert!(pair[1].b <= pair[0].b);
        assert_eq!(pair[1].g, 0);
    }
}

#[test]
fn test_color_for_single_level_is_low() {
    assert_eq!(color_for(30.0, 30.0, 30.0), Color::BLUE);
}

#[test]
fn test_custom_gradient() {
    let gradient = LinearGradient::new(Color::rgb(0, 255, 0), Color::rgb(0, 0, 0));
    assert_eq!(gradient.color_for(0.0, 0.0, 1.0), Color::rgb(0, 255, 0));
    assert_eq!(gradient.color_for(1.0, 0.0, 1.0), Color::rgb(0, 0, 0));
}

// ============================================================================
// hex formatting tests
// ============================================================================

#[test]
fn test_kml_hex_orders_alpha_blue_green_red() {
    assert_eq!(Color::new(0x11, 0x22, 0x33, 0x44).to_kml_hex(), "44332211");
    assert_eq!(color_for(25.0, 5.0, 45.0).to_kml_hex(), "ff7f007f");
}

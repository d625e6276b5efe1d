#![allow(clippy::float_cmp)]

use super::*;

fn spots() -> Vec<(Point, f64)> {
    markings()
        .into_iter()
        .filter_map(|m| match m {
            Marking::Spot { center, radius, .. } => Some((center, radius)),
            _ => None,
        })
        .collect()
}

#[test]
fn surround_is_drawn_first() {
    let first = markings()[0];
    assert_eq!(
        first,
        Marking::Fill { x: 0.0, y: 0.0, w: BOARD_WIDTH, h: BOARD_HEIGHT, color: SURROUND_COLOR, alpha: 1.0, glow: None }
    );
}

#[test]
fn twelve_stripes_inside_touchlines() {
    let stripes: Vec<Marking> = markings()
        .into_iter()
        .filter(|m| matches!(m, Marking::Fill { color, .. } if *color == STRIPE_COLOR))
        .collect();
    assert_eq!(stripes.len(), 12);
    for stripe in stripes {
        let Marking::Fill { x, w, .. } = stripe else { unreachable!() };
        assert!(x >= PITCH_MARGIN);
        assert!(x + w <= BOARD_WIDTH - PITCH_MARGIN + 1e-9);
    }
}

#[test]
fn halfway_line_splits_pitch() {
    let halfway = markings()
        .into_iter()
        .find(|m| matches!(m, Marking::Line { .. }))
        .unwrap();
    assert_eq!(
        halfway,
        Marking::Line { from: Point::new(400.0, 20.0), to: Point::new(400.0, 430.0) }
    );
}

#[test]
fn centre_and_penalty_spots() {
    let spots = spots();
    assert_eq!(spots.len(), 3);
    assert!(spots.contains(&(Point::new(400.0, 225.0), 3.0)));
    assert!(spots.contains(&(Point::new(110.0, 225.0), 2.0)));
    assert!(spots.contains(&(Point::new(690.0, 225.0), 2.0)));
}

#[test]
fn penalty_areas_are_mirrored() {
    let outlines: Vec<(f64, f64, f64, f64)> = markings()
        .into_iter()
        .filter_map(|m| match m {
            Marking::Outline { x, y, w, h } => Some((x, y, w, h)),
            _ => None,
        })
        .collect();
    // Touchline box, two penalty areas, two goal areas.
    assert_eq!(outlines.len(), 5);
    assert!(outlines.contains(&(20.0, 100.0, 120.0, 250.0)));
    assert!(outlines.contains(&(660.0, 100.0, 120.0, 250.0)));
    assert!(outlines.contains(&(20.0, 165.0, 45.0, 120.0)));
    assert!(outlines.contains(&(735.0, 165.0, 45.0, 120.0)));
}

#[test]
fn four_corner_arcs_each_a_quarter_turn() {
    let arcs: Vec<Marking> = markings()
        .into_iter()
        .filter(|m| matches!(m, Marking::Arc { .. }))
        .collect();
    assert_eq!(arcs.len(), 4);
    for arc in arcs {
        let Marking::Arc { start_deg, end_deg, radius, .. } = arc else { unreachable!() };
        assert_eq!(end_deg - start_deg, 90.0);
        assert_eq!(radius, CORNER_ARC_RADIUS);
    }
}

#[test]
fn every_marking_stays_on_the_board() {
    for m in markings() {
        let (x0, y0, x1, y1) = match m {
            Marking::Fill { x, y, w, h, .. } | Marking::Outline { x, y, w, h } => (x, y, x + w, y + h),
            Marking::Line { from, to } => (from.x.min(to.x), from.y.min(to.y), from.x.max(to.x), from.y.max(to.y)),
            Marking::Circle { center, radius }
            | Marking::Spot { center, radius, .. }
            | Marking::Arc { center, radius, .. } => {
                (center.x - radius, center.y - radius, center.x + radius, center.y + radius)
            }
        };
        // Corner arcs are centred on the corner flags and may overhang the pitch, never the board.
        assert!(x0 >= 0.0 && y0 >= 0.0, "{m:?}");
        assert!(x1 <= BOARD_WIDTH && y1 <= BOARD_HEIGHT, "{m:?}");
    }
}

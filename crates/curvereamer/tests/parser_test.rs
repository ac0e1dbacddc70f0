use approx::assert_relative_eq;
use curvereamer::*;

fn single(data: &str) -> Path {
    let mut paths = parse_path_data(data).expect("valid path data");
    assert_eq!(paths.len(), 1, "expected one subpath in {data:?}");
    paths.remove(0)
}

#[test]
fn test_square_area_is_exact() {
    let square = single("M0,0 L10,0 L10,10 L0,10 Z");
    assert!(square.is_closed());
    assert_eq!(square.area(), 100.0);
    assert_eq!(square.length(), 40.0);

    let bbox = square.bounding_box();
    assert_eq!((bbox.x0, bbox.y0, bbox.x1, bbox.y1), (0.0, 0.0, 10.0, 10.0));
}

#[test]
fn test_quadratic_midpoint() {
    let curve = single("M0,0 Q5,10 10,0");
    let segment = &curve.segments()[0];
    assert_eq!(segment.point_at(0.5), Point::new(5.0, 5.0));

    let polyline = segment.polyline();
    assert_eq!(polyline.len(), CURVE_SAMPLES + 1);
    assert_eq!(polyline[CURVE_SAMPLES / 2], Point::new(5.0, 5.0));
    assert_eq!(polyline[CURVE_SAMPLES], Point::new(10.0, 0.0));
}

#[test]
fn test_arcs_are_rejected() {
    for data in ["M0 0 A5 5 0 0 1 10 0", "M0 0 L5 5 a1 1 0 0 0 2 2"] {
        let err = parse_path_data(data).unwrap_err();
        assert!(
            matches!(err, ParseError::UnsupportedCommand { .. }),
            "{data:?} gave {err}"
        );
    }
}

#[test]
fn test_relative_and_shorthand_commands() {
    let path = single("m10 10 h10 v10 h-10 z");
    assert_eq!(path.area(), 100.0);
    assert_eq!(path.start(), Some(Point::new(10.0, 10.0)));

    let smooth = single("M0 0 C0 10 10 10 10 0 s10 -10 10 0");
    match *smooth.segments()[1].kind() {
        SegmentKind::Cubic { control1, .. } => assert_eq!(control1, Point::new(10.0, -10.0)),
        ref other => panic!("expected cubic, got {other:?}"),
    }
}

#[test]
fn test_implicit_lineto_after_moveto() {
    let path = single("M0 0 10 0 10 10");
    assert_eq!(path.segments().len(), 2);
    assert!(matches!(path.segments()[1].kind(), SegmentKind::Line { .. }));
}

#[test]
fn test_shorthand_without_matching_curve() {
    let err = parse_path_data("M0 0 L10 0 T20 0").unwrap_err();
    assert!(matches!(err, ParseError::InvalidShorthand { command: 'T', .. }));

    let err = parse_path_data("M0 0 Q5 5 10 0 S20 0 30 0").unwrap_err();
    assert!(matches!(err, ParseError::InvalidShorthand { command: 'S', .. }));
}

#[test]
fn test_malformed_number() {
    let err = parse_path_data("M0 0 L1.2.3x 4").unwrap_err();
    assert!(matches!(err, ParseError::MalformedNumber { .. }));
}

#[test]
fn test_stray_moveto_is_dropped() {
    let paths = parse_path_data("M0 0 L5 0 M20 20").expect("parse");
    assert_eq!(paths.len(), 1);
    assert!(parse_path_data("M 3 3").expect("parse").is_empty());
}

#[test]
fn test_round_trip_through_path_data() {
    let original = parse_path_data(
        "M10,10 q5,10 10,0 t10,0 c0,5 5,5 5,0 s5,-5 5,0 L0,40 Z m60,0 l3.3333,1.6667 l-1e1,2",
    )
    .expect("parse original");

    let serialized: Vec<String> = original.iter().map(Path::to_path_data).collect();
    let reparsed: Vec<Path> = serialized
        .iter()
        .flat_map(|data| parse_path_data(data).expect("parse serialized"))
        .collect();

    assert_eq!(original.len(), reparsed.len());
    for (a, b) in original.iter().zip(&reparsed) {
        assert_eq!(a.is_closed(), b.is_closed());
        assert_eq!(a.segments().len(), b.segments().len());
        for (sa, sb) in a.segments().iter().zip(b.segments()) {
            assert_relative_eq!(sa.start().x, sb.start().x, epsilon = 0.001);
            assert_relative_eq!(sa.start().y, sb.start().y, epsilon = 0.001);
            assert_relative_eq!(sa.end().x, sb.end().x, epsilon = 0.001);
            assert_relative_eq!(sa.end().y, sb.end().y, epsilon = 0.001);
        }
    }
}

#[test]
fn test_value_returning_transforms_leave_source_untouched() {
    let square = single("M0,0 L10,0 L10,10 L0,10 Z");
    let moved = square.scaled(2.0).translated(5.0, -5.0);

    assert_eq!(square.bounding_box().x1, 10.0);
    let bbox = moved.bounding_box();
    assert_eq!((bbox.x0, bbox.y0, bbox.x1, bbox.y1), (5.0, -5.0, 25.0, 15.0));
    assert_eq!(moved.area(), 400.0);
}

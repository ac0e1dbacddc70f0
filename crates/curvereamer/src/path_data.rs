//! Reader for the SVG path mini-language (`d` attribute text).
//!
//! Supported commands: `M L H V C S Q T Z` in absolute (upper case) and relative
//! (lower case) form. Elliptical arcs (`A`/`a`) are rejected.

use crate::error::ParseError;
use crate::geometry::{Path, Point, Segment, SegmentKind};
use tracing::{debug, trace};

/// Distance (per axis, in drawing units) under which a close-path snaps the last
/// segment onto the path start instead of adding a closing line.
pub const CLOSE_SNAP_TOLERANCE: f64 = 0.1;

const COMMANDS: &str = "mMzZlLhHvVcCsSqQtTaA";

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Command(char),
    Number(String),
}

/// Parse path data into its subpaths, in drawing order.
///
/// A subpath that never receives a drawing command (a bare moveto) is dropped.
pub fn parse_path_data(data: &str) -> Result<Vec<Path>, ParseError> {
    let mut parser = PathDataParser::new();
    for token in tokenize(data) {
        match token {
            Token::Command(command) => parser.begin_command(command)?,
            Token::Number(text) => {
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::MalformedNumber {
                        token: text.clone(),
                    })?;
                parser.push_operand(value, &text)?;
            }
        }
    }
    let paths = parser.finish()?;
    debug!(paths = paths.len(), "parsed path data");
    Ok(paths)
}

/// Split on command letters and separators (comma, whitespace, semicolon). A sign
/// also starts a new number unless it follows an exponent marker.
fn tokenize(data: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut buf = String::new();

    for ch in data.chars() {
        if COMMANDS.contains(ch) {
            flush(&mut buf, &mut tokens);
            tokens.push(Token::Command(ch));
        } else if ch == ',' || ch == ';' || ch.is_whitespace() {
            flush(&mut buf, &mut tokens);
        } else if (ch == '-' || ch == '+') && !buf.is_empty() && !buf.ends_with(['e', 'E']) {
            flush(&mut buf, &mut tokens);
            buf.push(ch);
        } else {
            buf.push(ch);
        }
    }
    flush(&mut buf, &mut tokens);
    tokens
}

fn flush(buf: &mut String, tokens: &mut Vec<Token>) {
    if !buf.is_empty() {
        tokens.push(Token::Number(std::mem::take(buf)));
    }
}

/// Operands consumed by one instance of `command`.
fn arity(command: char) -> usize {
    match command.to_ascii_lowercase() {
        'm' | 'l' | 't' => 2,
        'h' | 'v' => 1,
        'c' => 6,
        's' | 'q' => 4,
        'a' => 7,
        _ => 0,
    }
}

struct PathDataParser {
    paths: Vec<Path>,
    current: Option<Path>,
    point: Point,
    subpath_start: Point,
    command: char,
    operands: Vec<f64>,
}

impl PathDataParser {
    fn new() -> Self {
        Self {
            paths: Vec::new(),
            current: None,
            point: Point::ORIGIN,
            subpath_start: Point::ORIGIN,
            // Leading bare numbers act as a moveto.
            command: 'M',
            operands: Vec::new(),
        }
    }

    fn begin_command(&mut self, command: char) -> Result<(), ParseError> {
        self.ensure_no_pending()?;
        if command.eq_ignore_ascii_case(&'a') {
            return Err(ParseError::UnsupportedCommand { command });
        }
        self.command = command;

        match command.to_ascii_lowercase() {
            'm' => Ok(()),
            'z' => self.close_path(),
            _ => {
                let path = self
                    .current
                    .as_mut()
                    .ok_or(ParseError::MissingMoveTo { command })?;
                // Drawing on after a close-path reopens the subpath.
                path.set_closed(false);
                Ok(())
            }
        }
    }

    fn push_operand(&mut self, value: f64, text: &str) -> Result<(), ParseError> {
        if self.command.eq_ignore_ascii_case(&'z') {
            return Err(ParseError::UnexpectedOperand {
                token: text.to_string(),
            });
        }
        self.operands.push(value);
        if self.operands.len() == arity(self.command) {
            self.emit()?;
            self.operands.clear();
        }
        Ok(())
    }

    fn emit(&mut self) -> Result<(), ParseError> {
        let command = self.command;
        let relative = command.is_ascii_lowercase();
        let base = if relative { self.point } else { Point::ORIGIN };
        let o = &self.operands;
        let at = |i: usize| base + Point::new(o[i], o[i + 1]);

        let segment = match command.to_ascii_lowercase() {
            'm' => {
                let start = at(0);
                self.start_subpath(start);
                // Further pairs after a moveto are implicit linetos.
                self.command = if relative { 'l' } else { 'L' };
                return Ok(());
            }
            'l' => Segment::line(self.point, at(0)),
            'h' => {
                let end = if relative {
                    self.point + Point::new(o[0], 0.0)
                } else {
                    Point::new(o[0], self.point.y)
                };
                Segment::line(self.point, end)
            }
            'v' => {
                let end = if relative {
                    self.point + Point::new(0.0, o[0])
                } else {
                    Point::new(self.point.x, o[0])
                };
                Segment::line(self.point, end)
            }
            'c' => Segment::cubic(self.point, at(0), at(2), at(4)),
            's' => {
                let previous = self.previous_kind();
                let control1 = match previous {
                    Some(SegmentKind::Cubic { control2, .. }) => {
                        control2.reflect_through(self.point)
                    }
                    other => return Err(shorthand_error(command, other)),
                };
                Segment::cubic(self.point, control1, at(0), at(2))
            }
            'q' => Segment::quadratic(self.point, at(0), at(2)),
            't' => {
                let previous = self.previous_kind();
                let control = match previous {
                    Some(SegmentKind::Quadratic { control, .. }) => {
                        control.reflect_through(self.point)
                    }
                    other => return Err(shorthand_error(command, other)),
                };
                Segment::quadratic(self.point, control, at(0))
            }
            _ => return Err(ParseError::UnsupportedCommand { command }),
        };

        self.point = segment.end();
        self.current
            .as_mut()
            .ok_or(ParseError::MissingMoveTo { command })?
            .segments_mut()
            .push(segment);
        Ok(())
    }

    fn previous_kind(&self) -> Option<SegmentKind> {
        self.current
            .as_ref()
            .and_then(|path| path.segments().last())
            .map(|segment| *segment.kind())
    }

    fn start_subpath(&mut self, start: Point) {
        if let Some(path) = self.current.take() {
            self.keep(path);
        }
        self.current = Some(Path::new());
        self.point = start;
        self.subpath_start = start;
    }

    fn close_path(&mut self) -> Result<(), ParseError> {
        let point = self.point;
        let path = self
            .current
            .as_mut()
            .ok_or(ParseError::MissingMoveTo { command: self.command })?;

        if let Some(first) = path.start() {
            let near = (point.x - first.x).abs() < CLOSE_SNAP_TOLERANCE
                && (point.y - first.y).abs() < CLOSE_SNAP_TOLERANCE;
            if near {
                if let Some(last) = path.segments_mut().last_mut() {
                    last.set_end(first);
                }
            } else {
                path.segments_mut().push(Segment::line(point, first));
            }
            path.set_closed(true);
            trace!(segments = path.segments().len(), "closed subpath");
        }
        self.point = self.subpath_start;
        Ok(())
    }

    fn ensure_no_pending(&self) -> Result<(), ParseError> {
        if self.operands.is_empty() {
            Ok(())
        } else {
            Err(ParseError::IncompleteOperands {
                command: self.command,
                expected: arity(self.command),
                found: self.operands.len(),
            })
        }
    }

    fn keep(&mut self, path: Path) {
        if !path.is_empty() {
            self.paths.push(path);
        }
    }

    fn finish(mut self) -> Result<Vec<Path>, ParseError> {
        self.ensure_no_pending()?;
        if let Some(path) = self.current.take() {
            self.keep(path);
        }
        Ok(self.paths)
    }
}

fn shorthand_error(command: char, previous: Option<SegmentKind>) -> ParseError {
    let previous = match previous {
        None => "the start of a subpath",
        Some(SegmentKind::Line { .. }) => "a line segment",
        Some(SegmentKind::Quadratic { .. }) => "a quadratic curve",
        Some(SegmentKind::Cubic { .. }) => "a cubic curve",
    };
    ParseError::InvalidShorthand {
        command,
        previous: previous.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ends(path: &Path) -> Vec<(f64, f64)> {
        path.segments().iter().map(|s| (s.end().x, s.end().y)).collect()
    }

    #[test]
    fn test_tokenize_splits_commands_and_separators() {
        let tokens = tokenize("M10,20;L-5 1e-2-3");
        assert_eq!(
            tokens,
            vec![
                Token::Command('M'),
                Token::Number("10".into()),
                Token::Number("20".into()),
                Token::Command('L'),
                Token::Number("-5".into()),
                Token::Number("1e-2".into()),
                Token::Number("-3".into()),
            ]
        );
    }

    #[test]
    fn test_square_adds_closing_line() {
        let paths = parse_path_data("M0,0 L10,0 L10,10 L0,10 Z").unwrap();
        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert!(path.is_closed());
        assert_eq!(path.segments().len(), 4);
        assert_eq!(ends(path).last(), Some(&(0.0, 0.0)));
        assert_eq!(path.area(), 100.0);
    }

    #[test]
    fn test_close_snaps_near_start() {
        let paths = parse_path_data("M0 0 L10 0 L10 10 L0.05 0.05 Z").unwrap();
        let path = &paths[0];
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.segments()[2].end(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_relative_commands() {
        let paths = parse_path_data("m 1 1 l 2 0 v 3 h -2 z").unwrap();
        assert_eq!(
            ends(&paths[0]),
            vec![(3.0, 1.0), (3.0, 4.0), (1.0, 4.0), (1.0, 1.0)]
        );
    }

    #[test]
    fn test_absolute_horizontal_vertical() {
        let paths = parse_path_data("M1 2 H5 V7").unwrap();
        assert_eq!(ends(&paths[0]), vec![(5.0, 2.0), (5.0, 7.0)]);
    }

    #[test]
    fn test_implicit_lineto_after_moveto() {
        let paths = parse_path_data("M0 0 10 0 10 10").unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(ends(&paths[0]), vec![(10.0, 0.0), (10.0, 10.0)]);

        let relative = parse_path_data("m1 1 2 0 0 2").unwrap();
        assert_eq!(ends(&relative[0]), vec![(3.0, 1.0), (3.0, 3.0)]);
    }

    #[test]
    fn test_repeated_operands_repeat_command() {
        let paths = parse_path_data("M0 0 L1 0 2 0 3 0").unwrap();
        assert_eq!(paths[0].segments().len(), 3);
    }

    #[test]
    fn test_smooth_cubic_reflects_control_point() {
        let paths = parse_path_data("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap();
        match *paths[0].segments()[1].kind() {
            SegmentKind::Cubic {
                start, control1, ..
            } => {
                assert_eq!(start, Point::new(10.0, 0.0));
                assert_eq!(control1, Point::new(10.0, -10.0));
            }
            other => panic!("Expected cubic, got {:?}", other),
        }
    }

    #[test]
    fn test_relative_smooth_quadratic() {
        let paths = parse_path_data("M0 0 q5 10 10 0 t10 0").unwrap();
        match *paths[0].segments()[1].kind() {
            SegmentKind::Quadratic { control, end, .. } => {
                assert_eq!(control, Point::new(15.0, -10.0));
                assert_eq!(end, Point::new(20.0, 0.0));
            }
            other => panic!("Expected quadratic, got {:?}", other),
        }
    }

    #[test]
    fn test_smooth_after_line_is_rejected() {
        let err = parse_path_data("M0 0 L10 0 S20 10 30 0").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidShorthand { command: 'S', .. }
        ));

        let err = parse_path_data("M0 0 C0 1 1 1 1 0 T5 5").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidShorthand { command: 'T', .. }
        ));
    }

    #[test]
    fn test_arc_is_unsupported() {
        for data in ["M0 0 A5 5 0 0 1 10 0", "M0 0 a", "M0 0 L1 1 A"] {
            assert_eq!(
                parse_path_data(data).unwrap_err(),
                ParseError::UnsupportedCommand {
                    command: data.chars().rev().find(|c| c.is_alphabetic()).unwrap()
                }
            );
        }
    }

    #[test]
    fn test_malformed_number() {
        let err = parse_path_data("M0 0 L1x 2").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedNumber {
                token: "1x".to_string()
            }
        );
    }

    #[test]
    fn test_stray_moveto_is_dropped() {
        let paths = parse_path_data("M0 0 L1 1 M5 5").unwrap();
        assert_eq!(paths.len(), 1);
        assert!(parse_path_data("M5 5").unwrap().is_empty());
        assert!(parse_path_data("").unwrap().is_empty());
    }

    #[test]
    fn test_multiple_subpaths() {
        let paths = parse_path_data("M0 0 h10 v10 h-10 z m2 2 h2 v2 h-2 z").unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1].start(), Some(Point::new(2.0, 2.0)));
        assert_eq!(paths[1].area(), 4.0);
    }

    #[test]
    fn test_drawing_after_close_reopens() {
        let paths = parse_path_data("M0 0 L1 0 L1 1 Z L5 5").unwrap();
        assert_eq!(paths.len(), 1);
        assert!(!paths[0].is_closed());
        assert_eq!(paths[0].segments()[3].start(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_incomplete_operands() {
        assert_eq!(
            parse_path_data("M0 0 L1").unwrap_err(),
            ParseError::IncompleteOperands {
                command: 'L',
                expected: 2,
                found: 1
            }
        );
        assert!(matches!(
            parse_path_data("M0 0 C1 1 2 2 L3 3").unwrap_err(),
            ParseError::IncompleteOperands { command: 'C', .. }
        ));
    }

    #[test]
    fn test_missing_moveto() {
        assert_eq!(
            parse_path_data("L1 1").unwrap_err(),
            ParseError::MissingMoveTo { command: 'L' }
        );
    }

    #[test]
    fn test_operand_after_close() {
        assert!(matches!(
            parse_path_data("M0 0 L1 0 L1 1 Z 5").unwrap_err(),
            ParseError::UnexpectedOperand { .. }
        ));
    }
}

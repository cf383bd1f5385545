//! Label placement geometry: anchor, rotation, curved baselines, and
//! leader lines. All box math goes through an explicit affine
//! composition (translate → rotate → translate) so the leader anchor is
//! computed in the same frame the text is rendered in.

use glam::{DAffine2, DVec2};

use crate::geo::GeoPoint;
use crate::map::path::compound_path;
use crate::map::plane::PlanarPoint;
use crate::map::projection::Projector;

/// Curved-label baseline sampling step, degrees of longitude.
const BEND_STEP: f64 = 0.5;

/// Line height as a fraction of font size for multi-line stacking.
const LINE_HEIGHT: f64 = 1.1;

/// Estimated glyph advance as a fraction of font size, for leader-line
/// box estimation.
const CHAR_WIDTH: f64 = 0.6;

const ASCENT: f64 = 0.8;
const DESCENT: f64 = 0.25;

/// Which side of its coordinate a label sits on. Closed enumeration;
/// each direction carries fixed nudge constants and an alignment class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AnchorDir {
    #[default]
    East,
    West,
    North,
    South,
}

impl AnchorDir {
    /// Parse the authored single-letter anchor code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "e" => Some(Self::East),
            "w" => Some(Self::West),
            "n" => Some(Self::North),
            "s" => Some(Self::South),
            _ => None,
        }
    }

    /// Nudge offset in font-size units, and the text alignment class.
    fn offset_and_align(self) -> (DVec2, TextAlign) {
        match self {
            Self::East => (DVec2::new(0.5, 0.35), TextAlign::Start),
            Self::West => (DVec2::new(-0.5, 0.35), TextAlign::End),
            Self::North => (DVec2::new(0.0, -0.4), TextAlign::Middle),
            Self::South => (DVec2::new(0.0, 1.0), TextAlign::Middle),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Middle,
    End,
}

impl TextAlign {
    pub fn svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Authored label data pulled from a feature's property bag.
#[derive(Clone, Debug)]
pub struct LabelSpec {
    /// Label text; embedded `\n` splits lines.
    pub text: String,
    /// Designated label coordinate.
    pub at: GeoPoint,
    /// Authored corrective angle, degrees. Subtracted from the local
    /// east bearing.
    pub angle_deg: f64,
    /// Font size factor; zero means "no label" and must be filtered out
    /// before placement.
    pub size: f64,
    /// Half-angular extent of a curved baseline, degrees of longitude.
    pub bend_half_width: Option<f64>,
    pub anchor: AnchorDir,
    /// Remote point a leader line connects to.
    pub leader_target: Option<GeoPoint>,
    /// Authored leader anchor on the label box, percent [x, y].
    pub leader_anchor: Option<(f64, f64)>,
}

impl LabelSpec {
    pub fn plain(text: impl Into<String>, at: GeoPoint, size: f64) -> Self {
        Self {
            text: text.into(),
            at,
            angle_deg: 0.0,
            size,
            bend_half_width: None,
            anchor: AnchorDir::East,
            leader_target: None,
            leader_anchor: None,
        }
    }
}

/// Either straight stacked lines or a path-bound curved baseline.
#[derive(Clone, Debug)]
pub enum LabelBody {
    Straight {
        lines: Vec<String>,
        /// Offset of the first baseline from the anchor, plane units.
        offset: DVec2,
        /// Baseline-to-baseline distance, plane units.
        line_height: f64,
        align: TextAlign,
    },
    Curved {
        /// Unclosed baseline path the text binds to at its midpoint.
        baseline: String,
        text: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeaderLine {
    pub from: PlanarPoint,
    pub to: PlanarPoint,
}

/// A fully placed label, ready for the drawing sink.
#[derive(Clone, Debug)]
pub struct LabelPlacement {
    pub anchor: PlanarPoint,
    /// Final rotation: local east bearing minus the authored angle.
    pub rotation_deg: f64,
    /// Font size in plane units.
    pub size: f64,
    pub body: LabelBody,
    pub leader: Option<LeaderLine>,
}

/// Place one label. Callers invoke this only for features whose label
/// size is non-zero and that passed the display predicate.
///
/// # Panics
///
/// Panics on empty text or zero size: a feature that passed the display
/// filter with no usable label data violates the data contract.
pub fn place_label(proj: &Projector, spec: &LabelSpec, font_scale: f64) -> LabelPlacement {
    if spec.text.is_empty() {
        panic!("label text missing for a feature that passed the display filter");
    }
    if spec.size == 0.0 {
        panic!("label size is zero for a feature that passed the display filter");
    }

    let anchor = proj.project(spec.at);
    let bearing = proj.east_bearing(spec.at);
    let rotation_deg = bearing - spec.angle_deg;
    let size = spec.size * font_scale;

    let body = match spec.bend_half_width {
        Some(half_width) => LabelBody::Curved {
            baseline: bent_baseline(proj, spec.at, half_width),
            text: spec.text.clone(),
        },
        None => {
            let (nudge, align) = spec.anchor.offset_and_align();
            LabelBody::Straight {
                lines: spec.text.split('\n').map(str::to_owned).collect(),
                offset: nudge * size,
                line_height: LINE_HEIGHT * size,
                align,
            }
        }
    };

    let leader = spec.leader_target.map(|target| {
        leader_line(proj, spec, &body, anchor, rotation_deg, size, target)
    });

    LabelPlacement { anchor, rotation_deg, size, body, leader }
}

/// Sample the curved-label baseline: 0.5° longitude steps across
/// [lon - half_width, lon + half_width] at the label's latitude.
fn bent_baseline(proj: &Projector, at: GeoPoint, half_width: f64) -> String {
    let mut points = Vec::new();
    let mut lon = at.lon - half_width;
    while lon <= at.lon + half_width + 1e-9 {
        points.push(proj.project(GeoPoint::new(at.lat, lon)));
        lon += BEND_STEP;
    }
    compound_path(&[points], false)
}

/// Estimated label box in the label's nudge-local frame (origin at the
/// first baseline's alignment point).
fn label_box(body: &LabelBody, size: f64) -> (DVec2, DVec2) {
    let (lines, align) = match body {
        LabelBody::Straight { lines, align, .. } => (lines.clone(), *align),
        LabelBody::Curved { text, .. } => (vec![text.clone()], TextAlign::Middle),
    };
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = longest as f64 * CHAR_WIDTH * size;
    let height = ASCENT * size + (lines.len() as f64 - 1.0) * LINE_HEIGHT * size + DESCENT * size;
    let x_min = match align {
        TextAlign::Start => 0.0,
        TextAlign::Middle => -width / 2.0,
        TextAlign::End => -width,
    };
    let min = DVec2::new(x_min, -ASCENT * size);
    (min, min + DVec2::new(width, height))
}

/// Compute the leader line: anchor a point on the label's box (authored
/// percentage, or the sector default) and run it through the same
/// translate → rotate → translate composition that places the text.
fn leader_line(
    proj: &Projector,
    spec: &LabelSpec,
    body: &LabelBody,
    anchor: PlanarPoint,
    rotation_deg: f64,
    size: f64,
    target: GeoPoint,
) -> LeaderLine {
    let offset = match body {
        LabelBody::Straight { offset, .. } => *offset,
        LabelBody::Curved { .. } => DVec2::ZERO,
    };
    let to_world = DAffine2::from_translation(anchor.0)
        * DAffine2::from_angle(rotation_deg.to_radians())
        * DAffine2::from_translation(offset);

    let (min, max) = label_box(body, size);
    let extent = max - min;
    let to = proj.project(target);

    let anchor_pct = spec.leader_anchor.unwrap_or_else(|| {
        let center = to_world.transform_point2((min + max) / 2.0);
        default_anchor_pct(PlanarPoint(center).bearing_to(to))
    });

    let local = min + DVec2::new(anchor_pct.0 / 100.0 * extent.x, anchor_pct.1 / 100.0 * extent.y);
    LeaderLine { from: PlanarPoint(to_world.transform_point2(local)), to }
}

/// Default leader anchor for a target at the given bearing from the
/// rotated label center. Ordered rule list; the precedence at the exact
/// 45° diagonals is part of the contract, so the order must not change.
fn default_anchor_pct(bearing_deg: f64) -> (f64, f64) {
    if (-45.0..45.0).contains(&bearing_deg) {
        (100.0, 50.0) // right-center
    } else if (45.0..135.0).contains(&bearing_deg) {
        (50.0, 100.0) // bottom-center (screen y grows downward)
    } else if (-135.0..-45.0).contains(&bearing_deg) {
        (50.0, 0.0) // top-center
    } else {
        (0.0, 50.0) // left-center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_at(lat: f64, lon: f64) -> LabelSpec {
        LabelSpec::plain("Andes", GeoPoint::new(lat, lon), 1.0)
    }

    #[test]
    fn test_zero_authored_angle_uses_east_bearing() {
        let proj = Projector::standard();
        for p in [GeoPoint::new(40.0, -120.0), GeoPoint::new(-45.0, -150.0)] {
            let placed = place_label(&proj, &spec_at(p.lat, p.lon), 1.0);
            assert!((placed.rotation_deg - proj.east_bearing(p)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_authored_angle_subtracts_from_bearing() {
        let proj = Projector::standard();
        let mut spec = spec_at(40.0, -120.0);
        spec.angle_deg = 30.0;
        let placed = place_label(&proj, &spec, 1.0);
        assert!((placed.rotation_deg - (proj.east_bearing(spec.at) - 30.0)).abs() < 1e-12);
    }

    #[test]
    fn test_curved_baseline_sample_count() {
        let proj = Projector::standard();
        let mut spec = spec_at(-30.0, -60.0);
        spec.bend_half_width = Some(4.0);
        let placed = place_label(&proj, &spec, 1.0);
        match placed.body {
            LabelBody::Curved { ref baseline, .. } => {
                // 0.5° steps across ±4°: 17 samples, one M plus 16 L.
                assert_eq!(baseline.matches('M').count(), 1);
                assert_eq!(baseline.matches('L').count(), 16);
                assert!(!baseline.contains('z'));
            }
            _ => panic!("expected a curved body"),
        }
    }

    #[test]
    fn test_multi_line_stacking() {
        let proj = Projector::standard();
        let mut spec = spec_at(40.0, -120.0);
        spec.text = "United\nStates".into();
        spec.size = 2.0;
        let placed = place_label(&proj, &spec, 1.5);
        match placed.body {
            LabelBody::Straight { ref lines, line_height, .. } => {
                assert_eq!(lines.len(), 2);
                assert!((line_height - 1.1 * 3.0).abs() < 1e-12);
            }
            _ => panic!("expected a straight body"),
        }
    }

    #[test]
    fn test_leader_default_anchor_due_east_is_right_center() {
        assert_eq!(default_anchor_pct(0.0), (100.0, 50.0));
    }

    #[test]
    fn test_leader_sector_precedence_at_diagonals() {
        // Exactly 45° falls through to the second rule.
        assert_eq!(default_anchor_pct(45.0), (50.0, 100.0));
        assert_eq!(default_anchor_pct(-45.0), (100.0, 50.0));
        assert_eq!(default_anchor_pct(135.0), (0.0, 50.0));
        assert_eq!(default_anchor_pct(-135.0), (50.0, 0.0));
    }

    #[test]
    fn test_leader_line_reaches_projected_target() {
        let proj = Projector::standard();
        let mut spec = spec_at(40.0, -120.0);
        spec.leader_target = Some(GeoPoint::new(35.0, -115.0));
        let placed = place_label(&proj, &spec, 1.0);
        let leader = placed.leader.expect("leader expected");
        assert_eq!(leader.to, proj.project(GeoPoint::new(35.0, -115.0)));
    }

    #[test]
    fn test_leader_authored_anchor_overrides_sector() {
        let proj = Projector::standard();
        let mut spec = spec_at(40.0, -120.0);
        spec.leader_target = Some(GeoPoint::new(40.0, -110.0));
        spec.leader_anchor = Some((0.0, 0.0));
        let with_authored = place_label(&proj, &spec, 1.0).leader.unwrap();
        spec.leader_anchor = None;
        let with_default = place_label(&proj, &spec, 1.0).leader.unwrap();
        assert_ne!(with_authored.from, with_default.from);
    }

    #[test]
    fn test_leader_anchor_right_center_geometry() {
        // Flat strip, no authored angle: rotation is 0, so the world
        // box is axis-aligned and the right-center point is directly
        // east of the box center.
        let proj = Projector::standard();
        let mut spec = spec_at(40.0, -120.0);
        spec.leader_target = Some(GeoPoint::new(40.0, -100.0));
        let placed = place_label(&proj, &spec, 1.0);
        let leader = placed.leader.unwrap();
        let center_y = {
            let (min, max) = label_box(&placed.body, placed.size);
            (min.y + max.y) / 2.0 + placed.anchor.y() + match placed.body {
                LabelBody::Straight { offset, .. } => offset.y,
                _ => 0.0,
            }
        };
        assert!((leader.from.y() - center_y).abs() < 1e-9);
        assert!(leader.from.x() > placed.anchor.x());
    }

    #[test]
    #[should_panic(expected = "label text missing")]
    fn test_empty_text_is_fatal() {
        let proj = Projector::standard();
        let mut spec = spec_at(40.0, -120.0);
        spec.text = String::new();
        place_label(&proj, &spec, 1.0);
    }
}

use std::sync::OnceLock;

use crate::error::{GeometryError, Result};
use crate::math::{BoundingBox2, Point2, Vector2};

use super::{Curve, CurveDomain};

/// A child curve and the global sub-interval it owns.
#[derive(Debug)]
struct Segment {
    curve: Box<dyn Curve>,
    t_min: f64,
    t_max: f64,
}

/// Per-segment arc lengths and their running sums.
#[derive(Debug)]
struct LengthTable {
    lengths: Vec<f64>,
    /// `cumulative[i]` is the length of segments `0..=i`.
    cumulative: Vec<f64>,
}

/// Several curves concatenated into one curve with a single parameter.
///
/// Each segment is re-parameterized directly into global coordinates: segment
/// `i` owns `[t_i, t_i + span_i]` where `span_i` is the width of its own domain
/// before composition, and `t_{i+1} = t_i + span_i`. Lookups therefore hand
/// the global `t` straight to the owning segment.
///
/// Segment lengths are computed once, on the first length query, and cached.
/// The composed curve is immutable apart from re-parameterization, which
/// leaves lengths unchanged.
#[derive(Debug)]
pub struct MultiCurve {
    segments: Vec<Segment>,
    domain: CurveDomain,
    lengths: OnceLock<LengthTable>,
}

impl MultiCurve {
    /// Composes `curves` in order. The composed domain is `[0, Σ spans]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `curves` is empty or a segment rejects its new interval.
    pub fn new(curves: Vec<Box<dyn Curve>>) -> Result<Self> {
        if curves.is_empty() {
            return Err(GeometryError::Degenerate("multi-curve needs at least one segment".into()).into());
        }
        let mut segments = Vec::with_capacity(curves.len());
        let mut offset = 0.0;
        for mut curve in curves {
            let span = curve.domain().width();
            let t_max = offset + span;
            curve.set_domain(offset, t_max)?;
            segments.push(Segment {
                curve,
                t_min: offset,
                t_max,
            });
            offset = t_max;
        }
        Ok(Self {
            segments,
            domain: CurveDomain::new(0.0, offset),
            lengths: OnceLock::new(),
        })
    }

    /// Number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The curve of segment `index`, in global coordinates.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&dyn Curve> {
        self.segments.get(index).map(|s| s.curve.as_ref())
    }

    /// Iterates over the segment curves in order.
    pub fn segments(&self) -> impl Iterator<Item = &dyn Curve> + '_ {
        self.segments.iter().map(|s| s.curve.as_ref())
    }

    /// Global interval owned by segment `index`.
    #[must_use]
    pub fn segment_domain(&self, index: usize) -> Option<CurveDomain> {
        self.segments
            .get(index)
            .map(|s| CurveDomain::new(s.t_min, s.t_max))
    }

    /// Cached arc length of segment `index`.
    ///
    /// # Errors
    ///
    /// Propagates length computation errors on first use.
    pub fn segment_length(&self, index: usize) -> Result<Option<f64>> {
        Ok(self.length_table()?.lengths.get(index).copied())
    }

    /// Finds the segment owning the global parameter `t`.
    ///
    /// Returns the greatest index whose start is `<= t`, clamped into the
    /// valid range, together with the parameter to pass to that segment.
    #[must_use]
    pub fn find_index(&self, t: f64) -> (usize, f64) {
        let index = self
            .segments
            .partition_point(|s| s.t_min <= t)
            .saturating_sub(1)
            .min(self.segments.len() - 1);
        (index, t)
    }

    fn length_table(&self) -> Result<&LengthTable> {
        if let Some(table) = self.lengths.get() {
            return Ok(table);
        }
        let mut lengths = Vec::with_capacity(self.segments.len());
        let mut cumulative = Vec::with_capacity(self.segments.len());
        let mut total = 0.0;
        for segment in &self.segments {
            let length = segment.curve.total_length()?;
            total += length;
            lengths.push(length);
            cumulative.push(total);
        }
        tracing::debug!(segments = lengths.len(), total, "multi-curve lengths cached");
        Ok(self.lengths.get_or_init(|| LengthTable { lengths, cumulative }))
    }

    fn curve_at(&self, t: f64) -> (&dyn Curve, f64) {
        let (index, t) = self.find_index(t);
        (self.segments[index].curve.as_ref(), t)
    }
}

impl Curve for MultiCurve {
    fn domain(&self) -> CurveDomain {
        self.domain
    }

    /// Rescales every segment interval proportionally onto `[t_min, t_max]`.
    fn set_domain(&mut self, t_min: f64, t_max: f64) -> Result<()> {
        if !t_min.is_finite() || !t_max.is_finite() || t_min > t_max {
            return Err(GeometryError::InvalidInterval { t_min, t_max }.into());
        }
        let old = self.domain;
        let ratio = if old.width() > 0.0 {
            (t_max - t_min) / old.width()
        } else {
            0.0
        };
        // Clamped so rounding never pushes a boundary past the new ends.
        let remap = |t: f64| (t_min + (t - old.t_min) * ratio).clamp(t_min, t_max);
        let last = self.segments.len() - 1;
        let intervals: Vec<(f64, f64)> = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let start = remap(s.t_min);
                let end = if i == last { t_max } else { remap(s.t_max) };
                (start, end)
            })
            .collect();

        for (i, &(start, end)) in intervals.iter().enumerate() {
            if let Err(err) = self.segments[i].curve.set_domain(start, end) {
                // Restore the intervals these segments accepted before.
                for segment in &mut self.segments[..i] {
                    let _ = segment.curve.set_domain(segment.t_min, segment.t_max);
                }
                return Err(err);
            }
        }
        for (segment, (start, end)) in self.segments.iter_mut().zip(intervals) {
            segment.t_min = start;
            segment.t_max = end;
        }
        self.domain = CurveDomain::new(t_min, t_max);
        Ok(())
    }

    fn position(&self, t: f64) -> Result<Point2> {
        let (curve, t) = self.curve_at(t);
        curve.position(t)
    }

    fn first_derivative(&self, t: f64) -> Result<Vector2> {
        let (curve, t) = self.curve_at(t);
        curve.first_derivative(t)
    }

    fn second_derivative(&self, t: f64) -> Result<Vector2> {
        let (curve, t) = self.curve_at(t);
        curve.second_derivative(t)
    }

    fn third_derivative(&self, t: f64) -> Result<Vector2> {
        let (curve, t) = self.curve_at(t);
        curve.third_derivative(t)
    }

    fn speed(&self, t: f64) -> Result<f64> {
        let (curve, t) = self.curve_at(t);
        curve.speed(t)
    }

    fn curvature(&self, t: f64) -> Result<f64> {
        let (curve, t) = self.curve_at(t);
        curve.curvature(t)
    }

    fn tangent(&self, t: f64) -> Result<Vector2> {
        let (curve, t) = self.curve_at(t);
        curve.tangent(t)
    }

    fn left_normal(&self, t: f64) -> Result<Vector2> {
        let (curve, t) = self.curve_at(t);
        curve.left_normal(t)
    }

    fn length(&self, t0: f64, t1: f64) -> Result<f64> {
        let (a, b) = self.domain.clamp_span(t0, t1);
        let (i0, _) = self.find_index(a);
        let (i1, _) = self.find_index(b);
        if i0 == i1 {
            return self.segments[i0].curve.length(a, b);
        }
        let table = self.length_table()?;
        let first = &self.segments[i0];
        let last = &self.segments[i1];
        let head = first.curve.length(a, first.t_max)?;
        let middle = table.cumulative[i1 - 1] - table.cumulative[i0];
        let tail = last.curve.length(last.t_min, b)?;
        Ok(head + middle + tail)
    }

    fn total_length(&self) -> Result<f64> {
        Ok(self
            .length_table()?
            .cumulative
            .last()
            .copied()
            .unwrap_or(0.0))
    }

    fn bounding_box(&self) -> Result<BoundingBox2> {
        let mut boxes = self.segments.iter().map(|s| s.curve.bounding_box());
        let mut bbox = match boxes.next() {
            Some(first) => first?,
            None => return Err(GeometryError::Degenerate("empty multi-curve".into()).into()),
        };
        for b in boxes {
            bbox = bbox.union(&b?);
        }
        Ok(bbox)
    }
}

//! Reporting problems in the input data.
//!
//! Bad map data is expected, so none of the problems found while building a
//! segment list are errors. Instead, they are counted and (optionally) handed
//! to a [`ProblemReporter`].

use std::io;

use crate::{
    geom::Location,
    osm::{ItemType, NodeRef},
};

/// A problem found in the input data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Problem {
    /// Two consecutive nodes of a way have the same location.
    DuplicateNode {
        /// The first node's id.
        node_id1: i64,
        /// The second node's id.
        node_id2: i64,
        /// Where both nodes are.
        location: Location,
    },
    /// A way contains the same segment twice.
    DuplicateSegment {
        /// The segment's first endpoint.
        node1: NodeRef,
        /// The segment's second endpoint.
        node2: NodeRef,
    },
    /// Two segments cross.
    Intersection {
        /// The id of the way containing the first segment.
        way1_id: i64,
        /// The start of the first segment.
        way1_seg_start: Location,
        /// The end of the first segment.
        way1_seg_end: Location,
        /// The id of the way containing the second segment.
        way2_id: i64,
        /// The start of the second segment.
        way2_seg_start: Location,
        /// The end of the second segment.
        way2_seg_end: Location,
        /// Where they cross.
        intersection: Location,
    },
}

impl Problem {
    /// A short human-readable name for this kind of problem.
    pub fn kind(&self) -> &'static str {
        match self {
            Problem::DuplicateNode { .. } => "duplicate node",
            Problem::DuplicateSegment { .. } => "duplicate segment",
            Problem::Intersection { .. } => "intersection",
        }
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Problem::DuplicateNode {
                node_id1,
                node_id2,
                location,
            } => write!(
                f,
                "node_id1={node_id1} node_id2={node_id2} location={location}"
            ),
            Problem::DuplicateSegment { node1, node2 } => write!(
                f,
                "node_id1={} location1={} node_id2={} location2={}",
                node1.id, node1.location, node2.id, node2.location
            ),
            Problem::Intersection {
                way1_id,
                way1_seg_start,
                way1_seg_end,
                way2_id,
                way2_seg_start,
                way2_seg_end,
                intersection,
            } => write!(
                f,
                "way1_id={way1_id} way1_seg_start={way1_seg_start} way1_seg_end={way1_seg_end} \
                 way2_id={way2_id} way2_seg_start={way2_seg_start} way2_seg_end={way2_seg_end} \
                 intersection={intersection}"
            ),
        }
    }
}

/// Which object a reporter is currently hearing about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjectContext {
    /// The type and id of the object being assembled, if known.
    pub object: Option<(ItemType, i64)>,
    /// How many segments (roughly, nodes) the object has.
    pub nodes: usize,
}

impl std::fmt::Display for ObjectContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.object {
            Some((item_type, id)) => write!(f, "{}{id}", item_type.to_char())?,
            None => write!(f, "unknown object")?,
        }
        write!(f, " (with {} nodes)", self.nodes)
    }
}

struct ProblemLine<'a> {
    context: &'a ObjectContext,
    problem: &'a Problem,
}

impl std::fmt::Display for ProblemLine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DATA PROBLEM: {} on {}: {}",
            self.problem.kind(),
            self.context,
            self.problem
        )
    }
}

/// A sink for problems in the input data.
///
/// Only [`report`](ProblemReporter::report) is required; the more specific
/// methods build a [`Problem`] and pass it on.
pub trait ProblemReporter {
    /// Tells the reporter which object the following problems belong to.
    fn set_object(&mut self, item_type: ItemType, id: i64) {
        let _ = (item_type, id);
    }

    /// Tells the reporter how many segments the current object has.
    ///
    /// This is a hint for sizing and for diagnostics, not a problem.
    fn set_nodes(&mut self, nodes: usize) {
        let _ = nodes;
    }

    /// Receives a problem.
    fn report(&mut self, problem: Problem);

    /// Two consecutive nodes of a way have the same location.
    fn report_duplicate_node(&mut self, node_id1: i64, node_id2: i64, location: Location) {
        self.report(Problem::DuplicateNode {
            node_id1,
            node_id2,
            location,
        });
    }

    /// A way contains the same segment twice.
    fn report_duplicate_segment(&mut self, nr1: &NodeRef, nr2: &NodeRef) {
        self.report(Problem::DuplicateSegment {
            node1: *nr1,
            node2: *nr2,
        });
    }

    /// Two segments cross.
    #[allow(clippy::too_many_arguments)]
    fn report_intersection(
        &mut self,
        way1_id: i64,
        way1_seg_start: Location,
        way1_seg_end: Location,
        way2_id: i64,
        way2_seg_start: Location,
        way2_seg_end: Location,
        intersection: Location,
    ) {
        self.report(Problem::Intersection {
            way1_id,
            way1_seg_start,
            way1_seg_end,
            way2_id,
            way2_seg_start,
            way2_seg_end,
            intersection,
        });
    }
}

/// A reporter that remembers every problem.
#[derive(Clone, Debug, Default)]
pub struct ProblemCollector {
    context: ObjectContext,
    problems: Vec<Problem>,
}

impl ProblemCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// All the problems reported so far, in order.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// The current object and node count.
    pub fn context(&self) -> ObjectContext {
        self.context
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.context = ObjectContext::default();
        self.problems.clear();
    }

    /// Consumes the collector, returning the problems.
    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}

impl ProblemReporter for ProblemCollector {
    fn set_object(&mut self, item_type: ItemType, id: i64) {
        self.context.object = Some((item_type, id));
    }

    fn set_nodes(&mut self, nodes: usize) {
        self.context.nodes = nodes;
    }

    fn report(&mut self, problem: Problem) {
        self.problems.push(problem);
    }
}

/// A reporter that writes one line per problem to a stream.
///
/// Lines look like
///
/// ```text
/// DATA PROBLEM: duplicate node on w17 (with 4 nodes): node_id1=1 node_id2=2 location=(1,2)
/// ```
///
/// The first write error stops all further output; it is returned by
/// [`finish`](ProblemReporterStream::finish).
#[derive(Debug)]
pub struct ProblemReporterStream<W> {
    out: W,
    context: ObjectContext,
    error: Option<io::Error>,
}

impl<W: io::Write> ProblemReporterStream<W> {
    /// Creates a reporter writing to `out`.
    pub fn new(out: W) -> Self {
        ProblemReporterStream {
            out,
            context: ObjectContext::default(),
            error: None,
        }
    }

    /// Flushes the stream and returns it, or the first error encountered.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: io::Write> ProblemReporter for ProblemReporterStream<W> {
    fn set_object(&mut self, item_type: ItemType, id: i64) {
        self.context.object = Some((item_type, id));
    }

    fn set_nodes(&mut self, nodes: usize) {
        self.context.nodes = nodes;
    }

    fn report(&mut self, problem: Problem) {
        if self.error.is_some() {
            return;
        }
        let line = ProblemLine {
            context: &self.context,
            problem: &problem,
        };
        if let Err(e) = writeln!(self.out, "{line}") {
            self.error = Some(e);
        }
    }
}

/// A reporter that logs each problem as a warning, with target `waysegments::problem`.
#[derive(Clone, Debug, Default)]
pub struct ProblemReporterLog {
    context: ObjectContext,
}

impl ProblemReporterLog {
    /// Creates a new logging reporter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProblemReporter for ProblemReporterLog {
    fn set_object(&mut self, item_type: ItemType, id: i64) {
        self.context.object = Some((item_type, id));
    }

    fn set_nodes(&mut self, nodes: usize) {
        self.context.nodes = nodes;
    }

    fn report(&mut self, problem: Problem) {
        log::warn!(
            target: "waysegments::problem",
            "{}",
            ProblemLine {
                context: &self.context,
                problem: &problem,
            }
        );
    }
}

#![no_main]

use arbitrary::Unstructured;

use libfuzzer_sys::fuzz_target;
use waysegments::{ProblemCollector, SegmentList, Way};

fn run(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let (relation, ways) = waysegments::arbitrary::multipolygon(&mut u)?;
    let ways: Vec<&Way> = ways.iter().collect();

    let mut problems = ProblemCollector::new();
    let mut list = SegmentList::new(false);
    let dup_nodes = list.extract_segments_from_ways(Some(&mut problems), &relation, &ways);
    let extracted = list.len();
    list.sort();
    let dup_segments = list.erase_duplicate_segments(Some(&mut problems));
    assert_eq!((extracted - list.len()) % 2, 0);
    // With slow-asserts, this also checks that the list is sorted and distinct.
    let intersections = list.find_intersections(Some(&mut problems));

    assert_eq!(
        problems.problems().len(),
        (dup_nodes + dup_segments + intersections) as usize
    );
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = run(Unstructured::new(data));
});

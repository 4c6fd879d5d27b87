use crate::forest::{Forest, HeaderId, NodeId};

use super::ListDefect;

/// Collects the members of an intrusive list, validating it on the way.
///
/// `links` returns the `(left, right)` links of a live element and `None`
/// for a dead slot. The walk gives up with [`ListDefect::Cycle`] after
/// `limit` elements.
pub(super) fn collect_list<I>(
    first: Option<I>,
    last: Option<I>,
    limit: usize,
    links: impl Fn(I) -> Option<(Option<I>, Option<I>)>,
) -> Result<Vec<I>, ListDefect<I>>
where
    I: Copy + Eq,
{
    if first.is_some() != last.is_some() {
        return Err(ListDefect::OneSidedEnds);
    }
    let mut members = Vec::new();
    let mut prev = None;
    let mut cursor = first;
    while let Some(element) = cursor {
        if members.len() >= limit {
            return Err(ListDefect::Cycle);
        }
        let (left, right) = links(element).ok_or(ListDefect::Dangling { element })?;
        if left != prev {
            return Err(ListDefect::BackLink { element });
        }
        members.push(element);
        prev = Some(element);
        cursor = right;
    }
    if prev != last {
        return Err(ListDefect::TailMismatch {
            recorded: last,
            walked: prev,
        });
    }
    Ok(members)
}

/// Direct node list of `header`, or the defect that stops it being read.
pub(super) fn node_list<V>(
    forest: &Forest<V>,
    header: HeaderId,
) -> Result<Vec<NodeId>, ListDefect<NodeId>> {
    let Some(entry) = forest.header(header) else {
        return Ok(Vec::new());
    };
    collect_list(
        entry.first_node(),
        entry.last_node(),
        forest.node_slots(),
        |id| forest.node(id).map(|node| (node.left(), node.right())),
    )
}

/// Child header list of `header`, or the defect that stops it being read.
pub(super) fn header_list<V>(
    forest: &Forest<V>,
    header: HeaderId,
) -> Result<Vec<HeaderId>, ListDefect<HeaderId>> {
    let Some(entry) = forest.header(header) else {
        return Ok(Vec::new());
    };
    collect_list(
        entry.first_child(),
        entry.last_child(),
        forest.header_slots(),
        |id| forest.header(id).map(|child| (child.left(), child.right())),
    )
}

/// Where the parent chain above a header ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Ancestry {
    Root(HeaderId),
    Dead(HeaderId),
    Cycle,
}

/// Follows parent links upwards from `start` for at most as many hops as
/// there are header slots.
pub(super) fn ancestry<V>(forest: &Forest<V>, start: HeaderId) -> Ancestry {
    let mut cursor = start;
    for _ in 0..=forest.header_slots() {
        let Some(entry) = forest.header(cursor) else {
            return Ancestry::Dead(cursor);
        };
        match entry.parent() {
            Some(parent) => cursor = parent,
            None => return Ancestry::Root(cursor),
        }
    }
    Ancestry::Cycle
}

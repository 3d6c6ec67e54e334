use crate::aggregate::EvaluatedNode;
use crate::severity::Severity;

/// Final probe outcome: one severity and one human-readable message line.
#[derive(Debug, Clone)]
pub struct Report {
    pub severity: Severity,
    pub message: String,
}

/// Render an evaluated tree into the final report.
///
/// The severity is the root's. The message enumerates every non-OK terminal
/// node with its full path and detail; when everything is healthy it says so
/// with the resource count, and an empty tree is reported as such rather than
/// hidden behind a generic OK line.
pub fn render(root: &EvaluatedNode) -> Report {
    let mut leaves = 0usize;
    let mut problems: Vec<&EvaluatedNode> = Vec::new();
    collect(root, &mut leaves, &mut problems);

    let message = if problems.is_empty() {
        if leaves == 0 {
            "no resources discovered".to_string()
        } else if leaves == 1 {
            "1 resource healthy".to_string()
        } else {
            format!("all {leaves} resources healthy")
        }
    } else {
        let listed: Vec<String> = problems
            .iter()
            .map(|n| format!("{} {} ({})", n.name(), n.severity, n.detail))
            .collect();
        format!(
            "{} of {} resources not OK: {}",
            problems.len(),
            leaves.max(problems.len()),
            listed.join("; ")
        )
    };

    Report {
        severity: root.severity,
        message,
    }
}

// Terminal nodes are the measured resources: true leaves, plus nodes whose
// own discovery failed (they have no children to speak for them). Internal
// nodes are not listed; their severity is already explained by what is below.
fn collect<'a>(
    node: &'a EvaluatedNode,
    leaves: &mut usize,
    problems: &mut Vec<&'a EvaluatedNode>,
) {
    if node.children.is_empty() {
        if !node.path.is_empty() {
            *leaves += 1;
        }
        if node.severity != Severity::Ok {
            problems.push(node);
        }
        return;
    }
    for child in &node.children {
        collect(child, leaves, problems);
    }
}

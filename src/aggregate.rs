use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CheckError;
use crate::policy::Policy;
use crate::severity::Severity;

/// What a source found at one path: either the names of child resources or
/// the raw value of a leaf.
#[derive(Debug, Clone)]
pub enum Discovery {
    Branch(Vec<String>),
    Leaf(Value),
}

/// A remote resource hierarchy, one `discover` call per node.
///
/// The path is the ordered sequence of identifying segments from the root
/// (empty for the root itself). Implementations decide, per depth, whether a
/// node has children or carries a leaf value.
pub trait Source {
    fn discover(
        &self,
        path: &[String],
    ) -> impl Future<Output = Result<Discovery, CheckError>> + Send;
}

/// One node of the evaluated tree. Leaves carry the severity the policy
/// assigned to their raw value; internal nodes carry the worst-wins fold of
/// their children, computed children-first.
#[derive(Debug, Clone)]
pub struct EvaluatedNode {
    pub path: Vec<String>,
    pub severity: Severity,
    pub detail: String,
    pub children: Vec<EvaluatedNode>,
}

impl EvaluatedNode {
    // A fetch or mapping failure below the root: localized UNKNOWN carrying
    // the failure reason, siblings unaffected.
    fn failed(path: Vec<String>, err: &CheckError) -> Self {
        warn!(node = %path.join("/"), error = %err, "subtree evaluation failed");
        EvaluatedNode {
            path,
            severity: Severity::Unknown,
            detail: err.to_string(),
            children: Vec::new(),
        }
    }

    /// Full `/`-joined path, or "root" for the root node.
    pub fn name(&self) -> String {
        if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path.join("/")
        }
    }
}

/// Evaluate the whole hierarchy exposed by `source` under `policy`.
///
/// A failure to discover the root resource set is a total-evaluation failure
/// and comes back as `Err`; callers report it as UNKNOWN (loss of visibility
/// is distinct from confirmed badness). Failures anywhere below the root are
/// localized to that subtree and evaluation of siblings continues.
pub async fn evaluate<S>(source: &S, policy: &Policy) -> Result<EvaluatedNode, CheckError>
where
    S: Source + Sync,
{
    let root = source.discover(&[]).await?;
    Ok(eval_node(source, policy, Vec::new(), root).await)
}

// Recursive walk; boxed because async recursion has no static future size.
fn eval_node<'a, S>(
    source: &'a S,
    policy: &'a Policy,
    path: Vec<String>,
    found: Discovery,
) -> Pin<Box<dyn Future<Output = EvaluatedNode> + Send + 'a>>
where
    S: Source + Sync,
{
    Box::pin(async move {
        match found {
            Discovery::Leaf(raw) => match policy.apply(&raw) {
                Ok((severity, detail)) => EvaluatedNode {
                    path,
                    severity,
                    detail,
                    children: Vec::new(),
                },
                Err(err) => EvaluatedNode::failed(path, &err),
            },
            Discovery::Branch(names) => {
                debug!(node = %path.join("/"), children = names.len(), "descending");
                let mut children = Vec::with_capacity(names.len());
                for name in names {
                    let mut child_path = path.clone();
                    child_path.push(name);
                    let child = match source.discover(&child_path).await {
                        Ok(found) => eval_node(source, policy, child_path, found).await,
                        Err(err) => EvaluatedNode::failed(child_path, &err),
                    };
                    children.push(child);
                }
                // Children first, then the fold; an empty branch folds to OK
                let severity = Severity::fold(children.iter().map(|c| c.severity));
                let detail = branch_detail(&children);
                EvaluatedNode {
                    path,
                    severity,
                    detail,
                    children,
                }
            }
        }
    })
}

fn branch_detail(children: &[EvaluatedNode]) -> String {
    if children.is_empty() {
        return "no resources discovered".to_string();
    }
    let bad = children
        .iter()
        .filter(|c| c.severity != Severity::Ok)
        .count();
    if bad == 0 {
        format!("{} healthy", children.len())
    } else {
        format!("{bad} of {} not OK", children.len())
    }
}

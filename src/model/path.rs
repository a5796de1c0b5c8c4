use serde::Serialize;
use std::fmt;

/// One descent from a step into one of its branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BranchHop {
    /// Which branch of the parent step.
    pub branch: usize,
    /// Position of the step inside that branch.
    pub step: usize,
}

/// Address of a step from the integration root: a top-level index followed by
/// zero or more branch hops.
///
/// Displays as `steps.0.branches.1.steps.2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StepPath {
    index: usize,
    hops: Vec<BranchHop>,
}

impl StepPath {
    pub fn top_level(index: usize) -> Self {
        Self {
            index,
            hops: Vec::new(),
        }
    }

    pub fn new(index: usize, hops: Vec<BranchHop>) -> Self {
        Self { index, hops }
    }

    /// Path of the `step`-th step of the `branch`-th branch of the step at `self`.
    pub fn child(&self, branch: usize, step: usize) -> Self {
        let mut hops = self.hops.clone();
        hops.push(BranchHop { branch, step });
        Self {
            index: self.index,
            hops,
        }
    }

    /// Path of the step owning the branch this step lives in.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.hops.split_last()?;
        Some(Self {
            index: self.index,
            hops: rest.to_vec(),
        })
    }

    /// Top-level index of the outermost ancestor.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn hops(&self) -> &[BranchHop] {
        &self.hops
    }

    pub fn last_hop(&self) -> Option<BranchHop> {
        self.hops.last().copied()
    }

    pub fn is_nested(&self) -> bool {
        !self.hops.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.hops.len()
    }
}

impl fmt::Display for StepPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "steps.{}", self.index)?;
        for hop in &self.hops {
            write!(f, ".branches.{}.steps.{}", hop.branch, hop.step)?;
        }
        Ok(())
    }
}

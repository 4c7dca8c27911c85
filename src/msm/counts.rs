//! Lag-1 sliding-window transition counting.
//!
//! Purpose
//! -------
//! Turn a [`DiscreteTrajectory`] into the `num_states × num_states` count
//! matrix that drives the reversible estimator.
//!
//! Key behaviors
//! -------------
//! - Every adjacent pair `(label[t], label[t+1])`, `t = 0 … n-2`, adds one
//!   count; the total is therefore `n - 1`.
//! - Unoccupied states keep zero rows and columns; the estimator decides
//!   whether that is acceptable.
//! - [`CountMatrix::communicating_classes`] splits the states into strongly
//!   connected components of the observed transition graph (`i → j` when
//!   `c_ij > 0`). A reversible fit needs exactly one.
use crate::msm::errors::{MsmError, MsmResult};
use crate::trajectory::DiscreteTrajectory;
use ndarray::{Array2, ArrayView2};

/// `CountMatrix` — observed lag-1 transitions, `counts[[i, j]]` = number of
/// `i → j` steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMatrix {
    counts: Array2<u64>,
}

impl CountMatrix {
    /// Wrap an existing square count matrix.
    ///
    /// # Errors
    /// - `MsmError::NotSquare` when the matrix is not square.
    pub fn new(counts: Array2<u64>) -> MsmResult<Self> {
        if counts.nrows() != counts.ncols() {
            return Err(MsmError::NotSquare { rows: counts.nrows(), cols: counts.ncols() });
        }
        Ok(Self { counts })
    }

    pub fn num_states(&self) -> usize {
        self.counts.nrows()
    }

    pub fn view(&self) -> ArrayView2<'_, u64> {
        self.counts.view()
    }

    /// Total number of counted transitions.
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// Outgoing transitions of state `i` (row sum).
    pub fn outgoing(&self, i: usize) -> u64 {
        self.counts.row(i).sum()
    }

    /// Counts as `f64`, e.g. for heatmaps or likelihood evaluation.
    pub fn as_f64(&self) -> Array2<f64> {
        self.counts.mapv(|c| c as f64)
    }

    /// Strongly connected components of the transition graph.
    ///
    /// States `i` and `j` share a class when each is reachable from the
    /// other through observed transitions. Every state, including
    /// unoccupied ones, belongs to exactly one class. Classes are sorted
    /// internally and ordered by their smallest state.
    pub fn communicating_classes(&self) -> Vec<Vec<usize>> {
        let mut tarjan = Tarjan::new(self.num_states());
        for v in 0..self.num_states() {
            if tarjan.index[v].is_none() {
                tarjan.visit(v, self.counts.view());
            }
        }
        let mut classes = tarjan.components;
        for class in &mut classes {
            class.sort_unstable();
        }
        classes.sort_by_key(|class| class[0]);
        classes
    }

    /// `true` when every state communicates with every other.
    pub fn is_connected(&self) -> bool {
        self.communicating_classes().len() <= 1
    }
}

/// Tarjan's low-link bookkeeping over a dense count matrix.
struct Tarjan {
    next: usize,
    index: Vec<Option<usize>>,
    low: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl Tarjan {
    fn new(n: usize) -> Self {
        Self {
            next: 0,
            index: vec![None; n],
            low: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::with_capacity(n),
            components: Vec::new(),
        }
    }

    fn visit(&mut self, v: usize, counts: ArrayView2<'_, u64>) {
        self.index[v] = Some(self.next);
        self.low[v] = self.next;
        self.next += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        for w in 0..counts.ncols() {
            if w == v || counts[[v, w]] == 0 {
                continue;
            }
            match self.index[w] {
                None => {
                    self.visit(w, counts);
                    self.low[v] = self.low[v].min(self.low[w]);
                }
                Some(iw) if self.on_stack[w] => self.low[v] = self.low[v].min(iw),
                Some(_) => {}
            }
        }

        if Some(self.low[v]) == self.index[v] {
            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}

/// Count lag-1 transitions of `traj` with a sliding window.
///
/// # Errors
/// - `MsmError::TooShort` when the trajectory has fewer than two frames.
pub fn count_transitions(traj: &DiscreteTrajectory) -> MsmResult<CountMatrix> {
    if traj.len() < 2 {
        return Err(MsmError::TooShort { frames: traj.len() });
    }
    let n = traj.num_states();
    let mut counts = Array2::<u64>::zeros((n, n));
    let labels = traj.labels();
    for w in labels.windows(2) {
        counts[[w[0], w[1]]] += 1;
    }
    Ok(CountMatrix { counts })
}

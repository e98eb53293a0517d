//! Depth-first branch-and-bound over the arc formulation.
//!
//! A node of the tree is a partial arc selection: closed routes plus one open
//! route ending at the current node. Branches either extend the open route to
//! an unvisited customer that still fits, or return it to the depot.
//!
//! Degree constraints hold by construction (each customer gets one incoming
//! and one outgoing arc). Pruning:
//!
//! - cost so far plus an arc relaxation (cheapest incoming arc per unserved
//!   node, or cheapest outgoing arc, whichever is larger) must beat the
//!   incumbent;
//! - remaining demand must fit into the open route plus the unused vehicles.
//!
//! Symmetry breaking: each route must contain the lowest-index customer that
//! was unserved when it left the depot, and is closed only when its first
//! customer has a lower index than its last. With symmetric costs both rules
//! keep at least one optimal solution reachable.

use std::fmt;
use std::time::Duration;

use super::limit::TimeLimit;
use super::model::{ArcModel, ArcSelection};
use crate::models::DEPOT;

const EPSILON: f64 = 1e-9;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The whole tree was explored and an incumbent exists.
    OptimalityProven,
    /// The whole tree was explored without finding any solution.
    InfeasibilityProven,
    /// The wall-clock budget ran out.
    TimeLimitReached,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::TimeLimitReached => write!(f, "Time Limit Reached"),
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Tree nodes expanded.
    pub nodes: u64,
    /// Nodes cut by the bound or the capacity check.
    pub pruned: u64,
    /// Improving solutions found (the warm start excluded).
    pub solutions_found: u64,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes={} pruned={} solutions={} elapsed={:.3}s",
            self.nodes,
            self.pruned,
            self.solutions_found,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Option<(ArcSelection, f64)>,
    pub reason: TerminationReason,
    pub statistics: SearchStatistics,
}

/// Branch-and-bound session over one [`ArcModel`].
pub struct BranchAndBound<'m, 'a> {
    model: &'m ArcModel<'a>,
    limit: TimeLimit,
    selection: ArcSelection,
    visited: Vec<bool>,
    remaining: usize,
    remaining_demand: i64,
    best_cost: f64,
    best: Option<ArcSelection>,
    stats: SearchStatistics,
    aborted: bool,
}

impl<'m, 'a> BranchAndBound<'m, 'a> {
    pub fn new(model: &'m ArcModel<'a>, limit: TimeLimit) -> Self {
        let n = model.num_nodes();
        let mut visited = vec![false; n];
        visited[DEPOT] = true;
        Self {
            model,
            limit,
            selection: ArcSelection::new(n),
            visited,
            remaining: n - 1,
            remaining_demand: model.total_demand(),
            best_cost: f64::INFINITY,
            best: None,
            stats: SearchStatistics::default(),
            aborted: false,
        }
    }

    /// Installs a known feasible selection as the starting upper bound.
    pub fn with_incumbent(mut self, incumbent: ArcSelection, cost: f64) -> Self {
        self.best_cost = cost;
        self.best = Some(incumbent);
        self
    }

    pub fn run(mut self) -> SearchOutcome {
        self.open_route(0.0);

        self.stats.elapsed = self.limit.elapsed();
        let reason = if self.aborted {
            TerminationReason::TimeLimitReached
        } else if self.best.is_some() {
            TerminationReason::OptimalityProven
        } else {
            TerminationReason::InfeasibilityProven
        };
        SearchOutcome {
            best: self.best.map(|s| (s, self.best_cost)),
            reason,
            statistics: self.stats,
        }
    }

    fn should_stop(&mut self) -> bool {
        if !self.aborted {
            self.limit.on_step();
            self.aborted = self.limit.is_expired();
        }
        self.aborted
    }

    /// At the depot with every started route closed.
    fn open_route(&mut self, cost: f64) {
        if self.should_stop() {
            return;
        }
        self.stats.nodes += 1;

        if self.remaining == 0 {
            self.record(cost);
            return;
        }

        let used = self.selection.num_departures();
        let q = i64::from(self.model.capacity());
        let spare_vehicles = spare(self.model.max_vehicles(), used);
        if spare_vehicles == 0
            || self.remaining_demand > spare_vehicles.saturating_mul(q)
            || cost + self.lower_bound(DEPOT) >= self.best_cost - EPSILON
        {
            self.stats.pruned += 1;
            return;
        }

        let Some(anchor) = (1..self.visited.len()).find(|&c| !self.visited[c]) else {
            return;
        };

        for v in self.candidates(DEPOT, 0) {
            self.selection.depart(v);
            self.visit(v);
            self.extend(v, self.model.demand(v), cost + self.model.cost(DEPOT, v), v, anchor);
            self.unvisit(v);
            self.selection.undo_depart();
            if self.aborted {
                return;
            }
        }
    }

    /// On an open route that currently ends at customer `node`.
    fn extend(&mut self, node: usize, load: i32, cost: f64, first: usize, anchor: usize) {
        if self.should_stop() {
            return;
        }
        self.stats.nodes += 1;

        let q = self.model.capacity();
        let spare_vehicles = spare(self.model.max_vehicles(), self.selection.num_departures());
        let room =
            i64::from(q - load).saturating_add(spare_vehicles.saturating_mul(i64::from(q)));
        let anchor_unreachable = !self.visited[anchor] && load + self.model.demand(anchor) > q;
        if anchor_unreachable
            || self.remaining_demand > room
            || cost + self.lower_bound(node) >= self.best_cost - EPSILON
        {
            self.stats.pruned += 1;
            return;
        }

        for v in self.candidates(node, load) {
            self.selection.select(node, v);
            self.visit(v);
            self.extend(
                v,
                load + self.model.demand(v),
                cost + self.model.cost(node, v),
                first,
                anchor,
            );
            self.unvisit(v);
            self.selection.unselect(node);
            if self.aborted {
                return;
            }
        }

        if self.visited[anchor] && first <= node {
            self.selection.select(node, DEPOT);
            self.open_route(cost + self.model.cost(node, DEPOT));
            self.selection.unselect(node);
        }
    }

    /// Unserved customers that fit on top of `load`, nearest first.
    fn candidates(&self, from: usize, load: i32) -> Vec<usize> {
        let q = self.model.capacity();
        let mut next: Vec<usize> = (1..self.visited.len())
            .filter(|&v| !self.visited[v] && load + self.model.demand(v) <= q)
            .collect();
        next.sort_by(|&a, &b| self.model.cost(from, a).total_cmp(&self.model.cost(from, b)));
        next
    }

    /// Arc relaxation of the cost still to pay from `node`.
    fn lower_bound(&self, node: usize) -> f64 {
        if self.remaining == 0 {
            return self.model.cost(node, DEPOT);
        }
        let n = self.visited.len();
        let open = |v: usize| !self.visited[v];

        let mut incoming = 0.0;
        let mut outgoing = 0.0;
        for v in (1..n).filter(|&v| open(v)) {
            let mut best_in = self.model.cost(DEPOT, v).min(self.model.cost(node, v));
            let mut best_out = self.model.cost(v, DEPOT);
            for u in (1..n).filter(|&u| u != v && open(u)) {
                best_in = best_in.min(self.model.cost(u, v));
                best_out = best_out.min(self.model.cost(v, u));
            }
            incoming += best_in;
            outgoing += best_out;
        }

        let unserved = (1..n).filter(|&v| open(v));
        if node == DEPOT {
            // Some route still has to leave and come back.
            let leave = unserved
                .clone()
                .map(|v| self.model.cost(DEPOT, v))
                .fold(f64::INFINITY, f64::min);
            let back = unserved
                .map(|v| self.model.cost(v, DEPOT))
                .fold(f64::INFINITY, f64::min);
            (incoming + back).max(outgoing + leave)
        } else {
            let back = unserved
                .clone()
                .map(|v| self.model.cost(v, DEPOT))
                .fold(self.model.cost(node, DEPOT), f64::min);
            let leave = unserved
                .map(|v| self.model.cost(node, v))
                .fold(self.model.cost(node, DEPOT), f64::min);
            (incoming + back).max(outgoing + leave)
        }
    }

    fn record(&mut self, cost: f64) {
        if cost < self.best_cost - EPSILON {
            self.best_cost = cost;
            self.best = Some(self.selection.clone());
            self.stats.solutions_found += 1;
            log::debug!(
                "exact: incumbent objective={cost:.3} vehicles={} nodes={}",
                self.selection.num_departures(),
                self.stats.nodes
            );
        }
    }

    #[inline]
    fn visit(&mut self, v: usize) {
        self.visited[v] = true;
        self.remaining -= 1;
        self.remaining_demand -= i64::from(self.model.demand(v));
    }

    #[inline]
    fn unvisit(&mut self, v: usize) {
        self.visited[v] = false;
        self.remaining += 1;
        self.remaining_demand += i64::from(self.model.demand(v));
    }
}

/// Vehicles still available after `used` departures.
#[inline]
fn spare(max_vehicles: usize, used: usize) -> i64 {
    i64::try_from(max_vehicles.saturating_sub(used)).unwrap_or(i64::MAX)
}

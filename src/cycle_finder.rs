//! Hub-anchored simple-cycle enumeration.
//!
//! Exhaustive simple-cycle enumeration is exponential in dense transaction
//! graphs. Real mule rings route through liquidity hubs, so the search
//! anchors at high-degree vertices and bounds both path length and total
//! cycle count.

use crate::config::DetectionConfig;
use crate::error::{DetectionError, DetectionResult};
use crate::tx_batch::TxBatch;
use std::collections::HashSet;
use std::time::Instant;

/// A simple directed cycle, vertex-ordered starting at its hub anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub members: Vec<usize>,
}

impl Cycle {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn canonical_key(&self) -> Vec<usize> {
        let mut key = self.members.clone();
        key.sort_unstable();
        key
    }
}

/// One entry of the explicit DFS stack.
///
/// `Visit` pushes a vertex onto the current path; its matching `Pop` is
/// pushed immediately underneath it so popping the path entry after all of
/// a vertex's successors have been explored needs no path clone per branch.
enum Frame {
    Visit { vertex: usize },
    Pop,
}

/// Enumerates bounded-length simple cycles anchored at hub vertices.
pub struct CycleFinder<'a> {
    batch: &'a TxBatch,
    config: &'a DetectionConfig,
}

impl<'a> CycleFinder<'a> {
    pub fn new(batch: &'a TxBatch, config: &'a DetectionConfig) -> Self {
        Self { batch, config }
    }

    /// Hub vertices: those whose unique-neighbor total degree meets the
    /// run's threshold `max(2, N / hub_degree_divisor)`.
    fn hub_set(&self) -> Vec<usize> {
        let n = self.batch.account_count();
        let threshold = (n / self.config.hub_degree_divisor).max(2);
        (0..n)
            .filter(|&v| {
                let degree = self.batch.unique_senders(v).len() + self.batch.unique_receivers(v).len();
                degree >= threshold
            })
            .collect()
    }

    /// Enumerate cycles, deadline-checked at each stack pop.
    pub fn find(&self, deadline: Option<Instant>) -> DetectionResult<Vec<Cycle>> {
        let mut cycles = Vec::new();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();

        for start in self.hub_set() {
            if cycles.len() >= self.config.max_cycles {
                break;
            }
            self.search_from(start, &mut cycles, &mut seen, deadline)?;
        }

        Ok(cycles)
    }

    fn search_from(
        &self,
        start: usize,
        cycles: &mut Vec<Cycle>,
        seen: &mut HashSet<Vec<usize>>,
        deadline: Option<Instant>,
    ) -> DetectionResult<()> {
        let mut stack = vec![Frame::Visit { vertex: start }];
        let mut path: Vec<usize> = Vec::new();
        let mut on_path: HashSet<usize> = HashSet::new();

        while let Some(frame) = stack.pop() {
            if let Some(dl) = deadline {
                if Instant::now() >= dl {
                    return Err(DetectionError::Timeout);
                }
            }
            if cycles.len() >= self.config.max_cycles {
                return Ok(());
            }

            match frame {
                Frame::Pop => {
                    let v = path.pop().expect("pop frame without matching visit");
                    on_path.remove(&v);
                }
                Frame::Visit { vertex } => {
                    path.push(vertex);
                    on_path.insert(vertex);
                    stack.push(Frame::Pop);

                    if path.len() > self.config.max_cycle_len {
                        continue;
                    }

                    // Push successors in reverse so popping the stack visits
                    // them in the deterministic forward (first-appearance)
                    // adjacency order.
                    for &next in self.batch.edges(vertex).iter().rev() {
                        if next == start
                            && path.len() >= self.config.min_cycle_len
                            && path.len() <= self.config.max_cycle_len
                        {
                            let cycle = Cycle {
                                members: path.clone(),
                            };
                            let key = cycle.canonical_key();
                            if seen.insert(key) {
                                cycles.push(cycle);
                                if cycles.len() >= self.config.max_cycles {
                                    return Ok(());
                                }
                            }
                        }

                        if !on_path.contains(&next) && path.len() < self.config.max_cycle_len {
                            stack.push(Frame::Visit { vertex: next });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

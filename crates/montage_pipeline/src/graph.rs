//! Step graph validation.

use montage_error::{PipelineError, PipelineErrorKind};
use std::collections::HashMap;

/// Validated dependency graph over step indices.
///
/// Indices follow the order the steps were declared in.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct StepGraph {
    /// Distinct dependency count per step
    dependency_counts: Vec<usize>,
    /// Steps waiting on each step
    dependents: Vec<Vec<usize>>,
    /// One valid execution order
    topological_order: Vec<usize>,
}

impl StepGraph {
    /// Build and validate a graph from `(id, dependencies)` pairs.
    ///
    /// # Errors
    ///
    /// Rejects duplicate ids, dependencies on unknown ids, and cycles
    /// (including a step depending on itself).
    pub fn build<'a, I, D>(steps: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = (&'a str, D)>,
        D: IntoIterator<Item = &'a String>,
    {
        let steps: Vec<(&str, Vec<&String>)> = steps
            .into_iter()
            .map(|(id, deps)| (id, deps.into_iter().collect()))
            .collect();

        let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(steps.len());
        for (index, (id, _)) in steps.iter().enumerate() {
            if index_of.insert(id, index).is_some() {
                return Err(PipelineError::new(PipelineErrorKind::DuplicateStep(
                    id.to_string(),
                )));
            }
        }

        let mut dependency_lists: Vec<Vec<usize>> = Vec::with_capacity(steps.len());
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); steps.len()];
        for (index, (id, deps)) in steps.iter().enumerate() {
            let mut resolved: Vec<usize> = Vec::with_capacity(deps.len());
            for dep in deps {
                let dep_index = *index_of.get(dep.as_str()).ok_or_else(|| {
                    PipelineError::new(PipelineErrorKind::UnknownDependency {
                        step: id.to_string(),
                        dependency: dep.to_string(),
                    })
                })?;
                if !resolved.contains(&dep_index) {
                    resolved.push(dep_index);
                    dependents[dep_index].push(index);
                }
            }
            dependency_lists.push(resolved);
        }

        let dependency_counts: Vec<usize> = dependency_lists.iter().map(Vec::len).collect();
        let topological_order = Self::kahn(&dependency_counts, &dependents);

        if topological_order.len() < steps.len() {
            let ids: Vec<&str> = steps.iter().map(|(id, _)| *id).collect();
            let cycle = Self::describe_cycle(&ids, &dependency_lists, &topological_order);
            return Err(PipelineError::new(PipelineErrorKind::Cycle(cycle)));
        }

        Ok(Self {
            dependency_counts,
            dependents,
            topological_order,
        })
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.dependency_counts.len()
    }

    /// Whether the graph has no steps.
    pub fn is_empty(&self) -> bool {
        self.dependency_counts.is_empty()
    }

    fn kahn(dependency_counts: &[usize], dependents: &[Vec<usize>]) -> Vec<usize> {
        let mut remaining = dependency_counts.to_vec();
        let mut queue: std::collections::VecDeque<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(index, _)| index)
            .collect();
        let mut order = Vec::with_capacity(remaining.len());

        while let Some(index) = queue.pop_front() {
            order.push(index);
            for &dependent in &dependents[index] {
                remaining[dependent] -= 1;
                if remaining[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }
        order
    }

    // Every step left over by Kahn's algorithm has an unresolved dependency
    // that is also left over, so walking those edges must revisit a step.
    fn describe_cycle(ids: &[&str], dependency_lists: &[Vec<usize>], resolved: &[usize]) -> String {
        let mut unresolved = vec![true; ids.len()];
        for &index in resolved {
            unresolved[index] = false;
        }

        let Some(start) = unresolved.iter().position(|u| *u) else {
            return String::new();
        };

        let mut path: Vec<usize> = vec![start];
        let mut current = start;
        loop {
            let Some(&next) = dependency_lists[current].iter().find(|d| unresolved[**d]) else {
                break;
            };
            if let Some(position) = path.iter().position(|p| *p == next) {
                let mut cycle: Vec<&str> = path[position..].iter().map(|i| ids[*i]).collect();
                cycle.push(ids[next]);
                return cycle.join(" -> ");
            }
            path.push(next);
            current = next;
        }

        path.iter().map(|i| ids[*i]).collect::<Vec<_>>().join(", ")
    }
}

//! # Task-graph scheduler
//!
//! A small dependency-graph executor on top of the shared rayon pool. Tasks
//! are registered with the handles of their predecessors; `execute` dispatches
//! every ready task eagerly and spawns each dependent the moment its last
//! predecessor finishes. `join` combines several handles into one, so a task
//! can wait on an arbitrary set of prior stages.
//!
//! Handles are plain indices into the graph, which makes cycles
//! unrepresentable: a task can only name predecessors that were added before
//! it. The graph is built serially, executed once, and consumed by
//! `execute`, which blocks the caller until every task has run. Individual
//! tasks never block.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Identifies a registered task. Combine handles with [`TaskGraph::join`] and
/// pass them as predecessors to later [`TaskGraph::task`] calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle(usize);

type TaskBody<'scope> = Box<dyn FnOnce() + Send + 'scope>;

struct TaskNode<'scope> {
	body: Mutex<Option<TaskBody<'scope>>>,
	pending: AtomicUsize,
	dependents: Vec<usize>,
}

/// One-shot dependency graph. `'scope` is the lifetime of the data the task
/// closures borrow; everything borrowed must outlive the `execute` call.
pub struct TaskGraph<'scope> {
	tasks: Vec<TaskNode<'scope>>,
}

impl<'scope> TaskGraph<'scope> {
	#[inline]
	pub fn new() -> Self {
		Self { tasks: Vec::new() }
	}

	#[inline]
	pub fn with_capacity(tasks: usize) -> Self {
		Self {
			tasks: Vec::with_capacity(tasks),
		}
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.tasks.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}

	/// Register `body` to run after every task in `after` has completed.
	/// An empty `after` makes the task ready at dispatch time.
	pub fn task(&mut self, after: &[TaskHandle], body: impl FnOnce() + Send + 'scope) -> TaskHandle {
		let id = self.tasks.len();
		for &TaskHandle(dep) in after {
			debug_assert!(dep < id, "predecessor handle out of range");
			self.tasks[dep].dependents.push(id);
		}
		self.tasks.push(TaskNode {
			body: Mutex::new(Some(Box::new(body))),
			pending: AtomicUsize::new(after.len()),
			dependents: Vec::new(),
		});
		TaskHandle(id)
	}

	/// Combine several handles into one: the returned handle completes when
	/// all of `after` have completed.
	#[inline]
	pub fn join(&mut self, after: &[TaskHandle]) -> TaskHandle {
		self.task(after, || {})
	}

	/// Dispatch the graph onto the shared rayon pool and block until every
	/// task has completed. Tasks with satisfied dependencies run eagerly and
	/// in any relative order; a dependent is spawned by whichever worker
	/// finishes its last predecessor.
	pub fn execute(self) {
		let tasks = self.tasks;
		if tasks.is_empty() {
			return;
		}
		let tasks_ref: &[TaskNode<'_>] = &tasks;
		rayon::scope(|s| {
			for id in 0..tasks_ref.len() {
				if tasks_ref[id].pending.load(Ordering::Acquire) == 0 {
					s.spawn(move |s| run_task(tasks_ref, id, s));
				}
			}
		});
	}
}

impl<'scope> Default for TaskGraph<'scope> {
	fn default() -> Self {
		Self::new()
	}
}

fn run_task<'a, 'scope>(tasks: &'a [TaskNode<'scope>], id: usize, scope: &rayon::Scope<'a>) {
	let body = tasks[id]
		.body
		.lock()
		.expect("task body lock poisoned")
		.take();
	if let Some(body) = body {
		body();
	}
	for &dep in &tasks[id].dependents {
		// The last finishing predecessor observes 1 and owns the spawn.
		if tasks[dep].pending.fetch_sub(1, Ordering::AcqRel) == 1 {
			scope.spawn(move |s| run_task(tasks, dep, s));
		}
	}
}

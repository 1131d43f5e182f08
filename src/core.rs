use std::{
    any::Any,
    cell::RefCell,
    collections::VecDeque,
    future::poll_fn,
    mem::{replace, take},
    rc::{Rc, Weak},
    task::{Context, Poll, Waker},
    thread::AccessError,
};

use derive_ex::derive_ex;

#[cfg(test)]
mod tests;

thread_local! {
    static GLOBALS: RefCell<Globals> = RefCell::new(Globals::new());
}

struct Globals {
    is_runtime_exists: bool,
    tasks: VecDeque<Task>,
    waker: Option<Waker>,
    need_wake: bool,
}
impl Globals {
    fn new() -> Self {
        Self {
            is_runtime_exists: false,
            tasks: VecDeque::new(),
            waker: None,
            need_wake: false,
        }
    }
    fn with<T>(f: impl FnOnce(&mut Self) -> T) -> T {
        GLOBALS.with(|g| f(&mut g.borrow_mut()))
    }
    fn try_with<T>(f: impl FnOnce(&mut Self) -> T) -> Result<T, AccessError> {
        GLOBALS.try_with(|g| f(&mut g.borrow_mut()))
    }
    fn schedule_task(task: Task) {
        let _ = Self::try_with(|g| {
            g.tasks.push_back(task);
            g.wake();
        });
    }
    fn get_tasks(tasks: &mut Vec<Task>) {
        Self::with(|g| tasks.extend(g.tasks.drain(..)))
    }
    fn wait_for_ready(&mut self, cx: &Context) -> Poll<()> {
        self.need_wake = false;
        if !self.tasks.is_empty() {
            return Poll::Ready(());
        }
        self.waker = Some(cx.waker().clone());
        self.need_wake = true;
        Poll::Pending
    }
    fn finish_runtime(&mut self) {
        self.is_runtime_exists = false;
    }
    fn wake(&mut self) {
        if !self.need_wake {
            return;
        }
        self.need_wake = false;
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

/// Scheduler that delivers coalesced store notifications.
#[derive_ex(Default)]
#[default(Self::new())]
pub struct Runtime {
    tasks_buffer: Vec<Task>,
}
impl Runtime {
    pub fn new() -> Self {
        if Globals::with(|g| replace(&mut g.is_runtime_exists, true)) {
            panic!("Only one `Runtime` can exist in the same thread at the same time.");
        };
        Self {
            tasks_buffer: Vec::new(),
        }
    }

    /// Perform scheduled tasks.
    ///
    /// Tasks scheduled while running are left for the next call.
    ///
    /// Returns `true` if any task was performed.
    pub fn run_tasks(&mut self) -> bool {
        let mut tasks = take(&mut self.tasks_buffer);
        Globals::get_tasks(&mut tasks);
        let handled = !tasks.is_empty();
        for task in tasks.drain(..) {
            task.run();
        }
        self.tasks_buffer = tasks;
        handled
    }

    /// Repeat [`run_tasks`](Self::run_tasks) until there are no more tasks to do.
    pub fn update(&mut self) {
        while self.run_tasks() {}
    }

    /// Wait while there is no task to be executed by [`update`](Self::update).
    pub async fn wait_for_ready(&mut self) {
        poll_fn(|cx| Globals::with(|g| g.wait_for_ready(cx))).await
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        let _ = Globals::try_with(|g| g.finish_runtime());
    }
}

pub struct Task(RawTask);

impl Task {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Task(RawTask::Box(Box::new(f)))
    }
    pub fn from_weak_fn<T: Any>(this: Weak<T>, f: impl Fn(Rc<T>) + Copy + 'static) -> Self {
        Task(RawTask::Weak {
            this,
            f: Box::new(move |this| {
                if let Some(this) = this.upgrade() {
                    f(this.downcast().unwrap())
                }
            }),
        })
    }

    /// Queue this task on the current thread.
    ///
    /// Queued tasks stay until a [`Runtime`] on this thread performs them.
    pub fn schedule(self) {
        Globals::schedule_task(self)
    }
    fn run(self) {
        match self.0 {
            RawTask::Box(f) => f(),
            RawTask::Weak { this, f } => f(this),
        }
    }
}

enum RawTask {
    Box(Box<dyn FnOnce()>),
    Weak {
        this: Weak<dyn Any>,
        f: Box<dyn Fn(Weak<dyn Any>)>,
    },
}
